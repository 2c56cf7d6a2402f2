//! Calculation entry points.
//!
//! [`calculate`] runs the whole pipeline over caller-supplied data:
//! selection, allocation resolution, proration and aggregation. The
//! `_from_store` variants fetch the same inputs through an injected
//! [`DistributionStore`] first.

use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allocation, CalculationFilters, CalculationResult, CalculationWarning, DataMode, DateRange,
    FreeCapacityResult, PayrollRecord, Profile, ProfileId,
};
use crate::store::DistributionStore;

use super::aggregator::{aggregate_profile, build_result};
use super::free_capacity::free_capacity;
use super::proration::prorate_profile;

/// Warning code for a payroll record skipped because it fails validation.
pub const INVALID_RECORD_WARNING: &str = "INVALID_RECORD";

/// Warning code for an allocation skipped because it fails validation.
pub const INVALID_ALLOCATION_WARNING: &str = "INVALID_ALLOCATION";

/// Distributes the payroll of `profiles` across their allocations over
/// `query_range`.
///
/// Profiles are emitted in input order. Records and allocations belonging to
/// profiles not in `profiles`, or filtered out by `profile_ids`, are never
/// inspected. An invalid record or allocation of a queried profile is skipped
/// and reported as an [`INVALID_RECORD_WARNING`] or
/// [`INVALID_ALLOCATION_WARNING`]; the rest of the calculation proceeds.
///
/// # Example
///
/// ```
/// use distribution_engine::calculation::calculate;
/// use distribution_engine::models::{
///     Allocation, CalculationFilters, ContractStatus, DataMode, DateRange, PayrollRecord,
///     Profile, Project, RecordKind,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let date = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
/// let profiles = vec![Profile {
///     id: 1,
///     name: "Ana Ruiz".to_string(),
///     national_id: "12345678Z".to_string(),
/// }];
/// let records = vec![PayrollRecord {
///     id: 1,
///     profile_id: 1,
///     kind: RecordKind::Actual,
///     wage: Decimal::new(1000, 0),
///     employer_contribution: Decimal::new(300, 0),
///     hours: Decimal::new(80, 0),
///     period_start: date(1),
///     period_end: date(10),
///     company: "Acme".to_string(),
///     lower_multiplier: 0.0,
///     upper_multiplier: 0.0,
/// }];
/// let allocations = vec![Allocation {
///     id: 1,
///     profile_id: 1,
///     project: Project { id: 10, name: "Atlas".to_string() },
///     percentage: Decimal::new(50, 0),
///     period_start: date(1),
///     period_end: date(5),
///     contract_status: ContractStatus::New,
/// }];
///
/// let result = calculate(
///     &profiles,
///     &records,
///     &allocations,
///     DateRange::parse("2025-01-01", "2025-01-31").unwrap(),
///     DataMode::Actual,
///     &CalculationFilters::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.global_total.wage, Decimal::new(250, 0));
/// assert_eq!(result.global_total.unassigned_wage, Decimal::new(750, 0));
/// ```
pub fn calculate(
    profiles: &[Profile],
    payroll_records: &[PayrollRecord],
    allocations: &[Allocation],
    query_range: DateRange,
    data_mode: DataMode,
    filters: &CalculationFilters,
) -> EngineResult<CalculationResult> {
    let mut results = Vec::new();
    let mut warnings = Vec::new();

    for profile in profiles.iter().filter(|p| filters.includes_profile(p.id)) {
        let mut profile_records: Vec<&PayrollRecord> = Vec::new();
        for record in payroll_records.iter().filter(|r| r.profile_id == profile.id) {
            match record.validate() {
                Ok(()) => profile_records.push(record),
                Err(err) => warnings.push(invalid_data_warning(
                    INVALID_RECORD_WARNING,
                    profile.id,
                    &err,
                )),
            }
        }

        let mut profile_allocations: Vec<&Allocation> = Vec::new();
        for allocation in allocations.iter().filter(|a| a.profile_id == profile.id) {
            match allocation.validate() {
                Ok(()) => profile_allocations.push(allocation),
                Err(err) => warnings.push(invalid_data_warning(
                    INVALID_ALLOCATION_WARNING,
                    profile.id,
                    &err,
                )),
            }
        }

        let distribution = prorate_profile(
            profile.id,
            profile_records.iter().copied(),
            &profile_allocations,
            query_range,
            data_mode,
            filters,
        );

        results.push(aggregate_profile(profile, &distribution));
        warnings.extend(distribution.warnings);
    }

    debug!(
        profiles = results.len(),
        warnings = warnings.len(),
        start = %query_range.start(),
        end = %query_range.end(),
        "Distribution calculated"
    );

    Ok(build_result(
        results,
        warnings,
        filters.only_with_free_capacity,
    ))
}

fn invalid_data_warning(
    code: &str,
    profile_id: ProfileId,
    error: &EngineError,
) -> CalculationWarning {
    warn!(profile_id, error = %error, "Skipping invalid data");
    CalculationWarning {
        code: code.to_string(),
        message: format!("{}; excluded from the calculation", error),
        severity: "high".to_string(),
        profile_id,
    }
}

/// Runs [`calculate`] over data fetched from `store`.
///
/// Only the profiles passing the profile filter are queried.
pub fn calculate_from_store(
    store: &dyn DistributionStore,
    query_range: DateRange,
    data_mode: DataMode,
    filters: &CalculationFilters,
) -> EngineResult<CalculationResult> {
    let profiles: Vec<Profile> = store
        .profiles()?
        .into_iter()
        .filter(|p| filters.includes_profile(p.id))
        .collect();

    let mut payroll_records = Vec::new();
    let mut allocations = Vec::new();
    for profile in &profiles {
        payroll_records.extend(store.payroll_records(profile.id, query_range)?);
        allocations.extend(store.allocations(profile.id, query_range)?);
    }

    calculate(
        &profiles,
        &payroll_records,
        &allocations,
        query_range,
        data_mode,
        filters,
    )
}

/// Runs [`free_capacity`] over data fetched from `store`.
///
/// Returns [`EngineError::ProfileNotFound`] for an unknown profile.
pub fn free_capacity_from_store(
    store: &dyn DistributionStore,
    profile_id: ProfileId,
    range: DateRange,
) -> EngineResult<FreeCapacityResult> {
    if store.profile(profile_id)?.is_none() {
        return Err(EngineError::ProfileNotFound { id: profile_id });
    }

    let payroll_records = store.payroll_records(profile_id, range)?;
    let allocations = store.allocations(profile_id, range)?;

    Ok(free_capacity(
        profile_id,
        &payroll_records,
        &allocations,
        range,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContractStatus, Project, RecordKind};
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_profile(id: u64, name: &str) -> Profile {
        Profile {
            id,
            name: name.to_string(),
            national_id: format!("{:08}X", id),
        }
    }

    fn create_record(id: u64, profile_id: u64, wage: &str, hours: &str) -> PayrollRecord {
        PayrollRecord {
            id,
            profile_id,
            kind: RecordKind::Actual,
            wage: dec(wage),
            employer_contribution: dec(wage) * dec("0.3"),
            hours: dec(hours),
            period_start: make_date("2025-01-01"),
            period_end: make_date("2025-01-10"),
            company: "Acme".to_string(),
            lower_multiplier: 1.0,
            upper_multiplier: 1.0,
        }
    }

    fn create_allocation(
        id: u64,
        profile_id: u64,
        project_id: u64,
        percentage: &str,
        start: &str,
        end: &str,
    ) -> Allocation {
        Allocation {
            id,
            profile_id,
            project: Project {
                id: project_id,
                name: format!("Project {}", project_id),
            },
            percentage: dec(percentage),
            period_start: make_date(start),
            period_end: make_date(end),
            contract_status: ContractStatus::New,
        }
    }

    fn sample_data() -> (Vec<Profile>, Vec<PayrollRecord>, Vec<Allocation>) {
        let profiles = vec![create_profile(2, "Bruno"), create_profile(1, "Ana")];
        let records = vec![
            create_record(1, 1, "1000", "80"),
            create_record(2, 2, "2000", "160"),
        ];
        let allocations = vec![
            create_allocation(1, 1, 10, "50", "2025-01-01", "2025-01-05"),
            create_allocation(2, 1, 20, "30", "2025-01-06", "2025-01-10"),
            create_allocation(3, 2, 10, "100", "2025-01-01", "2025-01-31"),
        ];
        (profiles, records, allocations)
    }

    fn january() -> DateRange {
        DateRange::parse("2025-01-01", "2025-01-31").unwrap()
    }

    #[test]
    fn test_calculate_keeps_profile_input_order() {
        let (profiles, records, allocations) = sample_data();
        let result = calculate(
            &profiles,
            &records,
            &allocations,
            january(),
            DataMode::Actual,
            &CalculationFilters::default(),
        )
        .unwrap();

        let ids: Vec<u64> = result.profiles.iter().map(|p| p.profile_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(result.global_total.wage, dec("2400.00"));
        assert_eq!(result.global_total.unassigned_wage, dec("600.00"));
    }

    #[test]
    fn test_calculate_applies_profile_filter() {
        let (profiles, records, allocations) = sample_data();
        let filters = CalculationFilters {
            profile_ids: Some(vec![1, 99]),
            ..Default::default()
        };
        let result = calculate(
            &profiles,
            &records,
            &allocations,
            january(),
            DataMode::Actual,
            &filters,
        )
        .unwrap();

        assert_eq!(result.profiles.len(), 1);
        assert_eq!(result.profiles[0].profile_name, "Ana");
    }

    #[test]
    fn test_invalid_allocation_is_skipped_with_warning() {
        let (profiles, records, mut allocations) = sample_data();
        allocations[0].percentage = dec("150");

        let result = calculate(
            &profiles,
            &records,
            &allocations,
            january(),
            DataMode::Actual,
            &CalculationFilters::default(),
        )
        .unwrap();

        // Only the 30% allocation on days 6-10 remains for Ana.
        let ana = &result.profiles[1];
        assert_eq!(ana.total.wage, dec("150.00"));
        assert_eq!(ana.total.unassigned_wage, dec("850.00"));

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, INVALID_ALLOCATION_WARNING);
        assert_eq!(result.warnings[0].profile_id, 1);
        assert_eq!(result.warnings[0].severity, "high");
    }

    #[test]
    fn test_invalid_record_is_skipped_with_warning() {
        let (profiles, mut records, allocations) = sample_data();
        records[1].wage = dec("-5");

        let result = calculate(
            &profiles,
            &records,
            &allocations,
            january(),
            DataMode::Actual,
            &CalculationFilters::default(),
        )
        .unwrap();

        let bruno = &result.profiles[0];
        assert!(bruno.months.is_empty());
        assert_eq!(result.global_total.wage, dec("400.00"));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, INVALID_RECORD_WARNING);
        assert!(result.warnings[0].message.contains("wage must not be negative"));
    }

    #[test]
    fn test_other_profiles_invalid_record_does_not_affect_result() {
        let (_, mut records, allocations) = sample_data();
        records[1].wage = dec("-5");
        let profiles = vec![create_profile(1, "Ana")];

        let result = calculate(
            &profiles,
            &records,
            &allocations,
            january(),
            DataMode::Actual,
            &CalculationFilters::default(),
        )
        .unwrap();

        assert_eq!(result.profiles.len(), 1);
        assert_eq!(result.profiles[0].total.wage, dec("400.00"));
        assert_eq!(result.profiles[0].total.unassigned_wage, dec("600.00"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_filtered_out_profiles_data_is_not_validated() {
        let (profiles, mut records, mut allocations) = sample_data();
        records[1].wage = dec("-5");
        allocations[2].percentage = dec("101");
        let filters = CalculationFilters {
            profile_ids: Some(vec![1]),
            ..Default::default()
        };

        let result = calculate(
            &profiles,
            &records,
            &allocations,
            january(),
            DataMode::Actual,
            &filters,
        )
        .unwrap();

        assert_eq!(result.profiles.len(), 1);
        assert_eq!(result.global_total.wage, dec("400.00"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_calculate_from_store_matches_direct_call() {
        let (profiles, records, allocations) = sample_data();
        let direct = calculate(
            &profiles,
            &records,
            &allocations,
            january(),
            DataMode::Blended,
            &CalculationFilters::default(),
        )
        .unwrap();

        let store = InMemoryStore::new(profiles, records, allocations);
        let from_store = calculate_from_store(
            &store,
            january(),
            DataMode::Blended,
            &CalculationFilters::default(),
        )
        .unwrap();

        assert_eq!(direct, from_store);
    }

    #[test]
    fn test_free_capacity_from_store_unknown_profile() {
        let (profiles, records, allocations) = sample_data();
        let store = InMemoryStore::new(profiles, records, allocations);

        match free_capacity_from_store(&store, 42, january()) {
            Err(EngineError::ProfileNotFound { id }) => assert_eq!(id, 42),
            other => panic!("Expected ProfileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_free_capacity_from_store_reports_minimum() {
        let (profiles, records, allocations) = sample_data();
        let store = InMemoryStore::new(profiles, records, allocations);

        let result = free_capacity_from_store(&store, 1, january()).unwrap();
        assert_eq!(result.profile_id, 1);
        assert_eq!(result.minimum_free_percentage, dec("50"));
    }
}
