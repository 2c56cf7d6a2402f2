//! Proration engine.
//!
//! Walks the payroll records that govern a profile's days in the query
//! range and splits each record's wage, contribution and hours across the
//! allocations active in every calendar month it spans. Whatever the
//! allocations leave uncovered is accumulated as the unassigned remainder.
//!
//! All amounts here are exact [`Decimal`] values. Rounding happens only when
//! the aggregator emits the result.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    Allocation, CalculationFilters, CalculationWarning, ContractStatus, DataMode, DateRange,
    PayrollRecord, ProfileId, ProjectId,
};

use super::allocation_resolver::{ResolveScope, resolve_allocations};
use super::data_selection::DataSelector;
use super::interval::{days_between, intersect, month_spans};

/// Warning code for days whose allocations add up to more than 100%.
pub const OVER_ALLOCATED_WARNING: &str = "OVER_ALLOCATED";

/// Warning code for same-kind payroll records covering the same day.
pub const OVERLAPPING_RECORDS_WARNING: &str = "OVERLAPPING_RECORDS";

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Wage, contribution and hours moved together through the proration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Amounts {
    /// Wage.
    pub wage: Decimal,
    /// Employer contribution.
    pub contribution: Decimal,
    /// Hours.
    pub hours: Decimal,
}

impl Amounts {
    /// The full amounts of a payroll record.
    pub fn of_record(record: &PayrollRecord) -> Self {
        Self {
            wage: record.wage,
            contribution: record.employer_contribution,
            hours: record.hours,
        }
    }

    /// Scales every amount by `numerator / denominator`.
    ///
    /// Multiplies before dividing so exact fractions stay exact.
    fn scaled(&self, numerator: Decimal, denominator: Decimal) -> Self {
        if denominator.is_zero() {
            return Self::default();
        }
        Self {
            wage: self.wage * numerator / denominator,
            contribution: self.contribution * numerator / denominator,
            hours: self.hours * numerator / denominator,
        }
    }
}

impl AddAssign for Amounts {
    fn add_assign(&mut self, other: Self) {
        self.wage += other.wage;
        self.contribution += other.contribution;
        self.hours += other.hours;
    }
}

/// Key of one project entry within one month.
///
/// The derived ordering is the output ordering: month first (the `YYYY-MM`
/// key sorts chronologically), then project name, project id, company and
/// contract status.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryKey {
    /// The month in `YYYY-MM` form.
    pub month: String,
    /// The project display name.
    pub project_name: String,
    /// The project id.
    pub project_id: ProjectId,
    /// Company of the payroll record.
    pub company: String,
    /// Contract status of the allocation.
    pub contract_status: ContractStatus,
}

/// Unrounded distribution of a single profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDistribution {
    /// Amounts assigned per project and month.
    pub entries: BTreeMap<EntryKey, Amounts>,
    /// Unassigned amounts per month.
    pub unassigned: BTreeMap<String, Amounts>,
    /// Data-quality warnings found for the profile.
    pub warnings: Vec<CalculationWarning>,
}

/// Distributes a profile's payroll records over its allocations.
///
/// `records` and `allocations` may contain other profiles' data; only the
/// entries belonging to `profile_id` are used.
///
/// Project and contract-status filters only hide entries. The unassigned
/// remainder is always computed from every allocation of the profile. A
/// record whose company is filtered out contributes nothing at all and takes
/// no part in the per-day record selection.
pub fn prorate_profile<'a>(
    profile_id: ProfileId,
    records: impl IntoIterator<Item = &'a PayrollRecord>,
    allocations: &[&'a Allocation],
    range: DateRange,
    mode: DataMode,
    filters: &CalculationFilters,
) -> ProfileDistribution {
    // Excluded companies are dropped before selection so their records never
    // claim days from an included record.
    let selector = DataSelector::new(
        records
            .into_iter()
            .filter(|r| r.profile_id == profile_id)
            .filter(|r| filters.includes_company(&r.company)),
        range,
        mode,
    );
    let mut distribution = ProfileDistribution::default();
    let mut over_allocated: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for overlap in selector.record_overlaps() {
        warn!(
            profile_id,
            kept_record_id = overlap.kept_record_id,
            ignored_record_id = overlap.ignored_record_id,
            "Payroll records of the same kind overlap"
        );
        distribution.warnings.push(CalculationWarning {
            code: OVERLAPPING_RECORDS_WARNING.to_string(),
            message: format!(
                "Payroll records {} and {} overlap; record {} was used for the shared days",
                overlap.kept_record_id, overlap.ignored_record_id, overlap.kept_record_id
            ),
            severity: "low".to_string(),
            profile_id,
        });
    }

    for record in selector.governing_records() {
        let Some((clipped_start, clipped_end)) =
            intersect(record.period_start, record.period_end, range.start(), range.end())
        else {
            continue;
        };

        let record_days = days_between(clipped_start, clipped_end);
        if record_days <= 0 {
            continue;
        }

        // Shares are expressed in percentage-days, so the denominator folds in the 100.
        let denominator = Decimal::from(record_days) * HUNDRED;
        let amounts = Amounts::of_record(record);
        let record_allocations = resolve_allocations(
            allocations.iter().copied(),
            profile_id,
            clipped_start,
            clipped_end,
            ResolveScope::All,
        );

        debug!(
            profile_id,
            record_id = record.id,
            record_days,
            allocations = record_allocations.len(),
            "Prorating payroll record"
        );

        for span in month_spans(clipped_start, clipped_end) {
            let active = resolve_allocations(
                record_allocations.iter().copied(),
                profile_id,
                span.start,
                span.end,
                ResolveScope::All,
            );
            let displayed = resolve_allocations(
                active.iter().copied(),
                profile_id,
                span.start,
                span.end,
                ResolveScope::Displayed {
                    filters,
                    record_company: &record.company,
                },
            );

            let mut overlap_days = vec![0i64; displayed.len()];
            let mut deficit = Decimal::ZERO;
            let mut governed_days = 0;

            for date in span.start.iter_days().take_while(|d| *d <= span.end) {
                if !selector.governs(record, date) {
                    continue;
                }
                governed_days += 1;

                let occupied: Decimal = active
                    .iter()
                    .filter(|a| a.is_active_on(date))
                    .map(|a| a.percentage)
                    .sum();
                if occupied > HUNDRED {
                    over_allocated.insert(date, occupied);
                }
                deficit += (HUNDRED - occupied).max(Decimal::ZERO);

                for (days, allocation) in overlap_days.iter_mut().zip(&displayed) {
                    if allocation.is_active_on(date) {
                        *days += 1;
                    }
                }
            }

            if governed_days == 0 {
                continue;
            }

            let month = span.key();
            for (days, allocation) in overlap_days.into_iter().zip(&displayed) {
                if days == 0 || allocation.percentage.is_zero() {
                    continue;
                }
                let key = EntryKey {
                    month: month.clone(),
                    project_name: allocation.project.name.clone(),
                    project_id: allocation.project.id,
                    company: record.company.clone(),
                    contract_status: allocation.contract_status,
                };
                let share = Decimal::from(days) * allocation.percentage;
                *distribution.entries.entry(key).or_default() +=
                    amounts.scaled(share, denominator);
            }

            *distribution.unassigned.entry(month).or_default() +=
                amounts.scaled(deficit, denominator);
        }
    }

    distribution
        .warnings
        .extend(over_allocation_warnings(profile_id, &over_allocated));
    distribution
}

/// A run of consecutive days whose allocations exceed 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OverAllocatedRun {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
    /// Highest total percentage reached within the run.
    pub(crate) peak: Decimal,
}

impl OverAllocatedRun {
    pub(crate) fn log(&self, profile_id: ProfileId) {
        warn!(
            profile_id,
            start = %self.start,
            end = %self.end,
            occupied = %self.peak,
            "Allocations exceed 100%"
        );
    }

    fn warning(&self, profile_id: ProfileId) -> CalculationWarning {
        CalculationWarning {
            code: OVER_ALLOCATED_WARNING.to_string(),
            message: format!(
                "Allocations reach {}% between {} and {}; unassigned amounts clamped to zero",
                self.peak.normalize(),
                self.start,
                self.end
            ),
            severity: "medium".to_string(),
            profile_id,
        }
    }
}

/// Groups consecutive over-allocated days into runs, in date order.
pub(crate) fn over_allocated_runs(days: &BTreeMap<NaiveDate, Decimal>) -> Vec<OverAllocatedRun> {
    let mut runs: Vec<OverAllocatedRun> = Vec::new();

    for (&date, &occupied) in days {
        let extends_last = runs
            .last()
            .is_some_and(|run| run.end.succ_opt() == Some(date));
        match runs.last_mut() {
            Some(run) if extends_last => {
                run.end = date;
                run.peak = run.peak.max(occupied);
            }
            _ => runs.push(OverAllocatedRun {
                start: date,
                end: date,
                peak: occupied,
            }),
        }
    }

    runs
}

/// Logs every over-allocated run and turns it into a warning.
fn over_allocation_warnings(
    profile_id: ProfileId,
    days: &BTreeMap<NaiveDate, Decimal>,
) -> Vec<CalculationWarning> {
    over_allocated_runs(days)
        .iter()
        .map(|run| {
            run.log(profile_id);
            run.warning(profile_id)
        })
        .collect()
}
