//! Result aggregation.
//!
//! Turns unrounded per-profile distributions into the nested
//! profile → month → project result. Leaves (project entries and each
//! month's unassigned remainder) are rounded to cents; every total above
//! them is the sum of already-rounded values, so totals always reconcile
//! with what is displayed.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{
    CalculationResult, CalculationWarning, MonthResult, Profile, ProfileResult, ProjectMonthEntry,
    Totals,
};

use super::proration::{Amounts, ProfileDistribution};

/// Rounds an amount to cents, midpoint away from zero, with two decimal places.
///
/// # Example
///
/// ```
/// use distribution_engine::calculation::round_to_cents;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_cents(Decimal::new(12345, 3)).to_string(), "12.35");
/// assert_eq!(round_to_cents(Decimal::new(250, 0)).to_string(), "250.00");
/// ```
pub fn round_to_cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

fn rounded(amounts: &Amounts) -> Amounts {
    Amounts {
        wage: round_to_cents(amounts.wage),
        contribution: round_to_cents(amounts.contribution),
        hours: round_to_cents(amounts.hours),
    }
}

fn zero_totals() -> Totals {
    let zero = round_to_cents(Decimal::ZERO);
    Totals {
        wage: zero,
        contribution: zero,
        hours: zero,
        unassigned_wage: zero,
        unassigned_contribution: zero,
        unassigned_hours: zero,
    }
}

/// Builds the result of one profile from its unrounded distribution.
pub fn aggregate_profile(profile: &Profile, distribution: &ProfileDistribution) -> ProfileResult {
    let mut months: BTreeMap<&str, MonthResult> = BTreeMap::new();

    for (key, amounts) in &distribution.entries {
        let amounts = rounded(amounts);
        let month = months
            .entry(key.month.as_str())
            .or_insert_with(|| empty_month(&key.month));

        month.total.wage += amounts.wage;
        month.total.contribution += amounts.contribution;
        month.total.hours += amounts.hours;
        month.projects.push(ProjectMonthEntry {
            project_id: key.project_id,
            project_name: key.project_name.clone(),
            wage: amounts.wage,
            contribution: amounts.contribution,
            hours: amounts.hours,
            company: key.company.clone(),
            contract_status: key.contract_status,
        });
    }

    for (month_key, amounts) in &distribution.unassigned {
        let amounts = rounded(amounts);
        let month = months
            .entry(month_key.as_str())
            .or_insert_with(|| empty_month(month_key));

        month.total.unassigned_wage += amounts.wage;
        month.total.unassigned_contribution += amounts.contribution;
        month.total.unassigned_hours += amounts.hours;
    }

    let months: Vec<MonthResult> = months.into_values().collect();
    let mut total = zero_totals();
    for month in &months {
        total.accumulate(&month.total);
    }

    ProfileResult {
        profile_id: profile.id,
        profile_name: profile.name.clone(),
        months,
        total,
    }
}

fn empty_month(month: &str) -> MonthResult {
    MonthResult {
        month: month.to_string(),
        projects: Vec::new(),
        total: zero_totals(),
    }
}

/// Assembles the final result from per-profile results.
///
/// With `only_with_free_capacity`, profiles without unassigned hours are
/// dropped along with their warnings before the global total is summed.
pub fn build_result(
    profiles: Vec<ProfileResult>,
    warnings: Vec<CalculationWarning>,
    only_with_free_capacity: bool,
) -> CalculationResult {
    let profiles: Vec<ProfileResult> = profiles
        .into_iter()
        .filter(|p| !only_with_free_capacity || p.total.unassigned_hours > Decimal::ZERO)
        .collect();

    let warnings = warnings
        .into_iter()
        .filter(|w| profiles.iter().any(|p| p.profile_id == w.profile_id))
        .collect();

    let mut global_total = zero_totals();
    for profile in &profiles {
        global_total.accumulate(&profile.total);
    }

    CalculationResult {
        profiles,
        global_total,
        warnings,
    }
}
