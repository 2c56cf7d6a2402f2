//! Free-capacity calculation.
//!
//! Reports how much of a profile's time is not covered by allocations over a
//! date range: the lowest daily free percentage, the free hours implied by
//! the payroll data, and the runs of days sharing a free percentage.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{
    Allocation, DataMode, DateRange, FreeCapacityResult, FreeRange, PayrollRecord, ProfileId,
};

use super::aggregator::round_to_cents;
use super::allocation_resolver::{ResolveScope, resolve_allocations};
use super::data_selection::DataSelector;
use super::proration::over_allocated_runs;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Calculates the free capacity of `profile_id` over `range`.
///
/// Records and allocations of other profiles are ignored. Hours come from
/// the record governing each day under the blended policy; a day without a
/// governing record adds no hours but still counts towards the minimum.
///
/// # Example
///
/// ```
/// use distribution_engine::calculation::free_capacity;
/// use distribution_engine::models::DateRange;
/// use rust_decimal::Decimal;
///
/// let range = DateRange::parse("2025-01-01", "2025-01-31").unwrap();
/// let result = free_capacity(1, &[], &[], range);
/// assert_eq!(result.minimum_free_percentage, Decimal::ONE_HUNDRED);
/// assert_eq!(result.free_ranges.len(), 1);
/// ```
pub fn free_capacity(
    profile_id: ProfileId,
    payroll_records: &[PayrollRecord],
    allocations: &[Allocation],
    range: DateRange,
) -> FreeCapacityResult {
    let allocations = resolve_allocations(
        allocations,
        profile_id,
        range.start(),
        range.end(),
        ResolveScope::All,
    );
    let selector = DataSelector::new(
        payroll_records.iter().filter(|r| r.profile_id == profile_id),
        range,
        DataMode::Blended,
    );

    let mut minimum = HUNDRED;
    let mut free_hours = Decimal::ZERO;
    let mut free_ranges: Vec<FreeRange> = Vec::new();
    let mut over_allocated: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

    for date in range.iter_days() {
        let occupied: Decimal = allocations
            .iter()
            .filter(|a| a.is_active_on(date))
            .map(|a| a.percentage)
            .sum();
        if occupied > HUNDRED {
            over_allocated.insert(date, occupied);
        }

        let free = (HUNDRED - occupied).max(Decimal::ZERO).normalize();
        minimum = minimum.min(free);

        if let Some(record) = selector.governing_record(date) {
            free_hours += free * record.hours_per_day() / HUNDRED;
        }

        match free_ranges.last_mut() {
            Some(run) if run.percentage == free => run.end_date = date,
            _ => free_ranges.push(FreeRange {
                percentage: free,
                start_date: date,
                end_date: date,
            }),
        }
    }

    // The result has no warning list, so over-allocation is only logged.
    let runs = over_allocated_runs(&over_allocated);
    for run in &runs {
        run.log(profile_id);
    }

    debug!(
        profile_id,
        allocations = allocations.len(),
        ranges = free_ranges.len(),
        over_allocated_runs = runs.len(),
        "Calculated free capacity"
    );

    FreeCapacityResult {
        profile_id,
        minimum_free_percentage: minimum.normalize(),
        total_free_hours: round_to_cents(free_hours),
        free_ranges,
    }
}
