//! Allocation resolution.
//!
//! Finds the allocations of a profile that overlap a time window, optionally
//! narrowed by the calculation filters.

use chrono::NaiveDate;

use crate::models::{Allocation, CalculationFilters, ProfileId};

use super::interval::overlaps;

/// Which allocations a resolution should return.
#[derive(Debug, Clone, Copy)]
pub enum ResolveScope<'f> {
    /// Every overlapping allocation. This is the basis of the unassigned
    /// remainder and of free capacity.
    All,
    /// Only the allocations whose entries are displayed under `filters`.
    ///
    /// The company filter is matched against the payroll record's company,
    /// so a record from an excluded company resolves to nothing.
    Displayed {
        /// The calculation filters.
        filters: &'f CalculationFilters,
        /// Company of the payroll record being distributed.
        record_company: &'f str,
    },
}

impl ResolveScope<'_> {
    fn admits(&self, allocation: &Allocation) -> bool {
        match self {
            ResolveScope::All => true,
            ResolveScope::Displayed {
                filters,
                record_company,
            } => {
                filters.includes_company(record_company)
                    && filters.includes_project(allocation.project.id)
                    && filters.includes_contract_status(allocation.contract_status)
            }
        }
    }
}

/// Returns the allocations of `profile_id` overlapping `[window_start, window_end]`.
///
/// The result keeps input order, but callers must not rely on it: output
/// ordering is imposed by the aggregator.
///
/// # Example
///
/// ```
/// use distribution_engine::calculation::{resolve_allocations, ResolveScope};
/// use distribution_engine::models::{Allocation, ContractStatus, Project};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let allocation = Allocation {
///     id: 1,
///     profile_id: 1,
///     project: Project { id: 10, name: "Atlas".to_string() },
///     percentage: Decimal::new(50, 0),
///     period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     period_end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     contract_status: ContractStatus::New,
/// };
/// let allocations = [allocation];
///
/// let found = resolve_allocations(
///     &allocations,
///     1,
///     NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
///     ResolveScope::All,
/// );
/// assert_eq!(found.len(), 1);
/// ```
pub fn resolve_allocations<'a>(
    allocations: impl IntoIterator<Item = &'a Allocation>,
    profile_id: ProfileId,
    window_start: NaiveDate,
    window_end: NaiveDate,
    scope: ResolveScope<'_>,
) -> Vec<&'a Allocation> {
    allocations
        .into_iter()
        .filter(|a| a.profile_id == profile_id)
        .filter(|a| overlaps(a.period_start, a.period_end, window_start, window_end))
        .filter(|a| scope.admits(a))
        .collect()
}
