//! Calculation logic for the Distribution Engine.
//!
//! This module contains the distribution pipeline: day-granular interval
//! math, per-day payroll record selection, allocation resolution, the
//! proration of records across allocations and calendar months, result
//! aggregation with cent rounding, and the free-capacity calculation.

mod aggregator;
mod allocation_resolver;
mod data_selection;
mod distribution;
mod free_capacity;
mod interval;
mod proration;

pub use aggregator::{aggregate_profile, build_result, round_to_cents};
pub use allocation_resolver::{ResolveScope, resolve_allocations};
pub use data_selection::{DataSelector, RecordOverlap};
pub use distribution::{
    INVALID_ALLOCATION_WARNING, INVALID_RECORD_WARNING, calculate, calculate_from_store,
    free_capacity_from_store,
};
pub use free_capacity::free_capacity;
pub use interval::{MonthSpan, days_between, intersect, month_key, month_spans, overlaps};
pub use proration::{
    Amounts, EntryKey, OVER_ALLOCATED_WARNING, OVERLAPPING_RECORDS_WARNING, ProfileDistribution,
    prorate_profile,
};
