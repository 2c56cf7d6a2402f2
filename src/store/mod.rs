//! Storage collaborator for the Distribution Engine.
//!
//! The engine never reads data itself. Callers hand it slices directly, or
//! inject a [`DistributionStore`] that answers the four queries a
//! calculation needs.
//!
//! - [`memory`]: the immutable in-memory store used by the server and tests

pub mod memory;

pub use memory::InMemoryStore;

use crate::error::EngineResult;
use crate::models::{Allocation, DateRange, PayrollRecord, Profile, ProfileId};

/// Read access to profiles, payroll records and allocations.
///
/// Implementations must return the full matching set for every query. The
/// engine assumes nothing about the order beyond it being stable between
/// identical calls.
///
/// # Example
///
/// ```
/// use distribution_engine::store::{DistributionStore, InMemoryStore};
/// use distribution_engine::models::{DateRange, Profile};
///
/// let store = InMemoryStore::new(
///     vec![Profile { id: 1, name: "Ana Ruiz".to_string(), national_id: "12345678Z".to_string() }],
///     vec![],
///     vec![],
/// );
/// let window = DateRange::parse("2025-01-01", "2025-01-31").unwrap();
///
/// assert_eq!(store.profiles().unwrap().len(), 1);
/// assert!(store.payroll_records(1, window).unwrap().is_empty());
/// ```
pub trait DistributionStore: Send + Sync {
    /// All profiles, in a stable order.
    fn profiles(&self) -> EngineResult<Vec<Profile>>;

    /// The profile with `id`, if it exists.
    fn profile(&self, id: ProfileId) -> EngineResult<Option<Profile>>;

    /// Payroll records of `profile_id` whose period overlaps `window`.
    fn payroll_records(
        &self,
        profile_id: ProfileId,
        window: DateRange,
    ) -> EngineResult<Vec<PayrollRecord>>;

    /// Allocations of `profile_id` whose period overlaps `window`.
    fn allocations(
        &self,
        profile_id: ProfileId,
        window: DateRange,
    ) -> EngineResult<Vec<Allocation>>;
}
