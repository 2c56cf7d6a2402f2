//! In-memory store.
//!
//! Holds a snapshot of profiles, payroll records and allocations loaded once
//! at startup. The snapshot is never mutated afterwards, so the store can be
//! shared across request handlers without locking.

use crate::calculation::overlaps;
use crate::error::EngineResult;
use crate::models::{Allocation, DateRange, PayrollRecord, Profile, ProfileId};

use super::DistributionStore;

/// Immutable in-memory implementation of [`DistributionStore`].
///
/// Queries return entries in snapshot order, which is the tie-break order
/// for overlapping payroll records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    profiles: Vec<Profile>,
    payroll_records: Vec<PayrollRecord>,
    allocations: Vec<Allocation>,
}

impl InMemoryStore {
    /// Creates a store over an already validated snapshot.
    pub fn new(
        profiles: Vec<Profile>,
        payroll_records: Vec<PayrollRecord>,
        allocations: Vec<Allocation>,
    ) -> Self {
        Self {
            profiles,
            payroll_records,
            allocations,
        }
    }

    /// Number of profiles in the snapshot.
    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    /// Number of payroll records in the snapshot.
    pub fn payroll_record_count(&self) -> usize {
        self.payroll_records.len()
    }

    /// Number of allocations in the snapshot.
    pub fn allocation_count(&self) -> usize {
        self.allocations.len()
    }
}

impl DistributionStore for InMemoryStore {
    fn profiles(&self) -> EngineResult<Vec<Profile>> {
        Ok(self.profiles.clone())
    }

    fn profile(&self, id: ProfileId) -> EngineResult<Option<Profile>> {
        Ok(self.profiles.iter().find(|p| p.id == id).cloned())
    }

    fn payroll_records(
        &self,
        profile_id: ProfileId,
        window: DateRange,
    ) -> EngineResult<Vec<PayrollRecord>> {
        Ok(self
            .payroll_records
            .iter()
            .filter(|r| r.profile_id == profile_id)
            .filter(|r| overlaps(r.period_start, r.period_end, window.start(), window.end()))
            .cloned()
            .collect())
    }

    fn allocations(
        &self,
        profile_id: ProfileId,
        window: DateRange,
    ) -> EngineResult<Vec<Allocation>> {
        Ok(self
            .allocations
            .iter()
            .filter(|a| a.profile_id == profile_id)
            .filter(|a| overlaps(a.period_start, a.period_end, window.start(), window.end()))
            .cloned()
            .collect())
    }
}
