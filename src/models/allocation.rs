//! Allocation model.
//!
//! An allocation assigns a percentage of a profile's effort to a project
//! over a closed date range.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::profile::{ProfileId, Project};

/// The contract regime an allocation was made under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    /// Allocated under the previous contract terms.
    Legacy,
    /// Allocated under the current contract terms.
    New,
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractStatus::Legacy => write!(f, "legacy"),
            ContractStatus::New => write!(f, "new"),
        }
    }
}

/// A dated, percentage-based assignment of a profile to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Unique identifier for the allocation.
    pub id: u64,
    /// The allocated profile.
    pub profile_id: ProfileId,
    /// The project receiving the effort.
    pub project: Project,
    /// Share of the profile's effort, from 0 to 100.
    pub percentage: Decimal,
    /// First day of the allocation (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the allocation (inclusive).
    pub period_end: NaiveDate,
    /// Contract regime of the allocation.
    pub contract_status: ContractStatus,
}

impl Allocation {
    /// Returns true if the allocation is active on `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }

    /// Rejects percentages outside `0..=100`.
    pub fn validate(&self) -> EngineResult<()> {
        if self.percentage < Decimal::ZERO || self.percentage > Decimal::ONE_HUNDRED {
            return Err(EngineError::InvalidAllocation {
                id: self.id,
                message: format!(
                    "percentage must be between 0 and 100, got {}",
                    self.percentage
                ),
            });
        }
        Ok(())
    }
}
