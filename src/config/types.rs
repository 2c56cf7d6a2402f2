//! Configuration types for the Distribution Engine.
//!
//! This module contains the strongly-typed structures deserialized from the
//! engine settings file and from the YAML snapshot files.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{ContractStatus, PayrollRecord, Profile, ProfileId, Project, ProjectId};

/// Default cap on the number of days in a query range.
pub const DEFAULT_MAX_QUERY_DAYS: i64 = 3660;

/// Default address the HTTP server binds to.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Engine settings from `engine.yaml`.
///
/// Every field is optional in the file and falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Longest query range, in days, accepted at the boundary.
    pub max_query_days: i64,
    /// Address the HTTP server binds to.
    pub bind_address: String,
    /// Snapshot directory, relative to the configuration directory.
    pub data_dir: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_query_days: DEFAULT_MAX_QUERY_DAYS,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Profiles file structure (`profiles.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesFile {
    /// The tracked profiles, in output order.
    pub profiles: Vec<Profile>,
}

/// Projects file structure (`projects.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsFile {
    /// The projects allocations may refer to.
    pub projects: Vec<Project>,
}

/// Payroll records file structure (`payroll_records.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollRecordsFile {
    /// The payroll records, in tie-break order.
    pub payroll_records: Vec<PayrollRecord>,
}

/// An allocation as stored in `allocations.yaml`, referring to its project by id.
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationEntry {
    /// Unique identifier for the allocation.
    pub id: u64,
    /// The allocated profile.
    pub profile_id: ProfileId,
    /// The project receiving the effort.
    pub project_id: ProjectId,
    /// Share of the profile's effort, from 0 to 100.
    pub percentage: Decimal,
    /// First day of the allocation (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the allocation (inclusive).
    pub period_end: NaiveDate,
    /// Contract regime of the allocation.
    pub contract_status: ContractStatus,
}

/// Allocations file structure (`allocations.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationsFile {
    /// The allocations.
    pub allocations: Vec<AllocationEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: EngineSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.max_query_days, 3660);
        assert_eq!(settings.bind_address, "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_settings_keep_other_defaults() {
        let settings: EngineSettings = serde_yaml::from_str("max_query_days: 366\n").unwrap();
        assert_eq!(settings.max_query_days, 366);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_allocation_entry_parses_project_id() {
        let yaml = r#"
allocations:
  - id: 1
    profile_id: 2
    project_id: 10
    percentage: "50"
    period_start: 2025-01-01
    period_end: 2025-01-31
    contract_status: legacy
"#;
        let file: AllocationsFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.allocations.len(), 1);
        assert_eq!(file.allocations[0].project_id, 10);
        assert_eq!(file.allocations[0].contract_status, ContractStatus::Legacy);
    }
}
