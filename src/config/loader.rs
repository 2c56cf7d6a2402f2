//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! settings and the YAML data snapshot the in-memory store serves.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Allocation, PayrollRecord, Profile, Project, ProjectId};
use crate::store::InMemoryStore;

use super::types::{
    AllocationEntry, AllocationsFile, EngineSettings, PayrollRecordsFile, ProfilesFile,
    ProjectsFile,
};

/// Loads engine settings and the data snapshot they point to.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/sample/
/// ├── engine.yaml              # Engine settings
/// └── data/                    # Snapshot directory (`data_dir`)
///     ├── profiles.yaml
///     ├── projects.yaml
///     ├── payroll_records.yaml
///     └── allocations.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use distribution_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sample").unwrap();
/// let store = loader.load_store().unwrap();
/// println!("Serving {} profiles", store.profile_count());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: EngineSettings,
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Loads `engine.yaml` from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - `engine.yaml` contains invalid YAML
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;

        Ok(Self {
            settings,
            config_dir: path.to_path_buf(),
        })
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the snapshot directory, resolved against the configuration directory.
    pub fn data_dir(&self) -> PathBuf {
        self.config_dir.join(&self.settings.data_dir)
    }

    /// Loads the snapshot referenced by the settings into an [`InMemoryStore`].
    pub fn load_store(&self) -> EngineResult<InMemoryStore> {
        Self::load_snapshot(self.data_dir())
    }

    /// Loads and validates a snapshot directory.
    ///
    /// Allocation project ids are resolved to [`Project`] values here, so the
    /// engine never looks anything up by id. Fails with
    /// `InvalidPayrollRecord` or `InvalidAllocation` for entries that break
    /// the data model or refer to unknown profiles or projects.
    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> EngineResult<InMemoryStore> {
        let path = path.as_ref();

        let profiles_path = path.join("profiles.yaml");
        let profiles = Self::load_yaml::<ProfilesFile>(&profiles_path)?.profiles;
        Self::check_unique_profiles(&profiles, &profiles_path)?;

        let projects = Self::load_yaml::<ProjectsFile>(&path.join("projects.yaml"))?.projects;
        let projects: HashMap<ProjectId, Project> =
            projects.into_iter().map(|p| (p.id, p)).collect();

        let profile_ids: HashSet<u64> = profiles.iter().map(|p| p.id).collect();

        let payroll_records =
            Self::load_yaml::<PayrollRecordsFile>(&path.join("payroll_records.yaml"))?
                .payroll_records;
        for record in &payroll_records {
            Self::validate_record(record, &profile_ids)?;
        }

        let allocations = Self::load_yaml::<AllocationsFile>(&path.join("allocations.yaml"))?
            .allocations
            .into_iter()
            .map(|entry| Self::resolve_allocation(entry, &projects, &profile_ids))
            .collect::<EngineResult<Vec<Allocation>>>()?;

        info!(
            path = %path.display(),
            profiles = profiles.len(),
            payroll_records = payroll_records.len(),
            allocations = allocations.len(),
            "Loaded data snapshot"
        );

        Ok(InMemoryStore::new(profiles, payroll_records, allocations))
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Rejects repeated profile ids and national ids.
    fn check_unique_profiles(profiles: &[Profile], path: &Path) -> EngineResult<()> {
        let mut ids = HashSet::new();
        let mut national_ids = HashSet::new();

        for profile in profiles {
            if !ids.insert(profile.id) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("duplicate profile id {}", profile.id),
                });
            }
            if !national_ids.insert(profile.national_id.as_str()) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("duplicate national id {}", profile.national_id),
                });
            }
        }

        Ok(())
    }

    fn validate_record(record: &PayrollRecord, profile_ids: &HashSet<u64>) -> EngineResult<()> {
        if !profile_ids.contains(&record.profile_id) {
            return Err(EngineError::InvalidPayrollRecord {
                id: record.id,
                message: format!("unknown profile {}", record.profile_id),
            });
        }
        record.validate()
    }

    fn resolve_allocation(
        entry: AllocationEntry,
        projects: &HashMap<ProjectId, Project>,
        profile_ids: &HashSet<u64>,
    ) -> EngineResult<Allocation> {
        if !profile_ids.contains(&entry.profile_id) {
            return Err(EngineError::InvalidAllocation {
                id: entry.id,
                message: format!("unknown profile {}", entry.profile_id),
            });
        }

        let project = projects
            .get(&entry.project_id)
            .cloned()
            .ok_or_else(|| EngineError::InvalidAllocation {
                id: entry.id,
                message: format!("unknown project {}", entry.project_id),
            })?;

        let allocation = Allocation {
            id: entry.id,
            profile_id: entry.profile_id,
            project,
            percentage: entry.percentage,
            period_start: entry.period_start,
            period_end: entry.period_end,
            contract_status: entry.contract_status,
        };
        allocation.validate()?;
        Ok(allocation)
    }
}
