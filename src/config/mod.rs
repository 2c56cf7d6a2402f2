//! Configuration loading for the Distribution Engine.
//!
//! This module loads the engine settings from `engine.yaml` and the YAML
//! data snapshot (profiles, projects, payroll records and allocations) that
//! backs the in-memory store.
//!
//! # Example
//!
//! ```no_run
//! use distribution_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/sample").unwrap();
//! println!("Max query range: {} days", config.settings().max_query_days);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllocationEntry, AllocationsFile, DEFAULT_BIND_ADDRESS, DEFAULT_MAX_QUERY_DAYS,
    EngineSettings, PayrollRecordsFile, ProfilesFile, ProjectsFile,
};
