//! Core data models for the Distribution Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allocation;
mod calculation_result;
mod payroll_record;
mod profile;
mod query;

pub use allocation::{Allocation, ContractStatus};
pub use calculation_result::{
    CalculationResult, CalculationWarning, FreeCapacityResult, FreeRange, MonthResult,
    ProfileResult, ProjectMonthEntry, Totals,
};
pub use payroll_record::{PayrollRecord, RecordKind};
pub use profile::{Profile, ProfileId, Project, ProjectId};
pub use query::{CalculationFilters, DataMode, DateRange};
