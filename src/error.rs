//! Error types for the Distribution Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition the engine or its boundary can reject.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Distribution Engine.
///
/// Only caller faults and broken snapshot data surface as errors. Data
/// anomalies found mid-calculation degrade to warnings instead.
///
/// # Example
///
/// ```
/// use distribution_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date string could not be parsed as a calendar date.
    #[error("Invalid date for '{field}': {value}")]
    InvalidDate {
        /// The request field holding the date.
        field: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// The query range starts after it ends.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// The query range is longer than the configured limit.
    #[error("Date range of {days} days exceeds the maximum of {max_days} days")]
    RangeTooLarge {
        /// The number of days requested.
        days: i64,
        /// The configured maximum.
        max_days: i64,
    },

    /// A profile referenced by id does not exist.
    #[error("Profile not found: {id}")]
    ProfileNotFound {
        /// The missing profile id.
        id: u64,
    },

    /// A payroll record in the snapshot violates the data model.
    #[error("Invalid payroll record {id}: {message}")]
    InvalidPayrollRecord {
        /// The record id.
        id: u64,
        /// A description of what made the record invalid.
        message: String,
    },

    /// An allocation in the snapshot violates the data model.
    #[error("Invalid allocation {id}: {message}")]
    InvalidAllocation {
        /// The allocation id.
        id: u64,
        /// A description of what made the allocation invalid.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The storage collaborator failed to answer a query.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
