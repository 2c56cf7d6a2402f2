//! Request types for the Distribution Engine API.
//!
//! This module defines the JSON body of the `/calculate` endpoint and the
//! query string of the free-capacity endpoint.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{CalculationFilters, DataMode, DateRange};

/// Request body for the `/calculate` endpoint.
///
/// Dates arrive as strings so an unparsable date is reported as a
/// descriptive `INVALID_DATE` error rather than a generic JSON error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// First day of the query range, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day of the query range, `YYYY-MM-DD`.
    pub end_date: String,
    /// Which payroll data the calculation uses.
    pub data_mode: DataMode,
    /// Optional restrictions.
    #[serde(default)]
    pub filters: CalculationFilters,
}

impl CalculationRequest {
    /// Parses and validates the query range.
    pub fn date_range(&self) -> EngineResult<DateRange> {
        DateRange::parse(&self.start_date, &self.end_date)
    }
}

/// Query string of `GET /profiles/{id}/free-capacity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeCapacityQuery {
    /// First day of the range, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day of the range, `YYYY-MM-DD`.
    pub end_date: String,
}

impl FreeCapacityQuery {
    /// Parses and validates the range.
    pub fn date_range(&self) -> EngineResult<DateRange> {
        DateRange::parse(&self.start_date, &self.end_date)
    }
}
