//! Query models: the date range, data mode and filters of a calculation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::days_between;
use crate::error::{EngineError, EngineResult};

use super::allocation::ContractStatus;
use super::profile::{ProfileId, ProjectId};

/// A closed calendar date range with `start <= end`.
///
/// The ordering invariant is checked on construction, so every `DateRange`
/// the engine receives is valid.
///
/// # Example
///
/// ```
/// use distribution_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::parse("2025-01-01", "2025-01-31").unwrap();
/// assert_eq!(range.days(), 31);
/// assert!(range.contains_date(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()));
/// assert!(DateRange::parse("2025-02-01", "2025-01-01").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses two `YYYY-MM-DD` strings into a range.
    pub fn parse(start: &str, end: &str) -> EngineResult<Self> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Self::new(start, end)
    }

    /// First day of the range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive number of days in the range.
    pub fn days(&self) -> i64 {
        days_between(self.start, self.end)
    }

    /// Checks if a date falls within the range, inclusive of both ends.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates every day of the range in order.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Rejects ranges longer than `max_days`.
    pub fn ensure_within(&self, max_days: i64) -> EngineResult<()> {
        let days = self.days();
        if days > max_days {
            return Err(EngineError::RangeTooLarge { days, max_days });
        }
        Ok(())
    }
}

fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Which payroll data a calculation is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataMode {
    /// Only actual records.
    Actual,
    /// Only estimated records.
    Estimated,
    /// Actual records where they exist for a day, estimates otherwise.
    Blended,
}

/// Optional restrictions applied to a calculation.
///
/// `None` means "no restriction". Unknown ids or names simply match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationFilters {
    /// Profiles to include.
    pub profile_ids: Option<Vec<ProfileId>>,
    /// Projects whose entries are displayed.
    pub project_ids: Option<Vec<ProjectId>>,
    /// Companies whose payroll records are included.
    pub companies: Option<Vec<String>>,
    /// Contract statuses whose entries are displayed.
    pub contract_statuses: Option<Vec<ContractStatus>>,
    /// Only return profiles with unassigned hours left.
    pub only_with_free_capacity: bool,
}

impl CalculationFilters {
    /// Returns true if the profile passes the profile filter.
    pub fn includes_profile(&self, id: ProfileId) -> bool {
        self.profile_ids.as_ref().is_none_or(|ids| ids.contains(&id))
    }

    /// Returns true if the project passes the project filter.
    pub fn includes_project(&self, id: ProjectId) -> bool {
        self.project_ids.as_ref().is_none_or(|ids| ids.contains(&id))
    }

    /// Returns true if the company passes the company filter.
    pub fn includes_company(&self, company: &str) -> bool {
        self.companies
            .as_ref()
            .is_none_or(|companies| companies.iter().any(|c| c == company))
    }

    /// Returns true if the contract status passes the contract-status filter.
    pub fn includes_contract_status(&self, status: ContractStatus) -> bool {
        self.contract_statuses
            .as_ref()
            .is_none_or(|statuses| statuses.contains(&status))
    }
}
