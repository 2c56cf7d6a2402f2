//! Calculation result models for the Distribution Engine.
//!
//! This module contains the [`CalculationResult`] type and its nested
//! per-profile, per-month and per-project structures, plus the
//! [`FreeCapacityResult`] produced by the free-capacity path.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::allocation::ContractStatus;
use super::profile::{ProfileId, ProjectId};

/// Assigned and unassigned amounts, rounded to cents.
///
/// Used for months, profiles and the global total. Each level is the sum of
/// the level below it.
///
/// # Example
///
/// ```
/// use distribution_engine::models::Totals;
/// use rust_decimal::Decimal;
///
/// let mut total = Totals::default();
/// total.wage = Decimal::new(25000, 2);
/// total.unassigned_wage = Decimal::new(60000, 2);
/// assert_eq!(total.wage + total.unassigned_wage, Decimal::new(1000, 0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Wage assigned to projects.
    pub wage: Decimal,
    /// Employer contribution assigned to projects.
    pub contribution: Decimal,
    /// Hours assigned to projects.
    pub hours: Decimal,
    /// Wage not covered by any allocation.
    pub unassigned_wage: Decimal,
    /// Employer contribution not covered by any allocation.
    pub unassigned_contribution: Decimal,
    /// Hours not covered by any allocation.
    pub unassigned_hours: Decimal,
}

impl Totals {
    /// Adds another set of totals into this one.
    pub fn accumulate(&mut self, other: &Totals) {
        self.wage += other.wage;
        self.contribution += other.contribution;
        self.hours += other.hours;
        self.unassigned_wage += other.unassigned_wage;
        self.unassigned_contribution += other.unassigned_contribution;
        self.unassigned_hours += other.unassigned_hours;
    }
}

/// Amounts attributed to one project within one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMonthEntry {
    /// The project id.
    pub project_id: ProjectId,
    /// The project display name.
    pub project_name: String,
    /// Wage attributed to the project.
    pub wage: Decimal,
    /// Employer contribution attributed to the project.
    pub contribution: Decimal,
    /// Hours attributed to the project.
    pub hours: Decimal,
    /// Company of the payroll records the amounts came from.
    pub company: String,
    /// Contract status of the allocations the amounts came from.
    pub contract_status: ContractStatus,
}

/// One calendar month of a profile's distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthResult {
    /// The month in `YYYY-MM` form.
    pub month: String,
    /// Project entries, ordered by project name.
    pub projects: Vec<ProjectMonthEntry>,
    /// Month totals: the sum of the project entries plus the month's
    /// unassigned remainder.
    pub total: Totals,
}

/// The distribution of a single profile over the query range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResult {
    /// The profile id.
    pub profile_id: ProfileId,
    /// The profile display name.
    pub profile_name: String,
    /// Months in chronological order.
    pub months: Vec<MonthResult>,
    /// Profile totals: the sum of the month totals.
    pub total: Totals,
}

/// A data-quality warning raised during a calculation.
///
/// Warnings never abort a calculation; they flag data the caller should fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
    /// The profile the warning concerns.
    pub profile_id: ProfileId,
}

/// The complete result of a distribution calculation.
///
/// Contains no timestamps or generated ids, so identical inputs always
/// serialize to identical output.
///
/// # Example
///
/// ```
/// use distribution_engine::models::{CalculationResult, Totals};
///
/// let result = CalculationResult {
///     profiles: vec![],
///     global_total: Totals::default(),
///     warnings: vec![],
/// };
/// assert!(result.profiles.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Per-profile results, in input order.
    pub profiles: Vec<ProfileResult>,
    /// The sum of the profile totals.
    pub global_total: Totals,
    /// Data-quality warnings found while calculating.
    pub warnings: Vec<CalculationWarning>,
}

/// A run of consecutive days sharing the same free percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeRange {
    /// The free percentage over the run.
    pub percentage: Decimal,
    /// First day of the run.
    pub start_date: NaiveDate,
    /// Last day of the run.
    pub end_date: NaiveDate,
}

/// Free capacity of one profile over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeCapacityResult {
    /// The profile id.
    pub profile_id: ProfileId,
    /// The lowest daily free percentage seen in the range.
    pub minimum_free_percentage: Decimal,
    /// Free hours over the range, rounded to cents.
    pub total_free_hours: Decimal,
    /// Consecutive days grouped by free percentage, chronologically.
    pub free_ranges: Vec<FreeRange>,
}
