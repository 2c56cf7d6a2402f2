//! Payroll record model.
//!
//! A payroll record is one reporting period of wage, employer contribution
//! and hours for a profile, tagged as actual or estimated data.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::days_between;
use crate::error::{EngineError, EngineResult};

use super::profile::ProfileId;

/// Whether a payroll record holds actual or estimated figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Figures taken from a processed payroll.
    Actual,
    /// Forecast figures used until actual data exists.
    Estimated,
}

/// A dated period of recorded wage, contribution and hours for a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: u64,
    /// The profile this record belongs to.
    pub profile_id: ProfileId,
    /// Actual or estimated data.
    pub kind: RecordKind,
    /// Gross wage accrued over the period.
    pub wage: Decimal,
    /// Employer social-security contribution over the period.
    pub employer_contribution: Decimal,
    /// Hours worked over the period.
    pub hours: Decimal,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// The employing company.
    pub company: String,
    /// Lower contribution-base multiplier. Not used by the engine.
    #[serde(default)]
    pub lower_multiplier: f64,
    /// Upper contribution-base multiplier. Not used by the engine.
    #[serde(default)]
    pub upper_multiplier: f64,
}

impl PayrollRecord {
    /// Returns true if the record's period includes `date`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.period_start && date <= self.period_end
    }

    /// Hours per calendar day over the full, unclipped period.
    ///
    /// Returns zero for an inverted period instead of dividing by zero.
    ///
    /// # Example
    ///
    /// ```
    /// use distribution_engine::models::{PayrollRecord, RecordKind};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let record = PayrollRecord {
    ///     id: 1,
    ///     profile_id: 1,
    ///     kind: RecordKind::Actual,
    ///     wage: Decimal::new(1000, 0),
    ///     employer_contribution: Decimal::ZERO,
    ///     hours: Decimal::new(80, 0),
    ///     period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ///     period_end: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
    ///     company: "Acme".to_string(),
    ///     lower_multiplier: 0.0,
    ///     upper_multiplier: 0.0,
    /// };
    /// assert_eq!(record.hours_per_day(), Decimal::new(8, 0));
    /// ```
    pub fn hours_per_day(&self) -> Decimal {
        let days = days_between(self.period_start, self.period_end);
        if days <= 0 {
            return Decimal::ZERO;
        }
        self.hours / Decimal::from(days)
    }

    /// Rejects negative wage, contribution or hours.
    ///
    /// Inverted periods are accepted; they govern no days and contribute zero.
    pub fn validate(&self) -> EngineResult<()> {
        let negative = [
            ("wage", self.wage),
            ("employer_contribution", self.employer_contribution),
            ("hours", self.hours),
        ]
        .into_iter()
        .find(|(_, value)| *value < Decimal::ZERO);

        match negative {
            Some((field, value)) => Err(EngineError::InvalidPayrollRecord {
                id: self.id,
                message: format!("{} must not be negative, got {}", field, value),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_record(start: &str, end: &str, hours: &str) -> PayrollRecord {
        PayrollRecord {
            id: 1,
            profile_id: 1,
            kind: RecordKind::Estimated,
            wage: dec("2000"),
            employer_contribution: dec("600"),
            hours: dec(hours),
            period_start: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            period_end: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
            company: "Acme".to_string(),
            lower_multiplier: 1.0,
            upper_multiplier: 1.0,
        }
    }

    #[test]
    fn test_deserialize_record_with_string_decimals() {
        let json = r#"{
            "id": 9,
            "profile_id": 2,
            "kind": "actual",
            "wage": "1500.50",
            "employer_contribution": "450.15",
            "hours": "120.5",
            "period_start": "2025-02-01",
            "period_end": "2025-02-28",
            "company": "Acme"
        }"#;

        let record: PayrollRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, RecordKind::Actual);
        assert_eq!(record.wage, dec("1500.50"));
        assert_eq!(record.hours, dec("120.5"));
        assert_eq!(record.lower_multiplier, 0.0);
    }

    #[test]
    fn test_covers_is_inclusive_of_both_ends() {
        let record = create_test_record("2025-01-01", "2025-01-31", "160");
        assert!(record.covers(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
        assert!(record.covers(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()));
        assert!(!record.covers(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()));
    }

    #[test]
    fn test_hours_per_day_uses_full_period() {
        let record = create_test_record("2025-04-01", "2025-04-30", "150");
        assert_eq!(record.hours_per_day(), dec("5"));
    }

    #[test]
    fn test_validate_rejects_negative_amounts() {
        let mut record = create_test_record("2025-04-01", "2025-04-30", "150");
        assert!(record.validate().is_ok());

        record.hours = dec("-1");
        match record.validate() {
            Err(EngineError::InvalidPayrollRecord { id, message }) => {
                assert_eq!(id, 1);
                assert!(message.contains("hours"));
            }
            _ => panic!("Expected InvalidPayrollRecord error"),
        }
    }

    #[test]
    fn test_hours_per_day_inverted_period_is_zero() {
        let record = create_test_record("2025-04-30", "2025-04-01", "150");
        assert_eq!(record.hours_per_day(), Decimal::ZERO);
    }
}
