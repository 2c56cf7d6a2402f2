//! Data selection policy.
//!
//! Decides, for every day of a query range, which of a profile's payroll
//! records governs that day under a [`DataMode`].
//!
//! The decision is made per day: an actual record covering part of a month
//! only suppresses estimates on the days it covers.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{DataMode, DateRange, PayrollRecord, RecordKind};

use super::interval::overlaps;

/// Two records of the same kind that both cover at least one day.
///
/// The earlier record in input order wins those days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordOverlap {
    /// The record that governs the contested days.
    pub kept_record_id: u64,
    /// The record that was ignored on the contested days.
    pub ignored_record_id: u64,
}

/// Per-day record selection over a query range.
///
/// # Example
///
/// ```
/// use distribution_engine::calculation::DataSelector;
/// use distribution_engine::models::{DataMode, DateRange, PayrollRecord, RecordKind};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = PayrollRecord {
///     id: 1,
///     profile_id: 1,
///     kind: RecordKind::Estimated,
///     wage: Decimal::new(3100, 0),
///     employer_contribution: Decimal::ZERO,
///     hours: Decimal::new(155, 0),
///     period_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     period_end: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
///     company: "Acme".to_string(),
///     lower_multiplier: 0.0,
///     upper_multiplier: 0.0,
/// };
/// let range = DateRange::parse("2025-01-01", "2025-01-31").unwrap();
/// let records = [record];
///
/// let selector = DataSelector::new(&records, range, DataMode::Actual);
/// assert!(selector.governing_record(range.start()).is_none());
///
/// let selector = DataSelector::new(&records, range, DataMode::Blended);
/// assert_eq!(selector.governing_record(range.start()).map(|r| r.id), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct DataSelector<'a> {
    range: DateRange,
    records: Vec<&'a PayrollRecord>,
    governing: Vec<Option<usize>>,
    record_overlaps: BTreeSet<RecordOverlap>,
}

impl<'a> DataSelector<'a> {
    /// Builds the selection for `range`.
    ///
    /// Records that do not overlap the range are ignored. The remaining
    /// records keep their input order, which is the tie-break order.
    pub fn new(
        records: impl IntoIterator<Item = &'a PayrollRecord>,
        range: DateRange,
        mode: DataMode,
    ) -> Self {
        let records: Vec<&PayrollRecord> = records
            .into_iter()
            .filter(|r| overlaps(r.period_start, r.period_end, range.start(), range.end()))
            .collect();

        let mut governing = Vec::with_capacity(range.days().max(0) as usize);
        let mut record_overlaps = BTreeSet::new();

        for date in range.iter_days() {
            let selected = select_record(&records, date, mode);
            if let Some(index) = selected {
                let kept = records[index];
                record_overlaps.extend(
                    records
                        .iter()
                        .skip(index + 1)
                        .filter(|r| r.kind == kept.kind && r.covers(date))
                        .map(|r| RecordOverlap {
                            kept_record_id: kept.id,
                            ignored_record_id: r.id,
                        }),
                );
            }
            governing.push(selected);
        }

        Self {
            range,
            records,
            governing,
            record_overlaps,
        }
    }

    /// The query range this selection covers.
    pub fn range(&self) -> DateRange {
        self.range
    }

    /// The record governing `date`, if any.
    pub fn governing_record(&self, date: NaiveDate) -> Option<&'a PayrollRecord> {
        self.governing_index(date).map(|index| self.records[index])
    }

    /// Returns true if `record` governs `date`.
    pub fn governs(&self, record: &PayrollRecord, date: NaiveDate) -> bool {
        self.governing_record(date)
            .is_some_and(|governing| std::ptr::eq(governing, record))
    }

    /// Records that govern at least one day, in input order.
    pub fn governing_records(&self) -> Vec<&'a PayrollRecord> {
        let used: BTreeSet<usize> = self.governing.iter().flatten().copied().collect();
        used.into_iter().map(|index| self.records[index]).collect()
    }

    /// Same-kind record overlaps found while selecting.
    pub fn record_overlaps(&self) -> impl Iterator<Item = &RecordOverlap> {
        self.record_overlaps.iter()
    }

    fn governing_index(&self, date: NaiveDate) -> Option<usize> {
        if !self.range.contains_date(date) {
            return None;
        }
        let offset = (date - self.range.start()).num_days() as usize;
        self.governing.get(offset).copied().flatten()
    }
}

/// Picks the record governing `date` under `mode`, as an index into `records`.
fn select_record(records: &[&PayrollRecord], date: NaiveDate, mode: DataMode) -> Option<usize> {
    let first_of_kind = |kind: RecordKind| {
        records
            .iter()
            .position(|r| r.kind == kind && r.covers(date))
    };

    match mode {
        DataMode::Actual => first_of_kind(RecordKind::Actual),
        DataMode::Estimated => first_of_kind(RecordKind::Estimated),
        DataMode::Blended => {
            first_of_kind(RecordKind::Actual).or_else(|| first_of_kind(RecordKind::Estimated))
        }
    }
}
