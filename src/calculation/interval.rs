//! Day-granular interval math over closed date ranges.
//!
//! Every range in the engine is a pair of inclusive calendar dates. These
//! helpers are the only place overlap and day counting are defined.

use chrono::{Datelike, Days, NaiveDate};

/// Returns the inclusive number of days in `[start, end]`.
///
/// Returns 0 when `end` is before `start`.
///
/// # Example
///
/// ```
/// use distribution_engine::calculation::days_between;
/// use chrono::NaiveDate;
///
/// let jan_1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// let jan_10 = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
/// assert_eq!(days_between(jan_1, jan_10), 10);
/// assert_eq!(days_between(jan_10, jan_1), 0);
/// ```
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return 0;
    }
    (end - start).num_days() + 1
}

/// Returns true if `[start1, end1]` and `[start2, end2]` share at least one day.
pub fn overlaps(start1: NaiveDate, end1: NaiveDate, start2: NaiveDate, end2: NaiveDate) -> bool {
    start1 <= end2 && end1 >= start2
}

/// Returns the intersection of two closed ranges, or `None` if it is empty.
///
/// # Example
///
/// ```
/// use distribution_engine::calculation::intersect;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
/// assert_eq!(intersect(d(1), d(10), d(5), d(20)), Some((d(5), d(10))));
/// assert_eq!(intersect(d(1), d(4), d(5), d(20)), None);
/// ```
pub fn intersect(
    start1: NaiveDate,
    end1: NaiveDate,
    start2: NaiveDate,
    end2: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let start = start1.max(start2);
    let end = end1.min(end2);
    (start <= end).then_some((start, end))
}

/// Returns the `YYYY-MM` key of the month containing `date`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// A part of a range that falls inside a single calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    /// First day of the sub-span.
    pub start: NaiveDate,
    /// Last day of the sub-span.
    pub end: NaiveDate,
}

impl MonthSpan {
    /// The `YYYY-MM` key of the month this span belongs to.
    pub fn key(&self) -> String {
        month_key(self.start)
    }

    /// Inclusive number of days in the span.
    pub fn days(&self) -> i64 {
        days_between(self.start, self.end)
    }
}

/// Splits `[start, end]` into calendar-month sub-spans, in chronological order.
///
/// Returns an empty list when `end` is before `start`.
pub fn month_spans(start: NaiveDate, end: NaiveDate) -> Vec<MonthSpan> {
    let mut spans = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        let span_end = last_day_of_month(cursor).min(end);
        spans.push(MonthSpan {
            start: cursor,
            end: span_end,
        });
        match span_end.checked_add_days(Days::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    spans
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first_of_next = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
