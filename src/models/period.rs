//! Calendar month ranges
//!
//! Every aggregate in the application is bucketed by calendar month: budget
//! windows, the six-month trend and the month-over-month dashboard figures.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single calendar month, identified by its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthRange {
    first: NaiveDate,
}

impl MonthRange {
    /// Earliest year accepted from user input
    pub const MIN_YEAR: i32 = 1;

    /// Latest year accepted from user input
    pub const MAX_YEAR: i32 = 9999;

    /// Create a range for the given year and month (1-12)
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Whether `year` lies in the supported range
    pub fn is_supported_year(year: i32) -> bool {
        (Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year)
    }

    /// The month containing `date`
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            first: date - Duration::days(i64::from(date.day0())),
        }
    }

    /// The month containing today's local date
    pub fn current() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First day of the month
    pub fn start(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month (inclusive)
    pub fn end(&self) -> NaiveDate {
        let next = self.next();
        if next == *self {
            return NaiveDate::MAX;
        }
        next.first - Duration::days(1)
    }

    /// Midnight at the start of the first day
    pub fn start_instant(&self) -> NaiveDateTime {
        self.first.and_time(NaiveTime::MIN)
    }

    /// The last representable instant of the last day (23:59:59.999999999)
    pub fn end_instant(&self) -> NaiveDateTime {
        self.end().and_time(NaiveTime::MIN) + (Duration::days(1) - Duration::nanoseconds(1))
    }

    /// Whether `date` falls within this month, bounds included
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.end()
    }

    /// Whether an instant falls within this month, bounds included
    pub fn contains_instant(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start_instant() && instant <= self.end_instant()
    }

    /// The following month
    ///
    /// Saturates at the last month chrono can represent.
    pub fn next(&self) -> Self {
        // Day 1 + 32 days always lands in the next month.
        match self.first.checked_add_signed(Duration::days(32)) {
            Some(date) => Self::for_date(date),
            None => *self,
        }
    }

    /// The preceding month
    ///
    /// Saturates at the first month chrono can represent.
    pub fn prev(&self) -> Self {
        match self.first.pred_opt() {
            Some(date) => Self::for_date(date),
            None => *self,
        }
    }

    /// `count` contiguous months ending with the month of `reference`,
    /// oldest first
    pub fn trailing(reference: NaiveDate, count: usize) -> Vec<Self> {
        let mut months = Vec::with_capacity(count);
        let mut month = Self::for_date(reference);
        for _ in 0..count {
            months.push(month);
            month = month.prev();
        }
        months.reverse();
        months
    }

    /// The six months ending with the month of `reference`, oldest first
    pub fn last_six_months(reference: NaiveDate) -> Vec<Self> {
        Self::trailing(reference, 6)
    }

    /// Abbreviated month name, e.g. "Jan"
    pub fn short_label(&self) -> String {
        self.first.format("%b").to_string()
    }

    /// Full month name and year, e.g. "January 2026"
    pub fn long_label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// Parse a month string
    ///
    /// Accepts "2025-01" or a full date ("2025-01-17"), which selects the
    /// month containing it.
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            if !Self::is_supported_year(date.year()) {
                return Err(PeriodParseError::YearOutOfRange(date.year()));
            }
            return Ok(Self::for_date(date));
        }

        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| PeriodParseError::InvalidFormat(s.to_string()))?;
        let year: i32 = year
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

        if !Self::is_supported_year(year) {
            return Err(PeriodParseError::YearOutOfRange(year));
        }

        Self::new(year, month).ok_or(PeriodParseError::InvalidMonth(month))
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Error type for month parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
    YearOutOfRange(i32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => {
                write!(f, "Invalid month '{}': expected YYYY-MM", s)
            }
            Self::InvalidMonth(m) => write!(f, "Invalid month number: {}", m),
            Self::YearOutOfRange(y) => write!(
                f,
                "Year {} is out of range ({}-{})",
                y,
                MonthRange::MIN_YEAR,
                MonthRange::MAX_YEAR
            ),
        }
    }
}

impl std::error::Error for PeriodParseError {}
