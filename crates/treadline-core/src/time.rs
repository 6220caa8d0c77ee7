use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("date cannot be empty")]
    Empty,
    #[error("invalid date format: expected YYYY-MM-DD")]
    InvalidDateFormat,
    #[error("invalid date")]
    InvalidDate,
    #[error("ambiguous local time: {0}")]
    AmbiguousLocalTime(String),
}

/// Calendar month in the local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of_timestamp(ts: i64, offset: FixedOffset) -> Self {
        let local = to_local(ts, offset);
        Self::new(local.year(), local.month())
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn local_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// `count` months ending with the month containing `now_utc`, oldest first.
pub fn trailing_months(now_utc: i64, offset: FixedOffset, count: usize) -> Vec<YearMonth> {
    let mut months = Vec::with_capacity(count);
    let mut current = YearMonth::of_timestamp(now_utc, offset);
    for _ in 0..count {
        months.push(current);
        current = current.previous();
    }
    months.reverse();
    months
}

/// Start of the given local day as a UTC timestamp.
pub fn parse_local_date(input: &str, offset: FixedOffset) -> Result<i64, TimeParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| TimeParseError::InvalidDateFormat)?;
    start_of_day(date, offset)
}

pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> Result<i64, TimeParseError> {
    let naive = date.and_hms_opt(0, 0, 0).ok_or(TimeParseError::InvalidDate)?;
    local_to_utc_timestamp(naive, offset)
}

pub fn format_timestamp_date(ts: i64, offset: FixedOffset) -> String {
    to_local(ts, offset).format("%Y-%m-%d").to_string()
}

pub fn format_timestamp_datetime(ts: i64, offset: FixedOffset) -> String {
    to_local(ts, offset).format("%Y-%m-%d %H:%M").to_string()
}

fn to_local(ts: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .with_timezone(&offset)
}

fn local_to_utc_timestamp(
    naive: NaiveDateTime,
    offset: FixedOffset,
) -> Result<i64, TimeParseError> {
    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| TimeParseError::AmbiguousLocalTime(naive.to_string()))?;
    Ok(local.with_timezone(&Utc).timestamp())
}
