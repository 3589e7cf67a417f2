use crate::consts::ISO_FORMAT;
use crate::parse::Pattern;
use crate::prelude::*;
use std::fmt;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A normalized calendar date and wall-clock time in a fixed UTC offset.
///
/// The calendar components (`year`, `month_index`, `day`, ...) are read in the
/// value's own offset. Equality and ordering compare instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct CalendarValue(OffsetDateTime);

impl CalendarValue {
    /// Creates a value from a wall-clock date-time observed at `offset`
    pub const fn new(datetime: PrimitiveDateTime, offset: UtcOffset) -> Self {
        Self(datetime.assume_offset(offset))
    }

    /// Returns the full year
    #[inline]
    pub const fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the zero-based month index (0 = January)
    #[inline]
    pub fn month_index(&self) -> usize {
        usize::from(self.month_number()) - 1
    }

    /// Returns the month number (1 = January)
    #[inline]
    pub const fn month_number(&self) -> u8 {
        self.0.month() as u8
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.0.day()
    }

    #[inline]
    pub const fn hour(&self) -> u8 {
        self.0.hour()
    }

    #[inline]
    pub const fn minute(&self) -> u8 {
        self.0.minute()
    }

    #[inline]
    pub const fn second(&self) -> u8 {
        self.0.second()
    }

    #[inline]
    pub const fn offset(&self) -> UtcOffset {
        self.0.offset()
    }

    /// Returns the calendar date, dropping the time of day
    #[inline]
    pub const fn date(&self) -> Date {
        self.0.date()
    }

    /// Returns the underlying `time` value
    #[inline]
    pub const fn as_offset_datetime(&self) -> OffsetDateTime {
        self.0
    }

    /// Re-expresses the same instant in another offset
    pub fn to_offset(self, offset: UtcOffset) -> Self {
        Self(self.0.to_offset(offset))
    }

    /// Milliseconds from `self` to `later`, negative when `later` comes first.
    pub(crate) fn millis_until(&self, later: &Self) -> i64 {
        let millis = (later.0 - self.0).whole_milliseconds();
        i64::try_from(millis).unwrap_or(if millis.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// Renders the value with a moment-style pattern (see [`Pattern`]).
    ///
    /// # Errors
    /// Returns the `time` formatting error if a component cannot be rendered.
    pub fn format(&self, pattern: &str) -> Result<String, time::error::Format> {
        Pattern::compile(pattern).render(self)
    }
}

impl fmt::Display for CalendarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.format(ISO_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// A date operand as callers hand it over: text still to be parsed, an
/// already-typed value, or nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput<'a> {
    /// No date was supplied
    Missing,
    /// Text to parse against a pattern
    Text(&'a str),
    /// Already normalized, used as-is
    Value(CalendarValue),
    /// Wall-clock value without an offset; takes the engine's local offset
    Naive(PrimitiveDateTime),
}

impl DateInput<'_> {
    /// Returns `true` for [`DateInput::Missing`]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<CalendarValue> for DateInput<'_> {
    fn from(value: CalendarValue) -> Self {
        Self::Value(value)
    }
}

impl From<OffsetDateTime> for DateInput<'_> {
    fn from(value: OffsetDateTime) -> Self {
        Self::Value(CalendarValue(value))
    }
}

impl From<PrimitiveDateTime> for DateInput<'_> {
    fn from(value: PrimitiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<Date> for DateInput<'_> {
    fn from(value: Date) -> Self {
        Self::Naive(value.midnight())
    }
}

impl<'a, T> From<Option<T>> for DateInput<'a>
where
    T: Into<DateInput<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}
