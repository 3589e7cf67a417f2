use crate::consts::MONTHS_IN_YEAR;
use crate::prelude::*;
use crate::types::days_in_month;
use crate::{CalendarMath, CalendarValue, DateInput, DateParser, DurationConverter, ParseError};
use serde::{Deserialize, Serialize};

/// The distance between two calendar dates as years, months and days.
///
/// This is a mixed-radix value, not a fixed-length span: `days` counts against
/// the length of the start month, so the same delta can cover a different
/// number of days depending on where it starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display(fmt = "{years}y {months}m {days}d")]
pub struct DateDelta {
    pub years: i32,
    /// Always `0..=11`
    pub months: i32,
    /// Always `0..=30`; below the start month's length whenever a borrow
    /// happened
    pub days: i32,
}

impl DateDelta {
    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// Subtracts `start` from `end` component-wise, borrowing like
    /// multi-digit subtraction.
    ///
    /// A negative day count borrows the length of the *start* month, which
    /// makes the operation non-commutative: `between(a, b)` is not in general
    /// the negation of `between(b, a)`.
    pub fn between(start: &CalendarValue, end: &CalendarValue) -> Self {
        let mut days = i32::from(end.day()) - i32::from(start.day());
        let mut months = i32::from(end.month_number()) - i32::from(start.month_number());
        let mut years = end.year() - start.year();

        if days < 0 {
            months -= 1;
            days += i32::from(days_in_month(start.month_index(), start.year()));
        }
        if months < 0 {
            years -= 1;
            months += MONTHS_IN_YEAR;
        }

        Self {
            years,
            months,
            days,
        }
    }
}

impl<P, C> CalendarMath<P, C>
where
    P: DateParser,
    C: DurationConverter,
{
    /// Calendar delta from `start` to `end`.
    ///
    /// Returns `Ok(None)` when either operand is missing.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when an operand is text that does not parse.
    pub fn subtract<'a>(
        &self,
        start: impl Into<DateInput<'a>>,
        end: impl Into<DateInput<'a>>,
        format: Option<&str>,
    ) -> Result<Option<DateDelta>, ParseError> {
        let operands = self.resolve_pair(start.into(), end.into(), format)?;
        Ok(operands.map(|(start, end)| DateDelta::between(&start, &end)))
    }

    /// Signed whole days from `start` to `end`, negative when `start` is
    /// later. Partial days are left to the [`DurationConverter`].
    ///
    /// Returns `Ok(None)` when either operand is missing.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when an operand is text that does not parse.
    pub fn subtract_in_days<'a>(
        &self,
        start: impl Into<DateInput<'a>>,
        end: impl Into<DateInput<'a>>,
        format: Option<&str>,
    ) -> Result<Option<i64>, ParseError> {
        let operands = self.resolve_pair(start.into(), end.into(), format)?;
        Ok(operands.map(|(start, end)| {
            self.converter
                .milliseconds_to_days(start.millis_until(&end))
        }))
    }
}
