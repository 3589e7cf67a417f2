use crate::{CalendarMath, CompareResult, DateInput, DateParser, DurationConverter, ParseError};

impl<P, C> CalendarMath<P, C>
where
    P: DateParser,
    C: DurationConverter,
{
    /// Checks if `date` lies within `start..=end` at day granularity.
    /// All three operands are read with the base pattern; callers with other
    /// patterns should resolve them first.
    ///
    /// A missing operand is never in range.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when an operand is text that does not parse.
    pub fn in_range<'a>(
        &self,
        date: impl Into<DateInput<'a>>,
        start: impl Into<DateInput<'a>>,
        end: impl Into<DateInput<'a>>,
    ) -> Result<bool, ParseError> {
        let date = date.into();

        // Contained unless before the start or after the end
        let after_start = self
            .compare(date, start, None)?
            .is_some_and(|ord| ord != CompareResult::Less);
        if !after_start {
            return Ok(false);
        }
        let before_end = self
            .compare(date, end, None)?
            .is_some_and(|ord| ord != CompareResult::Greater);
        Ok(before_end)
    }
}
