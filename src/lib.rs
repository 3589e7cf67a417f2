mod compare;
mod config;
mod consts;
mod delta;
mod duration;
mod parse;
mod prelude;
mod range;
mod types;
mod value;

pub use compare::CompareResult;
pub use config::{CalendarConfig, ConfigError, DefaultFormats};
pub use consts::*;
pub use delta::DateDelta;
pub use duration::{DayConverter, DurationConverter};
pub use parse::{DateParser, ParseError, Pattern, PatternParser, Token};
pub use types::{MONTHS, MonthDescriptor, days_in_month, is_leap_year, month, month_name};
pub use value::{CalendarValue, DateInput};

use time::{OffsetDateTime, UtcOffset};

/// Calendar arithmetic over dates that arrive as text, typed values or not at
/// all.
///
/// Text operands are parsed with the [`DateParser`] against the caller's
/// pattern, or the base pattern (`MM-DD-YYYY`) when none is given. Raw spans
/// become day counts through the [`DurationConverter`].
#[derive(Debug, Clone)]
pub struct CalendarMath<P = PatternParser, C = DayConverter> {
    parser: P,
    converter: C,
    base_format: String,
    formats: DefaultFormats,
    local_offset: UtcOffset,
}

impl CalendarMath {
    /// Builds the default engine from a validated configuration.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if `config` does not validate.
    pub fn from_config(config: &CalendarConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let offset = config.utc_offset()?;
        Ok(Self::new(PatternParser, DayConverter)
            .with_base_format(config.base_format.clone())
            .with_formats(config.formats.clone())
            .with_local_offset(offset))
    }
}

impl Default for CalendarMath {
    fn default() -> Self {
        Self::new(PatternParser, DayConverter)
    }
}

impl<P, C> CalendarMath<P, C>
where
    P: DateParser,
    C: DurationConverter,
{
    pub fn new(parser: P, converter: C) -> Self {
        Self {
            parser,
            converter,
            base_format: BASE_FORMAT.to_owned(),
            formats: DefaultFormats::default(),
            local_offset: UtcOffset::UTC,
        }
    }

    /// Replaces the pattern used when callers pass no format
    #[must_use]
    pub fn with_base_format(mut self, base_format: impl Into<String>) -> Self {
        self.base_format = base_format.into();
        self
    }

    #[must_use]
    pub fn with_formats(mut self, formats: DefaultFormats) -> Self {
        self.formats = formats;
        self
    }

    /// Offset every operand is read in: text is parsed at it, naive inputs
    /// take it, and [`Self::now`] reports in it
    #[must_use]
    pub fn with_local_offset(mut self, offset: UtcOffset) -> Self {
        self.local_offset = offset;
        self
    }

    pub fn base_format(&self) -> &str {
        &self.base_format
    }

    pub const fn formats(&self) -> &DefaultFormats {
        &self.formats
    }

    pub const fn local_offset(&self) -> UtcOffset {
        self.local_offset
    }

    /// English name of a zero-based month index.
    ///
    /// # Panics
    /// Panics if `index` is not in `0..12`.
    pub fn month_name(&self, index: usize) -> &'static str {
        month_name(index)
    }

    /// Days in a zero-based month of `year`.
    ///
    /// # Panics
    /// Panics if `index` is not in `0..12`.
    pub fn days_in_month(&self, index: usize, year: i32) -> u8 {
        days_in_month(index, year)
    }

    /// Normalizes one operand. Typed values pass through untouched; text is
    /// parsed against `format` or the base pattern.
    ///
    /// # Errors
    /// Returns `ParseError::MissingInput` for a missing operand, or whatever
    /// the parser reports for text it cannot read.
    pub fn resolve<'a>(
        &self,
        input: impl Into<DateInput<'a>>,
        format: Option<&str>,
    ) -> Result<CalendarValue, ParseError> {
        self.resolve_operand(input.into(), format)?
            .ok_or(ParseError::MissingInput)
    }

    pub(crate) fn resolve_operand(
        &self,
        input: DateInput<'_>,
        format: Option<&str>,
    ) -> Result<Option<CalendarValue>, ParseError> {
        match input {
            DateInput::Missing => Ok(None),
            DateInput::Value(value) => Ok(Some(value)),
            DateInput::Naive(datetime) => Ok(Some(CalendarValue::new(datetime, self.local_offset))),
            DateInput::Text(text) => {
                let format = format.unwrap_or(&self.base_format);
                let value = self
                    .parser
                    .parse(text, format, self.local_offset)
                    .inspect_err(|error| {
                        tracing::debug!(input = text, format, %error, "failed to parse date");
                    })?;
                tracing::trace!(input = text, format, %value, "resolved date");
                Ok(Some(value))
            }
        }
    }

    /// Resolves both operands with one pattern. `None` if either is missing;
    /// nothing is parsed in that case.
    pub(crate) fn resolve_pair(
        &self,
        first: DateInput<'_>,
        second: DateInput<'_>,
        format: Option<&str>,
    ) -> Result<Option<(CalendarValue, CalendarValue)>, ParseError> {
        if first.is_missing() || second.is_missing() {
            return Ok(None);
        }
        let first = self.resolve_operand(first, format)?;
        let second = self.resolve_operand(second, format)?;
        Ok(first.zip(second))
    }

    /// Whether `input` is, or parses as, a date. Missing input is not a date.
    pub fn is_date<'a>(&self, input: impl Into<DateInput<'a>>, format: Option<&str>) -> bool {
        match input.into() {
            DateInput::Missing => false,
            DateInput::Value(_) | DateInput::Naive(_) => true,
            DateInput::Text(text) => self
                .parser
                .is_valid(text, format.unwrap_or(&self.base_format)),
        }
    }

    /// Parses a server timestamp with the configured ISO pattern.
    ///
    /// # Errors
    /// Returns the parser's error for malformed text.
    pub fn date_from_iso_string(&self, text: &str) -> Result<CalendarValue, ParseError> {
        self.resolve(text, Some(self.formats.iso_format.as_str()))
    }

    /// The current instant in the local offset
    pub fn now(&self) -> CalendarValue {
        CalendarValue::from(OffsetDateTime::now_utc()).to_offset(self.local_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    fn math() -> CalendarMath {
        CalendarMath::default()
    }

    #[test]
    fn test_month_table_delegates() {
        let math = math();
        assert_eq!(math.month_name(0), "January");
        assert_eq!(math.month_name(11), "December");
        assert_eq!(math.days_in_month(1, 2015), 28);
        assert_eq!(math.days_in_month(1, 2016), 29);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_days_in_month_bad_index() {
        let _ = math().days_in_month(12, 2016);
    }

    #[test]
    fn test_resolve_string_date_and_value_agree() {
        let math = math();
        let typed = CalendarValue::new(datetime!(2014-01-01 00:00), UtcOffset::UTC);

        assert_eq!(math.resolve("1/1/2014", None).unwrap(), typed);
        assert_eq!(math.resolve(typed, None).unwrap(), typed);
        assert_eq!(math.resolve(date!(2014 - 01 - 01), None).unwrap(), typed);
    }

    #[test]
    fn test_resolve_returns_values_unchanged() {
        let math = math();
        let value = CalendarValue::new(datetime!(2014-01-01 09:30), offset!(+2));
        // the pattern only applies to text
        let resolved = math.resolve(value, Some("YYYY")).unwrap();
        assert_eq!(resolved.offset(), offset!(+2));
        assert_eq!(resolved.hour(), 9);
    }

    #[test]
    fn test_resolve_naive_uses_local_offset() {
        let math = math().with_local_offset(offset!(-8));
        let value = math.resolve(datetime!(2014-01-01 00:00), None).unwrap();
        assert_eq!(value.offset(), offset!(-8));
        assert_eq!(value.day(), 1);
    }

    #[test]
    fn test_resolve_user_defined_format() {
        let math = math();
        let value = math
            .resolve("2014-1-1T00:00:00-08:00", Some(ISO_FORMAT))
            .unwrap();
        assert_eq!(
            value,
            CalendarValue::new(datetime!(2014-01-01 08:00), UtcOffset::UTC)
        );
    }

    #[test]
    fn test_resolve_errors() {
        let math = math();
        assert_eq!(
            math.resolve(None::<&str>, None),
            Err(ParseError::MissingInput)
        );
        assert!(matches!(
            math.resolve("13/1/2014", None),
            Err(ParseError::InvalidMonth(13))
        ));
    }

    #[test]
    fn test_is_date() {
        let math = math();
        assert!(math.is_date("1/1/2014", None));
        assert!(math.is_date(date!(2014 - 01 - 01), None));
        assert!(!math.is_date(None::<&str>, None));
        assert!(!math.is_date("123456", None));
        assert!(!math.is_date("", None));
    }

    #[test]
    fn test_date_from_iso_string() {
        let math = math();
        let value = math.date_from_iso_string("2015-11-24T20:12:00-07:00").unwrap();
        assert_eq!(
            value,
            CalendarValue::new(datetime!(2015-11-24 20:12:00), offset!(-7))
        );
    }

    #[test]
    fn test_from_config() {
        let config = CalendarConfig {
            base_format: "DD.MM.YYYY".into(),
            utc_offset_minutes: -420,
            ..CalendarConfig::default()
        };
        let math = CalendarMath::from_config(&config).unwrap();
        assert_eq!(math.base_format(), "DD.MM.YYYY");
        assert_eq!(math.local_offset(), offset!(-7));

        let value = math.date_from_iso_string("2015-11-24T20:12:00-07:00").unwrap();
        assert_eq!(value.offset(), offset!(-7));
        assert_eq!(value.hour(), 20);

        let value = math.resolve("24.11.2015", None).unwrap();
        assert_eq!(value.month_number(), 11);
        assert_eq!(value.day(), 24);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = CalendarConfig {
            base_format: "YYYY".into(),
            ..CalendarConfig::default()
        };
        assert!(CalendarMath::from_config(&config).is_err());
    }

    #[test]
    fn test_local_offset_applies_to_text_and_naive_inputs() {
        let math = math().with_local_offset(offset!(-8));
        let text = math.resolve("1/1/2014", None).unwrap();
        let naive = math.resolve(date!(2014 - 01 - 01), None).unwrap();
        assert_eq!(text.offset(), offset!(-8));
        assert_eq!(text, naive);

        assert_eq!(
            math.compare("1/1/2014", date!(2014 - 01 - 01), None),
            Ok(Some(CompareResult::Equal))
        );
        assert_eq!(
            math.subtract_in_days("1/1/2014", date!(2014 - 01 - 02), None),
            Ok(Some(1))
        );
        assert_eq!(
            math.subtract_in_days(date!(2014 - 01 - 01), "1/1/2014", None),
            Ok(Some(0))
        );
    }

    #[test]
    fn test_now_uses_local_offset() {
        let math = math().with_local_offset(offset!(+5:30));
        assert_eq!(math.now().offset(), offset!(+5:30));
    }

    #[test]
    fn test_custom_parser() {
        struct Fixed(CalendarValue);

        impl DateParser for Fixed {
            fn parse(
                &self,
                _value: &str,
                _format: &str,
                offset: UtcOffset,
            ) -> Result<CalendarValue, ParseError> {
                Ok(self.0.to_offset(offset))
            }
        }

        let fixed = CalendarValue::new(datetime!(1999-12-31 00:00), UtcOffset::UTC);
        let math = CalendarMath::new(Fixed(fixed), DayConverter);
        assert_eq!(math.resolve("anything", None).unwrap(), fixed);
    }
}
