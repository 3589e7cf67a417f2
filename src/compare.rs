use crate::prelude::*;
use crate::{
    CalendarMath, CalendarValue, DateInput, DateParser, DurationConverter, ParseError, Pattern,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ordering of two dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[repr(i8)]
pub enum CompareResult {
    #[display(fmt = "less")]
    Less = -1,
    #[display(fmt = "equal")]
    Equal = 0,
    #[display(fmt = "greater")]
    Greater = 1,
}

impl CompareResult {
    /// Maps a signed distance to its ordering: zero is equal
    pub const fn from_sign(value: i64) -> Self {
        match value {
            0 => Self::Equal,
            v if v < 0 => Self::Less,
            _ => Self::Greater,
        }
    }

    pub const fn to_ordering(self) -> Ordering {
        match self {
            Self::Less => Ordering::Less,
            Self::Equal => Ordering::Equal,
            Self::Greater => Ordering::Greater,
        }
    }
}

impl From<Ordering> for CompareResult {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Less,
            Ordering::Equal => Self::Equal,
            Ordering::Greater => Self::Greater,
        }
    }
}

impl From<CompareResult> for Ordering {
    fn from(result: CompareResult) -> Self {
        result.to_ordering()
    }
}

/// How finely two values must agree to count as the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Granularity {
    Day,
    Minute,
}

impl Granularity {
    fn matches(self, a: &CalendarValue, b: &CalendarValue) -> bool {
        let same_day =
            a.year() == b.year() && a.month_index() == b.month_index() && a.day() == b.day();
        match self {
            Self::Day => same_day,
            Self::Minute => same_day && a.hour() == b.hour() && a.minute() == b.minute(),
        }
    }
}

impl<P, C> CalendarMath<P, C>
where
    P: DateParser,
    C: DurationConverter,
{
    /// Whether `a` comes before, on, or after `b`.
    ///
    /// Under a date-only pattern the calendar days are compared, read in the
    /// local offset, so typed values carrying a time of day still compare by
    /// day. When the pattern reads a time of day the result is the sign of the
    /// day distance *from `b` to `a`*, and within one day the remaining span
    /// decides. Returns `Ok(None)` when either operand is missing.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when an operand is text that does not parse.
    pub fn compare<'a>(
        &self,
        a: impl Into<DateInput<'a>>,
        b: impl Into<DateInput<'a>>,
        format: Option<&str>,
    ) -> Result<Option<CompareResult>, ParseError> {
        let with_time = Pattern::compile(format.unwrap_or(&self.base_format)).has_time_components();
        let operands = self.resolve_pair(b.into(), a.into(), format)?;
        Ok(operands.map(|(b, a)| {
            if !with_time {
                let day = |value: CalendarValue| value.to_offset(self.local_offset).date();
                return CompareResult::from(day(a).cmp(&day(b)));
            }
            let millis = b.millis_until(&a);
            match self.converter.milliseconds_to_days(millis) {
                0 => CompareResult::from_sign(millis),
                days => CompareResult::from_sign(days),
            }
        }))
    }

    /// Whether both operands fall on the same calendar day, ignoring the
    /// time of day.
    ///
    /// `format_b` defaults to `format_a`, which defaults to the base pattern.
    /// Missing operands are never the same date.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when an operand is text that does not parse.
    pub fn same_date<'a>(
        &self,
        a: impl Into<DateInput<'a>>,
        b: impl Into<DateInput<'a>>,
        format_a: Option<&str>,
        format_b: Option<&str>,
    ) -> Result<bool, ParseError> {
        self.same_at(a.into(), b.into(), format_a, format_b, Granularity::Day)
    }

    /// Like [`Self::same_date`], but hour and minute must match as well.
    /// Seconds are ignored.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when an operand is text that does not parse.
    pub fn same_date_time<'a>(
        &self,
        a: impl Into<DateInput<'a>>,
        b: impl Into<DateInput<'a>>,
        format_a: Option<&str>,
        format_b: Option<&str>,
    ) -> Result<bool, ParseError> {
        self.same_at(a.into(), b.into(), format_a, format_b, Granularity::Minute)
    }

    fn same_at(
        &self,
        a: DateInput<'_>,
        b: DateInput<'_>,
        format_a: Option<&str>,
        format_b: Option<&str>,
        granularity: Granularity,
    ) -> Result<bool, ParseError> {
        if a.is_missing() || b.is_missing() {
            return Ok(false);
        }
        let format_b = format_b.or(format_a);
        let a = self.resolve_operand(a, format_a)?;
        let b = self.resolve_operand(b, format_b)?;
        Ok(a.zip(b).is_some_and(|(a, b)| granularity.matches(&a, &b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DATE_TIME_FORMAT;
    use time::UtcOffset;
    use time::macros::datetime;

    fn math() -> CalendarMath {
        CalendarMath::default()
    }

    fn compare(a: &str, b: &str, format: Option<&str>) -> CompareResult {
        math().compare(a, b, format).unwrap().unwrap()
    }

    #[test]
    fn test_compare_less() {
        assert_eq!(compare("9/10/2000", "9/10/2001", None), CompareResult::Less);
    }

    #[test]
    fn test_compare_equal() {
        assert_eq!(compare("9/10/2000", "9/10/2000", None), CompareResult::Equal);
    }

    #[test]
    fn test_compare_greater() {
        assert_eq!(
            compare("9/10/2000", "9/10/1999", None),
            CompareResult::Greater
        );
    }

    #[test]
    fn test_compare_date_times_on_the_same_day() {
        assert_eq!(
            compare(
                "9/10/2000 10:00 AM",
                "9/10/2000 8:00 AM",
                Some(DATE_TIME_FORMAT)
            ),
            CompareResult::Greater
        );
        assert_eq!(
            compare(
                "9/10/2000 10:15 AM",
                "9/10/2000 10:30 AM",
                Some(DATE_TIME_FORMAT)
            ),
            CompareResult::Less
        );
    }

    #[test]
    fn test_compare_ignores_time_without_time_tokens() {
        assert_eq!(
            compare("9/10/2000 10:00 AM", "9/10/2000 8:00 AM", None),
            CompareResult::Equal
        );
    }

    #[test]
    fn test_compare_typed_values_by_day() {
        let math = math();
        let at = |dt| CalendarValue::new(dt, UtcOffset::UTC);
        let morning = at(datetime!(2015-01-01 08:00));
        let later = at(datetime!(2015-01-01 10:00));
        let next_morning = at(datetime!(2015-01-02 07:00));

        assert_eq!(
            math.compare(morning, later, None),
            Ok(Some(CompareResult::Equal))
        );
        // under a day apart, but on the next calendar day
        assert_eq!(
            math.compare(morning, next_morning, None),
            Ok(Some(CompareResult::Less))
        );
        assert_eq!(
            math.compare(morning, later, Some(DATE_TIME_FORMAT)),
            Ok(Some(CompareResult::Less))
        );
    }

    #[test]
    fn test_compare_matches_reversed_day_distance() {
        let math = math();
        let pairs = [
            ("6/9/2009", "9/9/2009"),
            ("9/10/2015", "9/10/2014"),
            ("2/29/2016", "2/29/2016"),
        ];
        for (a, b) in pairs {
            let days = math.subtract_in_days(b, a, None).unwrap().unwrap();
            assert_eq!(
                math.compare(a, b, None).unwrap(),
                Some(CompareResult::from_sign(days)),
                "{a} vs {b}"
            );
        }
    }

    #[test]
    fn test_compare_missing_operand() {
        assert_eq!(math().compare(None::<&str>, "1/1/2000", None), Ok(None));
    }

    #[test]
    fn test_compare_result_conversions() {
        assert_eq!(CompareResult::from(Ordering::Less), CompareResult::Less);
        assert_eq!(Ordering::from(CompareResult::Greater), Ordering::Greater);
        assert_eq!(CompareResult::Less as i8, -1);
        assert_eq!(CompareResult::from_sign(-365), CompareResult::Less);
        assert_eq!(CompareResult::from_sign(0), CompareResult::Equal);
        assert_eq!(CompareResult::from_sign(92), CompareResult::Greater);
    }

    #[test]
    fn test_compare_result_display_and_serde() {
        assert_eq!(CompareResult::Equal.to_string(), "equal");
        let json = serde_json::to_string(&CompareResult::Greater).unwrap();
        assert_eq!(json, r#""greater""#);
        let parsed: CompareResult = serde_json::from_str(r#""less""#).unwrap();
        assert_eq!(parsed, CompareResult::Less);
    }

    #[test]
    fn test_same_date_values() {
        let math = math();
        let at = |dt| CalendarValue::new(dt, UtcOffset::UTC);
        let noon = at(datetime!(1995-12-17 12:00));
        let early = at(datetime!(1995-12-17 03:24));
        let next_day = at(datetime!(1995-12-18 03:24));

        assert!(math.same_date(noon, early, None, None).unwrap());
        assert!(!math.same_date(noon, next_day, None, None).unwrap());
    }

    #[test]
    fn test_same_date_strings() {
        let math = math();
        assert!(math.same_date("5/10/1986", "5/10/1986", None, None).unwrap());
        assert!(!math.same_date("5/11/1986", "05/10/1986", None, None).unwrap());
    }

    #[test]
    fn test_same_date_with_independent_formats() {
        let math = math();
        assert!(
            math.same_date(
                "2011-01-06 10:42:00",
                "1/6/2011 10:42",
                Some("YYYY-MM-DD H:mm"),
                Some("MM/DD/YYYY HH:mm"),
            )
            .unwrap()
        );
        assert!(
            math.same_date(
                "2011-01-06 10:42:00",
                "2011-01-06 10:42:00",
                Some("YYYY-MM-DD H:mm"),
                None,
            )
            .unwrap()
        );
    }

    #[test]
    fn test_same_date_second_format_defaults_to_first() {
        let math = math();
        // "1/6/2011 10:42" read as YYYY-MM-DD is year 1, June 20
        assert!(
            !math
                .same_date(
                    "2011-01-06 10:42:00",
                    "1/6/2011 10:42",
                    Some("YYYY-MM-DD H:mm"),
                    None,
                )
                .unwrap()
        );
    }

    #[test]
    fn test_same_date_propagates_parse_errors() {
        let result = math().same_date("2011-01-06 10:42:00", "1/6/2011 10:42", None, None);
        assert_eq!(result, Err(ParseError::InvalidMonth(20)));
    }

    #[test]
    fn test_same_date_missing_operand() {
        assert_eq!(
            math().same_date(None::<&str>, "1/6/2011", None, None),
            Ok(false)
        );
    }

    #[test]
    fn test_same_date_time_values() {
        let math = math();
        let at = |dt| CalendarValue::new(dt, UtcOffset::UTC);
        let a = at(datetime!(1995-12-17 00:24));
        let b = at(datetime!(1995-12-17 03:24));
        let c = at(datetime!(1995-12-17 03:24));

        assert!(!math.same_date_time(a, b, None, None).unwrap());
        assert!(math.same_date_time(b, c, None, None).unwrap());
    }

    #[test]
    fn test_same_date_time_strings() {
        let math = math();
        let iso_like = Some("YYYY-MM-DD H:mm");

        assert!(
            math.same_date_time(
                "2011-01-06 10:42:00",
                "1/6/2011 10:42",
                iso_like,
                Some("MM/DD/YYYY H:mm"),
            )
            .unwrap()
        );
        assert!(
            math.same_date_time("2011-01-06 10:42:00", "2011-01-06 10:42:00", iso_like, None)
                .unwrap()
        );
        assert!(
            !math
                .same_date_time(
                    "2011-01-06 10:42:00",
                    "1/6/2011 10:43",
                    iso_like,
                    Some("MM/DD/YYYY H:mm"),
                )
                .unwrap()
        );
        assert!(
            !math
                .same_date_time(
                    "9/10/2000 10:00 AM",
                    "9/10/2000 8:00 AM",
                    Some(DATE_TIME_FORMAT),
                    None,
                )
                .unwrap()
        );
        assert!(
            math.same_date_time("5/10/1986T01:15:00", "5/10/1986T01:15:00", None, None)
                .unwrap()
        );
    }

    #[test]
    fn test_same_date_time_ignores_seconds() {
        let math = math();
        let format = Some("YYYY-MM-DD HH:mm:ss");
        assert!(
            math.same_date_time("2011-01-06 10:42:00", "2011-01-06 10:42:59", format, None)
                .unwrap()
        );
        assert!(
            !math
                .same_date_time("2011-01-06 10:42:59", "2011-01-06 10:43:00", format, None)
                .unwrap()
        );
    }
}
