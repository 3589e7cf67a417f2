//! Moment-style date patterns and the forgiving parser built on them.
//!
//! A pattern such as `MM-DD-YYYY` or `YYYY-MM-DDTHH:mm:ssZ` is compiled into
//! [`Token`]s, each of which maps onto a `time` format component. Parsing walks
//! the tokens in order; literals are consumed only when they match, numeric
//! tokens skip whatever non-digit input precedes them, and input left over at
//! the end is ignored. This lets `1/1/2014` satisfy `MM-DD-YYYY`.

use crate::CalendarValue;
use crate::consts::TWO_DIGIT_YEAR_PIVOT;
use crate::prelude::*;
use std::num::NonZeroU8;
use time::format_description::modifier::{self, Padding, YearRepr};
use time::format_description::{Component, FormatItem};
use time::parsing::Parsed;
use time::{Date, Time, UtcOffset};

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Missing {component} in {value:?}")]
    MissingComponent {
        component: &'static str,
        value: String,
    },
    #[display(fmt = "Invalid {component} in {value:?}")]
    InvalidComponent {
        component: &'static str,
        value: String,
    },
    #[display(fmt = "Invalid month: {_0} (must be 1-12)")]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: i32 },
    #[display(fmt = "Invalid UTC offset: {_0}")]
    InvalidOffset(String),
    #[display(fmt = "Empty date string")]
    EmptyInput,
    #[display(fmt = "No date supplied")]
    MissingInput,
}

impl std::error::Error for ParseError {}

/// One element of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `YYYY`
    Year,
    /// `YY`
    ShortYear,
    /// `MM` (padded) or `M`
    Month { padded: bool },
    /// `DD` (padded) or `D`
    Day { padded: bool },
    /// `HH` (padded) or `H`, 0-23
    Hour { padded: bool },
    /// `hh` (padded) or `h`, 1-12
    Hour12 { padded: bool },
    /// `mm` (padded) or `m`
    Minute { padded: bool },
    /// `ss` (padded) or `s`
    Second { padded: bool },
    /// `A` (upper case) or `a`
    Meridiem { upper: bool },
    /// `Z` (`+07:00`) or `ZZ` (`+0700`)
    Offset { colon: bool },
    Literal(String),
}

const TOKENS: &[(&str, Token)] = &[
    ("YYYY", Token::Year),
    ("YY", Token::ShortYear),
    ("MM", Token::Month { padded: true }),
    ("M", Token::Month { padded: false }),
    ("DD", Token::Day { padded: true }),
    ("D", Token::Day { padded: false }),
    ("HH", Token::Hour { padded: true }),
    ("H", Token::Hour { padded: false }),
    ("hh", Token::Hour12 { padded: true }),
    ("h", Token::Hour12 { padded: false }),
    ("mm", Token::Minute { padded: true }),
    ("m", Token::Minute { padded: false }),
    ("ss", Token::Second { padded: true }),
    ("s", Token::Second { padded: false }),
    ("A", Token::Meridiem { upper: true }),
    ("a", Token::Meridiem { upper: false }),
    ("ZZ", Token::Offset { colon: false }),
    ("Z", Token::Offset { colon: true }),
];

const fn signed_offset_hour() -> modifier::OffsetHour {
    let mut hour = modifier::OffsetHour::default();
    hour.sign_is_mandatory = true;
    hour
}

/// `+07:00`
const OFFSET_WITH_COLON: &[FormatItem<'static>] = &[
    FormatItem::Component(Component::OffsetHour(signed_offset_hour())),
    FormatItem::Literal(b":"),
    FormatItem::Component(Component::OffsetMinute(modifier::OffsetMinute::default())),
];

/// `+0700`
const OFFSET_COMPACT: &[FormatItem<'static>] = &[
    FormatItem::Component(Component::OffsetHour(signed_offset_hour())),
    FormatItem::Component(Component::OffsetMinute(modifier::OffsetMinute::default())),
];

/// Accepts `±HH`, `±HHMM` and `±HH:MM` whichever offset token the pattern
/// used. Hours must be two digits so the minutes can be told apart.
const OFFSET_INPUT: FormatItem<'static> = FormatItem::Compound(&[
    FormatItem::Component(Component::OffsetHour(modifier::OffsetHour::default())),
    FormatItem::Optional(&FormatItem::Compound(&[
        FormatItem::Optional(&FormatItem::Literal(b":")),
        FormatItem::Component(Component::OffsetMinute(modifier::OffsetMinute::default())),
    ])),
]);

const fn padding(padded: bool) -> Padding {
    if padded { Padding::Zero } else { Padding::None }
}

fn year(repr: YearRepr, padding: Padding) -> Component {
    let mut year = modifier::Year::default();
    year.repr = repr;
    year.padding = padding;
    Component::Year(year)
}

fn month(padding: Padding) -> Component {
    let mut month = modifier::Month::default();
    month.padding = padding;
    Component::Month(month)
}

fn day(padding: Padding) -> Component {
    let mut day = modifier::Day::default();
    day.padding = padding;
    Component::Day(day)
}

fn hour(padding: Padding, is_12_hour_clock: bool) -> Component {
    let mut hour = modifier::Hour::default();
    hour.padding = padding;
    hour.is_12_hour_clock = is_12_hour_clock;
    Component::Hour(hour)
}

fn minute(padding: Padding) -> Component {
    let mut minute = modifier::Minute::default();
    minute.padding = padding;
    Component::Minute(minute)
}

fn second(padding: Padding) -> Component {
    let mut second = modifier::Second::default();
    second.padding = padding;
    Component::Second(second)
}

fn period(is_uppercase: bool) -> Component {
    let mut period = modifier::Period::default();
    period.is_uppercase = is_uppercase;
    Component::Period(period)
}

impl Token {
    /// The `time` format item that renders this token
    fn format_item(&self) -> FormatItem<'_> {
        let component = match *self {
            Self::Literal(ref text) => return FormatItem::Literal(text.as_bytes()),
            Self::Offset { colon: true } => return FormatItem::Compound(OFFSET_WITH_COLON),
            Self::Offset { colon: false } => return FormatItem::Compound(OFFSET_COMPACT),
            Self::Year => year(YearRepr::Full, Padding::Zero),
            Self::ShortYear => year(YearRepr::LastTwo, Padding::Zero),
            Self::Month { padded } => month(padding(padded)),
            Self::Day { padded } => day(padding(padded)),
            Self::Hour { padded } => hour(padding(padded), false),
            Self::Hour12 { padded } => hour(padding(padded), true),
            Self::Minute { padded } => minute(padding(padded)),
            Self::Second { padded } => second(padding(padded)),
            Self::Meridiem { upper } => period(upper),
        };
        FormatItem::Component(component)
    }
}

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    /// Splits a pattern into tokens, longest match first. Text inside `[...]`
    /// is literal; every unrecognized character is a literal too.
    pub fn compile(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut rest = pattern;

        while let Some(ch) = rest.chars().next() {
            if ch == '[' {
                let body = &rest[1..];
                let end = body.find(']').unwrap_or(body.len());
                push_literal(&mut tokens, &body[..end]);
                rest = body.get(end + 1..).unwrap_or("");
                continue;
            }

            if let Some((text, token)) = TOKENS.iter().find(|(text, _)| rest.starts_with(text)) {
                tokens.push(token.clone());
                rest = &rest[text.len()..];
            } else {
                push_literal(&mut tokens, &rest[..ch.len_utf8()]);
                rest = &rest[ch.len_utf8()..];
            }
        }

        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Whether the pattern names a year, a month and a day
    pub fn has_date_components(&self) -> bool {
        let has_year = self
            .tokens
            .iter()
            .any(|t| matches!(t, Token::Year | Token::ShortYear));
        let has_month = self.tokens.iter().any(|t| matches!(t, Token::Month { .. }));
        let has_day = self.tokens.iter().any(|t| matches!(t, Token::Day { .. }));
        has_year && has_month && has_day
    }

    /// Whether the pattern reads any part of the time of day
    pub fn has_time_components(&self) -> bool {
        self.tokens.iter().any(|t| {
            matches!(
                t,
                Token::Hour { .. } | Token::Hour12 { .. } | Token::Minute { .. } | Token::Second { .. }
            )
        })
    }

    /// Reads `value` against this pattern. Clock fields left out of the
    /// pattern default to zero; the result is observed at `offset` unless the
    /// text carries its own offset, in which case it is converted to `offset`.
    ///
    /// # Errors
    /// Returns a [`ParseError`] describing the first component that could not
    /// be read or validated.
    pub fn parse(&self, value: &str, offset: UtcOffset) -> Result<CalendarValue, ParseError> {
        if value.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut reader = Reader::new(value);
        for token in &self.tokens {
            reader.read(token)?;
        }
        reader.build(offset)
    }

    /// Renders `value` with this pattern.
    ///
    /// # Errors
    /// Returns the `time` formatting error if a component cannot be rendered.
    pub fn render(&self, value: &CalendarValue) -> Result<String, time::error::Format> {
        let items: Vec<FormatItem<'_>> = self.tokens.iter().map(Token::format_item).collect();
        value.as_offset_datetime().format(items.as_slice())
    }
}

fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Literal(prev)) = tokens.last_mut() {
        prev.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_owned()));
    }
}

const fn two_digit_year(n: i32) -> i32 {
    if n > TWO_DIGIT_YEAR_PIVOT { 1900 + n } else { 2000 + n }
}

/// The input from the next ASCII digit on, or `None` if no digits remain.
fn skip_to_digit(rest: &[u8]) -> Option<&[u8]> {
    let start = rest.iter().position(u8::is_ascii_digit)?;
    Some(&rest[start..])
}

/// The one- or two-digit number at the front of `digits`, for error reports.
fn leading_number(digits: &[u8]) -> u8 {
    digits
        .iter()
        .take(2)
        .take_while(|b| b.is_ascii_digit())
        .fold(0, |n, b| n * 10 + (b - b'0'))
}

/// Reads `a`/`p` with an optional `m` and dots. `Some(true)` means PM.
fn take_meridiem(rest: &mut &[u8]) -> Option<bool> {
    let start = rest
        .iter()
        .position(|b| matches!(b, b'a' | b'A' | b'p' | b'P'))?;
    let pm = matches!(rest[start], b'p' | b'P');
    let mut tail = &rest[start + 1..];
    tail = tail.strip_prefix(b".").unwrap_or(tail);
    if let Some(stripped) = tail.strip_prefix(b"m").or_else(|| tail.strip_prefix(b"M")) {
        tail = stripped.strip_prefix(b".").unwrap_or(stripped);
    }
    *rest = tail;
    Some(pm)
}

/// Reads `Z` or a numeric offset. Absent offsets are not an error.
fn take_offset(rest: &mut &[u8]) -> Result<Option<UtcOffset>, ParseError> {
    let Some(start) = rest
        .iter()
        .position(|b| matches!(b, b'Z' | b'z' | b'+' | b'-'))
    else {
        return Ok(None);
    };
    let tail = &rest[start..];
    if let Some(after) = tail.strip_prefix(b"Z").or_else(|| tail.strip_prefix(b"z")) {
        *rest = after;
        return Ok(Some(UtcOffset::UTC));
    }

    let invalid = || ParseError::InvalidOffset(String::from_utf8_lossy(tail).into_owned());
    let mut parsed = Parsed::new();
    let after = parsed
        .parse_item(tail, &OFFSET_INPUT)
        .map_err(|_| invalid())?;
    let offset = UtcOffset::try_from(parsed).map_err(|_| invalid())?;

    *rest = after;
    Ok(Some(offset))
}

/// Walks the input token by token, collecting fields in a `time` [`Parsed`].
struct Reader<'a> {
    value: &'a str,
    rest: &'a [u8],
    parsed: Parsed,
    // kept outside `Parsed` so two-digit years can pivot
    year: Option<i32>,
    pm: Option<bool>,
    offset: Option<UtcOffset>,
}

impl<'a> Reader<'a> {
    fn new(value: &'a str) -> Self {
        Self {
            value,
            rest: value.as_bytes(),
            parsed: Parsed::new(),
            year: None,
            pm: None,
            offset: None,
        }
    }

    fn rejected(&self, component: &'static str) -> ParseError {
        ParseError::InvalidComponent {
            component,
            value: self.value.to_owned(),
        }
    }

    fn read(&mut self, token: &Token) -> Result<(), ParseError> {
        match *token {
            Token::Literal(ref text) => {
                if let Some(stripped) = self.rest.strip_prefix(text.as_bytes()) {
                    self.rest = stripped;
                }
            }
            Token::Year => {
                let full = year(YearRepr::Full, Padding::None);
                if let Some(before) = self.read_number(full, "year")? {
                    let width = before - self.rest.len();
                    self.year = self
                        .parsed
                        .year()
                        .map(|n| if width == 2 { two_digit_year(n) } else { n });
                }
            }
            Token::ShortYear => {
                if self
                    .read_number(year(YearRepr::LastTwo, Padding::None), "year")?
                    .is_some()
                {
                    self.year = self
                        .parsed
                        .year_last_two()
                        .map(|n| two_digit_year(i32::from(n)));
                }
            }
            Token::Month { .. } => {
                if let Some(digits) = skip_to_digit(self.rest) {
                    self.rest = self
                        .parsed
                        .parse_component(digits, month(Padding::None))
                        .map_err(|_| ParseError::InvalidMonth(leading_number(digits)))?;
                }
            }
            Token::Day { .. } => {
                self.read_number(day(Padding::None), "day")?;
            }
            Token::Hour { .. } => {
                self.read_number(hour(Padding::None, false), "hour")?;
            }
            Token::Hour12 { .. } => {
                self.read_number(hour(Padding::None, true), "hour")?;
            }
            Token::Minute { .. } => {
                self.read_number(minute(Padding::None), "minute")?;
            }
            Token::Second { .. } => {
                self.read_number(second(Padding::None), "second")?;
            }
            Token::Meridiem { .. } => self.pm = take_meridiem(&mut self.rest),
            Token::Offset { .. } => self.offset = take_offset(&mut self.rest)?,
        }
        Ok(())
    }

    /// Skips to the next digit and lets `time` read up to the component's
    /// width. Returns how much input was left before the digits were read, or
    /// `None` when no digits remain.
    fn read_number(
        &mut self,
        component: Component,
        name: &'static str,
    ) -> Result<Option<usize>, ParseError> {
        let Some(digits) = skip_to_digit(self.rest) else {
            return Ok(None);
        };
        match self.parsed.parse_component(digits, component) {
            Ok(after) => {
                self.rest = after;
                Ok(Some(digits.len()))
            }
            Err(_) => Err(self.rejected(name)),
        }
    }

    fn build(self, local: UtcOffset) -> Result<CalendarValue, ParseError> {
        let missing = |component| ParseError::MissingComponent {
            component,
            value: self.value.to_owned(),
        };
        let year = self.year.ok_or_else(|| missing("year"))?;
        let month = self.parsed.month().ok_or_else(|| missing("month"))?;
        let day = self.parsed.day().ok_or_else(|| missing("day"))?.get();

        let date = Date::from_calendar_date(year, month, day).map_err(|_| {
            ParseError::InvalidDay {
                month: u8::from(month),
                day,
                year,
            }
        })?;

        let mut hour = self
            .parsed
            .hour_24()
            .or_else(|| self.parsed.hour_12().map(NonZeroU8::get))
            .unwrap_or(0);
        match self.pm {
            Some(true) if hour < 12 => hour += 12,
            Some(false) if hour == 12 => hour = 0,
            _ => {}
        }
        let minute = self.parsed.minute().unwrap_or(0);
        let second = self.parsed.second().unwrap_or(0);
        let time = Time::from_hms(hour, minute, second).map_err(|_| self.rejected("time"))?;

        let datetime = date.with_time(time);
        Ok(match self.offset {
            Some(offset) => CalendarValue::new(datetime, offset).to_offset(local),
            None => CalendarValue::new(datetime, local),
        })
    }
}

/// Turns date text into a [`CalendarValue`].
pub trait DateParser {
    /// Parses `value` according to `format`. Text without an offset of its
    /// own is read as wall-clock time at `offset`; the result is expressed in
    /// `offset` either way.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when `value` does not describe a valid date
    /// under `format`.
    fn parse(
        &self,
        value: &str,
        format: &str,
        offset: UtcOffset,
    ) -> Result<CalendarValue, ParseError>;

    /// Whether `value` parses under `format`
    fn is_valid(&self, value: &str, format: &str) -> bool {
        self.parse(value, format, UtcOffset::UTC).is_ok()
    }
}

impl<T: DateParser + ?Sized> DateParser for &T {
    fn parse(
        &self,
        value: &str,
        format: &str,
        offset: UtcOffset,
    ) -> Result<CalendarValue, ParseError> {
        (**self).parse(value, format, offset)
    }
}

/// The default [`DateParser`]: compiles the pattern and reads the value with
/// it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternParser;

impl DateParser for PatternParser {
    fn parse(
        &self,
        value: &str,
        format: &str,
        offset: UtcOffset,
    ) -> Result<CalendarValue, ParseError> {
        let pattern = Pattern::compile(format);
        if !pattern.has_date_components() {
            return Err(ParseError::InvalidFormat(format.to_owned()));
        }
        pattern.parse(value, offset)
    }
}
