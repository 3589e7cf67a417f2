use crate::consts::{FEBRUARY_DAYS, FEBRUARY_DAYS_LEAP};
use std::fmt;

/// How many days a month has, given the year it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MonthLength {
    Fixed(u8),
    /// 28 days, or 29 in a leap year
    LeapAware,
}

/// One entry of the month table: a display label plus its length rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthDescriptor {
    name: &'static str,
    length: MonthLength,
}

impl MonthDescriptor {
    const fn fixed(name: &'static str, days: u8) -> Self {
        Self {
            name,
            length: MonthLength::Fixed(days),
        }
    }

    /// Returns the English month name
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the number of days this month has in `year`
    pub fn days(&self, year: i32) -> u8 {
        match self.length {
            MonthLength::Fixed(days) => days,
            MonthLength::LeapAware if is_leap_year(year) => FEBRUARY_DAYS_LEAP,
            MonthLength::LeapAware => FEBRUARY_DAYS,
        }
    }
}

impl fmt::Display for MonthDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The month table, indexed from 0 (January) to 11 (December).
pub const MONTHS: [MonthDescriptor; 12] = [
    MonthDescriptor::fixed("January", 31),
    MonthDescriptor {
        name: "February",
        length: MonthLength::LeapAware,
    },
    MonthDescriptor::fixed("March", 31),
    MonthDescriptor::fixed("April", 30),
    MonthDescriptor::fixed("May", 31),
    MonthDescriptor::fixed("June", 30),
    MonthDescriptor::fixed("July", 31),
    MonthDescriptor::fixed("August", 31),
    MonthDescriptor::fixed("September", 30),
    MonthDescriptor::fixed("October", 31),
    MonthDescriptor::fixed("November", 30),
    MonthDescriptor::fixed("December", 31),
];

// Helper functions

/// Whether `year` has a February 29 under the proleptic Gregorian calendar,
/// so 1900 is common and 2000 is leap. Exact for every `i32`, including years
/// `time` cannot represent as dates.
pub const fn is_leap_year(year: i32) -> bool {
    time::util::is_leap_year(year)
}

/// Returns the month table entry for a zero-based month index.
///
/// # Panics
/// Panics if `index` is not in `0..12`. A bad index is a caller bug.
pub fn month(index: usize) -> &'static MonthDescriptor {
    assert!(
        index < MONTHS.len(),
        "month index {index} out of range (expected 0-11)"
    );
    &MONTHS[index]
}

/// Returns the English name of a zero-based month index.
///
/// # Panics
/// Panics if `index` is not in `0..12`.
pub fn month_name(index: usize) -> &'static str {
    month(index).name()
}

/// Returns the number of days in a zero-based month of `year`.
///
/// # Panics
/// Panics if `index` is not in `0..12`.
pub fn days_in_month(index: usize, year: i32) -> u8 {
    month(index).days(year)
}
