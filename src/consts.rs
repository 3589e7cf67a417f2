/// Number of months in a calendar year
pub const MONTHS_IN_YEAR: i32 = 12;

/// Zero-based index of February in the month table
pub const FEBRUARY: usize = 1;

/// Days in February for common years
pub const FEBRUARY_DAYS: u8 = 28;
/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Length of one day in milliseconds
pub const MILLISECONDS_PER_DAY: i64 = 86_400_000;

/// Pattern used when a caller does not supply one (month-day-year)
pub const BASE_FORMAT: &str = "MM-DD-YYYY";

/// Server timestamps: `2015-11-24T20:12:00-07:00`
pub const ISO_FORMAT: &str = "YYYY-MM-DDTHH:mm:ssZ";
/// Date and 12-hour clock time: `9/10/2000 10:00 AM`
pub const DATE_TIME_FORMAT: &str = "M/D/YYYY h:mm A";
/// Zero-padded month-first date: `09/10/2000`
pub const DATE_FORMAT: &str = "MM/DD/YYYY";
/// 12-hour clock time: `10:00AM`
pub const TIME_FORMAT: &str = "h:mmA";

/// Two-digit years above this value belong to the 1900s, the rest to the 2000s
pub(crate) const TWO_DIGIT_YEAR_PIVOT: i32 = 68;
