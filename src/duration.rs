use crate::consts::MILLISECONDS_PER_DAY;

/// Converts a raw millisecond span into whole days.
pub trait DurationConverter {
    fn milliseconds_to_days(&self, milliseconds: i64) -> i64;
}

/// Truncates toward zero: 47 hours is 1 day, -47 hours is -1 day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayConverter;

impl DurationConverter for DayConverter {
    #[inline]
    fn milliseconds_to_days(&self, milliseconds: i64) -> i64 {
        milliseconds / MILLISECONDS_PER_DAY
    }
}

impl<F> DurationConverter for F
where
    F: Fn(i64) -> i64,
{
    fn milliseconds_to_days(&self, milliseconds: i64) -> i64 {
        self(milliseconds)
    }
}
