//! Fixed-format UTC timestamps (`YYYY-MM-DDTHH:MM:SSZ`).

#[cfg(test)]
#[path = "./time_tests.rs"]
mod tests;

use std::fmt;
use std::str::FromStr;

/// Length in bytes of the only accepted datetime form, `1979-05-27T07:32:00Z`.
pub const FORMAT_LEN: usize = 20;

/// A UTC instant with second precision.
///
/// Only the fixed form `YYYY-MM-DDTHH:MM:SSZ` is recognized: no fractional
/// seconds, no offsets other than `Z`, no date-only or time-only values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    const DAYS: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[month as usize]
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian civil date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = (if y >= 0 { y } else { y - 399 }) / 400;
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

impl Timestamp {
    /// Builds a timestamp from calendar fields, returning `None` when any
    /// field is out of range.
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if year > 9999 || month < 1 || month > 12 {
            return None;
        }
        if day < 1 || day > days_in_month(year, month) {
            return None;
        }
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Timestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Recognizes a timestamp at the start of `input`.
    ///
    /// Returns the number of bytes consumed (always [`FORMAT_LEN`]) together
    /// with the value. Anything that deviates from the fixed pattern, or whose
    /// fields are out of calendar range, yields `None`.
    pub(crate) fn munch(input: &[u8]) -> Option<(usize, Timestamp)> {
        let bytes: &[u8; FORMAT_LEN] = input.get(..FORMAT_LEN)?.try_into().ok()?;

        const SEPARATORS: [(usize, u8); 6] =
            [(4, b'-'), (7, b'-'), (10, b'T'), (13, b':'), (16, b':'), (19, b'Z')];
        for (at, sep) in SEPARATORS {
            if bytes[at] != sep {
                return None;
            }
        }

        let digits = |range: std::ops::Range<usize>| -> Option<u16> {
            let mut value = 0u16;
            for &b in &bytes[range] {
                if !b.is_ascii_digit() {
                    return None;
                }
                value = value * 10 + (b - b'0') as u16;
            }
            Some(value)
        };

        let year = digits(0..4)?;
        let month = digits(5..7)? as u8;
        let day = digits(8..10)? as u8;
        let hour = digits(11..13)? as u8;
        let minute = digits(14..16)? as u8;
        let second = digits(17..19)? as u8;

        let value = Timestamp::new(year, month, day, hour, minute, second)?;
        Some((FORMAT_LEN, value))
    }

    /// Calendar year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Month of the year, 1 through 12.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of the month, starting at 1.
    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn second(&self) -> u8 {
        self.second
    }

    /// Seconds since the Unix epoch. Negative for instants before 1970.
    pub fn unix_timestamp(&self) -> i64 {
        let days = days_from_civil(self.year as i64, self.month as i64, self.day as i64);
        days * 86_400 + self.hour as i64 * 3_600 + self.minute as i64 * 60 + self.second as i64
    }
}

/// Error returned by [`Timestamp::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTimestamp;

impl fmt::Display for InvalidTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a timestamp of the form YYYY-MM-DDTHH:MM:SSZ")
    }
}

impl std::error::Error for InvalidTimestamp {}

impl FromStr for Timestamp {
    type Err = InvalidTimestamp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Timestamp::munch(s.as_bytes()) {
            Some((len, value)) if len == s.len() => Ok(value),
            _ => Err(InvalidTimestamp),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Timestamp {
    fn serialize<S>(&self, ser: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        ser.collect_str(self)
    }
}
