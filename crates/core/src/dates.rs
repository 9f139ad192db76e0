#![forbid(unsafe_code)]

//! Calendar dates without a time zone, stored as ISO `YYYY-MM-DD`.

const MS_PER_DAY: i64 = 86_400_000;
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u8,
    day: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("date must be formatted as YYYY-MM-DD")]
    Malformed,
    #[error("date is out of range")]
    OutOfRange,
}

impl CalendarDate {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        if !(1..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(DateError::OutOfRange);
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(DateError::OutOfRange);
        }
        Ok(Self { year, month, day })
    }

    pub fn parse(value: &str) -> Result<Self, DateError> {
        let value = value.trim();
        let bytes = value.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(DateError::Malformed);
        }
        let year = parse_digits(&value[0..4])?;
        let month = parse_digits(&value[5..7])?;
        let day = parse_digits(&value[8..10])?;
        Self::new(year as i32, month as u8, day as u8)
    }

    pub fn from_unix_ms(ts_ms: i64) -> Self {
        Self::from_days(ts_ms.div_euclid(MS_PER_DAY))
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    /// Days since 1970-01-01.
    pub fn to_days(self) -> i64 {
        let m = i64::from(self.month);
        let d = i64::from(self.day);
        let y = i64::from(self.year) - i64::from(m <= 2);
        let era = if y >= 0 { y } else { y - 399 } / 400;
        let yoe = y - era * 400;
        let mp = (m + 9) % 12;
        let doy = (153 * mp + 2) / 5 + d - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    pub fn from_days(days: i64) -> Self {
        let z = days + 719_468;
        let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);
        Self {
            year: year as i32,
            month: month as u8,
            day: day as u8,
        }
    }

    pub fn add_days(self, days: i64) -> Self {
        Self::from_days(self.to_days() + days)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(self, other: CalendarDate) -> i64 {
        other.to_days() - self.to_days()
    }

    pub fn month_index(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Short month label such as `Oct 2026`.
    pub fn month_label(self) -> String {
        format!("{} {}", MONTH_NAMES[usize::from(self.month - 1)], self.year)
    }

    pub fn first_of_month_index(index: i64) -> Self {
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) + 1;
        Self {
            year: year as i32,
            month: month as u8,
            day: 1,
        }
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn parse_digits(raw: &str) -> Result<u32, DateError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::Malformed);
    }
    raw.parse::<u32>().map_err(|_| DateError::Malformed)
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_malformed_and_impossible_dates() {
        assert_eq!(CalendarDate::parse("2026/10/19"), Err(DateError::Malformed));
        assert_eq!(CalendarDate::parse("2026-1-19"), Err(DateError::Malformed));
        assert_eq!(CalendarDate::parse("2026-02-30"), Err(DateError::OutOfRange));
        assert_eq!(CalendarDate::parse("2025-02-29"), Err(DateError::OutOfRange));
        assert!(CalendarDate::parse("2024-02-29").is_ok());
        assert_eq!(
            CalendarDate::parse(" 2026-10-19 ").unwrap().to_string(),
            "2026-10-19"
        );
    }

    #[test]
    fn day_arithmetic_matches_unix_epoch() {
        let epoch = CalendarDate::parse("1970-01-01").unwrap();
        assert_eq!(epoch.to_days(), 0);
        assert_eq!(CalendarDate::from_unix_ms(0), epoch);
        assert_eq!(CalendarDate::from_unix_ms(-1).to_string(), "1969-12-31");

        let start = CalendarDate::parse("2024-02-27").unwrap();
        assert_eq!(start.add_days(3).to_string(), "2024-03-01");
        assert_eq!(start.days_until(CalendarDate::parse("2025-02-27").unwrap()), 366);
        // 2026-10-19T00:00:00Z
        assert_eq!(
            CalendarDate::from_unix_ms(1_792_368_000_000).to_string(),
            "2026-10-19"
        );
    }

    #[test]
    fn ordering_follows_the_calendar() {
        let a = CalendarDate::parse("2025-12-31").unwrap();
        let b = CalendarDate::parse("2026-01-01").unwrap();
        assert!(a < b);
        assert_eq!(b.month_label(), "Jan 2026");
        assert_eq!(
            CalendarDate::first_of_month_index(b.month_index() - 1).to_string(),
            "2025-12-01"
        );
    }
}
