//! UTC timestamp formatting for screens, records and report file names.

use std::time::{SystemTime, UNIX_EPOCH};

/// Broken-down UTC time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcTime {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl UtcTime {
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    pub fn from_system_time(t: SystemTime) -> Self {
        let secs = t.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        Self::from_unix_secs(secs)
    }

    /// No leap-second handling.
    pub fn from_unix_secs(secs: u64) -> Self {
        let days = (secs / 86_400) as i64;
        let rem = secs % 86_400;
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u32,
            minute: ((rem / 60) % 60) as u32,
            second: (rem % 60) as u32,
        }
    }

    /// `2026-02-15 01:30:00`, for the monitor header.
    pub fn display(&self) -> String {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// `2026-02-15T01:30:00Z`, for saved records.
    pub fn iso8601(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }

    /// `20260215_013000`, for report file names.
    pub fn file_stamp(&self) -> String {
        format!(
            "{:04}{:02}{:02}_{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Days since 1970-01-01 to (year, month, day) in the proleptic Gregorian
/// calendar.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let t = UtcTime::from_unix_secs(0);
        assert_eq!(t.display(), "1970-01-01 00:00:00");
        assert_eq!(t.iso8601(), "1970-01-01T00:00:00Z");
        assert_eq!(t.file_stamp(), "19700101_000000");
    }

    #[test]
    fn test_known_dates() {
        // 2000-01-01 00:00:00 UTC
        assert_eq!(UtcTime::from_unix_secs(946_684_800).display(), "2000-01-01 00:00:00");
        // 2024-02-29 12:34:56 UTC (leap day)
        assert_eq!(
            UtcTime::from_unix_secs(1_709_210_096).iso8601(),
            "2024-02-29T12:34:56Z"
        );
        // 2026-10-15 08:05:09 UTC
        assert_eq!(
            UtcTime::from_unix_secs(1_792_051_509).file_stamp(),
            "20261015_080509"
        );
    }

    #[test]
    fn test_year_end_rollover() {
        // 1999-12-31 23:59:59 UTC
        let t = UtcTime::from_unix_secs(946_684_799);
        assert_eq!(
            (t.year, t.month, t.day, t.hour, t.minute, t.second),
            (1999, 12, 31, 23, 59, 59)
        );
    }
}
