//! Timestamp conversion between the compact close-approach format and the
//! display format used everywhere else.
//!
//! Source data is always UTC with minute precision, e.g. `"1900-Jan-01 12:00"`.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Compact calendar format used by the close-approach data set
pub const CD_FORMAT: &str = "%Y-%b-%d %H:%M";

/// Display and serialization format (no seconds, no timezone suffix)
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a compact calendar date such as `"2020-Dec-31 23:59"`.
pub fn parse_cd(cd: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let naive = NaiveDateTime::parse_from_str(cd.trim(), CD_FORMAT)?;
    Ok(naive.and_utc())
}

/// Format a timestamp as `"YYYY-MM-DD HH:MM"`.
pub fn format_datetime(time: &DateTime<Utc>) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_cd() {
        let t = parse_cd("1900-Jan-01 00:11").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (1900, 1, 1));
        assert_eq!((t.hour(), t.minute(), t.second()), (0, 11, 0));

        let t = parse_cd(" 2020-Dec-31 23:59 ").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2020, 12, 31));
    }

    #[test]
    fn test_parse_cd_rejects_other_formats() {
        assert!(parse_cd("1900-01-01 00:11").is_err());
        assert!(parse_cd("2020-Feb-30 10:00").is_err());
        assert!(parse_cd("").is_err());
    }

    #[test]
    fn test_format_datetime() {
        let t = parse_cd("2099-Mar-07 05:04").unwrap();
        assert_eq!(format_datetime(&t), "2099-03-07 05:04");
    }
}
