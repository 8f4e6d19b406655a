use chrono::NaiveDate;

use crate::store::Timestamp;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid clock time: {0}")]
pub struct InvalidTime(pub String);

/// Parse a "HH:MM:SS" clock field into seconds since service-day midnight.
/// Hours may exceed 24 to express post-midnight service ("25:10:00").
pub fn parse_time(s: &str) -> Result<Timestamp, InvalidTime> {
    if s.len() < 7 {
        return Err(InvalidTime(s.to_owned()));
    }

    let mut parts = s.split(':');
    let (hour, minute, second) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(sec), None) => (h, m, sec),
        _ => return Err(InvalidTime(s.to_owned())),
    };
    if minute.len() != 2 || second.len() != 2 {
        return Err(InvalidTime(s.to_owned()));
    }

    let field = |v: &str| v.parse::<u32>().map_err(|_| InvalidTime(s.to_owned()));
    Ok(field(hour)? * 3600 + field(minute)? * 60 + field(second)?)
}

pub fn format_time(time: Timestamp) -> String {
    let hours = time / 3600;
    let minutes = (time % 3600) / 60;
    let seconds = time % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Service dates in the calendar table are bare "YYYYMMDD".
pub fn parse_service_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_clock_times() {
        assert_eq!(parse_time("08:30:00"), Ok(8 * 3600 + 30 * 60));
        assert_eq!(parse_time("8:30:00"), Ok(8 * 3600 + 30 * 60));
        assert_eq!(parse_time("00:00:00"), Ok(0));
    }

    #[test]
    fn allows_hours_past_midnight() {
        assert_eq!(parse_time("25:10:30"), Ok(25 * 3600 + 10 * 60 + 30));
    }

    #[test]
    fn rejects_malformed_clock_times() {
        for bad in ["", "8:30", "08:3:00", "08:30:0", "ab:cd:ef", "08-30-00", "08:30:00:00"] {
            assert!(parse_time(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn formats_clock_times() {
        assert_eq!(format_time(8 * 3600 + 5 * 60 + 9), "08:05:09");
        assert_eq!(format_time(25 * 3600 + 10 * 60), "25:10:00");
    }

    #[test]
    fn parses_service_dates() {
        assert_eq!(
            parse_service_date("20240110"),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
        assert_eq!(parse_service_date("2024-01-10"), None);
        assert_eq!(parse_service_date("abc"), None);
    }
}
