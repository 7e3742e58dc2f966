//! Human-readable acquisition timestamps
//!
//! Records carry the sample's acquisition time rendered as
//! `YYYY-MM-DD HH:MM:SS.ffffff` in local time.

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone, Utc};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Split epoch seconds into whole seconds and nanoseconds, rounded to the
/// nearest microsecond
fn split_epoch(epoch_secs: f64) -> (i64, u32) {
    let micros = (epoch_secs * 1e6).round() as i64;
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    (secs, nanos)
}

/// Format epoch seconds in an arbitrary time zone
pub fn format_in<Tz>(epoch_secs: f64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let (secs, nanos) = split_epoch(epoch_secs);
    let utc = DateTime::<Utc>::from_timestamp(secs, nanos).unwrap_or_default();
    utc.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

/// Format epoch seconds in the local time zone
pub fn format_local(epoch_secs: f64) -> String {
    format_in(epoch_secs, &Local)
}

/// Parse a timestamp produced by [`format_in`] back to epoch seconds
pub fn parse_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<f64> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT).ok()?;
    let datetime = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => return None,
    };
    let utc = datetime.with_timezone(&Utc);
    Some(utc.timestamp() as f64 + utc.timestamp_subsec_micros() as f64 / 1e6)
}

/// Parse a local-time timestamp back to epoch seconds
pub fn parse_local(text: &str) -> Option<f64> {
    parse_in(text, &Local)
}

/// Current wall-clock time in epoch seconds
pub fn epoch_now() -> f64 {
    let now = Utc::now();
    now.timestamp() as f64 + now.timestamp_subsec_micros() as f64 / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_format_utc() {
        assert_eq!(format_in(0.0, &Utc), "1970-01-01 00:00:00.000000");
        assert_eq!(
            format_in(1_700_000_000.123456, &Utc),
            "2023-11-14 22:13:20.123456"
        );
    }

    #[test]
    fn test_format_fixed_offset() {
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(
            format_in(1_700_000_000.5, &seoul),
            "2023-11-15 07:13:20.500000"
        );
    }

    #[test]
    fn test_format_rounds_to_micros() {
        assert_eq!(format_in(1.0000004, &Utc), "1970-01-01 00:00:01.000000");
        assert_eq!(format_in(1.9999996, &Utc), "1970-01-01 00:00:02.000000");
    }

    #[test]
    fn test_parse_inverts_format() {
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let text = format_in(1_700_000_000.25, &seoul);

        assert_eq!(parse_in(&text, &seoul), Some(1_700_000_000.25));
        assert_eq!(parse_in("yesterday", &seoul), None);
    }

    #[test]
    fn test_local_round_trip() {
        let epoch = 1_700_000_000.75;
        assert_eq!(parse_local(&format_local(epoch)), Some(epoch));
    }
}
