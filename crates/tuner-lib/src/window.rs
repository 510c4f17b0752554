//! Time window resolution
//!
//! Turns explicit bounds or a relative duration such as `30m`, `24h` or `7d`
//! into a concrete [`TimeWindow`].

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::error::AnalysisError;
use crate::models::TimeWindow;

/// Resolve the analysis window
///
/// # Arguments
/// * `explicit_start` - Start instant, takes precedence over `relative`
/// * `explicit_end` - End instant, `now` when absent
/// * `relative` - Duration of the form `<integer><m|h|d>`, used when no start is given
/// * `now` - Current instant
pub fn resolve(
    explicit_start: Option<&str>,
    explicit_end: Option<&str>,
    relative: &str,
    now: DateTime<Utc>,
) -> Result<TimeWindow, AnalysisError> {
    let end = match explicit_end {
        Some(raw) => parse_instant(raw)?,
        None => now,
    };

    if let Some(raw) = explicit_start {
        let start = parse_instant(raw)?;
        return TimeWindow::new(start, end);
    }

    let duration = parse_relative(relative)?;
    let start = end.checked_sub_signed(duration).ok_or_else(|| {
        AnalysisError::InvalidWindow(format!("window `{}` reaches before the epoch range", relative))
    })?;
    TimeWindow::new(start, end)
}

/// Parse an RFC 3339 instant, or a naive `YYYY-MM-DDTHH:MM:SS` read as UTC
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, AnalysisError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }
    Err(AnalysisError::InvalidWindow(format!(
        "cannot parse `{}` as a timestamp (expected RFC 3339)",
        raw
    )))
}

/// Parse `<integer><unit>` with unit in `m`, `h`, `d`
pub fn parse_relative(raw: &str) -> Result<Duration, AnalysisError> {
    let invalid = || {
        AnalysisError::InvalidWindow(format!(
            "`{}` is not a duration like 30m, 24h or 7d",
            raw
        ))
    };

    let raw = raw.trim();
    if raw.len() < 2 || !raw.is_ascii() {
        return Err(invalid());
    }
    let (amount, unit) = raw.split_at(raw.len() - 1);
    if !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let amount: i64 = amount.parse().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }

    let minutes_per_unit = match unit {
        "m" => 1,
        "h" => 60,
        "d" => 24 * 60,
        _ => return Err(invalid()),
    };

    amount
        .checked_mul(minutes_per_unit)
        .and_then(|minutes| minutes.checked_mul(60_000))
        .and_then(Duration::try_milliseconds)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_explicit_pair_is_returned_unchanged() {
        let window = resolve(
            Some("2024-05-10T10:00:00Z"),
            Some("2024-05-10T11:15:00Z"),
            "24h",
            fixed_now(),
        )
        .unwrap();

        assert_eq!(window.start(), Utc.with_ymd_and_hms(2024, 5, 10, 10, 0, 0).unwrap());
        assert_eq!(window.end(), Utc.with_ymd_and_hms(2024, 5, 10, 11, 15, 0).unwrap());
    }

    #[test]
    fn test_explicit_start_defaults_end_to_now() {
        let window = resolve(Some("2024-05-10T14:00:00+00:00"), None, "24h", fixed_now()).unwrap();
        assert_eq!(window.end(), fixed_now());
        assert_eq!(window.duration(), Duration::minutes(30));
    }

    #[test]
    fn test_relative_durations_are_exact() {
        let end = fixed_now();
        for (raw, millis) in [
            ("1m", 60_000_i64),
            ("30m", 1_800_000),
            ("24h", 86_400_000),
            ("7d", 604_800_000),
        ] {
            let window = resolve(None, Some("2024-05-10T14:30:00Z"), raw, end).unwrap();
            assert_eq!(
                window.end().timestamp_millis() - window.start().timestamp_millis(),
                millis,
                "duration {}",
                raw
            );
        }
    }

    #[test]
    fn test_relative_uses_now_without_end() {
        let window = resolve(None, None, "2h", fixed_now()).unwrap();
        assert_eq!(window.end(), fixed_now());
        assert_eq!(window.start(), fixed_now() - Duration::hours(2));
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let err = resolve(
            Some("2024-05-10T12:00:00Z"),
            Some("2024-05-10T11:00:00Z"),
            "24h",
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidWindow(_)));
    }

    #[test]
    fn test_start_equal_to_end_is_rejected() {
        let err = resolve(
            Some("2024-05-10T12:00:00Z"),
            Some("2024-05-10T12:00:00Z"),
            "24h",
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidWindow(_)));
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        for raw in ["", "m", "10", "10w", "-5m", "1.5h", "0h", "h10", "99999999999999999d"] {
            assert!(
                matches!(resolve(None, None, raw, fixed_now()), Err(AnalysisError::InvalidWindow(_))),
                "`{}` should be rejected",
                raw
            );
        }
        assert!(resolve(Some("yesterday"), None, "24h", fixed_now()).is_err());
        assert!(resolve(None, Some("soon"), "24h", fixed_now()).is_err());
    }

    #[test]
    fn test_naive_timestamps_read_as_utc() {
        let parsed = parse_instant("2024-05-10T09:45:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 5, 10, 9, 45, 0).unwrap());
    }
}
