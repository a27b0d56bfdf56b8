use chrono::{DateTime, Duration, FixedOffset, Local};

pub fn time_now() -> String {
    let now = Local::now();
    let now: DateTime<FixedOffset> = now.with_timezone(now.offset());
    now.to_rfc3339()
}

pub fn time_now_plus_hours(hours: i64) -> String {
    let at = Local::now() + Duration::hours(hours);
    let at: DateTime<FixedOffset> = at.with_timezone(at.offset());
    at.to_rfc3339()
}

/// Unparseable timestamps count as expired.
pub fn is_expired(rfc3339: &str) -> bool {
    match DateTime::parse_from_rfc3339(rfc3339) {
        Ok(at) => at < Local::now().fixed_offset(),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_timestamp_is_not_expired() {
        assert!(!is_expired(&time_now_plus_hours(1)));
    }

    #[test]
    fn test_past_timestamp_is_expired() {
        assert!(is_expired(&time_now_plus_hours(-1)));
    }

    #[test]
    fn test_garbage_timestamp_is_expired() {
        assert!(is_expired("not-a-timestamp"));
    }
}
