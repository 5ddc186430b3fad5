//! Practice-decay detection.
//!
//! A skill goes stale after more than seven days without a passing
//! attempt. The flag only annotates display state; it never gates a
//! transition.

use chrono::{DateTime, Duration, Utc};

/// Days without practice before a skill is flagged as decaying.
pub const DECAY_THRESHOLD_DAYS: i64 = 7;

/// Whether a skill needs practice.
///
/// True strictly beyond the threshold: exactly seven days is not yet
/// decaying.
pub fn is_decaying(last_practiced_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(last_practiced_at) > Duration::days(DECAY_THRESHOLD_DAYS)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(day_of_month: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day_of_month, hour, 0, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn fresh_practice_is_not_decaying() {
        assert!(!is_decaying(at(1, 12), at(3, 12)));
    }

    #[test]
    fn exactly_seven_days_is_the_boundary() {
        assert!(!is_decaying(at(1, 12), at(8, 12)));
    }

    #[test]
    fn just_past_seven_days_decays() {
        assert!(is_decaying(at(1, 12), at(8, 13)));
    }

    #[test]
    fn long_gaps_decay() {
        assert!(is_decaying(at(1, 12), at(29, 12)));
    }
}
