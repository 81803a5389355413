//! Time helpers

use chrono::{DateTime, Utc};

/// Whole minutes elapsed from `start` to `end`, clamped to zero
///
/// Sub-minute remainders are dropped. Clocks can disagree enough for a
/// submission to carry a timestamp slightly before the contest start, so
/// negative spans clamp to zero instead of producing negative penalties.
pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_minutes().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_whole_minutes_floor() {
        let start = Utc::now();
        assert_eq!(minutes_between(start, start + Duration::seconds(59)), 0);
        assert_eq!(minutes_between(start, start + Duration::seconds(60)), 1);
        assert_eq!(minutes_between(start, start + Duration::seconds(119)), 1);
        assert_eq!(minutes_between(start, start + Duration::minutes(32)), 32);
    }

    #[test]
    fn test_negative_span_clamps_to_zero() {
        let start = Utc::now();
        assert_eq!(minutes_between(start, start - Duration::minutes(5)), 0);
    }
}
