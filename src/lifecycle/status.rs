use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::expiry::compute_expiry;
use crate::entities::PaymentRecord;

/// Length of the warning window before expiry.
pub const EXPIRING_SOON_HOURS: i64 = 24;

/// Lifecycle of a subscriber, derived on demand from the latest payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    NoHistory,
    Active,
    ExpiringSoon,
    Expired,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::NoHistory => write!(f, "no-history"),
            LifecycleState::Active => write!(f, "active"),
            LifecycleState::ExpiringSoon => write!(f, "expiring-soon"),
            LifecycleState::Expired => write!(f, "expired"),
        }
    }
}

/// Picks the record with the greatest purchase timestamp. Records without a
/// timestamp sort before any dated record; on a tie the later one in
/// iteration order wins.
pub fn latest_record<'a, I>(records: I) -> Option<&'a PaymentRecord>
where
    I: IntoIterator<Item = &'a PaymentRecord>,
{
    records.into_iter().max_by_key(|r| r.purchased_at)
}

/// Classifies a subscriber from its latest record only. Earlier purchases
/// never extend or shorten the current window.
pub fn classify(latest: Option<&PaymentRecord>, now: DateTime<Utc>) -> LifecycleState {
    let Some(record) = latest else {
        return LifecycleState::NoHistory;
    };
    match compute_expiry(record.purchased_at, &record.plan_name) {
        Some(expiry) => classify_expiry(expiry, now),
        None => LifecycleState::NoHistory,
    }
}

pub fn classify_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> LifecycleState {
    if now > expiry {
        LifecycleState::Expired
    } else if expiry - now < Duration::hours(EXPIRING_SOON_HOURS) {
        LifecycleState::ExpiringSoon
    } else {
        LifecycleState::Active
    }
}

/// Countdown shown while a plan is expiring soon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeRemaining {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl std::fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

/// Whole hours, minutes and seconds until `expiry`; zero once it has passed.
pub fn time_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let total = (expiry - now).num_seconds().max(0);
    TimeRemaining {
        hours: total / 3600,
        minutes: (total % 3600) / 60,
        seconds: total % 60,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn record(id: i64, plan: &str, purchased_at: Option<DateTime<Utc>>) -> PaymentRecord {
        PaymentRecord {
            id,
            subscriber_id: "uid-1".to_string(),
            transaction_id: format!("pi_{id}"),
            plan_name: plan.to_string(),
            plan_duration: None,
            amount: 1_500_000,
            currency: "inr".to_string(),
            status: "succeeded".to_string(),
            store_id: Some("STR-TEST".to_string()),
            store_name: Some("Corner Shop".to_string()),
            customer_name: Some("Asha Rao".to_string()),
            email: Some("asha@example.com".to_string()),
            mobile: None,
            purchased_at,
            created_at: purchased_at,
        }
    }

    #[test]
    fn test_no_record_is_no_history() {
        assert_eq!(classify(None, at(2025, 1, 1, 0, 0, 0)), LifecycleState::NoHistory);
    }

    #[test]
    fn test_missing_timestamp_is_no_history() {
        let r = record(1, "1 Year Access", None);
        assert_eq!(classify(Some(&r), at(2025, 1, 1, 0, 0, 0)), LifecycleState::NoHistory);
    }

    #[test]
    fn test_one_year_plan_around_expiry_instant() {
        let r = record(1, "1 Year Access", Some(at(2024, 1, 10, 0, 0, 0)));
        assert_eq!(classify(Some(&r), at(2025, 1, 8, 0, 0, 0)), LifecycleState::Active);
        // 2025-01-09 00:00 is exactly 24h out: not yet expiring-soon
        assert_eq!(classify(Some(&r), at(2025, 1, 9, 0, 0, 0)), LifecycleState::Active);
        assert_eq!(
            classify(Some(&r), at(2025, 1, 9, 0, 0, 1)),
            LifecycleState::ExpiringSoon
        );
        // the exact expiry instant is still inside the term
        assert_eq!(
            classify(Some(&r), at(2025, 1, 10, 0, 0, 0)),
            LifecycleState::ExpiringSoon
        );
        assert_eq!(classify(Some(&r), at(2025, 1, 10, 0, 0, 1)), LifecycleState::Expired);
    }

    #[test]
    fn test_three_year_plan_expiring_soon_countdown() {
        let r = record(1, "3 Years Access", Some(at(2023, 6, 1, 0, 0, 0)));
        let now = at(2026, 5, 31, 6, 0, 0);
        assert_eq!(classify(Some(&r), now), LifecycleState::ExpiringSoon);
        let expiry = compute_expiry(r.purchased_at, &r.plan_name).unwrap();
        assert_eq!(expiry, at(2026, 6, 1, 0, 0, 0));
        assert_eq!(time_remaining(expiry, now).to_string(), "18h 0m 0s");

        let noon = at(2026, 5, 31, 12, 0, 0);
        assert_eq!(classify(Some(&r), noon), LifecycleState::ExpiringSoon);
        assert_eq!(time_remaining(expiry, noon).to_string(), "12h 0m 0s");
    }

    #[test]
    fn test_latest_record_wins_over_longer_older_plan() {
        // the older purchase would still be valid until 2030
        let older = record(1, "5 Years Access", Some(at(2025, 3, 1, 0, 0, 0)));
        let newer = record(2, "1 Year Access", Some(at(2025, 6, 1, 0, 0, 0)));
        let records = vec![older, newer];
        let latest = latest_record(&records).unwrap();
        assert_eq!(latest.id, 2);
        assert_eq!(
            classify(Some(latest), at(2026, 6, 2, 0, 0, 0)),
            LifecycleState::Expired
        );
    }

    #[test]
    fn test_latest_record_ignores_order_and_missing_timestamps() {
        let records = vec![
            record(1, "1 Year Access", Some(at(2024, 5, 1, 0, 0, 0))),
            record(2, "1 Year Access", None),
            record(3, "1 Year Access", Some(at(2023, 5, 1, 0, 0, 0))),
        ];
        assert_eq!(latest_record(&records).map(|r| r.id), Some(1));
        assert!(latest_record(&Vec::<PaymentRecord>::new()).is_none());
    }

    #[test]
    fn test_expired_is_monotonic_in_time() {
        let r = record(1, "1 Year Access", Some(at(2024, 1, 10, 0, 0, 0)));
        let mut seen_expired = false;
        let start = at(2025, 1, 8, 0, 0, 0);
        for step in 0..(4 * 24) {
            let now = start + Duration::hours(step);
            let state = classify(Some(&r), now);
            if seen_expired {
                assert_eq!(state, LifecycleState::Expired);
            }
            seen_expired |= state == LifecycleState::Expired;
        }
        assert!(seen_expired);
    }

    #[test]
    fn test_expiring_soon_only_inside_window() {
        let expiry = at(2026, 1, 1, 0, 0, 0);
        for minutes_before in [-60i64, -1, 0, 1, 60, 23 * 60 + 59, 24 * 60, 24 * 60 + 1, 10_000] {
            let now = expiry - Duration::minutes(minutes_before);
            let state = classify_expiry(expiry, now);
            let remaining = expiry - now;
            let inside = remaining >= Duration::zero()
                && remaining < Duration::hours(EXPIRING_SOON_HOURS);
            assert_eq!(state == LifecycleState::ExpiringSoon, inside, "{minutes_before}");
        }
    }

    #[test]
    fn test_time_remaining_format_and_clamp() {
        let expiry = at(2026, 1, 1, 0, 0, 0);
        let t = time_remaining(expiry, at(2025, 12, 31, 1, 58, 55));
        assert_eq!(t.to_string(), "22h 1m 5s");
        assert_eq!((t.hours, t.minutes, t.seconds), (22, 1, 5));
        assert_eq!(time_remaining(expiry, at(2026, 1, 2, 0, 0, 0)).to_string(), "0h 0m 0s");
    }

    #[test]
    fn test_state_serialization() {
        assert_eq!(
            serde_json::to_string(&LifecycleState::ExpiringSoon).unwrap(),
            "\"expiring-soon\""
        );
        assert_eq!(LifecycleState::NoHistory.to_string(), "no-history");
    }
}
