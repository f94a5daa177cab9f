//! Auto-deactivation of subscribers whose latest plan has run out.
//!
//! The pass only ever moves `active -> inactive`. Activation stays with the
//! payment workflow and the operator toggle. Decisions are computed from the
//! snapshot passed in, so re-running on a fresh snapshot after corrections
//! have landed yields no new work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use super::expiry::compute_expiry;
use super::notify::{Notification, NotificationKind, NotificationSink};
use super::status::{LifecycleState, classify_expiry, latest_record};
use crate::entities::{PaymentRecord, SubscriberAccount, SubscriptionStatus};
use crate::error::AppResult;

/// Write side of the subscriber account store used by the reconciler.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn set_subscription_status(
        &self,
        subscriber_id: &str,
        status: SubscriptionStatus,
    ) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CorrectionEvent {
    pub subscriber_id: String,
    pub store_name: String,
    pub expired_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CorrectionFailure {
    pub subscriber_id: String,
    pub store_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct ReconcileReport {
    /// Accounts in the snapshot.
    pub scanned: usize,
    pub corrections: Vec<CorrectionEvent>,
    pub failures: Vec<CorrectionFailure>,
}

/// Corrections the snapshot calls for, without touching the store.
///
/// Only `active` accounts whose latest payment classifies as `expired` are
/// returned. Accounts without payments, or whose latest payment has no
/// purchase timestamp, are skipped.
pub fn plan_corrections(
    accounts: &[SubscriberAccount],
    payments: &[PaymentRecord],
    now: DateTime<Utc>,
) -> Vec<CorrectionEvent> {
    let mut by_subscriber: HashMap<&str, Vec<&PaymentRecord>> = HashMap::new();
    for p in payments {
        by_subscriber
            .entry(p.subscriber_id.as_str())
            .or_default()
            .push(p);
    }

    accounts
        .iter()
        .filter(|a| a.subscription_status == SubscriptionStatus::Active)
        .filter_map(|account| {
            let records = by_subscriber.get(account.id.as_str())?;
            let latest = latest_record(records.iter().copied())?;
            let expiry = compute_expiry(latest.purchased_at, &latest.plan_name)?;
            (classify_expiry(expiry, now) == LifecycleState::Expired).then(|| CorrectionEvent {
                subscriber_id: account.id.clone(),
                store_name: account.store_name.clone(),
                expired_at: expiry,
            })
        })
        .collect()
}

/// Runs one reconciliation pass over a snapshot.
///
/// Writes are issued concurrently and are independent: a failed write is
/// logged, reported to the sink and recorded in the report while the other
/// corrections still apply.
pub async fn reconcile<S, N>(
    store: &S,
    sink: &N,
    accounts: &[SubscriberAccount],
    payments: &[PaymentRecord],
    now: DateTime<Utc>,
) -> ReconcileReport
where
    S: SubscriberStore + ?Sized,
    N: NotificationSink + ?Sized,
{
    let planned = plan_corrections(accounts, payments, now);
    let writes = planned.into_iter().map(|event| async move {
        let result = store
            .set_subscription_status(&event.subscriber_id, SubscriptionStatus::Inactive)
            .await;
        (event, result)
    });

    let mut report = ReconcileReport {
        scanned: accounts.len(),
        ..Default::default()
    };
    for (event, result) in join_all(writes).await {
        match result {
            Ok(()) => {
                log::info!(
                    "Auto-deactivated subscriber {} ({}), plan expired at {}",
                    event.subscriber_id,
                    event.store_name,
                    event.expired_at
                );
                sink.notify(
                    Notification::new(
                        NotificationKind::Warning,
                        format!("Plan Expired: {} has been deactivated.", event.store_name),
                        now,
                    )
                    .for_subscriber(event.subscriber_id.clone()),
                );
                report.corrections.push(event);
            }
            Err(e) => {
                log::error!(
                    "Auto-deactivate failed for subscriber {}: {e}",
                    event.subscriber_id
                );
                sink.notify(
                    Notification::new(
                        NotificationKind::Error,
                        format!("Auto-deactivate failed for {}", event.store_name),
                        now,
                    )
                    .for_subscriber(event.subscriber_id.clone()),
                );
                report.failures.push(CorrectionFailure {
                    subscriber_id: event.subscriber_id,
                    store_name: event.store_name,
                    error: e.to_string(),
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::lifecycle::notify::NotificationCenter;
    use chrono::{Duration, Months, TimeZone};
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStore {
        statuses: Mutex<HashMap<String, SubscriptionStatus>>,
        writes: Mutex<Vec<String>>,
        failing: HashSet<String>,
    }

    impl MockStore {
        fn failing_for(ids: &[&str]) -> Self {
            Self {
                failing: ids.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn written(&self) -> Vec<String> {
            self.writes.lock().unwrap().clone()
        }

        /// Applies persisted writes back onto a snapshot.
        fn apply(&self, accounts: &mut [SubscriberAccount]) {
            let statuses = self.statuses.lock().unwrap();
            for a in accounts.iter_mut() {
                if let Some(s) = statuses.get(&a.id) {
                    a.subscription_status = *s;
                }
            }
        }
    }

    #[async_trait]
    impl SubscriberStore for MockStore {
        async fn set_subscription_status(
            &self,
            subscriber_id: &str,
            status: SubscriptionStatus,
        ) -> AppResult<()> {
            if self.failing.contains(subscriber_id) {
                return Err(AppError::InternalError("write timed out".into()));
            }
            self.writes.lock().unwrap().push(subscriber_id.to_string());
            self.statuses
                .lock()
                .unwrap()
                .insert(subscriber_id.to_string(), status);
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap()
    }

    fn account(id: &str, status: SubscriptionStatus) -> SubscriberAccount {
        SubscriberAccount {
            id: id.to_string(),
            store_id: format!("STR-{id}"),
            store_name: format!("Store {id}"),
            first_name: "Ravi".to_string(),
            last_name: "Kumar".to_string(),
            email: format!("{id}@example.com"),
            mobile: "9876543210".to_string(),
            address: None,
            city: None,
            pincode: None,
            country: Some("IN".to_string()),
            profile_image: None,
            subscription_status: status,
            plan: Some("1 Year Access".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    fn payment(
        id: i64,
        subscriber: &str,
        plan: &str,
        purchased_at: Option<DateTime<Utc>>,
    ) -> PaymentRecord {
        PaymentRecord {
            id,
            subscriber_id: subscriber.to_string(),
            transaction_id: format!("pi_{id}"),
            plan_name: plan.to_string(),
            plan_duration: None,
            amount: 1_500_000,
            currency: "inr".to_string(),
            status: "succeeded".to_string(),
            store_id: None,
            store_name: None,
            customer_name: None,
            email: None,
            mobile: None,
            purchased_at,
            created_at: purchased_at,
        }
    }

    /// A one year purchase whose expiry is exactly `expiry`.
    fn one_year_expiring_at(id: i64, subscriber: &str, expiry: DateTime<Utc>) -> PaymentRecord {
        let purchased_at = expiry.checked_sub_months(Months::new(12));
        payment(id, subscriber, "1 Year Access", purchased_at)
    }

    fn expired_days_ago(id: i64, subscriber: &str, days: i64) -> PaymentRecord {
        one_year_expiring_at(id, subscriber, now() - Duration::days(days))
    }

    #[tokio::test]
    async fn test_expired_active_account_is_deactivated_once() {
        let accounts = vec![
            account("a", SubscriptionStatus::Active),
            account("b", SubscriptionStatus::Active),
        ];
        let payments = vec![
            expired_days_ago(1, "a", 10),
            payment(2, "b", "3 Years Access", Some(now() - Duration::days(30))),
        ];
        let store = MockStore::default();
        let sink = NotificationCenter::new(10);

        let report = reconcile(&store, &sink, &accounts, &payments, now()).await;

        assert_eq!(report.scanned, 2);
        assert_eq!(report.corrections.len(), 1);
        assert_eq!(report.corrections[0].subscriber_id, "a");
        assert_eq!(report.corrections[0].store_name, "Store a");
        assert_eq!(report.corrections[0].expired_at, now() - Duration::days(10));
        assert!(report.failures.is_empty());
        assert_eq!(store.written(), vec!["a".to_string()]);
        assert_eq!(
            store.statuses.lock().unwrap().get("a"),
            Some(&SubscriptionStatus::Inactive)
        );

        let notes = sink.recent();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Warning);
        assert_eq!(notes[0].message, "Plan Expired: Store a has been deactivated.");
    }

    #[tokio::test]
    async fn test_second_pass_is_idempotent() {
        let mut accounts = vec![
            account("a", SubscriptionStatus::Active),
            account("b", SubscriptionStatus::Active),
        ];
        let payments = vec![expired_days_ago(1, "a", 3), expired_days_ago(2, "b", 40)];
        let store = MockStore::default();
        let sink = NotificationCenter::new(10);

        let first = reconcile(&store, &sink, &accounts, &payments, now()).await;
        assert_eq!(first.corrections.len(), 2);

        store.apply(&mut accounts);
        let second = reconcile(&store, &sink, &accounts, &payments, now()).await;
        assert!(second.corrections.is_empty());
        assert!(second.failures.is_empty());
        assert_eq!(store.written().len(), 2);
    }

    #[tokio::test]
    async fn test_inactive_accounts_are_never_activated_or_touched() {
        let accounts = vec![
            account("expired", SubscriptionStatus::Inactive),
            account("valid", SubscriptionStatus::Inactive),
        ];
        let payments = vec![
            expired_days_ago(1, "expired", 5),
            payment(2, "valid", "5 Years Access", Some(now() - Duration::days(1))),
        ];
        let store = MockStore::default();
        let sink = NotificationCenter::new(10);

        let report = reconcile(&store, &sink, &accounts, &payments, now()).await;
        assert!(report.corrections.is_empty());
        assert!(store.written().is_empty());
        assert!(sink.recent().is_empty());
    }

    #[tokio::test]
    async fn test_accounts_without_history_are_skipped() {
        let accounts = vec![account("fresh", SubscriptionStatus::Active)];
        let payments = vec![
            expired_days_ago(1, "someone-else", 10),
            payment(2, "fresh-undated", "1 Year Access", None),
        ];
        let store = MockStore::default();
        let sink = NotificationCenter::new(10);

        let report = reconcile(&store, &sink, &accounts, &payments, now()).await;
        assert!(report.corrections.is_empty());
        assert!(store.written().is_empty());
    }

    #[test]
    fn test_undated_latest_payment_cannot_expire() {
        let accounts = vec![account("a", SubscriptionStatus::Active)];
        let payments = vec![payment(1, "a", "1 Year Access", None)];
        assert!(plan_corrections(&accounts, &payments, now()).is_empty());
    }

    #[test]
    fn test_newest_payment_decides_even_if_older_is_still_valid() {
        let accounts = vec![account("a", SubscriptionStatus::Active)];
        let payments = vec![
            // valid until 2030
            payment(1, "a", "5 Years Access", Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())),
            // newer, already over
            payment(2, "a", "1 Year Access", Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap())),
        ];
        let planned = plan_corrections(&accounts, &payments, now());
        assert_eq!(planned.len(), 1);
        assert_eq!(
            planned[0].expired_at,
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_failed_write_does_not_block_others() {
        let accounts = vec![
            account("a", SubscriptionStatus::Active),
            account("b", SubscriptionStatus::Active),
            account("c", SubscriptionStatus::Active),
        ];
        let payments = vec![
            expired_days_ago(1, "a", 2),
            expired_days_ago(2, "b", 2),
            expired_days_ago(3, "c", 2),
        ];
        let store = MockStore::failing_for(&["b"]);
        let sink = NotificationCenter::new(10);

        let report = reconcile(&store, &sink, &accounts, &payments, now()).await;

        let mut corrected: Vec<_> = report
            .corrections
            .iter()
            .map(|c| c.subscriber_id.as_str())
            .collect();
        corrected.sort();
        assert_eq!(corrected, vec!["a", "c"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].subscriber_id, "b");
        assert!(report.failures[0].error.contains("write timed out"));

        let errors = sink
            .recent()
            .into_iter()
            .filter(|n| n.kind == NotificationKind::Error)
            .count();
        assert_eq!(errors, 1);
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_noop() {
        let store = MockStore::default();
        let sink = NotificationCenter::new(10);
        let report = reconcile(&store, &sink, &[], &[], now()).await;
        assert_eq!(report.scanned, 0);
        assert!(report.corrections.is_empty());
        assert!(store.written().is_empty());
    }

    #[test]
    fn test_expiring_soon_is_not_corrected() {
        let accounts = vec![account("a", SubscriptionStatus::Active)];
        // expires in two hours
        let payments = vec![one_year_expiring_at(1, "a", now() + Duration::hours(2))];
        assert!(plan_corrections(&accounts, &payments, now()).is_empty());
    }
}
