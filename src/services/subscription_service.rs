use crate::entities::{PaymentRecord, SubscriberAccount, SubscriptionStatus};
use crate::error::AppResult;
use crate::lifecycle::{
    Clock, LifecycleState, Notification, NotificationCenter, ReconcileReport, classify,
    compute_expiry, latest_record, reconcile, time_remaining,
};
use crate::models::*;
use crate::services::{PaymentService, StoreService, matches_search, newest_first};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Buyer dashboard for one subscriber. `history` may be in any order.
pub fn build_dashboard(
    subscription_status: SubscriptionStatus,
    plan: Option<String>,
    mut history: Vec<PaymentRecord>,
    now: DateTime<Utc>,
) -> DashboardResponse {
    let latest = latest_record(history.iter()).cloned();
    let state = classify(latest.as_ref(), now);
    let remaining = match (state, latest.as_ref()) {
        (LifecycleState::ExpiringSoon, Some(rec)) => compute_expiry(rec.purchased_at, &rec.plan_name)
            .map(|expiry| time_remaining(expiry, now)),
        _ => None,
    };

    newest_first(&mut history);
    DashboardResponse {
        state,
        subscription_status,
        plan,
        latest: latest.map(|r| PaymentRecordResponse::from_record(r, now)),
        time_remaining: remaining,
        time_remaining_text: remaining.map(|r| r.to_string()),
        history: history
            .into_iter()
            .map(|r| PaymentRecordResponse::from_record(r, now))
            .collect(),
    }
}

/// Joins accounts with their payment history for the admin table, keeping
/// only stores that match `search`.
pub fn build_store_rows(
    stores: Vec<SubscriberAccount>,
    payments: &[PaymentRecord],
    search: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<AdminStoreRow> {
    let mut by_subscriber: HashMap<&str, Vec<&PaymentRecord>> = HashMap::new();
    for p in payments {
        by_subscriber.entry(p.subscriber_id.as_str()).or_default().push(p);
    }

    stores
        .into_iter()
        .filter(|s| search.is_none_or(|needle| matches_search(s, needle)))
        .map(|store| {
            let records = by_subscriber.get(store.id.as_str());
            let latest = records.and_then(|r| latest_record(r.iter().copied()));
            AdminStoreRow {
                latest_plan: latest.map(|r| r.plan_name.clone()),
                latest_amount: latest.map(|r| r.amount),
                purchase_count: records.map_or(0, |r| r.len()),
                expires_at: latest.and_then(|r| compute_expiry(r.purchased_at, &r.plan_name)),
                lifecycle_state: classify(latest, now),
                store: StoreResponse::from(store),
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct SubscriptionService {
    store_service: StoreService,
    payment_service: PaymentService,
    notifications: NotificationCenter,
    clock: Arc<dyn Clock>,
    reconcile_on_admin_view: bool,
}

impl SubscriptionService {
    pub fn new(
        store_service: StoreService,
        payment_service: PaymentService,
        notifications: NotificationCenter,
        clock: Arc<dyn Clock>,
        reconcile_on_admin_view: bool,
    ) -> Self {
        Self {
            store_service,
            payment_service,
            notifications,
            clock,
            reconcile_on_admin_view,
        }
    }

    pub async fn dashboard(&self, subscriber_id: &str) -> AppResult<DashboardResponse> {
        let store = self.store_service.find(subscriber_id).await?;
        let history = self.payment_service.history(subscriber_id).await?;
        Ok(build_dashboard(
            store.subscription_status,
            store.plan,
            history,
            self.clock.now(),
        ))
    }

    /// One reconciliation pass over a fresh snapshot of accounts and payments.
    pub async fn run_reconciliation(&self) -> AppResult<ReconcileReport> {
        let accounts = self.store_service.list_all().await?;
        let payments = self.payment_service.all_records().await?;
        let report = reconcile(
            &self.store_service,
            &self.notifications,
            &accounts,
            &payments,
            self.clock.now(),
        )
        .await;
        log::debug!(
            "Reconciliation scanned {} accounts: {} corrected, {} failed",
            report.scanned,
            report.corrections.len(),
            report.failures.len()
        );
        Ok(report)
    }

    pub async fn admin_stores(&self, query: StoreQuery) -> AppResult<PaginatedResponse<AdminStoreRow>> {
        if self.reconcile_on_admin_view
            && let Err(e) = self.run_reconciliation().await
        {
            log::error!("Reconciliation before admin view failed: {e}");
        }

        let stores = self.store_service.list_all().await?;
        let payments = self.payment_service.all_records().await?;
        let rows = build_store_rows(stores, &payments, query.search.as_deref(), self.clock.now());
        Ok(PaginationParams::new(query.page, query.page_size).paginate(rows))
    }

    pub async fn store_payments(&self, subscriber_id: &str) -> AppResult<Vec<PaymentRecordResponse>> {
        self.store_service.find(subscriber_id).await?;
        let now = self.clock.now();
        Ok(self
            .payment_service
            .history(subscriber_id)
            .await?
            .into_iter()
            .map(|r| PaymentRecordResponse::from_record(r, now))
            .collect())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.recent()
    }
}
