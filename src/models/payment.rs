use crate::entities::{SubscriptionStatus, payment_entity as pay};
use crate::lifecycle::{LifecycleState, classify_expiry, compute_expiry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentIntentRequest {
    pub plan_id: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentIntentResponse {
    pub payment_intent_id: String,
    pub client_secret: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    pub plan_id: i32,
    pub plan_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmPaymentRequest {
    pub plan_id: i32,
    pub payment_intent_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmPaymentResponse {
    pub payment: PaymentRecordResponse,
    pub subscription_status: SubscriptionStatus,
    pub plan: String,
}

/// A ledger entry together with the expiry derived from it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentRecordResponse {
    pub id: i64,
    pub subscriber_id: String,
    pub transaction_id: String,
    pub plan_name: String,
    pub plan_duration: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub store_id: Option<String>,
    pub store_name: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    /// True once `expires_at` has passed. Undated records are never expired.
    pub expired: bool,
}

impl PaymentRecordResponse {
    pub fn from_record(m: pay::Model, now: DateTime<Utc>) -> Self {
        let expires_at = compute_expiry(m.purchased_at, &m.plan_name);
        let expired = expires_at
            .map(|e| classify_expiry(e, now) == LifecycleState::Expired)
            .unwrap_or(false);
        Self {
            id: m.id,
            subscriber_id: m.subscriber_id,
            transaction_id: m.transaction_id,
            plan_name: m.plan_name,
            plan_duration: m.plan_duration,
            amount: m.amount,
            currency: m.currency,
            status: m.status,
            store_id: m.store_id,
            store_name: m.store_name,
            customer_name: m.customer_name,
            email: m.email,
            mobile: m.mobile,
            purchased_at: m.purchased_at,
            expires_at,
            expired,
        }
    }
}
