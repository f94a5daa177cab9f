use super::payment::PaymentRecordResponse;
use crate::entities::SubscriptionStatus;
use crate::lifecycle::{LifecycleState, TimeRemaining};
use serde::Serialize;
use utoipa::ToSchema;

/// What the buyer dashboard renders.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub state: LifecycleState,
    /// The stored flag, which may lag `state` until the next reconciliation.
    pub subscription_status: SubscriptionStatus,
    pub plan: Option<String>,
    pub latest: Option<PaymentRecordResponse>,
    /// Only present while the plan is expiring soon.
    pub time_remaining: Option<TimeRemaining>,
    /// Formatted as `{h}h {m}m {s}s`.
    pub time_remaining_text: Option<String>,
    /// Newest first.
    pub history: Vec<PaymentRecordResponse>,
}
