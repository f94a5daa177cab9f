use crate::entities::{SubscriptionStatus, store_entity as st};
use crate::lifecycle::LifecycleState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterStoreRequest {
    pub first_name: String,
    pub last_name: String,
    pub store_name: String,
    pub mobile: String,
    /// Defaults to the email in the access token.
    pub email: Option<String>,
    /// `data:image/...;base64,...`, at most 800 KB decoded.
    pub profile_image: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub store_name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    /// An empty string removes the current image.
    pub profile_image: Option<String>,
}

/// Fields an operator may edit from the console.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AdminUpdateStoreRequest {
    pub first_name: Option<String>,
    pub store_name: Option<String>,
    pub store_id: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreResponse {
    pub id: String,
    pub store_id: String,
    pub store_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub profile_image: Option<String>,
    pub subscription_status: SubscriptionStatus,
    pub plan: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<st::Model> for StoreResponse {
    fn from(m: st::Model) -> Self {
        Self {
            id: m.id,
            store_id: m.store_id,
            store_name: m.store_name,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            mobile: m.mobile,
            address: m.address,
            city: m.city,
            pincode: m.pincode,
            country: m.country,
            profile_image: m.profile_image,
            subscription_status: m.subscription_status,
            plan: m.plan,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StoreQuery {
    /// Case-insensitive match on store name, email or store id.
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// One row of the admin store table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminStoreRow {
    #[serde(flatten)]
    pub store: StoreResponse,
    pub latest_plan: Option<String>,
    pub latest_amount: Option<i64>,
    pub purchase_count: usize,
    pub expires_at: Option<DateTime<Utc>>,
    pub lifecycle_state: LifecycleState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminStats {
    pub total_stores: u64,
    pub active_stores: u64,
    pub inactive_stores: u64,
    /// Sum of all payment amounts, in minor units.
    pub total_revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleStatusResponse {
    pub id: String,
    pub subscription_status: SubscriptionStatus,
}
