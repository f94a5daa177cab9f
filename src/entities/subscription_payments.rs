use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// One purchase event. Append-only: rows are inserted by the payment
/// workflow and never updated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subscription_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subscriber_id: String,
    #[sea_orm(unique)]
    pub transaction_id: String,
    /// Human readable plan label, e.g. "3 Years Access".
    pub plan_name: String,
    pub plan_duration: Option<String>,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub store_id: Option<String>,
    pub store_name: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub purchased_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
