use crate::entities::{SubscriptionStatus, payment_entity as pay, store_entity as st};
use crate::error::{AppError, AppResult};
use crate::external::StripeService;
use crate::lifecycle::Clock;
use crate::models::*;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use stripe::PaymentIntentStatus;

/// A confirmed intent must have succeeded for exactly the plan price.
pub fn check_intent(status: PaymentIntentStatus, amount: i64, expected: i64) -> AppResult<()> {
    if status != PaymentIntentStatus::Succeeded {
        return Err(AppError::PaymentError(format!(
            "Payment not successful (status: {})",
            status.as_str()
        )));
    }
    if amount != expected {
        return Err(AppError::PaymentError(format!(
            "Paid amount {amount} does not match plan price {expected}"
        )));
    }
    Ok(())
}

/// Intents carry the subscriber they were created for in their metadata.
pub fn check_intent_owner(metadata: &HashMap<String, String>, subscriber_id: &str) -> AppResult<()> {
    match metadata.get("subscriber_id") {
        Some(owner) if owner == subscriber_id => Ok(()),
        _ => {
            log::warn!("Subscriber {subscriber_id} tried to confirm an intent it did not create");
            Err(AppError::Forbidden)
        }
    }
}

/// Whether a transaction id is new to the ledger or a repeat confirmation.
#[derive(Debug, PartialEq)]
pub enum Confirmation {
    New,
    Replay(pay::Model),
}

pub fn confirmation_for(existing: Option<pay::Model>, subscriber_id: &str) -> AppResult<Confirmation> {
    match existing {
        None => Ok(Confirmation::New),
        Some(rec) if rec.subscriber_id != subscriber_id => Err(AppError::Conflict(
            "Payment already recorded for another account".into(),
        )),
        Some(rec) => Ok(Confirmation::Replay(rec)),
    }
}

/// A repeat confirmation reports the account as it stands. Only a new
/// payment may move it to `active`.
pub fn replay_response(store: &st::Model, record: pay::Model, now: DateTime<Utc>) -> ConfirmPaymentResponse {
    ConfirmPaymentResponse {
        plan: store.plan.clone().unwrap_or_else(|| record.plan_name.clone()),
        subscription_status: store.subscription_status,
        payment: PaymentRecordResponse::from_record(record, now),
    }
}

/// Orders by purchase time, newest first; undated records go last.
pub fn newest_first(records: &mut [pay::Model]) {
    records.sort_by(|a, b| b.purchased_at.cmp(&a.purchased_at).then(b.id.cmp(&a.id)));
}

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    stripe_service: StripeService,
    clock: Arc<dyn Clock>,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection, stripe_service: StripeService, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            stripe_service,
            clock,
        }
    }

    async fn find_store(&self, subscriber_id: &str) -> AppResult<st::Model> {
        st::Entity::find_by_id(subscriber_id.to_string())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Register your store before purchasing a plan".into()))
    }

    pub async fn create_intent(
        &self,
        subscriber_id: &str,
        req: CreatePaymentIntentRequest,
    ) -> AppResult<CreatePaymentIntentResponse> {
        let plan = find_plan(req.plan_id)?;
        let store = self.find_store(subscriber_id).await?;

        let description = format!(
            "Subscription: {} - {} ({})",
            plan.label, store.store_name, store.store_id
        );
        let mut metadata = HashMap::new();
        metadata.insert("subscriber_id".to_string(), subscriber_id.to_string());
        metadata.insert("store_id".to_string(), store.store_id.clone());
        metadata.insert("plan_id".to_string(), plan.id.to_string());

        let pi = self
            .stripe_service
            .create_payment_intent(plan.price, &description, metadata)
            .await?;

        Ok(CreatePaymentIntentResponse {
            payment_intent_id: pi.id.to_string(),
            client_secret: pi.client_secret.unwrap_or_default(),
            amount: pi.amount,
            currency: self.stripe_service.currency_code().to_string(),
            plan_id: plan.id,
            plan_name: plan.label,
        })
    }

    /// Records a succeeded payment and activates the account. Confirming the
    /// same intent again returns the existing record and leaves the account
    /// untouched.
    pub async fn confirm(
        &self,
        subscriber_id: &str,
        req: ConfirmPaymentRequest,
    ) -> AppResult<ConfirmPaymentResponse> {
        let plan = find_plan(req.plan_id)?;
        let pi = self
            .stripe_service
            .retrieve_payment_intent(&req.payment_intent_id)
            .await?;
        check_intent(pi.status, pi.amount, plan.price)?;
        check_intent_owner(&pi.metadata, subscriber_id)?;

        let now = self.clock.now();
        let txn = self.pool.begin().await?;

        let store = st::Entity::find_by_id(subscriber_id.to_string())
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".into()))?;

        let existing = pay::Entity::find()
            .filter(pay::Column::TransactionId.eq(req.payment_intent_id.clone()))
            .one(&txn)
            .await?;
        let record = match confirmation_for(existing, subscriber_id)? {
            Confirmation::Replay(rec) => {
                log::info!("Payment {} already recorded", rec.transaction_id);
                return Ok(replay_response(&store, rec, now));
            }
            Confirmation::New => {
                pay::ActiveModel {
                    subscriber_id: Set(subscriber_id.to_string()),
                    transaction_id: Set(req.payment_intent_id.clone()),
                    plan_name: Set(plan.label.clone()),
                    plan_duration: Set(Some(plan.period.clone())),
                    amount: Set(pi.amount),
                    currency: Set(self.stripe_service.currency_code().to_string()),
                    status: Set("succeeded".to_string()),
                    store_id: Set(Some(store.store_id.clone())),
                    store_name: Set(Some(store.store_name.clone())),
                    customer_name: Set(Some(
                        format!("{} {}", store.first_name, store.last_name)
                            .trim()
                            .to_string(),
                    )),
                    email: Set(Some(store.email.clone())),
                    mobile: Set(Some(store.mobile.clone())),
                    purchased_at: Set(Some(now)),
                    created_at: Set(Some(now)),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        let mut am = store.into_active_model();
        am.subscription_status = Set(SubscriptionStatus::Active);
        am.plan = Set(Some(plan.label.clone()));
        am.updated_at = Set(Some(now));
        am.update(&txn).await?;
        txn.commit().await?;

        log::info!(
            "Subscriber {subscriber_id} activated on {} via {}",
            plan.label,
            record.transaction_id
        );
        Ok(ConfirmPaymentResponse {
            payment: PaymentRecordResponse::from_record(record, now),
            subscription_status: SubscriptionStatus::Active,
            plan: plan.label,
        })
    }

    /// Every record for one subscriber, newest first.
    pub async fn history(&self, subscriber_id: &str) -> AppResult<Vec<pay::Model>> {
        let mut rows = pay::Entity::find()
            .filter(pay::Column::SubscriberId.eq(subscriber_id.to_string()))
            .all(&self.pool)
            .await?;
        newest_first(&mut rows);
        Ok(rows)
    }

    /// The whole feed, newest first.
    pub async fn all_records(&self) -> AppResult<Vec<pay::Model>> {
        let mut rows = pay::Entity::find()
            .order_by_desc(pay::Column::Id)
            .all(&self.pool)
            .await?;
        newest_first(&mut rows);
        Ok(rows)
    }

    pub async fn list(
        &self,
        params: PaginationParams,
    ) -> AppResult<PaginatedResponse<PaymentRecordResponse>> {
        let now = self.clock.now();
        let rows = self
            .all_records()
            .await?
            .into_iter()
            .map(|r| PaymentRecordResponse::from_record(r, now))
            .collect();
        Ok(params.paginate(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_intent_requires_success() {
        let err = check_intent(PaymentIntentStatus::Processing, 1_500_000, 1_500_000).unwrap_err();
        assert!(matches!(err, AppError::PaymentError(_)));
        assert!(check_intent(PaymentIntentStatus::Succeeded, 1_500_000, 1_500_000).is_ok());
    }

    #[test]
    fn test_newest_first_puts_undated_last() {
        use chrono::TimeZone;
        let at = |d| Some(Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap());
        let rec = |id, purchased_at| pay::Model {
            id,
            subscriber_id: "uid-1".into(),
            transaction_id: format!("pi_{id}"),
            plan_name: "1 Year Access".into(),
            plan_duration: None,
            amount: 1_500_000,
            currency: "inr".into(),
            status: "succeeded".into(),
            store_id: None,
            store_name: None,
            customer_name: None,
            email: None,
            mobile: None,
            purchased_at,
            created_at: None,
        };
        let mut rows = vec![rec(1, at(3)), rec(2, None), rec(3, at(9)), rec(4, at(3))];
        newest_first(&mut rows);
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2]);
    }

    fn record(id: i64, subscriber: &str, purchased_at: Option<DateTime<Utc>>) -> pay::Model {
        pay::Model {
            id,
            subscriber_id: subscriber.into(),
            transaction_id: format!("pi_{id}"),
            plan_name: "1 Year Access".into(),
            plan_duration: None,
            amount: 1_500_000,
            currency: "inr".into(),
            status: "succeeded".into(),
            store_id: None,
            store_name: None,
            customer_name: None,
            email: None,
            mobile: None,
            purchased_at,
            created_at: None,
        }
    }

    #[test]
    fn test_intent_must_belong_to_caller() {
        let mut metadata = HashMap::new();
        assert!(matches!(
            check_intent_owner(&metadata, "uid-1"),
            Err(AppError::Forbidden)
        ));

        metadata.insert("subscriber_id".to_string(), "uid-2".to_string());
        assert!(matches!(
            check_intent_owner(&metadata, "uid-1"),
            Err(AppError::Forbidden)
        ));
        assert!(check_intent_owner(&metadata, "uid-2").is_ok());
    }

    #[test]
    fn test_confirmation_for_existing_records() {
        assert_eq!(confirmation_for(None, "uid-1").unwrap(), Confirmation::New);

        let mine = record(7, "uid-1", None);
        assert_eq!(
            confirmation_for(Some(mine.clone()), "uid-1").unwrap(),
            Confirmation::Replay(mine)
        );

        let err = confirmation_for(Some(record(8, "uid-2", None)), "uid-1").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_replaying_an_expired_payment_keeps_account_inactive() {
        use chrono::TimeZone;
        let bought = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let store = st::Model {
            id: "uid-1".into(),
            store_id: "STR-1".into(),
            store_name: "Green Leaf".into(),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@shop.in".into(),
            mobile: "9876543210".into(),
            address: None,
            city: None,
            pincode: None,
            country: None,
            profile_image: None,
            subscription_status: SubscriptionStatus::Inactive,
            plan: Some("1 Year Access".into()),
            created_at: None,
            updated_at: None,
        };

        let resp = replay_response(&store, record(3, "uid-1", Some(bought)), now);
        assert_eq!(resp.subscription_status, SubscriptionStatus::Inactive);
        assert_eq!(resp.plan, "1 Year Access");
        assert!(resp.payment.expired);
    }

    #[test]
    fn test_check_intent_requires_matching_amount() {
        let err = check_intent(PaymentIntentStatus::Succeeded, 100, 1_500_000).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }
}
