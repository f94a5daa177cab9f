use crate::entities::{SubscriptionStatus, payment_entity as pay, store_entity as st};
use crate::error::{AppError, AppResult};
use crate::lifecycle::SubscriberStore;
use crate::models::*;
use crate::utils::{
    generate_store_id, normalize_mobile, require_non_empty, validate_email, validate_mobile,
    validate_profile_image,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Case-insensitive substring match on store name, email or public store id.
/// An empty needle matches everything.
pub fn matches_search(store: &st::Model, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [&store.store_name, &store.email, &store.store_id]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

#[derive(Clone)]
pub struct StoreService {
    pool: DatabaseConnection,
}

impl StoreService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn find(&self, subscriber_id: &str) -> AppResult<st::Model> {
        st::Entity::find_by_id(subscriber_id.to_string())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Store not found".into()))
    }

    pub async fn list_all(&self) -> AppResult<Vec<st::Model>> {
        Ok(st::Entity::find()
            .order_by_desc(st::Column::CreatedAt)
            .all(&self.pool)
            .await?)
    }

    async fn ensure_mobile_free(&self, mobile: &str, except: Option<&str>) -> AppResult<()> {
        let mut q = st::Entity::find().filter(st::Column::Mobile.eq(mobile.to_string()));
        if let Some(id) = except {
            q = q.filter(st::Column::Id.ne(id.to_string()));
        }
        if q.one(&self.pool).await?.is_some() {
            return Err(AppError::Conflict("Mobile number already registered".into()));
        }
        Ok(())
    }

    /// Creates the caller's account. New accounts start `inactive` with no
    /// plan until their first confirmed payment.
    pub async fn register(
        &self,
        subscriber_id: &str,
        token_email: &str,
        req: RegisterStoreRequest,
    ) -> AppResult<StoreResponse> {
        require_non_empty("First name", &req.first_name)?;
        require_non_empty("Last name", &req.last_name)?;
        require_non_empty("Store name", &req.store_name)?;
        let mobile = normalize_mobile(&req.mobile);
        validate_mobile(&mobile)?;
        let email = req
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| token_email.to_string());
        validate_email(&email)?;
        let profile_image = trimmed(req.profile_image).filter(|v| !v.is_empty());
        if let Some(image) = &profile_image {
            validate_profile_image(image)?;
        }

        if st::Entity::find_by_id(subscriber_id.to_string())
            .one(&self.pool)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Store already registered".into()));
        }
        self.ensure_mobile_free(&mobile, None).await?;

        let now = Utc::now();
        let model = st::ActiveModel {
            id: Set(subscriber_id.to_string()),
            store_id: Set(generate_store_id(now)),
            store_name: Set(req.store_name.trim().to_string()),
            first_name: Set(req.first_name.trim().to_string()),
            last_name: Set(req.last_name.trim().to_string()),
            email: Set(email),
            mobile: Set(mobile),
            address: Set(None),
            city: Set(None),
            pincode: Set(None),
            country: Set(None),
            profile_image: Set(profile_image),
            subscription_status: Set(SubscriptionStatus::Inactive),
            plan: Set(None),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        }
        .insert(&self.pool)
        .await?;

        log::info!("Registered store {} for subscriber {subscriber_id}", model.store_id);
        Ok(StoreResponse::from(model))
    }

    pub async fn get_profile(&self, subscriber_id: &str) -> AppResult<StoreResponse> {
        self.find(subscriber_id).await.map(StoreResponse::from)
    }

    pub async fn update_profile(
        &self,
        subscriber_id: &str,
        req: UpdateProfileRequest,
    ) -> AppResult<StoreResponse> {
        let store = self.find(subscriber_id).await?;
        let mut am = store.into_active_model();

        if let Some(v) = trimmed(req.first_name) {
            require_non_empty("First name", &v)?;
            am.first_name = Set(v);
        }
        if let Some(v) = trimmed(req.last_name) {
            am.last_name = Set(v);
        }
        if let Some(v) = trimmed(req.store_name) {
            require_non_empty("Store name", &v)?;
            am.store_name = Set(v);
        }
        if let Some(v) = req.mobile {
            let mobile = normalize_mobile(&v);
            validate_mobile(&mobile)?;
            self.ensure_mobile_free(&mobile, Some(subscriber_id)).await?;
            am.mobile = Set(mobile);
        }
        if let Some(v) = trimmed(req.address) {
            am.address = Set(Some(v));
        }
        if let Some(v) = trimmed(req.city) {
            am.city = Set(Some(v));
        }
        if let Some(v) = trimmed(req.pincode) {
            am.pincode = Set(Some(v));
        }
        if let Some(v) = trimmed(req.country) {
            am.country = Set(Some(v));
        }
        if let Some(v) = req.profile_image {
            let image = v.trim();
            if image.is_empty() {
                am.profile_image = Set(None);
            } else {
                validate_profile_image(image)?;
                am.profile_image = Set(Some(image.to_string()));
            }
        }
        am.updated_at = Set(Some(Utc::now()));

        Ok(StoreResponse::from(am.update(&self.pool).await?))
    }

    pub async fn admin_update(
        &self,
        subscriber_id: &str,
        req: AdminUpdateStoreRequest,
    ) -> AppResult<StoreResponse> {
        let store = self.find(subscriber_id).await?;
        let mut am = store.into_active_model();

        if let Some(v) = trimmed(req.first_name) {
            require_non_empty("First name", &v)?;
            am.first_name = Set(v);
        }
        if let Some(v) = trimmed(req.store_name) {
            require_non_empty("Store name", &v)?;
            am.store_name = Set(v);
        }
        if let Some(v) = trimmed(req.store_id) {
            require_non_empty("Store ID", &v)?;
            let taken = st::Entity::find()
                .filter(st::Column::StoreId.eq(v.clone()))
                .filter(st::Column::Id.ne(subscriber_id.to_string()))
                .one(&self.pool)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Store ID already in use".into()));
            }
            am.store_id = Set(v);
        }
        if let Some(v) = req.mobile {
            let mobile = normalize_mobile(&v);
            validate_mobile(&mobile)?;
            self.ensure_mobile_free(&mobile, Some(subscriber_id)).await?;
            am.mobile = Set(mobile);
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        log::info!("Operator updated store {}", updated.store_id);
        Ok(StoreResponse::from(updated))
    }

    /// Operator toggle; flips the stored flag in either direction.
    pub async fn toggle_status(&self, subscriber_id: &str) -> AppResult<ToggleStatusResponse> {
        let store = self.find(subscriber_id).await?;
        let next = store.subscription_status.toggled();
        let mut am = store.into_active_model();
        am.subscription_status = Set(next);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;
        log::info!("Operator set store {} to {next}", updated.store_id);
        Ok(ToggleStatusResponse {
            id: updated.id,
            subscription_status: updated.subscription_status,
        })
    }

    /// Removes the account. Its payment records stay in the ledger.
    pub async fn delete(&self, subscriber_id: &str) -> AppResult<()> {
        let res = st::Entity::delete_by_id(subscriber_id.to_string())
            .exec(&self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Store not found".into()));
        }
        log::info!("Deleted store for subscriber {subscriber_id}");
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<AdminStats> {
        let total_stores = st::Entity::find().count(&self.pool).await?;
        let active_stores = st::Entity::find()
            .filter(st::Column::SubscriptionStatus.eq(SubscriptionStatus::Active))
            .count(&self.pool)
            .await?;
        let amounts: Vec<i64> = pay::Entity::find()
            .select_only()
            .column(pay::Column::Amount)
            .into_tuple()
            .all(&self.pool)
            .await?;

        Ok(AdminStats {
            total_stores,
            active_stores,
            inactive_stores: total_stores.saturating_sub(active_stores),
            total_revenue: amounts.iter().sum(),
        })
    }
}

#[async_trait]
impl SubscriberStore for StoreService {
    async fn set_subscription_status(
        &self,
        subscriber_id: &str,
        status: SubscriptionStatus,
    ) -> AppResult<()> {
        let store = self.find(subscriber_id).await?;
        let mut am = store.into_active_model();
        am.subscription_status = Set(status);
        am.updated_at = Set(Some(Utc::now()));
        am.update(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(store_name: &str, email: &str, store_id: &str) -> st::Model {
        st::Model {
            id: "uid-1".into(),
            store_id: store_id.into(),
            store_name: store_name.into(),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: email.into(),
            mobile: "9876543210".into(),
            address: None,
            city: None,
            pincode: None,
            country: None,
            profile_image: None,
            subscription_status: SubscriptionStatus::Active,
            plan: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_search_matches_name_email_and_store_id_case_insensitively() {
        let s = store("Green Leaf Grocers", "owner@greenleaf.in", "STR-MG2K1ZAB1");
        assert!(matches_search(&s, "green leaf"));
        assert!(matches_search(&s, "GREENLEAF.IN"));
        assert!(matches_search(&s, "str-mg2k"));
        assert!(matches_search(&s, "  "));
        assert!(!matches_search(&s, "bakery"));
    }

    #[test]
    fn test_search_ignores_other_fields() {
        let s = store("Corner Shop", "a@b.co", "STR-1");
        assert!(!matches_search(&s, "asha"));
        assert!(!matches_search(&s, "9876"));
    }
}
