use crate::entities::{MessageStatus, contact_message_entity as cm};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{require_non_empty, validate_email};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct ContactService {
    pool: DatabaseConnection,
}

impl ContactService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn submit(&self, req: CreateContactMessageRequest) -> AppResult<ContactMessageResponse> {
        require_non_empty("First name", &req.first_name)?;
        require_non_empty("Subject", &req.subject)?;
        require_non_empty("Message", &req.message)?;
        let email = req.email.trim().to_string();
        validate_email(&email)?;

        let model = cm::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(req.first_name.trim().to_string()),
            last_name: Set(req.last_name.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())),
            email: Set(email),
            phone: Set(req.phone.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())),
            subject: Set(req.subject.trim().to_string()),
            message: Set(req.message),
            status: Set(MessageStatus::Unread),
            created_at: Set(Some(Utc::now())),
        }
        .insert(&self.pool)
        .await?;

        log::info!("Contact message {} received", model.id);
        Ok(ContactMessageResponse::from(model))
    }

    /// Newest first.
    pub async fn list(
        &self,
        params: PaginationParams,
    ) -> AppResult<PaginatedResponse<ContactMessageResponse>> {
        let total = cm::Entity::find().count(&self.pool).await? as i64;
        let rows = cm::Entity::find()
            .order_by_desc(cm::Column::CreatedAt)
            .offset(params.get_offset() as u64)
            .limit(params.get_limit() as u64)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(ContactMessageResponse::from)
            .collect();
        Ok(PaginatedResponse::new(
            rows,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }

    pub async fn mark_read(&self, id: Uuid) -> AppResult<ContactMessageResponse> {
        let msg = cm::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Message not found".into()))?;
        if msg.status == MessageStatus::Read {
            return Ok(ContactMessageResponse::from(msg));
        }
        let mut am = msg.into_active_model();
        am.status = Set(MessageStatus::Read);
        Ok(ContactMessageResponse::from(am.update(&self.pool).await?))
    }
}
