use crate::models::*;
use crate::services::{ContactService, PaymentService, StoreService, SubscriptionService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/admin/stores",
    tag = "admin",
    params(StoreQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stores with latest plan and lifecycle state", body = PaginatedStores),
        (status = 403, description = "Operators only")
    )
)]
pub async fn list_stores(
    subscription_service: web::Data<SubscriptionService>,
    query: web::Query<StoreQuery>,
) -> Result<HttpResponse> {
    match subscription_service.admin_stores(query.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account counts and revenue", body = AdminStats),
        (status = 403, description = "Operators only")
    )
)]
pub async fn get_stats(store_service: web::Data<StoreService>) -> Result<HttpResponse> {
    match store_service.stats().await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/stores/{id}/toggle",
    tag = "admin",
    params(("id" = String, Path, description = "Subscriber id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "New stored status", body = ToggleStatusResponse),
        (status = 404, description = "Store not found")
    )
)]
pub async fn toggle_store(
    store_service: web::Data<StoreService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match store_service.toggle_status(&path.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/stores/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Subscriber id")),
    request_body = AdminUpdateStoreRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Store updated", body = StoreResponse),
        (status = 404, description = "Store not found"),
        (status = 409, description = "Store ID or mobile already in use")
    )
)]
pub async fn update_store(
    store_service: web::Data<StoreService>,
    path: web::Path<String>,
    request: web::Json<AdminUpdateStoreRequest>,
) -> Result<HttpResponse> {
    match store_service
        .admin_update(&path.into_inner(), request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/stores/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Subscriber id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Store deleted"),
        (status = 404, description = "Store not found")
    )
)]
pub async fn delete_store(
    store_service: web::Data<StoreService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match store_service.delete(&id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            id,
            "Store deleted",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/stores/{id}/payments",
    tag = "admin",
    params(("id" = String, Path, description = "Subscriber id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment history with per-record expiry", body = [PaymentRecordResponse]),
        (status = 404, description = "Store not found")
    )
)]
pub async fn store_payments(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match subscription_service.store_payments(&path.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/payments",
    tag = "admin",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All payments, newest first", body = PaginatedPayments)
    )
)]
pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match payment_service.list(query.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/messages",
    tag = "admin",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Contact messages, newest first", body = PaginatedMessages)
    )
)]
pub async fn list_messages(
    contact_service: web::Data<ContactService>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    match contact_service.list(query.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/messages/{id}/read",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Message id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message marked as read", body = ContactMessageResponse),
        (status = 404, description = "Message not found")
    )
)]
pub async fn mark_message_read(
    contact_service: web::Data<ContactService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match contact_service.mark_read(path.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/reconcile",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reconciliation report", body = crate::lifecycle::ReconcileReport)
    )
)]
pub async fn run_reconcile(
    subscription_service: web::Data<SubscriptionService>,
) -> Result<HttpResponse> {
    match subscription_service.run_reconciliation().await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/notifications",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Recent notifications, newest first", body = [crate::lifecycle::Notification])
    )
)]
pub async fn list_notifications(
    subscription_service: web::Data<SubscriptionService>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        subscription_service.notifications(),
    )))
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/stores", web::get().to(list_stores))
            .route("/stores/{id}", web::put().to(update_store))
            .route("/stores/{id}", web::delete().to(delete_store))
            .route("/stores/{id}/toggle", web::post().to(toggle_store))
            .route("/stores/{id}/payments", web::get().to(store_payments))
            .route("/stats", web::get().to(get_stats))
            .route("/payments", web::get().to(list_payments))
            .route("/messages", web::get().to(list_messages))
            .route("/messages/{id}/read", web::post().to(mark_message_read))
            .route("/reconcile", web::post().to(run_reconcile))
            .route("/notifications", web::get().to(list_notifications)),
    );
}
