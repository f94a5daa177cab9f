use crate::middlewares::current_user;
use crate::models::*;
use crate::services::StoreService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/stores/register",
    tag = "store",
    request_body = RegisterStoreRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Store registered", body = StoreResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Store or mobile number already registered")
    )
)]
pub async fn register_store(
    store_service: web::Data<StoreService>,
    req: HttpRequest,
    request: web::Json<RegisterStoreRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match store_service
        .register(&user.uid, &user.email, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/me/profile",
    tag = "store",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile of the caller's store", body = StoreResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Store not registered")
    )
)]
pub async fn get_profile(
    store_service: web::Data<StoreService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match store_service.get_profile(&user.uid).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/me/profile",
    tag = "store",
    request_body = UpdateProfileRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile updated", body = StoreResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Mobile number already registered")
    )
)]
pub async fn update_profile(
    store_service: web::Data<StoreService>,
    req: HttpRequest,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match store_service
        .update_profile(&user.uid, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn store_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/stores/register", web::post().to(register_store))
        .service(
            web::scope("/me")
                .route("/profile", web::get().to(get_profile))
                .route("/profile", web::put().to(update_profile)),
        );
}
