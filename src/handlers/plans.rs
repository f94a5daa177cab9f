use crate::models::*;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/plans",
    tag = "plans",
    responses(
        (status = 200, description = "Plan catalog", body = [Plan])
    )
)]
pub async fn list_plans() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(plan_catalog())))
}

#[utoipa::path(
    get,
    path = "/plans/{id}",
    tag = "plans",
    params(("id" = i32, Path, description = "Plan id")),
    responses(
        (status = 200, description = "Plan details", body = Plan),
        (status = 404, description = "Plan not found")
    )
)]
pub async fn get_plan(path: web::Path<i32>) -> Result<HttpResponse> {
    match find_plan(path.into_inner()) {
        Ok(plan) => Ok(HttpResponse::Ok().json(ApiResponse::success(plan))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn plans_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/plans", web::get().to(list_plans))
        .route("/plans/{id}", web::get().to(get_plan));
}
