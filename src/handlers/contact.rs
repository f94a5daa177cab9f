use crate::models::*;
use crate::services::ContactService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/contact",
    tag = "contact",
    request_body = CreateContactMessageRequest,
    responses(
        (status = 200, description = "Message stored", body = ContactMessageResponse),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn submit_contact_message(
    contact_service: web::Data<ContactService>,
    request: web::Json<CreateContactMessageRequest>,
) -> Result<HttpResponse> {
    match contact_service.submit(request.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            resp,
            "Thanks! We will get back to you soon.",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn contact_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::post().to(submit_contact_message));
}
