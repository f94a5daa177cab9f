use crate::middlewares::current_user;
use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/payments/intent",
    tag = "payment",
    request_body = CreatePaymentIntentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment intent created", body = CreatePaymentIntentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown plan or store not registered"),
        (status = 502, description = "Payment processor error")
    )
)]
pub async fn create_payment_intent(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    request: web::Json<CreatePaymentIntentRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match payment_service
        .create_intent(&user.uid, request.into_inner())
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/payments/confirm",
    tag = "payment",
    request_body = ConfirmPaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment recorded and account activated", body = ConfirmPaymentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 402, description = "Payment not successful or amount mismatch"),
        (status = 409, description = "Payment recorded for another account")
    )
)]
pub async fn confirm_payment(
    payment_service: web::Data<PaymentService>,
    req: HttpRequest,
    request: web::Json<ConfirmPaymentRequest>,
) -> Result<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(e) => return Ok(e.error_response()),
    };
    match payment_service.confirm(&user.uid, request.into_inner()).await {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            resp,
            "Payment Successful! Account Activated.",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("/intent", web::post().to(create_payment_intent))
            .route("/confirm", web::post().to(confirm_payment)),
    );
}
