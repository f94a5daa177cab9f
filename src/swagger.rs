use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{MessageStatus, SubscriptionStatus};
use crate::handlers;
use crate::lifecycle::{
    CorrectionEvent, CorrectionFailure, LifecycleState, Notification, NotificationKind,
    PlanTerm, ReconcileReport, TimeRemaining,
};
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::plans::list_plans,
        handlers::plans::get_plan,
        handlers::store::register_store,
        handlers::store::get_profile,
        handlers::store::update_profile,
        handlers::dashboard::get_dashboard,
        handlers::payment::create_payment_intent,
        handlers::payment::confirm_payment,
        handlers::contact::submit_contact_message,
        handlers::admin::list_stores,
        handlers::admin::get_stats,
        handlers::admin::toggle_store,
        handlers::admin::update_store,
        handlers::admin::delete_store,
        handlers::admin::store_payments,
        handlers::admin::list_payments,
        handlers::admin::list_messages,
        handlers::admin::mark_message_read,
        handlers::admin::run_reconcile,
        handlers::admin::list_notifications,
    ),
    components(
        schemas(
            Plan,
            PlanTerm,
            SubscriptionStatus,
            MessageStatus,
            LifecycleState,
            TimeRemaining,
            RegisterStoreRequest,
            UpdateProfileRequest,
            AdminUpdateStoreRequest,
            StoreResponse,
            StoreQuery,
            AdminStoreRow,
            AdminStats,
            ToggleStatusResponse,
            CreatePaymentIntentRequest,
            CreatePaymentIntentResponse,
            ConfirmPaymentRequest,
            ConfirmPaymentResponse,
            PaymentRecordResponse,
            DashboardResponse,
            CreateContactMessageRequest,
            ContactMessageResponse,
            PaginationParams,
            PaginatedStores,
            PaginatedPayments,
            PaginatedMessages,
            ReconcileReport,
            CorrectionEvent,
            CorrectionFailure,
            Notification,
            NotificationKind,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "plans", description = "Plan catalog"),
        (name = "store", description = "Store registration and profile"),
        (name = "dashboard", description = "Buyer dashboard"),
        (name = "payment", description = "Plan purchase"),
        (name = "contact", description = "Contact form"),
        (name = "admin", description = "Operator console"),
    ),
    info(
        title = "Storefront Backend API",
        version = "1.0.0",
        description = "Subscription storefront REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
