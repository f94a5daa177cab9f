use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write;
use std::sync::Arc;

use storefront_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::StripeService,
    handlers,
    lifecycle::{Clock, NotificationCenter, SystemClock},
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    tasks,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().context("Failed to load configuration")?;

    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to the database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let jwt_service = JwtService::new(&config.jwt.secret);
    let stripe_service = StripeService::new(config.stripe.clone());
    if config.stripe.secret_key.is_empty() {
        log::warn!("STRIPE_SECRET_KEY is empty; payment endpoints will fail");
    }
    let notifications = NotificationCenter::new(config.notifications.capacity);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store_service = StoreService::new(pool.clone());
    let payment_service = PaymentService::new(pool.clone(), stripe_service, clock.clone());
    let contact_service = ContactService::new(pool.clone());
    let subscription_service = SubscriptionService::new(
        store_service.clone(),
        payment_service.clone(),
        notifications,
        clock,
        config.lifecycle.reconcile_on_admin_view,
    );

    tasks::spawn_all(
        subscription_service.clone(),
        config.lifecycle.reconcile_interval_secs,
    );

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .wrap(Logger::default())
            .app_data(web::Data::new(store_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .app_data(web::Data::new(contact_service.clone()))
            .app_data(web::Data::new(subscription_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::plans_config)
                    .configure(handlers::store_config)
                    .configure(handlers::dashboard_config)
                    .configure(handlers::payment_config)
                    .configure(handlers::contact_config)
                    .configure(handlers::admin_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
