use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use tinkoff_tools::TinkoffApi;
use tpay_engine::{
    events::{EventHandlers, EventHooks, EventProducers, PaymentConfirmedEvent},
    CheckoutApi,
    OrderStateApi,
    PaymentCallbackApi,
    PaymentRequestBuilder,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, PaymentRoutes},
};

const EVENT_BUFFER_SIZE: usize = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_db_connections).await?;
    db.run_migrations().await?;
    let gateway = TinkoffApi::new(config.gateway.clone())?;
    info!("🚀️ Payment gateway: {}", gateway.config().base_url());
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, default_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, gateway, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// The hooks installed by the server itself. Confirmed payments are logged for the shop's records.
pub fn default_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_payment_confirmed(|ev: PaymentConfirmedEvent| async move {
        let order = ev.order;
        info!(
            "💸️ [{}] Payment for order {} ({}) of {} is confirmed",
            PaymentConfirmedEvent::TOPIC,
            order.serial,
            order.uuid,
            order.total_price
        );
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    gateway: TinkoffApi,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let requests = PaymentRequestBuilder::new(config.gateway.credentials.clone(), config.payment.clone());
    let srv = HttpServer::new(move || {
        let orders_api = OrderStateApi::new(db.clone(), producers.clone());
        let callback_api = PaymentCallbackApi::new(orders_api, gateway.clone(), requests.clone());
        let checkout_api = CheckoutApi::new(db.clone(), gateway.clone(), requests.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("tpay::access_log"))
            .app_data(web::Data::new(callback_api))
            .app_data(web::Data::new(checkout_api))
            .service(health)
            .service(PaymentRoutes::<SqliteDatabase, TinkoffApi>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
