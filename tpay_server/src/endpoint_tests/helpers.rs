use actix_web::{
    body::MessageBody,
    http::{header, StatusCode},
    test,
    test::TestRequest,
    web,
    App,
};
use log::debug;
use rust_decimal_macros::dec;
use tinkoff_tools::TerminalCredentials;
use tpay_common::Secret;
use tpay_engine::{
    db_types::{NewOrder, OrderProduct},
    events::EventProducers,
    test_utils::MemoryOrderStore,
    traits::OrderRepository,
    CheckoutApi,
    OrderStateApi,
    PaymentCallbackApi,
    PaymentRequestBuilder,
    PaymentSettings,
};

use super::mocks::MockGateway;
use crate::routes::{health, PaymentRoutes};

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

pub fn request_builder() -> PaymentRequestBuilder {
    let credentials = TerminalCredentials::new("TestTerminal", Secret::from("secret"));
    let settings = PaymentSettings { public_base_url: "https://shop.example".into(), ..Default::default() };
    PaymentRequestBuilder::new(credentials, settings)
}

/// An order store holding the pending order `1042` (uuid `uuid-1042`) for 500.00.
pub async fn store_with_order_1042() -> MemoryOrderStore {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::default();
    let order = NewOrder::new("1042".into(), "uuid-1042", dec!(500.00))
        .with_contact("+79001234567", "buyer@example.com")
        .with_product(OrderProduct::new("Чайник", dec!(500.00), dec!(1)));
    store.insert_order(order).await.expect("Could not insert order 1042");
    store
}

/// Sends `req` to an app serving the payment routes. `callback_gateway` backs the callback routes and
/// `checkout_gateway` the checkout route.
pub async fn send_request(
    store: &MemoryOrderStore,
    callback_gateway: MockGateway,
    checkout_gateway: MockGateway,
    req: TestRequest,
) -> TestResponse {
    let orders = OrderStateApi::new(store.clone(), EventProducers::default());
    let callback_api = PaymentCallbackApi::new(orders, callback_gateway, request_builder());
    let checkout_api = CheckoutApi::new(store.clone(), checkout_gateway, request_builder());
    let app = App::new()
        .app_data(web::Data::new(callback_api))
        .app_data(web::Data::new(checkout_api))
        .service(health)
        .service(PaymentRoutes::<MemoryOrderStore, MockGateway>::new());
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let location = res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).map(String::from);
    let body = res.into_body().try_into_bytes().map(|b| String::from_utf8_lossy(&b).into_owned()).unwrap_or_default();
    TestResponse { status, location, body }
}
