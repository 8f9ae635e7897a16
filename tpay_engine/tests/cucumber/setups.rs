use std::str::FromStr;

use cucumber::given;
use rust_decimal::Decimal;
use tpay_engine::{
    db_types::{NewOrder, OrderProduct},
    test_utils::StubGateway,
    traits::OrderRepository,
};

use crate::cucumber::{payment_world::PaymentSystem, PaymentWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut PaymentWorld) {
    let system = PaymentSystem::new().await;
    world.system = Some(system);
}

#[given(regex = r#"^order (\w+) for ([\d.]+) with (\d+) × "(.+)" at ([\d.]+)$"#)]
async fn order_with_product(
    world: &mut PaymentWorld,
    serial: String,
    total: String,
    count: String,
    title: String,
    price: String,
) {
    let decimal = |s: &str| Decimal::from_str(s).expect("Not a decimal");
    let order = NewOrder::new(serial.as_str().into(), format!("uuid-{serial}"), decimal(&total))
        .with_contact("+79001234567", "buyer@example.com")
        .with_product(OrderProduct::new(title, decimal(&price), decimal(&count)));
    world.system().db.insert_order(order).await.expect("Error inserting order");
}

#[given(regex = r"^the gateway answers CheckOrder with '(.*)'$")]
async fn gateway_answers(world: &mut PaymentWorld, json: String) {
    world.system_mut().gateway = StubGateway::default().with_check_order_json(&json);
}

#[given("the gateway is unreachable")]
async fn gateway_unreachable(world: &mut PaymentWorld) {
    world.system_mut().gateway = StubGateway::unreachable();
}
