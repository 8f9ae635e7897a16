use std::time::Duration;

use cucumber::{then, when};
use tpay_engine::{
    db_types::{OrderStatusType, Serial},
    traits::OrderRepository,
};

use crate::cucumber::PaymentWorld;

#[when(expr = "the payment request for order {word} is built")]
async fn build_payment_request(world: &mut PaymentWorld, serial: String) {
    let system = world.system();
    let order = system.db.fetch_order_by_serial(&Serial::from(serial)).await.expect("Error fetching order");
    let order = order.expect("Order does not exist");
    let request = system.requests.build(&order).expect("Error building payment request");
    world.last_request = Some(request);
}

#[when(expr = "the success callback arrives for serial {word}")]
async fn success_callback(world: &mut PaymentWorld, serial: String) {
    let result = world.system().callback_api().on_success(&serial).await;
    world.last_callback = Some(result);
}

#[when(expr = "the error callback arrives for serial {word}")]
async fn error_callback(world: &mut PaymentWorld, serial: String) {
    let result = world.system().callback_api().on_error(&serial).await;
    world.last_callback = Some(result);
}

#[then(expr = "the request amount is {int}")]
async fn check_amount(world: &mut PaymentWorld, amount: i64) {
    let request = world.last_request.as_ref().expect("No payment request was built");
    assert_eq!(request.fields().amount.value(), amount);
}

#[then(expr = "the receipt has {int} item(s)")]
async fn check_receipt_items(world: &mut PaymentWorld, count: usize) {
    let request = world.last_request.as_ref().expect("No payment request was built");
    let receipt = request.receipt().expect("Request has no receipt");
    assert_eq!(receipt.items.len(), count);
}

#[then(expr = "order {word} is {word}")]
async fn check_order_status(world: &mut PaymentWorld, serial: String, status: String) {
    let expected = status.parse::<OrderStatusType>().expect("Not a valid order status");
    let order = world.system().db.fetch_order_by_serial(&Serial::from(serial)).await.expect("Error fetching order");
    assert_eq!(order.expect("Order does not exist").status, expected);
}

#[then(expr = "the buyer is redirected to {string}")]
async fn check_redirect(world: &mut PaymentWorld, location: String) {
    let result = world.last_callback.as_ref().expect("No callback was received");
    assert_eq!(result.redirect.location(), location);
}

#[then(expr = "{int} payment confirmation(s) is/are published")]
async fn check_published(world: &mut PaymentWorld, count: usize) {
    // Hooks run on their own tasks
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(world.system().published(), count);
}

#[then(expr = "the gateway was asked {int} time(s)")]
async fn check_gateway_calls(world: &mut PaymentWorld, count: usize) {
    assert_eq!(world.system().gateway.check_order_calls(), count);
}

#[then(expr = "the order note of {word} contains {string}")]
async fn check_note(world: &mut PaymentWorld, serial: String, text: String) {
    let order = world.system().db.fetch_order_by_serial(&Serial::from(serial)).await.expect("Error fetching order");
    let note = order.expect("Order does not exist").system_note.unwrap_or_default();
    assert!(note.contains(&text), "Note '{note}' does not contain '{text}'");
}
