use actix_web::{http::StatusCode, test::TestRequest};
use tinkoff_tools::GatewayApiError;
use tpay_engine::{db_types::OrderStatusType, traits::OrderRepository, PAYMENT_NOT_COMPLETED_NOTE};

use super::{
    helpers::{send_request, store_with_order_1042},
    mocks::{check_order_reply, silent_gateway, MockGateway, CONFIRMED_REPLY, DECLINED_REPLY},
};

fn gateway_replying(json: &'static str) -> MockGateway {
    let mut gateway = MockGateway::new();
    gateway
        .expect_check_order()
        .withf(|req| req.fields().order_id == "1042")
        .times(1)
        .returning(move |_| Ok(check_order_reply(json)));
    gateway.expect_init().never();
    gateway
}

#[actix_web::test]
async fn confirmed_payment_marks_order_as_paid() {
    let store = store_with_order_1042().await;
    let req = TestRequest::get().uri("/payment/callback/success?serial=1042");
    let res = send_request(&store, gateway_replying(CONFIRMED_REPLY), silent_gateway(), req).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
    let order = store.fetch_order_by_serial(&"1042".into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Paid);
}

#[actix_web::test]
async fn success_callback_accepts_post() {
    let store = store_with_order_1042().await;
    let req = TestRequest::post().uri("/payment/callback/success?serial=1042");
    let res = send_request(&store, gateway_replying(CONFIRMED_REPLY), silent_gateway(), req).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
}

#[actix_web::test]
async fn declined_payment_marks_order_as_failed() {
    let store = store_with_order_1042().await;
    let req = TestRequest::get().uri("/payment/callback/success?serial=1042");
    let res = send_request(&store, gateway_replying(DECLINED_REPLY), silent_gateway(), req).await;
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
    let order = store.fetch_order_by_serial(&"1042".into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Failed);
    assert!(order.system_note.unwrap().contains("ErrorCode 1001"));
}

#[actix_web::test]
async fn unreachable_gateway_leaves_order_pending() {
    let store = store_with_order_1042().await;
    let mut gateway = MockGateway::new();
    gateway.expect_check_order().times(1).returning(|_| Err(GatewayApiError::Timeout("15s".into())));
    let req = TestRequest::get().uri("/payment/callback/success?serial=1042");
    let res = send_request(&store, gateway, silent_gateway(), req).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
    let order = store.fetch_order_by_serial(&"1042".into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Pending);
    assert_eq!(store.status_updates(), 0);
}

#[actix_web::test]
async fn unknown_or_missing_serials_go_home() {
    let store = store_with_order_1042().await;
    for uri in [
        "/payment/callback/success?serial=404",
        "/payment/callback/success",
        "/payment/callback/error?serial=",
        "/payment/callback/error?serial=%ZZ",
    ] {
        let req = TestRequest::get().uri(uri);
        let res = send_request(&store, silent_gateway(), silent_gateway(), req).await;
        assert_eq!(res.status, StatusCode::FOUND, "{uri}");
        assert_eq!(res.location.as_deref(), Some("/"), "{uri}");
    }
    assert_eq!(store.status_updates(), 0);
}

#[actix_web::test]
async fn error_callback_fails_pending_order() {
    let store = store_with_order_1042().await;
    let req = TestRequest::post().uri("/payment/callback/error?serial=1042");
    let res = send_request(&store, silent_gateway(), silent_gateway(), req).await;
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
    let order = store.fetch_order_by_serial(&"1042".into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Failed);
    assert_eq!(order.system_note.as_deref(), Some(PAYMENT_NOT_COMPLETED_NOTE));
}

#[actix_web::test]
async fn error_callback_never_unpays_an_order() {
    let store = store_with_order_1042().await;
    let req = TestRequest::get().uri("/payment/callback/success?serial=1042");
    send_request(&store, gateway_replying(CONFIRMED_REPLY), silent_gateway(), req).await;
    let req = TestRequest::get().uri("/payment/callback/error?serial=1042");
    let res = send_request(&store, silent_gateway(), silent_gateway(), req).await;
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
    let order = store.fetch_order_by_serial(&"1042".into()).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatusType::Paid);
    // A repeated success callback does not ask the gateway again
    let req = TestRequest::get().uri("/payment/callback/success?serial=1042");
    let res = send_request(&store, silent_gateway(), silent_gateway(), req).await;
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
}

#[actix_web::test]
async fn store_outage_redirects_home() {
    let store = store_with_order_1042().await;
    store.set_unavailable(true);
    let req = TestRequest::get().uri("/payment/callback/success?serial=1042");
    let res = send_request(&store, silent_gateway(), silent_gateway(), req).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/"));
}
