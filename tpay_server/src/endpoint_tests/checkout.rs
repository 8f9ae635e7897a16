use actix_web::{http::StatusCode, test::TestRequest};
use tinkoff_tools::GatewayApiError;
use tpay_engine::{db_types::OrderStatusType, traits::OrderRepository};

use super::{
    helpers::{send_request, store_with_order_1042},
    mocks::{init_reply, silent_gateway, MockGateway},
};
use crate::routes::{payment_routes, HttpVerb};

#[actix_web::test]
async fn health_check() {
    let store = store_with_order_1042().await;
    let res = send_request(&store, silent_gateway(), silent_gateway(), TestRequest::get().uri("/health")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, "👍️\n");
}

#[actix_web::test]
async fn checkout_redirects_to_the_payment_form() {
    let store = store_with_order_1042().await;
    let mut gateway = MockGateway::new();
    gateway
        .expect_init()
        .withf(|req| {
            let fields = req.fields();
            fields.order_id == "1042"
                && fields.amount.value() == 50000
                && fields.success_url == "https://shop.example/payment/callback/success?serial=1042"
        })
        .times(1)
        .returning(|_| {
            Ok(init_reply(
                r#"{"Success":true,"ErrorCode":"0","Status":"NEW","PaymentURL":"https://securepay.tinkoff.ru/new/fU1ppgqa"}"#,
            ))
        });
    let req = TestRequest::get().uri("/payment/checkout?serial=1042");
    let res = send_request(&store, silent_gateway(), gateway, req).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("https://securepay.tinkoff.ru/new/fU1ppgqa"));
}

#[actix_web::test]
async fn declined_checkout_goes_to_the_order_page() {
    let store = store_with_order_1042().await;
    let mut gateway = MockGateway::new();
    gateway.expect_init().times(1).returning(|_| {
        Ok(init_reply(r#"{"Success":false,"ErrorCode":"204","Message":"Неверный токен"}"#))
    });
    let req = TestRequest::post().uri("/payment/checkout?serial=1042");
    let res = send_request(&store, silent_gateway(), gateway, req).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
}

#[actix_web::test]
async fn settled_and_unknown_orders_skip_the_gateway() {
    let store = store_with_order_1042().await;
    let req = TestRequest::get().uri("/payment/checkout?serial=9999");
    let res = send_request(&store, silent_gateway(), silent_gateway(), req).await;
    assert_eq!(res.location.as_deref(), Some("/"));

    store.update_order_status(&"1042".into(), OrderStatusType::Pending, OrderStatusType::Paid, None).await.unwrap();
    let req = TestRequest::get().uri("/payment/checkout?serial=1042");
    let res = send_request(&store, silent_gateway(), silent_gateway(), req).await;
    assert_eq!(res.location.as_deref(), Some("/orders/uuid-1042/done"));
}

#[actix_web::test]
async fn unreachable_gateway_is_a_bad_gateway_error() {
    let store = store_with_order_1042().await;
    let mut gateway = MockGateway::new();
    gateway.expect_init().times(1).returning(|_| Err(GatewayApiError::Unreachable("connection refused".into())));
    let req = TestRequest::get().uri("/payment/checkout?serial=1042");
    let res = send_request(&store, silent_gateway(), gateway, req).await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert!(res.location.is_none());
    let body: serde_json::Value = serde_json::from_str(&res.body).unwrap();
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[test]
fn payment_routes_are_named_and_accept_get_and_post() {
    let routes = payment_routes();
    let names = routes.iter().map(|r| r.name).collect::<Vec<_>>();
    assert_eq!(names, ["tpay:checkout", "tpay:success", "tpay:error"]);
    let paths = routes.iter().map(|r| r.path).collect::<Vec<_>>();
    assert_eq!(paths, ["/payment/checkout", "/payment/callback/success", "/payment/callback/error"]);
    assert!(routes.iter().all(|r| r.methods == [HttpVerb::Get, HttpVerb::Post]));
}
