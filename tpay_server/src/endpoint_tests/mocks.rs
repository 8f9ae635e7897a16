use mockall::mock;
use tinkoff_tools::{CheckOrderRequest, CheckOrderResponse, GatewayApiError, GatewayClient, InitRequest, InitResponse};

mock! {
    pub Gateway {}
    impl GatewayClient for Gateway {
        async fn init(&self, request: &InitRequest) -> Result<InitResponse, GatewayApiError>;
        async fn check_order(&self, request: &CheckOrderRequest) -> Result<CheckOrderResponse, GatewayApiError>;
    }
}

/// A gateway that must not be called at all.
pub fn silent_gateway() -> MockGateway {
    let mut gateway = MockGateway::new();
    gateway.expect_init().never();
    gateway.expect_check_order().never();
    gateway
}

pub fn check_order_reply(json: &str) -> CheckOrderResponse {
    serde_json::from_str(json).expect("Invalid CheckOrder reply")
}

pub fn init_reply(json: &str) -> InitResponse {
    serde_json::from_str(json).expect("Invalid Init reply")
}

pub const CONFIRMED_REPLY: &str = r#"{"Success":true,"ErrorCode":"0","OrderId":"1042","Payments":[{"PaymentId":"13660","Amount":50000,"Status":"CONFIRMED","Success":true,"ErrorCode":"0"}]}"#;
pub const DECLINED_REPLY: &str = r#"{"Success":false,"ErrorCode":"1001","Message":"Declined","OrderId":"1042","Payments":[{"PaymentId":"13660","Amount":50000,"Status":"REJECTED","Success":false,"ErrorCode":"1001"}]}"#;
