use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use tinkoff_tools::{
    CheckOrderRequest,
    CheckOrderResponse,
    GatewayApiError,
    GatewayClient,
    InitRequest,
    InitResponse,
};

/// A [`GatewayClient`] that answers with canned responses and counts the calls made to it.
///
/// A `None` reply simulates an unreachable gateway. Clones share the call counters.
#[derive(Debug, Clone, Default)]
pub struct StubGateway {
    init_reply: Option<InitResponse>,
    check_order_reply: Option<CheckOrderResponse>,
    delay: Option<Duration>,
    init_calls: Arc<AtomicUsize>,
    check_order_calls: Arc<AtomicUsize>,
}

impl StubGateway {
    /// `CheckOrder` reports the payment as `CONFIRMED`.
    pub fn confirmed() -> Self {
        Self::default().with_check_order_json(r#"{"Success":true,"ErrorCode":"0","Payments":[{"Status":"CONFIRMED"}]}"#)
    }

    /// `CheckOrder` answers with a well-formed failure.
    pub fn declined(error_code: &str) -> Self {
        let reply = CheckOrderResponse {
            success: false,
            error_code: error_code.to_string(),
            message: Some("Payment declined".to_string()),
            ..Default::default()
        };
        Self { check_order_reply: Some(reply), ..Default::default() }
    }

    /// Every call fails as if the gateway could not be reached.
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn with_check_order_json(mut self, json: &str) -> Self {
        self.check_order_reply = Some(serde_json::from_str(json).expect("Invalid CheckOrder response JSON"));
        self
    }

    pub fn with_payment_url(mut self, url: &str) -> Self {
        self.init_reply = Some(InitResponse {
            success: true,
            error_code: "0".to_string(),
            payment_url: Some(url.to_string()),
            ..Default::default()
        });
        self
    }

    pub fn with_init_json(mut self, json: &str) -> Self {
        self.init_reply = Some(serde_json::from_str(json).expect("Invalid Init response JSON"));
        self
    }

    /// Every call waits this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn check_order_calls(&self) -> usize {
        self.check_order_calls.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl GatewayClient for StubGateway {
    async fn init(&self, _request: &InitRequest) -> Result<InitResponse, GatewayApiError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.init_reply.clone().ok_or_else(|| GatewayApiError::Unreachable("stub gateway is offline".to_string()))
    }

    async fn check_order(&self, _request: &CheckOrderRequest) -> Result<CheckOrderResponse, GatewayApiError> {
        self.check_order_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        self.check_order_reply
            .clone()
            .ok_or_else(|| GatewayApiError::Unreachable("stub gateway is offline".to_string()))
    }
}
