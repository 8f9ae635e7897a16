use std::{fmt::Display, sync::Arc};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::GatewayConfig,
    data_objects::{CheckOrderRequest, CheckOrderResponse, InitRequest, InitResponse},
    GatewayApiError,
};

/// The gateway operations the rest of the system depends on.
///
/// Both methods make exactly one HTTP attempt. A gateway that answers with a well-formed error body (one with an
/// `ErrorCode`) still produces `Ok`; inspect `is_success()` on the response. `Err` means the call itself failed or the
/// reply did not come from the gateway.
#[allow(async_fn_in_trait)]
pub trait GatewayClient {
    async fn init(&self, request: &InitRequest) -> Result<InitResponse, GatewayApiError>;

    async fn check_order(&self, request: &CheckOrderRequest) -> Result<CheckOrderResponse, GatewayApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMethod {
    Init,
    CheckOrder,
}

impl GatewayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMethod::Init => "Init",
            GatewayMethod::CheckOrder => "CheckOrder",
        }
    }
}

impl Display for GatewayMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct TinkoffApi {
    config: GatewayConfig,
    client: Arc<Client>,
}

impl TinkoffApi {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| GatewayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn url(&self, method: GatewayMethod) -> String {
        format!("{}{method}", self.config.base_url())
    }

    /// POSTs `body` as JSON to the given method and decodes the reply.
    ///
    /// A 2xx reply that does not decode as `T` is a [`GatewayApiError::MalformedResponse`]. Non-2xx replies are still
    /// decoded as `T` when they carry the gateway's `ErrorCode`, since the gateway reports business errors in the usual
    /// response shape. Anything else (proxy pages, load balancer JSON) becomes a [`GatewayApiError::QueryError`].
    pub async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        method: GatewayMethod,
        body: &B,
    ) -> Result<T, GatewayApiError> {
        let url = self.url(method);
        trace!("Calling gateway method {method} at {url}");
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        trace!("Gateway replied to {method} with {status}: {text}");
        if status.is_success() {
            serde_json::from_str::<T>(&text)
                .map_err(|e| GatewayApiError::MalformedResponse(format!("{method} reply could not be parsed. {e}")))
        } else {
            serde_json::from_str::<T>(&text)
                .map_err(|_| GatewayApiError::QueryError { status: status.as_u16(), message: text })
        }
    }
}

impl GatewayClient for TinkoffApi {
    async fn init(&self, request: &InitRequest) -> Result<InitResponse, GatewayApiError> {
        let order_id = &request.fields().order_id;
        debug!("Registering payment for order {order_id} with the gateway");
        let response = self.call::<InitResponse, _>(GatewayMethod::Init, request).await?;
        if response.is_success() {
            info!("Gateway registered payment for order {order_id}");
        } else {
            warn!(
                "Gateway refused payment for order {order_id}. ErrorCode {}: {}",
                response.error_code,
                response.message.as_deref().unwrap_or_default()
            );
        }
        Ok(response)
    }

    async fn check_order(&self, request: &CheckOrderRequest) -> Result<CheckOrderResponse, GatewayApiError> {
        let order_id = &request.fields().order_id;
        debug!("Checking the payment status of order {order_id}");
        let response = self.call::<CheckOrderResponse, _>(GatewayMethod::CheckOrder, request).await?;
        debug!(
            "CheckOrder for {order_id}: success={} error_code={} payments={}",
            response.success,
            response.error_code,
            response.payments.len()
        );
        Ok(response)
    }
}
