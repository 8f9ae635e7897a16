use std::fmt::Debug;

use log::*;
use tinkoff_tools::GatewayClient;

use crate::{
    db_types::{Order, OrderStatusType, Serial},
    tpe_api::{callback_api::PaymentRedirect, errors::CheckoutError, payment_request::PaymentRequestBuilder},
    traits::OrderRepository,
};

/// Starts the payment of an order: registers it with the gateway and hands back the URL of the payment form.
pub struct CheckoutApi<B, G> {
    db: B,
    gateway: G,
    requests: PaymentRequestBuilder,
}

impl<B, G> Debug for CheckoutApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B, G> CheckoutApi<B, G> {
    pub fn new(db: B, gateway: G, requests: PaymentRequestBuilder) -> Self {
        Self { db, gateway, requests }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }
}

impl<B, G> CheckoutApi<B, G>
where
    B: OrderRepository,
    G: GatewayClient,
{
    /// Calls `Init` for the order and returns the gateway's `PaymentURL`.
    ///
    /// `Ok(None)` means the gateway answered but refused the payment (or sent no URL). The call is made exactly once;
    /// repeating it could register the same order twice on the gateway's side.
    pub async fn payment_url_for_order(&self, order: &Order) -> Result<Option<String>, CheckoutError> {
        let request = self.requests.build(order)?;
        let response = self.gateway.init(&request).await?;
        if !response.is_success() {
            info!(
                "🛒️ Gateway declined to start a payment for order {}. ErrorCode {}: {}",
                order.serial,
                response.error_code,
                response.message.as_deref().or(response.details.as_deref()).unwrap_or_default()
            );
            return Ok(None);
        }
        if response.payment_url.is_none() {
            warn!("🛒️ Gateway accepted order {}, but did not send a payment URL", order.serial);
        }
        Ok(response.payment_url)
    }

    /// Works out where to send a buyer who wants to pay for the order with the given serial.
    ///
    /// Unknown orders go to the home page. Orders that are not pending, or that the gateway will not take, go to the
    /// order's done page.
    pub async fn checkout(&self, serial: &str) -> Result<PaymentRedirect, CheckoutError> {
        let serial = Serial::from(serial.trim());
        if serial.is_empty() {
            return Ok(PaymentRedirect::Home);
        }
        let Some(order) = self.db.fetch_order_by_serial(&serial).await? else {
            info!("🛒️ Checkout requested for unknown order {serial}");
            return Ok(PaymentRedirect::Home);
        };
        if order.status != OrderStatusType::Pending {
            debug!("🛒️ Order {serial} is {}. Nothing to pay.", order.status);
            return Ok(PaymentRedirect::for_order(&order));
        }
        let redirect = match self.payment_url_for_order(&order).await? {
            Some(url) => {
                debug!("🛒️ Sending the buyer of order {serial} to {url}");
                PaymentRedirect::Gateway(url)
            },
            None => PaymentRedirect::for_order(&order),
        };
        Ok(redirect)
    }
}
