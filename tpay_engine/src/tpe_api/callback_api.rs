//! Handling of the buyer being sent back from the gateway.
//!
//! The success URL can be opened by anyone who knows the serial, so a success callback is only believed after the
//! gateway confirms the payment over `CheckOrder`. The error URL is taken at face value; faking it gains nothing.
//!
//! Neither entry point ever returns an error. Every outcome maps to a redirect, and the outcome itself is returned so
//! the caller can log or count it.
use std::fmt::{Debug, Display};

use log::*;
use tinkoff_tools::{CheckOrderResponse, GatewayClient};

use crate::{
    db_types::{Order, OrderStatusType, Serial},
    tpe_api::{order_state_api::OrderStateApi, payment_request::PaymentRequestBuilder},
    traits::OrderRepository,
};

/// System note stored on an order when the buyer came back through the error URL.
pub const PAYMENT_NOT_COMPLETED_NOTE: &str = "Payment was not completed";

/// Where to send the buyer's browser next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRedirect {
    /// The shop's home page. Used when no order could be located.
    Home,
    /// The order's "done" page, identified by the order uuid.
    OrderDone(String),
    /// The gateway's payment form.
    Gateway(String),
}

impl PaymentRedirect {
    pub fn for_order(order: &Order) -> Self {
        Self::OrderDone(order.uuid.clone())
    }

    pub fn location(&self) -> String {
        match self {
            PaymentRedirect::Home => "/".to_string(),
            PaymentRedirect::OrderDone(uuid) => format!("/orders/{uuid}/done"),
            PaymentRedirect::Gateway(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// No order has this serial.
    UnknownOrder,
    /// The order was already paid. Nothing was checked or written.
    AlreadyPaid,
    /// The order had already failed. Nothing was checked or written.
    AlreadyFailed,
    /// The gateway confirmed the payment and this callback moved the order to `Paid`.
    Confirmed,
    /// The order was moved to `Failed` with the given note.
    MarkedFailed(String),
    /// Another callback changed the order's status while this one was running. Nothing was written.
    Superseded,
    /// The gateway could not be asked, or gave an unusable answer. The order is still `Pending`.
    Unverified(String),
    /// The order store failed. The order may not reflect the gateway's answer.
    StoreError(String),
}

impl Display for CallbackOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackOutcome::UnknownOrder => write!(f, "unknown order"),
            CallbackOutcome::AlreadyPaid => write!(f, "already paid"),
            CallbackOutcome::AlreadyFailed => write!(f, "already failed"),
            CallbackOutcome::Confirmed => write!(f, "confirmed"),
            CallbackOutcome::MarkedFailed(note) => write!(f, "marked as failed ({note})"),
            CallbackOutcome::Superseded => write!(f, "superseded by another callback"),
            CallbackOutcome::Unverified(reason) => write!(f, "unverified ({reason})"),
            CallbackOutcome::StoreError(reason) => write!(f, "store error ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackResult {
    pub redirect: PaymentRedirect,
    pub outcome: CallbackOutcome,
}

impl CallbackResult {
    fn home(outcome: CallbackOutcome) -> Self {
        Self { redirect: PaymentRedirect::Home, outcome }
    }

    fn done(order: &Order, outcome: CallbackOutcome) -> Self {
        Self { redirect: PaymentRedirect::for_order(order), outcome }
    }
}

pub struct PaymentCallbackApi<B, G> {
    orders: OrderStateApi<B>,
    gateway: G,
    requests: PaymentRequestBuilder,
}

impl<B, G> Debug for PaymentCallbackApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentCallbackApi")
    }
}

impl<B, G> PaymentCallbackApi<B, G> {
    pub fn new(orders: OrderStateApi<B>, gateway: G, requests: PaymentRequestBuilder) -> Self {
        Self { orders, gateway, requests }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn orders(&self) -> &OrderStateApi<B> {
        &self.orders
    }
}

impl<B, G> PaymentCallbackApi<B, G>
where
    B: OrderRepository,
    G: GatewayClient,
{
    /// The buyer was sent to the success URL. The payment is verified with `CheckOrder` before the order is marked
    /// as paid; a definite "no" from the gateway fails the order.
    pub async fn on_success(&self, serial: &str) -> CallbackResult {
        let order = match self.locate(serial).await {
            Ok(order) => order,
            Err(result) => return result,
        };
        match order.status {
            OrderStatusType::Paid => {
                debug!("🔙️ Order {} is already paid", order.serial);
                return CallbackResult::done(&order, CallbackOutcome::AlreadyPaid);
            },
            OrderStatusType::Failed => {
                debug!("🔙️ Order {} has already failed. Not checking it again.", order.serial);
                return CallbackResult::done(&order, CallbackOutcome::AlreadyFailed);
            },
            OrderStatusType::Pending => {},
        }
        let request = self.requests.check_order_request(&order.serial);
        let outcome = match self.gateway.check_order(&request).await {
            Ok(response) => self.apply_check_order(&order, &response).await,
            Err(e) => {
                warn!("🔙️ Could not verify the payment for order {}. It stays pending. {e}", order.serial);
                CallbackOutcome::Unverified(e.to_string())
            },
        };
        info!("🔙️ Success callback for order {}: {outcome}", order.serial);
        CallbackResult::done(&order, outcome)
    }

    /// The buyer was sent to the error URL. A pending order is marked as failed; nothing is asked of the gateway.
    pub async fn on_error(&self, serial: &str) -> CallbackResult {
        let order = match self.locate(serial).await {
            Ok(order) => order,
            Err(result) => return result,
        };
        let outcome = match order.status {
            OrderStatusType::Paid => {
                warn!("🔙️ Error callback for order {}, which is already paid. Ignoring it.", order.serial);
                CallbackOutcome::AlreadyPaid
            },
            OrderStatusType::Failed => CallbackOutcome::AlreadyFailed,
            OrderStatusType::Pending => self.fail(&order, PAYMENT_NOT_COMPLETED_NOTE).await,
        };
        info!("🔙️ Error callback for order {}: {outcome}", order.serial);
        CallbackResult::done(&order, outcome)
    }

    async fn locate(&self, serial: &str) -> Result<Order, CallbackResult> {
        let serial = Serial::from(serial.trim());
        if serial.is_empty() {
            debug!("🔙️ Callback without a serial");
            return Err(CallbackResult::home(CallbackOutcome::UnknownOrder));
        }
        match self.orders.order_by_serial(&serial).await {
            Ok(Some(order)) => Ok(order),
            Ok(None) => {
                info!("🔙️ Callback for unknown order {serial}");
                Err(CallbackResult::home(CallbackOutcome::UnknownOrder))
            },
            Err(e) => {
                error!("🔙️ Could not look up order {serial}. {e}");
                Err(CallbackResult::home(CallbackOutcome::StoreError(e.to_string())))
            },
        }
    }

    async fn apply_check_order(&self, order: &Order, response: &CheckOrderResponse) -> CallbackOutcome {
        if response.is_confirmed() {
            return match self.orders.confirm(order).await {
                Ok(Some(_)) => CallbackOutcome::Confirmed,
                Ok(None) => CallbackOutcome::Superseded,
                Err(e) => {
                    error!("🔙️ Payment for order {} was confirmed, but could not be fully recorded. {e}", order.serial);
                    CallbackOutcome::StoreError(e.to_string())
                },
            };
        }
        let note = format!("Payment was not confirmed by the gateway: {}", response.rejection_reason());
        self.fail(order, &note).await
    }

    async fn fail(&self, order: &Order, note: &str) -> CallbackOutcome {
        match self.orders.fail(order, note).await {
            Ok(Some(_)) => CallbackOutcome::MarkedFailed(note.to_string()),
            Ok(None) => CallbackOutcome::Superseded,
            Err(e) => {
                error!("🔙️ Could not mark order {} as failed. {e}", order.serial);
                CallbackOutcome::StoreError(e.to_string())
            },
        }
    }
}
