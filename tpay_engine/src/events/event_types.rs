use serde::{Deserialize, Serialize};

use crate::db_types::Order;

/// Emitted exactly once per order, right after the order has been stored as `Paid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmedEvent {
    pub order: Order,
}

impl PaymentConfirmedEvent {
    pub const TOPIC: &'static str = "order-payment-confirmed";

    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

