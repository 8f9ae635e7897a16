use thiserror::Error;
use tinkoff_tools::GatewayApiError;
use tpay_common::MinorUnitsConversionError;

use crate::{db_types::Serial, events::EventPublishError, traits::OrderRepositoryError};

#[derive(Debug, Clone, Error)]
pub enum PaymentRequestError {
    #[error("The amount of order {serial} cannot be sent to the gateway. {source}")]
    InvalidAmount { serial: Serial, source: MinorUnitsConversionError },
}

#[derive(Debug, Clone, Error)]
pub enum OrderStateError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} was marked as paid, but the confirmation event could not be published. {1}")]
    PublishError(Serial, String),
}

impl From<OrderRepositoryError> for OrderStateError {
    fn from(e: OrderRepositoryError) -> Self {
        OrderStateError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error(transparent)]
    PaymentRequestError(#[from] PaymentRequestError),
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayApiError),
}

impl From<OrderRepositoryError> for CheckoutError {
    fn from(e: OrderRepositoryError) -> Self {
        CheckoutError::DatabaseError(e.to_string())
    }
}

impl OrderStateError {
    pub fn publish_error(serial: Serial, e: EventPublishError) -> Self {
        OrderStateError::PublishError(serial, e.to_string())
    }
}
