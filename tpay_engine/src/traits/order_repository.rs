use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderStatusType, Serial};

#[derive(Debug, Clone, Error)]
pub enum OrderRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order {0} already exists")]
    OrderAlreadyExists(Serial),
    #[error("Stored order record is invalid: {0}")]
    InvalidRecord(String),
}

impl From<sqlx::Error> for OrderRepositoryError {
    fn from(e: sqlx::Error) -> Self {
        OrderRepositoryError::DatabaseError(e.to_string())
    }
}

/// Persistence of orders and their payment status.
///
/// The order catalogue itself is owned by the shop; the payment flow only reads orders and moves their status along
/// `Pending -> Paid` or `Pending -> Failed`.
#[allow(async_fn_in_trait)]
pub trait OrderRepository {
    /// Fetches the order with the given gateway serial. A missing order is `Ok(None)`, not an error.
    async fn fetch_order_by_serial(&self, serial: &Serial) -> Result<Option<Order>, OrderRepositoryError>;

    /// Atomically moves the order from `expected` to `new_status`, storing `note` as the system note when one is
    /// given.
    ///
    /// Returns the updated order if this call made the change. If the order is missing, or its status is no longer
    /// `expected` (e.g. a concurrent callback got there first), nothing is written and `Ok(None)` is returned.
    async fn update_order_status(
        &self,
        serial: &Serial,
        expected: OrderStatusType,
        new_status: OrderStatusType,
        note: Option<&str>,
    ) -> Result<Option<Order>, OrderRepositoryError>;

    /// Stores a new `Pending` order. Fails with [`OrderRepositoryError::OrderAlreadyExists`] if the serial is taken.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderRepositoryError>;
}
