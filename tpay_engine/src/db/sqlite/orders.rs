use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::{debug, trace};
use rust_decimal::Decimal;
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderProduct, OrderStatusType, Serial},
    traits::OrderRepositoryError,
};

/// The raw row layout of the `orders` table. Amounts and line items are stored as text and decoded in
/// [`TryFrom<OrderRecord>`].
#[derive(Debug, FromRow)]
struct OrderRecord {
    id: i64,
    serial: String,
    uuid: String,
    total_price: String,
    phone: String,
    email: String,
    products: String,
    status: OrderStatusType,
    system_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = OrderRepositoryError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let total_price = Decimal::from_str(&record.total_price).map_err(|e| {
            OrderRepositoryError::InvalidRecord(format!("Order {} has an invalid total price. {e}", record.serial))
        })?;
        let products = serde_json::from_str::<Vec<OrderProduct>>(&record.products).map_err(|e| {
            OrderRepositoryError::InvalidRecord(format!("Order {} has invalid line items. {e}", record.serial))
        })?;
        Ok(Order {
            id: record.id,
            serial: Serial::from(record.serial),
            uuid: record.uuid,
            total_price,
            phone: record.phone,
            email: record.email,
            products,
            status: record.status,
            system_note: record.system_note,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Returns the order with the given serial, if it exists.
pub async fn fetch_order_by_serial(
    serial: &Serial,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderRepositoryError> {
    let record: Option<OrderRecord> =
        sqlx::query_as("SELECT * FROM orders WHERE serial = $1").bind(serial.as_str()).fetch_optional(conn).await?;
    record.map(Order::try_from).transpose()
}

/// Inserts a new order with status `Pending`.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderRepositoryError> {
    let products = serde_json::to_string(&order.products)
        .map_err(|e| OrderRepositoryError::InvalidRecord(format!("Could not serialize line items. {e}")))?;
    let now = Utc::now();
    let result = sqlx::query_as::<_, OrderRecord>(
        r#"
            INSERT INTO orders (
                serial,
                uuid,
                total_price,
                phone,
                email,
                products,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(order.serial.as_str())
    .bind(&order.uuid)
    .bind(order.total_price.to_string())
    .bind(&order.phone)
    .bind(&order.email)
    .bind(products)
    .bind(OrderStatusType::Pending)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await;
    match result {
        Ok(record) => {
            debug!("📝️ Order {} inserted with id {}", order.serial, record.id);
            Order::try_from(record)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(OrderRepositoryError::OrderAlreadyExists(order.serial))
        },
        Err(e) => Err(e.into()),
    }
}

/// Moves the order from `expected` to `new_status` in a single conditional `UPDATE`. If the status has already moved
/// on, no row matches and `None` is returned.
///
/// A `None` note leaves the existing system note in place.
pub async fn update_order_status(
    serial: &Serial,
    expected: OrderStatusType,
    new_status: OrderStatusType,
    note: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, OrderRepositoryError> {
    let record: Option<OrderRecord> = sqlx::query_as(
        r#"
            UPDATE orders
            SET status = $1, system_note = COALESCE($2, system_note), updated_at = $3
            WHERE serial = $4 AND status = $5
            RETURNING *;
        "#,
    )
    .bind(new_status)
    .bind(note)
    .bind(Utc::now())
    .bind(serial.as_str())
    .bind(expected)
    .fetch_optional(conn)
    .await?;
    match &record {
        Some(_) => trace!("📝️ Order {serial} moved from {expected} to {new_status}"),
        None => trace!("📝️ Order {serial} is not {expected}, or does not exist. Status unchanged."),
    }
    record.map(Order::try_from).transpose()
}
