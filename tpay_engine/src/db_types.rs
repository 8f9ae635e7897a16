use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

//--------------------------------------        Serial         ---------------------------------------------------------
/// The gateway-facing order number. It is sent to the gateway as `OrderId` and comes back in the callback query
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    pub fn new<S: Into<String>>(serial: S) -> Self {
        Self(serial.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl FromStr for Serial {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for Serial {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Serial {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for Serial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order has been placed, but no payment has been confirmed.
    Pending,
    /// The gateway confirmed the payment. This status is terminal.
    Paid,
    /// The payment was declined or abandoned. This status is terminal.
    Failed,
}

impl OrderStatusType {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatusType::Pending)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Pending => write!(f, "Pending"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Failed => write!(f, "Failed"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatusType::Pending
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct ConversionError(String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

//--------------------------------------     OrderProduct      ---------------------------------------------------------
/// A line item of an order. Prices are in major currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProduct {
    pub title: String,
    /// Unit price. Zero for gifts and other free items.
    pub price: Decimal,
    pub count: Decimal,
    /// `price × count`, unless the order platform applied a line discount.
    pub total: Decimal,
}

impl OrderProduct {
    pub fn new<S: Into<String>>(title: S, price: Decimal, count: Decimal) -> Self {
        Self { title: title.into(), price, count, total: price * count }
    }

    pub fn is_free(&self) -> bool {
        self.price <= Decimal::ZERO
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub serial: Serial,
    /// Opaque internal identifier. Used in the buyer-facing "done" page URL.
    pub uuid: String,
    pub total_price: Decimal,
    pub phone: String,
    pub email: String,
    pub products: Vec<OrderProduct>,
    pub status: OrderStatusType,
    /// A note for shop staff explaining the last status change.
    pub system_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------        NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub serial: Serial,
    pub uuid: String,
    /// The total price of the order, in major units
    pub total_price: Decimal,
    pub phone: String,
    pub email: String,
    pub products: Vec<OrderProduct>,
}

impl NewOrder {
    pub fn new<S: Into<String>>(serial: Serial, uuid: S, total_price: Decimal) -> Self {
        Self {
            serial,
            uuid: uuid.into(),
            total_price,
            phone: String::default(),
            email: String::default(),
            products: vec![],
        }
    }

    pub fn with_contact<P: Into<String>, E: Into<String>>(mut self, phone: P, email: E) -> Self {
        self.phone = phone.into();
        self.email = email.into();
        self
    }

    pub fn with_product(mut self, product: OrderProduct) -> Self {
        self.products.push(product);
        self
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn status_strings() {
        for s in [OrderStatusType::Pending, OrderStatusType::Paid, OrderStatusType::Failed] {
            assert_eq!(s.to_string().parse::<OrderStatusType>().unwrap(), s);
        }
        assert_eq!(OrderStatusType::from("Refunded".to_string()), OrderStatusType::Pending);
        assert!(!OrderStatusType::Pending.is_terminal());
        assert!(OrderStatusType::Paid.is_terminal());
    }

    #[test]
    fn product_total() {
        let p = OrderProduct::new("Чай", dec!(150.50), dec!(3));
        assert_eq!(p.total, dec!(451.50));
        assert!(!p.is_free());
        assert!(OrderProduct::new("Gift", dec!(0), dec!(1)).is_free());
    }

    #[test]
    fn serial_display() {
        let serial = Serial::from("1042");
        assert_eq!(serial.to_string(), "#1042");
        assert_eq!(serial.as_str(), "1042");
        assert!(Serial::from("  ").is_empty());
    }
}
