//! Client-side tools for the Tinkoff acquiring API (v2).
//!
//! * [`signing`] computes the request `Token`.
//! * [`data_objects`] holds the typed request and response bodies for `Init` and `CheckOrder`.
//! * [`TinkoffApi`] is the HTTP client. Code that only needs to *call* the gateway should depend on the
//!   [`GatewayClient`] trait so that it can be tested without the network.
mod api;
mod config;
mod error;

pub mod data_objects;
pub mod signing;

pub use api::{GatewayClient, GatewayMethod, TinkoffApi};
pub use config::{GatewayConfig, GatewayMode, TerminalCredentials, DEFAULT_GATEWAY_TIMEOUT};
pub use data_objects::{
    CheckOrderFields,
    CheckOrderRequest,
    CheckOrderResponse,
    CustomerData,
    InitFields,
    InitRequest,
    InitResponse,
    PaymentMethod,
    PaymentState,
    PaymentStatus,
    Receipt,
    ReceiptItem,
    Taxation,
    VatTag,
};
pub use error::GatewayApiError;
pub use signing::{sign, ScalarValue, SignedFields, PASSWORD_FIELD};
