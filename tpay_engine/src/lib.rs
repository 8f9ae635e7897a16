//! Tinkoff Payment Engine
//!
//! The payment engine takes a shop order through payment on the Tinkoff acquiring gateway: it builds the signed
//! payment request, and when the buyer comes back, verifies the outcome with the gateway and settles the order's
//! payment status exactly once.
//!
//! The library is divided into these sections:
//! 1. Order storage ([`mod@traits`] and the SQLite backend). The payment flow only needs to look orders up by serial
//!    and to move their status with a compare-and-set update. [`SqliteDatabase`] is the bundled backend.
//! 2. The public API ([`mod@tpe_api`]): request building, status reconciliation, callback handling and checkout.
//! 3. Events ([`mod@events`]). Subscribers hook into confirmed payments via [`events::EventHooks`]; each hook runs on
//!    its own task.
mod db;

pub mod db_types;
pub mod events;
pub mod traits;
pub mod tpe_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use tpe_api::{
    callback_api::{CallbackOutcome, CallbackResult, PaymentCallbackApi, PaymentRedirect, PAYMENT_NOT_COMPLETED_NOTE},
    checkout_api::CheckoutApi,
    errors::{CheckoutError, OrderStateError, PaymentRequestError},
    order_state_api::OrderStateApi,
    payment_request::{
        PaymentRequestBuilder,
        DESCRIPTION_MAX_CHARS,
        ERROR_CALLBACK_PATH,
        ITEM_NAME_MAX_CHARS,
        SUCCESS_CALLBACK_PATH,
    },
    settings::{PaymentSettings, DEFAULT_DESCRIPTION, SERIAL_PLACEHOLDER},
};
