//! # Payment engine public API
//!
//! * [`payment_request`] turns orders into signed gateway requests.
//! * [`order_state_api`] moves orders between `Pending`, `Paid` and `Failed`, and publishes confirmation events.
//! * [`callback_api`] handles the buyer coming back from the gateway via the success or error URL.
//! * [`checkout_api`] starts a payment and finds the URL of the gateway's payment form.
//!
//! # API usage
//!
//! Every API is built from explicit dependencies: an order store implementing
//! [`OrderRepository`](crate::traits::OrderRepository), a [`GatewayClient`](tinkoff_tools::GatewayClient) where the
//! gateway is called, and the [`EventProducers`](crate::events::EventProducers) of any subscribers.
//!
//! ```rust,ignore
//! let db = SqliteDatabase::new_with_url(&url, 25).await?;
//! let gateway = TinkoffApi::new(GatewayConfig::new_from_env_or_default())?;
//! let requests = PaymentRequestBuilder::new(credentials, PaymentSettings::new_from_env_or_default());
//! let orders = OrderStateApi::new(db.clone(), producers);
//! let callbacks = PaymentCallbackApi::new(orders, gateway, requests);
//! let result = callbacks.on_success("1042").await;
//! ```
pub mod callback_api;
pub mod checkout_api;
pub mod errors;
pub mod order_state_api;
pub mod payment_request;
pub mod settings;
