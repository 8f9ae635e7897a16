//! # Tinkoff payment server
//! This crate hosts the web server for the payment flow. It is responsible for:
//! Sending buyers to the gateway's payment form for their order.
//! Receiving buyers back on the success and error callback URLs, and settling the order's payment status.
//! Redirecting the buyer to the order page (or the home page) afterwards.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/payment/checkout?serial=`: Redirects the buyer to the gateway's payment form.
//! * `/payment/callback/success?serial=`: Where the gateway sends the buyer after a successful payment.
//! * `/payment/callback/error?serial=`: Where the gateway sends the buyer after a failed or cancelled payment.
//!
//! The payment routes accept both GET and POST.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
