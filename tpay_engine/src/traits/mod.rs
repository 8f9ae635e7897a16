//! Interface contracts for order storage backends.
//!
//! * [`OrderRepository`] is everything the payment flow needs from the shop's order store: lookup by serial and a
//!   compare-and-set status update.
mod order_repository;

pub use order_repository::{OrderRepository, OrderRepositoryError};
