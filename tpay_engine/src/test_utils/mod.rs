//! Helpers for tests of this crate and of the crates that depend on it. Enable the `test_utils` feature to use them.
mod memory_store;
pub mod prepare_env;
mod stub_gateway;

pub use memory_store::MemoryOrderStore;
pub use stub_gateway::StubGateway;
