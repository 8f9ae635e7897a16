mod payment_world;
mod setups;
mod steps;

pub use payment_world::PaymentWorld;
