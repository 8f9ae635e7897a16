mod helpers;
mod minor_units;
mod secret;

pub use helpers::{parse_boolean_flag, truncate_chars};
pub use minor_units::{MinorUnits, MinorUnitsConversionError, MINOR_UNITS_PER_MAJOR};
pub use secret::Secret;
