use std::fmt::Display;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The number of minor units (kopecks, cents) in one major currency unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------     MinorUnits      ---------------------------------------------------------
/// An amount of money expressed as an integer number of minor currency units, which is the only representation the
/// gateway accepts for amount fields.
///
/// Serializes as a bare integer.
#[derive(Debug, Clone, Copy, Default, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in minor units: {0}")]
pub struct MinorUnitsConversionError(String);

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl TryFrom<Decimal> for MinorUnits {
    type Error = MinorUnitsConversionError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_major(value)
    }
}

impl Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_major, abs % per_major)
    }
}

impl MinorUnits {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts an amount in major units (e.g. `199.99` roubles) into minor units.
    ///
    /// Rounding is always half-up (away from zero at the midpoint), so `10.005` becomes `1001`. Every amount sent to
    /// the gateway goes through this function so that one deployment never mixes rounding rules.
    pub fn from_major(amount: Decimal) -> Result<Self, MinorUnitsConversionError> {
        let scaled = amount
            .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
            .ok_or_else(|| MinorUnitsConversionError(format!("{amount} overflows when scaled to minor units")))?;
        scaled
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Self)
            .ok_or_else(|| MinorUnitsConversionError(format!("{amount} is too large to convert to minor units")))
    }
}
