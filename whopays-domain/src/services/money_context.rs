//! Monetary precision for settlement results.
//!
//! Balances are computed at full decimal precision and rounded once, at the
//! end, to the atomic unit of the configured scale (cents by default).

use crate::model::Money;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Rounding mode applied to each member balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Round half away from zero (e.g., 0.005 -> 0.01, -0.005 -> -0.01).
    #[default]
    HalfUp,
    /// Round half to nearest even number (banker's rounding).
    HalfEven,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

impl FromStr for RoundingMode {
    type Err = MoneyContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "half-up" | "half_up" | "halfup" => Ok(RoundingMode::HalfUp),
            "half-even" | "half_even" | "halfeven" | "bankers" => Ok(RoundingMode::HalfEven),
            other => Err(MoneyContextError::UnknownRoundingMode(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyContextError {
    #[error("scale {scale} is not supported (max {max_supported})")]
    UnsupportedScale { scale: u32, max_supported: u32 },
    #[error("unknown rounding mode: {0}")]
    UnknownRoundingMode(String),
}

/// Scale and rounding used when emitting balances.
///
/// # Example
/// ```
/// use whopays_domain::{Money, MoneyContext, RoundingMode};
///
/// let ctx = MoneyContext::try_new(2, RoundingMode::HalfUp).unwrap();
/// assert_eq!(ctx.round(Money::new(-15005, 3)), Money::new(-1501, 2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyContext {
    /// Number of decimal places of the atomic unit (2 for cents).
    pub scale: u32,
    pub rounding_mode: RoundingMode,
}

const MAX_SCALE: u32 = 28;

impl MoneyContext {
    /// Two decimal places, half away from zero.
    pub fn cents() -> Self {
        Self {
            scale: 2,
            rounding_mode: RoundingMode::HalfUp,
        }
    }

    pub fn try_new(scale: u32, rounding_mode: RoundingMode) -> Result<Self, MoneyContextError> {
        if scale > MAX_SCALE {
            return Err(MoneyContextError::UnsupportedScale {
                scale,
                max_supported: MAX_SCALE,
            });
        }
        Ok(Self {
            scale,
            rounding_mode,
        })
    }

    pub fn round(self, amount: Money) -> Money {
        Money::from_decimal(
            amount
                .as_decimal()
                .round_dp_with_strategy(self.scale, self.rounding_mode.strategy()),
        )
    }

    /// Smallest representable amount under this scale.
    pub fn atomic_unit(self) -> Money {
        Money::from_decimal(Decimal::new(1, self.scale))
    }
}

impl Default for MoneyContext {
    fn default() -> Self {
        Self::cents()
    }
}
