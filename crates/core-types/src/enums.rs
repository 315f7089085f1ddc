use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The class of a listed security. Decided once when the `Stock` is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockType {
    Common,
    Preferred,
}

impl FromStr for StockType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(StockType::Common),
            "preferred" => Ok(StockType::Preferred),
            other => Err(CoreError::InvalidArgument(format!(
                "Unknown stock type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for StockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockType::Common => f.write_str("Common"),
            StockType::Preferred => f.write_str("Preferred"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl FromStr for TradeSide {
    type Err = CoreError;

    /// Accepts `buy`/`sell` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            _ => Err(CoreError::InvalidArgument(format!(
                "Trade side must be 'BUY' or 'SELL', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => f.write_str("BUY"),
            TradeSide::Sell => f.write_str("SELL"),
        }
    }
}
