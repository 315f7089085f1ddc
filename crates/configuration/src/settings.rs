use crate::error::ConfigError;
use core_types::{Stock, StockType, Symbol};
use exchange::ExchangeSettings;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub exchange: ExchangeSettings,
    /// The reference catalog registered at startup.
    #[serde(default)]
    pub stocks: Vec<StockConfig>,
}

/// One `[[stocks]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StockConfig {
    pub symbol: String,
    /// `common` or `preferred`, any case.
    pub stock_type: String,
    pub last_dividend: Decimal,
    /// Fraction of par value, e.g. "0.02" for 2%. Expected for preferred stocks.
    #[serde(default)]
    pub fixed_dividend: Option<Decimal>,
    pub par_value: Decimal,
}

impl Config {
    /// Checks cross-field rules the type system cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exchange.default_window_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "exchange.default_window_minutes must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.stocks {
            let symbol = Symbol::normalize(&entry.symbol);
            if !seen.insert(symbol.clone()) {
                return Err(ConfigError::ValidationError(format!(
                    "Stock '{}' is listed more than once",
                    symbol
                )));
            }
        }
        Ok(())
    }

    /// Converts every stock entry into a validated `Stock`.
    pub fn build_stocks(&self) -> Result<Vec<Stock>, ConfigError> {
        self.stocks.iter().map(Stock::try_from).collect()
    }
}

impl TryFrom<&StockConfig> for Stock {
    type Error = ConfigError;

    fn try_from(entry: &StockConfig) -> Result<Self, Self::Error> {
        let stock_type: StockType = entry.stock_type.parse()?;
        Ok(Stock::new(
            &entry.symbol,
            stock_type,
            entry.last_dividend,
            entry.fixed_dividend,
            entry.par_value,
        )?)
    }
}
