use serde::{Deserialize, Serialize};

/// Runtime parameters of an `Exchange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeSettings {
    /// Trailing window, in minutes, used by callers that do not pick one.
    pub default_window_minutes: u32,
    /// When set, `record_trade` refuses symbols that are not in the catalog.
    pub require_listed_symbol: bool,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            default_window_minutes: 15,
            require_listed_symbol: false,
        }
    }
}
