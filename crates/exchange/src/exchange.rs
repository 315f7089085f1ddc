use crate::error::ExchangeError;
use crate::index::geometric_mean;
use crate::metrics::{StockMetrics, volume_weighted_price};
use crate::settings::ExchangeSettings;
use chrono::{DateTime, Duration, Utc};
use core_types::{Stock, Symbol, Trade};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The stock catalog and trade log of one exchange session.
///
/// All operations take `&self`; share the exchange between threads with
/// `Arc<Exchange>`. The catalog and the log sit behind separate locks so trading
/// never contends with catalog lookups.
#[derive(Debug, Default)]
pub struct Exchange {
    settings: ExchangeSettings,
    /// Keyed by uppercased symbol.
    stocks: RwLock<HashMap<String, Stock>>,
    /// Insertion-ordered, append-only.
    trades: RwLock<Vec<Trade>>,
}

impl Exchange {
    /// Creates an empty exchange with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ExchangeSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &ExchangeSettings {
        &self.settings
    }

    // --- Catalog ---

    /// Registers a stock, replacing any earlier entry for the same symbol.
    /// Re-registration is how reference data is corrected; the replaced stock is returned.
    pub fn add_stock(&self, stock: Stock) -> Option<Stock> {
        let key = stock.symbol().as_str().to_string();
        let stock_type = stock.stock_type();
        let replaced = write(&self.stocks).insert(key.clone(), stock);

        match &replaced {
            Some(_) => tracing::info!(symbol = %key, %stock_type, "Replaced stock reference data"),
            None => tracing::info!(symbol = %key, %stock_type, "Registered stock"),
        }
        replaced
    }

    /// Case-insensitive lookup.
    pub fn get_stock(&self, symbol: &str) -> Option<Stock> {
        read(&self.stocks).get(&Symbol::normalize(symbol)).cloned()
    }

    /// Sorted snapshot of the listed symbols.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = read(&self.stocks).keys().cloned().collect();
        symbols.sort();
        symbols
    }

    // --- Trade log ---

    /// Validates and appends a trade. The only mutator of the log.
    ///
    /// Validation runs before the write guard is taken, so a rejected trade never
    /// touches the log.
    pub fn record_trade(
        &self,
        symbol: &str,
        quantity: i64,
        side: &str,
        price: Decimal,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Trade, ExchangeError> {
        let trade = Trade::new(timestamp, symbol, quantity, side, price).map_err(|e| {
            tracing::warn!(symbol, quantity, side, %price, error = %e, "Rejected trade");
            e
        })?;

        if self.settings.require_listed_symbol
            && !read(&self.stocks).contains_key(trade.symbol().as_str())
        {
            tracing::warn!(symbol = %trade.symbol(), "Rejected trade for unlisted symbol");
            return Err(ExchangeError::UnknownSymbol(trade.symbol().to_string()));
        }

        write(&self.trades).push(trade.clone());
        tracing::debug!(
            trade_id = %trade.trade_id(),
            symbol = %trade.symbol(),
            quantity = trade.quantity(),
            side = %trade.side(),
            price = %trade.price(),
            "Recorded trade"
        );
        Ok(trade)
    }

    /// Snapshot of the whole log in insertion order.
    pub fn all_trades(&self) -> Vec<Trade> {
        read(&self.trades).clone()
    }

    pub fn trade_count(&self) -> usize {
        read(&self.trades).len()
    }

    /// Trades for `symbol` stamped within the last `minutes`, in log order.
    pub fn trades_for_stock_in_interval(&self, symbol: &str, minutes: u32) -> Vec<Trade> {
        self.trades_for_stock_in_interval_at(symbol, minutes, Utc::now())
    }

    /// As `trades_for_stock_in_interval`, with the window ending at `now`.
    /// The lower bound is inclusive: `timestamp >= now - minutes`.
    pub fn trades_for_stock_in_interval_at(
        &self,
        symbol: &str,
        minutes: u32,
        now: DateTime<Utc>,
    ) -> Vec<Trade> {
        let symbol = Symbol::normalize(symbol);
        let cutoff = window_start(now, minutes);

        read(&self.trades)
            .iter()
            .filter(|t| t.symbol() == symbol.as_str() && t.timestamp() >= cutoff)
            .cloned()
            .collect()
    }

    // --- Metrics ---

    /// Volume-weighted stock price over the last `minutes`, or `None` without trades.
    pub fn vol_weighted_stock_price(&self, symbol: &str, minutes: u32) -> Option<Decimal> {
        self.vol_weighted_stock_price_at(symbol, minutes, Utc::now())
    }

    pub fn vol_weighted_stock_price_at(
        &self,
        symbol: &str,
        minutes: u32,
        now: DateTime<Utc>,
    ) -> Option<Decimal> {
        let trades = self.trades_for_stock_in_interval_at(symbol, minutes, now);
        let vwsp = volume_weighted_price(&trades);
        tracing::debug!(symbol, minutes, trades = trades.len(), ?vwsp, "Computed VWSP");
        vwsp
    }

    /// GBCE All Share Index: geometric mean of the positive VWSPs of every listed
    /// stock over the last `minutes`. `None` when no stock traded in the window.
    pub fn gbce_all_share_index(&self, minutes: u32) -> Option<Decimal> {
        self.gbce_all_share_index_at(minutes, Utc::now())
    }

    /// Each stock's VWSP takes its own snapshot of the log; no guard is held
    /// across the whole aggregate.
    pub fn gbce_all_share_index_at(&self, minutes: u32, now: DateTime<Utc>) -> Option<Decimal> {
        let prices: Vec<Decimal> = self
            .symbols()
            .iter()
            .filter_map(|symbol| self.vol_weighted_stock_price_at(symbol, minutes, now))
            .filter(|vwsp| *vwsp > Decimal::ZERO)
            .collect();

        let index = geometric_mean(&prices);
        tracing::debug!(minutes, stocks = prices.len(), ?index, "Computed all-share index");
        index
    }

    /// Dividend yield, P/E and VWSP of one listed stock, priced at its VWSP.
    /// `Ok(None)` when the symbol is not listed.
    pub fn stock_metrics(
        &self,
        symbol: &str,
        minutes: u32,
    ) -> Result<Option<StockMetrics>, ExchangeError> {
        self.stock_metrics_at(symbol, minutes, Utc::now())
    }

    pub fn stock_metrics_at(
        &self,
        symbol: &str,
        minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<StockMetrics>, ExchangeError> {
        let Some(stock) = self.get_stock(symbol) else {
            return Ok(None);
        };

        let trades = self.trades_for_stock_in_interval_at(symbol, minutes, now);
        let vwsp = volume_weighted_price(&trades);
        let dividend_yield = vwsp.map(|price| stock.dividend_yield(price)).transpose()?;
        let pe_ratio = vwsp
            .map(|price| stock.pe_ratio(price))
            .transpose()?
            .flatten();

        Ok(Some(StockMetrics {
            symbol: stock.symbol().to_string(),
            window_minutes: minutes,
            trade_count: trades.len(),
            vwsp,
            dividend_yield,
            pe_ratio,
        }))
    }
}

fn window_start(now: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::minutes(i64::from(minutes)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

// A panic while a guard is held cannot leave a half-written entry: every
// critical section is a single insert, push or clone.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
