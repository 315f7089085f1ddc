use core_types::{Trade, round_price};
use rust_decimal::Decimal;
use serde::Serialize;

/// Summary of one stock over a trailing window, priced at its VWSP.
///
/// Every metric is `None` when the window holds no trades. `pe_ratio` is also
/// `None` when the stock pays no dividend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockMetrics {
    pub symbol: String,
    pub window_minutes: u32,
    pub trade_count: usize,
    pub vwsp: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,
}

/// Σ(price × quantity) / Σ(quantity), rounded to 6 decimal places.
///
/// `None` without trades, and also when the sums leave the `Decimal` range.
pub fn volume_weighted_price(trades: &[Trade]) -> Option<Decimal> {
    if trades.is_empty() {
        return None;
    }

    let totals = trades
        .iter()
        .try_fold((Decimal::ZERO, Decimal::ZERO), |(notional, volume), trade| {
            Some((
                notional.checked_add(trade.value())?,
                volume.checked_add(Decimal::from(trade.quantity()))?,
            ))
        });
    let Some((notional, volume)) = totals else {
        tracing::warn!(trades = trades.len(), "Traded notional out of range, no VWSP");
        return None;
    };

    if volume.is_zero() {
        return None;
    }
    notional.checked_div(volume).and_then(round_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn weights_prices_by_quantity() {
        let trades = vec![
            Trade::new(None, "POP", 50, "BUY", dec!(100)).expect("valid trade"),
            Trade::new(None, "POP", 20, "SELL", dec!(101)).expect("valid trade"),
        ];
        assert_eq!(volume_weighted_price(&trades), Some(dec!(100.285714)));
    }

    #[test]
    fn notional_overflow_yields_no_price() {
        let big = dec!(10000000000000000);
        let trades: Vec<Trade> = (0..10)
            .map(|_| Trade::new(None, "POP", 1_000_000_000_000, "BUY", big).expect("valid trade"))
            .collect();
        assert_eq!(volume_weighted_price(&trades), None);
        assert_eq!(volume_weighted_price(&trades[..1]), Some(big));
    }

    #[test]
    fn no_trades_no_price() {
        assert_eq!(volume_weighted_price(&[]), None);
    }
}
