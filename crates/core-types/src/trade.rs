use crate::enums::TradeSide;
use crate::error::CoreError;
use crate::symbol::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One executed transaction. Only constructible through `Trade::new`, so a
/// `Trade` value always has a positive quantity and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trade {
    trade_id: Uuid,
    timestamp: DateTime<Utc>,
    symbol: Symbol,
    quantity: u64,
    side: TradeSide,
    price: Decimal,
}

impl Trade {
    /// Validates the inputs and builds the record.
    ///
    /// A missing `timestamp` is replaced with the current UTC instant. `side` is
    /// matched case-insensitively against `BUY`/`SELL`.
    pub fn new(
        timestamp: Option<DateTime<Utc>>,
        symbol: &str,
        quantity: i64,
        side: &str,
        price: Decimal,
    ) -> Result<Self, CoreError> {
        if quantity <= 0 {
            return Err(CoreError::InvalidArgument(format!(
                "Trade quantity must be greater than 0, got {}",
                quantity
            )));
        }
        if price <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "Trade price must be greater than zero, got {}",
                price
            )));
        }
        if price.checked_mul(Decimal::from(quantity)).is_none() {
            return Err(CoreError::InvalidArgument(format!(
                "Trade notional {} x {} is out of range",
                quantity, price
            )));
        }
        let side: TradeSide = side.parse()?;
        let symbol = Symbol::parse(symbol)?;

        Ok(Self {
            trade_id: Uuid::new_v4(),
            timestamp: timestamp.unwrap_or_else(Utc::now),
            symbol,
            quantity: quantity as u64,
            side,
            price,
        })
    }

    pub fn trade_id(&self) -> Uuid {
        self.trade_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn side(&self) -> TradeSide {
        self.side
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Notional value of the trade: price * quantity. Range checked in `Trade::new`.
    pub fn value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn builds_normalized_trade() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let trade = Trade::new(Some(ts), "pop", 50, "buy", dec!(100)).expect("valid trade");

        assert_eq!(trade.symbol().as_str(), "POP");
        assert_eq!(trade.side(), TradeSide::Buy);
        assert_eq!(trade.quantity(), 50);
        assert_eq!(trade.timestamp(), ts);
        assert_eq!(trade.value(), dec!(5000));
    }

    #[test]
    fn defaults_timestamp_to_now() {
        let before = Utc::now();
        let trade = Trade::new(None, "TEA", 1, "SELL", dec!(1)).expect("valid trade");
        let after = Utc::now();

        assert!(trade.timestamp() >= before && trade.timestamp() <= after);
    }

    #[test]
    fn rejects_non_positive_quantity() {
        for quantity in [0, -5] {
            let err = Trade::new(None, "POP", quantity, "BUY", dec!(10)).expect_err("must fail");
            assert!(matches!(err, CoreError::InvalidArgument(_)));
        }
    }

    #[test]
    fn rejects_non_positive_price() {
        for price in [dec!(0), dec!(-0.01)] {
            let err = Trade::new(None, "POP", 10, "BUY", price).expect_err("must fail");
            assert!(matches!(err, CoreError::InvalidArgument(_)));
        }
    }

    #[test]
    fn rejects_notional_out_of_range() {
        let err = Trade::new(None, "POP", 1_000_000_000_000, "BUY", dec!(100000000000000000))
            .expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidArgument(_)));

        let trade = Trade::new(None, "POP", 1_000_000_000_000, "BUY", dec!(1000000000))
            .expect("notional fits");
        assert_eq!(trade.value(), dec!(1000000000000000000000));
    }

    #[test]
    fn rejects_unknown_side() {
        let err = Trade::new(None, "POP", 10, "short", dec!(10)).expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn each_trade_gets_its_own_id() {
        let a = Trade::new(None, "POP", 10, "BUY", dec!(10)).expect("valid trade");
        let b = Trade::new(None, "POP", 10, "BUY", dec!(10)).expect("valid trade");
        assert_ne!(a.trade_id(), b.trade_id());
    }
}
