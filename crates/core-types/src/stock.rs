use crate::enums::StockType;
use crate::error::CoreError;
use crate::precision::round_price;
use crate::symbol::Symbol;
use rust_decimal::Decimal;
use serde::Serialize;

/// Reference data for one listed security, together with its pricing formulas.
///
/// A `Stock` is immutable once built. Amounts are in the same currency unit as
/// the trade prices (pennies in the GBCE sample data), while `fixed_dividend` is a
/// fraction of `par_value` (0.02 for 2%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stock {
    symbol: Symbol,
    stock_type: StockType,
    last_dividend: Decimal,
    fixed_dividend: Option<Decimal>,
    par_value: Decimal,
}

impl Stock {
    /// Builds a validated stock.
    ///
    /// `last_dividend` and `fixed_dividend` must be non-negative and `par_value`
    /// strictly positive. A fixed dividend on a Common stock is kept but never used.
    /// A Preferred stock without a fixed dividend is accepted; its dividend yield
    /// then fails with `CoreError::InvalidState`.
    pub fn new(
        symbol: &str,
        stock_type: StockType,
        last_dividend: Decimal,
        fixed_dividend: Option<Decimal>,
        par_value: Decimal,
    ) -> Result<Self, CoreError> {
        let symbol = Symbol::parse(symbol)?;

        if last_dividend < Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "Last dividend of {} must not be negative, got {}",
                symbol, last_dividend
            )));
        }
        if par_value <= Decimal::ZERO {
            return Err(CoreError::InvalidArgument(format!(
                "Par value of {} must be greater than zero, got {}",
                symbol, par_value
            )));
        }
        if let Some(rate) = fixed_dividend {
            if rate < Decimal::ZERO {
                return Err(CoreError::InvalidArgument(format!(
                    "Fixed dividend of {} must not be negative, got {}",
                    symbol, rate
                )));
            }
        }
        match (stock_type, fixed_dividend) {
            (StockType::Preferred, Some(rate)) if rate.checked_mul(par_value).is_none() => {
                return Err(CoreError::InvalidArgument(format!(
                    "Fixed dividend {} on par value {} of {} is out of range",
                    rate, par_value, symbol
                )));
            }
            (StockType::Preferred, None) => {
                tracing::warn!(%symbol, "Preferred stock registered without a fixed dividend rate");
            }
            _ => {}
        }

        Ok(Self {
            symbol,
            stock_type,
            last_dividend,
            fixed_dividend,
            par_value,
        })
    }

    /// Shorthand for a Common stock.
    pub fn common(
        symbol: &str,
        last_dividend: Decimal,
        par_value: Decimal,
    ) -> Result<Self, CoreError> {
        Self::new(symbol, StockType::Common, last_dividend, None, par_value)
    }

    /// Shorthand for a Preferred stock with its fixed dividend rate.
    pub fn preferred(
        symbol: &str,
        last_dividend: Decimal,
        fixed_dividend: Decimal,
        par_value: Decimal,
    ) -> Result<Self, CoreError> {
        Self::new(symbol, StockType::Preferred, last_dividend, Some(fixed_dividend), par_value)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn stock_type(&self) -> StockType {
        self.stock_type
    }

    pub fn last_dividend(&self) -> Decimal {
        self.last_dividend
    }

    pub fn fixed_dividend(&self) -> Option<Decimal> {
        self.fixed_dividend
    }

    pub fn par_value(&self) -> Decimal {
        self.par_value
    }

    /// Dividend yield at `price`.
    ///
    /// Common: `last_dividend / price`. Preferred: `fixed_dividend * par_value / price`.
    /// Rounded to 6 decimal places.
    pub fn dividend_yield(&self, price: Decimal) -> Result<Decimal, CoreError> {
        ensure_positive_price(price)?;

        let dividend = match self.stock_type {
            StockType::Common => self.last_dividend,
            StockType::Preferred => {
                let rate = self.fixed_dividend.ok_or_else(|| {
                    CoreError::InvalidState(format!(
                        "Preferred stock {} has no fixed dividend rate",
                        self.symbol
                    ))
                })?;
                // Range checked in `Stock::new`.
                rate * self.par_value
            }
        };

        ratio(dividend, price, "dividend yield", &self.symbol)
    }

    /// Price/earnings ratio at `price`, or `None` when the dividend basis is zero.
    pub fn pe_ratio(&self, price: Decimal) -> Result<Option<Decimal>, CoreError> {
        ensure_positive_price(price)?;

        let dividend = self.dividend_basis();
        if dividend.is_zero() {
            return Ok(None);
        }
        ratio(price, dividend, "P/E ratio", &self.symbol).map(Some)
    }

    /// The per-share dividend used for P/E. A Preferred stock with no fixed rate
    /// contributes zero.
    pub fn dividend_basis(&self) -> Decimal {
        match self.stock_type {
            StockType::Common => self.last_dividend,
            StockType::Preferred => self
                .fixed_dividend
                .map(|rate| rate * self.par_value) // range checked in `Stock::new`
                .unwrap_or(Decimal::ZERO),
        }
    }
}

/// `numerator / denominator` rounded to 6 places; out-of-range results are
/// rejected instead of panicking.
fn ratio(
    numerator: Decimal,
    denominator: Decimal,
    metric: &str,
    symbol: &Symbol,
) -> Result<Decimal, CoreError> {
    numerator
        .checked_div(denominator)
        .and_then(round_price)
        .ok_or_else(|| {
            CoreError::InvalidArgument(format!(
                "{} of {} is out of range for {} / {}",
                metric, symbol, numerator, denominator
            ))
        })
}

fn ensure_positive_price(price: Decimal) -> Result<(), CoreError> {
    if price <= Decimal::ZERO {
        return Err(CoreError::InvalidArgument(format!(
            "Price should be greater than zero, got {}",
            price
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pop() -> Stock {
        Stock::common("pop", dec!(8), dec!(100)).expect("valid stock")
    }

    fn gin() -> Stock {
        Stock::preferred("GIN", dec!(8), dec!(0.02), dec!(100)).expect("valid stock")
    }

    #[test]
    fn common_dividend_yield_uses_last_dividend() {
        assert_eq!(pop().dividend_yield(dec!(100)).expect("yield"), dec!(0.08));
        assert_eq!(pop().dividend_yield(dec!(3)).expect("yield"), dec!(2.666667));
    }

    #[test]
    fn preferred_dividend_yield_uses_fixed_rate_and_par() {
        // 0.02 * 100 / 50
        assert_eq!(gin().dividend_yield(dec!(50)).expect("yield"), dec!(0.04));
        assert_eq!(gin().dividend_yield(dec!(7)).expect("yield"), dec!(0.285714));
    }

    #[test]
    fn dividend_yield_rejects_non_positive_price() {
        for stock in [pop(), gin()] {
            for price in [dec!(0), dec!(-1)] {
                let err = stock.dividend_yield(price).expect_err("must fail");
                assert!(matches!(err, CoreError::InvalidArgument(_)));
            }
        }
    }

    #[test]
    fn preferred_without_fixed_rate_is_invalid_state() {
        let stock = Stock::new("GIN", StockType::Preferred, dec!(8), None, dec!(100))
            .expect("accepted at construction");
        let err = stock.dividend_yield(dec!(10)).expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert_eq!(stock.pe_ratio(dec!(10)).expect("pe"), None);
    }

    #[test]
    fn zero_dividend_yield_is_zero_not_absent() {
        let tea = Stock::common("TEA", dec!(0), dec!(100)).expect("valid stock");
        assert_eq!(tea.dividend_yield(dec!(10)).expect("yield"), Decimal::ZERO);
    }

    #[test]
    fn pe_ratio_is_absent_for_zero_dividend() {
        let tea = Stock::common("TEA", dec!(0), dec!(100)).expect("valid stock");
        assert_eq!(tea.pe_ratio(dec!(10)).expect("pe"), None);

        let zero_rate = Stock::preferred("GIN", dec!(8), dec!(0), dec!(100)).expect("valid stock");
        assert_eq!(zero_rate.pe_ratio(dec!(10)).expect("pe"), None);
    }

    #[test]
    fn pe_ratio_divides_price_by_dividend_basis() {
        assert_eq!(pop().pe_ratio(dec!(100)).expect("pe"), Some(dec!(12.5)));
        // basis for GIN is 0.02 * 100 = 2
        assert_eq!(gin().pe_ratio(dec!(7)).expect("pe"), Some(dec!(3.5)));
        assert_eq!(pop().pe_ratio(dec!(10)).expect("pe"), Some(dec!(1.25)));
        assert_eq!(pop().pe_ratio(dec!(1)).expect("pe"), Some(dec!(0.125)));
    }

    #[test]
    fn pe_ratio_rejects_non_positive_price() {
        let err = pop().pe_ratio(dec!(0)).expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn common_ignores_fixed_dividend() {
        let stock = Stock::new("ALE", StockType::Common, dec!(23), Some(dec!(0.5)), dec!(60))
            .expect("valid stock");
        assert_eq!(stock.dividend_yield(dec!(100)).expect("yield"), dec!(0.23));
        assert_eq!(stock.dividend_basis(), dec!(23));
    }

    #[test]
    fn tiny_price_is_rejected_not_overflowed() {
        let stock = Stock::common("POP", dec!(8000000000), dec!(100)).expect("valid stock");
        let err = stock
            .dividend_yield(dec!(0.0000000000000000000001))
            .expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn huge_pe_ratio_is_rejected() {
        let err = pop().pe_ratio(Decimal::MAX).expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidArgument(_)));

        let tiny_basis =
            Stock::common("POP", dec!(0.0000000000000000000001), dec!(100)).expect("valid stock");
        let err = tiny_basis.pe_ratio(Decimal::MAX).expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_preferred_basis_out_of_range() {
        let err = Stock::preferred("GIN", dec!(8), Decimal::MAX, dec!(100)).expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn rejects_invalid_reference_data() {
        assert!(matches!(
            Stock::common("POP", dec!(-1), dec!(100)),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            Stock::common("POP", dec!(8), dec!(0)),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            Stock::preferred("GIN", dec!(8), dec!(-0.02), dec!(100)),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            Stock::common("", dec!(8), dec!(100)),
            Err(CoreError::InvalidArgument(_))
        ));
    }
}
