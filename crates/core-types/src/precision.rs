use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits every monetary result is reported with.
pub const PRICE_DP: u32 = 6;

/// Rounds a computed metric to `PRICE_DP` digits, half to even, and pads the
/// scale so the value always renders with exactly `PRICE_DP` fractional digits.
///
/// Returns `None` for magnitudes above roughly 7.9e22, where a 96-bit mantissa
/// can no longer carry `PRICE_DP` fractional digits.
pub fn round_price(value: Decimal) -> Option<Decimal> {
    let mut rounded =
        value.round_dp_with_strategy(PRICE_DP, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(PRICE_DP);
    (rounded.scale() == PRICE_DP).then_some(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rounded(value: Decimal) -> Decimal {
        round_price(value).expect("representable")
    }

    #[test]
    fn rounds_half_to_even() {
        assert_eq!(rounded(dec!(0.0000005)), dec!(0.000000));
        assert_eq!(rounded(dec!(0.0000015)), dec!(0.000002));
        assert_eq!(rounded(dec!(100.2857142857)), dec!(100.285714));
    }

    #[test]
    fn pads_to_six_fractional_digits() {
        let value = rounded(dec!(0.08));
        assert_eq!(value, dec!(0.08));
        assert_eq!(value.to_string(), "0.080000");
        assert_eq!(rounded(dec!(60)).to_string(), "60.000000");
    }

    #[test]
    fn refuses_values_too_large_for_six_digits() {
        assert_eq!(round_price(Decimal::MAX), None);
        assert_eq!(round_price(dec!(100000000000000000000000)), None);
        assert_eq!(
            rounded(dec!(1000000000000000000000)).to_string(),
            "1000000000000000000000.000000"
        );
    }
}
