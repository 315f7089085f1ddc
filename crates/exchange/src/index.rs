//! Geometric mean for the all-share index.
//!
//! `rust_decimal` has no logarithm, so this step goes through `f64`:
//! `exp(mean(ln(v)))`. The result is an approximation and is only exact to the
//! 6 decimal places it is rounded to for ordinary price magnitudes.

use core_types::round_price;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

/// Geometric mean of strictly positive values, rounded to 6 decimal places.
///
/// Non-positive inputs are skipped. Returns `None` when nothing is left or the
/// result cannot be represented with 6 fractional digits.
pub fn geometric_mean(values: &[Decimal]) -> Option<Decimal> {
    let logs: Vec<f64> = values
        .iter()
        .filter(|v| **v > Decimal::ZERO)
        .filter_map(|v| {
            let as_float = v.to_f64();
            if as_float.is_none() {
                tracing::warn!(value = %v, "Value cannot be converted to f64, skipped");
            }
            as_float
        })
        .map(f64::ln)
        .collect();

    if logs.is_empty() {
        return None;
    }

    let mean_log = logs.iter().sum::<f64>() / logs.len() as f64;
    let mean = Decimal::from_f64(mean_log.exp())?;
    round_price(mean)
}
