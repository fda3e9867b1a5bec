//! Batch multiplier derivation.
//!
//! A day's ordered packet total is converted into whole cooking batches by
//! the recipe's packets-per-batch constant, then every ingredient ratio is
//! scaled by that whole-batch count to reach concrete purchase quantities.

/// Whole batches needed to cover `daily_total` packets when one batch
/// yields `totpkt` packets.
///
/// A non-positive `totpkt` means no conversion data is available for the
/// recipe; the result is 0, not an error.
pub fn derive_multiplier(daily_total: f64, totpkt: f64) -> i64 {
    if totpkt <= 0.0 {
        return 0;
    }
    (daily_total / totpkt).ceil() as i64
}

/// Purchase quantity for one ingredient: ratio times whole-batch count.
/// No rounding here; whole-unit rounding already happened in the multiplier.
pub fn derive_line_quantity(ratio: f64, multiplier: i64) -> f64 {
    ratio * multiplier as f64
}
