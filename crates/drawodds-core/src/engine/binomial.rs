//! Exact binomial coefficients.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

/// Number of `k`-combinations of `n` items; zero when `k > n`.
///
/// Uses the multiplicative recurrence with an exact division after every step,
/// so each intermediate value is itself a binomial coefficient.
pub fn binomial(n: u32, k: u32) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let k = k.min(n - k);
    let mut result = BigUint::one();
    for i in 1..=k {
        result *= n - k + i;
        result /= i;
    }
    result
}

/// [`binomial`] converted to a float; saturates to infinity past `f64::MAX`.
pub fn binomial_f64(n: u32, k: u32) -> f64 {
    to_f64(&binomial(n, k))
}

/// `C(n, 0) ..= C(n, upto)` as floats, clamped to `n`.
pub fn binomial_row(n: u32, upto: u32) -> Vec<f64> {
    let upto = upto.min(n);
    let mut row = Vec::with_capacity(upto as usize + 1);
    let mut current = BigUint::one();
    row.push(1.0);
    for k in 1..=upto {
        current *= n - k + 1;
        current /= k;
        row.push(to_f64(&current));
    }
    row
}

/// Values past `f64::MAX` become infinite; decks are capped at
/// [`MAX_DECK_SIZE`](crate::engine::MAX_DECK_SIZE) cards so evaluation never
/// reaches that.
fn to_f64(value: &BigUint) -> f64 {
    value.to_f64().unwrap_or(f64::INFINITY)
}
