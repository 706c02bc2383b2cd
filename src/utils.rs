//! Utility functions shared by the mining engine and the search strategies.
//!
//! Includes the row-pair count used by every support computation, support
//! rounding for reports, and random helpers for search positions.

use rand::Rng;

/// Number of unordered row pairs for `n` rows: `n(n-1)/2`.
///
/// # Examples
///
/// ```
/// use gradual::utils::pair_count;
///
/// assert_eq!(pair_count(5), 10.0);
/// assert_eq!(pair_count(1), 0.0);
/// ```
#[inline]
pub fn pair_count(n: usize) -> f64 {
    let n = n as f64;
    n * (n - 1.0) / 2.0
}

/// Round a support value to 3 decimals for presentation.
///
/// # Examples
///
/// ```
/// use gradual::utils::round_support;
///
/// assert_eq!(round_support(0.66666), 0.667);
/// ```
#[inline]
pub fn round_support(support: f64) -> f64 {
    (support * 1000.0).round() / 1000.0
}

/// Draw an integer position uniformly from `[0, var_max)`.
///
/// Returns `0.0` when `var_max` is zero.
///
/// # Examples
///
/// ```
/// use gradual::utils::random_position;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let pos = random_position(&mut rng, 15);
/// assert!(pos >= 0.0 && pos < 15.0);
/// assert_eq!(pos.fract(), 0.0);
/// ```
#[inline]
pub fn random_position<R: Rng>(rng: &mut R, var_max: u128) -> f64 {
    if var_max == 0 {
        return 0.0;
    }
    rng.gen_range(0..var_max) as f64
}

/// Draw a real position uniformly from `[min, max)`.
#[inline]
pub fn uniform_position<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}
