//! Exact integer and fixed-point helpers for deterministic combat math.
//!
//! Every combat formula is a ratio followed by a `ceil` or `floor`. Those
//! are evaluated here in widened integer arithmetic so that no rounding
//! error can push a value across an integer boundary. Ratios that are
//! reported rather than rounded (health fractions) use fixed-point.

use fixed::types::I32F32;

/// Fixed-point number type for ratios exposed by the simulation.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Compute `ceil(value * numerator / denominator)` without overflow.
///
/// Returns 0 when `denominator` is 0.
#[must_use]
pub fn scaled_ceil(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let product = u64::from(value) * u64::from(numerator);
    narrow(product.div_ceil(u64::from(denominator)))
}

/// Compute `floor(value * numerator / denominator)` without overflow.
///
/// Returns 0 when `denominator` is 0.
#[must_use]
pub fn scaled_floor(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let product = u64::from(value) * u64::from(numerator);
    narrow(product / u64::from(denominator))
}

/// `numerator / denominator` as a fixed-point fraction, truncated.
///
/// Returns zero when `denominator` is 0 and saturates instead of
/// overflowing the integer part.
#[must_use]
pub fn ratio(numerator: u32, denominator: u32) -> Fixed {
    if denominator == 0 {
        return Fixed::ZERO;
    }
    let bits = (u128::from(numerator) << Fixed::FRAC_NBITS) / u128::from(denominator);
    Fixed::from_bits(i64::try_from(bits).unwrap_or(i64::MAX))
}

/// Saturating conversion back to `u32`.
pub(crate) fn narrow(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_ceil_rounds_up() {
        assert_eq!(scaled_ceil(30, 80, 100), 24);
        assert_eq!(scaled_ceil(30, 81, 100), 25);
        assert_eq!(scaled_ceil(30, 1, 100), 1);
        assert_eq!(scaled_ceil(30, 0, 100), 0);
    }

    #[test]
    fn test_scaled_floor_rounds_down() {
        assert_eq!(scaled_floor(10, 110, 110), 10);
        assert_eq!(scaled_floor(10, 88, 110), 8);
        assert_eq!(scaled_floor(20, 499, 500), 19);
    }

    #[test]
    fn test_zero_denominator_is_zero() {
        assert_eq!(scaled_ceil(5, 5, 0), 0);
        assert_eq!(scaled_floor(5, 5, 0), 0);
        assert_eq!(ratio(5, 0), Fixed::ZERO);
    }

    #[test]
    fn test_large_values_do_not_overflow() {
        assert_eq!(scaled_floor(u32::MAX, u32::MAX, u32::MAX), u32::MAX);
        assert_eq!(scaled_ceil(u32::MAX, 2, 1), u32::MAX);
    }

    #[test]
    fn test_ratio_handles_full_u32_range() {
        assert_eq!(ratio(u32::MAX, u32::MAX), Fixed::ONE);
        assert_eq!(ratio(7, 7), Fixed::ONE);
        assert_eq!(ratio(u32::MAX, 1), Fixed::MAX);
    }

    #[test]
    fn test_ratio_is_exact_for_quarters() {
        assert_eq!(ratio(25, 100), Fixed::from_num(1) / Fixed::from_num(4));
        assert!(ratio(24, 100) < Fixed::from_num(1) / Fixed::from_num(4));
    }
}
