//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a ratio into a whole percentage, returning 0 for non-finite or
/// negative values.
#[must_use]
pub fn floor_ratio_to_percent(ratio: f64) -> u32 {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    let scaled = (ratio * 100.0).floor();
    cast::<f64, u32>(scaled).unwrap_or(u32::MAX)
}

/// Saturate a collection length into a u32 counter.
#[must_use]
pub fn count_to_u32(value: usize) -> u32 {
    cast::<usize, u32>(value).unwrap_or(u32::MAX)
}

/// Integer ceiling division; returns 0 when the divisor is 0.
#[must_use]
pub const fn ceil_div(value: usize, divisor: usize) -> usize {
    if divisor == 0 {
        return 0;
    }
    value.div_ceil(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_floors_instead_of_rounding() {
        assert_eq!(floor_ratio_to_percent(0.3), 30);
        assert_eq!(floor_ratio_to_percent(1.4), 140);
        assert_eq!(floor_ratio_to_percent(0.999), 99);
    }

    #[test]
    fn percent_handles_degenerate_values() {
        assert_eq!(floor_ratio_to_percent(f64::NAN), 0);
        assert_eq!(floor_ratio_to_percent(f64::INFINITY), 0);
        assert_eq!(floor_ratio_to_percent(-0.5), 0);
        assert_eq!(floor_ratio_to_percent(0.0), 0);
    }

    #[test]
    fn counts_saturate_instead_of_wrapping() {
        assert_eq!(count_to_u32(7), 7);
        assert_eq!(count_to_u32(usize::MAX), u32::MAX);
    }

    #[test]
    fn ceil_div_covers_boundaries() {
        assert_eq!(ceil_div(9, 4), 3);
        assert_eq!(ceil_div(8, 4), 2);
        assert_eq!(ceil_div(1, 4), 1);
        assert_eq!(ceil_div(0, 4), 0);
        assert_eq!(ceil_div(5, 0), 0);
    }
}
