//! Shared arithmetic helpers for Stellarcade contracts.
#![no_std]

/// Constant for basis points divisor.
pub const BASIS_POINTS_DIVISOR: u32 = 10_000;

/// Returns `amount * bps / 10_000`, truncated toward zero.
///
/// `None` when `amount` is negative, `bps` exceeds 100%, or the product
/// overflows.
pub fn bps_share(amount: i128, bps: u32) -> Option<i128> {
    if amount < 0 || bps > BASIS_POINTS_DIVISOR {
        return None;
    }
    amount
        .checked_mul(bps as i128)
        .and_then(|v| v.checked_div(BASIS_POINTS_DIVISOR as i128))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_share_truncates_toward_zero() {
        assert_eq!(bps_share(30_000, 3_000), Some(9_000));
        assert_eq!(bps_share(10_001, 2_000), Some(2_000));
        assert_eq!(bps_share(3, 3_000), Some(0));
    }

    #[test]
    fn test_share_rejects_bad_input() {
        assert_eq!(bps_share(-1, 100), None);
        assert_eq!(bps_share(100, BASIS_POINTS_DIVISOR + 1), None);
        assert_eq!(bps_share(i128::MAX, 2), None);
    }

    #[test]
    fn test_full_and_zero_rate() {
        assert_eq!(bps_share(12_345, BASIS_POINTS_DIVISOR), Some(12_345));
        assert_eq!(bps_share(12_345, 0), Some(0));
    }
}
