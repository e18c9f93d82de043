//! Exact sign predicates on scaled-integer coordinates.
//!
//! Products are taken in `i128` when they fit and in `BigInt` otherwise, so
//! the returned signs are always exact.

use std::cmp::Ordering;

use num_bigint::BigInt;

use super::r2::R2;

/// Sign of the 2-D cross product `a × b = ax·by − ay·bx`.
pub fn cross_sign(ax: i128, ay: i128, bx: i128, by: i128) -> Ordering {
    match (ax.checked_mul(by), ay.checked_mul(bx)) {
        (Some(l), Some(r)) => l.cmp(&r),
        _ => (BigInt::from(ax) * BigInt::from(by)).cmp(&(BigInt::from(ay) * BigInt::from(bx))),
    }
}

/// Orientation of `c` relative to the directed line `a → b`.
///
/// `Greater` means `c` is to the left (counter-clockwise turn), `Less` to the
/// right, `Equal` collinear.
pub fn orient(a: &R2<i128>, b: &R2<i128>, c: &R2<i128>) -> Ordering {
    cross_sign(b.x - a.x, b.y - a.y, c.x - a.x, c.y - a.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn p(x: i128, y: i128) -> R2<i128> {
        R2 { x, y }
    }

    #[test]
    fn orientation_signs() {
        assert_eq!(orient(&p(0, 0), &p(10, 0), &p(5, 1)), Ordering::Greater);
        assert_eq!(orient(&p(0, 0), &p(10, 0), &p(5, -1)), Ordering::Less);
        assert_eq!(orient(&p(0, 0), &p(10, 0), &p(20, 0)), Ordering::Equal);
    }

    #[test]
    fn overflowing_products_stay_exact() {
        let big = 1i128 << 100;
        // big·(big+1) vs (big+1)·big: equal, but both overflow i128
        assert_eq!(cross_sign(big, big + 1, big, big + 1), Ordering::Equal);
        assert_eq!(cross_sign(big, big, big - 1, big), Ordering::Greater);
        assert_eq!(cross_sign(big, big, big, big - 1), Ordering::Less);
    }
}
