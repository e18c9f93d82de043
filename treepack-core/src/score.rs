//! Bounding-square scoring of groups and whole submissions.
//!
//! A group of `n` trees contributes `(side / 10^18)² / n`, where `side` is
//! the larger dimension of the union bounding box of its images. Scores
//! are exact rationals, so sums over 200 groups lose nothing and compare
//! exactly.

use std::{
    fmt::{self, Display, Formatter},
    iter::Sum,
    ops::Add,
};

use log::debug;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::{
    collision::check_no_overlap,
    error::OverlapDetected,
    geometry::{bbox::BBox, fixed::SCALE, polygon::Polygon, tree::image_of},
    submission::{Group, Submission},
};

/// Fractional digits used when a score is rendered without an explicit precision.
pub const DEFAULT_DIGITS: usize = 24;

/// Packing cost; lower is better.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(BigRational);

impl Score {
    pub fn zero() -> Score {
        Score(BigRational::zero())
    }

    pub fn ratio(&self) -> &BigRational {
        &self.0
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Decimal rendering with `digits` fractional digits, rounded half away from zero.
    pub fn to_decimal(&self, digits: usize) -> String {
        let pow = BigInt::from(10u32).pow(digits as u32);
        let numer = self.0.numer().abs() * &pow * 2 + self.0.denom();
        let q: BigInt = numer / (self.0.denom() * 2);
        let sign = if self.0.is_negative() && !q.is_zero() { "-" } else { "" };
        if digits == 0 {
            return format!("{}{}", sign, q);
        }
        let whole = &q / &pow;
        let frac = (&q % &pow).to_string();
        format!("{}{}.{:0>width$}", sign, whole, frac, width = digits)
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(DEFAULT_DIGITS);
        f.write_str(&self.to_decimal(digits))
    }
}

impl Add for Score {
    type Output = Score;
    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Score {
        iter.fold(Score::zero(), |a, b| a + b)
    }
}

/// Side of the smallest axis-aligned square enclosing all images (0 for none).
pub fn bounding_side(images: &[Polygon]) -> i128 {
    images
        .iter()
        .map(|p| *p.bbox())
        .reduce(|a, b| a.union(&b))
        .as_ref()
        .map_or(0, BBox::square_side)
}

/// `(side / SCALE)² / n`.
pub fn contribution(side: i128, n: usize) -> Score {
    if n == 0 {
        return Score::zero();
    }
    let side = BigInt::from(side);
    let scale = BigInt::from(SCALE);
    Score(BigRational::new(&side * &side, &scale * &scale * BigInt::from(n)))
}

/// Score one group, failing if any two of its trees overlap.
pub fn score_group(group: &Group) -> Result<Score, OverlapDetected> {
    let images: Vec<Polygon> = group.placements.iter().map(image_of).collect();
    check_no_overlap(group.n, &images)?;
    let side = bounding_side(&images);
    let score = contribution(side, images.len());
    debug!("group {}: side {} -> {:.12}", group.n, side, score);
    Ok(score)
}

/// Sum of group scores; the first overlapping group invalidates the whole submission.
pub fn score_submission(submission: &Submission) -> Result<Score, OverlapDetected> {
    submission.groups.iter().map(score_group).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{polygon::Transform, tree::Placement};
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
    use test_log::test;

    fn group(n: usize, placements: &[(&str, &str, &str)]) -> Group {
        Group::new(
            n,
            placements.iter().map(|(x, y, d)| Placement::parse(x, y, d).unwrap()).collect(),
        )
    }

    fn ratio(n: i64, d: i64) -> Score {
        Score(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    #[test]
    fn single_tree_at_origin() {
        // local outline is 0.7 wide, 1.0 tall
        let score = score_group(&group(1, &[("0", "0", "0")])).unwrap();
        assert_eq!(score, ratio(1, 1));
        assert_eq!(score.to_string(), "1.000000000000000000000000");
    }

    #[test]
    fn single_tree_rotated() {
        // lying on its side: 1.0 wide, 0.7 tall
        assert_eq!(score_group(&group(1, &[("3", "4", "90")])).unwrap(), ratio(1, 1));
        // 45° pulls the tip in: both extents are about 0.81
        let tilted = score_group(&group(1, &[("0", "0", "45")])).unwrap();
        assert!(tilted < ratio(1, 1));
        approx::assert_relative_eq!(tilted.to_f64(), 0.813f64.powi(2), epsilon = 1e-2);
    }

    #[test]
    fn two_spaced_trees() {
        // x from -0.35 to 2.35, y from -0.2 to 0.8: side 2.7
        let score = score_group(&group(2, &[("0", "0", "0"), ("2", "0", "0")])).unwrap();
        assert_eq!(score, ratio(729, 200));
        approx::assert_relative_eq!(score.to_f64(), 3.645);
    }

    #[test]
    fn overlap_fails_group() {
        let err = score_group(&group(2, &[("0", "0", "0"), ("0", "0", "0")])).unwrap_err();
        assert_eq!(err, OverlapDetected { group: 2, first: 0, second: 1 });
    }

    #[test]
    fn touching_trees_score() {
        let score = score_group(&group(2, &[("0", "0", "0"), ("0.7", "0", "0")])).unwrap();
        // 1.4 wide, 1.0 tall
        assert_eq!(score, ratio(196, 200));
    }

    #[test]
    fn row_order_invariance() {
        let placements: Vec<Placement> = (0..12)
            .map(|i| {
                let (r, c) = (i / 4, i % 4);
                Placement::from_f64(c as f64 * 2.0, r as f64 * 2.0, (i * 37 % 360) as f64).unwrap()
            })
            .collect();
        let expected = score_group(&Group::new(12, placements.clone())).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            let mut shuffled = placements.clone();
            shuffled.shuffle(&mut rng);
            assert_eq!(score_group(&Group::new(12, shuffled)).unwrap(), expected);
        }
    }

    #[test]
    fn scaling_multiplies_by_square() {
        let placements = [("0", "0", "0"), ("1.1", "0.3", "30"), ("0.4", "1.6", "200")];
        let images: Vec<Polygon> = placements
            .iter()
            .map(|(x, y, d)| image_of(&Placement::parse(x, y, d).unwrap()))
            .collect();
        let side = bounding_side(&images);
        let scaled: Vec<Polygon> = images.iter().map(|p| p.transform(&Transform::Scale(3))).collect();
        assert_eq!(bounding_side(&scaled), 3 * side);
        let base = contribution(side, 3);
        let big = contribution(bounding_side(&scaled), 3);
        assert_eq!(big.ratio(), &(base.ratio() * BigRational::from_integer(9.into())));
    }

    #[test]
    fn submission_sum_and_failure() {
        let ok = Submission::new(vec![
            group(1, &[("0", "0", "0")]),
            group(2, &[("0", "0", "0"), ("2", "0", "0")]),
        ]);
        assert_eq!(score_submission(&ok).unwrap(), ratio(929, 200));

        let bad = Submission::new(vec![
            group(1, &[("0", "0", "0")]),
            group(2, &[("0", "0", "0"), ("0.1", "0", "0")]),
        ]);
        assert_eq!(score_submission(&bad).unwrap_err().group, 2);
    }

    #[test]
    fn decimal_rendering() {
        assert_eq!(ratio(2, 3).to_decimal(5), "0.66667");
        assert_eq!(ratio(-2, 3).to_decimal(2), "-0.67");
        assert_eq!(ratio(1, 8).to_decimal(2), "0.13");
        assert_eq!(ratio(15, 2).to_decimal(0), "8");
        assert_eq!(format!("{:.3}", ratio(729, 200)), "3.645");
    }

    #[test]
    fn close_scores_stay_distinct() {
        // differ only in the 30th significant digit
        let a = contribution(SCALE * 100, 1);
        let b = contribution(SCALE * 100 + 1, 1);
        assert!(a < b);
        assert_ne!(a.to_decimal(40), b.to_decimal(40));
    }
}
