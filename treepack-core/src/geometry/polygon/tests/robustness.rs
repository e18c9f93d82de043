//! Near-degenerate inputs: one-unit gaps and overlaps, and coordinates large
//! enough that orientation products leave `i128`.

use super::super::*;
use crate::geometry::r2::R2;
use test_log::test;

fn rect(x0: i128, y0: i128, x1: i128, y1: i128) -> Polygon {
    Polygon::new(vec![
        R2 { x: x0, y: y0 },
        R2 { x: x1, y: y0 },
        R2 { x: x1, y: y1 },
        R2 { x: x0, y: y1 },
    ])
}

const BIG: i128 = 1 << 80;

#[test]
fn test_one_unit_gap_and_overlap() {
    let a = rect(0, 0, BIG, BIG);
    assert!(!a.interiors_overlap(&rect(BIG + 1, 0, 2 * BIG, BIG)));
    assert!(!a.interiors_overlap(&rect(BIG, 0, 2 * BIG, BIG)));
    assert!(a.interiors_overlap(&rect(BIG - 1, 0, 2 * BIG, BIG)));
}

#[test]
fn test_slanted_sliver() {
    // triangles sharing the hypotenuse direction, offset by one unit
    let a = Polygon::new(vec![R2 { x: 0, y: 0 }, R2 { x: BIG, y: 0 }, R2 { x: 0, y: BIG }]);
    let touching = Polygon::new(vec![R2 { x: BIG, y: 0 }, R2 { x: BIG, y: BIG }, R2 { x: 0, y: BIG }]);
    assert!(!a.interiors_overlap(&touching));
    let sliver = Polygon::new(vec![
        R2 { x: BIG - 1, y: 0 },
        R2 { x: BIG, y: BIG },
        R2 { x: -1, y: BIG },
    ]);
    assert!(a.interiors_overlap(&sliver));
}

#[test]
fn test_huge_coordinates() {
    let base = 1i128 << 100;
    let a = rect(base, base, base + BIG, base + BIG);
    let b = rect(base + BIG, base, base + 2 * BIG, base + BIG);
    assert!(!a.interiors_overlap(&b));
    let c = rect(base + BIG / 2, base + BIG / 2, base + 2 * BIG, base + 2 * BIG);
    assert!(a.interiors_overlap(&c));
}
