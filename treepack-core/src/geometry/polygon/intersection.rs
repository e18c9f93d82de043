use std::{cmp::Ordering, iter::once};

use log::trace;

use crate::geometry::{bbox::BBox, exact::orient, r2::R2};

use super::{Location, Polygon};

/// True if the segments cross at a single point interior to both.
///
/// Touching at an endpoint, or running along each other, is not a crossing.
pub fn segments_cross(a0: &R2<i128>, a1: &R2<i128>, b0: &R2<i128>, b1: &R2<i128>) -> bool {
    let o1 = orient(a0, a1, b0);
    let o2 = orient(a0, a1, b1);
    if o1 == Ordering::Equal || o2 == Ordering::Equal || o1 == o2 {
        return false;
    }
    let o3 = orient(b0, b1, a0);
    let o4 = orient(b0, b1, a1);
    o3 != Ordering::Equal && o4 != Ordering::Equal && o3 != o4
}

/// For `p` collinear with `a → b`: true if `p` lies strictly between the endpoints.
fn strictly_between(a: &R2<i128>, b: &R2<i128>, p: &R2<i128>) -> bool {
    if a.x != b.x {
        a.x.min(b.x) < p.x && p.x < a.x.max(b.x)
    } else {
        a.y.min(b.y) < p.y && p.y < a.y.max(b.y)
    }
}

/// Monotone key for points on the line `a → b`, increasing in the direction of travel.
fn along(a: &R2<i128>, b: &R2<i128>, p: &R2<i128>) -> i128 {
    if a.x != b.x {
        (b.x - a.x).signum() * p.x
    } else {
        (b.y - a.y).signum() * p.y
    }
}

/// For collinear direction vectors: true if they point the same way.
fn same_direction(u: &R2<i128>, v: &R2<i128>) -> bool {
    if u.x != 0 {
        u.x.signum() == v.x.signum()
    } else {
        u.y.signum() == v.y.signum()
    }
}

fn segment_bbox(a: &R2<i128>, b: &R2<i128>) -> BBox {
    BBox {
        min: R2 { x: a.x.min(b.x), y: a.y.min(b.y) },
        max: R2 { x: a.x.max(b.x), y: a.y.max(b.y) },
    }
}

impl Polygon {
    /// True if the interiors of the two polygons intersect, i.e. the overlap
    /// has positive area. Polygons that only share edges or vertices do not
    /// overlap.
    pub fn interiors_overlap(&self, other: &Polygon) -> bool {
        if !self.bbox().intersects(other.bbox()) {
            return false;
        }
        for (a0, a1) in self.edges() {
            if !segment_bbox(a0, a1).intersects(other.bbox()) {
                continue;
            }
            for (b0, b1) in other.edges() {
                if segments_cross(a0, a1, b0, b1) {
                    trace!("proper crossing: {}-{} x {}-{}", a0, a1, b0, b1);
                    return true;
                }
            }
        }
        self.boundary_enters(other) || other.boundary_enters(self)
    }

    /// Assuming no proper edge crossings: true if part of this polygon's
    /// boundary lies in `other`'s interior, or runs along `other`'s boundary
    /// with both interiors on the same side.
    ///
    /// Each edge is split at the vertices of `other` lying on it. Every piece
    /// is then entirely inside, outside, or on the boundary of `other`, so its
    /// midpoint classifies it.
    fn boundary_enters(&self, other: &Polygon) -> bool {
        let same_orientation = self.orientation() == other.orientation();
        for (a, b) in self.edges() {
            if !segment_bbox(a, b).intersects(other.bbox()) {
                continue;
            }
            let mut stops: Vec<R2<i128>> = other
                .vertices()
                .iter()
                .filter(|v| orient(a, b, v) == Ordering::Equal && strictly_between(a, b, v))
                .copied()
                .collect();
            stops.sort_by_key(|v| along(a, b, v));
            stops.dedup();

            let direction = *b - *a;
            let mut prev = *a;
            for stop in stops.into_iter().chain(once(*b)) {
                let mid2 = prev + stop;
                match other.locate(&mid2, 2) {
                    Location::Inside => {
                        trace!("piece {}-{} inside {}", prev, stop, other);
                        return true;
                    }
                    Location::Outside => {}
                    Location::Boundary(i) => {
                        let (c, d) = other.edge(i);
                        if same_direction(&direction, &(*d - *c)) == same_orientation {
                            trace!("piece {}-{} shared with interiors on one side", prev, stop);
                            return true;
                        }
                    }
                }
                prev = stop;
            }
        }
        false
    }
}
