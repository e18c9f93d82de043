mod intersection;
mod transforms;

pub use intersection::*;
pub use transforms::*;

use std::{
    cmp::Ordering,
    fmt::Display,
};

use super::{bbox::BBox, exact::orient, r2::R2};

/// Simple polygon with scaled-integer vertices.
///
/// The bounding box and winding direction are computed once at construction;
/// vertices are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<R2<i128>>,
    bbox: BBox,
    orientation: Ordering,
}

/// Where a point sits relative to a polygon.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Location {
    Inside,
    Outside,
    /// On the closed edge with this index (edge `i` runs from vertex `i` to `i + 1`).
    Boundary(usize),
}

impl Polygon {
    pub fn new(vertices: Vec<R2<i128>>) -> Self {
        assert!(vertices.len() >= 3, "Polygon must have at least 3 vertices");
        let bbox = BBox::of_points(&vertices).expect("non-empty vertex list");
        let orientation = winding(&vertices);
        Polygon { vertices, bbox, orientation }
    }

    pub fn vertices(&self) -> &[R2<i128>] {
        &self.vertices
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    /// `Greater` for counter-clockwise vertex order, `Less` for clockwise.
    pub fn orientation(&self) -> Ordering {
        self.orientation
    }

    pub fn edge(&self, i: usize) -> (&R2<i128>, &R2<i128>) {
        let n = self.vertices.len();
        (&self.vertices[i], &self.vertices[(i + 1) % n])
    }

    pub fn edges(&self) -> impl Iterator<Item = (&R2<i128>, &R2<i128>)> + '_ {
        (0..self.vertices.len()).map(move |i| self.edge(i))
    }

    /// Locate `p` against this polygon scaled by `k` about the origin.
    ///
    /// `k = 2` lets callers test segment midpoints (`a + b`) without leaving
    /// the integers.
    pub fn locate(&self, p: &R2<i128>, k: i128) -> Location {
        let mut winding = 0i32;
        for (i, (a, b)) in self.edges().enumerate() {
            let a = *a * k;
            let b = *b * k;
            let side = orient(&a, &b, p);
            if side == Ordering::Equal
                && a.x.min(b.x) <= p.x && p.x <= a.x.max(b.x)
                && a.y.min(b.y) <= p.y && p.y <= a.y.max(b.y)
            {
                return Location::Boundary(i);
            }
            if a.y <= p.y {
                if b.y > p.y && side == Ordering::Greater {
                    winding += 1;
                }
            } else if b.y <= p.y && side == Ordering::Less {
                winding -= 1;
            }
        }
        if winding != 0 { Location::Inside } else { Location::Outside }
    }
}

/// Orientation at the lowest-leftmost vertex, which is always convex.
fn winding(vertices: &[R2<i128>]) -> Ordering {
    let n = vertices.len();
    let (i, _) = vertices
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (v.y, v.x))
        .expect("non-empty vertex list");
    let prev = &vertices[(i + n - 1) % n];
    let next = &vertices[(i + 1) % n];
    orient(prev, &vertices[i], next)
}

impl Display for Polygon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verts: Vec<String> = self
            .vertices
            .iter()
            .map(|v| v.to_string())
            .collect();
        write!(f, "Polygon[{}]", verts.join(", "))
    }
}

#[cfg(test)]
mod tests;
