use super::r2::R2;

/// Closed axis-aligned box in scaled-integer coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BBox {
    pub min: R2<i128>,
    pub max: R2<i128>,
}

impl BBox {
    /// Bounding box of a point set; `None` when empty.
    pub fn of_points<'a, I: IntoIterator<Item = &'a R2<i128>>>(points: I) -> Option<BBox> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(BBox { min: first, max: first }, |b, p| b.include(p)))
    }

    fn include(self, p: &R2<i128>) -> BBox {
        BBox {
            min: R2 { x: self.min.x.min(p.x), y: self.min.y.min(p.y) },
            max: R2 { x: self.max.x.max(p.x), y: self.max.y.max(p.y) },
        }
    }

    pub fn union(&self, other: &BBox) -> BBox {
        self.include(&other.min).include(&other.max)
    }

    /// Closed intersection test: boxes sharing only an edge or corner intersect.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn width(&self) -> i128 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i128 {
        self.max.y - self.min.y
    }

    /// Side of the smallest axis-aligned square containing this box.
    pub fn square_side(&self) -> i128 {
        self.width().max(self.height())
    }

    /// Doubled center, kept integral.
    pub fn center2(&self) -> R2<i128> {
        R2 { x: self.min.x + self.max.x, y: self.min.y + self.max.y }
    }
}
