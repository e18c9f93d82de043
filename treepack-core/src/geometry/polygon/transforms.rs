use num_bigint::BigInt;
use num_traits::ToPrimitive;

use crate::geometry::{
    fixed::{div_round, Fixed, SCALE},
    r2::R2,
};

use super::Polygon;

/// Rotation about the origin, with cosine and sine quantized to [`SCALE`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rotation {
    pub cos: i128,
    pub sin: i128,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation { cos: SCALE, sin: 0 };

    /// Exact for multiples of 90°; otherwise `f64` trig quantized to 18 digits.
    pub fn from_degrees(degrees: Fixed) -> Rotation {
        let reduced = degrees.rem_degrees();
        let quarter = 90 * SCALE;
        if reduced.raw() % quarter == 0 {
            return match reduced.raw() / quarter {
                0 => Rotation::IDENTITY,
                1 => Rotation { cos: 0, sin: SCALE },
                2 => Rotation { cos: -SCALE, sin: 0 },
                _ => Rotation { cos: 0, sin: -SCALE },
            };
        }
        let (sin, cos) = reduced.to_f64().to_radians().sin_cos();
        Rotation {
            cos: (cos * SCALE as f64).round() as i128,
            sin: (sin * SCALE as f64).round() as i128,
        }
    }

    pub fn apply(&self, p: &R2<i128>) -> R2<i128> {
        R2 {
            x: cross_div(p.x, self.cos, p.y, self.sin),
            y: cross_div(p.x, self.sin, -p.y, self.cos),
        }
    }
}

/// `(a·b − c·d) / SCALE`, rounded half away from zero.
fn cross_div(a: i128, b: i128, c: i128, d: i128) -> i128 {
    let exact = a
        .checked_mul(b)
        .zip(c.checked_mul(d))
        .and_then(|(l, r)| l.checked_sub(r));
    match exact {
        Some(n) => div_round(n, SCALE),
        None => {
            let n = BigInt::from(a) * b - BigInt::from(c) * d;
            let half = BigInt::from(SCALE / 2);
            let q = if n >= BigInt::from(0) {
                (n + half) / SCALE
            } else {
                (n - half) / SCALE
            };
            q.to_i128().expect("rotated coordinate fits in i128")
        }
    }
}

/// Affine steps applied to polygon images, in scaled-integer coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    Scale(i128),
    Rotate(Rotation),
    Translate(R2<i128>),
}

impl Polygon {
    pub fn transform(&self, transform: &Transform) -> Polygon {
        let vertices = match transform {
            Transform::Scale(k) => self.vertices().iter().map(|p| *p * *k).collect(),
            Transform::Rotate(r) => self.vertices().iter().map(|p| r.apply(p)).collect(),
            Transform::Translate(v) => self.vertices().iter().map(|p| *p + *v).collect(),
        };
        Polygon::new(vertices)
    }

    /// Apply `transforms` in order.
    pub fn transform_all(&self, transforms: &[Transform]) -> Polygon {
        transforms
            .iter()
            .fold(self.clone(), |polygon, t| polygon.transform(t))
    }
}
