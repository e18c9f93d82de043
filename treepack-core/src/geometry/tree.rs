//! The fixed tree outline and its images under placements.

use serde::{Deserialize, Serialize};

use crate::error::FixedError;

use super::{
    fixed::{Fixed, SCALE},
    polygon::{Polygon, Rotation, Transform},
    r2::R2,
};

/// Outline coordinates are given in these units (ten-thousandths).
pub const OUTLINE_UNIT: i128 = 10_000;

/// 15-vertex outline, clockwise from the tip: three tiers and a trunk.
pub const TREE_OUTLINE: [(i128, i128); 15] = [
    // Tip
    (0, 8000),
    // Right side, top to bottom tier
    (1250, 5000),
    (625, 5000),
    (2000, 2500),
    (1000, 2500),
    (3500, 0),
    // Trunk
    (750, 0),
    (750, -2000),
    (-750, -2000),
    (-750, 0),
    // Left side, bottom to top tier
    (-3500, 0),
    (-1000, 2500),
    (-2000, 2500),
    (-625, 5000),
    (-1250, 5000),
];

/// Position and rotation of one tree.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    #[serde(with = "fixed_str")]
    pub x: Fixed,
    #[serde(with = "fixed_str")]
    pub y: Fixed,
    #[serde(with = "fixed_str")]
    pub deg: Fixed,
}

impl Placement {
    pub fn new(x: Fixed, y: Fixed, deg: Fixed) -> Self {
        Placement { x, y, deg }
    }

    /// Convert floating-point generator output through its shortest decimal form.
    pub fn from_f64(x: f64, y: f64, deg: f64) -> Result<Self, FixedError> {
        Ok(Placement {
            x: x.try_into()?,
            y: y.try_into()?,
            deg: deg.try_into()?,
        })
    }

    /// Parse decimal strings, e.g. `("0.35", "-1", "45")`.
    pub fn parse(x: &str, y: &str, deg: &str) -> Result<Self, FixedError> {
        Ok(Placement { x: x.parse()?, y: y.parse()?, deg: deg.parse()? })
    }
}

/// The outline in the scaled-integer domain, before rotation and translation.
pub fn local_outline() -> Polygon {
    let vertices = TREE_OUTLINE
        .iter()
        .map(|&(x, y)| R2 { x, y })
        .collect();
    Polygon::new(vertices).transform(&Transform::Scale(SCALE / OUTLINE_UNIT))
}

/// Image of the tree under `placement`: rotate about the origin by
/// `placement.deg`, then translate by `(x, y)`, all at scale 10^18.
pub fn image_of(placement: &Placement) -> Polygon {
    local_outline().transform_all(&[
        Transform::Rotate(Rotation::from_degrees(placement.deg)),
        Transform::Translate(R2 { x: placement.x.raw(), y: placement.y.raw() }),
    ])
}

mod fixed_str {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::geometry::fixed::Fixed;

    pub fn serialize<S: Serializer>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fixed, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
