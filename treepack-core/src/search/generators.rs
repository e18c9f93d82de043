//! Placement generators: deterministic layouts parameterized by a [`Config`].

use crate::{error::GeneratorFault, geometry::tree::Placement};

use super::config::Config;

/// Produces the `n` placements of group `n` for a config. Must be
/// deterministic; shared read-only across worker threads.
pub trait Generator: Send + Sync {
    fn generate(&self, n: usize, config: &Config) -> Result<Vec<Placement>, GeneratorFault>;
}

/// Rows of `cols = ⌈√n⌉` trees, centered on the origin.
#[derive(Debug, Clone, PartialEq)]
struct Lattice {
    dx: f64,
    dy: f64,
    /// Odd rows shift right by `offset` column spacings.
    offset: f64,
    cbx: f64,
    cby: f64,
    /// Odd rows scale their spacings by `dxr`/`dyr`.
    odd_even: bool,
    dxr: f64,
    dyr: f64,
    rots: Vec<f64>,
}

impl Lattice {
    fn placements(&self, n: usize) -> Result<Vec<Placement>, GeneratorFault> {
        if self.rots.is_empty() {
            return Err(GeneratorFault::InvalidParam {
                name: "rots".to_string(),
                reason: "empty rotation cycle".to_string(),
            });
        }
        if n == 0 {
            return Ok(vec![]);
        }
        let cols = (n as f64).sqrt().ceil() as usize;
        let rows = n.div_ceil(cols);
        let start_x = -((cols - 1) as f64) * self.dx / 2.0;
        let start_y = -((rows - 1) as f64) * self.dy / 2.0;

        let mut out = Vec::with_capacity(n);
        for r in 0..rows {
            let odd = r % 2 == 1;
            let (rdx, rdy) = if self.odd_even && odd {
                (self.dx * self.dxr, self.dy * self.dyr)
            } else {
                (self.dx, self.dy)
            };
            let xoff = if odd { rdx * self.offset } else { 0.0 };
            let deg = self.rots[r % self.rots.len()];
            for c in 0..cols {
                if out.len() >= n {
                    break;
                }
                let x = start_x + c as f64 * rdx + xoff + self.cbx;
                let y = start_y + r as f64 * rdy + self.cby;
                out.push(Placement::from_f64(x, y, deg)?);
            }
        }
        Ok(out)
    }
}

/// Staggered lattice over keys `dx, dy, offset, cbx, cby, odd_even, dxr, dyr, rots`, all required.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaggeredLattice;

impl Generator for StaggeredLattice {
    fn generate(&self, n: usize, config: &Config) -> Result<Vec<Placement>, GeneratorFault> {
        Lattice {
            dx: config.float("dx")?,
            dy: config.float("dy")?,
            offset: config.float("offset")?,
            cbx: config.float("cbx")?,
            cby: config.float("cby")?,
            odd_even: config.bool("odd_even")?,
            dxr: config.float("dxr")?,
            dyr: config.float("dyr")?,
            rots: config.floats("rots")?,
        }
        .placements(n)
    }
}

/// Axis-aligned grid, all upright. Overrides: `dx` (0.8), `dy` (1.1).
#[derive(Debug, Clone, Copy, Default)]
pub struct Grid;

impl Generator for Grid {
    fn generate(&self, n: usize, config: &Config) -> Result<Vec<Placement>, GeneratorFault> {
        Lattice {
            dx: config.float_or("dx", 0.8)?,
            dy: config.float_or("dy", 1.1)?,
            offset: 0.0,
            cbx: 0.0,
            cby: 0.0,
            odd_even: false,
            dxr: 1.0,
            dyr: 1.0,
            rots: vec![0.0],
        }
        .placements(n)
    }
}

/// Odd rows shifted half a column and rotated. Overrides: `dx` (0.71),
/// `dy` (0.81), `rots` ([0, 180]).
#[derive(Debug, Clone, Copy, Default)]
pub struct Hex;

impl Generator for Hex {
    fn generate(&self, n: usize, config: &Config) -> Result<Vec<Placement>, GeneratorFault> {
        Lattice {
            dx: config.float_or("dx", 0.71)?,
            dy: config.float_or("dy", 0.81)?,
            offset: 0.5,
            cbx: 0.0,
            cby: 0.0,
            odd_even: false,
            dxr: 1.0,
            dyr: 1.0,
            rots: config.floats_or("rots", &[0.0, 180.0])?,
        }
        .placements(n)
    }
}

/// All `n` trees upright on the x-axis, centered. Override: `spacing` (0.8).
#[derive(Debug, Clone, Copy, Default)]
pub struct Row;

impl Generator for Row {
    fn generate(&self, n: usize, config: &Config) -> Result<Vec<Placement>, GeneratorFault> {
        let spacing = config.float_or("spacing", 0.8)?;
        let start_x = -(n.saturating_sub(1) as f64) * spacing / 2.0;
        (0..n)
            .map(|i| Ok(Placement::from_f64(start_x + i as f64 * spacing, 0.0, 0.0)?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::has_illegal_overlap,
        geometry::{fixed::Fixed, tree::image_of},
    };
    use test_log::test;

    fn fixed(s: &str) -> Fixed {
        s.parse().unwrap()
    }

    fn lattice_config() -> Config {
        Config::new()
            .with("dx", 0.7)
            .with("dy", 0.8)
            .with("offset", 0.5)
            .with("cbx", 0.0)
            .with("cby", -0.02)
            .with("odd_even", true)
            .with("dxr", 1.05)
            .with("dyr", 0.98)
            .with("rots", vec![5.0, 185.0])
    }

    fn legal(placements: &[Placement]) -> bool {
        let images: Vec<_> = placements.iter().map(image_of).collect();
        !has_illegal_overlap(&images)
    }

    #[test]
    fn grid_layout() {
        let placements = Grid.generate(4, &Config::new()).unwrap();
        let expected = [("-0.4", "-0.55"), ("0.4", "-0.55"), ("-0.4", "0.55"), ("0.4", "0.55")];
        for (p, (x, y)) in placements.iter().zip(expected) {
            assert_eq!((p.x, p.y, p.deg), (fixed(x), fixed(y), Fixed::ZERO));
        }
        // 3 columns, last row partial
        assert_eq!(Grid.generate(7, &Config::new()).unwrap().len(), 7);
    }

    #[test]
    fn reference_layouts_are_legal() {
        for n in 1..=30 {
            assert!(legal(&Grid.generate(n, &Config::new()).unwrap()), "grid {}", n);
            assert!(legal(&Row.generate(n, &Config::new()).unwrap()), "row {}", n);
        }
    }

    #[test]
    fn row_layout() {
        let placements = Row.generate(3, &Config::new()).unwrap();
        let xs: Vec<Fixed> = placements.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![fixed("-0.8"), Fixed::ZERO, fixed("0.8")]);
        assert!(Row.generate(0, &Config::new()).unwrap().is_empty());
        let wide = Row.generate(2, &Config::new().with("spacing", 2.0)).unwrap();
        assert_eq!(wide[1].x, fixed("1"));
    }

    #[test]
    fn hex_alternates_rows() {
        let placements = Hex.generate(4, &Config::new()).unwrap();
        assert_eq!(placements[0].deg, Fixed::ZERO);
        assert_eq!(placements[2].deg, fixed("180"));
        // odd row shifted by half a column
        assert_eq!(placements[2].x - placements[0].x, fixed("0.355"));
    }

    #[test]
    fn staggered_lattice() {
        let config = lattice_config();
        for n in 1..=40 {
            assert_eq!(StaggeredLattice.generate(n, &config).unwrap().len(), n);
        }
        let placements = StaggeredLattice.generate(3, &config).unwrap();
        // 2x2 lattice, first row at start_y + cby
        assert_eq!(placements[0].x, fixed("-0.35"));
        // float arithmetic carries through, as the generator computes it
        assert_eq!(placements[0].y, fixed("-0.42000000000000004"));
        assert_eq!(placements[0].deg, fixed("5"));
        assert_eq!(placements[2].deg, fixed("185"));
        // odd row: spacing scaled by dxr, shifted by offset
        assert_eq!(placements[2].x, Placement::from_f64(-0.35 + 0.0 + 0.7 * 1.05 * 0.5, 0.0, 0.0).unwrap().x);
    }

    #[test]
    fn lattice_faults() {
        let missing = lattice_config();
        let mut partial = Config::new();
        for (k, v) in missing.iter().filter(|(k, _)| k.as_str() != "dyr") {
            partial.insert(k, v.clone());
        }
        assert_eq!(
            StaggeredLattice.generate(5, &partial),
            Err(GeneratorFault::MissingParam("dyr".into())),
        );
        let no_rots = lattice_config().with("rots", Vec::<f64>::new());
        assert!(matches!(
            StaggeredLattice.generate(5, &no_rots),
            Err(GeneratorFault::InvalidParam { .. }),
        ));
        let huge = lattice_config().with("dx", 1e12);
        assert!(matches!(
            StaggeredLattice.generate(5, &huge),
            Err(GeneratorFault::InvalidValue(_)),
        ));
    }
}
