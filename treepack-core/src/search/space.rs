use std::collections::BTreeMap;

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use super::config::{Config, Param};

/// Config key holding the per-row rotation cycle.
pub const ROTATIONS_KEY: &str = "rots";

/// Values for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Axis {
    /// `start, start + step, …` up to and including `stop`, each rounded to 6 decimals.
    Range { start: f64, stop: f64, step: f64 },
    Values(Vec<Param>),
}

impl Axis {
    pub fn values(&self) -> Vec<Param> {
        match self {
            Axis::Range { start, stop, step } => frange(*start, *stop, *step).into_iter().map(Param::from).collect(),
            Axis::Values(values) => values.clone(),
        }
    }
}

/// Inclusive float range. The running value accumulates `step` and each
/// emitted value is rounded to 6 decimals; `stop` is admitted with 1e-12 slack.
pub fn frange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if !(step > 0.0) || !start.is_finite() || !stop.is_finite() {
        return out;
    }
    let mut x = start;
    while x <= stop + 1e-12 {
        out.push(round6(x));
        let next = x + step;
        if next == x {
            // step below the spacing of floats at x
            break;
        }
        x = next;
    }
    out
}

fn round6(x: f64) -> f64 {
    format!("{:.6}", x).parse().unwrap_or(x)
}

/// Named axes plus rotation cycles; enumerates the full Cartesian product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    #[serde(default)]
    pub axes: BTreeMap<String, Axis>,
    /// Each entry is one rotation cycle, stored under [`ROTATIONS_KEY`].
    #[serde(default)]
    pub rotations: Vec<Vec<f64>>,
}

impl SearchSpace {
    /// Coarse staggered-lattice sweep: 642,978 configs.
    pub fn coarse() -> Self {
        let values = |vs: &[f64]| Axis::Values(vs.iter().copied().map(Param::from).collect());
        let biases = [-0.02, 0.0, 0.02];
        let axes = [
            ("dx", Axis::Range { start: 0.67, stop: 0.73, step: 0.003 }),
            ("dy", Axis::Range { start: 0.79, stop: 0.85, step: 0.003 }),
            ("offset", values(&[0.45, 0.5, 0.55])),
            ("cbx", values(&biases)),
            ("cby", values(&biases)),
            ("odd_even", Axis::Values(vec![Param::Bool(false), Param::Bool(true)])),
            ("dxr", values(&[1.0, 0.95, 1.05])),
            ("dyr", values(&[1.0, 0.98, 1.02])),
        ]
        .into_iter()
        .map(|(name, axis)| (name.to_string(), axis))
        .collect();
        SearchSpace {
            axes,
            rotations: vec![vec![5.0, 185.0], vec![0.0, 90.0, 180.0, 270.0], vec![330.0, 150.0]],
        }
    }

    fn columns(&self) -> Vec<(String, Vec<Param>)> {
        let mut columns: Vec<(String, Vec<Param>)> =
            self.axes.iter().map(|(name, axis)| (name.clone(), axis.values())).collect();
        if !self.rotations.is_empty() {
            let cycles = self.rotations.iter().cloned().map(Param::from).collect();
            columns.push((ROTATIONS_KEY.to_string(), cycles));
        }
        columns
    }

    /// Number of configs [`SearchSpace::enumerate`] yields.
    pub fn len(&self) -> usize {
        let columns = self.columns();
        if columns.is_empty() {
            0
        } else {
            columns.iter().map(|(_, values)| values.len()).product()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination of axis values. No axes means no configs.
    pub fn enumerate(&self) -> Vec<Config> {
        let columns = self.columns();
        if columns.is_empty() {
            return Vec::new();
        }
        let configs: Vec<Config> = columns
            .iter()
            .map(|(_, values)| values.iter())
            .multi_cartesian_product()
            .map(|combo| {
                columns
                    .iter()
                    .map(|(name, _)| name.clone())
                    .zip(combo.into_iter().cloned())
                    .collect()
            })
            .collect();
        debug!("enumerated {} configs over {} axes", configs.len(), columns.len());
        configs
    }
}
