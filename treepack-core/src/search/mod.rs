//! Parameter search over placement-generator configs.
//!
//! A [`SearchSpace`] enumerates [`Config`]s; the [`SearchEngine`] drops
//! those whose [`Signature`] is already in the [`ResultsLog`], evaluates
//! the rest on a worker pool, logs every outcome and keeps a
//! [`Leaderboard`] of the best.

pub mod config;
pub mod engine;
pub mod generators;
pub mod leaderboard;
pub mod progress;
pub mod results;
pub mod space;

pub use config::{Config, Param, Signature};
pub use engine::{evaluate, evaluate_contained, EngineState, SearchEngine, SearchOptions, SearchSummary};
pub use generators::{Generator, Grid, Hex, Row, StaggeredLattice};
pub use leaderboard::{Entry, Leaderboard};
pub use progress::Progress;
pub use results::{EvaluationRecord, ResultsLog};
pub use space::{frange, Axis, SearchSpace, ROTATIONS_KEY};
