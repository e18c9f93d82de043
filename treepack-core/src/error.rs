use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FixedError {
    #[error("Invalid decimal: {0:?}")]
    Parse(String),

    #[error("Decimal out of range: {0}")]
    OutOfRange(String),

    #[error("Non-finite value: {0}")]
    NotFinite(f64),
}

/// Two trees in one group overlap with positive area.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Overlap detected in group {group}: trees {first} and {second}")]
pub struct OverlapDetected {
    pub group: usize,
    pub first: usize,
    pub second: usize,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GeneratorFault {
    #[error("Generator returned {got} placements for group {n}")]
    WrongCount { n: usize, got: usize },

    #[error("Missing config parameter {0:?}")]
    MissingParam(String),

    #[error("Config parameter {name:?} is not a {expected}")]
    ParamType { name: String, expected: &'static str },

    #[error("Config parameter {name:?} is invalid: {reason}")]
    InvalidParam { name: String, reason: String },

    #[error(transparent)]
    InvalidValue(#[from] FixedError),
}

/// The results log can't be read or appended to. Fatal for a search run.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceFault {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },

    #[error("Results log {path:?} has no {column:?} column")]
    MissingColumn { path: PathBuf, column: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] polars::prelude::PolarsError),

    #[error("Missing column {0:?}")]
    MissingColumn(String),

    #[error("Row {row}: empty {column:?}")]
    EmptyCell { row: usize, column: String },

    #[error("Invalid tree id {0:?}, expected \"NNN_i\"")]
    BadId(String),

    #[error("Tree {id}: {source}")]
    Value {
        id: String,
        #[source]
        source: FixedError,
    },

    #[error("Group {n} has trees {indices:?}, expected 0..{n}")]
    GroupShape { n: usize, indices: Vec<usize> },
}

/// Why one config produced no score. Contained at the task boundary.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TaskFault {
    #[error(transparent)]
    Overlap(#[from] OverlapDetected),

    #[error(transparent)]
    Generator(#[from] GeneratorFault),

    #[error("Worker panicked: {0}")]
    Panicked(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Persistence(#[from] PersistenceFault),

    #[error("Failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
