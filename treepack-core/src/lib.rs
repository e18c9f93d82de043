//! Square packing of tree-shaped polygons: exact overlap checks, exact
//! bounding-square scores, and a resumable parallel search over
//! placement-generator parameters.

pub mod collision;
pub mod error;
pub mod geometry;
pub mod score;
pub mod search;
pub mod submission;

pub use geometry::fixed::Fixed;
pub use geometry::polygon::Polygon;
pub use geometry::r2::R2;
pub use geometry::tree::{image_of, Placement};

pub use collision::{check_no_overlap, find_overlap, has_illegal_overlap};
pub use score::{score_group, score_submission, Score};
pub use search::{Config, Generator, SearchEngine, SearchOptions, SearchSpace, SearchSummary, Signature};
pub use submission::{Group, Submission};

/// Parse a log level string into LevelFilter.
pub fn parse_log_level(level: Option<&str>) -> log::LevelFilter {
    match level {
        Some("error") => log::LevelFilter::Error,
        Some("warn") => log::LevelFilter::Warn,
        Some("info") | Some("") | None => log::LevelFilter::Info,
        Some("debug") => log::LevelFilter::Debug,
        Some("trace") => log::LevelFilter::Trace,
        Some(level) => panic!("invalid log level: {}", level),
    }
}
