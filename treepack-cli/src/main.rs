//! CLI for tree packings.
//!
//! Provides:
//! - Scoring a submission CSV
//! - Generating a submission from one of the reference layouts
//! - Resumable parallel search over staggered-lattice parameters

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};

use treepack_core::{
    parse_log_level,
    score_submission,
    search::{results::ResultsLog, Grid, Hex, Row, StaggeredLattice},
    Config, SearchEngine, SearchOptions, SearchSpace, Submission,
};

#[derive(Parser)]
#[command(name = "treepack")]
#[command(about = "Score and search square packings of trees", long_about = None)]
struct Cli {
    /// Log level
    #[arg(long, global = true, value_parser = ["error", "warn", "info", "debug", "trace"])]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search staggered-lattice configs, skipping any already in the results log
    Search {
        /// Results log (CSV); created if missing, appended to otherwise
        #[arg(short, long)]
        results: PathBuf,

        /// Search space (JSON); defaults to the coarse lattice sweep
        #[arg(short, long)]
        space: Option<PathBuf>,

        /// Worker threads
        #[arg(short, long, default_value = "12")]
        workers: usize,

        /// Leaderboard size
        #[arg(short = 'k', long, default_value = "20")]
        top_k: usize,

        /// Log progress every this many completed configs
        #[arg(short, long, default_value = "25")]
        log_every: usize,

        /// Largest group size
        #[arg(short = 'n', long, default_value = "200")]
        max_n: usize,
    },

    /// Print the total score of a submission CSV
    Score {
        /// Submission CSV (id,x,y,deg)
        submission: PathBuf,
    },

    /// Write a submission CSV from a reference layout
    Generate {
        #[arg(short, long, value_enum)]
        layout: Layout,

        /// Generator config (JSON object of parameters)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output CSV
        #[arg(short, long)]
        out: PathBuf,

        /// Largest group size
        #[arg(short = 'n', long, default_value = "200")]
        max_n: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Layout {
    Row,
    Grid,
    Hex,
    Lattice,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn search(results: PathBuf, space: Option<PathBuf>, options: SearchOptions) -> Result<()> {
    let space = match space {
        Some(path) => read_json::<SearchSpace>(&path)?,
        None => SearchSpace::coarse(),
    };
    let configs = space.enumerate();
    info!("Total configs generated: {}", configs.len());

    let engine = SearchEngine::new(StaggeredLattice, ResultsLog::new(results), options);
    let summary = engine.run(configs)?;

    println!("Top results:");
    for entry in summary.leaderboard.iter().take(5) {
        println!("  Score {:.6} -> {}", entry.score, entry.config.canonical_json());
    }
    Ok(())
}

fn score(path: PathBuf) -> Result<()> {
    let submission = Submission::read_csv(&path)?;
    if !submission.is_complete(200) {
        warn!("{} has {} groups, not 1..=200", path.display(), submission.groups.len());
    }
    let total = score_submission(&submission)?;
    println!("{}", total);
    Ok(())
}

fn generate(layout: Layout, config: Option<PathBuf>, out: PathBuf, max_n: usize) -> Result<()> {
    let config: Config = match config {
        Some(path) => read_json(&path)?,
        None => Config::new(),
    };
    let submission = match layout {
        Layout::Row => Submission::generate(&Row, &config, max_n),
        Layout::Grid => Submission::generate(&Grid, &config, max_n),
        Layout::Hex => Submission::generate(&Hex, &config, max_n),
        Layout::Lattice => Submission::generate(&StaggeredLattice, &config, max_n),
    }
    .with_context(|| format!("generating {:?} layout", layout))?;
    submission.write_csv(&out)?;
    match score_submission(&submission) {
        Ok(total) => println!("{}", total),
        Err(overlap) => warn!("{} is not a valid packing: {}", out.display(), overlap),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(parse_log_level(cli.log_level.as_deref()))
        .parse_default_env()
        .init();
    debug!("treepack {} ({})", env!("CARGO_PKG_VERSION"), env!("TREEPACK_BUILD_SHA"));

    match cli.command {
        Commands::Search { results, space, workers, top_k, log_every, max_n } => {
            search(results, space, SearchOptions { workers, top_k, log_every, max_n })
        }
        Commands::Score { submission } => score(submission),
        Commands::Generate { layout, config, out, max_n } => generate(layout, config, out, max_n),
    }
}
