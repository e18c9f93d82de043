//! Groups of placements and the submission CSV (`id,x,y,deg`).
//!
//! Tree ids are `{n:03}_{i}`; coordinate cells carry an `s` marker
//! (`s0.35`) so downstream readers keep them as strings. The reader
//! accepts cells with or without the marker.

use std::{collections::BTreeMap, fs::File, path::Path};

use log::{debug, info};
use polars::prelude::*;

use crate::{
    error::{GeneratorFault, SubmissionError},
    geometry::{fixed::Fixed, tree::Placement},
    search::{Config, Generator},
};

const COLUMNS: [&str; 4] = ["id", "x", "y", "deg"];
const MARKER: char = 's';

/// The `n` placements packed together for group size `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub n: usize,
    pub placements: Vec<Placement>,
}

impl Group {
    pub fn new(n: usize, placements: Vec<Placement>) -> Self {
        Group { n, placements }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub groups: Vec<Group>,
}

pub fn tree_id(n: usize, i: usize) -> String {
    format!("{:03}_{}", n, i)
}

fn parse_id(id: &str) -> Option<(usize, usize)> {
    let (n, i) = id.split_once('_')?;
    Some((n.parse().ok()?, i.parse().ok()?))
}

fn marked(value: &Fixed) -> String {
    format!("{}{}", MARKER, value)
}

fn unmarked(cell: &str) -> &str {
    cell.strip_prefix(MARKER).unwrap_or(cell)
}

fn str_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked, SubmissionError> {
    let series = df
        .iter()
        .find(|s| s.name().as_str() == name)
        .ok_or_else(|| SubmissionError::MissingColumn(name.to_string()))?;
    Ok(series.str()?)
}

fn cell<'a>(value: Option<&'a str>, row: usize, column: &str) -> Result<&'a str, SubmissionError> {
    value.ok_or_else(|| SubmissionError::EmptyCell { row, column: column.to_string() })
}

impl Submission {
    pub fn new(groups: Vec<Group>) -> Self {
        Submission { groups }
    }

    /// Run `generator` for every group size `1..=max_n`.
    pub fn generate<G: Generator + ?Sized>(
        generator: &G,
        config: &Config,
        max_n: usize,
    ) -> Result<Self, GeneratorFault> {
        let groups = (1..=max_n)
            .map(|n| {
                let placements = generator.generate(n, config)?;
                if placements.len() != n {
                    return Err(GeneratorFault::WrongCount { n, got: placements.len() });
                }
                Ok(Group::new(n, placements))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Submission { groups })
    }

    pub fn num_trees(&self) -> usize {
        self.groups.iter().map(|g| g.placements.len()).sum()
    }

    /// True if groups are exactly `1..=max_n`, in order.
    pub fn is_complete(&self, max_n: usize) -> bool {
        self.groups.len() == max_n && self.groups.iter().enumerate().all(|(k, g)| g.n == k + 1)
    }

    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<(), SubmissionError> {
        let path = path.as_ref();
        let mut cols: [Vec<String>; 4] = Default::default();
        for group in &self.groups {
            for (i, p) in group.placements.iter().enumerate() {
                cols[0].push(tree_id(group.n, i));
                cols[1].push(marked(&p.x));
                cols[2].push(marked(&p.y));
                cols[3].push(marked(&p.deg));
            }
        }
        let columns: Vec<Column> = COLUMNS
            .iter()
            .zip(cols)
            .map(|(name, col)| Column::new((*name).into(), col))
            .collect();
        let mut df = DataFrame::new(columns)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| SubmissionError::Io { path: dir.into(), source })?;
        }
        let mut file = File::create(path).map_err(|source| SubmissionError::Io { path: path.into(), source })?;
        CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
        info!("wrote {} trees in {} groups to {}", self.num_trees(), self.groups.len(), path.display());
        Ok(())
    }

    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self, SubmissionError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SubmissionError::Io {
                path: path.into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        // Every column as a string: values are parsed exactly, never through f64.
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()?;
        let (ids, xs, ys, degs) = (
            str_column(&df, "id")?,
            str_column(&df, "x")?,
            str_column(&df, "y")?,
            str_column(&df, "deg")?,
        );

        let mut by_n: BTreeMap<usize, Vec<(usize, Placement)>> = BTreeMap::new();
        let rows = ids.into_iter().zip(xs).zip(ys).zip(degs);
        for (row, (((id, x), y), deg)) in rows.enumerate() {
            let id = cell(id, row, "id")?;
            let (n, i) = parse_id(id).ok_or_else(|| SubmissionError::BadId(id.to_string()))?;
            let placement = Placement::parse(
                unmarked(cell(x, row, "x")?),
                unmarked(cell(y, row, "y")?),
                unmarked(cell(deg, row, "deg")?),
            )
            .map_err(|source| SubmissionError::Value { id: id.to_string(), source })?;
            by_n.entry(n).or_default().push((i, placement));
        }

        let groups = by_n
            .into_iter()
            .map(|(n, mut trees)| {
                trees.sort_by_key(|(i, _)| *i);
                if trees.iter().map(|(i, _)| *i).ne(0..n) {
                    return Err(SubmissionError::GroupShape { n, indices: trees.iter().map(|(i, _)| *i).collect() });
                }
                Ok(Group::new(n, trees.into_iter().map(|(_, p)| p).collect()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!("read {} groups from {}", groups.len(), path.display());
        Ok(Submission { groups })
    }
}
