//! Append-only CSV log of every evaluated config; the sole cross-run dedup record.

use std::{
    collections::HashSet,
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use log::{debug, info};
use polars::prelude::*;

use crate::{error::PersistenceFault, score::Score};

use super::config::{Config, Signature};

pub const SCORE_COL: &str = "score";
pub const SIGNATURE_COL: &str = "signature";

/// One attempted config and its outcome; `score` is `None` when evaluation failed.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    pub config: Config,
    pub signature: Signature,
    pub score: Option<Score>,
}

impl EvaluationRecord {
    pub fn new(config: Config, score: Option<Score>) -> Self {
        let signature = config.signature();
        EvaluationRecord { config, signature, score }
    }
}

#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ResultsLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io(&self, source: std::io::Error) -> PersistenceFault {
        PersistenceFault::Io { path: self.path.clone(), source }
    }

    fn csv(&self, source: PolarsError) -> PersistenceFault {
        PersistenceFault::Csv { path: self.path.clone(), source }
    }

    /// Nothing written yet: no file, or an empty one.
    fn is_blank(&self) -> Result<bool, PersistenceFault> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(self.io(e)),
        }
    }

    /// Signatures of every logged record, whatever its outcome.
    pub fn load_signatures(&self) -> Result<HashSet<Signature>, PersistenceFault> {
        if self.is_blank()? {
            debug!("no results log at {}", self.path.display());
            return Ok(HashSet::new());
        }
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(self.path.clone()))
            .and_then(|reader| reader.finish())
            .map_err(|e| self.csv(e))?;
        let column = df
            .iter()
            .find(|s| s.name().as_str() == SIGNATURE_COL)
            .ok_or_else(|| PersistenceFault::MissingColumn {
                path: self.path.clone(),
                column: SIGNATURE_COL.to_string(),
            })?;
        let signatures: HashSet<Signature> = column
            .str()
            .map_err(|e| self.csv(e))?
            .into_iter()
            .flatten()
            .map(|s| Signature::from(s.to_string()))
            .collect();
        info!("loaded {} signatures from {}", signatures.len(), self.path.display());
        Ok(signatures)
    }

    /// Append one row; the header (config keys, `score`, `signature`) is written only into a blank log.
    pub fn append(&self, record: &EvaluationRecord) -> Result<(), PersistenceFault> {
        let header = self.is_blank()?;
        let mut columns: Vec<Column> = record
            .config
            .iter()
            .map(|(name, value)| Column::new(name.as_str().into(), vec![value.to_json()]))
            .collect();
        columns.push(Column::new(
            SCORE_COL.into(),
            vec![record.score.as_ref().map(|s| s.to_string())],
        ));
        columns.push(Column::new(SIGNATURE_COL.into(), vec![record.signature.to_string()]));
        let mut df = DataFrame::new(columns).map_err(|e| self.csv(e))?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io(e))?;
        CsvWriter::new(&mut file)
            .include_header(header)
            .finish(&mut df)
            .map_err(|e| self.csv(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geometry::fixed::SCALE, score::contribution};
    use test_log::test;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("treepack-results-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_log_is_empty() {
        let log = ResultsLog::new(scratch("missing.csv"));
        assert!(log.load_signatures().unwrap().is_empty());
    }

    #[test]
    fn append_then_load() {
        let log = ResultsLog::new(scratch("append.csv"));
        let good = EvaluationRecord::new(
            Config::new().with("a", 1.0).with("flag", true),
            Some(contribution(SCALE, 1)),
        );
        let failed = EvaluationRecord::new(Config::new().with("a", 2.5).with("flag", false), None);
        log.append(&good).unwrap();
        log.append(&failed).unwrap();

        let text = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "a,flag,score,signature".to_string(),
                format!("1.0,true,1.000000000000000000000000,{}", good.signature),
                format!("2.5,false,,{}", failed.signature),
            ],
        );

        let signatures = log.load_signatures().unwrap();
        assert_eq!(signatures.len(), 2);
        assert!(signatures.contains(&good.signature));
        assert!(signatures.contains(&failed.signature));
    }

    #[test]
    fn list_cells_are_quoted() {
        let log = ResultsLog::new(scratch("lists.csv"));
        let record = EvaluationRecord::new(Config::new().with("rots", vec![5.0, 185.0]), None);
        log.append(&record).unwrap();
        let text = fs::read_to_string(log.path()).unwrap();
        assert!(text.contains("\"[5.0, 185.0]\""));
        assert_eq!(log.load_signatures().unwrap().into_iter().collect::<Vec<_>>(), vec![record.signature]);
    }

    #[test]
    fn log_without_signatures() {
        let path = scratch("no-signature.csv");
        fs::write(&path, "a,score\n1.0,2.0\n").unwrap();
        assert!(matches!(
            ResultsLog::new(path).load_signatures(),
            Err(PersistenceFault::MissingColumn { column, .. }) if column == SIGNATURE_COL
        ));
    }
}
