use std::{
    any::Any,
    collections::HashSet,
    fmt,
    panic::{self, AssertUnwindSafe},
    sync::{mpsc, Arc},
    time::Instant,
};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{SearchError, TaskFault},
    score::{score_submission, Score},
    submission::Submission,
};

use super::{
    config::{Config, Signature},
    generators::Generator,
    leaderboard::{Entry, Leaderboard},
    progress::Progress,
    results::{EvaluationRecord, ResultsLog},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Worker threads; 0 lets the pool pick one per core.
    pub workers: usize,
    pub top_k: usize,
    /// Log progress every this many completions (and at the end).
    pub log_every: usize,
    /// Largest group size generated for each config.
    pub max_n: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions { workers: 12, top_k: 20, log_every: 25, max_n: 200 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initializing,
    Evaluating,
    Drained,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineState::Initializing => "initializing",
            EngineState::Evaluating => "evaluating",
            EngineState::Drained => "drained",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct SearchSummary {
    pub leaderboard: Leaderboard,
    pub enumerated: usize,
    /// Already present in the results log.
    pub skipped: usize,
    pub evaluated: usize,
    pub scored: usize,
    pub disqualified: usize,
}

impl SearchSummary {
    fn empty(top_k: usize) -> Self {
        SearchSummary {
            leaderboard: Leaderboard::new(top_k),
            enumerated: 0,
            skipped: 0,
            evaluated: 0,
            scored: 0,
            disqualified: 0,
        }
    }
}

/// Generate group sizes `1..=max_n` for `config`, then score the submission.
pub fn evaluate<G: Generator + ?Sized>(generator: &G, config: &Config, max_n: usize) -> Result<Score, TaskFault> {
    let submission = Submission::generate(generator, config, max_n)?;
    Ok(score_submission(&submission)?)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// [`evaluate`], with panics turned into [`TaskFault::Panicked`].
pub fn evaluate_contained<G: Generator + ?Sized>(generator: &G, config: &Config, max_n: usize) -> Result<Score, TaskFault> {
    panic::catch_unwind(AssertUnwindSafe(|| evaluate(generator, config, max_n)))
        .unwrap_or_else(|payload| Err(TaskFault::Panicked(panic_message(payload.as_ref()))))
}

type Completion = (Config, Signature, Result<Score, TaskFault>);

/// Evaluates configs in parallel, skipping any already in the results log.
///
/// The calling thread coordinates: it dispatches at most `2 × workers`
/// tasks at a time, receives completions in the order they finish, appends
/// each to the log, then updates the leaderboard.
pub struct SearchEngine<G> {
    generator: Arc<G>,
    log: ResultsLog,
    options: SearchOptions,
}

impl<G: Generator + 'static> SearchEngine<G> {
    pub fn new(generator: G, log: ResultsLog, options: SearchOptions) -> Self {
        SearchEngine { generator: Arc::new(generator), log, options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn log(&self) -> &ResultsLog {
        &self.log
    }

    fn set_state(&self, state: EngineState) {
        debug!("search engine {}", state);
    }

    /// Configs whose signatures aren't in `done`; duplicates within `configs` are kept.
    fn pending(configs: Vec<Config>, done: &HashSet<Signature>) -> Vec<(Config, Signature)> {
        configs
            .into_iter()
            .map(|config| {
                let signature = config.signature();
                (config, signature)
            })
            .filter(|(_, signature)| !done.contains(signature))
            .collect()
    }

    pub fn run(&self, configs: Vec<Config>) -> Result<SearchSummary, SearchError> {
        self.set_state(EngineState::Initializing);
        let enumerated = configs.len();
        if enumerated == 0 {
            info!("config space is empty, nothing to evaluate");
            self.set_state(EngineState::Drained);
            return Ok(SearchSummary::empty(self.options.top_k));
        }

        let done = self.log.load_signatures()?;
        let pending = Self::pending(configs, &done);
        let total = pending.len();
        info!("Total configs: {}", enumerated);
        info!("Already evaluated: {}", done.len());
        info!("New configs to evaluate: {}", total);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.workers)
            .thread_name(|i| format!("treepack-worker-{}", i))
            .build()?;
        let max_in_flight = 2 * pool.current_num_threads();
        let (tx, rx) = mpsc::channel::<Completion>();
        let mut tx = Some(tx);

        self.set_state(EngineState::Evaluating);
        let start = Instant::now();
        let mut queue = pending.into_iter();
        let mut in_flight = 0usize;
        let mut summary = SearchSummary {
            enumerated,
            skipped: enumerated - total,
            ..SearchSummary::empty(self.options.top_k)
        };

        loop {
            while in_flight < max_in_flight {
                let Some(sender) = tx.as_ref() else { break };
                let Some((config, signature)) = queue.next() else { break };
                let generator = Arc::clone(&self.generator);
                let tx = sender.clone();
                let max_n = self.options.max_n;
                pool.spawn(move || {
                    let result = evaluate_contained(generator.as_ref(), &config, max_n);
                    // The receiver only goes away if the coordinator bailed out.
                    let _ = tx.send((config, signature, result));
                });
                in_flight += 1;
            }
            if queue.len() == 0 {
                // only workers hold senders now, so a lost task closes the channel
                tx = None;
            }
            if in_flight == 0 {
                break;
            }
            let Ok((config, signature, result)) = rx.recv() else {
                warn!("worker channel closed with {} tasks in flight", in_flight);
                break;
            };
            in_flight -= 1;
            summary.evaluated += 1;

            let score = match result {
                Ok(score) => {
                    summary.scored += 1;
                    Some(score)
                }
                Err(fault) => {
                    summary.disqualified += 1;
                    debug!("config {} disqualified: {}", signature, fault);
                    None
                }
            };
            let record = EvaluationRecord { config, signature, score };
            self.log.append(&record)?;
            if let Some(score) = record.score {
                summary.leaderboard.insert(Entry { score, config: record.config, signature: record.signature });
            }

            let completed = summary.evaluated;
            if (self.options.log_every > 0 && completed % self.options.log_every == 0) || completed == total {
                let progress = Progress {
                    completed,
                    pending: total,
                    scored: summary.scored,
                    disqualified: summary.disqualified,
                    best: summary.leaderboard.best().map(|e| e.score.clone()),
                    elapsed: start.elapsed(),
                };
                info!("{}", progress);
            }
        }

        self.set_state(EngineState::Drained);
        info!(
            "Search completed: {} evaluated, {} scored, {} disqualified, {} skipped",
            summary.evaluated, summary.scored, summary.disqualified, summary.skipped,
        );
        Ok(summary)
    }
}
