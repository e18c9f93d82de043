use std::{
    fmt::{self, Display, Formatter},
    time::Duration,
};

use crate::score::Score;

/// Snapshot of a running search, logged every few completions.
#[derive(Debug, Clone)]
pub struct Progress {
    pub completed: usize,
    pub pending: usize,
    pub scored: usize,
    pub disqualified: usize,
    pub best: Option<Score>,
    pub elapsed: Duration,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.pending == 0 {
            100.0
        } else {
            self.completed as f64 * 100.0 / self.pending as f64
        }
    }

    /// Completions per second.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.completed as f64 / secs
        } else {
            0.0
        }
    }

    /// Time left at the current rate; `None` until the rate is known.
    pub fn eta(&self) -> Option<Duration> {
        let rate = self.rate();
        if rate > 0.0 {
            let remaining = self.pending.saturating_sub(self.completed) as f64;
            Some(Duration::from_secs_f64(remaining / rate))
        } else {
            None
        }
    }
}

fn minutes(d: Duration) -> f64 {
    d.as_secs_f64() / 60.0
}

impl Display for Progress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{} | {:6.2}%] scored {}, disqualified {} | Best: ",
            self.completed, self.pending, self.percent(), self.scored, self.disqualified,
        )?;
        match &self.best {
            Some(best) => write!(f, "{:.6}", best)?,
            None => write!(f, "-")?,
        }
        write!(f, " | Elapsed: {:5.1} min | ETA: ", minutes(self.elapsed))?;
        match self.eta() {
            Some(eta) => write!(f, "{:5.1} min", minutes(eta))?,
            None => write!(f, "    ? min")?,
        }
        write!(f, " | Rate: {:5.2} cfg/s", self.rate())
    }
}
