use derive_more::Deref;

use crate::score::Score;

use super::config::{Config, Signature};

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub score: Score,
    pub config: Config,
    pub signature: Signature,
}

/// Best `capacity` scored configs of one run, ascending by score. Ties keep arrival order.
#[derive(Debug, Clone, Deref)]
pub struct Leaderboard {
    capacity: usize,
    #[deref]
    entries: Vec<Entry>,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Leaderboard { capacity, entries: Vec::with_capacity(capacity.min(1024) + 1) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns whether the entry made the board.
    pub fn insert(&mut self, entry: Entry) -> bool {
        let idx = self.entries.partition_point(|e| e.score <= entry.score);
        if idx >= self.capacity {
            return false;
        }
        self.entries.insert(idx, entry);
        self.entries.truncate(self.capacity);
        true
    }

    pub fn best(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::contribution;
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
    use test_log::test;

    fn entry(side: i128, tag: i64) -> Entry {
        let config = Config::new().with("tag", tag);
        Entry { score: contribution(side, 1), signature: config.signature(), config }
    }

    #[test]
    fn keeps_best_k_ascending() {
        let mut sides: Vec<i128> = (1..=50).collect();
        sides.shuffle(&mut StdRng::seed_from_u64(3));
        let mut board = Leaderboard::new(5);
        for &side in &sides {
            board.insert(entry(side, side as i64));
        }
        let kept: Vec<i128> = board.iter().map(|e| e.config.float("tag").unwrap() as i128).collect();
        assert_eq!(kept, vec![1, 2, 3, 4, 5]);
        assert_eq!(board.best().unwrap().score, contribution(1, 1));
    }

    #[test]
    fn ties_keep_arrival_order() {
        let mut board = Leaderboard::new(3);
        assert!(board.insert(entry(7, 0)));
        assert!(board.insert(entry(7, 1)));
        assert!(board.insert(entry(3, 2)));
        assert!(!board.insert(entry(7, 3)));
        let tags: Vec<f64> = board.iter().map(|e| e.config.float("tag").unwrap()).collect();
        assert_eq!(tags, vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn zero_capacity() {
        let mut board = Leaderboard::new(0);
        assert!(!board.insert(entry(1, 0)));
        assert!(board.is_empty());
        assert!(board.best().is_none());
    }
}
