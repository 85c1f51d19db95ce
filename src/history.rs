use log::debug;

use crate::error::HistoryError;

/// Bounded undo/redo history of whole-state snapshots.
///
/// The history always holds the current state plus any states that can be
/// undone to or redone to. Pushing a new state discards the redo branch; once
/// the history is full the oldest snapshot is evicted first.
#[derive(Debug, Clone)]
pub struct SnapshotHistory<T> {
    entries: Vec<T>,
    index: usize,
    limit: usize,
}

impl<T: Clone> SnapshotHistory<T> {
    /// Creates a history holding `initial`. `limit` is raised to at least one.
    pub fn new(initial: T, limit: usize) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            limit: limit.max(1),
        }
    }

    /// Records `state` as the new current state.
    pub fn push(&mut self, state: T) {
        self.entries.truncate(self.index + 1);
        self.entries.push(state);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            debug!("History full, evicted {} oldest snapshot(s)", excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Steps back and returns the state to restore.
    pub fn undo(&mut self) -> Result<&T, HistoryError> {
        if self.index == 0 {
            return Err(HistoryError::NothingToUndo);
        }
        self.index -= 1;
        Ok(&self.entries[self.index])
    }

    /// Steps forward and returns the state to restore.
    pub fn redo(&mut self) -> Result<&T, HistoryError> {
        if self.index + 1 >= self.entries.len() {
            return Err(HistoryError::NothingToRedo);
        }
        self.index += 1;
        Ok(&self.entries[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn current(&self) -> &T {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drops every snapshot and starts over from `state`.
    pub fn reset(&mut self, state: T) {
        self.entries.clear();
        self.entries.push(state);
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_walks_snapshots() {
        let mut h = SnapshotHistory::new(0, 10);
        h.push(1);
        h.push(2);
        assert_eq!(h.undo(), Ok(&1));
        assert_eq!(h.undo(), Ok(&0));
        assert_eq!(h.undo(), Err(HistoryError::NothingToUndo));
        assert_eq!(h.redo(), Ok(&1));
        assert_eq!(*h.current(), 1);
    }

    #[test]
    fn push_discards_redo_branch() {
        let mut h = SnapshotHistory::new(0, 10);
        h.push(1);
        h.push(2);
        h.undo().unwrap();
        h.push(3);
        assert!(!h.can_redo());
        assert_eq!(h.redo(), Err(HistoryError::NothingToRedo));
        assert_eq!(h.undo(), Ok(&1));
    }

    #[test]
    fn oldest_snapshots_are_evicted() {
        let mut h = SnapshotHistory::new(0, 3);
        for i in 1..=5 {
            h.push(i);
            assert!(h.len() <= 3);
        }
        assert_eq!(h.undo(), Ok(&4));
        assert_eq!(h.undo(), Ok(&3));
        assert!(h.undo().is_err());
    }

    #[test]
    fn zero_limit_still_keeps_current() {
        let mut h = SnapshotHistory::new("a", 0);
        h.push("b");
        assert_eq!(h.len(), 1);
        assert_eq!(*h.current(), "b");
        assert!(!h.can_undo());
    }
}
