/// Pairwise comparison history.
///
/// Tracks which unordered pairs have been asked, which pairs the user could
/// not decide ("related"), and which undecided pairs still wait to be bridged
/// through a third item.
use std::collections::{HashSet, VecDeque};

use crate::types::{ComparisonKey, ItemId};

#[derive(Debug, Clone, Default)]
pub struct ComparisonHistory {
    compared: HashSet<ComparisonKey>,
    related: HashSet<ComparisonKey>,
    stalled: VecDeque<ComparisonKey>,
}

impl ComparisonHistory {
    pub fn new() -> Self {
        ComparisonHistory::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = ComparisonKey>) -> Self {
        ComparisonHistory {
            compared: pairs.into_iter().collect(),
            ..ComparisonHistory::default()
        }
    }

    pub fn have_compared(&self, a: ItemId, b: ItemId) -> bool {
        self.compared.contains(&ComparisonKey::new(a, b))
    }

    pub fn mark_compared(&mut self, a: ItemId, b: ItemId) -> ComparisonKey {
        let key = ComparisonKey::new(a, b);
        self.compared.insert(key);
        key
    }

    /// Record an undecided pair: compared for now, remembered as related,
    /// and queued for bridging.
    pub fn mark_undecided(&mut self, a: ItemId, b: ItemId) -> ComparisonKey {
        let key = self.mark_compared(a, b);
        self.related.insert(key);
        if !self.stalled.contains(&key) {
            self.stalled.push_back(key);
        }
        key
    }

    /// Make a pair eligible again. Returns false if it was not in the history.
    pub fn reopen(&mut self, key: ComparisonKey) -> bool {
        self.compared.remove(&key)
    }

    pub fn is_related(&self, a: ItemId, b: ItemId) -> bool {
        self.related.contains(&ComparisonKey::new(a, b))
    }

    /// Oldest undecided pair still waiting for a bridge.
    pub fn next_stalled(&self) -> Option<ComparisonKey> {
        self.stalled.front().copied()
    }

    pub fn resolve_stalled(&mut self, key: ComparisonKey) {
        self.stalled.retain(|k| *k != key);
    }

    pub fn compared_count(&self) -> usize {
        self.compared.len()
    }

    pub fn related_count(&self) -> usize {
        self.related.len()
    }

    pub fn stalled_count(&self) -> usize {
        self.stalled.len()
    }

    /// Compared pairs in a stable order, for snapshots.
    pub fn compared_pairs(&self) -> Vec<ComparisonKey> {
        let mut pairs: Vec<ComparisonKey> = self.compared.iter().copied().collect();
        pairs.sort();
        pairs
    }

    pub fn clear(&mut self) {
        self.compared.clear();
        self.related.clear();
        self.stalled.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compared_is_symmetric() {
        let mut history = ComparisonHistory::new();
        history.mark_compared(4, 1);
        assert!(history.have_compared(1, 4));
        assert!(history.have_compared(4, 1));
        assert!(!history.have_compared(1, 2));
        assert_eq!(history.compared_count(), 1);
    }

    #[test]
    fn test_undecided_pair_is_queued_once() {
        let mut history = ComparisonHistory::new();
        history.mark_undecided(2, 3);
        history.mark_undecided(3, 2);
        assert_eq!(history.stalled_count(), 1);
        assert!(history.is_related(2, 3));
        assert!(history.have_compared(2, 3));
        assert_eq!(history.next_stalled(), Some(ComparisonKey::new(2, 3)));
    }

    #[test]
    fn test_reopen_keeps_relationship() {
        let mut history = ComparisonHistory::new();
        let key = history.mark_undecided(5, 6);
        assert!(history.reopen(key));
        assert!(!history.reopen(key));
        assert!(!history.have_compared(5, 6));
        assert!(history.is_related(5, 6));
    }

    #[test]
    fn test_resolve_stalled() {
        let mut history = ComparisonHistory::new();
        let a = history.mark_undecided(1, 2);
        let b = history.mark_undecided(3, 4);
        history.resolve_stalled(a);
        assert_eq!(history.next_stalled(), Some(b));
    }

    #[test]
    fn test_compared_pairs_sorted() {
        let history = ComparisonHistory::from_pairs([
            ComparisonKey::new(9, 8),
            ComparisonKey::new(1, 3),
        ]);
        assert_eq!(
            history.compared_pairs(),
            vec![ComparisonKey::new(1, 3), ComparisonKey::new(8, 9)]
        );
    }
}
