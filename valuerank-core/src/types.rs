use std::collections::HashMap;
use std::fmt;

use crate::error::RankError;

/// Caller-provided, stable item identifier.
pub type ItemId = i64;

/// A candidate value being ranked.
///
/// Identity (`id`) never changes. `score` is owned by the engine while ranking
/// runs; `name`, `description` and `rating` belong to the presentation layer
/// once ranking is over.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub score: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_custom: bool,
    /// 1-10, assigned after ranking.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub rating: Option<u8>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Item {
            id,
            name: name.into(),
            description: description.into(),
            score: 0.0,
            is_custom: false,
            rating: None,
        }
    }

    /// A user-added value.
    pub fn custom(id: ItemId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Item {
            is_custom: true,
            ..Item::new(id, name, description)
        }
    }
}

/// Canonical unordered pair of item ids: `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "(ItemId, ItemId)", into = "(ItemId, ItemId)"))]
pub struct ComparisonKey {
    low: ItemId,
    high: ItemId,
}

impl ComparisonKey {
    pub fn new(a: ItemId, b: ItemId) -> Self {
        if a <= b {
            ComparisonKey { low: a, high: b }
        } else {
            ComparisonKey { low: b, high: a }
        }
    }

    pub fn low(&self) -> ItemId {
        self.low
    }

    pub fn high(&self) -> ItemId {
        self.high
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.low == id || self.high == id
    }
}

impl From<(ItemId, ItemId)> for ComparisonKey {
    fn from((a, b): (ItemId, ItemId)) -> Self {
        ComparisonKey::new(a, b)
    }
}

impl From<ComparisonKey> for (ItemId, ItemId) {
    fn from(key: ComparisonKey) -> Self {
        (key.low, key.high)
    }
}

impl fmt::Display for ComparisonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// One MaxDiff question: the user names the most and the least important member.
///
/// Answers are written back once; answered sets are kept as the session's audit trail.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ComparisonSet {
    pub set_id: String,
    pub items: Vec<Item>,
    pub most_important_id: Option<ItemId>,
    pub least_important_id: Option<ItemId>,
}

impl ComparisonSet {
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn is_answered(&self) -> bool {
        self.most_important_id.is_some() && self.least_important_id.is_some()
    }
}

/// What the presentation layer should render next.
#[derive(Debug, Clone, PartialEq)]
pub enum Next {
    Pair([Item; 2]),
    Set(ComparisonSet),
    /// Not complete, but no informative question is left. The engine is stalled.
    Exhausted,
    Complete,
}

/// A user answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    /// Pairwise: `selected` beat `rejected`.
    Pick { selected: ItemId, rejected: ItemId },
    /// Pairwise: "can't decide".
    Skip { first: ItemId, second: ItemId },
    /// MaxDiff: best and worst of the set `set_id`.
    Best {
        set_id: String,
        most: ItemId,
        least: ItemId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SessionPhase {
    /// Pairwise ranking in progress.
    Active,
    Screening,
    Refinement,
    Complete,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Active => "active",
            SessionPhase::Screening => "screening",
            SessionPhase::Refinement => "refinement",
            SessionPhase::Complete => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreEntry {
    pub id: ItemId,
    pub score: f64,
}

/// Flat, persistable progress of a ranking session.
///
/// `completed_sets`/`total_sets` count rounds for the pairwise strategy and
/// answered sets for MaxDiff. `compared_pairs` is optional: hosts that don't
/// persist it get a resumed pairwise session with empty history.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProgressSnapshot {
    pub phase: SessionPhase,
    pub completed_sets: usize,
    pub total_sets: usize,
    pub scores: Vec<ScoreEntry>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub compared_pairs: Vec<ComparisonKey>,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> f64 {
        if self.total_sets == 0 {
            return 0.0;
        }
        (self.completed_sets as f64 / self.total_sets as f64 * 100.0).min(100.0)
    }
}

/// Maps between caller ids and internal 0..N indices, and owns the pool.
#[derive(Debug, Clone)]
pub(crate) struct ItemPool {
    items: Vec<Item>,
    id_to_idx: HashMap<ItemId, usize>,
}

impl ItemPool {
    pub fn from_items(items: Vec<Item>) -> Result<Self, RankError> {
        let mut id_to_idx = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if id_to_idx.insert(item.id, idx).is_some() {
                return Err(RankError::DuplicateItem { id: item.id });
            }
        }
        Ok(ItemPool { items, id_to_idx })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn to_idx(&self, id: ItemId) -> Result<usize, RankError> {
        self.id_to_idx
            .get(&id)
            .copied()
            .ok_or(RankError::UnknownItem { id })
    }

    pub fn try_idx(&self, id: ItemId) -> Option<usize> {
        self.id_to_idx.get(&id).copied()
    }

    pub fn to_id(&self, idx: usize) -> ItemId {
        self.items[idx].id
    }

    /// Clone of the item at `idx` carrying `score` instead of its stored score.
    pub fn scored(&self, idx: usize, score: f64) -> Item {
        Item {
            score,
            ..self.items[idx].clone()
        }
    }

    /// Indices sorted by score descending. Stable: ties keep insertion order.
    pub fn ranked_indices(&self, scores: &[f64]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
    }

    /// The whole pool with current scores, best first.
    pub fn ranking(&self, scores: &[f64]) -> Vec<Item> {
        self.ranked_indices(scores)
            .into_iter()
            .map(|idx| self.scored(idx, scores[idx]))
            .collect()
    }

    /// Per-id view of an index-aligned vector.
    pub fn by_id<T: Copy>(&self, values: &[T]) -> HashMap<ItemId, T> {
        self.items
            .iter()
            .zip(values.iter())
            .map(|(item, &v)| (item.id, v))
            .collect()
    }

    pub fn score_entries(&self, scores: &[f64]) -> Vec<ScoreEntry> {
        self.items
            .iter()
            .zip(scores.iter())
            .map(|(item, &score)| ScoreEntry { id: item.id, score })
            .collect()
    }

    /// Index-aligned scores seeded from a snapshot. Ids missing from the
    /// snapshot start at zero; ids unknown to the pool are ignored.
    pub fn seed_scores(&self, entries: &[ScoreEntry]) -> Vec<f64> {
        let mut scores = vec![0.0; self.items.len()];
        for entry in entries {
            match self.try_idx(entry.id) {
                Some(idx) => scores[idx] = entry.score,
                None => tracing::warn!(id = entry.id, "snapshot score for unknown item ignored"),
            }
        }
        scores
    }
}
