/// valuerank-core: Pure-computation engine for ranking personal values.
///
/// Two strategies: adaptive pairwise comparison with a separation-based stop,
/// and two-phase best-worst (MaxDiff) sets. No IO, no terminal, no storage;
/// the host shows what the engine asks for and feeds the answers back.
///
/// Items are identified by caller-provided `i64` IDs. The crate handles the
/// internal mapping to array indices, so callers never see them.
///
/// # Quick start
///
/// ```rust
/// use valuerank_core::{standard_values, Choice, EngineConfig, Next, RankingEngine, Strategy};
///
/// let config = EngineConfig { strategy: Strategy::MaxDiff, seed: Some(7), ..Default::default() };
/// let mut engine = RankingEngine::new(standard_values(), config).unwrap();
///
/// while let Next::Set(set) = engine.next() {
///     // A real host asks the user. Here the first item always wins.
///     let ids = set.ids();
///     let choice = Choice::Best { set_id: set.set_id, most: ids[0], least: ids[ids.len() - 1] };
///     engine.record(&choice).unwrap();
/// }
///
/// assert!(engine.is_complete());
/// for (rank, value) in engine.top_values(10).iter().enumerate() {
///     println!("{:>2}. {} ({:+})", rank + 1, value.name, value.score);
/// }
/// ```

pub mod catalog;
pub mod constants;
pub mod cooldown;
pub mod engine;
pub mod error;
pub mod history;
pub mod maxdiff;
pub mod pairing;
pub mod pairwise;
pub mod rating;
pub mod scoring;
pub mod sets;
pub mod types;

// Re-export primary public API at crate root.
pub use catalog::{find_standard, next_custom_id, standard_values};
pub use cooldown::{Clock, ManualClock, SystemClock, TaskHandle};
pub use engine::{EngineConfig, EngineStats, Ranker, RankingEngine, SharedEngine, Strategy};
pub use error::RankError;
pub use maxdiff::{MaxDiffConfig, MaxDiffRanker, MaxDiffStats};
pub use pairwise::{PairwiseConfig, PairwiseRanker, PairwiseStats};
pub use rating::{RatedItem, SessionRecord, rate, ranking_confidence, top_values};
pub use scoring::ScoringRule;
pub use types::{
    Choice, ComparisonKey, ComparisonSet, Item, ItemId, Next, ProgressSnapshot, ScoreEntry,
    SessionPhase,
};
