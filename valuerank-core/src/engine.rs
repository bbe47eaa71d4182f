/// Ranking engine façade.
///
/// Pure computation: no IO, no timers of its own. The host renders whatever
/// `next()` returns, collects the answer, and feeds it back through `record()`.
/// Both strategies sit behind the `Ranker` trait so a host can drive either
/// one with the same loop.
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::RankError;
use crate::maxdiff::{MaxDiffConfig, MaxDiffRanker, MaxDiffStats};
use crate::pairwise::{PairwiseConfig, PairwiseRanker, PairwiseStats};
use crate::constants::MAXDIFF_SET_SIZE;
use crate::rating::{ranking_confidence, top_values};
use crate::scoring::{ScoringRule, best_worst_weight};
use crate::types::{Choice, Item, Next, ProgressSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// Two items at a time, adaptive stopping.
    #[default]
    Pairwise,
    /// Best-worst sets of five, screening then refinement.
    MaxDiff,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Pairwise => f.write_str("pairwise"),
            Strategy::MaxDiff => f.write_str("maxdiff"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pairwise" => Ok(Strategy::Pairwise),
            "maxdiff" | "max-diff" => Ok(Strategy::MaxDiff),
            other => Err(format!("unknown strategy \"{other}\", use \"pairwise\" or \"maxdiff\"")),
        }
    }
}

/// Configuration for the ranking engine.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub strategy: Strategy,
    /// Pairwise score update. MaxDiff always scores best/worst picks by set size.
    pub scoring: ScoringRule,
    /// Fixed seed for reproducible sessions.
    pub seed: Option<u64>,
}

/// Counters of whichever strategy is running.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "strategy", rename_all = "lowercase"))]
pub enum EngineStats {
    Pairwise(PairwiseStats),
    MaxDiff(MaxDiffStats),
}

/// Common interface of the ranking strategies.
pub trait Ranker: Send {
    fn strategy(&self) -> Strategy;

    /// What to show the user next. Fires due cool-downs first.
    fn next(&mut self) -> Next;

    /// Apply one answer. On error nothing changes.
    fn record(&mut self, choice: &Choice) -> Result<(), RankError>;

    fn stats(&mut self) -> EngineStats;

    fn is_complete(&self) -> bool;

    /// 0..=100.
    fn progress(&self) -> f64;

    fn final_ranking(&self) -> Vec<Item>;

    fn snapshot(&self) -> ProgressSnapshot;

    fn reset(&mut self);
}

impl Ranker for PairwiseRanker {
    fn strategy(&self) -> Strategy {
        Strategy::Pairwise
    }

    fn next(&mut self) -> Next {
        self.get_next()
    }

    fn record(&mut self, choice: &Choice) -> Result<(), RankError> {
        match *choice {
            Choice::Pick { selected, rejected } => self.record_choice(selected, rejected),
            Choice::Skip { first, second } => self.skip_comparison(first, second).map(|_| ()),
            Choice::Best { .. } => Err(RankError::Unsupported {
                strategy: "pairwise",
                operation: "best-worst answers",
            }),
        }
    }

    fn stats(&mut self) -> EngineStats {
        EngineStats::Pairwise(PairwiseRanker::stats(self))
    }

    fn is_complete(&self) -> bool {
        PairwiseRanker::is_complete(self)
    }

    fn progress(&self) -> f64 {
        PairwiseRanker::progress(self)
    }

    fn final_ranking(&self) -> Vec<Item> {
        PairwiseRanker::final_ranking(self)
    }

    fn snapshot(&self) -> ProgressSnapshot {
        PairwiseRanker::snapshot(self)
    }

    fn reset(&mut self) {
        PairwiseRanker::reset(self)
    }
}

impl Ranker for MaxDiffRanker {
    fn strategy(&self) -> Strategy {
        Strategy::MaxDiff
    }

    fn next(&mut self) -> Next {
        self.get_next()
    }

    fn record(&mut self, choice: &Choice) -> Result<(), RankError> {
        match choice {
            Choice::Best { set_id, most, least } => self.record_choice(set_id, *most, *least),
            Choice::Pick { .. } => Err(RankError::Unsupported {
                strategy: "maxdiff",
                operation: "pairwise picks",
            }),
            Choice::Skip { .. } => Err(RankError::Unsupported {
                strategy: "maxdiff",
                operation: "skipping",
            }),
        }
    }

    fn stats(&mut self) -> EngineStats {
        EngineStats::MaxDiff(MaxDiffRanker::stats(self))
    }

    fn is_complete(&self) -> bool {
        MaxDiffRanker::is_complete(self)
    }

    fn progress(&self) -> f64 {
        MaxDiffRanker::progress(self)
    }

    fn final_ranking(&self) -> Vec<Item> {
        MaxDiffRanker::final_ranking(self)
    }

    fn snapshot(&self) -> ProgressSnapshot {
        MaxDiffRanker::snapshot(self)
    }

    fn reset(&mut self) {
        MaxDiffRanker::reset(self)
    }
}

/// One ranking session over a pool of items.
pub struct RankingEngine {
    ranker: Box<dyn Ranker>,
    config: EngineConfig,
}

impl RankingEngine {
    pub fn new(items: Vec<Item>, config: EngineConfig) -> Result<Self, RankError> {
        let ranker: Box<dyn Ranker> = match config.strategy {
            Strategy::Pairwise => {
                let ranker = PairwiseRanker::new(items, pairwise_config(&config))?;
                Box::new(match config.seed {
                    Some(seed) => ranker.with_seed(seed),
                    None => ranker,
                })
            }
            Strategy::MaxDiff => Box::new(match config.seed {
                Some(seed) => MaxDiffRanker::seeded(items, MaxDiffConfig::default(), seed)?,
                None => MaxDiffRanker::new(items, MaxDiffConfig::default())?,
            }),
        };
        tracing::debug!(strategy = %config.strategy, "ranking engine created");
        Ok(RankingEngine { ranker, config })
    }

    /// Continue a session from a persisted snapshot.
    pub fn resume(
        items: Vec<Item>,
        config: EngineConfig,
        snapshot: &ProgressSnapshot,
    ) -> Result<Self, RankError> {
        let ranker: Box<dyn Ranker> = match config.strategy {
            Strategy::Pairwise => {
                let ranker = PairwiseRanker::resume(items, pairwise_config(&config), snapshot)?;
                Box::new(match config.seed {
                    Some(seed) => ranker.with_seed(seed),
                    None => ranker,
                })
            }
            Strategy::MaxDiff => Box::new(MaxDiffRanker::resume(
                items,
                MaxDiffConfig::default(),
                snapshot,
                config.seed,
            )?),
        };
        Ok(RankingEngine { ranker, config })
    }

    /// Wrap an already built ranker, e.g. one with a custom clock.
    pub fn from_ranker(ranker: Box<dyn Ranker>, config: EngineConfig) -> Self {
        RankingEngine { ranker, config }
    }

    pub fn strategy(&self) -> Strategy {
        self.ranker.strategy()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn next(&mut self) -> Next {
        self.ranker.next()
    }

    pub fn record(&mut self, choice: &Choice) -> Result<(), RankError> {
        self.ranker.record(choice)
    }

    pub fn stats(&mut self) -> EngineStats {
        self.ranker.stats()
    }

    pub fn is_complete(&self) -> bool {
        self.ranker.is_complete()
    }

    pub fn progress(&self) -> f64 {
        self.ranker.progress()
    }

    pub fn final_ranking(&self) -> Vec<Item> {
        self.ranker.final_ranking()
    }

    /// The first `n` items of the final ranking.
    pub fn top_values(&self, n: usize) -> Vec<Item> {
        top_values(&self.final_ranking(), n)
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.ranker.snapshot()
    }

    pub fn reset(&mut self) {
        self.ranker.reset()
    }

    /// Points one answer moves a score by under this session's rule.
    pub fn comparison_weight(&self) -> f64 {
        match self.strategy() {
            Strategy::Pairwise => self.config.scoring.comparison_weight(),
            Strategy::MaxDiff => best_worst_weight(MAXDIFF_SET_SIZE),
        }
    }

    /// `ranking_confidence` of the current ranking, on this session's scale.
    pub fn ranking_confidence(&self) -> f64 {
        ranking_confidence(&self.final_ranking(), self.comparison_weight())
    }

    pub fn into_shared(self) -> SharedEngine {
        SharedEngine::new(self)
    }
}

fn pairwise_config(config: &EngineConfig) -> PairwiseConfig {
    PairwiseConfig {
        scoring: config.scoring,
        ..PairwiseConfig::default()
    }
}

/// Engine handle for hosts that answer from more than one thread. Each
/// handle clone talks to the same session; calls are serialized by one mutex.
#[derive(Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<RankingEngine>>,
}

impl SharedEngine {
    pub fn new(engine: RankingEngine) -> Self {
        SharedEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Lock the session. A panic in another holder does not poison it for good:
    /// every engine operation leaves the state consistent before it can panic.
    pub fn lock(&self) -> MutexGuard<'_, RankingEngine> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn next(&self) -> Next {
        self.lock().next()
    }

    pub fn record(&self, choice: &Choice) -> Result<(), RankError> {
        self.lock().record(choice)
    }

    pub fn progress(&self) -> f64 {
        self.lock().progress()
    }

    pub fn is_complete(&self) -> bool {
        self.lock().is_complete()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().snapshot()
    }
}
