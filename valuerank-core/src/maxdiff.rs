/// Two-phase best-worst (MaxDiff) ranker.
///
/// Screening shows every item in sets of five until each has been seen about
/// three times. Refinement then reruns the procedure over the screening
/// leaders only. The number of sets in each phase is fixed when the phase
/// starts, so the session always ends after a known number of answers.
use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::constants::{ESTIMATED_REFINEMENT_SETS, MIN_PARTIAL_SET_SIZE, REFINEMENT_POOL_SIZE};
use crate::error::RankError;
use crate::scoring::best_worst_weight;
use crate::sets::{SetPlan, generate_sets};
use crate::types::{ComparisonSet, Item, ItemId, ItemPool, Next, ProgressSnapshot, SessionPhase};

const STRATEGY: &str = "maxdiff";

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MaxDiffConfig {
    pub screening: SetPlan,
    pub refinement: SetPlan,
    /// Screening leaders carried into refinement.
    pub refinement_pool_size: usize,
    /// Refinement set count reported while still screening.
    pub estimated_refinement_sets: usize,
}

impl Default for MaxDiffConfig {
    fn default() -> Self {
        MaxDiffConfig {
            screening: SetPlan::screening(),
            refinement: SetPlan::refinement(),
            refinement_pool_size: REFINEMENT_POOL_SIZE,
            estimated_refinement_sets: ESTIMATED_REFINEMENT_SETS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MaxDiffStats {
    pub phase: SessionPhase,
    /// Screening sets plus refinement sets, estimated until refinement starts.
    pub total_sets: usize,
    pub completed_sets: usize,
    /// How many sets of the current generation each item appears in.
    pub value_coverage: HashMap<ItemId, usize>,
    pub scores: HashMap<ItemId, f64>,
}

pub struct MaxDiffRanker {
    pool: ItemPool,
    /// Indexed like `pool`.
    scores: Vec<f64>,
    coverage: Vec<usize>,
    screening_sets: Vec<ComparisonSet>,
    refinement_sets: Vec<ComparisonSet>,
    current_index: usize,
    phase: SessionPhase,
    config: MaxDiffConfig,
    rng: StdRng,
}

impl MaxDiffRanker {
    pub fn new(items: Vec<Item>, config: MaxDiffConfig) -> Result<Self, RankError> {
        MaxDiffRanker::with_rng(items, config, StdRng::from_rng(&mut rand::rng()))
    }

    /// Same as `new`, with reproducible set generation.
    pub fn seeded(items: Vec<Item>, config: MaxDiffConfig, seed: u64) -> Result<Self, RankError> {
        MaxDiffRanker::with_rng(items, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(items: Vec<Item>, config: MaxDiffConfig, rng: StdRng) -> Result<Self, RankError> {
        let pool = ItemPool::from_items(items)?;
        if pool.len() < MIN_PARTIAL_SET_SIZE {
            return Err(RankError::InsufficientItems {
                strategy: STRATEGY,
                needed: MIN_PARTIAL_SET_SIZE,
                got: pool.len(),
            });
        }
        let num_items = pool.len();

        let mut ranker = MaxDiffRanker {
            pool,
            scores: vec![0.0; num_items],
            coverage: vec![0; num_items],
            screening_sets: Vec::new(),
            refinement_sets: Vec::new(),
            current_index: 0,
            phase: SessionPhase::Screening,
            config,
            rng,
        };
        ranker.start_screening();
        Ok(ranker)
    }

    /// Rebuild a ranker from a persisted snapshot. Scores are restored and
    /// the recorded phase continues with a freshly generated set sequence;
    /// set counts depend only on pool size, so progress picks up where it was.
    pub fn resume(
        items: Vec<Item>,
        config: MaxDiffConfig,
        snapshot: &ProgressSnapshot,
        seed: Option<u64>,
    ) -> Result<Self, RankError> {
        if snapshot.phase == SessionPhase::Active {
            return Err(RankError::InvalidSnapshot {
                reason: "phase active does not belong to a maxdiff session".to_string(),
            });
        }
        let mut ranker = match seed {
            Some(seed) => MaxDiffRanker::seeded(items, config, seed)?,
            None => MaxDiffRanker::new(items, config)?,
        };
        ranker.scores = ranker.pool.seed_scores(&snapshot.scores);

        let screening_len = ranker.screening_sets.len();
        match snapshot.phase {
            SessionPhase::Screening if snapshot.completed_sets < screening_len => {
                ranker.current_index = snapshot.completed_sets;
            }
            SessionPhase::Screening | SessionPhase::Refinement => {
                ranker.start_refinement();
                ranker.current_index = snapshot.completed_sets.saturating_sub(screening_len);
                if ranker.current_index >= ranker.refinement_sets.len() {
                    ranker.finish();
                }
            }
            SessionPhase::Complete | SessionPhase::Active => {
                ranker.start_refinement();
                ranker.finish();
            }
        }
        tracing::debug!(
            phase = %ranker.phase,
            completed = ranker.completed_sets(),
            total = ranker.total_sets(),
            "resumed maxdiff session"
        );
        Ok(ranker)
    }

    fn start_screening(&mut self) {
        let members: Vec<usize> = (0..self.pool.len()).collect();
        let plan = self.config.screening;
        self.screening_sets = self.build_sets(&members, &plan, "screening");
        self.current_index = 0;
        self.phase = SessionPhase::Screening;
        tracing::debug!(sets = self.screening_sets.len(), "screening sets generated");
    }

    /// Shortlist the screening leaders and generate their refinement sets.
    fn start_refinement(&mut self) {
        let leaders: Vec<usize> = self
            .pool
            .ranked_indices(&self.scores)
            .into_iter()
            .take(self.config.refinement_pool_size)
            .collect();
        for &idx in &leaders {
            self.coverage[idx] = 0;
        }
        let plan = self.config.refinement;
        self.refinement_sets = self.build_sets(&leaders, &plan, "refinement");
        self.current_index = 0;
        self.phase = SessionPhase::Refinement;
        tracing::debug!(
            leaders = leaders.len(),
            sets = self.refinement_sets.len(),
            "entering refinement"
        );
        if self.refinement_sets.is_empty() {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.current_index = self.refinement_sets.len();
        self.phase = SessionPhase::Complete;
        tracing::debug!(answered = self.completed_sets(), "maxdiff ranking complete");
    }

    fn build_sets(&mut self, members: &[usize], plan: &SetPlan, prefix: &str) -> Vec<ComparisonSet> {
        let ids: Vec<ItemId> = members.iter().map(|&idx| self.pool.to_id(idx)).collect();
        let generated = generate_sets(&ids, plan, &mut self.rng);

        for (id, count) in &generated.coverage {
            if let Some(idx) = self.pool.try_idx(*id) {
                self.coverage[idx] = *count;
            }
        }

        generated
            .sets
            .into_iter()
            .enumerate()
            .map(|(i, set_ids)| ComparisonSet {
                set_id: format!("{prefix}-{i}"),
                items: set_ids
                    .into_iter()
                    .filter_map(|id| self.pool.try_idx(id))
                    .map(|idx| self.pool.scored(idx, self.scores[idx]))
                    .collect(),
                most_important_id: None,
                least_important_id: None,
            })
            .collect()
    }

    fn current_sets(&self) -> &[ComparisonSet] {
        match self.phase {
            SessionPhase::Screening => &self.screening_sets,
            SessionPhase::Refinement => &self.refinement_sets,
            SessionPhase::Complete | SessionPhase::Active => &[],
        }
    }

    /// The set awaiting an answer, with current scores.
    pub fn current_set(&self) -> Option<ComparisonSet> {
        let set = self.current_sets().get(self.current_index)?;
        let mut set = set.clone();
        for item in &mut set.items {
            if let Some(idx) = self.pool.try_idx(item.id) {
                item.score = self.scores[idx];
            }
        }
        Some(set)
    }

    pub fn get_next(&self) -> Next {
        if self.phase == SessionPhase::Complete {
            return Next::Complete;
        }
        match self.current_set() {
            Some(set) => Next::Set(set),
            None => Next::Exhausted,
        }
    }

    /// Score an answer for the current set: the most important item gains
    /// `k - 1`, the least important loses `k - 1`, the rest are unchanged.
    pub fn record_choice(&mut self, set_id: &str, most: ItemId, least: ItemId) -> Result<(), RankError> {
        if self.phase == SessionPhase::Complete {
            return Err(RankError::SessionComplete);
        }
        let index = self.current_index;
        let set = self.current_sets().get(index).ok_or(RankError::SessionComplete)?;
        if set.set_id != set_id {
            return Err(RankError::StaleSet {
                expected: set.set_id.clone(),
                got: set_id.to_string(),
            });
        }
        if most == least {
            return Err(RankError::SameItem { id: most });
        }
        for id in [most, least] {
            if !set.contains(id) {
                return Err(match self.pool.try_idx(id) {
                    Some(_) => RankError::NotInSet { id, set_id: set.set_id.clone() },
                    None => RankError::UnknownItem { id },
                });
            }
        }

        let weight = best_worst_weight(set.items.len());
        let most_idx = self.pool.to_idx(most)?;
        let least_idx = self.pool.to_idx(least)?;
        self.scores[most_idx] += weight;
        self.scores[least_idx] -= weight;

        let set = match self.phase {
            SessionPhase::Screening => &mut self.screening_sets[index],
            _ => &mut self.refinement_sets[index],
        };
        set.most_important_id = Some(most);
        set.least_important_id = Some(least);

        self.current_index += 1;
        if self.phase == SessionPhase::Screening && self.current_index >= self.screening_sets.len() {
            self.start_refinement();
        } else if self.phase == SessionPhase::Refinement
            && self.current_index >= self.refinement_sets.len()
        {
            self.finish();
        }
        Ok(())
    }

    fn total_sets(&self) -> usize {
        let refinement = match self.phase {
            SessionPhase::Screening => self.config.estimated_refinement_sets,
            _ => self.refinement_sets.len(),
        };
        self.screening_sets.len() + refinement
    }

    fn completed_sets(&self) -> usize {
        match self.phase {
            SessionPhase::Screening => self.current_index,
            _ => self.screening_sets.len() + self.current_index,
        }
    }

    pub fn stats(&self) -> MaxDiffStats {
        MaxDiffStats {
            phase: self.phase,
            total_sets: self.total_sets(),
            completed_sets: self.completed_sets(),
            value_coverage: self.pool.by_id(&self.coverage),
            scores: self.pool.by_id(&self.scores),
        }
    }

    pub fn progress(&self) -> f64 {
        let total = self.total_sets();
        if total == 0 {
            return 100.0;
        }
        (self.completed_sets() as f64 / total as f64 * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whole pool by score, best first; ties keep insertion order.
    pub fn final_ranking(&self) -> Vec<Item> {
        self.pool.ranking(&self.scores)
    }

    /// Every set generated so far, answered ones carrying their answers.
    pub fn sets(&self) -> impl Iterator<Item = &ComparisonSet> {
        self.screening_sets.iter().chain(self.refinement_sets.iter())
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            phase: self.phase,
            completed_sets: self.completed_sets(),
            total_sets: self.total_sets(),
            scores: self.pool.score_entries(&self.scores),
            compared_pairs: Vec::new(),
        }
    }

    /// Back to a fresh screening phase over the same pool.
    pub fn reset(&mut self) {
        self.scores.iter_mut().for_each(|s| *s = 0.0);
        self.coverage.iter_mut().for_each(|c| *c = 0);
        self.refinement_sets.clear();
        self.start_screening();
    }
}
