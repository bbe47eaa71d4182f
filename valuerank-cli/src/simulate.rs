/// Simulate command: measures how well a strategy recovers a known order.
///
/// A hidden ground-truth order is drawn over the pool and a simulated
/// respondent answers every question from it, optionally with noise and
/// "can't decide" skips. Time is simulated too, so skip cool-downs elapse
/// without waiting.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use valuerank_core::constants::{SKIP_COOLDOWN, TOP_LIST_SIZE};
use valuerank_core::{
    Choice, EngineConfig, Item, ItemId, ManualClock, Next, PairwiseConfig, PairwiseRanker,
    RankError, RankingEngine, ScoringRule, Strategy, standard_values,
};

/// Simulated time one answer takes.
const ANSWER_TIME: Duration = Duration::from_secs(2);

/// Safety valve for a respondent that skips everything.
const MAX_QUESTIONS: usize = 10_000;

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub strategy: Strategy,
    pub scoring: ScoringRule,
    /// Pool size. Up to 93 uses the standard values, beyond that synthetic ones are added.
    pub values: usize,
    /// Chance that an answer ignores the ground truth.
    pub noise: f64,
    /// Chance that a pairwise question is skipped.
    pub skip_rate: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub strategy: Strategy,
    pub values: usize,
    pub answers: usize,
    pub skips: usize,
    pub complete: bool,
    /// How many of the true top list made it into the ranked top list.
    pub top_recovered: usize,
    pub top_size: usize,
    /// Mean |ranked position - true position| over the true top list.
    pub mean_rank_error: f64,
    pub confidence: f64,
}

fn build_pool(size: usize) -> Vec<Item> {
    let mut pool: Vec<Item> = standard_values().into_iter().take(size).collect();
    while pool.len() < size {
        let id = pool.len() as ItemId + 1;
        pool.push(Item::custom(id, format!("VALUE {id}"), ""));
    }
    pool
}

/// Respondent with a fixed preference order.
struct Respondent {
    truth_rank: HashMap<ItemId, usize>,
    noise: f64,
    skip_rate: f64,
    rng: StdRng,
}

impl Respondent {
    fn prefers(&self, a: ItemId, b: ItemId) -> bool {
        self.truth_rank[&a] < self.truth_rank[&b]
    }

    fn answer_pair(&mut self, a: ItemId, b: ItemId) -> Choice {
        if self.rng.random::<f64>() < self.skip_rate {
            return Choice::Skip { first: a, second: b };
        }
        let (mut selected, mut rejected) = if self.prefers(a, b) { (a, b) } else { (b, a) };
        if self.rng.random::<f64>() < self.noise {
            std::mem::swap(&mut selected, &mut rejected);
        }
        Choice::Pick { selected, rejected }
    }

    fn answer_set(&mut self, set_id: String, ids: &[ItemId]) -> Choice {
        let mut ordered = ids.to_vec();
        if self.rng.random::<f64>() < self.noise {
            ordered.shuffle(&mut self.rng);
        } else {
            ordered.sort_by_key(|id| self.truth_rank[id]);
        }
        Choice::Best {
            set_id,
            most: ordered[0],
            least: ordered[ordered.len() - 1],
        }
    }
}

pub fn run_simulation(opts: &SimulationOptions) -> Result<SimulationReport, RankError> {
    let pool = build_pool(opts.values);
    let mut rng = StdRng::seed_from_u64(opts.seed);

    let mut truth: Vec<ItemId> = pool.iter().map(|item| item.id).collect();
    truth.shuffle(&mut rng);
    let truth_rank: HashMap<ItemId, usize> = truth.iter().enumerate().map(|(rank, &id)| (id, rank)).collect();

    let config = EngineConfig {
        strategy: opts.strategy,
        scoring: opts.scoring,
        seed: Some(opts.seed),
    };
    let clock = ManualClock::new();
    let mut engine = match opts.strategy {
        Strategy::Pairwise => {
            let ranker = PairwiseRanker::new(pool.clone(), PairwiseConfig { scoring: opts.scoring, ..PairwiseConfig::default() })?
                .with_seed(opts.seed)
                .with_clock(Arc::new(clock.clone()));
            RankingEngine::from_ranker(Box::new(ranker), config)
        }
        Strategy::MaxDiff => RankingEngine::new(pool.clone(), config)?,
    };

    let mut respondent = Respondent {
        truth_rank,
        noise: opts.noise,
        skip_rate: opts.skip_rate,
        rng: StdRng::seed_from_u64(opts.seed.wrapping_add(1)),
    };

    let mut answers = 0;
    let mut skips = 0;
    let mut idle_waits = 0;
    for _ in 0..MAX_QUESTIONS {
        let choice = match engine.next() {
            Next::Pair([a, b]) => respondent.answer_pair(a.id, b.id),
            Next::Set(set) => {
                let ids = set.ids();
                respondent.answer_set(set.set_id, &ids)
            }
            Next::Exhausted => {
                // Let any pending cool-down run out once before giving up.
                if idle_waits > 0 {
                    tracing::warn!(answers, "no question left before completion");
                    break;
                }
                idle_waits += 1;
                clock.advance(SKIP_COOLDOWN);
                continue;
            }
            Next::Complete => break,
        };
        idle_waits = 0;
        if matches!(choice, Choice::Skip { .. }) {
            skips += 1;
        } else {
            answers += 1;
        }
        engine.record(&choice)?;
        clock.advance(ANSWER_TIME);
    }

    let ranking = engine.final_ranking();
    let top_size = TOP_LIST_SIZE.min(ranking.len());
    let ranked_pos: HashMap<ItemId, usize> = ranking.iter().enumerate().map(|(pos, item)| (item.id, pos)).collect();
    let top_recovered = truth[..top_size].iter().filter(|id| ranked_pos[*id] < top_size).count();
    let mean_rank_error = if top_size == 0 {
        0.0
    } else {
        truth[..top_size]
            .iter()
            .enumerate()
            .map(|(true_pos, id)| ranked_pos[id].abs_diff(true_pos) as f64)
            .sum::<f64>()
            / top_size as f64
    };

    Ok(SimulationReport {
        strategy: opts.strategy,
        values: pool.len(),
        answers,
        skips,
        complete: engine.is_complete(),
        top_recovered,
        top_size,
        mean_rank_error,
        confidence: engine.ranking_confidence(),
    })
}

pub fn print_report(report: &SimulationReport) {
    println!("── Session ─────────────────────────────────────");
    println!("Strategy:              {}", report.strategy);
    println!("Values:                {}", report.values);
    println!("Answers:               {}", report.answers);
    if report.skips > 0 {
        println!("Skips:                 {}", report.skips);
    }
    println!("Completed:             {}", if report.complete { "yes" } else { "no" });

    println!();
    println!("── Recovery ────────────────────────────────────");
    println!("Top {} recovered:      {}/{}", report.top_size, report.top_recovered, report.top_size);
    println!("Mean rank error:       {:.2}", report.mean_rank_error);
    println!("Ranking confidence:    {:.1}%", report.confidence);
}
