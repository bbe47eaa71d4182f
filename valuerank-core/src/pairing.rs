/// Pair selection for the pairwise ranker.
///
/// Pure functions over pool indices: callers own the state, these only look
/// at it and return the next pair. Three sources, tried in the order the
/// ranker wants them:
///   Bridge: pair one side of an undecided pair with a fresh third item.
///   Refinement: an unasked pair among the current leaders.
///   Exploration: an unasked pair among the least-presented items.
use rand::Rng;

use crate::constants::{
    EXPLOIT_BASE, EXPLOIT_CAP, EXPLOIT_RAMP_ROUNDS, EXPLORATION_BLOCK_SIZE, TOP_CONTENDERS,
};
use crate::history::ComparisonHistory;
use crate::sets::shuffle;
use crate::types::{ComparisonKey, ItemPool};

/// Internal indexed pair (pool indices, not caller ids).
pub(crate) type IndexedPair = (usize, usize);

/// Probability of spending a round on refinement instead of exploration.
/// Starts at 10% and reaches the 50% cap at round 20.
pub fn exploit_probability(round_count: u32) -> f64 {
    (EXPLOIT_BASE + round_count as f64 / EXPLOIT_RAMP_ROUNDS).min(EXPLOIT_CAP)
}

/// Bridge an undecided pair: pick the least-presented item that has been
/// compared with neither side, and pair it with a random side.
pub(crate) fn select_bridge(
    pool: &ItemPool,
    history: &ComparisonHistory,
    presentation_counts: &[u32],
    stalled: ComparisonKey,
    rng: &mut impl Rng,
) -> Option<IndexedPair> {
    let a = pool.try_idx(stalled.low())?;
    let b = pool.try_idx(stalled.high())?;
    let (id_a, id_b) = (stalled.low(), stalled.high());

    let mut candidates: Vec<usize> = (0..pool.len())
        .filter(|&c| c != a && c != b)
        .filter(|&c| {
            let id_c = pool.to_id(c);
            !history.have_compared(id_a, id_c) && !history.have_compared(id_b, id_c)
        })
        .collect();

    // Shuffle first so ties on presentation count break randomly.
    shuffle(&mut candidates, rng);
    let third = candidates
        .into_iter()
        .min_by_key(|&c| presentation_counts[c])?;

    let side = if rng.random::<bool>() { a } else { b };
    Some((side, third))
}

/// An unasked pair among the top `TOP_CONTENDERS` items by score.
pub(crate) fn select_refinement_pair(
    pool: &ItemPool,
    history: &ComparisonHistory,
    scores: &[f64],
    rng: &mut impl Rng,
) -> Option<IndexedPair> {
    let mut leaders: Vec<usize> = pool
        .ranked_indices(scores)
        .into_iter()
        .take(TOP_CONTENDERS)
        .collect();
    shuffle(&mut leaders, rng);
    first_open_pair(&leaders, pool, history)
}

/// Block-randomized exploration: shuffle the block of least-presented items
/// and return the first unasked pair inside it. When the block is saturated,
/// widen to the whole pool in presentation order.
pub(crate) fn select_exploration_pair(
    pool: &ItemPool,
    history: &ComparisonHistory,
    presentation_counts: &[u32],
    rng: &mut impl Rng,
) -> Option<IndexedPair> {
    let mut by_presentation: Vec<usize> = (0..pool.len()).collect();
    shuffle(&mut by_presentation, rng);
    by_presentation.sort_by_key(|&idx| presentation_counts[idx]);

    let block_size = EXPLORATION_BLOCK_SIZE.min(pool.len());
    let mut block: Vec<usize> = by_presentation[..block_size].to_vec();
    shuffle(&mut block, rng);

    first_open_pair(&block, pool, history).or_else(|| first_open_pair(&by_presentation, pool, history))
}

/// First pair (in `candidates` order) that has not been compared yet.
pub(crate) fn first_open_pair(
    candidates: &[usize],
    pool: &ItemPool,
    history: &ComparisonHistory,
) -> Option<IndexedPair> {
    for (i, &a) in candidates.iter().enumerate() {
        for &b in &candidates[i + 1..] {
            if !history.have_compared(pool.to_id(a), pool.to_id(b)) {
                return Some((a, b));
            }
        }
    }
    None
}
