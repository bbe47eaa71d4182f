/// Set generation for best-worst (MaxDiff) rounds, plus the shared shuffle.
use std::collections::{HashMap, VecDeque};

use rand::Rng;
use rand::seq::SliceRandom;

use crate::constants::{
    MAXDIFF_SET_SIZE, MIN_PARTIAL_SET_SIZE, REFINEMENT_MIN_APPEARANCES,
    SCREENING_MIN_APPEARANCES, SCREENING_TARGET_APPEARANCES,
};
use crate::types::ItemId;

/// Uniform in-place shuffle (Fisher-Yates, via `SliceRandom`).
pub fn shuffle<T>(items: &mut [T], rng: &mut impl Rng) {
    items.shuffle(rng);
}

/// Parameters for one phase's set sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetPlan {
    pub set_size: usize,
    /// How many times each id is put into the pool.
    pub target_appearances: usize,
    /// Coverage floor enforced by the repair pass.
    pub min_appearances: usize,
    /// Smallest set still accepted.
    pub min_set_size: usize,
}

impl SetPlan {
    pub fn screening() -> Self {
        SetPlan {
            set_size: MAXDIFF_SET_SIZE,
            target_appearances: SCREENING_TARGET_APPEARANCES,
            min_appearances: SCREENING_MIN_APPEARANCES,
            min_set_size: MAXDIFF_SET_SIZE,
        }
    }

    pub fn refinement() -> Self {
        SetPlan {
            set_size: MAXDIFF_SET_SIZE,
            target_appearances: REFINEMENT_MIN_APPEARANCES,
            min_appearances: REFINEMENT_MIN_APPEARANCES,
            min_set_size: MIN_PARTIAL_SET_SIZE,
        }
    }

    /// Set size actually used for a pool of `pool_len` ids.
    pub fn effective_set_size(&self, pool_len: usize) -> usize {
        self.set_size.min(pool_len)
    }

    /// Number of sets the plan builds: ceil(total appearances / set size).
    pub fn sets_needed(&self, pool_len: usize) -> usize {
        let size = self.effective_set_size(pool_len);
        if size == 0 {
            return 0;
        }
        (pool_len * self.target_appearances).div_ceil(size)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeneratedSets {
    pub sets: Vec<Vec<ItemId>>,
    /// How many sets each id ended up in.
    pub coverage: HashMap<ItemId, usize>,
}

/// Build a phase's set sequence.
///
/// Every id goes into a pool `target_appearances` times and the pool is
/// shuffled. Sets are filled by popping the pool; an id that is already in the
/// set under construction is carried over to the next set. Once the pool is
/// dry, remaining slots take uniformly random ids (repeats across sets are
/// allowed, never within one). A final repair pass lifts any id below
/// `min_appearances` by swapping it in for the best-covered member of a set
/// that doesn't contain it.
///
/// This departs from plain pop-and-discard: carried ids and the repair pass
/// let coverage steer generation so that every id meets `min_appearances`.
pub fn generate_sets(ids: &[ItemId], plan: &SetPlan, rng: &mut impl Rng) -> GeneratedSets {
    let size = plan.effective_set_size(ids.len());
    let sets_needed = plan.sets_needed(ids.len());
    if size == 0 || sets_needed == 0 {
        return GeneratedSets::default();
    }

    let mut pool: Vec<ItemId> = Vec::with_capacity(ids.len() * plan.target_appearances);
    for _ in 0..plan.target_appearances {
        pool.extend_from_slice(ids);
    }
    shuffle(&mut pool, rng);

    let mut carry: VecDeque<ItemId> = VecDeque::new();
    let mut sets: Vec<Vec<ItemId>> = Vec::with_capacity(sets_needed);
    let mut coverage: HashMap<ItemId, usize> = ids.iter().map(|&id| (id, 0)).collect();

    for _ in 0..sets_needed {
        let mut set: Vec<ItemId> = Vec::with_capacity(size);
        let mut deferred: VecDeque<ItemId> = VecDeque::new();

        while let Some(id) = carry.pop_front() {
            if set.len() < size && !set.contains(&id) {
                set.push(id);
            } else {
                deferred.push_back(id);
            }
        }

        while set.len() < size {
            let Some(id) = pool.pop() else { break };
            if set.contains(&id) {
                deferred.push_back(id);
            } else {
                set.push(id);
            }
        }
        carry = deferred;

        while set.len() < size {
            let id = ids[rng.random_range(0..ids.len())];
            if !set.contains(&id) {
                set.push(id);
            }
        }

        if set.len() >= plan.min_set_size.min(size) {
            for id in &set {
                *coverage.entry(*id).or_insert(0) += 1;
            }
            sets.push(set);
        }
    }

    repair_coverage(&mut sets, &mut coverage, ids, plan.min_appearances);

    GeneratedSets { sets, coverage }
}

fn repair_coverage(
    sets: &mut [Vec<ItemId>],
    coverage: &mut HashMap<ItemId, usize>,
    ids: &[ItemId],
    min_appearances: usize,
) {
    for &id in ids {
        while coverage[&id] < min_appearances {
            // Best-covered donor across sets that don't already hold `id`.
            let donor = sets
                .iter()
                .enumerate()
                .filter(|(_, set)| !set.contains(&id))
                .flat_map(|(set_idx, set)| {
                    set.iter()
                        .enumerate()
                        .map(move |(slot, &member)| (set_idx, slot, member))
                })
                .max_by_key(|&(_, _, member)| coverage[&member]);

            let Some((set_idx, slot, member)) = donor else { break };
            if coverage[&member] <= min_appearances {
                break;
            }
            sets[set_idx][slot] = id;
            *coverage.entry(member).or_insert(0) -= 1;
            *coverage.entry(id).or_insert(0) += 1;
        }
    }
}
