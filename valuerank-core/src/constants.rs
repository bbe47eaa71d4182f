use std::time::Duration;

// ---------------------------------------------------------------------------
// Pairwise
// ---------------------------------------------------------------------------

/// Rounds before the pairwise ranker is allowed to stop at all.
pub const PAIRWISE_MIN_ROUNDS: u32 = 25;

/// Hard ceiling: the pairwise ranker always stops once this many rounds are recorded.
pub const PAIRWISE_MAX_ROUNDS: u32 = 45;

/// Score gap between the last place inside the top list and the first place
/// outside it that counts as a clear separation.
pub const SEPARATION_GAP: f64 = 2.0;

/// Size of the list the user ultimately receives.
pub const TOP_LIST_SIZE: usize = 10;

/// How many of the current leaders are considered for refinement pairs.
pub const TOP_CONTENDERS: usize = 20;

/// Block of least-presented items used for exploration pairs.
pub const EXPLORATION_BLOCK_SIZE: usize = 10;

/// Refinement probability starts here at round 0...
pub const EXPLOIT_BASE: f64 = 0.1;

/// ...grows by 1/EXPLOIT_RAMP_ROUNDS per round...
pub const EXPLOIT_RAMP_ROUNDS: f64 = 50.0;

/// ...and is capped here.
pub const EXPLOIT_CAP: f64 = 0.5;

/// An undecided pair is held back at least this long before it can be shown again.
pub const SKIP_COOLDOWN: Duration = Duration::from_secs(5);

/// Share of the progress bar covered by the first `PAIRWISE_MIN_ROUNDS` rounds.
pub const PROGRESS_AT_MIN_ROUNDS: f64 = 70.0;

// ---------------------------------------------------------------------------
// MaxDiff
// ---------------------------------------------------------------------------

pub const MAXDIFF_SET_SIZE: usize = 5;

/// Each item is put into the screening pool this many times.
pub const SCREENING_TARGET_APPEARANCES: usize = 3;

/// Coverage floor the screening sets are repaired up to.
pub const SCREENING_MIN_APPEARANCES: usize = 2;

/// Each refinement item is put into the refinement pool this many times.
pub const REFINEMENT_MIN_APPEARANCES: usize = 3;

/// Number of screening leaders carried into refinement.
pub const REFINEMENT_POOL_SIZE: usize = 25;

/// Smallest set the refinement phase still accepts when the pool runs dry.
pub const MIN_PARTIAL_SET_SIZE: usize = 3;

/// Refinement set count reported before the refinement sets exist.
/// An upper bound: 25 items * 3 appearances / 5 per set.
pub const ESTIMATED_REFINEMENT_SETS: usize = 15;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Elo K-factor: how much a single comparison moves the two scores.
pub const ELO_K_FACTOR: f64 = 32.0;

/// Rating handed out when the user never touched the slider.
pub const DEFAULT_RATING: u8 = 5;
