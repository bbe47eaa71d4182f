/// Score update rules.
///
/// Both are heuristics. `Tally` is the default; `Elo` is kept for hosts that
/// want diminishing returns on lopsided matchups. Either way the winner's
/// score strictly increases relative to the loser's.
use crate::constants::ELO_K_FACTOR;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase", tag = "rule"))]
pub enum ScoringRule {
    /// Winner +1, loser -1.
    #[default]
    Tally,
    /// Expected-score update with a K-factor.
    Elo { k_factor: f64 },
}

impl ScoringRule {
    pub fn elo() -> Self {
        ScoringRule::Elo { k_factor: ELO_K_FACTOR }
    }

    /// Points each side moves when two equally scored items are compared.
    /// Gaps and confidence are read in units of this.
    pub fn comparison_weight(&self) -> f64 {
        match *self {
            ScoringRule::Tally => 1.0,
            ScoringRule::Elo { k_factor } => k_factor / 2.0,
        }
    }

    /// New `(winner, loser)` scores after `winner` beat `loser`.
    pub fn apply(&self, winner: f64, loser: f64) -> (f64, f64) {
        match *self {
            ScoringRule::Tally => (winner + 1.0, loser - 1.0),
            ScoringRule::Elo { k_factor } => {
                let expected_winner = expected_score(winner, loser);
                let expected_loser = expected_score(loser, winner);
                (
                    winner + k_factor * (1.0 - expected_winner),
                    loser + k_factor * (0.0 - expected_loser),
                )
            }
        }
    }
}

/// Probability that a player rated `rating` beats one rated `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Points a best (or worst) pick in a set of `set_size` is worth: the number
/// of pairwise wins (or losses) the pick implies.
pub fn best_worst_weight(set_size: usize) -> f64 {
    set_size.saturating_sub(1) as f64
}
