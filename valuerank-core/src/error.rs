/// Error type shared by both ranking strategies.
///
/// Every fallible engine call returns `Result<_, RankError>` and leaves the
/// engine untouched when it fails. These are caller bugs, not transient
/// conditions: retrying the same call yields the same error.
use crate::types::ItemId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    /// An id was passed that is not part of the pool (or not of the current set).
    #[error("unknown item id {id}")]
    UnknownItem { id: ItemId },

    /// The pool handed to a constructor contained the same id twice.
    #[error("duplicate item id {id} in pool")]
    DuplicateItem { id: ItemId },

    /// Both sides of a choice name the same item (pair sides, or most and least).
    #[error("both sides of the choice are item {id}; they must differ")]
    SameItem { id: ItemId },

    /// The id exists in the pool but is not a member of the set being answered.
    #[error("item {id} is not part of set {set_id}")]
    NotInSet { id: ItemId, set_id: String },

    /// An answer arrived for a set other than the one currently presented.
    #[error("answer for set {got} but the current set is {expected}")]
    StaleSet { expected: String, got: String },

    #[error("insufficient items for {strategy}: need at least {needed}, got {got}")]
    InsufficientItems {
        strategy: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("ranking session is already complete")]
    SessionComplete,

    #[error("{strategy} ranking does not support {operation}")]
    Unsupported {
        strategy: &'static str,
        operation: &'static str,
    },

    #[error("rating must be between 1 and 10, got {rating}")]
    InvalidRating { rating: u8 },

    #[error("invalid progress snapshot: {reason}")]
    InvalidSnapshot { reason: String },
}
