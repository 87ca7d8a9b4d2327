use thiserror::Error;

/// Failures surfaced by the probability engine.
///
/// Impossible requests (hand larger than the deck, contradictory bounds) are not
/// errors; they evaluate to a probability of zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("calculation cancelled")]
    Cancelled,
    #[error("{count} combos exceed the inclusion-exclusion limit of {limit}")]
    TooManyCombos { count: usize, limit: usize },
    #[error("deck of {cards} cards exceeds the limit of {limit}")]
    DeckTooLarge { cards: u64, limit: u64 },
}
