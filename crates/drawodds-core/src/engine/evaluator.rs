use crate::engine::binomial::binomial_f64;
use crate::engine::cancel::CancelToken;
use crate::engine::distribution::compute_distribution;
use crate::engine::signature::group_deck;
use crate::error::EvalError;
use crate::model::bound::CategoryBound;
use crate::model::item::{Item, deck_size};
use tracing::debug;

/// Largest deck accepted. `C(n, n/2)` stays within `f64` range up to here, so
/// neither the state weights nor the total number of hands overflow.
pub const MAX_DECK_SIZE: u64 = 1024;

/// Probability that a uniformly random hand of `hand_size` cards satisfies every
/// bound in `bounds` simultaneously.
///
/// A hand larger than the deck evaluates to `0.0`; an empty bound list to `1.0`.
/// Bound names are matched against item tags by exact string comparison. Decks
/// of more than [`MAX_DECK_SIZE`] cards are rejected with
/// [`EvalError::DeckTooLarge`].
pub fn range_probability(
    deck: &[Item],
    bounds: &[CategoryBound],
    hand_size: u32,
    cancel: &CancelToken,
) -> Result<f64, EvalError> {
    debug!(
        target: "drawodds_core::engine",
        items = deck.len(),
        bounds = bounds.len(),
        hand_size,
        "range evaluation started"
    );
    evaluate(deck, bounds, hand_size, cancel).inspect_err(|err| {
        debug!(target: "drawodds_core::engine", error = %err, "range evaluation aborted");
    })
}

fn evaluate(
    deck: &[Item],
    bounds: &[CategoryBound],
    hand_size: u32,
    cancel: &CancelToken,
) -> Result<f64, EvalError> {
    cancel.check()?;
    let total_cards = deck_size(deck);
    if total_cards > MAX_DECK_SIZE {
        return Err(EvalError::DeckTooLarge {
            cards: total_cards,
            limit: MAX_DECK_SIZE,
        });
    }
    if u64::from(hand_size) > total_cards {
        debug!(
            target: "drawodds_core::engine",
            hand_size,
            deck_size = total_cards,
            "hand larger than deck"
        );
        return Ok(0.0);
    }

    let groups = group_deck(deck, bounds, cancel)?;
    let distribution = compute_distribution(&groups, bounds, hand_size, cancel)?;
    let successful = distribution.qualifying_weight(bounds, hand_size);
    let total_ways = binomial_f64(groups.iter().map(|g| g.size).sum(), hand_size);
    let probability = successful / total_ways;

    debug!(
        target: "drawodds_core::engine",
        bounds = bounds.len(),
        groups = groups.len(),
        states = distribution.len(),
        hand_size,
        probability,
        "range probability evaluated"
    );
    Ok(probability)
}
