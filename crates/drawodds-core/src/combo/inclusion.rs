use crate::combo::merger::merge_combos;
use crate::engine::cancel::CancelToken;
use crate::engine::evaluator::range_probability;
use crate::error::EvalError;
use crate::model::combo::Combo;
use crate::model::item::Item;
use tracing::debug;

/// Largest combo list accepted; evaluation walks `2^n - 1` subsets.
pub const MAX_COMBOS: usize = 20;

/// Probability that at least one combo is fully satisfied by the hand.
///
/// Expands the union over every non-empty subset of `combos`, adding the joint
/// probability of odd-sized subsets and subtracting even-sized ones. Cost is
/// one range evaluation per subset, so lists longer than [`MAX_COMBOS`] are
/// rejected. The sum is not clamped: overlapping or contradictory combos that
/// push it outside `[0, 1]` indicate a modelling error by the caller.
pub fn combo_probability(
    deck: &[Item],
    combos: &[Combo],
    hand_size: u32,
    cancel: &CancelToken,
) -> Result<f64, EvalError> {
    if combos.len() > MAX_COMBOS {
        return Err(EvalError::TooManyCombos {
            count: combos.len(),
            limit: MAX_COMBOS,
        });
    }

    debug!(
        target: "drawodds_core::combo",
        combos = combos.len(),
        subsets = (1u32 << combos.len()) - 1,
        hand_size,
        "combo evaluation started"
    );
    let total = sum_subsets(deck, combos, hand_size, cancel).inspect_err(|err| {
        debug!(target: "drawodds_core::combo", error = %err, "combo evaluation aborted");
    })?;
    debug!(target: "drawodds_core::combo", probability = total, "combo probability evaluated");
    Ok(total)
}

fn sum_subsets(
    deck: &[Item],
    combos: &[Combo],
    hand_size: u32,
    cancel: &CancelToken,
) -> Result<f64, EvalError> {
    let mut total = 0.0;
    for mask in 1u32..(1u32 << combos.len()) {
        cancel.check()?;
        let merged = merge_combos(combos, mask);
        let probability = range_probability(deck, &merged, hand_size, cancel)?;
        let cardinality = mask.count_ones();
        debug!(
            target: "drawodds_core::combo",
            mask,
            cardinality,
            bounds = merged.len(),
            probability,
            "subset evaluated"
        );
        total += signed(probability, cardinality);
    }

    Ok(total)
}

fn signed(probability: f64, cardinality: u32) -> f64 {
    if cardinality % 2 == 1 {
        probability
    } else {
        -probability
    }
}
