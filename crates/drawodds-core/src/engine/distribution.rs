//! Dynamic program over (cards drawn, per-category counts).

use crate::engine::binomial::binomial_row;
use crate::engine::cancel::CancelToken;
use crate::engine::signature::CardGroup;
use crate::error::EvalError;
use crate::model::bound::CategoryBound;
use std::collections::BTreeMap;
use tracing::trace;

/// Partial hand summary: how many cards were drawn and how many of them fall in
/// each evaluated category, capped at that category's ceiling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DpState {
    pub drawn: u32,
    pub counts: Vec<u32>,
}

impl DpState {
    pub fn empty(categories: usize) -> Self {
        Self {
            drawn: 0,
            counts: vec![0; categories],
        }
    }
}

/// Unnormalised probability mass per state, measured in ways to draw.
#[derive(Debug, Clone, Default)]
pub struct Distribution {
    states: BTreeMap<DpState, f64>,
}

impl Distribution {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DpState, f64)> {
        self.states.iter().map(|(state, ways)| (state, *ways))
    }

    pub fn weight(&self, state: &DpState) -> f64 {
        self.states.get(state).copied().unwrap_or(0.0)
    }

    /// States describing a complete hand.
    pub fn terminal(&self, hand_size: u32) -> impl Iterator<Item = (&DpState, f64)> {
        self.iter().filter(move |(state, _)| state.drawn == hand_size)
    }

    /// Total ways over complete hands; equals `C(deck, hand)`.
    pub fn terminal_weight(&self, hand_size: u32) -> f64 {
        self.terminal(hand_size).map(|(_, ways)| ways).sum()
    }

    /// Ways over complete hands whose counts satisfy every bound.
    pub fn qualifying_weight(&self, bounds: &[CategoryBound], hand_size: u32) -> f64 {
        self.terminal(hand_size)
            .filter(|(state, _)| {
                bounds
                    .iter()
                    .zip(&state.counts)
                    .all(|(bound, &count)| bound.admits(count))
            })
            .map(|(_, ways)| ways)
            .sum()
    }
}

/// Convolves every group into the distribution of hands of up to `hand_size`
/// cards.
///
/// Cancellation is checked once per group and once per successor state.
pub fn compute_distribution(
    groups: &[CardGroup],
    bounds: &[CategoryBound],
    hand_size: u32,
    cancel: &CancelToken,
) -> Result<Distribution, EvalError> {
    let ceilings: Vec<u32> = bounds.iter().map(|b| b.ceiling(hand_size)).collect();
    let mut states = BTreeMap::new();
    states.insert(DpState::empty(bounds.len()), 1.0);

    for (index, group) in groups.iter().enumerate() {
        cancel.check()?;
        states = convolve_group(&states, group, &ceilings, hand_size, cancel)?;
        trace!(
            target: "drawodds_core::engine",
            group = index,
            group_size = group.size,
            states = states.len(),
            "convolved group"
        );
    }

    Ok(Distribution { states })
}

fn convolve_group(
    states: &BTreeMap<DpState, f64>,
    group: &CardGroup,
    ceilings: &[u32],
    hand_size: u32,
    cancel: &CancelToken,
) -> Result<BTreeMap<DpState, f64>, EvalError> {
    let ways_to_draw = binomial_row(group.size, hand_size);
    let members: Vec<usize> = group.signature.members().collect();
    let mut next = BTreeMap::new();

    for (state, &ways) in states {
        let room = hand_size - state.drawn;
        let limit = group.size.min(room) as usize;
        for (draw, &choose) in ways_to_draw.iter().enumerate().take(limit + 1) {
            cancel.check()?;
            let draw = draw as u32;
            let mut successor = DpState {
                drawn: state.drawn + draw,
                counts: state.counts.clone(),
            };
            for &category in &members {
                let count = &mut successor.counts[category];
                *count = count.saturating_add(draw).min(ceilings[category]);
            }
            *next.entry(successor).or_insert(0.0) += ways * choose;
        }
    }

    Ok(next)
}
