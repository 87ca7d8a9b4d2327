//! Exact hand probability engine.
//!
//! - `signature`: collapses the deck into groups of interchangeable cards.
//! - `binomial`: exact binomial coefficients.
//! - `distribution`: the group-by-group convolution over partial hands.
//! - `evaluator`: normalises qualifying mass into a probability.
//! - `cancel`: cooperative cancellation shared with the caller.

pub mod binomial;
pub mod cancel;
pub mod distribution;
pub mod evaluator;
pub mod signature;

pub use cancel::CancelToken;
pub use evaluator::{MAX_DECK_SIZE, range_probability};
