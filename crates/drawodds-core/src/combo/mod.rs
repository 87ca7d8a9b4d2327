//! Union of combos via inclusion-exclusion over merged bound lists.

pub mod inclusion;
pub mod merger;

pub use inclusion::{MAX_COMBOS, combo_probability};
pub use merger::merge_combos;
