#![deny(warnings)]
pub mod combo;
pub mod engine;
pub mod error;
pub mod model;

pub use combo::{MAX_COMBOS, combo_probability};
pub use engine::{CancelToken, MAX_DECK_SIZE, range_probability};
pub use error::EvalError;
pub use model::bound::CategoryBound;
pub use model::combo::Combo;
pub use model::item::Item;
