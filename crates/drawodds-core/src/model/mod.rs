pub mod bound;
pub mod combo;
pub mod item;
