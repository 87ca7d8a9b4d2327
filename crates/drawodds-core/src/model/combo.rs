use crate::model::bound::{CategoryBound, describe_bounds};
use core::fmt;
use serde::{Deserialize, Serialize};

/// A conjunction of category bounds that must all hold in the same hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    bounds: Vec<CategoryBound>,
}

impl Combo {
    pub fn new(bounds: Vec<CategoryBound>) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &[CategoryBound] {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl From<Vec<CategoryBound>> for Combo {
    fn from(bounds: Vec<CategoryBound>) -> Self {
        Self::new(bounds)
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe_bounds(&self.bounds))
    }
}
