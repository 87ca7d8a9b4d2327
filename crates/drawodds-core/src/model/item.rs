use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One deck entry: `copies` indistinguishable cards sharing the same category tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    copies: u32,
    #[serde(default)]
    categories: BTreeSet<String>,
}

impl Item {
    pub fn new<I, S>(copies: u32, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            copies,
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Cards that belong to no category at all.
    pub fn untagged(copies: u32) -> Self {
        Self {
            copies,
            categories: BTreeSet::new(),
        }
    }

    pub const fn copies(&self) -> u32 {
        self.copies
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn belongs_to(&self, category: &str) -> bool {
        self.categories.contains(category)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.copies)?;
        if self.categories.is_empty() {
            return f.write_str(" (untagged)");
        }
        let tags = self.categories.iter().cloned().collect::<Vec<_>>().join(", ");
        write!(f, " [{tags}]")
    }
}

/// Total number of physical cards across `deck`.
pub fn deck_size(deck: &[Item]) -> u64 {
    deck.iter().map(|item| u64::from(item.copies)).sum()
}
