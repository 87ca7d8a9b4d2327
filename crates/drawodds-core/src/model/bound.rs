use core::fmt;
use serde::{Deserialize, Serialize};

/// Requirement on how many drawn cards may belong to one named category.
///
/// `maximum` always acts as the bucketing ceiling for the category's running
/// count. When `has_upper_bound` is set it is also a hard ceiling: a hand holding
/// more than `maximum` copies fails the bound. Without it, counts saturate at
/// `maximum` and the bound reduces to "at least `minimum`".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryBound {
    name: String,
    minimum: u32,
    maximum: u32,
    has_upper_bound: bool,
}

impl CategoryBound {
    /// Ceiling used by [`CategoryBound::at_least`].
    pub const UNBOUNDED: u32 = u32::MAX;

    /// Builds a bound from a single `[min, max]` pair.
    ///
    /// A maximum of zero means "no copies allowed"; any other maximum is a
    /// saturating ceiling.
    pub fn new(name: impl Into<String>, minimum: u32, maximum: u32) -> Self {
        Self {
            name: name.into(),
            minimum,
            maximum,
            has_upper_bound: maximum == 0,
        }
    }

    /// Hand must hold between `minimum` and `maximum` copies inclusive.
    pub fn between(name: impl Into<String>, minimum: u32, maximum: u32) -> Self {
        Self {
            name: name.into(),
            minimum,
            maximum,
            has_upper_bound: true,
        }
    }

    pub fn at_least(name: impl Into<String>, minimum: u32) -> Self {
        Self {
            name: name.into(),
            minimum,
            maximum: Self::UNBOUNDED,
            has_upper_bound: false,
        }
    }

    /// Hand must hold no copies of the category.
    pub fn excluded(name: impl Into<String>) -> Self {
        Self::between(name, 0, 0)
    }

    pub fn from_parts(
        name: impl Into<String>,
        minimum: u32,
        maximum: u32,
        has_upper_bound: bool,
    ) -> Self {
        Self {
            name: name.into(),
            minimum,
            maximum,
            has_upper_bound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn minimum(&self) -> u32 {
        self.minimum
    }

    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    pub const fn has_upper_bound(&self) -> bool {
        self.has_upper_bound
    }

    /// `minimum > maximum`; no hand can satisfy the bound.
    pub const fn is_contradictory(&self) -> bool {
        self.minimum > self.maximum
    }

    /// Highest value the running count is tracked up to for a given hand size.
    pub fn ceiling(&self, hand_size: u32) -> u32 {
        let raw = if self.has_upper_bound {
            self.maximum.saturating_add(1)
        } else {
            self.maximum
        };
        raw.min(hand_size)
    }

    /// Whether a (ceiling-capped) running count satisfies the bound.
    pub const fn admits(&self, count: u32) -> bool {
        self.minimum <= count && count <= self.maximum
    }

    /// Simultaneous satisfaction of two bounds on the same category.
    ///
    /// A saturating side only contributes its minimum: its maximum is a bucketing
    /// ceiling, so when the other side has a hard ceiling that ceiling wins.
    pub fn intersect(&self, other: &CategoryBound) -> CategoryBound {
        debug_assert_eq!(self.name, other.name);
        let maximum = match (self.has_upper_bound, other.has_upper_bound) {
            (true, false) if !other.is_contradictory() => self.maximum,
            (false, true) if !self.is_contradictory() => other.maximum,
            _ => self.maximum.min(other.maximum),
        };
        CategoryBound {
            name: self.name.clone(),
            minimum: self.minimum.max(other.minimum),
            maximum,
            has_upper_bound: self.has_upper_bound || other.has_upper_bound,
        }
    }
}

impl fmt::Display for CategoryBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_upper_bound && self.maximum == Self::UNBOUNDED {
            write!(f, "{} ({}+)", self.name, self.minimum)
        } else {
            write!(f, "{} ({}-{})", self.name, self.minimum, self.maximum)
        }
    }
}

/// Joins bounds the way a category list is shown to users: `a (1-1), b (0-2)`.
pub fn describe_bounds(bounds: &[CategoryBound]) -> String {
    bounds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::{CategoryBound, describe_bounds};

    #[test]
    fn zero_maximum_is_an_exclusion() {
        let bound = CategoryBound::new("A", 0, 0);
        assert!(bound.has_upper_bound());
        assert_eq!(bound.ceiling(5), 1);
        assert!(bound.admits(0));
        assert!(!bound.admits(1));
    }

    #[test]
    fn positive_maximum_saturates() {
        let bound = CategoryBound::new("starter", 1, 1);
        assert!(!bound.has_upper_bound());
        assert_eq!(bound.ceiling(5), 1);
        assert!(!bound.admits(0));
        assert!(bound.admits(1));
    }

    #[test]
    fn strict_bound_tracks_one_past_maximum() {
        let bound = CategoryBound::between("starter", 1, 2);
        assert_eq!(bound.ceiling(5), 3);
        assert!(!bound.admits(3));
        assert_eq!(bound.ceiling(2), 2);
    }

    #[test]
    fn ceiling_never_exceeds_hand_size() {
        assert_eq!(CategoryBound::at_least("a", 2).ceiling(5), 5);
        assert_eq!(CategoryBound::new("a", 0, 40).ceiling(6), 6);
    }

    #[test]
    fn intersection_narrows_both_ends() {
        let merged = CategoryBound::between("a", 1, 4).intersect(&CategoryBound::between("a", 2, 5));
        assert_eq!(merged, CategoryBound::between("a", 2, 4));

        let saturating = CategoryBound::new("a", 1, 3).intersect(&CategoryBound::new("a", 2, 2));
        assert_eq!(saturating, CategoryBound::new("a", 2, 2));
    }

    #[test]
    fn saturating_ceiling_does_not_cap_a_strict_bound() {
        let loose = CategoryBound::new("a", 1, 3);
        let strict = CategoryBound::between("a", 2, 5);
        assert_eq!(loose.intersect(&strict), CategoryBound::between("a", 2, 5));
        assert_eq!(strict.intersect(&loose), CategoryBound::between("a", 2, 5));

        let merged = CategoryBound::between("a", 0, 2).intersect(&CategoryBound::new("a", 1, 1));
        assert_eq!(merged, CategoryBound::between("a", 1, 2));
    }

    #[test]
    fn contradictory_saturating_side_stays_contradictory() {
        let broken = CategoryBound::from_parts("a", 4, 2, false);
        let merged = CategoryBound::between("a", 0, 9).intersect(&broken);
        assert!(merged.is_contradictory());
    }

    #[test]
    fn disjoint_intersection_is_contradictory() {
        let merged = CategoryBound::new("a", 2, 2).intersect(&CategoryBound::new("a", 0, 1));
        assert!(merged.is_contradictory());
    }

    #[test]
    fn describes_lists_like_the_category_column() {
        let bounds = [
            CategoryBound::new("starter", 1, 1),
            CategoryBound::at_least("extender", 2),
        ];
        assert_eq!(describe_bounds(&bounds), "starter (1-1), extender (2+)");
        assert_eq!(describe_bounds(&[]), "");
    }
}
