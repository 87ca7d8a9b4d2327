//! Membership signatures and grouping of interchangeable cards.

use crate::engine::cancel::CancelToken;
use crate::error::EvalError;
use crate::model::bound::CategoryBound;
use crate::model::item::Item;
use std::collections::BTreeMap;

/// Which of the evaluated bounds' categories a card belongs to, in bound order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MembershipSignature(Vec<bool>);

impl MembershipSignature {
    pub fn of(item: &Item, bounds: &[CategoryBound]) -> Self {
        Self(bounds.iter().map(|b| item.belongs_to(b.name())).collect())
    }

    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Indices of the categories this signature belongs to.
    pub fn members(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(index, member)| member.then_some(index))
    }
}

/// Cards sharing one signature, drawn from as a single pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardGroup {
    pub signature: MembershipSignature,
    pub size: u32,
}

/// Collapses the deck into groups of interchangeable cards.
///
/// Groups come back ordered by signature, so the result does not depend on the
/// order items were supplied in. Sizes saturate at `u32::MAX`; callers going
/// through [`range_probability`](crate::engine::range_probability) never get
/// near that, since decks above
/// [`MAX_DECK_SIZE`](crate::engine::MAX_DECK_SIZE) are rejected first.
pub fn group_deck(
    deck: &[Item],
    bounds: &[CategoryBound],
    cancel: &CancelToken,
) -> Result<Vec<CardGroup>, EvalError> {
    let mut sizes: BTreeMap<MembershipSignature, u32> = BTreeMap::new();
    for item in deck {
        cancel.check()?;
        if item.copies() == 0 {
            continue;
        }
        let size = sizes.entry(MembershipSignature::of(item, bounds)).or_default();
        *size = size.saturating_add(item.copies());
    }
    Ok(sizes
        .into_iter()
        .map(|(signature, size)| CardGroup { signature, size })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{MembershipSignature, group_deck};
    use crate::engine::cancel::CancelToken;
    use crate::error::EvalError;
    use crate::model::bound::CategoryBound;
    use crate::model::item::Item;

    fn bounds() -> Vec<CategoryBound> {
        vec![CategoryBound::new("a", 1, 1), CategoryBound::new("b", 1, 1)]
    }

    #[test]
    fn signature_follows_bound_order() {
        let sig = MembershipSignature::of(&Item::new(1, ["b", "other"]), &bounds());
        assert_eq!(sig, MembershipSignature::from_flags(vec![false, true]));
        assert_eq!(sig.members().collect::<Vec<_>>(), vec![1]);
        assert!(!sig.contains(0));
    }

    #[test]
    fn identical_signatures_merge() {
        let deck = [
            Item::new(2, ["a"]),
            Item::new(1, ["a", "unrelated"]),
            Item::new(3, ["b"]),
            Item::untagged(4),
        ];
        let groups = group_deck(&deck, &bounds(), &CancelToken::new()).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups.iter().map(|g| g.size).sum::<u32>(), 10);
        let a_only = MembershipSignature::from_flags(vec![true, false]);
        let a_group = groups.iter().find(|g| g.signature == a_only).unwrap();
        assert_eq!(a_group.size, 3);
    }

    #[test]
    fn grouping_ignores_input_order() {
        let forward = [Item::new(2, ["a"]), Item::new(3, ["b"]), Item::untagged(1)];
        let mut reversed = forward.clone();
        reversed.reverse();
        let token = CancelToken::new();
        assert_eq!(
            group_deck(&forward, &bounds(), &token).unwrap(),
            group_deck(&reversed, &bounds(), &token).unwrap()
        );
    }

    #[test]
    fn no_bounds_yields_one_group() {
        let deck = [Item::new(2, ["a"]), Item::untagged(5)];
        let groups = group_deck(&deck, &[], &CancelToken::new()).unwrap();
        assert_eq!(groups.len(), 1);
        assert!(groups[0].signature.is_empty());
        assert_eq!(groups[0].size, 7);
    }

    #[test]
    fn cancelled_token_aborts() {
        let token = CancelToken::new();
        token.cancel();
        let deck = [Item::new(2, ["a"])];
        assert_eq!(group_deck(&deck, &bounds(), &token), Err(EvalError::Cancelled));
    }

    #[test]
    fn huge_groups_saturate_instead_of_overflowing() {
        let deck = [Item::untagged(u32::MAX), Item::untagged(3)];
        let groups = group_deck(&deck, &[], &CancelToken::new()).unwrap();
        assert_eq!(groups[0].size, u32::MAX);
    }
}
