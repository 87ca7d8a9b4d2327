use crate::model::bound::CategoryBound;
use crate::model::combo::Combo;
use std::collections::HashMap;

/// Combines the combos selected by `mask` (bit `i` selects `combos[i]`) into one
/// list of bounds that must all hold at once.
///
/// Bounds sharing a category name are intersected; names keep the order in which
/// they first appear. An empty intersection is kept as a contradictory bound.
pub fn merge_combos(combos: &[Combo], mask: u32) -> Vec<CategoryBound> {
    let mut merged: Vec<CategoryBound> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    let selected = combos
        .iter()
        .enumerate()
        .filter(|(index, _)| *index < 32 && mask & (1u32 << *index) != 0);

    for (_, combo) in selected {
        for bound in combo.bounds() {
            match positions.get(bound.name()) {
                Some(&position) => merged[position] = merged[position].intersect(bound),
                None => {
                    positions.insert(bound.name().to_string(), merged.len());
                    merged.push(bound.clone());
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::merge_combos;
    use crate::model::bound::CategoryBound;
    use crate::model::combo::Combo;

    fn combos() -> Vec<Combo> {
        vec![
            Combo::new(vec![CategoryBound::new("a", 1, 3), CategoryBound::new("b", 1, 1)]),
            Combo::new(vec![CategoryBound::new("a", 2, 2), CategoryBound::new("c", 0, 0)]),
            Combo::new(vec![CategoryBound::new("a", 0, 1)]),
        ]
    }

    #[test]
    fn single_combo_passes_through() {
        let merged = merge_combos(&combos(), 0b001);
        assert_eq!(merged, combos()[0].bounds().to_vec());
    }

    #[test]
    fn shared_names_intersect() {
        let merged = merge_combos(&combos(), 0b011);
        let names: Vec<_> = merged.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(merged[0].minimum(), 2);
        assert_eq!(merged[0].maximum(), 2);
        assert_eq!(merged[2], CategoryBound::new("c", 0, 0));
    }

    #[test]
    fn disjoint_ranges_stay_contradictory() {
        let merged = merge_combos(&combos(), 0b110);
        assert_eq!(merged[0].minimum(), 2);
        assert_eq!(merged[0].maximum(), 1);
        assert!(merged[0].is_contradictory());
    }

    #[test]
    fn empty_mask_merges_nothing() {
        assert!(merge_combos(&combos(), 0).is_empty());
    }
}
