use indexmap::IndexMap;
use std::collections::HashSet;

/// Sorted item ids forming a canonical build. Sorting makes the signature
/// order-independent: two players buying the same items in a different
/// sequence count as the same build.
pub type BuildSignature = Vec<i32>;

/// A signature covers the first three valid items.
pub const SIGNATURE_ITEM_COUNT: usize = 3;

/// Fewer than two valid items is not a build worth mining.
pub const SIGNATURE_MIN_ITEMS: usize = 2;

/// Canonicalizes a participant's item slots into a build signature.
/// Empty slots are skipped; with a completed-item set available, component
/// items are skipped too. Returns `None` below the two-item minimum.
pub fn build_signature(items: &[i32; 6], completed_items: Option<&HashSet<i32>>) -> Option<BuildSignature> {
    let mut signature: Vec<i32> = items
        .iter()
        .copied()
        .filter(|id| *id != 0)
        .filter(|id| completed_items.is_none_or(|set| set.contains(id)))
        .take(SIGNATURE_ITEM_COUNT)
        .collect();

    if signature.len() < SIGNATURE_MIN_ITEMS {
        return None;
    }

    signature.sort_unstable();
    Some(signature)
}

/// Multiset of build signatures. Insertion order is preserved so that
/// frequency ties resolve to the first-encountered signature.
#[derive(Debug, Default, Clone)]
pub struct BuildTally {
    counts: IndexMap<BuildSignature, u32>
}

impl BuildTally {
    pub fn record(&mut self, signature: BuildSignature) {
        *self.counts.entry(signature).or_insert(0) += 1;
    }

    /// The single most frequent signature; first-encountered wins ties.
    pub fn top(&self) -> Option<&BuildSignature> {
        let mut best: Option<(&BuildSignature, u32)> = None;

        for (signature, count) in &self.counts {
            if best.is_none_or(|(_, best_count)| *count > best_count) {
                best = Some((signature, *count));
            }
        }

        best.map(|(signature, _)| signature)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_order_independent() {
        let a = build_signature(&[10, 20, 30, 0, 0, 0], None);
        let b = build_signature(&[30, 10, 20, 0, 0, 0], None);

        assert_eq!(a, b);
        assert_eq!(a, Some(vec![10, 20, 30]));
    }

    #[test]
    fn test_signature_skips_empty_slots() {
        assert_eq!(
            build_signature(&[0, 10, 0, 20, 30, 0], None),
            Some(vec![10, 20, 30])
        );
    }

    #[test]
    fn test_signature_requires_two_valid_items() {
        assert_eq!(build_signature(&[10, 0, 0, 0, 0, 0], None), None);
        assert_eq!(build_signature(&[0; 6], None), None);
        assert_eq!(build_signature(&[10, 20, 0, 0, 0, 0], None), Some(vec![10, 20]));
    }

    #[test]
    fn test_signature_filters_components() {
        let completed = HashSet::from([3031, 3153, 3072]);

        // 1038 is a component: the signature reaches past it.
        assert_eq!(
            build_signature(&[1038, 3031, 3153, 3072, 0, 0], Some(&completed)),
            Some(vec![3031, 3072, 3153])
        );
    }

    #[test]
    fn test_signature_without_item_set_keeps_everything() {
        assert_eq!(
            build_signature(&[1038, 3031, 0, 0, 0, 0], None),
            Some(vec![1038, 3031])
        );
    }

    #[test]
    fn test_top_build_most_frequent() {
        let mut tally = BuildTally::default();
        tally.record(vec![1, 2, 3]);
        tally.record(vec![4, 5, 6]);
        tally.record(vec![4, 5, 6]);

        assert_eq!(tally.top(), Some(&vec![4, 5, 6]));
    }

    #[test]
    fn test_top_build_tie_goes_to_first_encountered() {
        let mut tally = BuildTally::default();
        tally.record(vec![1, 2, 3]);
        tally.record(vec![4, 5, 6]);
        tally.record(vec![1, 2, 3]);
        tally.record(vec![4, 5, 6]);

        assert_eq!(tally.top(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_empty_tally_has_no_top() {
        assert_eq!(BuildTally::default().top(), None);
    }
}
