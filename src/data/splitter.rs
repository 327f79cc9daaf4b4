// ============================================================
// Layer 4 — Train/Validation/Test Splitter
// ============================================================
// Randomly shuffles one class's items and cuts the shuffled list
// into three contiguous blocks:
//   - train: floor(n * ratios.train)
//   - val:   floor(n * ratios.val)
//   - test:  everything left over
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
// The RNG is passed in so callers decide between a fresh
// thread_rng (a new split every run) and a seeded StdRng
// (a reproducible split).
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{seq::SliceRandom, Rng};

use crate::domain::split::{SplitAssignment, SplitRatios};

/// Shuffle `items` and split them into (train, val, test).
///
/// # Example
/// ```ignore
/// let split = split_three_way(images, &SplitRatios::default(), &mut rand::thread_rng());
/// // 10 images → 8 train, 1 val, 1 test
/// ```
pub fn split_three_way<T, R: Rng + ?Sized>(
    mut items: Vec<T>,
    ratios:    &SplitRatios,
    rng:       &mut R,
) -> SplitAssignment<T> {
    // Every permutation is equally likely
    items.shuffle(rng);

    let split = SplitAssignment::from_ordered(items, ratios);

    tracing::debug!(
        "Split: {} train, {} val, {} test",
        split.train.len(),
        split.val.len(),
        split.test.len(),
    );

    split
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let split = split_three_way(items, &SplitRatios::default(), &mut rand::thread_rng());
        assert_eq!(split.train.len(), 80);
        assert_eq!(split.val.len(),   10);
        assert_eq!(split.test.len(),  10);
    }

    #[test]
    fn test_all_items_preserved_and_disjoint() {
        let items: Vec<usize> = (0..57).collect();
        let split = split_three_way(items, &SplitRatios::default(), &mut rand::thread_rng());
        assert_eq!(split.total(), 57);

        let train: HashSet<_> = split.train.iter().collect();
        let val:   HashSet<_> = split.val.iter().collect();
        let test:  HashSet<_> = split.test.iter().collect();
        assert!(train.is_disjoint(&val));
        assert!(train.is_disjoint(&test));
        assert!(val.is_disjoint(&test));

        let mut all: Vec<usize> = split.train.iter()
            .chain(&split.val)
            .chain(&split.test)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..57).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_dataset() {
        let split = split_three_way(Vec::<usize>::new(), &SplitRatios::default(), &mut rand::thread_rng());
        assert!(split.train.is_empty());
        assert!(split.val.is_empty());
        assert!(split.test.is_empty());
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let a = split_three_way((0..40).collect::<Vec<u32>>(), &SplitRatios::default(), &mut StdRng::seed_from_u64(7));
        let b = split_three_way((0..40).collect::<Vec<u32>>(), &SplitRatios::default(), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_reshuffle() {
        let a = split_three_way((0..40).collect::<Vec<u32>>(), &SplitRatios::default(), &mut StdRng::seed_from_u64(1));
        let b = split_three_way((0..40).collect::<Vec<u32>>(), &SplitRatios::default(), &mut StdRng::seed_from_u64(2));
        assert_ne!(a.train, b.train);
        assert_eq!(a.train.len(), b.train.len());
    }
}
