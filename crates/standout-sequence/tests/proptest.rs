//! Property-based tests for sequence operators using proptest.

use proptest::prelude::*;
use standout_sequence::from;

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Tagged {
    key: u8,
    minor: u8,
    arrival: usize,
}

// Items whose arrival index exposes any reordering among equal keys.
fn tagged_strategy() -> impl Strategy<Value = Vec<Tagged>> {
    prop::collection::vec((0u8..5, 0u8..5), 0..60).prop_map(|pairs| {
        pairs
            .into_iter()
            .enumerate()
            .map(|(arrival, (key, minor))| Tagged { key, minor, arrival })
            .collect()
    })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// select matches an elementwise map.
    #[test]
    fn select_is_elementwise_map(items in prop::collection::vec(any::<i32>(), 0..100)) {
        let mapped = from(items.clone()).select(|n| n.wrapping_mul(3)).to_vec();
        let expected: Vec<i32> = items.iter().map(|n| n.wrapping_mul(3)).collect();
        prop_assert_eq!(mapped, expected);
    }

    /// filter keeps relative order; an always-true predicate keeps everything.
    #[test]
    fn filter_matches_std_filter(
        items in prop::collection::vec(any::<i16>(), 0..100),
        modulus in 1i16..10,
    ) {
        let filtered = from(items.clone()).filter(|n| n % modulus == 0).to_vec();
        let expected: Vec<i16> = items.iter().copied().filter(|n| n % modulus == 0).collect();
        prop_assert_eq!(filtered, expected);
        prop_assert_eq!(from(items.clone()).filter(|_| true).to_vec(), items);
    }

    /// distinct is idempotent.
    #[test]
    fn distinct_is_idempotent(items in prop::collection::vec(0u8..20, 0..100)) {
        let once = from(items.clone()).distinct().to_vec();
        let twice = from(items).distinct().distinct().to_vec();
        prop_assert_eq!(once, twice);
    }

    /// order_by is sorted and stable.
    #[test]
    fn order_by_is_sorted_and_stable(items in tagged_strategy()) {
        let sorted = from(items.clone()).order_by(|t| t.key).to_vec();
        prop_assert_eq!(sorted.len(), items.len());
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].key <= pair[1].key);
            if pair[0].key == pair[1].key {
                prop_assert!(pair[0].arrival < pair[1].arrival);
            }
        }
    }

    /// then_by only reorders items that tie on the primary key.
    #[test]
    fn then_by_refines_ties(items in tagged_strategy()) {
        let sorted = from(items.clone())
            .order_by(|t| t.key)
            .then_by_descending(|t| t.minor)
            .to_vec();
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].key <= pair[1].key);
            if pair[0].key == pair[1].key {
                prop_assert!(pair[0].minor >= pair[1].minor);
                if pair[0].minor == pair[1].minor {
                    prop_assert!(pair[0].arrival < pair[1].arrival);
                }
            }
        }

        let primary_only: Vec<u8> = from(items)
            .order_by(|t| t.key)
            .into_seq()
            .select(|t| t.key)
            .to_vec();
        let refined: Vec<u8> = sorted.iter().map(|t| t.key).collect();
        prop_assert_eq!(primary_only, refined);
    }

    /// take and skip split the sequence without losing items.
    #[test]
    fn take_skip_reconstruct(
        items in prop::collection::vec(any::<i32>(), 0..50),
        n in 0usize..60,
    ) {
        let head = from(items.clone()).take(n).to_vec();
        let tail = from(items.clone()).skip(n).to_vec();
        prop_assert_eq!(head.len(), n.min(items.len()));
        let mut rebuilt = head;
        rebuilt.extend(tail);
        prop_assert_eq!(rebuilt, items);
    }

    /// Flattened groups are a permutation grouped contiguously in first-seen
    /// key order, with items in original relative order.
    #[test]
    fn group_by_flattens_to_grouped_permutation(items in tagged_strategy()) {
        let flat = from(items.clone())
            .group_by(|t| t.key)
            .select_many(|g| g)
            .to_vec();
        prop_assert_eq!(flat.len(), items.len());

        let mut first_seen: Vec<u8> = Vec::new();
        for t in &items {
            if !first_seen.contains(&t.key) {
                first_seen.push(t.key);
            }
        }
        let expected: Vec<Tagged> = first_seen
            .iter()
            .flat_map(|k| items.iter().filter(move |t| t.key == *k).cloned())
            .collect();
        prop_assert_eq!(flat, expected);
    }

    /// zip yields as many results as the shorter side.
    #[test]
    fn zip_length_is_shorter_side(
        left in prop::collection::vec(any::<i16>(), 0..30),
        right in prop::collection::vec(any::<i16>(), 0..30),
    ) {
        let zipped = from(left.clone()).zip_pairs(right.clone()).count();
        prop_assert_eq!(zipped, left.len().min(right.len()));
    }

    /// sum and count agree with std on non-empty input.
    #[test]
    fn sum_matches_std(items in prop::collection::vec(-1000i64..1000, 1..50)) {
        let sum = from(items.clone()).sum().value();
        prop_assert_eq!(sum, Some(items.iter().sum::<i64>()));
        prop_assert_eq!(from(items.clone()).count(), items.len());
    }
}
