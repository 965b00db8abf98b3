//! Terminal operators: lookups, quantifiers, aggregates, materialization,
//! comparison and per-item actions.
//!
//! These drive the sequence and return a plain value. Lookups without a
//! match report [`SeqError::NotFound`]; their `_or_default` forms return
//! [`Found::NotFound`] instead. Numeric aggregates over an empty sequence
//! return [`Aggregate::Empty`].

use std::hash::Hash;
use std::ops::{Add, Mul};

use indexmap::IndexMap;
use num_traits::ToPrimitive;

use crate::error::{AggregateError, ItemFailure, Result, SeqError};
use crate::grouping::Grouping;
use crate::outcome::{Aggregate, Found};
use crate::seq::{IntoSeq, Seq};

impl<'a, T: 'a> Seq<'a, T> {
    // ========================================================================
    // first / last / single
    // ========================================================================

    /// The first item.
    pub fn first(self) -> Result<T> {
        self.first_where(|_| true)
    }

    /// The first item matching `predicate`. Stops at the match.
    pub fn first_where<P>(self, predicate: P) -> Result<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.first_or_default_where(predicate)
            .item()
            .ok_or_else(|| SeqError::not_found("first"))
    }

    /// The first item, or [`Found::NotFound`].
    pub fn first_or_default(self) -> Found<T> {
        self.first_or_default_where(|_| true)
    }

    /// The first item matching `predicate`, or [`Found::NotFound`].
    pub fn first_or_default_where<P>(mut self, mut predicate: P) -> Found<T>
    where
        P: FnMut(&T) -> bool,
    {
        while let Some(item) = self.pull() {
            if predicate(&item) {
                return Found::Item(item);
            }
        }
        Found::NotFound
    }

    /// The first item, or `default`.
    pub fn first_or(self, default: T) -> T {
        self.first_or_default().unwrap_or(default)
    }

    /// The last item.
    pub fn last(self) -> Result<T> {
        self.last_where(|_| true)
    }

    /// The last item matching `predicate`. Always scans to the end.
    pub fn last_where<P>(self, predicate: P) -> Result<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.last_or_default_where(predicate)
            .item()
            .ok_or_else(|| SeqError::not_found("last"))
    }

    /// The last item, or [`Found::NotFound`].
    pub fn last_or_default(self) -> Found<T> {
        self.last_or_default_where(|_| true)
    }

    /// The last item matching `predicate`, or [`Found::NotFound`].
    pub fn last_or_default_where<P>(mut self, mut predicate: P) -> Found<T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut found = Found::NotFound;
        while let Some(item) = self.pull() {
            if predicate(&item) {
                found = Found::Item(item);
            }
        }
        found
    }

    /// The last item, or `default`.
    pub fn last_or(self, default: T) -> T {
        self.last_or_default().unwrap_or(default)
    }

    /// The only item.
    ///
    /// Fails with [`SeqError::NotFound`] on an empty sequence and with
    /// [`SeqError::MultipleMatches`] if there is more than one item.
    pub fn single(self) -> Result<T> {
        self.single_where(|_| true)
    }

    /// The only item matching `predicate`. Scans to the end, since a second
    /// match can appear anywhere.
    pub fn single_where<P>(self, predicate: P) -> Result<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.single_or_default_where(predicate)?
            .item()
            .ok_or_else(|| SeqError::not_found("single"))
    }

    /// The only item, or [`Found::NotFound`] if there is none.
    ///
    /// Still fails with [`SeqError::MultipleMatches`] if there are several.
    pub fn single_or_default(self) -> Result<Found<T>> {
        self.single_or_default_where(|_| true)
    }

    /// The only item matching `predicate`, or [`Found::NotFound`].
    pub fn single_or_default_where<P>(mut self, mut predicate: P) -> Result<Found<T>>
    where
        P: FnMut(&T) -> bool,
    {
        let mut found = Found::NotFound;
        while let Some(item) = self.pull() {
            if predicate(&item) {
                if found.is_found() {
                    return Err(SeqError::multiple("single"));
                }
                found = Found::Item(item);
            }
        }
        Ok(found)
    }

    /// The only item, or `default` if there is none.
    pub fn single_or(self, default: T) -> Result<T> {
        Ok(self.single_or_default()?.unwrap_or(default))
    }

    // ========================================================================
    // Positional lookups
    // ========================================================================

    /// The item at zero-based `index`.
    pub fn element_at(self, index: usize) -> Result<T> {
        self.element_at_or_default(index)
            .item()
            .ok_or_else(|| SeqError::not_found("element_at"))
    }

    /// The item at zero-based `index`, or [`Found::NotFound`].
    pub fn element_at_or_default(mut self, index: usize) -> Found<T> {
        let mut position = 0;
        while let Some(item) = self.pull() {
            if position == index {
                return Found::Item(item);
            }
            position += 1;
        }
        Found::NotFound
    }

    /// The item at zero-based `index`, or `default`.
    pub fn element_at_or(self, index: usize, default: T) -> T {
        self.element_at_or_default(index).unwrap_or(default)
    }

    /// Index of the first item matching `predicate`.
    pub fn index_of<P>(mut self, mut predicate: P) -> Found<usize>
    where
        P: FnMut(&T) -> bool,
    {
        let mut position = 0;
        while let Some(item) = self.pull() {
            if predicate(&item) {
                return Found::Item(position);
            }
            position += 1;
        }
        Found::NotFound
    }

    /// Index of the first item equal to `needle`.
    pub fn index_of_item(self, needle: &T) -> Found<usize>
    where
        T: PartialEq,
    {
        self.index_of(|item| item == needle)
    }

    // ========================================================================
    // Counting and quantifiers
    // ========================================================================

    /// Number of items.
    ///
    /// Sequences that know their length (indexed collections, bounded
    /// factories) answer without pulling.
    pub fn count(mut self) -> usize {
        if let Some(remaining) = self.remaining() {
            return remaining;
        }
        let mut count = 0;
        while self.pull().is_some() {
            count += 1;
        }
        count
    }

    /// Number of items matching `predicate`.
    pub fn count_where<P>(mut self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let mut count = 0;
        while let Some(item) = self.pull() {
            if predicate(&item) {
                count += 1;
            }
        }
        count
    }

    /// Returns `true` if the sequence has at least one item.
    pub fn any(mut self) -> bool {
        self.pull().is_some()
    }

    /// Returns `true` if some item matches. Stops at the first match.
    pub fn any_where<P>(self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.first_or_default_where(predicate).is_found()
    }

    /// Returns `true` if every item matches. Stops at the first miss.
    pub fn all<P>(self, mut predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        !self.any_where(|item| !predicate(item))
    }

    /// Returns `true` if some item equals `needle`.
    pub fn contains(self, needle: &T) -> bool
    where
        T: PartialEq,
    {
        self.any_where(|item| item == needle)
    }

    // ========================================================================
    // Aggregates
    // ========================================================================

    /// Left fold starting at `seed`.
    pub fn aggregate<A, F>(mut self, seed: A, mut fold: F) -> A
    where
        F: FnMut(A, T) -> A,
    {
        let mut acc = seed;
        while let Some(item) = self.pull() {
            acc = fold(acc, item);
        }
        acc
    }

    /// Left fold starting at `seed`, finished by `result`.
    pub fn aggregate_with<A, R, F, S>(self, seed: A, fold: F, result: S) -> R
    where
        F: FnMut(A, T) -> A,
        S: FnOnce(A) -> R,
    {
        result(self.aggregate(seed, fold))
    }

    /// Left fold seeded with the first item. [`Aggregate::Empty`] when there
    /// is no item.
    pub fn reduce<F>(self, mut fold: F) -> Aggregate<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.aggregate(Aggregate::Empty, |acc, item| acc.fold_with(item, &mut fold))
    }

    /// Sum of all items, or [`Aggregate::Empty`].
    pub fn sum(self) -> Aggregate<T>
    where
        T: Add<Output = T>,
    {
        self.reduce(|a, b| a + b)
    }

    /// Product of all items, or [`Aggregate::Empty`].
    pub fn product(self) -> Aggregate<T>
    where
        T: Mul<Output = T>,
    {
        self.reduce(|a, b| a * b)
    }

    /// Arithmetic mean, or [`Aggregate::Empty`].
    ///
    /// Items with no `f64` representation count as NaN.
    pub fn average(self) -> Aggregate<f64>
    where
        T: ToPrimitive,
    {
        let totals = self
            .select(|item| (item.to_f64().unwrap_or(f64::NAN), 1usize))
            .reduce(|(sum, n), (value, one)| (sum + value, n + one));
        totals.map(|(sum, n)| sum / n as f64)
    }

    /// Largest item, or [`Aggregate::Empty`]. The first of equal maxima wins.
    pub fn max(self) -> Aggregate<T>
    where
        T: PartialOrd,
    {
        self.reduce(|best, item| if item > best { item } else { best })
    }

    /// Smallest item, or [`Aggregate::Empty`]. The first of equal minima wins.
    pub fn min(self) -> Aggregate<T>
    where
        T: PartialOrd,
    {
        self.reduce(|best, item| if item < best { item } else { best })
    }

    /// Largest value selected from the items.
    pub fn max_of<K, F>(self, selector: F) -> Aggregate<K>
    where
        K: PartialOrd + 'a,
        F: FnMut(T) -> K + 'a,
    {
        self.select(selector).max()
    }

    /// Smallest value selected from the items.
    pub fn min_of<K, F>(self, selector: F) -> Aggregate<K>
    where
        K: PartialOrd + 'a,
        F: FnMut(T) -> K + 'a,
    {
        self.select(selector).min()
    }

    /// Largest selected value under `cmp`.
    pub fn max_with<K, F, C>(self, selector: F, cmp: C) -> Aggregate<K>
    where
        K: 'a,
        F: FnMut(T) -> K + 'a,
        C: Fn(&K, &K) -> std::cmp::Ordering,
    {
        self.select(selector)
            .reduce(|best, item| if cmp(&item, &best).is_gt() { item } else { best })
    }

    /// Smallest selected value under `cmp`.
    pub fn min_with<K, F, C>(self, selector: F, cmp: C) -> Aggregate<K>
    where
        K: 'a,
        F: FnMut(T) -> K + 'a,
        C: Fn(&K, &K) -> std::cmp::Ordering,
    {
        self.select(selector)
            .reduce(|best, item| if cmp(&item, &best).is_lt() { item } else { best })
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Collects every item into a vector.
    pub fn to_vec(self) -> Vec<T> {
        self.collect()
    }

    /// Collects items into a map keyed by position.
    pub fn to_map(self) -> IndexMap<usize, T> {
        self.enumerate().collect()
    }

    /// Collects items into a map keyed by `key`.
    ///
    /// On duplicate keys the later item overwrites the earlier one, keeping
    /// the key's original position.
    pub fn to_map_by<K, F>(self, mut key: F) -> IndexMap<K, T>
    where
        K: Hash + Eq,
        F: FnMut(&T) -> K,
    {
        let mut map = IndexMap::new();
        for item in self {
            map.insert(key(&item), item);
        }
        map
    }

    /// Collects items into groupings keyed by `key`, in first-seen key order.
    pub fn to_lookup<K, F>(self, mut key: F) -> IndexMap<K, Grouping<K, T>>
    where
        K: Hash + Eq + Clone,
        F: FnMut(&T) -> K,
    {
        let mut buckets: IndexMap<K, Vec<T>> = IndexMap::new();
        for item in self {
            buckets.entry(key(&item)).or_default().push(item);
        }
        buckets
            .into_iter()
            .map(|(k, items)| (k.clone(), Grouping::new(k, items)))
            .collect()
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Returns `true` if both sequences have equal items in the same order
    /// and end together.
    pub fn sequence_equal<U, S>(self, other: S) -> bool
    where
        T: PartialEq<U>,
        U: 'a,
        S: IntoSeq<'a, Item = U>,
    {
        self.sequence_equal_with(other, |a, b| a == b)
    }

    /// [`sequence_equal`](Seq::sequence_equal) with a custom comparer.
    pub fn sequence_equal_with<U, S, E>(mut self, other: S, eq: E) -> bool
    where
        U: 'a,
        S: IntoSeq<'a, Item = U>,
        E: Fn(&T, &U) -> bool,
    {
        let mut other = other.into_seq();
        loop {
            match (self.pull(), other.pull()) {
                (None, None) => return true,
                (Some(a), Some(b)) if eq(&a, &b) => continue,
                _ => return false,
            }
        }
    }

    // ========================================================================
    // Per-item actions
    // ========================================================================

    /// Calls `action` with every item and its index.
    pub fn each<F>(mut self, mut action: F)
    where
        F: FnMut(T, usize),
    {
        let mut index = 0;
        while let Some(item) = self.pull() {
            action(item, index);
            index += 1;
        }
    }

    /// Calls `action` with every item and its index, stopping at the first
    /// failure.
    pub fn try_each<E, F>(mut self, mut action: F) -> std::result::Result<(), ItemFailure<E>>
    where
        F: FnMut(T, usize) -> std::result::Result<(), E>,
    {
        let mut index = 0;
        while let Some(item) = self.pull() {
            action(item, index).map_err(|err| ItemFailure::new(index, err))?;
            index += 1;
        }
        Ok(())
    }

    /// Calls `action` with every item and its index, continuing past
    /// failures. Every failure is reported together once the pass is done.
    pub fn each_all<E, F>(mut self, mut action: F) -> std::result::Result<(), AggregateError<E>>
    where
        F: FnMut(T, usize) -> std::result::Result<(), E>,
    {
        let mut failures = Vec::new();
        let mut index = 0;
        while let Some(item) = self.pull() {
            if let Err(err) = action(item, index) {
                failures.push(ItemFailure::new(index, err));
            }
            index += 1;
        }
        if failures.is_empty() {
            Ok(())
        } else {
            log::debug!("each_all collected {} failure(s)", failures.len());
            Err(AggregateError::new(failures))
        }
    }

    /// Checks `predicate` on every item, failing at the first item that
    /// does not satisfy it.
    pub fn assert_each<P>(self, mut predicate: P, message: &str) -> Result<()>
    where
        P: FnMut(&T) -> bool,
    {
        self.try_each(|item, index| {
            if predicate(&item) {
                Ok(())
            } else {
                Err(SeqError::AssertionFailed {
                    index,
                    message: message.to_string(),
                })
            }
        })
        .map_err(|failure| failure.source)
    }

    /// Checks `predicate` on every item and reports every item that does not
    /// satisfy it, labelled with `message`.
    pub fn assert_all<P>(
        self,
        mut predicate: P,
        message: &str,
    ) -> std::result::Result<(), AggregateError<SeqError>>
    where
        P: FnMut(&T) -> bool,
    {
        self.each_all(|item, index| {
            if predicate(&item) {
                Ok(())
            } else {
                Err(SeqError::AssertionFailed {
                    index,
                    message: message.to_string(),
                })
            }
        })
        .map_err(|err| {
            AggregateError::new(
                err.into_failures()
                    .into_iter()
                    .map(|failure| failure.with_label(message))
                    .collect(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from;

    #[test]
    fn first_variants() {
        assert_eq!(from(vec![4, 5, 6]).first(), Ok(4));
        assert_eq!(from(vec![4, 5, 6]).first_where(|n| n % 5 == 0), Ok(5));
        assert!(from(vec![4, 6]).first_where(|n| *n > 9).unwrap_err().is_not_found());
        assert_eq!(crate::empty::<i32>().first_or_default(), Found::NotFound);
        assert_eq!(crate::empty::<i32>().first_or(3), 3);
    }

    #[test]
    fn first_stops_at_match() {
        use std::cell::Cell;
        let pulled = Cell::new(0);
        let found = from(vec![1, 2, 3, 4])
            .inspect(|_| pulled.set(pulled.get() + 1))
            .first_where(|n| *n == 2);
        assert_eq!(found, Ok(2));
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn last_variants() {
        assert_eq!(from(vec![1, 2, 3]).last(), Ok(3));
        assert_eq!(from(vec![1, 2, 3, 4]).last_where(|n| n % 2 == 1), Ok(3));
        assert_eq!(
            from(vec![1, 3]).last_or_default_where(|n| n % 2 == 0),
            Found::NotFound
        );
        assert_eq!(crate::empty::<i32>().last_or(8), 8);
        assert_eq!(
            crate::empty::<i32>().last(),
            Err(SeqError::NotFound { operation: "last" })
        );
    }

    #[test]
    fn single_variants() {
        assert_eq!(from(vec![7]).single(), Ok(7));
        assert_eq!(
            from(vec![7, 8]).single(),
            Err(SeqError::MultipleMatches { operation: "single" })
        );
        assert_eq!(
            crate::empty::<i32>().single(),
            Err(SeqError::NotFound { operation: "single" })
        );
        assert_eq!(from(vec![1, 2, 3]).single_where(|n| *n == 2), Ok(2));
        assert_eq!(crate::empty::<i32>().single_or_default(), Ok(Found::NotFound));
        assert!(from(vec![1, 1]).single_or_default().is_err());
        assert_eq!(crate::empty::<i32>().single_or(4), Ok(4));
    }

    #[test]
    fn single_detects_late_duplicate() {
        let result = from(vec![2, 1, 3, 4, 5, 2]).single_where(|n| *n == 2);
        assert!(matches!(result, Err(SeqError::MultipleMatches { .. })));
    }

    #[test]
    fn element_at_variants() {
        assert_eq!(from(vec!['a', 'b', 'c']).element_at(1), Ok('b'));
        assert!(from(vec!['a']).element_at(1).unwrap_err().is_not_found());
        assert_eq!(from(vec!['a']).element_at_or_default(5), Found::NotFound);
        assert_eq!(from(vec!['a']).element_at_or(5, 'z'), 'z');
    }

    #[test]
    fn index_of_variants() {
        assert_eq!(from(vec![5, 6, 7]).index_of(|n| *n > 5), Found::Item(1));
        assert_eq!(from(vec![5, 6, 7]).index_of_item(&7), Found::Item(2));
        assert_eq!(from(vec![5]).index_of_item(&1), Found::NotFound);
    }

    #[test]
    fn count_and_quantifiers() {
        assert_eq!(from(vec![1, 2, 3]).count(), 3);
        assert_eq!(Seq::from_iterator(0..4).count(), 4);
        assert_eq!(from(vec![1, 2, 3]).count_where(|n| *n > 1), 2);
        assert!(from(vec![1]).any());
        assert!(!crate::empty::<i32>().any());
        assert!(from(vec![1, 2]).any_where(|n| *n == 2));
        assert!(from(vec![2, 4]).all(|n| n % 2 == 0));
        assert!(crate::empty::<i32>().all(|_| false));
        assert!(from(vec![1, 2]).contains(&2));
    }

    #[test]
    fn count_uses_remaining_after_partial_pull() {
        let mut seq = from(vec![1, 2, 3]);
        seq.pull();
        assert_eq!(seq.count(), 2);
    }

    #[test]
    fn aggregates() {
        assert_eq!(from(vec![1, 2, 3]).aggregate(10, |acc, n| acc + n), 16);
        assert_eq!(
            from(vec!["a", "b"]).aggregate_with(String::new(), |acc, s| acc + s, |s| s.len()),
            2
        );
        assert_eq!(from(vec![1, 2, 3, 4]).sum(), Aggregate::Value(10));
        assert_eq!(from(vec![1, 2, 3, 4]).product(), Aggregate::Value(24));
        assert_eq!(from(vec![1, 2, 3, 4]).average(), Aggregate::Value(2.5));
        assert_eq!(from(vec![3, 9, 2]).max(), Aggregate::Value(9));
        assert_eq!(from(vec![3, 9, 2]).min(), Aggregate::Value(2));
        assert_eq!(from(vec!["bb", "a"]).max_of(|s| s.len()), Aggregate::Value(2));
        assert_eq!(from(vec!["bb", "a"]).min_of(|s| s.len()), Aggregate::Value(1));
    }

    #[test]
    fn empty_aggregates_are_sentinel() {
        assert!(crate::empty::<i32>().sum().is_empty());
        assert!(crate::empty::<i32>().product().is_empty());
        assert!(crate::empty::<i32>().average().is_empty());
        assert!(crate::empty::<i32>().max().is_empty());
        assert!(crate::empty::<i32>().min().is_empty());
        assert_ne!(crate::empty::<i32>().sum(), Aggregate::Value(0));
    }

    #[test]
    fn max_with_custom_comparer() {
        let longest = from(vec!["aa", "b", "cc"]).max_with(|s| s, |a, b| a.len().cmp(&b.len()));
        assert_eq!(longest, Aggregate::Value("aa"));
        let shortest = from(vec!["aa", "b", "c"]).min_with(|s| s, |a, b| a.len().cmp(&b.len()));
        assert_eq!(shortest, Aggregate::Value("b"));
    }

    #[test]
    fn maps_and_lookups() {
        let by_index = from(vec!['x', 'y']).to_map();
        assert_eq!(by_index.get(&1), Some(&'y'));

        let by_len = from(vec!["a", "bb", "c"]).to_map_by(|s| s.len());
        assert_eq!(by_len.len(), 2);
        assert_eq!(by_len[&1], "c");
        assert_eq!(by_len.keys().copied().collect::<Vec<_>>(), vec![1, 2]);

        let lookup = from(vec!["a", "bb", "c"]).to_lookup(|s| s.len());
        assert_eq!(lookup[&1].items(), &["a", "c"]);
        assert_eq!(lookup[&2].key(), &2);
    }

    #[test]
    fn sequence_equality() {
        assert!(from(vec![1, 2]).sequence_equal(vec![1, 2]));
        assert!(!from(vec![1, 2]).sequence_equal(vec![1, 2, 3]));
        assert!(!from(vec![1, 2, 3]).sequence_equal(vec![1, 2]));
        assert!(!from(vec![1, 3]).sequence_equal(vec![1, 2]));
        assert!(from("AB").sequence_equal_with("ab", |a, b| a.eq_ignore_ascii_case(b)));
    }

    #[test]
    fn each_passes_index() {
        let mut seen = Vec::new();
        from(vec!['a', 'b']).each(|c, i| seen.push((c, i)));
        assert_eq!(seen, vec![('a', 0), ('b', 1)]);
    }

    #[test]
    fn try_each_stops_at_first_failure() {
        let mut visited = 0;
        let result = from(vec![1, 2, 3, 4]).try_each(|n, _| {
            visited += 1;
            if n == 2 {
                Err("two")
            } else {
                Ok(())
            }
        });
        let failure = result.unwrap_err();
        assert_eq!(failure.index, 1);
        assert_eq!(failure.source, "two");
        assert_eq!(visited, 2);
    }

    #[test]
    fn each_all_collects_every_failure() {
        let mut visited = 0;
        let result = from(vec![1, 2, 3, 4]).each_all(|n, _| {
            visited += 1;
            if n % 2 == 0 {
                Err(format!("{} is even", n))
            } else {
                Ok(())
            }
        });
        assert_eq!(visited, 4);
        let err = result.unwrap_err();
        let indexes: Vec<usize> = err.failures().iter().map(|f| f.index).collect();
        assert_eq!(indexes, vec![1, 3]);
        assert_eq!(
            err.to_string(),
            "2 item(s) failed\n[0] at index 1: 2 is even\n[1] at index 3: 4 is even"
        );
        assert!(from(vec![1, 3]).each_all(|_, _| Ok::<(), String>(())).is_ok());
    }

    #[test]
    fn asserts() {
        assert!(from(vec![2, 4]).assert_each(|n| n % 2 == 0, "even").is_ok());
        assert_eq!(
            from(vec![2, 3, 5]).assert_each(|n| n % 2 == 0, "even"),
            Err(SeqError::AssertionFailed {
                index: 1,
                message: "even".to_string()
            })
        );

        let err = from(vec![2, 3, 5])
            .assert_all(|n| n % 2 == 0, "even")
            .unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.failures()[1].index, 2);
        assert_eq!(err.failures()[1].label.as_deref(), Some("even"));
    }
}
