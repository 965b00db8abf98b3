//! Sorting: [`Dir`], [`OrderedSeq`] and the `order_*` / `then_by*` operators.
//!
//! Sorting materializes the upstream on the first pull, decorates every item
//! with its key for each sort level, and runs one stable sort over the
//! decorated items with a composite comparer: primary level first, later
//! levels only to break ties. `then_by` adds a level and sorts the original
//! item list again; it never re-sorts an already sorted output.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::seq::{IntoSeq, Seq};
use crate::source::Source;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Compares `a` and `b` with `cmp` in this direction.
    ///
    /// Descending swaps the arguments rather than reversing the result, so
    /// an asymmetric comparer behaves exactly as it would when called
    /// directly with the operands exchanged.
    pub fn compare<K, C>(self, cmp: &C, a: &K, b: &K) -> Ordering
    where
        K: ?Sized,
        C: Fn(&K, &K) -> Ordering + ?Sized,
    {
        match self {
            Dir::Asc => cmp(a, b),
            Dir::Desc => cmp(b, a),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Natural ordering for partially ordered keys.
///
/// Incomparable pairs (NaN) compare as equal, so the stable sort leaves them
/// in source order.
pub fn partial_order<K: PartialOrd + ?Sized>(a: &K, b: &K) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// One sort level over a decorated item list.
trait SortLevel<T> {
    /// Computes this level's key for every item.
    fn decorate(&mut self, items: &[T]);

    /// Compares the items at positions `a` and `b`.
    fn compare(&self, items: &[T], a: usize, b: usize) -> Ordering;
}

/// Sort level comparing a selected key.
struct KeyLevel<K, F, C> {
    key: F,
    cmp: C,
    dir: Dir,
    keys: Vec<K>,
}

impl<T, K, F, C> SortLevel<T> for KeyLevel<K, F, C>
where
    F: FnMut(&T) -> K,
    C: Fn(&K, &K) -> Ordering,
{
    fn decorate(&mut self, items: &[T]) {
        self.keys = items.iter().map(&mut self.key).collect();
    }

    fn compare(&self, _items: &[T], a: usize, b: usize) -> Ordering {
        self.dir.compare(&self.cmp, &self.keys[a], &self.keys[b])
    }
}

/// Sort level comparing the items themselves.
struct ItemLevel<C> {
    cmp: C,
    dir: Dir,
}

impl<T, C> SortLevel<T> for ItemLevel<C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn decorate(&mut self, _items: &[T]) {}

    fn compare(&self, items: &[T], a: usize, b: usize) -> Ordering {
        self.dir.compare(&self.cmp, &items[a], &items[b])
    }
}

/// A sequence with a pending sort.
///
/// Produced by the `order*` operators. Further levels are added with
/// [`then_by`](OrderedSeq::then_by) and friends. An `OrderedSeq` cannot be
/// pulled itself: [`into_seq`](OrderedSeq::into_seq), [`to_vec`](OrderedSeq::to_vec)
/// or [`from`](crate::from) consume it, so every level is in place before
/// the sort runs. The sort happens on the first pull of the resulting
/// sequence, over the original item list, with every level at once.
pub struct OrderedSeq<'a, T> {
    source: Seq<'a, T>,
    levels: Vec<Box<dyn SortLevel<T> + 'a>>,
}

impl<'a, T: 'a> OrderedSeq<'a, T> {
    fn new(source: Seq<'a, T>, level: Box<dyn SortLevel<T> + 'a>) -> Self {
        OrderedSeq {
            source,
            levels: vec![level],
        }
    }

    fn with_level(mut self, level: Box<dyn SortLevel<T> + 'a>) -> Self {
        self.levels.push(level);
        self
    }

    /// Breaks ties by `key`, ascending.
    pub fn then_by<K, F>(self, key: F) -> Self
    where
        K: Ord + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.then_by_with(key, K::cmp, Dir::Asc)
    }

    /// Breaks ties by `key`, descending.
    pub fn then_by_descending<K, F>(self, key: F) -> Self
    where
        K: Ord + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.then_by_with(key, K::cmp, Dir::Desc)
    }

    /// Breaks ties by `key`, compared with `cmp` in direction `dir`.
    pub fn then_by_with<K, F, C>(self, key: F, cmp: C, dir: Dir) -> Self
    where
        K: 'a,
        F: FnMut(&T) -> K + 'a,
        C: Fn(&K, &K) -> Ordering + 'a,
    {
        self.with_level(Box::new(KeyLevel {
            key,
            cmp,
            dir,
            keys: Vec::new(),
        }))
    }

    /// Number of sort levels.
    pub fn levels(&self) -> usize {
        self.levels.len()
    }

    /// Converts into a plain sequence. The sort runs on its first pull.
    pub fn into_seq(self) -> Seq<'a, T> {
        Seq::new(Sorted {
            pending: Some(self),
            sorted: None,
        })
    }

    /// Sorts and collects every item.
    pub fn to_vec(self) -> Vec<T> {
        self.into_seq().to_vec()
    }

    fn sort(self) -> Vec<T> {
        let OrderedSeq { source, mut levels } = self;
        let items: Vec<T> = source.collect();
        for level in levels.iter_mut() {
            level.decorate(&items);
        }
        let mut order: Vec<usize> = (0..items.len()).collect();
        order.sort_by(|&a, &b| {
            levels
                .iter()
                .map(|level| level.compare(&items, a, b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        log::debug!(
            "sorted {} items over {} level(s)",
            items.len(),
            levels.len()
        );

        let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect()
    }
}

/// Source behind [`OrderedSeq::into_seq`]: holds the pending sort until the
/// first pull, then hands out the sorted items.
struct Sorted<'a, T> {
    pending: Option<OrderedSeq<'a, T>>,
    sorted: Option<std::vec::IntoIter<T>>,
}

impl<'a, T: 'a> Source for Sorted<'a, T> {
    type Item = T;

    fn pull(&mut self) -> Option<T> {
        if let Some(ordered) = self.pending.take() {
            self.sorted = Some(ordered.sort().into_iter());
        }
        self.sorted.as_mut()?.next()
    }

    fn remaining(&self) -> Option<usize> {
        self.sorted.as_ref().map(|sorted| sorted.len())
    }
}

impl<'a, T: 'a> IntoSeq<'a> for OrderedSeq<'a, T> {
    type Item = T;

    fn into_seq(self) -> Seq<'a, T> {
        OrderedSeq::into_seq(self)
    }
}

impl<'a, T: 'a> From<OrderedSeq<'a, T>> for Seq<'a, T> {
    fn from(ordered: OrderedSeq<'a, T>) -> Self {
        ordered.into_seq()
    }
}

impl<'a, T: 'a> Seq<'a, T> {
    /// Sorts items by their natural order.
    pub fn order(self) -> OrderedSeq<'a, T>
    where
        T: Ord,
    {
        self.order_with(T::cmp, Dir::Asc)
    }

    /// Sorts items by their natural order, largest first.
    pub fn order_descending(self) -> OrderedSeq<'a, T>
    where
        T: Ord,
    {
        self.order_with(T::cmp, Dir::Desc)
    }

    /// Sorts items with `cmp` in direction `dir`.
    pub fn order_with<C>(self, cmp: C, dir: Dir) -> OrderedSeq<'a, T>
    where
        C: Fn(&T, &T) -> Ordering + 'a,
    {
        OrderedSeq::new(self, Box::new(ItemLevel { cmp, dir }))
    }

    /// Sorts items by `key`, ascending.
    pub fn order_by<K, F>(self, key: F) -> OrderedSeq<'a, T>
    where
        K: Ord + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.order_by_with(key, K::cmp, Dir::Asc)
    }

    /// Sorts items by `key`, descending.
    pub fn order_by_descending<K, F>(self, key: F) -> OrderedSeq<'a, T>
    where
        K: Ord + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.order_by_with(key, K::cmp, Dir::Desc)
    }

    /// Sorts items by `key`, compared with `cmp` in direction `dir`.
    pub fn order_by_with<K, F, C>(self, key: F, cmp: C, dir: Dir) -> OrderedSeq<'a, T>
    where
        K: 'a,
        F: FnMut(&T) -> K + 'a,
        C: Fn(&K, &K) -> Ordering + 'a,
    {
        OrderedSeq::new(
            self,
            Box::new(KeyLevel {
                key,
                cmp,
                dir,
                keys: Vec::new(),
            }),
        )
    }

    /// Reverses the sequence: a descending sort on arrival index.
    pub fn reverse(self) -> Seq<'a, T> {
        self.select_indexed(|item, index| (index, item))
            .order_by_descending(|pair| pair.0)
            .into_seq()
            .select(|(_, item)| item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        priority: i64,
    }

    fn item(name: &'static str, priority: i64) -> Item {
        Item { name, priority }
    }

    fn names(items: Vec<Item>) -> Vec<&'static str> {
        items.into_iter().map(|i| i.name).collect()
    }

    #[test]
    fn dir_compare_swaps_arguments() {
        let cmp = |a: &i32, b: &i32| a.cmp(b);
        assert_eq!(Dir::Asc.compare(&cmp, &1, &2), Ordering::Less);
        assert_eq!(Dir::Desc.compare(&cmp, &1, &2), Ordering::Greater);
        assert_eq!(Dir::Desc.compare(&cmp, &2, &2), Ordering::Equal);
    }

    #[test]
    fn dir_display() {
        assert_eq!(Dir::Asc.to_string(), "asc");
        assert_eq!(Dir::Desc.to_string(), "desc");
        assert!(Dir::default().is_asc());
        assert!(Dir::Desc.is_desc());
    }

    #[test]
    fn order_natural() {
        assert_eq!(from(vec![3, 1, 2, 1]).order().to_vec(), vec![1, 1, 2, 3]);
        assert_eq!(
            from(vec![3, 1, 2, 1]).order_descending().to_vec(),
            vec![3, 2, 1, 1]
        );
    }

    #[test]
    fn order_by_is_stable() {
        let items = vec![item("a", 2), item("b", 1), item("c", 2), item("d", 1)];
        let asc = from(items.clone()).order_by(|i| i.priority).to_vec();
        assert_eq!(names(asc), vec!["b", "d", "a", "c"]);

        // Ties keep source order in both directions.
        let desc = from(items).order_by_descending(|i| i.priority).to_vec();
        assert_eq!(names(desc), vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn then_by_breaks_ties() {
        let items = vec![item("b", 5), item("a", 1), item("c", 5), item("a", 5)];
        let sorted = from(items.clone())
            .order_by_descending(|i| i.priority)
            .then_by(|i| i.name)
            .to_vec();
        assert_eq!(names(sorted), vec!["a", "b", "c", "a"]);

        let sorted = from(items)
            .order_by(|i| i.name)
            .then_by_descending(|i| i.priority)
            .to_vec();
        assert_eq!(
            sorted,
            vec![item("a", 5), item("a", 1), item("b", 5), item("c", 5)]
        );
    }

    #[test]
    fn then_by_sorts_from_original_list() {
        let ordered = from(vec![(2, 'b'), (1, 'z'), (2, 'a'), (1, 'y')])
            .order_by(|p| p.0)
            .then_by(|p| p.1);
        assert_eq!(ordered.levels(), 2);
        assert_eq!(ordered.to_vec(), vec![(1, 'y'), (1, 'z'), (2, 'a'), (2, 'b')]);
    }

    #[test]
    fn order_by_with_partial_keys() {
        let sorted = from(vec![2.5, 1.0, 1.5])
            .order_by_with(|x| *x, partial_order, Dir::Asc)
            .to_vec();
        assert_eq!(sorted, vec![1.0, 1.5, 2.5]);

        // NaN never panics; it just compares equal to everything.
        let with_nan = from(vec![2.5, f64::NAN, 1.0])
            .order_by_with(|x| *x, partial_order, Dir::Desc)
            .to_vec();
        assert_eq!(with_nan.len(), 3);
    }

    #[test]
    fn order_with_custom_comparer() {
        let sorted = from(vec!["bb", "a", "ccc"])
            .order_with(|a, b| a.len().cmp(&b.len()), Dir::Desc)
            .to_vec();
        assert_eq!(sorted, vec!["ccc", "bb", "a"]);
    }

    #[test]
    fn order_is_lazy() {
        use std::cell::Cell;
        let pulled = Cell::new(0);
        let mut ordered = from(vec![3, 1, 2])
            .inspect(|_| pulled.set(pulled.get() + 1))
            .order()
            .into_seq();
        assert_eq!(pulled.get(), 0);
        assert_eq!(ordered.remaining(), None);
        assert_eq!(ordered.pull(), Some(1));
        assert_eq!(pulled.get(), 3);
        assert_eq!(ordered.remaining(), Some(2));
    }

    #[test]
    fn levels_added_late_still_apply() {
        let ordered = from(vec![(1, 'b'), (0, 'z'), (1, 'a')]).order_by(|p| p.0);
        let ordered = ordered.then_by(|p| p.1);
        let mut seq = from(ordered);
        assert_eq!(seq.pull(), Some((0, 'z')));
        assert_eq!(seq.pull(), Some((1, 'a')));
        assert_eq!(seq.pull(), Some((1, 'b')));
        assert_eq!(seq.pull(), None);
    }

    #[test]
    fn ordered_seq_cannot_reset() {
        let mut seq = from(vec![2, 1]).order().into_seq();
        assert!(seq.reset().is_err());
    }

    #[test]
    fn reverse_reverses() {
        assert_eq!(from(vec![1, 2, 3]).reverse().to_vec(), vec![3, 2, 1]);
        assert!(crate::empty::<i32>().reverse().to_vec().is_empty());
    }
}
