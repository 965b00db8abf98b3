//! Join and group join.
//!
//! Both sides are bucketed by key (see [`Seq::group_by`]). Outer buckets are
//! visited in discovery order; for each, the inner buckets are scanned in
//! discovery order and every matching one contributes results. Within a
//! matching pair of buckets, outer items are the outer loop.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::grouping::{bucket, Grouping};
use crate::seq::{IntoSeq, Seq};

/// An outer item matched with one inner item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct JoinedPair<O, I> {
    pub outer: O,
    pub inner: I,
}

/// An outer item matched with every item of a matching inner bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GroupJoined<O, I> {
    pub outer: O,
    pub inner: Vec<I>,
}

/// Matched bucket pairs plus a cursor over their items.
struct JoinPlan<K, O, I> {
    outer: Vec<Grouping<K, O>>,
    inner: Vec<Grouping<K, I>>,
    pairs: Vec<(usize, usize)>,
    pair: usize,
    outer_item: usize,
    inner_item: usize,
}

impl<K, O, I> JoinPlan<K, O, I> {
    fn new<E>(outer: Vec<Grouping<K, O>>, inner: Vec<Grouping<K, I>>, eq: &E) -> Self
    where
        E: Fn(&K, &K) -> bool,
    {
        let mut pairs = Vec::new();
        for (o, outer_bucket) in outer.iter().enumerate() {
            for (i, inner_bucket) in inner.iter().enumerate() {
                if eq(outer_bucket.key(), inner_bucket.key()) {
                    pairs.push((o, i));
                }
            }
        }
        log::debug!(
            "join matched {} bucket pairs ({} outer, {} inner buckets)",
            pairs.len(),
            outer.len(),
            inner.len()
        );
        JoinPlan {
            outer,
            inner,
            pairs,
            pair: 0,
            outer_item: 0,
            inner_item: 0,
        }
    }

    /// Next (outer item, inner item) in join order.
    fn next_pair(&mut self) -> Option<(&O, &I)> {
        loop {
            let &(o, i) = self.pairs.get(self.pair)?;
            let outer = self.outer[o].items();
            let inner = self.inner[i].items();
            if self.outer_item >= outer.len() {
                self.pair += 1;
                self.outer_item = 0;
                self.inner_item = 0;
                continue;
            }
            if self.inner_item >= inner.len() {
                self.outer_item += 1;
                self.inner_item = 0;
                continue;
            }
            let current = (&outer[self.outer_item], &inner[self.inner_item]);
            self.inner_item += 1;
            return Some(current);
        }
    }

    /// Next (outer item, whole inner bucket) in group join order.
    fn next_group(&mut self) -> Option<(&O, &[I])> {
        loop {
            let &(o, i) = self.pairs.get(self.pair)?;
            let outer = self.outer[o].items();
            if self.outer_item >= outer.len() {
                self.pair += 1;
                self.outer_item = 0;
                continue;
            }
            let current = (&outer[self.outer_item], self.inner[i].items());
            self.outer_item += 1;
            return Some(current);
        }
    }
}

impl<'a, T: 'a> Seq<'a, T> {
    /// Joins with `inner` on equal keys, yielding a [`JoinedPair`] per match.
    pub fn join<I, K, S, FO, FI>(
        self,
        inner: S,
        outer_key: FO,
        inner_key: FI,
    ) -> Seq<'a, JoinedPair<T, I>>
    where
        T: Clone,
        I: Clone + 'a,
        K: PartialEq + 'a,
        S: IntoSeq<'a, Item = I>,
        FO: FnMut(&T) -> K + 'a,
        FI: FnMut(&I) -> K + 'a,
    {
        self.join_with(
            inner,
            outer_key,
            inner_key,
            |outer, inner| JoinedPair { outer, inner },
            |a, b| a == b,
        )
    }

    /// Joins two sequences of the same item type using one key selector for
    /// both sides.
    pub fn join_on<K, S, F>(self, inner: S, key: F) -> Seq<'a, JoinedPair<T, T>>
    where
        T: Clone,
        K: PartialEq + 'a,
        S: IntoSeq<'a, Item = T>,
        F: Fn(&T) -> K + Clone + 'a,
    {
        let inner_key = key.clone();
        self.join(inner, key, inner_key)
    }

    /// Joins with `inner`, combining each match with `result` and matching
    /// keys with `eq`.
    pub fn join_with<I, K, R, S, FO, FI, FR, E>(
        self,
        inner: S,
        outer_key: FO,
        inner_key: FI,
        mut result: FR,
        eq: E,
    ) -> Seq<'a, R>
    where
        T: Clone,
        I: Clone + 'a,
        K: 'a,
        R: 'a,
        S: IntoSeq<'a, Item = I>,
        FO: FnMut(&T) -> K + 'a,
        FI: FnMut(&I) -> K + 'a,
        FR: FnMut(T, I) -> R + 'a,
        E: Fn(&K, &K) -> bool + 'a,
    {
        let mut pending = Some((self, outer_key, inner.into_seq(), inner_key));
        let mut plan: Option<JoinPlan<K, T, I>> = None;
        Seq::generate(move || {
            if let Some((outer, outer_key, inner, inner_key)) = pending.take() {
                let outer = bucket(outer, outer_key, &eq);
                let inner = bucket(inner, inner_key, &eq);
                plan = Some(JoinPlan::new(outer, inner, &eq));
            }
            let (outer, inner) = plan.as_mut()?.next_pair()?;
            Some(result(outer.clone(), inner.clone()))
        })
    }

    /// Joins with `inner`, yielding each outer item with every item of a
    /// matching inner bucket.
    pub fn group_join<I, K, S, FO, FI>(
        self,
        inner: S,
        outer_key: FO,
        inner_key: FI,
    ) -> Seq<'a, GroupJoined<T, I>>
    where
        T: Clone,
        I: Clone + 'a,
        K: PartialEq + 'a,
        S: IntoSeq<'a, Item = I>,
        FO: FnMut(&T) -> K + 'a,
        FI: FnMut(&I) -> K + 'a,
    {
        self.group_join_with(
            inner,
            outer_key,
            inner_key,
            |outer, inner| GroupJoined { outer, inner },
            |a, b| a == b,
        )
    }

    /// [`group_join`](Seq::group_join) over the same item type with one key
    /// selector for both sides.
    pub fn group_join_on<K, S, F>(self, inner: S, key: F) -> Seq<'a, GroupJoined<T, T>>
    where
        T: Clone,
        K: PartialEq + 'a,
        S: IntoSeq<'a, Item = T>,
        F: Fn(&T) -> K + Clone + 'a,
    {
        let inner_key = key.clone();
        self.group_join(inner, key, inner_key)
    }

    /// [`group_join`](Seq::group_join) with a result selector and key comparer.
    pub fn group_join_with<I, K, R, S, FO, FI, FR, E>(
        self,
        inner: S,
        outer_key: FO,
        inner_key: FI,
        mut result: FR,
        eq: E,
    ) -> Seq<'a, R>
    where
        T: Clone,
        I: Clone + 'a,
        K: 'a,
        R: 'a,
        S: IntoSeq<'a, Item = I>,
        FO: FnMut(&T) -> K + 'a,
        FI: FnMut(&I) -> K + 'a,
        FR: FnMut(T, Vec<I>) -> R + 'a,
        E: Fn(&K, &K) -> bool + 'a,
    {
        let mut pending = Some((self, outer_key, inner.into_seq(), inner_key));
        let mut plan: Option<JoinPlan<K, T, I>> = None;
        Seq::generate(move || {
            if let Some((outer, outer_key, inner, inner_key)) = pending.take() {
                let outer = bucket(outer, outer_key, &eq);
                let inner = bucket(inner, inner_key, &eq);
                plan = Some(JoinPlan::new(outer, inner, &eq));
            }
            let (outer, inner) = plan.as_mut()?.next_group()?;
            Some(result(outer.clone(), inner.to_vec()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        v: &'static str,
    }

    fn row(id: u32, v: &'static str) -> Row {
        Row { id, v }
    }

    #[test]
    fn join_on_id() {
        let outer = vec![row(1, "a"), row(2, "b")];
        let inner = vec![row(1, "x"), row(1, "y")];
        let pairs = from(outer).join_on(inner, |r| r.id).to_vec();
        assert_eq!(
            pairs,
            vec![
                JoinedPair {
                    outer: row(1, "a"),
                    inner: row(1, "x")
                },
                JoinedPair {
                    outer: row(1, "a"),
                    inner: row(1, "y")
                },
            ]
        );
    }

    #[test]
    fn join_orders_by_outer_bucket_then_outer_item() {
        let outer = vec![row(1, "a"), row(2, "b"), row(1, "c")];
        let inner = vec![row(2, "x"), row(1, "y"), row(1, "z")];
        let out = from(outer)
            .join_with(
                inner,
                |o| o.id,
                |i| i.id,
                |o, i| format!("{}{}", o.v, i.v),
                |a, b| a == b,
            )
            .to_vec();
        assert_eq!(out, vec!["ay", "az", "cy", "cz", "bx"]);
    }

    #[test]
    fn join_different_item_types() {
        let people = vec![("ann", 1), ("bob", 2)];
        let pets = vec![(1, "rex"), (1, "tom"), (3, "nemo")];
        let out = from(people)
            .join(pets, |p| p.1, |pet| pet.0)
            .select(|pair| (pair.outer.0, pair.inner.1))
            .to_vec();
        assert_eq!(out, vec![("ann", "rex"), ("ann", "tom")]);
    }

    #[test]
    fn join_with_custom_comparer() {
        let out = from(vec!["Apple", "berry"])
            .join_with(
                vec!["apple pie", "BERRY jam", "cherry"],
                |o| o.to_lowercase(),
                |i| i.split(' ').next().unwrap_or_default().to_lowercase(),
                |o, i| (o, i),
                |a, b| a == b,
            )
            .to_vec();
        assert_eq!(out, vec![("Apple", "apple pie"), ("berry", "BERRY jam")]);
    }

    #[test]
    fn group_join_whole_buckets() {
        let outer = vec![row(1, "a"), row(2, "b"), row(1, "c")];
        let inner = vec![row(1, "x"), row(1, "y"), row(2, "z")];
        let out = from(outer)
            .group_join_on(inner, |r| r.id)
            .select(|g| (g.outer.v, g.inner.iter().map(|r| r.v).collect::<Vec<_>>()))
            .to_vec();
        assert_eq!(
            out,
            vec![
                ("a", vec!["x", "y"]),
                ("c", vec!["x", "y"]),
                ("b", vec!["z"]),
            ]
        );
    }

    #[test]
    fn group_join_skips_unmatched_outer() {
        let out = from(vec![1, 2])
            .group_join(vec![1, 1], |n| *n, |n| *n)
            .to_vec();
        assert_eq!(
            out,
            vec![GroupJoined {
                outer: 1,
                inner: vec![1, 1]
            }]
        );
    }

    #[test]
    fn join_is_lazy() {
        use std::cell::Cell;
        let pulled = Cell::new(0);
        let seq = from(vec![1, 2])
            .inspect(|_| pulled.set(pulled.get() + 1))
            .join(vec![1], |n| *n, |n| *n);
        assert_eq!(pulled.get(), 0);
        assert_eq!(seq.count(), 1);
        assert_eq!(pulled.get(), 2);
    }
}
