//! Grouping operators: group_by and chunk.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::seq::{IntoSeq, Seq};

/// A key together with the items that share it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Grouping<K, T> {
    key: K,
    items: Vec<T>,
}

impl<K, T> Grouping<K, T> {
    pub fn new(key: K, items: Vec<T>) -> Self {
        Grouping { key, items }
    }

    /// The key shared by every item of the group.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The items, in their original relative order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Splits the grouping into its key and items.
    pub fn into_parts(self) -> (K, Vec<T>) {
        (self.key, self.items)
    }

    pub(crate) fn push(&mut self, item: T) {
        self.items.push(item);
    }
}

impl<K, T> IntoIterator for Grouping<K, T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, K, T: Clone + 'a> IntoSeq<'a> for Grouping<K, T> {
    type Item = T;

    fn into_seq(self) -> Seq<'a, T> {
        Seq::from_vec(self.items)
    }
}

/// Buckets every item by key, in first-seen key order.
///
/// Each key is matched against the buckets found so far with `eq`, by linear
/// scan. The scan order is what fixes the output order, so it is kept even
/// where a hash would be faster.
pub(crate) fn bucket<'a, T, K, F, E>(
    source: Seq<'a, T>,
    mut key: F,
    eq: &E,
) -> Vec<Grouping<K, T>>
where
    T: 'a,
    F: FnMut(&T) -> K,
    E: Fn(&K, &K) -> bool,
{
    let mut buckets: Vec<Grouping<K, T>> = Vec::new();
    let mut total = 0usize;
    for item in source {
        total += 1;
        let k = key(&item);
        match buckets.iter_mut().find(|b| eq(&b.key, &k)) {
            Some(bucket) => bucket.push(item),
            None => buckets.push(Grouping::new(k, vec![item])),
        }
    }
    log::debug!("grouped {} items into {} buckets", total, buckets.len());
    buckets
}

impl<'a, T: 'a> Seq<'a, T> {
    /// Groups items by key.
    ///
    /// Groups come out in the order their key was first seen; items keep their
    /// relative order inside a group. The whole upstream is drained before the
    /// first group is produced, since a late item can still belong to an early
    /// group.
    pub fn group_by<K, F>(self, key: F) -> Seq<'a, Grouping<K, T>>
    where
        K: PartialEq + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.group_by_with(key, |a, b| a == b)
    }

    /// [`group_by`](Seq::group_by) with a custom key comparer.
    pub fn group_by_with<K, F, E>(self, key: F, eq: E) -> Seq<'a, Grouping<K, T>>
    where
        K: 'a,
        F: FnMut(&T) -> K + 'a,
        E: Fn(&K, &K) -> bool + 'a,
    {
        let mut state = Some((self, key));
        let mut groups: Option<std::vec::IntoIter<Grouping<K, T>>> = None;
        Seq::generate(move || {
            if let Some((source, key)) = state.take() {
                groups = Some(bucket(source, key, &eq).into_iter());
            }
            groups.as_mut()?.next()
        })
    }

    /// Splits the sequence into consecutive chunks of `size` items.
    ///
    /// The last chunk may be shorter. A `size` of zero yields no chunks.
    pub fn chunk(self, size: usize) -> Seq<'a, Vec<T>> {
        self.chain_with(move |up| {
            let mut buffer = Vec::new();
            while buffer.len() < size {
                match up.pull() {
                    Some(item) => buffer.push(item),
                    None => break,
                }
            }
            (!buffer.is_empty()).then_some(buffer)
        })
    }
}
