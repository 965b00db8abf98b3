//! Set operators: distinct, except, intersect, union.
//!
//! Keys are matched by linear scan with an equality comparer, so nothing
//! here needs `Hash` or `Ord`. The default comparer is `PartialEq`.

use crate::seq::{IntoSeq, Seq};

impl<'a, T: 'a> Seq<'a, T> {
    /// Drops items equal to an earlier item.
    pub fn distinct(self) -> Seq<'a, T>
    where
        T: Clone + PartialEq,
    {
        self.distinct_with(T::clone, |a, b| a == b)
    }

    /// Drops items whose key equals the key of an earlier item.
    pub fn distinct_by<K, F>(self, key: F) -> Seq<'a, T>
    where
        K: PartialEq + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        self.distinct_with(key, |a, b| a == b)
    }

    /// Drops items whose key matches, per `eq`, the key of an earlier item.
    ///
    /// Every key seen so far is kept; memory grows with the number of
    /// distinct keys.
    pub fn distinct_with<K, F, E>(self, mut key: F, eq: E) -> Seq<'a, T>
    where
        K: 'a,
        F: FnMut(&T) -> K + 'a,
        E: Fn(&K, &K) -> bool + 'a,
    {
        let mut seen: Vec<K> = Vec::new();
        self.chain_with(move |up| loop {
            let item = up.pull()?;
            let k = key(&item);
            if !seen.iter().any(|s| eq(s, &k)) {
                seen.push(k);
                return Some(item);
            }
        })
    }

    /// Yields the items that match no item of `second`.
    ///
    /// `second` is drained and de-duplicated on the first pull. Duplicates
    /// on this side are kept.
    pub fn except<S>(self, second: S) -> Seq<'a, T>
    where
        T: PartialEq,
        S: IntoSeq<'a, Item = T>,
    {
        self.except_with(second, |a, b| a == b)
    }

    /// [`except`](Seq::except) with a custom comparer.
    pub fn except_with<S, E>(self, second: S, eq: E) -> Seq<'a, T>
    where
        S: IntoSeq<'a, Item = T>,
        E: Fn(&T, &T) -> bool + 'a,
    {
        self.filter_against(second, eq, false)
    }

    /// Yields the items that match some item of `second`.
    ///
    /// `second` is drained and de-duplicated on the first pull. Duplicates
    /// on this side are kept.
    pub fn intersect<S>(self, second: S) -> Seq<'a, T>
    where
        T: PartialEq,
        S: IntoSeq<'a, Item = T>,
    {
        self.intersect_with(second, |a, b| a == b)
    }

    /// [`intersect`](Seq::intersect) with a custom comparer.
    pub fn intersect_with<S, E>(self, second: S, eq: E) -> Seq<'a, T>
    where
        S: IntoSeq<'a, Item = T>,
        E: Fn(&T, &T) -> bool + 'a,
    {
        self.filter_against(second, eq, true)
    }

    /// Yields the distinct items of this sequence followed by `second`.
    pub fn union<S>(self, second: S) -> Seq<'a, T>
    where
        T: Clone + PartialEq,
        S: IntoSeq<'a, Item = T>,
    {
        self.concat(second).distinct()
    }

    /// [`union`](Seq::union) with a custom comparer.
    pub fn union_with<S, E>(self, second: S, eq: E) -> Seq<'a, T>
    where
        T: Clone,
        S: IntoSeq<'a, Item = T>,
        E: Fn(&T, &T) -> bool + 'a,
    {
        self.concat(second).distinct_with(T::clone, eq)
    }

    fn filter_against<S, E>(self, second: S, eq: E, keep_matches: bool) -> Seq<'a, T>
    where
        S: IntoSeq<'a, Item = T>,
        E: Fn(&T, &T) -> bool + 'a,
    {
        let mut pending = Some(second.into_seq());
        let mut buffer: Vec<T> = Vec::new();
        self.chain_with(move |up| {
            if let Some(second) = pending.take() {
                for item in second {
                    if !buffer.iter().any(|b| eq(b, &item)) {
                        buffer.push(item);
                    }
                }
                log::debug!("set operation buffered {} distinct items", buffer.len());
            }
            loop {
                let item = up.pull()?;
                if buffer.iter().any(|b| eq(b, &item)) == keep_matches {
                    return Some(item);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::from;

    #[test]
    fn distinct_keeps_first_occurrence() {
        assert_eq!(from(vec![3, 1, 2, 1]).distinct().to_vec(), vec![3, 1, 2]);
    }

    #[test]
    fn distinct_by_key() {
        let out = from(vec!["apple", "avocado", "banana", "blueberry", "cherry"])
            .distinct_by(|s| s.chars().next())
            .to_vec();
        assert_eq!(out, vec!["apple", "banana", "cherry"]);
    }

    #[test]
    fn distinct_with_comparer() {
        let out = from(vec!["A", "a", "b", "B"])
            .distinct_with(|s| s.to_string(), |a, b| a.eq_ignore_ascii_case(b))
            .to_vec();
        assert_eq!(out, vec!["A", "b"]);
    }

    #[test]
    fn distinct_is_idempotent() {
        let once = from(vec![1, 1, 2, 3, 2]).distinct().to_vec();
        let twice = from(vec![1, 1, 2, 3, 2]).distinct().distinct().to_vec();
        assert_eq!(once, twice);
    }

    #[test]
    fn except_keeps_source_duplicates() {
        let out = from(vec![1, 2, 2, 3, 4]).except(vec![3, 1, 1]).to_vec();
        assert_eq!(out, vec![2, 2, 4]);
    }

    #[test]
    fn intersect_keeps_source_duplicates() {
        let out = from(vec![1, 2, 2, 3, 4]).intersect(vec![2, 4, 4]).to_vec();
        assert_eq!(out, vec![2, 2, 4]);
    }

    #[test]
    fn set_ops_with_comparer() {
        let out = from(vec!["One", "two", "THREE"])
            .except_with(vec!["one", "three"], |a, b| a.eq_ignore_ascii_case(b))
            .to_vec();
        assert_eq!(out, vec!["two"]);

        let out = from(vec!["One", "two"])
            .intersect_with(vec!["TWO"], |a, b| a.eq_ignore_ascii_case(b))
            .to_vec();
        assert_eq!(out, vec!["two"]);
    }

    #[test]
    fn union_concatenates_then_dedups() {
        let out = from(vec![1, 2, 2]).union(vec![3, 2, 1, 4]).to_vec();
        assert_eq!(out, vec![1, 2, 3, 4]);

        let out = from(vec!["a", "B"])
            .union_with(vec!["b", "c"], |x, y| x.eq_ignore_ascii_case(y))
            .to_vec();
        assert_eq!(out, vec!["a", "B", "c"]);
    }
}
