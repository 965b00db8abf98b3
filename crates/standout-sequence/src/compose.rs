//! Streaming operators.
//!
//! Every operator here consumes its upstream and returns a new [`Seq`] whose
//! pull logic pulls upstream only as far as it needs to produce the next
//! item. None of them buffer more than a bounded window.

use std::collections::VecDeque;
use std::iter;
use std::ops::Add;

use crate::seq::{IntoSeq, Seq};
use crate::truthy::Truthy;

impl<'a, T: 'a> Seq<'a, T> {
    // ========================================================================
    // Projection
    // ========================================================================

    /// Maps every item through `selector`.
    pub fn select<U, F>(self, mut selector: F) -> Seq<'a, U>
    where
        U: 'a,
        F: FnMut(T) -> U + 'a,
    {
        self.select_many(move |item| iter::once(selector(item)))
    }

    /// Maps every item through `selector`, which also receives the item's index.
    pub fn select_indexed<U, F>(self, mut selector: F) -> Seq<'a, U>
    where
        U: 'a,
        F: FnMut(T, usize) -> U + 'a,
    {
        let mut index = 0;
        self.select(move |item| {
            let out = selector(item, index);
            index += 1;
            out
        })
    }

    /// Maps every item to a sub-sequence and yields all of its items before
    /// moving on to the next upstream item.
    pub fn select_many<U, I, F>(self, mut selector: F) -> Seq<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U>,
        I::IntoIter: 'a,
        F: FnMut(T) -> I + 'a,
    {
        let mut inner: Option<I::IntoIter> = None;
        self.chain_with(move |up| loop {
            if let Some(item) = inner.as_mut().and_then(Iterator::next) {
                return Some(item);
            }
            inner = Some(selector(up.pull()?).into_iter());
        })
    }

    /// Calls `action` on every item as it passes through.
    pub fn inspect<F>(self, mut action: F) -> Seq<'a, T>
    where
        F: FnMut(&T) + 'a,
    {
        self.chain_with(move |up| {
            let item = up.pull()?;
            action(&item);
            Some(item)
        })
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Keeps the items for which `predicate` holds, in order.
    ///
    /// A constant predicate is just a closure ignoring its argument:
    /// `filter(|_| true)` passes everything through.
    pub fn filter<P>(self, mut predicate: P) -> Seq<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.chain_with(move |up| loop {
            let item = up.pull()?;
            if predicate(&item) {
                return Some(item);
            }
        })
    }

    /// Keeps the truthy items. This is `filter` with no predicate.
    pub fn filter_truthy(self) -> Seq<'a, T>
    where
        T: Truthy,
    {
        self.filter(|item| item.is_truthy())
    }

    // ========================================================================
    // Take / skip
    // ========================================================================

    /// Yields at most `count` items.
    ///
    /// Never pulls past the `count`-th item.
    pub fn take(self, count: usize) -> Seq<'a, T> {
        let mut left = count;
        self.chain_with(move |up| {
            if left == 0 {
                return None;
            }
            left -= 1;
            up.pull()
        })
    }

    /// Yields items while `predicate` holds, then stops for good.
    ///
    /// Items after the first failure are never inspected, even if they would
    /// satisfy the predicate.
    pub fn take_while<P>(self, mut predicate: P) -> Seq<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        let mut stopped = false;
        self.chain_with(move |up| {
            if stopped {
                return None;
            }
            let item = up.pull()?;
            if predicate(&item) {
                Some(item)
            } else {
                stopped = true;
                None
            }
        })
    }

    /// Skips the first `count` items.
    pub fn skip(self, count: usize) -> Seq<'a, T> {
        let mut left = count;
        self.skip_while(move |_| {
            if left == 0 {
                false
            } else {
                left -= 1;
                true
            }
        })
    }

    /// Skips items while `predicate` holds, then yields everything after,
    /// including later items the predicate would have matched.
    pub fn skip_while<P>(self, mut predicate: P) -> Seq<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        let mut skipping = true;
        self.chain_with(move |up| loop {
            let item = up.pull()?;
            if !skipping || !predicate(&item) {
                skipping = false;
                return Some(item);
            }
        })
    }

    /// Yields the last `count` items. Drains the upstream on first pull.
    pub fn take_last(self, count: usize) -> Seq<'a, T> {
        let mut buffer: Option<VecDeque<T>> = None;
        self.chain_with(move |up| {
            let buffer = buffer.get_or_insert_with(|| {
                let mut window = VecDeque::new();
                while let Some(item) = up.pull() {
                    if count == 0 {
                        continue;
                    }
                    if window.len() == count {
                        window.pop_front();
                    }
                    window.push_back(item);
                }
                window
            });
            buffer.pop_front()
        })
    }

    /// Yields everything but the last `count` items, holding a window of
    /// `count` items back.
    pub fn skip_last(self, count: usize) -> Seq<'a, T> {
        let mut window = VecDeque::new();
        self.chain_with(move |up| {
            while window.len() <= count {
                window.push_back(up.pull()?);
            }
            window.pop_front()
        })
    }

    // ========================================================================
    // Concatenation
    // ========================================================================

    /// Yields this sequence's items, then `other`'s.
    pub fn concat<S>(self, other: S) -> Seq<'a, T>
    where
        S: IntoSeq<'a, Item = T>,
    {
        self.concat_all(iter::once(other))
    }

    /// Yields this sequence's items, then each of `others` in order.
    pub fn concat_all<I, S>(self, others: I) -> Seq<'a, T>
    where
        I: IntoIterator<Item = S>,
        S: IntoSeq<'a, Item = T>,
    {
        let mut parts: VecDeque<Seq<'a, T>> = VecDeque::new();
        parts.push_back(self);
        parts.extend(others.into_iter().map(IntoSeq::into_seq));
        flatten_parts(parts)
    }

    /// Yields `other`'s items, then this sequence's.
    pub fn prepend<S>(self, other: S) -> Seq<'a, T>
    where
        S: IntoSeq<'a, Item = T>,
    {
        self.prepend_all(iter::once(other))
    }

    /// Yields each of `others` in order, then this sequence's items.
    pub fn prepend_all<I, S>(self, others: I) -> Seq<'a, T>
    where
        I: IntoIterator<Item = S>,
        S: IntoSeq<'a, Item = T>,
    {
        let mut parts: VecDeque<Seq<'a, T>> =
            others.into_iter().map(IntoSeq::into_seq).collect();
        parts.push_back(self);
        flatten_parts(parts)
    }

    /// Yields this sequence's items, then `item`.
    pub fn append(self, item: T) -> Seq<'a, T> {
        self.concat(Seq::from_iterator(iter::once(item)))
    }

    // ========================================================================
    // Zip
    // ========================================================================

    /// Pairs items of both sequences and combines them with `selector`, which
    /// also receives the pair's index. Stops as soon as either side ends.
    pub fn zip_with<U, R, S, F>(self, other: S, mut selector: F) -> Seq<'a, R>
    where
        U: 'a,
        R: 'a,
        S: IntoSeq<'a, Item = U>,
        F: FnMut(T, U, usize) -> R + 'a,
    {
        let mut other = other.into_seq();
        let mut index = 0;
        self.chain_with(move |up| {
            let left = up.pull()?;
            let right = other.pull()?;
            let out = selector(left, right, index);
            index += 1;
            Some(out)
        })
    }

    /// Pairs items of both sequences into tuples.
    pub fn zip_pairs<U, S>(self, other: S) -> Seq<'a, (T, U)>
    where
        U: 'a,
        S: IntoSeq<'a, Item = U>,
    {
        self.zip_with(other, |left, right, _| (left, right))
    }

    /// Adds items of both sequences pairwise.
    ///
    /// The default combination: sums for numbers, concatenation for
    /// `String + &str`. Use [`zip_with`](Seq::zip_with) or
    /// [`zip_pairs`](Seq::zip_pairs) for anything else.
    pub fn zip<U, S>(self, other: S) -> Seq<'a, T::Output>
    where
        T: Add<U>,
        T::Output: 'a,
        U: 'a,
        S: IntoSeq<'a, Item = U>,
    {
        self.zip_with(other, |left, right, _| left + right)
    }

    // ========================================================================
    // Empty fallbacks and separators
    // ========================================================================

    /// Yields the upstream items, or `item` alone if the upstream is empty.
    pub fn default_if_empty(self, item: T) -> Seq<'a, T> {
        self.default_sequence_if_empty(Seq::from_iterator(iter::once(item)))
    }

    /// Yields the upstream items, or `defaults` if the upstream is empty.
    ///
    /// Emptiness is detected by the first pull; no item is buffered.
    pub fn default_sequence_if_empty<S>(self, defaults: S) -> Seq<'a, T>
    where
        S: IntoSeq<'a, Item = T>,
    {
        let mut fallback = Some(defaults.into_seq());
        let mut checked = false;
        let mut using_fallback = false;
        self.chain_with(move |up| {
            if using_fallback {
                return fallback.as_mut()?.pull();
            }
            if checked {
                return up.pull();
            }
            checked = true;
            match up.pull() {
                Some(item) => {
                    fallback = None;
                    Some(item)
                }
                None => {
                    using_fallback = true;
                    fallback.as_mut()?.pull()
                }
            }
        })
    }

    /// Inserts the `separators` between every pair of consecutive items.
    ///
    /// Nothing is inserted before the first item or after the last. The
    /// separators are buffered once, the first time they are needed.
    pub fn intersperse<S>(self, separators: S) -> Seq<'a, T>
    where
        T: Clone,
        S: IntoSeq<'a, Item = T>,
    {
        let mut pending_separators = Some(separators.into_seq());
        let mut separators: Vec<T> = Vec::new();
        let mut queue: VecDeque<T> = VecDeque::new();
        let mut started = false;
        self.chain_with(move |up| {
            if let Some(item) = queue.pop_front() {
                return Some(item);
            }
            let next = up.pull()?;
            if !started {
                started = true;
                return Some(next);
            }
            if let Some(seq) = pending_separators.take() {
                separators = seq.collect();
            }
            queue.extend(separators.iter().cloned());
            queue.push_back(next);
            queue.pop_front()
        })
    }
}

fn flatten_parts<'a, T: 'a>(mut parts: VecDeque<Seq<'a, T>>) -> Seq<'a, T> {
    Seq::generate(move || loop {
        let current = parts.front_mut()?;
        if let Some(item) = current.pull() {
            return Some(item);
        }
        parts.pop_front();
    })
}
