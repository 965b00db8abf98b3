//! Factory functions: sequences built from scratch rather than from a
//! collection.

use std::cell::Cell;
use std::collections::VecDeque;
use std::ops::Add;
use std::rc::Rc;

use num_traits::One;

use crate::seq::{IntoSeq, Seq};
use crate::source::{EmptySource, RangeSource, RepeatSource};

impl<'a, T: 'a> Seq<'a, T> {
    /// A sequence with no items. Its first pull reports the end.
    pub fn empty() -> Self {
        Seq::new(EmptySource::new())
    }
}

/// A sequence with no items.
pub fn empty<'a, T: 'a>() -> Seq<'a, T> {
    Seq::empty()
}

/// `count` consecutive values starting at `start`.
///
/// ```
/// assert_eq!(standout_sequence::range(0, 5).to_vec(), vec![0, 1, 2, 3, 4]);
/// ```
pub fn range<'a, T>(start: T, count: usize) -> Seq<'a, T>
where
    T: Copy + Add<Output = T> + One + 'a,
{
    Seq::new(RangeSource::new(start, T::one(), Some(count)))
}

/// Consecutive values starting at `start`, without end.
pub fn range_from<'a, T>(start: T) -> Seq<'a, T>
where
    T: Copy + Add<Output = T> + One + 'a,
{
    Seq::new(RangeSource::new(start, T::one(), None))
}

/// `start, start + step, ...`; `count` values, or without end for `None`.
pub fn range_step<'a, T>(start: T, step: T, count: Option<usize>) -> Seq<'a, T>
where
    T: Copy + Add<Output = T> + 'a,
{
    Seq::new(RangeSource::new(start, step, count))
}

/// `item`, `count` times.
pub fn repeat<'a, T: Clone + 'a>(item: T, count: usize) -> Seq<'a, T> {
    Seq::new(RepeatSource::new(item, Some(count)))
}

/// `item`, forever.
pub fn repeat_forever<'a, T: Clone + 'a>(item: T) -> Seq<'a, T> {
    Seq::new(RepeatSource::new(item, None))
}

/// A sequence of exactly one item.
pub fn once<'a, T: 'a>(item: T) -> Seq<'a, T> {
    Seq::from_iterator(std::iter::once(item))
}

/// Cooperative stop signal handed to [`build`] and [`build_many`] factories.
///
/// The token is checked before and after every step. A step that cancels
/// ends the sequence, and the value it returns is dropped.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Calls `factory(cancel, index)` once per pull and yields what it returns.
///
/// Ends after `count` items, or as soon as the factory cancels; the value
/// returned by the cancelling step is not yielded.
///
/// ```
/// use standout_sequence::build;
///
/// let squares = build(|cancel, i| {
///     if i == 3 {
///         cancel.cancel();
///     }
///     i * i
/// }, None);
/// assert_eq!(squares.to_vec(), vec![0, 1, 4]);
/// ```
pub fn build<'a, T, F>(mut factory: F, count: Option<usize>) -> Seq<'a, T>
where
    T: 'a,
    F: FnMut(&CancelToken, usize) -> T + 'a,
{
    let token = CancelToken::new();
    let mut index = 0;
    Seq::generate(move || {
        if token.is_cancelled() {
            log::trace!("build cancelled after {} item(s)", index);
            return None;
        }
        if count.is_some_and(|count| index >= count) {
            return None;
        }
        let item = factory(&token, index);
        index += 1;
        if token.is_cancelled() {
            log::trace!("build cancelled during step {}", index - 1);
            return None;
        }
        Some(item)
    })
}

/// Like [`build`], but each step returns a sub-sequence; the output is their
/// concatenation.
pub fn build_many<'a, S, F>(mut factory: F, count: Option<usize>) -> Seq<'a, S::Item>
where
    S: IntoSeq<'a>,
    F: FnMut(&CancelToken, usize) -> S + 'a,
{
    build(move |token, index| factory(token, index).into_seq(), count).select_many(|part| part)
}

/// Pops items off the back of `stack` until it is empty. Each pull removes
/// one element.
pub fn pop_from<'a, T: 'a>(stack: &'a mut Vec<T>) -> Seq<'a, T> {
    Seq::generate(move || stack.pop())
}

/// Shifts items off the front of `queue` until it is empty. Each pull removes
/// one element.
pub fn shift_from<'a, T: 'a>(queue: &'a mut VecDeque<T>) -> Seq<'a, T> {
    Seq::generate(move || queue.pop_front())
}

#[cfg(feature = "random")]
mod random {
    use rand::distr::uniform::{SampleRange, SampleUniform};
    use rand::Rng;

    use crate::seq::Seq;

    /// Endless stream of `f64` values in `[0, 1)` drawn from `rng`.
    pub fn random<'a, R: Rng + 'a>(mut rng: R) -> Seq<'a, f64> {
        Seq::generate(move || Some(rng.random::<f64>()))
    }

    /// Endless stream of values drawn uniformly from `range`.
    ///
    /// An empty range yields nothing.
    pub fn random_range<'a, T, G, R>(mut rng: G, range: R) -> Seq<'a, T>
    where
        T: SampleUniform + 'a,
        G: Rng + 'a,
        R: SampleRange<T> + Clone + 'a,
    {
        if range.is_empty() {
            log::debug!("random_range over an empty range");
            return Seq::empty();
        }
        Seq::generate(move || Some(rng.random_range(range.clone())))
    }
}

#[cfg(feature = "random")]
pub use random::{random, random_range};
