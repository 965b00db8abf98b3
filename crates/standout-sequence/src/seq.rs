//! The [`Seq`] wrapper and the [`IntoSeq`] conversion used by every entry point.

use std::fmt;

use crate::error::Result;
use crate::source::{Generator, IndexedSource, IterSource, SliceSource, Source};

/// A lazily evaluated sequence of items.
///
/// A `Seq` owns its upstream (a [`Source`], or the previous `Seq` in a chain)
/// and only pulls from it when it is pulled itself. Operators consume the
/// sequence and return a new one, so a chain reads left to right and nothing
/// runs until a terminal operator or manual iteration drives it.
///
/// Once a pull reports the end, every later pull reports the end too. Only a
/// successful [`reset`](Seq::reset) brings items back.
///
/// # Example
///
/// ```
/// use standout_sequence::Seq;
///
/// let evens: Vec<i32> = Seq::from_vec(vec![1, 2, 3, 4, 5, 6])
///     .filter(|n| n % 2 == 0)
///     .select(|n| n * 10)
///     .to_vec();
/// assert_eq!(evens, vec![20, 40, 60]);
/// ```
pub struct Seq<'a, T> {
    source: Box<dyn Source<Item = T> + 'a>,
    position: Option<usize>,
    done: bool,
}

impl<'a, T: 'a> Seq<'a, T> {
    /// Wraps any source.
    pub fn new(source: impl Source<Item = T> + 'a) -> Self {
        Seq {
            source: Box::new(source),
            position: None,
            done: false,
        }
    }

    /// Builds a sequence from a generator closure. `None` ends the sequence.
    pub fn generate<F>(next: F) -> Self
    where
        F: FnMut() -> Option<T> + 'a,
    {
        Seq::new(Generator::new(next))
    }

    /// Wraps an owned vector. The result supports [`reset`](Seq::reset).
    pub fn from_vec(items: Vec<T>) -> Self
    where
        T: Clone,
    {
        Seq::new(IndexedSource::new(items))
    }

    /// Wraps an arbitrary iterator. The result is single pass.
    pub fn from_iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Seq::new(IterSource::new(iter.into_iter()))
    }

    /// Pulls the next item.
    ///
    /// Returns `None` once the sequence is exhausted, and keeps returning
    /// `None` on every later call.
    pub fn pull(&mut self) -> Option<T> {
        if self.done {
            return None;
        }
        match self.source.pull() {
            Some(item) => {
                self.position = Some(self.position.map_or(0, |p| p + 1));
                Some(item)
            }
            None => {
                self.done = true;
                None
            }
        }
    }

    /// Rewinds the sequence to its first item.
    ///
    /// Only sequences rooted directly in an indexed collection or a counting
    /// factory can rewind. Everything else, including every composed
    /// sequence, reports [`SeqError::Unsupported`](crate::SeqError::Unsupported)
    /// and is left untouched.
    pub fn reset(&mut self) -> Result<()> {
        match self.source.reset() {
            Ok(()) => {
                log::trace!("sequence rewound from position {:?}", self.position);
                self.position = None;
                self.done = false;
                Ok(())
            }
            Err(err) => {
                log::debug!("sequence refused reset: {}", err);
                Err(err)
            }
        }
    }

    /// Zero-based index of the last item pulled, `None` before the first pull.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Returns `true` once a pull has reported the end of the sequence.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Items left, when the source can tell without pulling.
    pub fn remaining(&self) -> Option<usize> {
        if self.done {
            Some(0)
        } else {
            self.source.remaining()
        }
    }

    /// Type-erases this sequence behind a fresh generator.
    ///
    /// Used by operators that hand out a sequence built from this one.
    pub(crate) fn chain_with<U, F>(mut self, mut step: F) -> Seq<'a, U>
    where
        U: 'a,
        F: FnMut(&mut Seq<'a, T>) -> Option<U> + 'a,
    {
        Seq::generate(move || step(&mut self))
    }
}

impl<'a, T: 'a> Iterator for Seq<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.pull()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining() {
            Some(n) => (n, Some(n)),
            None => (0, None),
        }
    }
}

impl<T> fmt::Debug for Seq<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seq")
            .field("position", &self.position)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

/// Conversion into a [`Seq`].
///
/// This is the single entry point through which outside data becomes a
/// sequence: vectors and arrays (rewindable, yielding owned items), slices
/// (rewindable, yielding references), strings (one `char` per item), and
/// existing sequences.
pub trait IntoSeq<'a> {
    /// The item type of the resulting sequence.
    type Item: 'a;

    /// Performs the conversion.
    fn into_seq(self) -> Seq<'a, Self::Item>;
}

impl<'a, T: 'a> IntoSeq<'a> for Seq<'a, T> {
    type Item = T;

    fn into_seq(self) -> Seq<'a, T> {
        self
    }
}

impl<'a, T: Clone + 'a> IntoSeq<'a> for Vec<T> {
    type Item = T;

    fn into_seq(self) -> Seq<'a, T> {
        Seq::from_vec(self)
    }
}

impl<'a, T: Clone + 'a, const N: usize> IntoSeq<'a> for [T; N] {
    type Item = T;

    fn into_seq(self) -> Seq<'a, T> {
        Seq::from_vec(Vec::from(self))
    }
}

impl<'a, T: 'a> IntoSeq<'a> for &'a [T] {
    type Item = &'a T;

    fn into_seq(self) -> Seq<'a, &'a T> {
        Seq::new(SliceSource::new(self))
    }
}

impl<'a, T: 'a> IntoSeq<'a> for &'a Vec<T> {
    type Item = &'a T;

    fn into_seq(self) -> Seq<'a, &'a T> {
        Seq::new(SliceSource::new(self.as_slice()))
    }
}

impl<'a> IntoSeq<'a> for &str {
    type Item = char;

    fn into_seq(self) -> Seq<'a, char> {
        Seq::from_vec(self.chars().collect())
    }
}

impl<'a> IntoSeq<'a> for String {
    type Item = char;

    fn into_seq(self) -> Seq<'a, char> {
        Seq::from_vec(self.chars().collect())
    }
}

/// Converts anything that implements [`IntoSeq`] into a sequence.
///
/// ```
/// use standout_sequence::from;
///
/// assert_eq!(from("abc").to_vec(), vec!['a', 'b', 'c']);
/// assert_eq!(from(vec![1, 2]).to_vec(), vec![1, 2]);
/// ```
pub fn from<'a, S: IntoSeq<'a>>(source: S) -> Seq<'a, S::Item> {
    source.into_seq()
}
