//! The pull protocol and the sources that feed a [`Seq`](crate::Seq).
//!
//! A [`Source`] hands out one item per [`pull`](Source::pull) until it is
//! exhausted. Sources backed by an indexable collection (and the counting
//! factories) can also [`reset`](Source::reset) to their first item; sources
//! backed by an arbitrary iterator cannot.

use std::marker::PhantomData;
use std::ops::Add;

use crate::error::{Result, SeqError};

/// A pull-based producer of items.
pub trait Source {
    /// The type of item produced.
    type Item;

    /// Produces the next item, or `None` once the source is exhausted.
    fn pull(&mut self) -> Option<Self::Item>;

    /// Rewinds the source to its first item.
    ///
    /// The default implementation reports [`SeqError::Unsupported`]: single-pass
    /// sources cannot replay what they already handed out.
    fn reset(&mut self) -> Result<()> {
        Err(SeqError::unsupported("reset"))
    }

    /// Number of items left, when known without pulling.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// An owned, indexable collection. Supports reset.
#[derive(Debug, Clone)]
pub struct IndexedSource<T> {
    items: Vec<T>,
    next: usize,
}

impl<T> IndexedSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        IndexedSource { items, next: 0 }
    }
}

impl<T: Clone> Source for IndexedSource<T> {
    type Item = T;

    fn pull(&mut self) -> Option<T> {
        let item = self.items.get(self.next)?.clone();
        self.next += 1;
        Some(item)
    }

    fn reset(&mut self) -> Result<()> {
        self.next = 0;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.items.len().saturating_sub(self.next))
    }
}

/// A borrowed slice, yielding references. Supports reset.
#[derive(Debug)]
pub struct SliceSource<'a, T> {
    items: &'a [T],
    next: usize,
}

impl<'a, T> SliceSource<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        SliceSource { items, next: 0 }
    }
}

impl<'a, T> Source for SliceSource<'a, T> {
    type Item = &'a T;

    fn pull(&mut self) -> Option<&'a T> {
        let item = self.items.get(self.next)?;
        self.next += 1;
        Some(item)
    }

    fn reset(&mut self) -> Result<()> {
        self.next = 0;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.items.len().saturating_sub(self.next))
    }
}

/// Any iterator. Single pass: reset is unsupported.
#[derive(Debug)]
pub struct IterSource<I> {
    iter: I,
}

impl<I> IterSource<I> {
    pub fn new(iter: I) -> Self {
        IterSource { iter }
    }
}

impl<I: Iterator> Source for IterSource<I> {
    type Item = I::Item;

    fn pull(&mut self) -> Option<I::Item> {
        self.iter.next()
    }
}

/// A generator closure. This is what every composed operator is built from.
pub struct Generator<F> {
    next: F,
}

impl<F> Generator<F> {
    pub fn new(next: F) -> Self {
        Generator { next }
    }
}

impl<T, F> Source for Generator<F>
where
    F: FnMut() -> Option<T>,
{
    type Item = T;

    fn pull(&mut self) -> Option<T> {
        (self.next)()
    }
}

/// A source that is exhausted from the start.
#[derive(Debug)]
pub struct EmptySource<T>(PhantomData<T>);

impl<T> EmptySource<T> {
    pub fn new() -> Self {
        EmptySource(PhantomData)
    }
}

impl<T> Default for EmptySource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Source for EmptySource<T> {
    type Item = T;

    fn pull(&mut self) -> Option<T> {
        None
    }

    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        Some(0)
    }
}

/// Arithmetic progression `start, start + step, ...`, bounded or infinite.
#[derive(Debug, Clone)]
pub struct RangeSource<T> {
    start: T,
    step: T,
    current: T,
    count: Option<usize>,
    produced: usize,
}

impl<T: Copy> RangeSource<T> {
    pub fn new(start: T, step: T, count: Option<usize>) -> Self {
        RangeSource {
            start,
            step,
            current: start,
            count,
            produced: 0,
        }
    }
}

impl<T> Source for RangeSource<T>
where
    T: Copy + Add<Output = T>,
{
    type Item = T;

    fn pull(&mut self) -> Option<T> {
        if self.count.is_some_and(|count| self.produced >= count) {
            return None;
        }
        // Step only when the next item is asked for, never past the last one handed out.
        if self.produced > 0 {
            self.current = self.current + self.step;
        }
        self.produced += 1;
        Some(self.current)
    }

    fn reset(&mut self) -> Result<()> {
        self.current = self.start;
        self.produced = 0;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        self.count.map(|count| count.saturating_sub(self.produced))
    }
}

/// The same item, `count` times or forever.
#[derive(Debug, Clone)]
pub struct RepeatSource<T> {
    item: T,
    count: Option<usize>,
    produced: usize,
}

impl<T> RepeatSource<T> {
    pub fn new(item: T, count: Option<usize>) -> Self {
        RepeatSource {
            item,
            count,
            produced: 0,
        }
    }
}

impl<T: Clone> Source for RepeatSource<T> {
    type Item = T;

    fn pull(&mut self) -> Option<T> {
        if self.count.is_some_and(|count| self.produced >= count) {
            return None;
        }
        self.produced += 1;
        Some(self.item.clone())
    }

    fn reset(&mut self) -> Result<()> {
        self.produced = 0;
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        self.count.map(|count| count.saturating_sub(self.produced))
    }
}
