//! Sentinel outcomes for aggregates and lookups.
//!
//! [`Aggregate::Empty`] marks an aggregate (sum, product, average, min, max)
//! computed over an empty sequence. [`Found::NotFound`] marks a lookup
//! (`first_or_default`, `element_at_or_default`, ...) that matched nothing.
//! Both are variants of their own type, so they can never collide with a
//! real item value, `None` included.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Result of an aggregate that has no identity value of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Aggregate<T> {
    /// The sequence was empty.
    Empty,
    /// The aggregated value.
    Value(T),
}

impl<T> Aggregate<T> {
    /// Returns `true` if the aggregate ran over an empty sequence.
    pub fn is_empty(&self) -> bool {
        matches!(self, Aggregate::Empty)
    }

    /// Returns `true` if a value was produced.
    pub fn is_value(&self) -> bool {
        matches!(self, Aggregate::Value(_))
    }

    /// Converts into an `Option`, mapping `Empty` to `None`.
    pub fn value(self) -> Option<T> {
        match self {
            Aggregate::Value(v) => Some(v),
            Aggregate::Empty => None,
        }
    }

    /// Borrows the value, if any.
    pub fn as_ref(&self) -> Aggregate<&T> {
        match self {
            Aggregate::Value(v) => Aggregate::Value(v),
            Aggregate::Empty => Aggregate::Empty,
        }
    }

    /// Returns the value, or `default` for an empty sequence.
    pub fn unwrap_or(self, default: T) -> T {
        self.value().unwrap_or(default)
    }

    /// Maps the value, leaving `Empty` untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Aggregate<U> {
        match self {
            Aggregate::Value(v) => Aggregate::Value(f(v)),
            Aggregate::Empty => Aggregate::Empty,
        }
    }

    /// Folds one more item into the aggregate. `Empty` behaves as the identity.
    pub(crate) fn fold_with<F: FnOnce(T, T) -> T>(self, item: T, f: F) -> Aggregate<T> {
        match self {
            Aggregate::Empty => Aggregate::Value(item),
            Aggregate::Value(acc) => Aggregate::Value(f(acc, item)),
        }
    }
}

/// Result of a lookup that may match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Found<T> {
    /// The matching item.
    Item(T),
    /// No item matched.
    NotFound,
}

impl<T> Found<T> {
    /// Returns `true` if no item matched.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Found::NotFound)
    }

    /// Returns `true` if an item matched.
    pub fn is_found(&self) -> bool {
        matches!(self, Found::Item(_))
    }

    /// Converts into an `Option`, mapping `NotFound` to `None`.
    pub fn item(self) -> Option<T> {
        match self {
            Found::Item(v) => Some(v),
            Found::NotFound => None,
        }
    }

    /// Returns the item, or `default` when nothing matched.
    pub fn unwrap_or(self, default: T) -> T {
        self.item().unwrap_or(default)
    }

    /// Maps the item, leaving `NotFound` untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Found<U> {
        match self {
            Found::Item(v) => Found::Item(f(v)),
            Found::NotFound => Found::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Found<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Found::Item(v),
            None => Found::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Aggregate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Aggregate::Value(v),
            None => Aggregate::Empty,
        }
    }
}
