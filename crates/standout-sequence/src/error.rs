//! Error types for the sequence crate.

use std::fmt;

use thiserror::Error;

/// Errors raised by sequence operators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeqError {
    /// No item satisfied the operation (`first`, `last`, `single`, `element_at`).
    #[error("{operation}: no matching item found")]
    NotFound { operation: &'static str },

    /// More than one item matched where exactly one was required.
    #[error("{operation}: more than one matching item found")]
    MultipleMatches { operation: &'static str },

    /// The operation is not supported by this sequence or in its current state.
    #[error("{operation}: unsupported operation")]
    Unsupported { operation: &'static str },

    /// An item failed an assertion.
    #[error("assertion failed at index {index}: {message}")]
    AssertionFailed { index: usize, message: String },
}

impl SeqError {
    pub(crate) fn not_found(operation: &'static str) -> Self {
        SeqError::NotFound { operation }
    }

    pub(crate) fn multiple(operation: &'static str) -> Self {
        SeqError::MultipleMatches { operation }
    }

    pub(crate) fn unsupported(operation: &'static str) -> Self {
        SeqError::Unsupported { operation }
    }

    /// Returns `true` for [`SeqError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, SeqError::NotFound { .. })
    }

    /// Returns `true` for [`SeqError::Unsupported`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SeqError::Unsupported { .. })
    }
}

/// Result type for sequence operations.
pub type Result<T> = std::result::Result<T, SeqError>;

/// A failure raised while processing one item of a pass.
///
/// Carries the zero-based index of the item and, when the caller named it,
/// the function that failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure<E> {
    /// Index of the item that failed.
    pub index: usize,
    /// Name of the failing function, if any.
    pub label: Option<String>,
    /// The underlying error.
    pub source: E,
}

impl<E> ItemFailure<E> {
    /// Creates an unlabelled failure.
    pub fn new(index: usize, source: E) -> Self {
        ItemFailure {
            index,
            label: None,
            source,
        }
    }

    /// Attaches the name of the failing function.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl<E: fmt::Display> fmt::Display for ItemFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "at index {} in {}: {}", self.index, label, self.source),
            None => write!(f, "at index {}: {}", self.index, self.source),
        }
    }
}

impl<E> std::error::Error for ItemFailure<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Every per-item failure collected over a complete pass, in occurrence order.
///
/// Raised by [`Seq::each_all`](crate::Seq::each_all) and
/// [`Seq::assert_all`](crate::Seq::assert_all) once the pass has finished.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateError<E> {
    failures: Vec<ItemFailure<E>>,
}

impl<E> AggregateError<E> {
    pub(crate) fn new(failures: Vec<ItemFailure<E>>) -> Self {
        AggregateError { failures }
    }

    /// The collected failures, in the order they occurred.
    pub fn failures(&self) -> &[ItemFailure<E>] {
        &self.failures
    }

    /// Consumes the error, returning the collected failures.
    pub fn into_failures(self) -> Vec<ItemFailure<E>> {
        self.failures
    }

    /// Number of failures collected.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Always `false` for errors produced by this crate.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} item(s) failed", self.failures.len())?;
        for (n, failure) in self.failures.iter().enumerate() {
            write!(f, "\n[{}] {}", n, failure)?;
        }
        Ok(())
    }
}

impl<E> std::error::Error for AggregateError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|failure| failure as &(dyn std::error::Error + 'static))
    }
}
