//! Sequence - Lazily evaluated query operators over any collection.
//!
//! Sequence wraps a pull-based source in a single [`Seq`] type and chains
//! query operators onto it. Nothing runs until a terminal operator (or plain
//! iteration) pulls items, and each operator pulls only as many upstream
//! items as it needs. It provides:
//!
//! - Composition: select, filter, take/skip, concat, zip, intersperse
//! - Buffering operators: distinct, set operations, group_by, join, ordering
//! - Terminal operators: first/last/single, aggregates, lookups, per-item actions
//! - Factories: ranges, repeats, cancelable builders, random streams
//! - A step-wise driver paced by external resolve/reject/cancel calls
//!
//! # Quick Start
//!
//! ```rust
//! use standout_sequence::{from, range, Aggregate};
//!
//! let words = vec!["pear", "fig", "apple", "kiwi", "plum"];
//!
//! let by_length: Vec<(usize, Vec<&str>)> = from(words.clone())
//!     .order_by(|w| w.len())
//!     .then_by(|w| *w)
//!     .into_seq()
//!     .group_by(|w| w.len())
//!     .select(|g| g.into_parts())
//!     .to_vec();
//! assert_eq!(by_length[0], (3, vec!["fig"]));
//! assert_eq!(by_length[1], (4, vec!["kiwi", "pear", "plum"]));
//!
//! assert_eq!(range(1, 4).sum(), Aggregate::Value(10));
//! assert_eq!(range(0, 0).sum(), Aggregate::Empty);
//! ```
//!
//! # Evaluation Model
//!
//! Every `Seq` is single pass. Pulling from it, directly or through an
//! operator, consumes it:
//!
//! - Once a pull reports the end, later pulls keep reporting the end.
//! - [`Seq::reset`] rewinds sequences built from vectors, slices, ranges and
//!   repeats. Composed sequences refuse with [`SeqError::Unsupported`].
//! - Buffering operators (ordering, grouping, joins, set operations,
//!   `take_last`) drain what they need on their first pull, not when built.
//!
//! # Empty and Missing Results
//!
//! Aggregates over an empty sequence return [`Aggregate::Empty`], and
//! lookups that find nothing return [`Found::NotFound`] (in their
//! `_or_default` forms) or [`SeqError::NotFound`]. Neither sentinel can be
//! confused with a real item.
//!
//! # Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `random` | yes | [`random`] and [`random_range`] streams via `rand` |
//! | `serde` | no | `Serialize` on the public data shapes |

mod compose;
mod driver;
mod error;
mod factory;
mod grouping;
mod join;
mod ordering;
mod outcome;
mod seq;
mod set_ops;
mod source;
mod terminal;
mod truthy;

// Re-export public API
pub use driver::{DriverState, Settled, StepContext, StepDriver};
pub use error::{AggregateError, ItemFailure, Result, SeqError};
pub use factory::{
    build, build_many, empty, once, pop_from, range, range_from, range_step, repeat,
    repeat_forever, shift_from, CancelToken,
};
#[cfg(feature = "random")]
pub use factory::{random, random_range};
pub use grouping::Grouping;
pub use join::{GroupJoined, JoinedPair};
pub use ordering::{partial_order, Dir, OrderedSeq};
pub use outcome::{Aggregate, Found};
pub use seq::{from, IntoSeq, Seq};
pub use source::{
    EmptySource, Generator, IndexedSource, IterSource, RangeSource, RepeatSource, SliceSource,
    Source,
};
pub use truthy::Truthy;
