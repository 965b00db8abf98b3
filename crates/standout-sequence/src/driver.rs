//! Step-wise driver: walks a sequence one item at a time, letting the caller
//! decide when each step is done.
//!
//! For each item the driver enters [`DriverState::StepInFlight`] and calls
//! the step callback once with a [`StepContext`]. The step then ends in one
//! of three ways:
//!
//! - **resolve**: advance to the next item, optionally replacing the
//!   carried value.
//! - **reject**: stop with a failure reason, optionally replacing the
//!   final value.
//! - **cancel**: stop successfully, optionally replacing the final value.
//!
//! The decision can be made inside the callback (through the context) or
//! later, from outside, through [`StepDriver::resolve`] and friends. Only one
//! step is ever in flight, and the next item is pulled only after the current
//! step resolves. A callback that returns `Err` rejects the whole walk with
//! that error.
//!
//! ```rust
//! use standout_sequence::{from, DriverState, Settled};
//!
//! let driver = from(vec![1, 2, 3]).drive(0, |step| {
//!     let total = step.value() + step.item();
//!     step.resolve_with(total);
//!     Ok::<(), String>(())
//! });
//! assert_eq!(driver.state(), DriverState::Resolved);
//! assert_eq!(driver.into_settled(), Some(Settled::Resolved(6)));
//! ```

use std::fmt;
use std::mem;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{Result, SeqError};
use crate::seq::Seq;

/// Observable state of a [`StepDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum DriverState {
    /// Not started yet.
    AwaitingStep,
    /// An item has been handed to the callback and awaits a decision.
    StepInFlight,
    /// Finished successfully, by exhaustion or cancel.
    Resolved,
    /// Finished with a failure.
    Rejected,
}

impl DriverState {
    pub fn is_settled(self) -> bool {
        matches!(self, DriverState::Resolved | DriverState::Rejected)
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::AwaitingStep => "awaiting-step",
            DriverState::StepInFlight => "step-in-flight",
            DriverState::Resolved => "resolved",
            DriverState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Final outcome of a driven walk.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Settled<V, E> {
    /// The walk finished; carries the final value.
    Resolved(V),
    /// The walk was rejected with `reason`; `value` is the final value.
    Rejected { reason: E, value: V },
}

impl<V, E> Settled<V, E> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Settled::Resolved(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Settled::Rejected { .. })
    }

    /// The final value, whichever way the walk ended.
    pub fn value(&self) -> &V {
        match self {
            Settled::Resolved(value) | Settled::Rejected { value, .. } => value,
        }
    }

    /// Converts to a `Result`, dropping the final value of a rejection.
    pub fn into_result(self) -> std::result::Result<V, E> {
        match self {
            Settled::Resolved(value) => Ok(value),
            Settled::Rejected { reason, .. } => Err(reason),
        }
    }
}

enum Decision<V, E> {
    Resolve(Option<V>),
    Reject(E, Option<V>),
    Cancel(Option<V>),
}

impl<V, E> Decision<V, E> {
    fn name(&self) -> &'static str {
        match self {
            Decision::Resolve(_) => "resolve",
            Decision::Reject(..) => "reject",
            Decision::Cancel(_) => "cancel",
        }
    }
}

/// What the step callback sees for the item in flight.
///
/// The first control call made through the context wins; later ones are
/// ignored.
pub struct StepContext<T, V, E> {
    item: T,
    index: usize,
    value: V,
    decision: Option<Decision<V, E>>,
}

impl<T, V, E> StepContext<T, V, E> {
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Zero-based index of the item.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    /// The value carried from the previous step.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Ends the step and advances, keeping the carried value.
    pub fn resolve(&mut self) {
        self.decide(Decision::Resolve(None));
    }

    /// Ends the step and advances, carrying `value` into the next step.
    pub fn resolve_with(&mut self, value: V) {
        self.decide(Decision::Resolve(Some(value)));
    }

    /// Stops the walk with a failure.
    pub fn reject(&mut self, reason: E) {
        self.decide(Decision::Reject(reason, None));
    }

    /// Stops the walk with a failure and a final value.
    pub fn reject_with(&mut self, reason: E, value: V) {
        self.decide(Decision::Reject(reason, Some(value)));
    }

    /// Stops the walk successfully.
    pub fn cancel(&mut self) {
        self.decide(Decision::Cancel(None));
    }

    /// Stops the walk successfully with a final value.
    pub fn cancel_with(&mut self, value: V) {
        self.decide(Decision::Cancel(Some(value)));
    }

    fn decide(&mut self, decision: Decision<V, E>) {
        match &self.decision {
            Some(first) => log::trace!(
                "step {}: ignoring {} after {}",
                self.index,
                decision.name(),
                first.name()
            ),
            None => self.decision = Some(decision),
        }
    }
}

impl<T: fmt::Debug, V: fmt::Debug, E> fmt::Debug for StepContext<T, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("item", &self.item)
            .field("index", &self.index)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

enum Phase<V, E> {
    Awaiting(V),
    InFlight(V),
    Settled(Settled<V, E>),
    // Only observable if the step callback panicked mid-transition.
    Poisoned,
}

/// Drives a sequence through a step callback. See the [module docs](self).
pub struct StepDriver<'a, T, V, E, F> {
    source: Seq<'a, T>,
    callback: F,
    phase: Phase<V, E>,
    steps: usize,
}

impl<'a, T, V, E, F> StepDriver<'a, T, V, E, F>
where
    T: 'a,
    F: FnMut(&mut StepContext<T, V, E>) -> std::result::Result<(), E>,
{
    /// Creates a driver in [`DriverState::AwaitingStep`]. Nothing is pulled
    /// until [`start`](StepDriver::start).
    pub fn new(source: Seq<'a, T>, initial: V, callback: F) -> Self {
        StepDriver {
            source,
            callback,
            phase: Phase::Awaiting(initial),
            steps: 0,
        }
    }

    /// Pulls the first item and hands it to the callback.
    ///
    /// Fails with [`SeqError::Unsupported`] if the driver was already started.
    pub fn start(&mut self) -> Result<()> {
        if !matches!(self.phase, Phase::Awaiting(_)) {
            return Err(SeqError::unsupported("start"));
        }
        log::debug!("step driver started");
        self.run();
        Ok(())
    }

    /// Resolves the step in flight, keeping the carried value.
    pub fn resolve(&mut self) -> Result<()> {
        self.apply_external(Decision::Resolve(None))
    }

    /// Resolves the step in flight, carrying `value` into the next step.
    pub fn resolve_with(&mut self, value: V) -> Result<()> {
        self.apply_external(Decision::Resolve(Some(value)))
    }

    /// Rejects the walk.
    pub fn reject(&mut self, reason: E) -> Result<()> {
        self.apply_external(Decision::Reject(reason, None))
    }

    /// Rejects the walk with a final value.
    pub fn reject_with(&mut self, reason: E, value: V) -> Result<()> {
        self.apply_external(Decision::Reject(reason, Some(value)))
    }

    /// Ends the walk successfully.
    pub fn cancel(&mut self) -> Result<()> {
        self.apply_external(Decision::Cancel(None))
    }

    /// Ends the walk successfully with a final value.
    pub fn cancel_with(&mut self, value: V) -> Result<()> {
        self.apply_external(Decision::Cancel(Some(value)))
    }

    pub fn state(&self) -> DriverState {
        match self.phase {
            Phase::Awaiting(_) => DriverState::AwaitingStep,
            Phase::InFlight(_) => DriverState::StepInFlight,
            Phase::Settled(Settled::Resolved(_)) => DriverState::Resolved,
            Phase::Settled(Settled::Rejected { .. }) | Phase::Poisoned => DriverState::Rejected,
        }
    }

    /// Number of items handed to the callback so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The outcome, once settled.
    pub fn settled(&self) -> Option<&Settled<V, E>> {
        match &self.phase {
            Phase::Settled(settled) => Some(settled),
            _ => None,
        }
    }

    pub fn into_settled(self) -> Option<Settled<V, E>> {
        match self.phase {
            Phase::Settled(settled) => Some(settled),
            _ => None,
        }
    }

    fn apply_external(&mut self, decision: Decision<V, E>) -> Result<()> {
        if !matches!(self.phase, Phase::InFlight(_)) {
            log::debug!(
                "step driver refused {} in state {}",
                decision.name(),
                self.state()
            );
            return Err(SeqError::unsupported(decision.name()));
        }
        self.apply(decision);
        self.run();
        Ok(())
    }

    /// Moves an in-flight step to its next phase.
    fn apply(&mut self, decision: Decision<V, E>) {
        let carried = match mem::replace(&mut self.phase, Phase::Poisoned) {
            Phase::InFlight(value) => value,
            other => {
                self.phase = other;
                return;
            }
        };
        log::trace!("step {} settled by {}", self.steps.saturating_sub(1), decision.name());
        self.phase = match decision {
            Decision::Resolve(next) => Phase::Awaiting(next.unwrap_or(carried)),
            Decision::Reject(reason, value) => {
                log::debug!("step driver rejected after {} step(s)", self.steps);
                Phase::Settled(Settled::Rejected {
                    reason,
                    value: value.unwrap_or(carried),
                })
            }
            Decision::Cancel(value) => {
                log::debug!("step driver cancelled after {} step(s)", self.steps);
                Phase::Settled(Settled::Resolved(value.unwrap_or(carried)))
            }
        };
    }

    /// Runs steps until one is left in flight or the walk settles.
    fn run(&mut self) {
        loop {
            let value = match mem::replace(&mut self.phase, Phase::Poisoned) {
                Phase::Awaiting(value) => value,
                other => {
                    self.phase = other;
                    return;
                }
            };
            let Some(item) = self.source.pull() else {
                log::debug!("step driver exhausted after {} step(s)", self.steps);
                self.phase = Phase::Settled(Settled::Resolved(value));
                return;
            };

            let mut context = StepContext {
                item,
                index: self.steps,
                value,
                decision: None,
            };
            self.steps += 1;
            log::trace!("step {} in flight", context.index);
            let outcome = (self.callback)(&mut context);

            let StepContext {
                value, decision, ..
            } = context;
            self.phase = Phase::InFlight(value);
            let decision = match outcome {
                Err(reason) => Some(Decision::Reject(reason, None)),
                Ok(()) => decision,
            };
            match decision {
                Some(decision) => self.apply(decision),
                None => return,
            }
        }
    }
}

impl<T, V: fmt::Debug, E: fmt::Debug, F> fmt::Debug for StepDriver<'_, T, V, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("StepDriver");
        out.field("steps", &self.steps);
        match &self.phase {
            Phase::Awaiting(value) | Phase::InFlight(value) => out.field("value", value),
            Phase::Settled(settled) => out.field("settled", settled),
            Phase::Poisoned => out.field("poisoned", &true),
        };
        out.finish_non_exhaustive()
    }
}

impl<'a, T: 'a> Seq<'a, T> {
    /// Starts a [`StepDriver`] over this sequence with carried value
    /// `initial`.
    pub fn drive<V, E, F>(self, initial: V, callback: F) -> StepDriver<'a, T, V, E, F>
    where
        F: FnMut(&mut StepContext<T, V, E>) -> std::result::Result<(), E>,
    {
        let mut driver = StepDriver::new(self, initial, callback);
        driver.run();
        driver
    }
}
