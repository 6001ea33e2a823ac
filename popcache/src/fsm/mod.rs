//! Per-request state machine.
//!
//! [`State`] enumerates the steps a request goes through; the transition
//! logic lives on [`PopCache`](crate::PopCache) because every step needs the
//! store, the origin client or the clock.

mod states;
mod transitions;

pub use states::State;
