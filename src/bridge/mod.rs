//! Async-to-result bridge.
//!
//! # Data Flow
//! ```text
//! transport thread                      caller
//!     → TransportCallback (outcome)         → CallBridge::on_complete / wait
//!     → classify                            → CallBridge::cancel
//!     → Completer::complete ──┐        ┌── forwards to TransportCall::cancel
//!                             ▼        ▼
//!                      [ Pending | Completed | Cancelled ]
//! ```
//!
//! # Design Decisions
//! - One mutex-guarded slot decides the single terminal transition
//! - Observers and cancel hooks run outside the lock
//! - A completion arriving after cancellation is dropped silently
//! - Dropping the transport side without completing counts as cancellation

mod adapt;
mod call;

pub use adapt::{enqueue, spawn, TransportCall, TransportCallback};
pub use call::{CallBridge, CallState, Completer};
