//! Typed results for HTTP calls.
//!
//! Every call ends in exactly one [`NetworkResult`] variant: a 2xx success
//! with its body, a server error with an optional decoded error body, a
//! network error when no response arrived, or an unknown error for local
//! failures. Callers pattern-match instead of juggling exceptions.
//!
//! ```text
//!    reqwest / callback transport
//!                │
//!                ▼
//!    ┌───────────────────────┐      ┌──────────────┐
//!    │ classify (RawOutcome) │─────▶│ NetworkResult│
//!    └───────────────────────┘      └──────┬───────┘
//!                                          │
//!               ┌──────────────────────────┼──────────────────────┐
//!               ▼                          ▼                      ▼
//!        client::execute           bridge::CallBridge      retry::execute_with_retry
//!        (awaitable)               (observers, cancel)     (backoff on NetworkError)
//! ```

// Core
pub mod classify;
pub mod response;

// Adapters
pub mod bridge;
pub mod client;
pub mod retry;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use bridge::{CallBridge, CallState};
pub use classify::{classify, BodyConverter, SuccessType};
pub use client::{Expect, NetworkClient};
pub use config::ClientConfig;
pub use response::{NetworkFailure, NetworkResult, TransportError, UnknownCause};
pub use retry::{execute_with_retry, RetryPolicy};
