//! Response classification subsystem.
//!
//! # Data Flow
//! ```text
//! transport
//!     → RawOutcome (response, or connectivity / status / other failure)
//!     → classifier.rs (status checks, bodyless 2xx policy)
//!     → extract.rs (error body, converted at most once)
//!     → NetworkResult
//! ```
//!
//! # Design Decisions
//! - One pure function shared by every adapter (awaitable and callback-style)
//! - An empty 2xx is a contract violation unless the type is bodyless or the status is 204
//! - Converter failures are downgraded to `UnknownError`, never propagated

mod classifier;
mod convert;
mod extract;
mod outcome;

pub use classifier::classify;
pub use convert::{BodyConverter, Discard, Json, RawBytes, Utf8};
pub use extract::extract_error_body;
pub use outcome::{ErrorResponse, RawOutcome, RawResponse, SuccessType, TransportFailure};
