//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! classify / bridge / retry / client produce:
//!     → tracing events (debug per result, warn on unexpected transport errors)
//!     → metrics.rs counters (results, retries, cancellations)
//!
//! Consumers:
//!     → logging.rs subscriber installed by the binary (stdout, text or JSON)
//!     → whatever metrics recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap (facade calls, no-ops without a recorder)

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
