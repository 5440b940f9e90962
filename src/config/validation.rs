//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, timeouts > 0, finite positive factor)
//! - Check the base URL parses as an http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem in a [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// `retry.times` must allow at least one attempt.
    #[error("retry.times must be at least 1")]
    ZeroAttempts,

    /// `retry.factor` must be finite and positive.
    #[error("retry.factor must be a finite number greater than 0, got {0}")]
    InvalidFactor(f64),

    /// The first delay may not exceed the cap.
    #[error("retry.initial_delay_ms ({initial}) exceeds retry.max_delay_ms ({max})")]
    DelayExceedsMax { initial: u64, max: u64 },

    /// A timeout of zero would fail every request.
    #[error("transport.{0} must be greater than 0")]
    ZeroTimeout(&'static str),

    /// `transport.base_url` is not an absolute http(s) URL.
    #[error("transport.base_url {url:?} is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Check every semantic rule and report all violations.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let retry = &config.retry;
    if retry.times == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if !retry.factor.is_finite() || retry.factor <= 0.0 {
        errors.push(ValidationError::InvalidFactor(retry.factor));
    }
    if retry.initial_delay_ms > retry.max_delay_ms {
        errors.push(ValidationError::DelayExceedsMax {
            initial: retry.initial_delay_ms,
            max: retry.max_delay_ms,
        });
    }

    let transport = &config.transport;
    if transport.connect_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_ms"));
    }
    if transport.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("request_timeout_ms"));
    }
    if let Some(base_url) = &transport.base_url {
        if let Err(reason) = check_base_url(base_url) {
            errors.push(ValidationError::InvalidBaseUrl {
                url: base_url.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme {other:?}")),
    }
}
