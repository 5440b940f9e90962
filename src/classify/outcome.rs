//! Raw outcomes handed over by the transport, and the declared success type.

use std::fmt;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;

use crate::response::{BoxError, TransportError};

/// A response as produced by the transport, before classification.
///
/// `body` is the already-decoded success body (absent when the response had
/// none); `error_body` holds the raw bytes of a non-2xx payload.
#[derive(Debug, Clone)]
pub struct RawResponse<S> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<S>,
    pub error_body: Option<Bytes>,
}

impl<S> RawResponse<S> {
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status,
            headers,
            body: None,
            error_body: None,
        }
    }

    pub fn with_body(mut self, body: S) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_error_body(mut self, error_body: impl Into<Bytes>) -> Self {
        self.error_body = Some(error_body.into());
        self
    }
}

/// A response the transport rejected because of its status.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub error_body: Option<Bytes>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, error_body: Option<Bytes>) -> Self {
        Self {
            status,
            headers,
            error_body,
        }
    }

    pub(crate) fn into_raw<S>(self) -> RawResponse<S> {
        RawResponse {
            status: self.status,
            headers: self.headers,
            body: None,
            error_body: self.error_body,
        }
    }
}

/// Why the transport did not hand over a plain response.
#[derive(Debug)]
pub enum TransportFailure {
    /// No response was produced (refused, DNS, timeout, disconnect).
    Connectivity(TransportError),
    /// The transport surfaced a response as an "unsuccessful status" failure.
    Response(ErrorResponse),
    /// Anything else, e.g. a decode failure while building the response.
    Other(BoxError),
}

impl TransportFailure {
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }
}

impl From<TransportError> for TransportFailure {
    fn from(err: TransportError) -> Self {
        Self::Connectivity(err)
    }
}

impl From<ErrorResponse> for TransportFailure {
    fn from(response: ErrorResponse) -> Self {
        Self::Response(response)
    }
}

/// Everything a transport call can end with.
pub type RawOutcome<S> = Result<RawResponse<S>, TransportFailure>;

/// Declares how a call treats a 2xx response without a body.
///
/// - [`SuccessType::unit`]: no body is expected; an empty 2xx is a success.
/// - [`SuccessType::body`] / [`SuccessType::body_or_default`]: a body is
///   expected. `204 No Content` succeeds with the supplied empty value; any
///   other empty 2xx is a server error.
pub struct SuccessType<S> {
    unit: bool,
    no_content: fn() -> S,
}

impl SuccessType<()> {
    pub fn unit() -> Self {
        Self {
            unit: true,
            no_content: || (),
        }
    }
}

impl<S> SuccessType<S> {
    /// A body is expected; `no_content` builds the value for a 204.
    pub fn body(no_content: fn() -> S) -> Self {
        Self {
            unit: false,
            no_content,
        }
    }

    pub fn is_unit(&self) -> bool {
        self.unit
    }

    /// The value standing in for a missing body, if the status allows one.
    pub(crate) fn bodyless(&self, status: StatusCode) -> Option<S> {
        if self.unit || status == StatusCode::NO_CONTENT {
            Some((self.no_content)())
        } else {
            None
        }
    }
}

impl<S: Default> SuccessType<S> {
    /// A body is expected; a 204 yields `S::default()`.
    pub fn body_or_default() -> Self {
        Self::body(S::default)
    }
}

impl<S> Clone for SuccessType<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for SuccessType<S> {}

impl<S> fmt::Debug for SuccessType<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuccessType")
            .field("unit", &self.unit)
            .finish()
    }
}
