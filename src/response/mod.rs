//! Typed outcome of a network call.
//!
//! # Variants
//! - `Success`: 2xx with a body (or the declared bodyless value)
//! - `ServerError`: the remote rejected the request, optionally with a decoded error body
//! - `NetworkError`: no response at all (refused, timeout, disconnect)
//! - `UnknownError`: a local failure (decode error, unexpected transport error)
//!
//! # Design Decisions
//! - Exactly one variant per completed call; pendingness lives in the bridge
//! - Built once by the classifier and never mutated afterwards
//! - Status and headers are only present when a response actually arrived

mod error;

pub use error::{
    BoxError, NetworkFailure, ServerFailure, SharedError, TransportError, TransportErrorKind, UnknownCause,
};

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// The classified result of one HTTP call.
///
/// `S` is the success body type, `E` the error body type.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResult<S, E> {
    /// A 2xx response.
    Success {
        body: S,
        status: StatusCode,
        headers: HeaderMap,
    },

    /// A non-2xx response, or a 2xx response missing a body that was expected.
    ServerError {
        body: Option<E>,
        status: StatusCode,
        headers: Option<HeaderMap>,
    },

    /// The request never produced a response.
    NetworkError { cause: TransportError },

    /// Anything else.
    UnknownError {
        cause: UnknownCause,
        status: Option<StatusCode>,
        headers: Option<HeaderMap>,
    },
}

impl<S, E> NetworkResult<S, E> {
    pub fn success(body: S, status: StatusCode, headers: HeaderMap) -> Self {
        Self::Success {
            body,
            status,
            headers,
        }
    }

    pub fn server_error(body: Option<E>, status: StatusCode, headers: Option<HeaderMap>) -> Self {
        Self::ServerError {
            body,
            status,
            headers,
        }
    }

    pub fn network_error(cause: TransportError) -> Self {
        Self::NetworkError { cause }
    }

    pub fn unknown_error(
        cause: UnknownCause,
        status: Option<StatusCode>,
        headers: Option<HeaderMap>,
    ) -> Self {
        Self::UnknownError {
            cause,
            status,
            headers,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkError { .. })
    }

    /// True for every variant except `Success`.
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Short, stable name of the variant (used for logs and metric labels).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::ServerError { .. } => "server_error",
            Self::NetworkError { .. } => "network_error",
            Self::UnknownError { .. } => "unknown_error",
        }
    }

    /// Status code of the underlying response, if one arrived.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Success { status, .. } | Self::ServerError { status, .. } => Some(*status),
            Self::UnknownError { status, .. } => *status,
            Self::NetworkError { .. } => None,
        }
    }

    /// Headers of the underlying response, if one arrived.
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::Success { headers, .. } => Some(headers),
            Self::ServerError { headers, .. } | Self::UnknownError { headers, .. } => {
                headers.as_ref()
            }
            Self::NetworkError { .. } => None,
        }
    }

    /// The success body, if this is a `Success`.
    pub fn body(&self) -> Option<&S> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Consume the result, keeping only the success body.
    ///
    /// ```
    /// use netresponse::NetworkResult;
    /// use reqwest::{header::HeaderMap, StatusCode};
    ///
    /// let ok: NetworkResult<&str, ()> = NetworkResult::success("users", StatusCode::OK, HeaderMap::new());
    /// assert_eq!(ok.into_body(), Some("users"));
    /// ```
    pub fn into_body(self) -> Option<S> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The decoded error body of a `ServerError`.
    pub fn error_body(&self) -> Option<&E> {
        match self {
            Self::ServerError { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> NetworkResult<T, E> {
        match self {
            Self::Success {
                body,
                status,
                headers,
            } => NetworkResult::Success {
                body: f(body),
                status,
                headers,
            },
            Self::ServerError {
                body,
                status,
                headers,
            } => NetworkResult::ServerError {
                body,
                status,
                headers,
            },
            Self::NetworkError { cause } => NetworkResult::NetworkError { cause },
            Self::UnknownError {
                cause,
                status,
                headers,
            } => NetworkResult::UnknownError {
                cause,
                status,
                headers,
            },
        }
    }

    pub fn map_err_body<F>(self, f: impl FnOnce(E) -> F) -> NetworkResult<S, F> {
        match self {
            Self::Success {
                body,
                status,
                headers,
            } => NetworkResult::Success {
                body,
                status,
                headers,
            },
            Self::ServerError {
                body,
                status,
                headers,
            } => NetworkResult::ServerError {
                body: body.map(f),
                status,
                headers,
            },
            Self::NetworkError { cause } => NetworkResult::NetworkError { cause },
            Self::UnknownError {
                cause,
                status,
                headers,
            } => NetworkResult::UnknownError {
                cause,
                status,
                headers,
            },
        }
    }
}

impl<S, E: fmt::Debug> NetworkResult<S, E> {
    /// One error value for whichever failure this is; `None` on `Success`.
    ///
    /// A server error renders as `network server error: <status>`, followed
    /// by the `Debug` form of the decoded error body on a new line.
    pub fn error(&self) -> Option<NetworkFailure> {
        match self {
            Self::Success { .. } => None,
            Self::ServerError { body, status, .. } => Some(
                ServerFailure {
                    status: *status,
                    body: body.as_ref().map(|b| format!("{b:?}")),
                }
                .into(),
            ),
            Self::NetworkError { cause } => Some(cause.clone().into()),
            Self::UnknownError { cause, .. } => Some(cause.clone().into()),
        }
    }
}

impl<S, E> fmt::Display for NetworkResult<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { status, .. } => write!(f, "success: {}", status.as_u16()),
            Self::ServerError { status, .. } => {
                write!(f, "network server error: {}", status.as_u16())
            }
            Self::NetworkError { cause } => write!(f, "network error: {}", cause),
            Self::UnknownError {
                cause,
                status: Some(status),
                ..
            } => write!(f, "unknown error ({}): {}", status.as_u16(), cause),
            Self::UnknownError { cause, .. } => write!(f, "unknown error: {}", cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Result = NetworkResult<String, String>;

    #[test]
    fn test_into_body_only_for_success() {
        let ok = Result::success("Test Message".into(), StatusCode::OK, HeaderMap::new());
        assert_eq!(ok.into_body().as_deref(), Some("Test Message"));

        let server = Result::server_error(None, StatusCode::NOT_FOUND, None);
        assert_eq!(server.into_body(), None);

        let network = Result::network_error(TransportError::disconnected("eof"));
        assert_eq!(network.into_body(), None);

        let unknown = Result::unknown_error(UnknownCause::new("bad json"), None, None);
        assert_eq!(unknown.into_body(), None);
    }

    #[test]
    fn test_status_and_headers_absent_for_network_error() {
        let network = Result::network_error(TransportError::timeout("deadline"));
        assert_eq!(network.status(), None);
        assert!(network.headers().is_none());
        assert!(network.is_network_error());
    }

    #[test]
    fn test_unknown_error_keeps_response_metadata() {
        let mut headers = HeaderMap::new();
        headers.insert("x-trace", "abc".parse().unwrap());
        let unknown = Result::unknown_error(
            UnknownCause::new("not json"),
            Some(StatusCode::BAD_REQUEST),
            Some(headers),
        );
        assert_eq!(unknown.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(unknown.headers().unwrap()["x-trace"], "abc");
        assert_eq!(unknown.kind(), "unknown_error");
    }

    #[test]
    fn test_map_keeps_variant() {
        let ok = Result::success("42".into(), StatusCode::OK, HeaderMap::new());
        let mapped = ok.map(|s| s.parse::<u32>().unwrap());
        assert_eq!(mapped.body(), Some(&42));

        let server = Result::server_error(Some("nope".into()), StatusCode::CONFLICT, None);
        let mapped = server.map_err_body(|s| s.len());
        assert_eq!(mapped.error_body(), Some(&4));
        assert_eq!(mapped.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn test_error_covers_every_failure_variant() {
        let ok = Result::success("fine".into(), StatusCode::OK, HeaderMap::new());
        assert!(!ok.is_error());
        assert_eq!(ok.error(), None);

        let server = Result::server_error(Some("Not Found".into()), StatusCode::NOT_FOUND, None);
        assert!(server.is_error());
        let err = server.error().unwrap();
        assert_eq!(err.to_string(), "network server error: 404\n\"Not Found\"");
        assert!(matches!(err, NetworkFailure::Server(ServerFailure { status: s, .. }) if s == StatusCode::NOT_FOUND));

        let bare = Result::server_error(None, StatusCode::BAD_GATEWAY, None);
        assert_eq!(bare.error().unwrap().to_string(), "network server error: 502");

        let cause = TransportError::disconnected("eof");
        let network = Result::network_error(cause.clone());
        assert!(network.is_error());
        assert_eq!(network.error(), Some(NetworkFailure::Network(cause)));

        let unknown = Result::unknown_error(UnknownCause::new("bad json"), None, None);
        assert!(unknown.is_error());
        match unknown.error() {
            Some(NetworkFailure::Unknown(cause)) => assert_eq!(cause.to_string(), "bad json"),
            other => panic!("expected unknown failure, got {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        let server = Result::server_error(None, StatusCode::INTERNAL_SERVER_ERROR, None);
        assert_eq!(server.to_string(), "network server error: 500");

        let unknown = Result::unknown_error(UnknownCause::new("eof"), Some(StatusCode::BAD_GATEWAY), None);
        assert_eq!(unknown.to_string(), "unknown error (502): eof");
    }
}
