//! Failure causes carried by [`NetworkResult`](super::NetworkResult).

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;

/// Boxed error returned by body converters and transports.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Shared error source, so results can be cloned and handed to several observers.
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// What went wrong below the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportErrorKind {
    /// Connection could not be established (refused, DNS, TLS handshake).
    #[error("connect")]
    Connect,
    /// The transport gave up waiting.
    #[error("timeout")]
    Timeout,
    /// The peer went away before a full response arrived.
    #[error("disconnected")]
    Disconnected,
    /// Any other I/O failure while talking to the peer.
    #[error("io")]
    Io,
}

/// A request that never produced a response.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    #[source]
    source: Option<SharedError>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error reported by the transport.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(Arc::from(source.into()));
        self
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Disconnected, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Io, message)
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let kind = match err.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock => TransportErrorKind::Timeout,
            ErrorKind::ConnectionRefused | ErrorKind::AddrNotAvailable => {
                TransportErrorKind::Connect
            }
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe
            | ErrorKind::UnexpectedEof => TransportErrorKind::Disconnected,
            _ => TransportErrorKind::Io,
        };
        Self::new(kind, err.to_string()).with_source(err)
    }
}

impl PartialEq for TransportError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message
    }
}

/// A local processing failure: a body that would not decode, or a transport
/// exception nobody anticipated.
#[derive(Clone)]
pub struct UnknownCause(SharedError);

impl UnknownCause {
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(Arc::from(err.into()))
    }

    /// The wrapped error.
    pub fn get(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }

    /// Try to view the cause as a concrete error type.
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for UnknownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for UnknownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for UnknownCause {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

// Causes are opaque; two are equal when they render the same way.
impl PartialEq for UnknownCause {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.to_string() == other.0.to_string()
    }
}

/// A non-2xx response seen as an error value.
///
/// The body is the decoded error body rendered with `Debug`, when there was one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("network server error: {}{}", .status.as_u16(), body_suffix(.body))]
pub struct ServerFailure {
    pub status: StatusCode,
    pub body: Option<String>,
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!("\n{b}")).unwrap_or_default()
}

/// The failure carried by any non-success [`NetworkResult`](super::NetworkResult).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkFailure {
    #[error(transparent)]
    Server(#[from] ServerFailure),

    #[error(transparent)]
    Network(#[from] TransportError),

    #[error(transparent)]
    Unknown(#[from] UnknownCause),
}
