//! Direct awaitable adapter over `reqwest`.
//!
//! # Data Flow
//! ```text
//! RequestBuilder
//!     → send() (reqwest connection pool, TLS, redirects)
//!     → read body, decode 2xx bodies with the success converter
//!     → RawOutcome
//!     → classify → NetworkResult
//! ```
//!
//! # Design Decisions
//! - Connect, timeout, request and body-stream errors are connectivity failures
//! - A zero-length 2xx body counts as absent
//! - Timeouts are enforced by the transport, never by this layer

mod expect;

pub use expect::Expect;

use reqwest::{Method, RequestBuilder};
use thiserror::Error;
use url::Url;

use crate::bridge::{self, CallBridge};
use crate::classify::{classify, RawOutcome, RawResponse, TransportFailure};
use crate::config::{ClientConfig, TransportConfig};
use crate::observability::metrics;
use crate::response::{NetworkResult, TransportError};
use crate::retry::RetryPolicy;

/// Errors raised while building a [`NetworkClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// HTTP client whose calls always end in a [`NetworkResult`].
#[derive(Debug, Clone)]
pub struct NetworkClient {
    http: reqwest::Client,
    base_url: Option<Url>,
    retry: RetryPolicy,
}

impl NetworkClient {
    pub fn new(transport: &TransportConfig, retry: RetryPolicy) -> Result<Self, ClientBuildError> {
        let http = reqwest::Client::builder()
            .connect_timeout(transport.connect_timeout())
            .timeout(transport.request_timeout())
            .user_agent(transport.user_agent.as_str())
            .build()?;

        let base_url = transport.base_url.as_deref().map(Url::parse).transpose()?;

        tracing::debug!(
            base_url = ?base_url.as_ref().map(Url::as_str),
            connect_timeout_ms = transport.connect_timeout_ms,
            request_timeout_ms = transport.request_timeout_ms,
            "Network client built"
        );

        Ok(Self {
            http,
            base_url,
            retry,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientBuildError> {
        Self::new(&config.transport, config.retry.policy())
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(http: reqwest::Client, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url: None,
            retry,
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Start a request; `path` is resolved against the base URL if one is set.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        match self.base_url.as_ref().map(|base| base.join(path)) {
            Some(Ok(url)) => self.http.request(method, url),
            // Unresolvable paths surface as a builder error when sent.
            _ => self.http.request(method, path),
        }
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    /// Send `request` and classify whatever comes back.
    pub async fn execute<S, E>(&self, request: RequestBuilder, expect: &Expect<S, E>) -> NetworkResult<S, E> {
        let outcome = perform(request, expect).await;
        let result = classify(outcome, &expect.success_type, &*expect.error);

        tracing::debug!(
            kind = result.kind(),
            status = ?result.status().map(|s| s.as_u16()),
            "Request classified"
        );
        metrics::record_result(result.kind());
        result
    }

    /// Like [`execute`](Self::execute), retried on network errors with the
    /// client's policy. `build` is called once per attempt.
    pub async fn execute_with_retry<S, E, B>(&self, build: B, expect: &Expect<S, E>) -> NetworkResult<S, E>
    where
        B: Fn(&NetworkClient) -> RequestBuilder,
    {
        self.retry
            .execute(|| self.execute(build(self), expect))
            .await
    }

    /// Run the call in the background and hand back a cancellable bridge.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue<S, E>(&self, request: RequestBuilder, expect: Expect<S, E>) -> CallBridge<S, E>
    where
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        let client = self.clone();
        bridge::spawn(async move { client.execute(request, &expect).await })
    }
}

async fn perform<S, E>(request: RequestBuilder, expect: &Expect<S, E>) -> RawOutcome<S> {
    let response = request.send().await.map_err(transport_failure)?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.bytes().await.map_err(transport_failure)?;

    let mut raw = RawResponse::new(status, headers);
    if status.is_success() {
        if !bytes.is_empty() {
            let body = expect.success.convert(bytes).map_err(TransportFailure::Other)?;
            raw.body = Some(body);
        }
    } else {
        raw.error_body = Some(bytes);
    }
    Ok(raw)
}

/// Sort a `reqwest` error into connectivity or "other".
fn transport_failure(err: reqwest::Error) -> TransportFailure {
    let message = err.to_string();
    let cause = if err.is_timeout() {
        TransportError::timeout(message)
    } else if err.is_connect() {
        TransportError::connect(message)
    } else if err.is_request() || err.is_body() {
        TransportError::disconnected(message)
    } else {
        tracing::warn!(error = %err, "Unexpected transport error");
        return TransportFailure::other(err);
    };
    TransportFailure::Connectivity(cause.with_source(err))
}
