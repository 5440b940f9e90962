//! Outcome classification.

use super::convert::BodyConverter;
use super::extract::extract_error_body;
use super::outcome::{RawOutcome, RawResponse, SuccessType, TransportFailure};
use crate::response::{NetworkResult, UnknownCause};

/// Map one transport outcome onto exactly one [`NetworkResult`] variant.
///
/// Never fails: converter errors become `UnknownError`. The error converter
/// is invoked at most once.
pub fn classify<S, E, C>(
    outcome: RawOutcome<S>,
    success_type: &SuccessType<S>,
    error_converter: &C,
) -> NetworkResult<S, E>
where
    C: BodyConverter<E> + ?Sized,
{
    match outcome {
        Ok(response) => classify_response(response, success_type, error_converter),
        Err(TransportFailure::Connectivity(cause)) => NetworkResult::network_error(cause),
        Err(TransportFailure::Response(response)) => {
            classify_response(response.into_raw(), success_type, error_converter)
        }
        Err(TransportFailure::Other(err)) => {
            NetworkResult::unknown_error(UnknownCause::new(err), None, None)
        }
    }
}

fn classify_response<S, E, C>(
    response: RawResponse<S>,
    success_type: &SuccessType<S>,
    error_converter: &C,
) -> NetworkResult<S, E>
where
    C: BodyConverter<E> + ?Sized,
{
    let RawResponse {
        status,
        headers,
        body,
        error_body,
    } = response;

    if status.is_success() {
        return match body.or_else(|| success_type.bodyless(status)) {
            Some(body) => NetworkResult::success(body, status, headers),
            // A body was expected and none came back.
            None => NetworkResult::server_error(None, status, Some(headers)),
        };
    }

    match extract_error_body(error_body, error_converter) {
        Ok(body) => NetworkResult::server_error(body, status, Some(headers)),
        Err(err) => {
            tracing::debug!(status = %status, error = %err, "Failed to decode error body");
            NetworkResult::unknown_error(UnknownCause::new(err), Some(status), Some(headers))
        }
    }
}
