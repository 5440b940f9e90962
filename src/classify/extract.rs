//! Error-body extraction.

use bytes::Bytes;

use super::convert::BodyConverter;
use crate::response::BoxError;

/// Decode an error payload if there is one worth decoding.
///
/// Absent and zero-length payloads yield `Ok(None)` without touching the
/// converter. Conversion failures are returned to the caller untouched.
pub fn extract_error_body<E, C>(raw: Option<Bytes>, converter: &C) -> Result<Option<E>, BoxError>
where
    C: BodyConverter<E> + ?Sized,
{
    match raw {
        None => Ok(None),
        Some(bytes) if bytes.is_empty() => Ok(None),
        Some(bytes) => converter.convert(bytes).map(Some),
    }
}
