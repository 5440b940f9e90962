//! Body converters: raw bytes into typed values.

use std::marker::PhantomData;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::response::BoxError;

/// Turns a raw body into a typed value.
///
/// The body is taken by value: a converter sees each payload at most once.
pub trait BodyConverter<T> {
    fn convert(&self, body: Bytes) -> Result<T, BoxError>;
}

impl<T, F> BodyConverter<T> for F
where
    F: Fn(Bytes) -> Result<T, BoxError>,
{
    fn convert(&self, body: Bytes) -> Result<T, BoxError> {
        self(body)
    }
}

/// Decodes the body as UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8;

impl BodyConverter<String> for Utf8 {
    fn convert(&self, body: Bytes) -> Result<String, BoxError> {
        Ok(String::from_utf8(body.to_vec())?)
    }
}

/// Decodes the body as JSON with serde.
pub struct Json<T>(PhantomData<fn() -> T>);

impl<T> Json<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Json<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Json<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Json<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Json")
    }
}

impl<T: DeserializeOwned> BodyConverter<T> for Json<T> {
    fn convert(&self, body: Bytes) -> Result<T, BoxError> {
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Ignores the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl BodyConverter<()> for Discard {
    fn convert(&self, _body: Bytes) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Hands the bytes through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBytes;

impl BodyConverter<Bytes> for RawBytes {
    fn convert(&self, body: Bytes) -> Result<Bytes, BoxError> {
        Ok(body)
    }
}
