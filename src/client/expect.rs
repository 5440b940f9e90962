//! What a call expects back: the success type and the body converters.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::classify::{BodyConverter, Discard, Json, SuccessType, Utf8};

/// Decoding setup for one typed call.
///
/// Cheap to clone; the converters are shared.
pub struct Expect<S, E> {
    pub(crate) success_type: SuccessType<S>,
    pub(crate) success: Arc<dyn BodyConverter<S> + Send + Sync>,
    pub(crate) error: Arc<dyn BodyConverter<E> + Send + Sync>,
}

impl<S, E> Expect<S, E> {
    pub fn new(
        success_type: SuccessType<S>,
        success: impl BodyConverter<S> + Send + Sync + 'static,
        error: impl BodyConverter<E> + Send + Sync + 'static,
    ) -> Self {
        Self {
            success_type,
            success: Arc::new(success),
            error: Arc::new(error),
        }
    }

    pub fn success_type(&self) -> &SuccessType<S> {
        &self.success_type
    }
}

impl Expect<String, String> {
    /// UTF-8 text on both sides; a 204 yields an empty string.
    pub fn text() -> Self {
        Self::new(SuccessType::body_or_default(), Utf8, Utf8)
    }
}

impl<E: DeserializeOwned + 'static> Expect<(), E> {
    /// No success body; JSON error payloads.
    pub fn empty() -> Self {
        Self::new(SuccessType::unit(), Discard, Json::<E>::new())
    }
}

impl<S, E> Expect<S, E>
where
    S: DeserializeOwned + Default + 'static,
    E: DeserializeOwned + 'static,
{
    /// JSON on both sides; a 204 yields `S::default()`, any other empty
    /// 2xx is a server error.
    pub fn json() -> Self {
        Self::new(SuccessType::body_or_default(), Json::<S>::new(), Json::<E>::new())
    }
}

impl<S, E> Clone for Expect<S, E> {
    fn clone(&self) -> Self {
        Self {
            success_type: self.success_type,
            success: Arc::clone(&self.success),
            error: Arc::clone(&self.error),
        }
    }
}

impl<S, E> std::fmt::Debug for Expect<S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expect")
            .field("success_type", &self.success_type)
            .finish_non_exhaustive()
    }
}
