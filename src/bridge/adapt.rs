//! Adapters from transport calls to [`CallBridge`]s.

use std::future::Future;
use std::sync::Arc;

use super::call::CallBridge;
use crate::classify::{classify, BodyConverter, RawOutcome, SuccessType};
use crate::observability::metrics;
use crate::response::NetworkResult;

/// Callback a transport invokes exactly once with the outcome of a call.
pub type TransportCallback<S> = Box<dyn FnOnce(RawOutcome<S>) + Send>;

/// A callback-style transport call.
///
/// `enqueue` may report back on any thread, including synchronously before
/// it returns. `cancel` must be safe to call while the call is in flight.
pub trait TransportCall<S>: Send + Sync + 'static {
    fn enqueue(&self, callback: TransportCallback<S>);

    fn cancel(&self);
}

/// Start `call` and bridge its outcome, classified, into a [`CallBridge`].
///
/// Cancelling the bridge before completion cancels `call`.
pub fn enqueue<S, E, C, V>(
    call: Arc<C>,
    success_type: SuccessType<S>,
    error_converter: V,
) -> CallBridge<S, E>
where
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
    C: TransportCall<S> + ?Sized,
    V: BodyConverter<E> + Send + 'static,
{
    let target = Arc::clone(&call);
    let (bridge, completer) = CallBridge::with_cancel(move || target.cancel());

    call.enqueue(Box::new(move |outcome| {
        let result = classify(outcome, &success_type, &error_converter);
        metrics::record_result(result.kind());
        completer.complete(result);
    }));

    bridge
}

/// Run an awaitable, already-classified call on the tokio runtime.
///
/// Cancelling the bridge aborts the task. If the task panics the bridge
/// ends up `Cancelled`. Must be called from within a tokio runtime.
pub fn spawn<S, E, F>(call: F) -> CallBridge<S, E>
where
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
    F: Future<Output = NetworkResult<S, E>> + Send + 'static,
{
    let (bridge, completer) = CallBridge::new();
    let task = tokio::spawn(async move {
        let result = call.await;
        completer.complete(result);
    });
    bridge.set_cancel_hook(move || task.abort());
    bridge
}
