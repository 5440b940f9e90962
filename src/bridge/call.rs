//! Single-assignment result cell with cancellation.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;

use crate::observability::metrics;
use crate::response::NetworkResult;

type Observer<S, E> = Box<dyn FnOnce(Arc<NetworkResult<S, E>>) + Send>;
type CancelHook = Box<dyn FnOnce() + Send>;

/// Observable lifecycle of a bridged call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Pending,
    Completed,
    Cancelled,
}

enum Slot<S, E> {
    Pending {
        observers: Vec<Observer<S, E>>,
        on_cancel: Option<CancelHook>,
    },
    Completed(Arc<NetworkResult<S, E>>),
    Cancelled,
}

struct Shared<S, E> {
    slot: Mutex<Slot<S, E>>,
}

impl<S, E> Shared<S, E> {
    fn lock(&self) -> MutexGuard<'_, Slot<S, E>> {
        // Observers and hooks never run under the lock, so a poisoned slot is still consistent.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Pending → Completed. Returns false if another transition won.
    fn complete(&self, result: NetworkResult<S, E>) -> bool {
        let result = Arc::new(result);
        let observers = {
            let mut slot = self.lock();
            match std::mem::replace(&mut *slot, Slot::Completed(Arc::clone(&result))) {
                Slot::Pending { observers, .. } => observers,
                previous => {
                    *slot = previous;
                    return false;
                }
            }
        };

        for observer in observers {
            observer(Arc::clone(&result));
        }
        true
    }

    /// Pending → Cancelled. Hands back the cancel hook (if any) to the winner.
    fn cancel(&self) -> Option<Option<CancelHook>> {
        let (on_cancel, observers) = {
            let mut slot = self.lock();
            match std::mem::replace(&mut *slot, Slot::Cancelled) {
                Slot::Pending {
                    observers,
                    on_cancel,
                } => (on_cancel, observers),
                previous => {
                    *slot = previous;
                    return None;
                }
            }
        };
        drop(observers);
        Some(on_cancel)
    }
}

/// Consumer side of a bridged call.
///
/// Cloning yields another handle onto the same call. Every observer sees
/// the same `Arc`'d result, and at most one of `Completed` / `Cancelled` is
/// ever reached.
pub struct CallBridge<S, E> {
    shared: Arc<Shared<S, E>>,
}

/// Transport side of a bridged call. Consumed by completion.
///
/// Dropping it without completing marks the call cancelled, as the
/// underlying call can no longer report back.
pub struct Completer<S, E> {
    shared: Arc<Shared<S, E>>,
    finished: bool,
}

impl<S, E> CallBridge<S, E>
where
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// A pending call with nothing to cancel downstream.
    pub fn new() -> (Self, Completer<S, E>) {
        Self::build(None)
    }

    /// A pending call whose cancellation runs `on_cancel` exactly once.
    pub fn with_cancel(on_cancel: impl FnOnce() + Send + 'static) -> (Self, Completer<S, E>) {
        Self::build(Some(Box::new(on_cancel)))
    }

    fn build(on_cancel: Option<CancelHook>) -> (Self, Completer<S, E>) {
        let shared = Arc::new(Shared {
            slot: Mutex::new(Slot::Pending {
                observers: Vec::new(),
                on_cancel,
            }),
        });
        let completer = Completer {
            shared: Arc::clone(&shared),
            finished: false,
        };
        (Self { shared }, completer)
    }

    /// Install the downstream cancel hook after the call has started.
    ///
    /// If the call is already terminal the hook is dropped without running.
    pub(crate) fn set_cancel_hook(&self, hook: impl FnOnce() + Send + 'static) {
        if let Slot::Pending { on_cancel, .. } = &mut *self.shared.lock() {
            *on_cancel = Some(Box::new(hook));
        }
    }

    /// Register interest in the result.
    ///
    /// Runs immediately (on this thread) if the call already completed; never
    /// runs if the call is or becomes cancelled.
    pub fn on_complete(&self, observer: impl FnOnce(Arc<NetworkResult<S, E>>) + Send + 'static) {
        let ready = {
            let mut slot = self.shared.lock();
            match &mut *slot {
                Slot::Pending { observers, .. } => {
                    observers.push(Box::new(observer));
                    return;
                }
                Slot::Completed(result) => Arc::clone(result),
                Slot::Cancelled => return,
            }
        };
        observer(ready);
    }

    /// Cancel the call. Returns true if this call won the transition.
    ///
    /// No-op once the call has completed.
    pub fn cancel(&self) -> bool {
        match self.shared.cancel() {
            Some(on_cancel) => {
                tracing::debug!("Bridged call cancelled, forwarding to transport");
                metrics::record_cancellation();
                if let Some(hook) = on_cancel {
                    hook();
                }
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> CallState {
        match &*self.shared.lock() {
            Slot::Pending { .. } => CallState::Pending,
            Slot::Completed(_) => CallState::Completed,
            Slot::Cancelled => CallState::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == CallState::Cancelled
    }

    /// The stored result, if the call has completed.
    pub fn result(&self) -> Option<Arc<NetworkResult<S, E>>> {
        match &*self.shared.lock() {
            Slot::Completed(result) => Some(Arc::clone(result)),
            _ => None,
        }
    }

    /// Wait for the result. Resolves to `None` if the call is cancelled.
    pub async fn wait(&self) -> Option<Arc<NetworkResult<S, E>>> {
        let (tx, rx) = oneshot::channel();
        self.on_complete(move |result| {
            let _ = tx.send(result);
        });
        rx.await.ok()
    }
}

impl<S, E> Clone for CallBridge<S, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S, E> fmt::Debug for CallBridge<S, E>
where
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallBridge").field("state", &self.state()).finish()
    }
}

impl<S, E> Completer<S, E> {
    /// Deliver the result. Returns false if the call was already cancelled,
    /// in which case the result is discarded.
    pub fn complete(mut self, result: NetworkResult<S, E>) -> bool {
        self.finished = true;
        let delivered = self.shared.complete(result);
        if !delivered {
            tracing::debug!("Discarding completion of a cancelled call");
        }
        delivered
    }

    /// The transport gave up on its own; the bridge moves to `Cancelled`
    /// without calling back into the transport.
    pub fn cancelled(mut self) {
        self.finished = true;
        self.shared.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(&*self.shared.lock(), Slot::Cancelled)
    }
}

impl<S, E> Drop for Completer<S, E> {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::TransportError;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Result = NetworkResult<String, String>;

    fn ok(body: &str) -> Result {
        NetworkResult::success(body.to_string(), StatusCode::OK, HeaderMap::new())
    }

    #[test]
    fn test_observers_share_one_result() {
        let (bridge, completer) = CallBridge::<String, String>::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..3 {
            let seen = Arc::clone(&seen);
            bridge.on_complete(move |result| seen.lock().unwrap().push(result));
        }

        assert_eq!(bridge.state(), CallState::Pending);
        assert!(completer.complete(ok("Hey")));
        assert_eq!(bridge.state(), CallState::Completed);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|r| Arc::ptr_eq(r, &seen[0])));
        assert_eq!(seen[0].body().map(String::as_str), Some("Hey"));
    }

    #[test]
    fn test_late_observer_runs_immediately() {
        let (bridge, completer) = CallBridge::<String, String>::new();
        completer.complete(ok("done"));

        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        bridge.on_complete(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_forwards_once_and_drops_late_completion() {
        let forwarded = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&forwarded);
        let (bridge, completer) = CallBridge::<String, String>::with_cancel(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        let notified = Arc::new(AtomicUsize::new(0));
        let n = Arc::clone(&notified);
        bridge.on_complete(move |_| {
            n.fetch_add(1, Ordering::SeqCst);
        });

        assert!(bridge.cancel());
        assert!(!bridge.cancel());
        assert!(completer.is_cancelled());
        assert!(!completer.complete(ok("too late")));

        assert_eq!(forwarded.load(Ordering::SeqCst), 1);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
        assert_eq!(bridge.state(), CallState::Cancelled);
        assert!(bridge.result().is_none());
    }

    #[test]
    fn test_cancel_after_completion_is_noop() {
        let forwarded = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&forwarded);
        let (bridge, completer) = CallBridge::<String, String>::with_cancel(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        completer.complete(NetworkResult::network_error(TransportError::connect("refused")));
        assert!(!bridge.cancel());
        assert_eq!(forwarded.load(Ordering::SeqCst), 0);
        assert!(bridge.result().unwrap().is_network_error());
    }

    #[test]
    fn test_dropped_completer_cancels_without_forwarding() {
        let forwarded = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&forwarded);
        let (bridge, completer) = CallBridge::<String, String>::with_cancel(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        drop(completer);
        assert_eq!(bridge.state(), CallState::Cancelled);
        assert_eq!(forwarded.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_transport_side_cancellation_skips_hook_and_observers() {
        let forwarded = Arc::new(AtomicUsize::new(0));
        let notified = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&forwarded);
        let (bridge, completer) = CallBridge::<String, String>::with_cancel(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let n = Arc::clone(&notified);
        bridge.on_complete(move |_| {
            n.fetch_add(1, Ordering::SeqCst);
        });

        completer.cancelled();

        assert_eq!(bridge.state(), CallState::Cancelled);
        assert!(bridge.is_cancelled());
        assert!(bridge.result().is_none());
        assert_eq!(forwarded.load(Ordering::SeqCst), 0);
        assert_eq!(notified.load(Ordering::SeqCst), 0);

        // Already terminal: a later cancel from the caller side neither wins nor forwards.
        assert!(!bridge.cancel());
        let n = Arc::clone(&notified);
        bridge.on_complete(move |_| {
            n.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(forwarded.load(Ordering::SeqCst), 0);
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrent_cancel_and_complete_have_one_winner() {
        for _ in 0..200 {
            let (bridge, completer) = CallBridge::<String, String>::new();
            let notified = Arc::new(AtomicUsize::new(0));
            let n = Arc::clone(&notified);
            bridge.on_complete(move |_| {
                n.fetch_add(1, Ordering::SeqCst);
            });

            let canceller = bridge.clone();
            let cancel = std::thread::spawn(move || canceller.cancel());
            let complete = std::thread::spawn(move || completer.complete(ok("race")));

            let cancelled = cancel.join().unwrap();
            let completed = complete.join().unwrap();
            assert!(cancelled ^ completed, "exactly one transition must win");

            match bridge.state() {
                CallState::Completed => {
                    assert!(completed);
                    assert_eq!(notified.load(Ordering::SeqCst), 1);
                }
                CallState::Cancelled => {
                    assert!(cancelled);
                    assert_eq!(notified.load(Ordering::SeqCst), 0);
                    assert!(bridge.result().is_none());
                }
                CallState::Pending => panic!("call left pending"),
            }
        }
    }

    #[tokio::test]
    async fn test_wait_resolves_or_reports_cancellation() {
        let (bridge, completer) = CallBridge::<String, String>::new();
        let waiter = bridge.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });
        tokio::task::yield_now().await;
        completer.complete(ok("awaited"));
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.body().map(String::as_str), Some("awaited"));

        let (bridge, _completer) = CallBridge::<String, String>::new();
        let waiter = bridge.clone();
        let handle = tokio::spawn(async move { waiter.wait().await });
        tokio::task::yield_now().await;
        bridge.cancel();
        assert!(handle.await.unwrap().is_none());
    }
}
