// src/progress.rs - Best-effort progress delivery and cooperative cancellation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{SyncSender, TrySendError};

/// Where per-step progress percentages (0–100) get delivered. Delivery is
/// best-effort: a slow or absent consumer never blocks the run, and dropped
/// updates are acceptable; correctness never depends on one being observed.
pub enum ProgressSink {
    /// Discard everything
    Null,
    /// Invoke a callback synchronously
    Callback(Box<dyn Fn(f64) + Send + Sync>),
    /// Non-blocking send into a bounded channel; updates are dropped when
    /// the channel is full or disconnected
    Channel(SyncSender<f64>),
}

impl ProgressSink {
    pub fn callback(f: impl Fn(f64) + Send + Sync + 'static) -> Self {
        ProgressSink::Callback(Box::new(f))
    }

    pub fn report(&self, percent: f64) {
        match self {
            ProgressSink::Null => {}
            ProgressSink::Callback(f) => f(percent),
            ProgressSink::Channel(tx) => match tx.try_send(percent) {
                Ok(()) | Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {}
            },
        }
    }
}

impl Default for ProgressSink {
    fn default() -> Self {
        ProgressSink::Null
    }
}

impl std::fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressSink::Null => write!(f, "ProgressSink::Null"),
            ProgressSink::Callback(_) => write!(f, "ProgressSink::Callback"),
            ProgressSink::Channel(_) => write!(f, "ProgressSink::Channel"),
        }
    }
}

/// Cooperative cancellation flag shared between a caller and a long-running
/// optimizer. Checked between generations and between candidate evaluations;
/// a set token stops new work, it does not interrupt a run in flight.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::mpsc::sync_channel;

    #[test]
    fn callback_sink_sees_updates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let inner = seen.clone();
        let sink = ProgressSink::callback(move |pct| inner.lock().unwrap().push(pct));
        sink.report(25.0);
        sink.report(50.0);
        assert_eq!(*seen.lock().unwrap(), vec![25.0, 50.0]);
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (tx, rx) = sync_channel(1);
        let sink = ProgressSink::Channel(tx);
        sink.report(10.0);
        sink.report(20.0); // channel full: dropped, not blocked
        assert_eq!(rx.try_recv().unwrap(), 10.0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn disconnected_channel_is_harmless() {
        let (tx, rx) = sync_channel(1);
        drop(rx);
        let sink = ProgressSink::Channel(tx);
        sink.report(99.0);
    }

    #[test]
    fn cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
