//! # Toast Queue
//!
//! In-memory, ordered queue of timed operator notifications.
//!
//! ## Message Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  add() ──► created ──► visible ──┬── duration elapsed ──► removed      │
//! │                                  └── remove(id)       ──► removed      │
//! │                                                                         │
//! │  Expiry runs twice over:                                               │
//! │  • a per-message timer (spawned when duration > 0)                     │
//! │  • the sweeper task, every sweep interval (1 s by default)             │
//! │                                                                         │
//! │  duration == 0 → the message stays until remove(id) or clear()        │
//! │  Insertion order is display order.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use backoffice_core::ToastSeverity;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

// =============================================================================
// Toast
// =============================================================================

/// One queued notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// `toast_<unix-millis>_<counter>`, unique per queue.
    pub id: String,
    pub message: String,
    pub severity: ToastSeverity,
    pub created_at: Instant,
    /// Zero means the toast never expires on its own.
    pub duration: Duration,
}

impl Toast {
    pub fn is_persistent(&self) -> bool {
        self.duration.is_zero()
    }

    /// True once the toast has been visible for its whole duration.
    pub fn is_expired(&self, now: Instant) -> bool {
        !self.is_persistent() && now.saturating_duration_since(self.created_at) >= self.duration
    }
}

// =============================================================================
// Notifier Seam
// =============================================================================

/// Where stores send operator notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: ToastSeverity);

    fn success(&self, message: &str) {
        self.notify(message, ToastSeverity::Success);
    }

    fn error(&self, message: &str) {
        self.notify(message, ToastSeverity::Error);
    }

    fn info(&self, message: &str) {
        self.notify(message, ToastSeverity::Info);
    }

    fn warning(&self, message: &str) {
        self.notify(message, ToastSeverity::Warning);
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotifier;

impl Notifier for NoOpNotifier {
    fn notify(&self, _message: &str, _severity: ToastSeverity) {}
}

// =============================================================================
// Toast Queue
// =============================================================================

struct QueueInner {
    toasts: Mutex<Vec<Toast>>,
    counter: AtomicU64,
    default_duration: Duration,
}

impl QueueInner {
    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: &str) -> bool {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| t.id != id);
        toasts.len() != before
    }

    fn sweep(&self, now: Instant) -> usize {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|t| !t.is_expired(now));
        before - toasts.len()
    }
}

/// Shared toast queue. Clones see the same messages.
#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<QueueInner>,
}

impl ToastQueue {
    /// Creates a queue whose convenience methods use `default_duration`.
    pub fn new(default_duration: Duration) -> Self {
        ToastQueue {
            inner: Arc::new(QueueInner {
                toasts: Mutex::new(Vec::new()),
                counter: AtomicU64::new(0),
                default_duration,
            }),
        }
    }

    pub fn default_duration(&self) -> Duration {
        self.inner.default_duration
    }

    /// Appends a toast and returns its id.
    ///
    /// With a non-zero duration a timer removes the toast once it elapses.
    /// Outside a tokio runtime no timer is spawned and expiry is left to
    /// [`ToastQueue::sweep`].
    pub fn add(&self, message: impl Into<String>, severity: ToastSeverity, duration: Duration) -> String {
        let seq = self.inner.counter.fetch_add(1, Ordering::Relaxed);
        let id = format!("toast_{}_{}", chrono::Utc::now().timestamp_millis(), seq);

        let toast = Toast {
            id: id.clone(),
            message: message.into(),
            severity,
            created_at: Instant::now(),
            duration,
        };
        debug!(id = %toast.id, severity = %severity, "Toast added");
        self.inner.lock().push(toast);

        if !duration.is_zero() {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let queue = Arc::downgrade(&self.inner);
                let timer_id = id.clone();
                runtime.spawn(async move {
                    tokio::time::sleep(duration).await;
                    if let Some(inner) = queue.upgrade() {
                        inner.remove(&timer_id);
                    }
                });
            }
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.add(message, ToastSeverity::Success, self.inner.default_duration)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.add(message, ToastSeverity::Error, self.inner.default_duration)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.add(message, ToastSeverity::Info, self.inner.default_duration)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.add(message, ToastSeverity::Warning, self.inner.default_duration)
    }

    /// Dismisses a toast. Unknown ids are ignored.
    pub fn remove(&self, id: &str) -> bool {
        self.inner.remove(id)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Removes every expired toast and returns how many were dropped.
    pub fn sweep(&self) -> usize {
        self.inner.sweep(Instant::now())
    }

    /// Current toasts in display order.
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Starts the periodic sweeper. It stops when the handle is shut down or
    /// dropped, or once every queue clone is gone.
    pub fn spawn_sweeper(&self, interval: Duration) -> SweeperHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let sweeper = ToastSweeper {
            queue: Arc::downgrade(&self.inner),
            interval,
            shutdown_rx,
        };
        let task = tokio::spawn(sweeper.run());
        SweeperHandle { shutdown_tx, task }
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, message: &str, severity: ToastSeverity) {
        self.add(message, severity, self.inner.default_duration);
    }
}

impl std::fmt::Debug for ToastQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastQueue")
            .field("len", &self.len())
            .field("default_duration", &self.inner.default_duration)
            .finish()
    }
}

// =============================================================================
// Sweeper
// =============================================================================

struct ToastSweeper {
    queue: Weak<QueueInner>,
    interval: Duration,
    shutdown_rx: mpsc::Receiver<()>,
}

impl ToastSweeper {
    async fn run(mut self) {
        info!(interval_ms = self.interval.as_millis() as u64, "Toast sweeper started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(queue) = self.queue.upgrade() else {
                        break;
                    };
                    let removed = queue.sweep(Instant::now());
                    if removed > 0 {
                        debug!(removed, "Swept expired toasts");
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    break;
                }
            }
        }

        info!("Toast sweeper stopped");
    }
}

/// Owns the sweeper task.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Asks the sweeper to stop.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
