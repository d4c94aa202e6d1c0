//! Search input debouncing.
//!
//! Keystrokes are pushed as they arrive; a query settles once no new input
//! has been seen for the debounce delay (300 ms by default).

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Turns a stream of raw search input into settled queries.
#[derive(Debug)]
pub struct SearchDebouncer {
    input: watch::Sender<String>,
    settled: watch::Receiver<String>,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Spawns the debounce task. Must be called inside a tokio runtime.
    pub fn new(delay: Duration) -> Self {
        let (input, input_rx) = watch::channel(String::new());
        let (settled_tx, settled) = watch::channel(String::new());
        let task = tokio::spawn(Self::run(input_rx, settled_tx, delay));

        SearchDebouncer {
            input,
            settled,
            task,
        }
    }

    async fn run(mut input: watch::Receiver<String>, settled: watch::Sender<String>, delay: Duration) {
        while input.changed().await.is_ok() {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(delay) => break,
                    changed = input.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                }
            }

            let query = input.borrow_and_update().clone();
            settled.send_if_modified(|current| {
                if *current == query {
                    return false;
                }
                debug!(query = %query, "Search settled");
                *current = query;
                true
            });
        }
    }

    /// Records the latest raw input.
    pub fn push(&self, query: impl Into<String>) {
        let _ = self.input.send(query.into());
    }

    /// The last settled query.
    pub fn current(&self) -> String {
        self.settled.borrow().clone()
    }

    /// A receiver notified each time a new query settles.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.settled.clone()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
