//! # API Health Monitor
//!
//! Periodically checks whether the back-office API is reachable.
//!
//! ## Probe Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  no session ──────────────────────────────────► connected (no probe)   │
//! │                                                                         │
//! │  GET <base>/health                                                     │
//! │    ├── 2xx and {"status":"UP"} ───────────────► connected (+ payload)  │
//! │    ├── 2xx with any other status ─────────────► offline                │
//! │    └── non-2xx / no response / not JSON                                │
//! │          GET <base>/api/<v>/categorias  (no Authorization header)      │
//! │            ├── 2xx or 401 ────────────────────► connected              │
//! │            └── other status / no response ────► offline                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::http::HttpClient;

/// Outcome of the `/health` probe.
#[derive(Debug, Clone, PartialEq)]
enum HealthProbe {
    Up(Value),
    Down,
    Unavailable,
}

// =============================================================================
// Health Status
// =============================================================================

/// Last known API reachability.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    /// `None` until the first check completes.
    pub api_connected: Option<bool>,
    pub last_check: Option<DateTime<Utc>>,
    /// Body of a successful `/health` answer.
    pub details: Option<Value>,
}

impl HealthStatus {
    /// Status label shown in the system panel.
    pub fn label(&self) -> &'static str {
        match self.api_connected {
            None => "verificando",
            Some(true) => "conectada",
            Some(false) => "offline",
        }
    }
}

// =============================================================================
// Health Monitor
// =============================================================================

/// Runs health probes and holds the latest result.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    http: HttpClient,
    status: Arc<RwLock<HealthStatus>>,
}

impl HealthMonitor {
    pub fn new(http: HttpClient) -> Self {
        HealthMonitor {
            http,
            status: Arc::new(RwLock::new(HealthStatus::default())),
        }
    }

    pub fn status(&self) -> HealthStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Performs one check and records the result.
    pub async fn check_now(&self) -> HealthStatus {
        let (connected, details) = if !self.http.session().is_authenticated() {
            (true, None)
        } else {
            match self.probe_health().await {
                HealthProbe::Up(details) => (true, Some(details)),
                HealthProbe::Down => (false, None),
                HealthProbe::Unavailable => (self.probe_api().await, None),
            }
        };

        let status = HealthStatus {
            api_connected: Some(connected),
            last_check: Some(Utc::now()),
            details,
        };

        let previous = {
            let mut current = self.status.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, status.clone())
        };

        if previous.api_connected != status.api_connected {
            if connected {
                info!(base_url = %self.http.config().base_url(), "API reachable");
            } else {
                warn!(base_url = %self.http.config().base_url(), "API unreachable");
            }
        }

        status
    }

    /// `/health` answering 2xx with a JSON body; `status == "UP"` means up.
    async fn probe_health(&self) -> HealthProbe {
        let url = self.http.config().health_url();
        let request = self.http.inner().get(&url).timeout(self.http.config().health_probe_timeout());
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "Health endpoint unreachable");
                return HealthProbe::Unavailable;
            }
        };

        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "Health endpoint not available");
            return HealthProbe::Unavailable;
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "Health endpoint answered without JSON");
                return HealthProbe::Unavailable;
            }
        };

        if body.get("status").and_then(Value::as_str) == Some("UP") {
            HealthProbe::Up(body)
        } else {
            debug!(status = ?body.get("status"), "Health endpoint reported not UP");
            HealthProbe::Down
        }
    }

    /// Unauthenticated list request; 2xx or 401 proves the API is serving.
    async fn probe_api(&self) -> bool {
        let url = self.http.config().api_url("/categorias");
        let request = self.http.inner().get(&url).timeout(self.http.config().health_probe_timeout());
        match request.send().await {
            Ok(response) => {
                let status = response.status();
                status.is_success() || status.as_u16() == 401
            }
            Err(e) => {
                debug!(error = %e, "API probe failed");
                false
            }
        }
    }

    /// Starts periodic checks. The first check runs immediately.
    pub fn spawn(&self, interval: Duration) -> HealthHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(self.clone().run(interval, shutdown_rx));
        HealthHandle { shutdown_tx, task }
    }

    async fn run(self, period: Duration, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(interval_secs = period.as_secs(), "Health monitor started");

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let status = self.check_now().await;
                    debug!(status = status.label(), "Health check");
                }

                _ = shutdown_rx.recv() => {
                    break;
                }
            }
        }

        info!("Health monitor stopped");
    }
}

/// Owns the periodic health task.
#[derive(Debug)]
pub struct HealthHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl HealthHandle {
    /// Asks the monitor to stop.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(()).await;
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for HealthHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server::{client, serve};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn unreachable_base() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        base
    }

    #[tokio::test]
    async fn test_no_session_assumes_connected() {
        let monitor = HealthMonitor::new(client(&unreachable_base().await, None));
        assert_eq!(monitor.status().label(), "verificando");

        let status = monitor.check_now().await;
        assert_eq!(status.api_connected, Some(true));
        assert!(status.last_check.is_some());
        assert_eq!(monitor.status().label(), "conectada");
    }

    #[tokio::test]
    async fn test_health_up_keeps_payload() {
        let router = Router::new().route(
            "/health",
            get(|| async { Json(json!({ "status": "UP", "db": "ok" })) }),
        );
        let monitor = HealthMonitor::new(client(&serve(router).await, Some("t")));

        let status = monitor.check_now().await;
        assert_eq!(status.api_connected, Some(true));
        assert_eq!(status.details.unwrap()["db"], "ok");
    }

    #[tokio::test]
    async fn test_fallback_accepts_unauthorized_without_token() {
        let router = Router::new().route(
            "/api/v1/categorias",
            get(|headers: HeaderMap| async move {
                if headers.contains_key("authorization") {
                    StatusCode::OK
                } else {
                    StatusCode::UNAUTHORIZED
                }
            }),
        );
        let monitor = HealthMonitor::new(client(&serve(router).await, Some("t")));

        let status = monitor.check_now().await;
        assert_eq!(status.api_connected, Some(true));
        assert!(status.details.is_none());
    }

    #[tokio::test]
    async fn test_health_down_is_offline_without_fallback() {
        let router = Router::new()
            .route("/health", get(|| async { Json(json!({ "status": "DOWN" })) }))
            .route("/api/v1/categorias", get(|| async { StatusCode::UNAUTHORIZED }));
        let monitor = HealthMonitor::new(client(&serve(router).await, Some("t")));

        let status = monitor.check_now().await;
        assert_eq!(status.api_connected, Some(false));
        assert_eq!(status.label(), "offline");
        assert!(status.details.is_none());
    }

    #[tokio::test]
    async fn test_missing_health_and_failing_api_is_offline() {
        let router = Router::new().route(
            "/api/v1/categorias",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let monitor = HealthMonitor::new(client(&serve(router).await, Some("t")));
        assert_eq!(monitor.check_now().await.label(), "offline");

        let monitor = HealthMonitor::new(client(&unreachable_base().await, Some("t")));
        assert_eq!(monitor.check_now().await.api_connected, Some(false));
    }

    #[tokio::test]
    async fn test_hanging_health_endpoint_times_out_to_fallback() {
        let router = Router::new()
            .route(
                "/health",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Json(json!({ "status": "UP" }))
                }),
            )
            .route("/api/v1/categorias", get(|| async { StatusCode::UNAUTHORIZED }));
        let base = serve(router).await;

        let mut config = crate::config::ClientConfig::default();
        config.api.base_url = base;
        config.health.probe_timeout_secs = 1;
        let session = crate::session::Session::restore(Arc::new(
            crate::session::MemoryTokenStore::with_token("t"),
        ));
        let monitor = HealthMonitor::new(HttpClient::new(Arc::new(config), session).unwrap());

        let status = tokio::time::timeout(Duration::from_secs(10), monitor.check_now())
            .await
            .expect("probe must not wait for the API timeout");
        assert_eq!(status.api_connected, Some(true));
        assert!(status.details.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_monitor_checks_and_stops() {
        let monitor = HealthMonitor::new(client("http://127.0.0.1:9", None));
        let handle = monitor.spawn(Duration::from_secs(60));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(monitor.status().api_connected, Some(true));

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(handle.is_finished());
    }
}
