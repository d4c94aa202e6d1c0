//! # Backoffice Console
//!
//! Command-line front end for the back-office client.
//!
//! ## Usage
//! ```text
//! BACKOFFICE_USERNAME=admin BACKOFFICE_PASSWORD=... backoffice         # one-shot report
//! BACKOFFICE_USERNAME=admin BACKOFFICE_PASSWORD=... backoffice watch   # keep health checks running
//! ```
//!
//! A token persisted by an earlier run is reused and no login is attempted.

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use backoffice_client::{ClientConfig, Dashboard};
use backoffice_core::{messages, Credentials, DASHBOARD_VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let watch = std::env::args().skip(1).any(|arg| arg == "watch");
    info!(version = DASHBOARD_VERSION, "Starting back-office console");

    let config = ClientConfig::load_or_default(None);
    let mut dashboard = Dashboard::new(config).context("invalid client configuration")?;
    dashboard.start();

    if !dashboard.is_authenticated() {
        let outcome = dashboard.login(&credentials_from_env()).await;
        if !outcome.success {
            let reason = outcome.error.unwrap_or_else(|| messages::UNEXPECTED_ERROR.to_string());
            error!(error = %reason, "Login failed");
            dashboard.shutdown().await;
            anyhow::bail!("login failed: {}", reason);
        }
    }

    dashboard.sync_all().await;
    report(&dashboard).await?;

    if watch {
        info!("Watching API health, press Ctrl+C to stop");
        shutdown_signal().await;
    }

    dashboard.shutdown().await;
    info!("Console shutdown complete");
    Ok(())
}

fn credentials_from_env() -> Credentials {
    Credentials {
        username: std::env::var("BACKOFFICE_USERNAME").unwrap_or_default(),
        password: std::env::var("BACKOFFICE_PASSWORD").unwrap_or_default(),
    }
}

/// Logs the dashboard panels.
async fn report(dashboard: &Dashboard) -> anyhow::Result<()> {
    let categories = dashboard.category_stats();
    info!(
        total = categories.total,
        active = categories.active,
        inactive = categories.inactive,
        active_percentage = categories.active_percentage,
        "Categories"
    );

    let products = dashboard.product_stats();
    info!(
        total = products.total,
        active = products.active,
        discounted = products.discounted,
        total_value = %products.total_value,
        average_price = %products.average_price,
        "Products"
    );

    info!(total = dashboard.subcategories().len(), "Subcategories");

    for (resource, error) in [
        ("categorias", dashboard.categories().error()),
        ("produtos", dashboard.products().error()),
        ("subcategorias", dashboard.subcategories().error()),
    ] {
        if let Some(error) = error {
            warn!(resource, error = %error, "Store holds an error");
        }
    }

    let health = dashboard.check_health().await;
    info!(status = health.label(), "API");

    let system = serde_json::to_string_pretty(&dashboard.system_info())?;
    info!("System info:\n{}", system);
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
