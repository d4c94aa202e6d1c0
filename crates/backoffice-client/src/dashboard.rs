//! # Dashboard
//!
//! Wires the session, HTTP client, services, stores, toast queue and health
//! monitor together and owns their background tasks.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Dashboard                                    │
//! │                                                                         │
//! │  ClientConfig ─► Session ─► HttpClient ─┬─► AuthService                │
//! │                                         ├─► CategoryStore              │
//! │                                         ├─► ProductStore               │
//! │                                         ├─► SubcategoryStore (30 s)    │
//! │                                         └─► HealthMonitor              │
//! │                                                                         │
//! │  start()    ─► toast sweeper + health task                             │
//! │  shutdown() ─► both tasks stopped, stores disposed                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use backoffice_core::validation::validate_credentials;
use backoffice_core::{messages, CategoryStats, Credentials, ProductStats, DASHBOARD_VERSION};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::debounce::SearchDebouncer;
use crate::error::ClientResult;
use crate::health::{HealthHandle, HealthMonitor, HealthStatus};
use crate::http::HttpClient;
use crate::services::{AuthService, CategoryService, ProductService, SubcategoryService};
use crate::session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
use crate::store::{
    CategoryStore, MutationOutcome, ProductStore, ScopedSubcategories, SubcategoryStore,
};
use crate::toast::{Notifier, SweeperHandle, ToastQueue};

// =============================================================================
// System Info
// =============================================================================

/// Versions and endpoint shown in the system panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub dashboard_version: String,
    pub api_version: String,
    pub base_url: String,
}

// =============================================================================
// Dashboard
// =============================================================================

/// The back-office client runtime.
pub struct Dashboard {
    config: Arc<ClientConfig>,
    session: Session,
    http: HttpClient,
    auth: AuthService,
    toasts: ToastQueue,
    categories: Arc<CategoryStore>,
    products: Arc<ProductStore>,
    subcategories: Arc<SubcategoryStore>,
    health: HealthMonitor,
    sweeper: Option<SweeperHandle>,
    health_task: Option<HealthHandle>,
}

impl Dashboard {
    /// Builds a dashboard with the default token store and toast notifier.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        DashboardBuilder::new(config).build()
    }

    pub fn builder(config: ClientConfig) -> DashboardBuilder {
        DashboardBuilder::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn categories(&self) -> &Arc<CategoryStore> {
        &self.categories
    }

    pub fn products(&self) -> &Arc<ProductStore> {
        &self.products
    }

    pub fn subcategories(&self) -> &Arc<SubcategoryStore> {
        &self.subcategories
    }

    /// A fresh category-scoped view over the subcategory store.
    pub fn scoped_subcategories(&self) -> ScopedSubcategories {
        ScopedSubcategories::new(self.subcategories.clone())
    }

    /// A search-box debouncer using the configured delay.
    pub fn search_debouncer(&self) -> SearchDebouncer {
        SearchDebouncer::new(self.config.search_debounce())
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Signs in. Blank fields are rejected before any request.
    pub async fn login(&self, credentials: &Credentials) -> MutationOutcome {
        if let Err(e) = validate_credentials(credentials) {
            return MutationOutcome::failure(e.to_string());
        }

        match self.auth.login(credentials).await {
            Ok(_) => MutationOutcome::success(),
            Err(err) => {
                warn!(status = err.status, error = %err, "Login failed");
                MutationOutcome::failure(err.message_or(messages::UNEXPECTED_ERROR))
            }
        }
    }

    pub fn logout(&self) {
        self.auth.logout();
        info!("Signed out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts the toast sweeper and, when enabled, the health monitor.
    /// Calling it again while running is a no-op.
    pub fn start(&mut self) {
        if self.sweeper.is_none() {
            self.sweeper = Some(self.toasts.spawn_sweeper(self.config.toast_sweep_interval()));
        }

        if self.config.health.enabled && self.health_task.is_none() {
            self.health_task = Some(self.health.spawn(self.config.health_interval()));
        }

        info!(
            base_url = %self.config.base_url(),
            health = self.config.health.enabled,
            "Dashboard started"
        );
    }

    /// Loads all three collections concurrently. Cached stores may skip the
    /// network.
    pub async fn sync_all(&self) {
        tokio::join!(
            self.categories.fetch(false),
            self.products.fetch(false),
            self.subcategories.fetch(false),
        );
    }

    /// Stops background tasks and disposes the stores.
    pub async fn shutdown(&mut self) {
        info!("Shutting down dashboard");

        if let Some(handle) = self.sweeper.take() {
            handle.shutdown().await;
        }
        if let Some(handle) = self.health_task.take() {
            handle.shutdown().await;
        }

        self.categories.dispose();
        self.products.dispose();
        self.subcategories.dispose();
    }

    // =========================================================================
    // Panels
    // =========================================================================

    pub fn category_stats(&self) -> CategoryStats {
        self.categories.category_stats()
    }

    pub fn product_stats(&self) -> ProductStats {
        self.products.product_stats()
    }

    pub fn health_status(&self) -> HealthStatus {
        self.health.status()
    }

    pub async fn check_health(&self) -> HealthStatus {
        self.health.check_now().await
    }

    pub fn system_info(&self) -> SystemInfo {
        SystemInfo {
            dashboard_version: DASHBOARD_VERSION.to_string(),
            api_version: self.config.api.version.clone(),
            base_url: self.config.base_url().to_string(),
        }
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("base_url", &self.config.base_url())
            .field("session", &self.session)
            .field("running", &self.sweeper.is_some())
            .finish()
    }
}

// =============================================================================
// Builder Pattern
// =============================================================================

/// Builder for a [`Dashboard`] with custom collaborators.
pub struct DashboardBuilder {
    config: ClientConfig,
    token_store: Option<Arc<dyn TokenStore>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl DashboardBuilder {
    pub fn new(config: ClientConfig) -> Self {
        DashboardBuilder {
            config,
            token_store: None,
            notifier: None,
        }
    }

    /// Overrides where the session token is persisted.
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Sends store notifications somewhere other than the toast queue.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Validates the configuration and wires everything together.
    pub fn build(self) -> ClientResult<Dashboard> {
        self.config.validate()?;

        let token_store = self
            .token_store
            .unwrap_or_else(|| default_token_store(&self.config));

        let config = Arc::new(self.config);
        let session = Session::restore(token_store);
        let http = HttpClient::new(config.clone(), session.clone())?;

        let toasts = ToastQueue::new(config.toast_duration());
        let notifier: Arc<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => Arc::new(toasts.clone()),
        };

        let categories = CategoryStore::with_config(
            CategoryService::new(http.clone()),
            notifier.clone(),
            &config,
        );
        let products =
            ProductStore::with_config(ProductService::new(http.clone()), notifier.clone(), &config);
        let subcategories = SubcategoryStore::with_config(
            SubcategoryService::new(http.clone()),
            notifier,
            &config,
        );

        Ok(Dashboard {
            auth: AuthService::new(http.clone()),
            health: HealthMonitor::new(http.clone()),
            config,
            session,
            http,
            toasts,
            categories: Arc::new(categories),
            products: Arc::new(products),
            subcategories: Arc::new(subcategories),
            sweeper: None,
            health_task: None,
        })
    }
}

/// File-backed store in the platform data directory, or memory when there
/// is none.
fn default_token_store(config: &ClientConfig) -> Arc<dyn TokenStore> {
    let path = config
        .auth
        .token_file
        .clone()
        .or_else(ClientConfig::default_token_path);

    match path {
        Some(path) => Arc::new(FileTokenStore::new(path, config.auth.token_key.clone())),
        None => {
            warn!("No data directory available, session will not persist");
            Arc::new(MemoryTokenStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_server::serve;
    use axum::http::StatusCode;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use backoffice_core::ToastSeverity;
    use serde_json::{json, Value};

    fn api() -> Router {
        Router::new()
            .route(
                "/api/v1/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "secret" {
                        (StatusCode::OK, Json(json!({ "accessToken": "jwt" })))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Usuário ou senha inválidos" })))
                    }
                }),
            )
            .route(
                "/api/v1/categorias",
                get(|| async {
                    Json(json!({ "success": true, "data": { "content": [
                        { "id": 9, "nome": "Cabelos", "ativo": true },
                        { "id": 4, "nome": "Pele", "ativo": false }
                    ]}}))
                }),
            )
            .route(
                "/api/v1/categorias/{id}",
                delete(|| async {
                    (
                        StatusCode::CONFLICT,
                        Json(json!({ "message": "constraint", "errorCode": "C.ITDx0001" })),
                    )
                }),
            )
            .route(
                "/api/v1/produtos",
                get(|| async {
                    Json(json!({ "content": [{
                        "id": 1, "name": "Shampoo", "price": 50, "discountPrice": 40,
                        "category": { "id": 9, "name": "Hair" }, "active": true
                    }]}))
                }),
            )
            .route(
                "/api/v1/subcategorias",
                get(|| async { Json(json!([{ "id": 5, "nome": "Shampoos", "categoriaId": 9 }])) }),
            )
    }

    async fn dashboard() -> Dashboard {
        let mut config = ClientConfig::default();
        config.api.base_url = serve(api()).await;
        config.health.enabled = false;

        Dashboard::builder(config)
            .with_token_store(Arc::new(MemoryTokenStore::new()))
            .build()
            .unwrap()
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_login_flow() {
        let dashboard = dashboard().await;

        let outcome = dashboard.login(&creds("admin", " ")).await;
        assert_eq!(outcome.error.as_deref(), Some(messages::LOGIN_MISSING_FIELDS));

        let outcome = dashboard.login(&creds("admin", "errada")).await;
        assert_eq!(outcome.error.as_deref(), Some("Usuário ou senha inválidos"));
        assert!(!dashboard.is_authenticated());

        assert!(dashboard.login(&creds("admin", "secret")).await.success);
        assert!(dashboard.is_authenticated());

        dashboard.logout();
        assert!(!dashboard.is_authenticated());
    }

    #[tokio::test]
    async fn test_sync_all_and_panels() {
        let mut dashboard = dashboard().await;
        dashboard.start();
        dashboard.login(&creds("admin", "secret")).await;
        dashboard.sync_all().await;

        let categories = dashboard.category_stats();
        assert_eq!((categories.total, categories.active), (2, 1));
        assert_eq!(categories.active_percentage, 50);

        let products = dashboard.product_stats();
        assert_eq!(products.total, 1);
        assert_eq!(products.total_value.cents(), 4000);

        let product = &dashboard.products().items()[0];
        assert_eq!(product.category_label(), Some("Hair"));
        assert_eq!(dashboard.subcategories().by_category(9).len(), 1);

        let info = dashboard.system_info();
        assert_eq!(info.dashboard_version, DASHBOARD_VERSION);
        assert_eq!(info.api_version, "v1");

        dashboard.shutdown().await;
        assert!(!dashboard.categories().is_alive());
    }

    #[tokio::test]
    async fn test_delete_conflict_reaches_toasts_with_curated_text() {
        let dashboard = dashboard().await;
        dashboard.login(&creds("admin", "secret")).await;

        let outcome = dashboard.categories().delete(9).await;
        assert_eq!(outcome.error.as_deref(), Some(messages::CATEGORY_DELETE_WITH_PRODUCTS));

        let toasts = dashboard.toasts().toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].severity, ToastSeverity::Error);
        assert_eq!(toasts[0].message, messages::CATEGORY_DELETE_WITH_PRODUCTS);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://catalogo".into();
        assert!(Dashboard::builder(config)
            .with_token_store(Arc::new(MemoryTokenStore::new()))
            .build()
            .unwrap_err()
            .is_config_error());
    }
}
