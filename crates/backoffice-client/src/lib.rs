//! # backoffice-client: REST Client and Sync Stores for the Back Office
//!
//! This crate talks to the catalog REST API and keeps local snapshots of
//! categories, products and subcategories in step with the server.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Back-Office Client Runtime                        │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Dashboard (orchestrator)                      │  │
//! │  │  login / logout • sync_all • stats • system info • shutdown      │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │  SyncStore<R>  │  │   ToastQueue   │  │    HealthMonitor       │    │
//! │  │                │  │                │  │                        │    │
//! │  │ fetch (cached) │─►│ timed messages │  │ /health, then probe    │    │
//! │  │ create/update/ │  │ + sweeper task │  │ the categories list    │    │
//! │  │ delete + toast │  │                │  │ every 60 s             │    │
//! │  └───────┬────────┘  └────────────────┘  └───────────┬────────────┘    │
//! │          ▼                                            │                 │
//! │  ┌────────────────────────────────────────┐           │                 │
//! │  │ Services (Resource trait)              │           │                 │
//! │  │ categorias • produtos • subcategorias  │           │                 │
//! │  │ envelope unwrapping • wire adapters    │           │                 │
//! │  └───────┬────────────────────────────────┘           │                 │
//! │          ▼                                            ▼                 │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │ HttpClient: bearer token from Session, errors → ApiError         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Client configuration (TOML file + environment)
//! - [`error`] - `ApiError`, domain codes and `ClientError`
//! - [`session`] - Session token and its persistence
//! - [`http`] - Signed requests and error normalization
//! - [`envelope`] - Response envelope unwrapping
//! - [`wire`] - Localized/English field adapters
//! - [`services`] - One REST facade per resource
//! - [`store`] - Sync stores and the category-scoped subcategory view
//! - [`toast`] - Timed notification queue
//! - [`health`] - API health monitor
//! - [`debounce`] - Search input debouncing
//! - [`dashboard`] - The orchestrator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use backoffice_client::{ClientConfig, Dashboard};
//! use backoffice_core::Credentials;
//!
//! let mut dashboard = Dashboard::new(ClientConfig::load_or_default(None))?;
//! dashboard.start();
//!
//! let outcome = dashboard.login(&credentials).await;
//! if outcome.success {
//!     dashboard.sync_all().await;
//!     println!("{:?}", dashboard.category_stats());
//! }
//!
//! dashboard.shutdown().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

// Plumbing
pub mod config;
pub mod error;
pub mod http;
pub mod session;

// REST layer
pub mod envelope;
pub mod services;
pub mod wire;

// State and background tasks
pub mod dashboard;
pub mod debounce;
pub mod health;
pub mod store;
pub mod toast;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::ClientConfig;
pub use dashboard::{Dashboard, DashboardBuilder, SystemInfo};
pub use debounce::SearchDebouncer;
pub use error::{ApiError, ApiResult, ClientError, ClientResult, DomainErrorCode};
pub use health::{HealthHandle, HealthMonitor, HealthStatus};
pub use http::HttpClient;
pub use services::{
    AuthService, CatalogEntity, CategoryService, ProductService, Resource, SubcategoryLookup,
    SubcategoryService,
};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
pub use store::{
    CategoryStore, FilteredView, MutationOutcome, ProductStore, ScopedSubcategories,
    StoreSnapshot, SubcategoryStore, SyncStore,
};
pub use toast::{NoOpNotifier, Notifier, SweeperHandle, Toast, ToastQueue};
