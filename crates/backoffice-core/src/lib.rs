//! # backoffice-core: Pure Catalog Logic for the Back Office
//!
//! This crate holds the catalog domain of the back-office dashboard as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Back-Office Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/console (binary)                        │   │
//! │  │    login ──► sync catalog ──► log statistics ──► shutdown       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 backoffice-client (I/O layer)                   │   │
//! │  │    HTTP wrapper, services, sync stores, toasts, health          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ backoffice-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │validation │  │  filter   │  │   │
//! │  │   │ Category  │  │   Money   │  │  drafts   │  │  stats    │  │   │
//! │  │   │ Product   │  │  BRL fmt  │  │  images   │  │  format   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog entities, drafts, image uploads, toast severity
//! - [`money`] - Money in centavos with BRL formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Draft, image and login validation
//! - [`filter`] - Search and status filtering, empty-state classification
//! - [`stats`] - Dashboard counters
//! - [`format`] - Date and image-URL presentation helpers
//! - [`messages`] - Operator-facing pt-BR text
//!
//! ## Example Usage
//!
//! ```rust
//! use backoffice_core::money::Money;
//!
//! let price = Money::parse_decimal("R$ 1.234,56").unwrap();
//! assert_eq!(price.cents(), 123456);
//! assert_eq!(price.to_string(), "R$ 1.234,56");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod filter;
pub mod format;
pub mod messages;
pub mod money;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, Field, ValidationError};
pub use filter::{CatalogFilter, EmptyState, StatusFilter};
pub use messages::ResourceMessages;
pub use money::Money;
pub use stats::{CategoryStats, ProductStats};
pub use types::*;
pub use validation::DraftMode;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Version shown in the dashboard's system panel.
pub const DASHBOARD_VERSION: &str = "2.4.08";

/// How long a toast stays on screen unless told otherwise.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 4000;

/// Quiet period before a search box triggers filtering.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Subcategory lists are considered fresh for this long after a fetch.
pub const SUBCATEGORY_FRESHNESS_SECS: u64 = 30;

/// Maximum accepted upload size (10 MiB).
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Content types accepted for category and product images.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];
