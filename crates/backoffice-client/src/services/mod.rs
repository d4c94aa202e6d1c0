//! # Resource Services
//!
//! Thin REST facades, one per catalog resource, behind the [`Resource`]
//! trait so sync stores can run against the real API or a test double.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Resource       fetch_all        create/update            delete        │
//! │  ─────────────  ───────────────  ───────────────────────  ───────────── │
//! │  categorias     GET /categorias  POST|PUT multipart       DELETE /{id}  │
//! │  produtos       GET /produtos    POST|PUT multipart       DELETE /{id}  │
//! │  subcategorias  GET /subcat...   POST|PUT JSON            DELETE /{id}  │
//! │                 GET /categorias/{id}/subcategorias                      │
//! │                                                                         │
//! │  multipart = "dados" (application/json) + optional "imagem" (file)     │
//! │  PUT targets the collection; the id travels inside "dados".            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod categories;
pub mod products;
pub mod subcategories;

pub use auth::{AuthService, LoginResponse};
pub use categories::CategoryService;
pub use products::ProductService;
pub use subcategories::SubcategoryService;

use async_trait::async_trait;
use backoffice_core::validation::{
    validate_category_draft, validate_product_draft, validate_subcategory_draft,
    ValidationResult,
};
use backoffice_core::{
    messages, CatalogId, Category, CategoryDraft, DraftMode, ImageFile, Product, ProductDraft,
    ResourceMessages, Subcategory, SubcategoryDraft,
};
use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::error::{ApiError, ApiResult, DomainErrorCode};

// =============================================================================
// Entity Trait
// =============================================================================

/// Static facts about one catalog entity that stores need.
pub trait CatalogEntity: Clone + Send + Sync + 'static {
    /// Form state used to create or edit the entity.
    type Draft: Send + Sync + 'static;

    /// Resource name for logs.
    const RESOURCE: &'static str;

    /// Operator messages for this resource.
    const MESSAGES: ResourceMessages;

    /// Server conflict codes that get a curated message for this resource.
    const CONFLICT_CODES: &'static [DomainErrorCode];

    fn id(&self) -> CatalogId;

    fn draft_id(draft: &Self::Draft) -> Option<CatalogId>;

    fn validate(draft: &Self::Draft, mode: DraftMode) -> ValidationResult<()>;
}

impl CatalogEntity for Category {
    type Draft = CategoryDraft;
    const RESOURCE: &'static str = "categorias";
    const MESSAGES: ResourceMessages = messages::CATEGORY;
    const CONFLICT_CODES: &'static [DomainErrorCode] = &[DomainErrorCode::CategoryHasProducts];

    fn id(&self) -> CatalogId {
        self.id
    }

    fn draft_id(draft: &CategoryDraft) -> Option<CatalogId> {
        draft.id
    }

    fn validate(draft: &CategoryDraft, mode: DraftMode) -> ValidationResult<()> {
        validate_category_draft(draft, mode)
    }
}

impl CatalogEntity for Product {
    type Draft = ProductDraft;
    const RESOURCE: &'static str = "produtos";
    const MESSAGES: ResourceMessages = messages::PRODUCT;
    const CONFLICT_CODES: &'static [DomainErrorCode] = &[
        DomainErrorCode::ProductInvalidCategory,
        DomainErrorCode::ProductDuplicateName,
    ];

    fn id(&self) -> CatalogId {
        self.id
    }

    fn draft_id(draft: &ProductDraft) -> Option<CatalogId> {
        draft.id
    }

    fn validate(draft: &ProductDraft, mode: DraftMode) -> ValidationResult<()> {
        validate_product_draft(draft, mode)
    }
}

impl CatalogEntity for Subcategory {
    type Draft = SubcategoryDraft;
    const RESOURCE: &'static str = "subcategorias";
    const MESSAGES: ResourceMessages = messages::SUBCATEGORY;
    const CONFLICT_CODES: &'static [DomainErrorCode] = &[DomainErrorCode::SubcategoryHasProducts];

    fn id(&self) -> CatalogId {
        self.id
    }

    fn draft_id(draft: &SubcategoryDraft) -> Option<CatalogId> {
        draft.id
    }

    fn validate(draft: &SubcategoryDraft, _mode: DraftMode) -> ValidationResult<()> {
        validate_subcategory_draft(draft)
    }
}

// =============================================================================
// Resource Trait
// =============================================================================

/// Draft type of a resource's entity.
pub type DraftOf<R> = <<R as Resource>::Entity as CatalogEntity>::Draft;

/// CRUD surface of one REST resource.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Entity: CatalogEntity;

    /// Every record, in server order.
    async fn fetch_all(&self) -> ApiResult<Vec<Self::Entity>>;

    async fn create(&self, draft: &DraftOf<Self>) -> ApiResult<()>;

    /// Updates the record named by the draft's id.
    async fn update(&self, draft: &DraftOf<Self>) -> ApiResult<()>;

    /// Returns true once the server confirmed the removal.
    async fn delete(&self, id: CatalogId) -> ApiResult<bool>;
}

/// Subcategory-only query: the children of one category.
#[async_trait]
pub trait SubcategoryLookup: Resource<Entity = Subcategory> {
    async fn fetch_by_category(&self, category_id: CatalogId) -> ApiResult<Vec<Subcategory>>;
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Builds the `dados` + `imagem` multipart body.
pub(crate) fn multipart_form<P: Serialize>(payload: &P, image: Option<&ImageFile>) -> ApiResult<Form> {
    let dados = serde_json::to_string(payload).map_err(ApiError::invalid_request)?;
    let dados = Part::text(dados)
        .mime_str("application/json")
        .map_err(ApiError::invalid_request)?;

    let mut form = Form::new().part("dados", dados);

    if let Some(image) = image {
        let imagem = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(ApiError::invalid_request)?;
        form = form.part("imagem", imagem);
    }

    Ok(form)
}

/// Updates need the id inside the payload.
pub(crate) fn require_id(id: Option<CatalogId>, resource: &str) -> ApiResult<CatalogId> {
    id.ok_or_else(|| ApiError::invalid_request(format!("{} sem id para atualização", resource)))
}

// =============================================================================
// Test Support
// =============================================================================

/// Captured requests from the in-process test API.
#[cfg(test)]
pub(crate) mod recorder {
    use axum::body::Bytes;
    use axum::http::{HeaderMap, Method, Uri};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub method: Method,
        pub path: String,
        pub content_type: String,
        pub body: String,
    }

    #[derive(Clone, Default)]
    pub struct Recorder(pub Arc<Mutex<Vec<Recorded>>>);

    impl Recorder {
        pub fn push(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) {
            self.0.lock().unwrap().push(Recorded {
                method,
                path: uri.path().to_string(),
                content_type: headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string(),
                body: String::from_utf8_lossy(body).into_owned(),
            });
        }

        pub fn take(&self) -> Vec<Recorded> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }
}
