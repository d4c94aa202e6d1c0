//! # Error Types
//!
//! Domain-specific error types for backoffice-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  backoffice-core errors (this file)                                    │
//! │  ├── CoreError        - Parsing / general domain errors                │
//! │  └── ValidationError  - Draft validation failures (user-facing text)   │
//! │                                                                         │
//! │  backoffice-client errors (separate crate)                             │
//! │  ├── ApiError         - What the REST backend answered                 │
//! │  └── ClientError      - Config, session, serialization                 │
//! │                                                                         │
//! │  Flow: ValidationError ──► MutationOutcome { error } ──► operator      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. `ValidationError` renders the exact message the operator sees
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::messages;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors that are not tied to a specific draft.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Status filter string is not one of `all`, `active`, `inactive`.
    #[error("Unknown status filter: '{0}'. Valid options: all, active, inactive")]
    InvalidStatusFilter(String),

    /// Monetary amount could not be parsed.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Severity string is not one of the four toast severities.
    #[error("Unknown toast severity: '{0}'")]
    InvalidSeverity(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validated Fields
// =============================================================================

/// A form field that can fail validation.
///
/// Each field knows the exact message shown when it is missing, so stores can
/// return a [`ValidationError`] straight to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CategoryName,
    CategoryDescription,
    CategoryImage,
    ProductName,
    ProductDescription,
    ProductCategory,
    ProductPrice,
    ProductImage,
    SubcategoryName,
    SubcategoryCategory,
}

impl Field {
    /// Message shown when this field is missing or invalid.
    pub fn required_message(&self) -> &'static str {
        match self {
            Field::CategoryName => messages::CATEGORY_NAME_REQUIRED,
            Field::CategoryDescription => messages::CATEGORY_DESCRIPTION_REQUIRED,
            Field::CategoryImage => messages::CATEGORY_IMAGE_REQUIRED,
            Field::ProductName => messages::PRODUCT_NAME_REQUIRED,
            Field::ProductDescription => messages::PRODUCT_DESCRIPTION_REQUIRED,
            Field::ProductCategory => messages::PRODUCT_CATEGORY_REQUIRED,
            Field::ProductPrice => messages::PRODUCT_PRICE_REQUIRED,
            Field::ProductImage => messages::PRODUCT_IMAGE_REQUIRED,
            Field::SubcategoryName => messages::SUBCATEGORY_NAME_REQUIRED,
            Field::SubcategoryCategory => messages::SUBCATEGORY_CATEGORY_REQUIRED,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any network call. The `Display` output is the operator
/// message, so `err.to_string()` can go straight into a toast or banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{}", .field.required_message())]
    Required { field: Field },

    /// A numeric field must be greater than zero.
    #[error("{}", .field.required_message())]
    MustBePositive { field: Field },

    /// No image file was supplied where one was expected.
    #[error("{}", messages::IMAGE_MISSING)]
    ImageMissing,

    /// Image content type is not in the allowed list.
    #[error("{}", messages::IMAGE_INVALID_TYPE)]
    ImageInvalidType { content_type: String },

    /// Image exceeds the maximum upload size.
    #[error("{}", messages::IMAGE_TOO_LARGE)]
    ImageTooLarge { size: usize, max: usize },

    /// Login form submitted with an empty username or password.
    #[error("{}", messages::LOGIN_MISSING_FIELDS)]
    MissingCredentials,
}

impl ValidationError {
    /// The field this error refers to, if it is a field error.
    pub fn field(&self) -> Option<Field> {
        match self {
            ValidationError::Required { field } | ValidationError::MustBePositive { field } => {
                Some(*field)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
