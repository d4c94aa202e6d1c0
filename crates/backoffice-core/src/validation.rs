//! # Validation Module
//!
//! Draft validation run by the sync stores before any network call.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (client side, synchronous)                       │
//! │  ├── Required fields, price > 0, image rules                           │
//! │  └── Fails fast: the service is never called                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog API                                                  │
//! │  ├── Referential checks (category exists)       P.ITDx0001             │
//! │  ├── Uniqueness (product name)                  P.ITDx0002             │
//! │  └── Dependents (category still has products)   C.ITDx0001             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checks run in form order so the operator sees the first missing field.

use crate::error::{Field, ValidationError};
use crate::types::{CategoryDraft, Credentials, ImageFile, ProductDraft, SubcategoryDraft};
use crate::{ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Whether a draft is being created or edited.
///
/// Images are mandatory for new categories and products only; an edit without
/// a new file keeps the stored image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Update,
}

/// True when the string is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require(value: &str, field: Field) -> ValidationResult<()> {
    if is_blank(value) {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

// =============================================================================
// Draft Validators
// =============================================================================

/// Validates a category draft.
///
/// ## Rules
/// - Name and description must not be blank
/// - Image required on create; if present it must pass [`validate_image_file`]
pub fn validate_category_draft(draft: &CategoryDraft, mode: DraftMode) -> ValidationResult<()> {
    require(&draft.name, Field::CategoryName)?;
    require(&draft.description, Field::CategoryDescription)?;

    match (&draft.image, mode) {
        (None, DraftMode::Create) => Err(ValidationError::Required {
            field: Field::CategoryImage,
        }),
        (Some(image), _) => validate_image_file(Some(image)),
        (None, DraftMode::Update) => Ok(()),
    }
}

/// Validates a product draft.
///
/// ## Rules
/// - Name, description must not be blank
/// - A category must be selected
/// - Price must be greater than zero
/// - Image required on create; if present it must pass [`validate_image_file`]
///
/// ## Example
/// ```rust
/// use backoffice_core::money::Money;
/// use backoffice_core::types::ProductDraft;
/// use backoffice_core::validation::{validate_product_draft, DraftMode};
///
/// let draft = ProductDraft {
///     name: "Shampoo".into(),
///     description: "Daily use".into(),
///     category_id: Some(9),
///     price: Money::zero(),
///     ..Default::default()
/// };
/// let err = validate_product_draft(&draft, DraftMode::Update).unwrap_err();
/// assert_eq!(err.to_string(), "Preço é obrigatório e deve ser maior que zero");
/// ```
pub fn validate_product_draft(draft: &ProductDraft, mode: DraftMode) -> ValidationResult<()> {
    require(&draft.name, Field::ProductName)?;
    require(&draft.description, Field::ProductDescription)?;

    if draft.category_id.is_none() {
        return Err(ValidationError::Required {
            field: Field::ProductCategory,
        });
    }

    if !draft.price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: Field::ProductPrice,
        });
    }

    match (&draft.image, mode) {
        (None, DraftMode::Create) => Err(ValidationError::Required {
            field: Field::ProductImage,
        }),
        (Some(image), _) => validate_image_file(Some(image)),
        (None, DraftMode::Update) => Ok(()),
    }
}

/// Validates a subcategory draft: name and parent category are required.
pub fn validate_subcategory_draft(draft: &SubcategoryDraft) -> ValidationResult<()> {
    require(&draft.name, Field::SubcategoryName)?;

    if draft.category_id.is_none() {
        return Err(ValidationError::Required {
            field: Field::SubcategoryCategory,
        });
    }

    Ok(())
}

/// Validates the login form: both fields must be filled.
pub fn validate_credentials(credentials: &Credentials) -> ValidationResult<()> {
    if is_blank(&credentials.username) || credentials.password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

// =============================================================================
// Image Validator
// =============================================================================

/// Validates an image chosen for upload.
///
/// ## Rules
/// - A file must be present
/// - Content type must be one of [`ALLOWED_IMAGE_TYPES`]
/// - Size must not exceed [`MAX_IMAGE_SIZE`] (10 MiB)
pub fn validate_image_file(file: Option<&ImageFile>) -> ValidationResult<()> {
    let file = file.ok_or(ValidationError::ImageMissing)?;

    let content_type = file.content_type.trim().to_lowercase();
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(ValidationError::ImageInvalidType {
            content_type: file.content_type.clone(),
        });
    }

    if file.size() > MAX_IMAGE_SIZE {
        return Err(ValidationError::ImageTooLarge {
            size: file.size(),
            max: MAX_IMAGE_SIZE,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn png() -> ImageFile {
        ImageFile::new("photo.png", "image/png", vec![1, 2, 3])
    }

    fn valid_product() -> ProductDraft {
        ProductDraft {
            name: "Shampoo".into(),
            description: "Daily use".into(),
            category_id: Some(9),
            price: Money::from_cents(5000),
            image: Some(png()),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_product_passes_both_modes() {
        assert!(validate_product_draft(&valid_product(), DraftMode::Create).is_ok());
        assert!(validate_product_draft(&valid_product(), DraftMode::Update).is_ok());
    }

    #[test]
    fn test_product_fields_checked_in_form_order() {
        let mut draft = valid_product();
        draft.name = "  ".into();
        draft.price = Money::zero();
        let err = validate_product_draft(&draft, DraftMode::Create).unwrap_err();
        assert_eq!(err.field(), Some(Field::ProductName));

        let mut draft = valid_product();
        draft.description.clear();
        let err = validate_product_draft(&draft, DraftMode::Create).unwrap_err();
        assert_eq!(err.field(), Some(Field::ProductDescription));

        let mut draft = valid_product();
        draft.category_id = None;
        let err = validate_product_draft(&draft, DraftMode::Create).unwrap_err();
        assert_eq!(err.to_string(), "Categoria é obrigatória");
    }

    #[test]
    fn test_product_price_must_be_positive() {
        let mut draft = valid_product();
        draft.price = Money::zero();
        assert!(matches!(
            validate_product_draft(&draft, DraftMode::Update),
            Err(ValidationError::MustBePositive { field: Field::ProductPrice })
        ));

        draft.price = Money::from_cents(-100);
        assert!(validate_product_draft(&draft, DraftMode::Update).is_err());
    }

    #[test]
    fn test_product_image_required_only_on_create() {
        let mut draft = valid_product();
        draft.image = None;
        let err = validate_product_draft(&draft, DraftMode::Create).unwrap_err();
        assert_eq!(err.to_string(), "Imagem é obrigatória para novos produtos");
        assert!(validate_product_draft(&draft, DraftMode::Update).is_ok());
    }

    #[test]
    fn test_category_rules() {
        let mut draft = CategoryDraft {
            name: "Hair".into(),
            description: "Hair care".into(),
            active: true,
            image: Some(png()),
            ..Default::default()
        };
        assert!(validate_category_draft(&draft, DraftMode::Create).is_ok());

        draft.image = None;
        assert!(validate_category_draft(&draft, DraftMode::Create).is_err());
        assert!(validate_category_draft(&draft, DraftMode::Update).is_ok());

        draft.description = String::new();
        assert_eq!(
            validate_category_draft(&draft, DraftMode::Update)
                .unwrap_err()
                .to_string(),
            "Descrição da categoria é obrigatória"
        );
    }

    #[test]
    fn test_subcategory_rules() {
        let mut draft = SubcategoryDraft {
            id: None,
            name: "Shampoos".into(),
            category_id: Some(3),
        };
        assert!(validate_subcategory_draft(&draft).is_ok());

        draft.category_id = None;
        assert_eq!(
            validate_subcategory_draft(&draft).unwrap_err().field(),
            Some(Field::SubcategoryCategory)
        );

        draft.name = String::new();
        assert_eq!(
            validate_subcategory_draft(&draft).unwrap_err().field(),
            Some(Field::SubcategoryName)
        );
    }

    #[test]
    fn test_image_file_checks() {
        assert_eq!(validate_image_file(None), Err(ValidationError::ImageMissing));
        assert!(validate_image_file(Some(&png())).is_ok());

        let jpg = ImageFile::new("a.jpg", "image/JPEG", vec![0]);
        assert!(validate_image_file(Some(&jpg)).is_ok());

        let pdf = ImageFile::new("a.pdf", "application/pdf", vec![0]);
        assert!(matches!(
            validate_image_file(Some(&pdf)),
            Err(ValidationError::ImageInvalidType { .. })
        ));

        let huge = ImageFile::new("big.png", "image/png", vec![0; MAX_IMAGE_SIZE + 1]);
        assert!(matches!(
            validate_image_file(Some(&huge)),
            Err(ValidationError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_credentials() {
        let mut creds = Credentials {
            username: "admin".into(),
            password: "secret".into(),
        };
        assert!(validate_credentials(&creds).is_ok());
        creds.password.clear();
        assert_eq!(
            validate_credentials(&creds),
            Err(ValidationError::MissingCredentials)
        );
    }
}
