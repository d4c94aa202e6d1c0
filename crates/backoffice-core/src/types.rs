//! # Domain Types
//!
//! Catalog types shared by every layer of the back-office client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │     Product     │   │   Subcategory   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  category_id    │   │  id             │       │
//! │  │  name           │   │  category_name  │   │  name           │       │
//! │  │  description    │   │  price (Money)  │   │  category_id ───┼──►    │
//! │  │  active         │   │  discount_price │   └─────────────────┘       │
//! │  │  image_url      │   │  ingredients[]  │                             │
//! │  └─────────────────┘   │  tags[]         │                             │
//! │                        └─────────────────┘                             │
//! │                                                                         │
//! │  Drafts (form state)        ImageFile (upload)     ToastSeverity        │
//! │  CategoryDraft              file_name              Success | Error      │
//! │  ProductDraft               content_type           Info | Warning       │
//! │  SubcategoryDraft           bytes                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical Records
//! These are the ONLY in-memory representation of each entity. The backend
//! mixes localized (`nome`, `preco`) and English (`name`, `price`) field
//! names; translating between those is the client crate's wire adapter job,
//! never a second set of fields here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

/// Identifier type used by the catalog API for every entity.
pub type CatalogId = i64;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CatalogId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Inactive categories stay listed but are hidden from the storefront.
    pub active: bool,

    /// Image reference as returned by the server (may lack a scheme).
    #[serde(default)]
    pub image_url: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: CatalogId,

    pub name: String,

    /// Short description shown in listings.
    #[serde(default)]
    pub description: String,

    /// Long description shown on the product page.
    #[serde(default)]
    pub complete_description: String,

    #[ts(type = "number")]
    pub price: Money,

    /// Promotional price. Only meaningful when strictly below `price`.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub discount_price: Option<Money>,

    pub active: bool,

    #[serde(default)]
    pub category_id: Option<CatalogId>,

    /// Denormalized category name, computed by the server.
    #[serde(default)]
    pub category_name: Option<String>,

    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub how_to_use: String,

    #[serde(default)]
    pub image_url: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns true when the discount price is set and strictly between zero
    /// and the regular price.
    ///
    /// ## Example
    /// ```text
    /// price 50, discount 40  → active (shown as R$ 40,00 with R$ 50,00 struck)
    /// price 50, discount 50  → inactive
    /// price 50, discount 0   → inactive
    /// price 50, no discount  → inactive
    /// ```
    pub fn has_active_discount(&self) -> bool {
        match self.discount_price {
            Some(discount) => discount.is_positive() && discount < self.price,
            None => false,
        }
    }

    /// The price a customer pays right now.
    pub fn effective_price(&self) -> Money {
        match self.discount_price {
            Some(discount) if self.has_active_discount() => discount,
            _ => self.price,
        }
    }

    /// Percentage saved by the active discount (0 when there is none).
    pub fn discount_percentage(&self) -> u32 {
        if self.has_active_discount() {
            self.effective_price().discount_percentage_of(self.price)
        } else {
            0
        }
    }

    /// Category name for listings, if the server provided one.
    pub fn category_label(&self) -> Option<&str> {
        self.category_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

// =============================================================================
// Subcategory
// =============================================================================

/// A subcategory scoped to one parent category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: CatalogId,
    pub name: String,
    pub category_id: CatalogId,
}

// =============================================================================
// Image Upload
// =============================================================================

/// An image file picked by the operator, ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        ImageFile {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Debug omits the payload; images can be megabytes.
impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

// =============================================================================
// Drafts (create / edit form state)
// =============================================================================

/// Form state for creating or editing a category.
///
/// `id` is `None` when creating. `image` is `None` when editing without
/// replacing the stored image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryDraft {
    pub id: Option<CatalogId>,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub image: Option<ImageFile>,
}

impl From<&Category> for CategoryDraft {
    fn from(category: &Category) -> Self {
        CategoryDraft {
            id: Some(category.id),
            name: category.name.clone(),
            description: category.description.clone(),
            active: category.active,
            image: None,
        }
    }
}

/// Form state for creating or editing a product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub id: Option<CatalogId>,
    pub name: String,
    pub description: String,
    pub complete_description: String,
    pub price: Money,
    pub discount_price: Option<Money>,
    pub category_id: Option<CatalogId>,
    pub ingredients: Vec<String>,
    pub tags: Vec<String>,
    pub how_to_use: String,
    pub active: bool,
    pub image: Option<ImageFile>,
}

impl ProductDraft {
    /// Appends an ingredient, ignoring blanks and duplicates.
    pub fn add_ingredient(&mut self, ingredient: &str) -> bool {
        push_unique(&mut self.ingredients, ingredient)
    }

    /// Appends a tag, ignoring blanks and duplicates.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        push_unique(&mut self.tags, tag)
    }

    /// Removes the ingredient at `index`; out-of-range is a no-op.
    pub fn remove_ingredient(&mut self, index: usize) {
        if index < self.ingredients.len() {
            self.ingredients.remove(index);
        }
    }

    /// Removes the tag at `index`; out-of-range is a no-op.
    pub fn remove_tag(&mut self, index: usize) {
        if index < self.tags.len() {
            self.tags.remove(index);
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|existing| existing == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        ProductDraft {
            id: Some(product.id),
            name: product.name.clone(),
            description: product.description.clone(),
            complete_description: product.complete_description.clone(),
            price: product.price,
            discount_price: product.discount_price,
            category_id: product.category_id,
            ingredients: product.ingredients.clone(),
            tags: product.tags.clone(),
            how_to_use: product.how_to_use.clone(),
            active: product.active,
            image: None,
        }
    }
}

/// Form state for creating or editing a subcategory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubcategoryDraft {
    pub id: Option<CatalogId>,
    pub name: String,
    pub category_id: Option<CatalogId>,
}

impl From<&Subcategory> for SubcategoryDraft {
    fn from(subcategory: &Subcategory) -> Self {
        SubcategoryDraft {
            id: Some(subcategory.id),
            name: subcategory.name.clone(),
            category_id: Some(subcategory.category_id),
        }
    }
}

/// Login form.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Debug never prints the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// =============================================================================
// Toast Severity
// =============================================================================

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ToastSeverity {
    Success,
    Error,
    #[default]
    Info,
    Warning,
}

impl fmt::Display for ToastSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastSeverity::Success => write!(f, "success"),
            ToastSeverity::Error => write!(f, "error"),
            ToastSeverity::Info => write!(f, "info"),
            ToastSeverity::Warning => write!(f, "warning"),
        }
    }
}

impl std::str::FromStr for ToastSeverity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(ToastSeverity::Success),
            "error" => Ok(ToastSeverity::Error),
            "info" => Ok(ToastSeverity::Info),
            "warning" => Ok(ToastSeverity::Warning),
            other => Err(CoreError::InvalidSeverity(other.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, discount: Option<i64>) -> Product {
        Product {
            id: 1,
            name: "Shampoo".to_string(),
            description: String::new(),
            complete_description: String::new(),
            price: Money::from_cents(price),
            discount_price: discount.map(Money::from_cents),
            active: true,
            category_id: Some(9),
            category_name: Some("Hair".to_string()),
            ingredients: vec![],
            tags: vec![],
            how_to_use: String::new(),
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_discount_is_active_only_below_price() {
        assert!(product(5000, Some(4000)).has_active_discount());
        assert!(!product(5000, Some(5000)).has_active_discount());
        assert!(!product(5000, Some(6000)).has_active_discount());
        assert!(!product(5000, Some(0)).has_active_discount());
        assert!(!product(5000, None).has_active_discount());
    }

    #[test]
    fn test_effective_price() {
        assert_eq!(product(5000, Some(4000)).effective_price().cents(), 4000);
        assert_eq!(product(5000, Some(7000)).effective_price().cents(), 5000);
        assert_eq!(product(5000, Some(4000)).discount_percentage(), 20);
    }

    #[test]
    fn test_category_label_skips_blank() {
        let mut p = product(100, None);
        assert_eq!(p.category_label(), Some("Hair"));
        p.category_name = Some("  ".to_string());
        assert_eq!(p.category_label(), None);
    }

    #[test]
    fn test_draft_list_editing() {
        let mut draft = ProductDraft::default();
        assert!(draft.add_tag("vegan"));
        assert!(!draft.add_tag(" vegan "));
        assert!(!draft.add_tag("   "));
        assert!(draft.add_ingredient("aloe"));
        assert!(draft.add_ingredient("argan"));
        draft.remove_ingredient(0);
        draft.remove_ingredient(10);
        assert_eq!(draft.ingredients, vec!["argan".to_string()]);
        assert_eq!(draft.tags, vec!["vegan".to_string()]);
    }

    #[test]
    fn test_draft_from_product_has_no_image() {
        let draft = ProductDraft::from(&product(5000, Some(4000)));
        assert_eq!(draft.id, Some(1));
        assert_eq!(draft.category_id, Some(9));
        assert!(draft.image.is_none());
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!("error".parse::<ToastSeverity>().unwrap(), ToastSeverity::Error);
        assert_eq!("WARNING".parse::<ToastSeverity>().unwrap(), ToastSeverity::Warning);
        assert!("fatal".parse::<ToastSeverity>().is_err());
        assert_eq!(ToastSeverity::default(), ToastSeverity::Info);
    }

    #[test]
    fn test_debug_hides_secrets_and_payloads() {
        let creds = Credentials {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));

        let image = ImageFile::new("a.png", "image/png", vec![0; 2048]);
        assert!(format!("{:?}", image).contains("2048"));
    }
}
