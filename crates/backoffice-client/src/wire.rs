//! # Wire Adapters
//!
//! Translation between the backend's JSON and the canonical catalog records.
//!
//! ## Naming Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   Backend JSON (mixed)          Canonical record        Outbound JSON   │
//! │   ───────────────────           ────────────────        ─────────────   │
//! │   nome | name            ──►    name             ──►    nome            │
//! │   preco | price          ──►    price (Money)    ──►    preco           │
//! │   categoria: {id, nome}  ──►    category_id +    ──►    categoriaId     │
//! │   categoria: "Cabelos"          category_name                           │
//! │   categoriaId | categoryId                                              │
//! │   | categoria_id                                                        │
//! │                                                                         │
//! │   DualNamed view: canonical record ──► JSON carrying BOTH conventions   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inbound parsing reads a JSON object field by field, taking the first
//! present alias. Objects that carry both spellings of a field are accepted.

use backoffice_core::format::{normalize_image_url, parse_timestamp};
use backoffice_core::{
    CatalogId, Category, CategoryDraft, Money, Product, ProductDraft, Subcategory,
    SubcategoryDraft,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Placeholder the backend uses instead of a missing category name.
const NO_CATEGORY_LABEL: &str = "Sem categoria";

// =============================================================================
// Field Access
// =============================================================================

/// Alias-aware reader over one JSON object.
struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    /// First alias present with a non-null value.
    fn first(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    fn string(&self, aliases: &[&str]) -> Option<String> {
        self.first(aliases).and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    fn id(&self, aliases: &[&str]) -> Option<CatalogId> {
        self.first(aliases).and_then(as_id)
    }

    fn flag(&self, aliases: &[&str]) -> Option<bool> {
        self.first(aliases).and_then(|v| match v {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
    }

    fn money(&self, aliases: &[&str]) -> Result<Option<Money>, String> {
        match self.first(aliases) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| format!("invalid amount in {}: {}", aliases[0], e)),
        }
    }

    fn list(&self, aliases: &[&str]) -> Vec<String> {
        match self.first(aliases) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn timestamp(&self, aliases: &[&str]) -> Option<DateTime<Utc>> {
        self.first(aliases)
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
    }
}

fn as_id(value: &Value) -> Option<CatalogId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// =============================================================================
// Inbound Adapters
// =============================================================================

/// A category as read from the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct InboundCategory(pub Category);

impl TryFrom<Map<String, Value>> for InboundCategory {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = Fields(&map);
        let id = f.id(&["id"]).ok_or("category without id")?;

        Ok(InboundCategory(Category {
            id,
            name: f.string(&["nome", "name"]).unwrap_or_default(),
            description: f.string(&["descricao", "description"]).unwrap_or_default(),
            active: f.flag(&["ativo", "active"]).unwrap_or(true),
            image_url: non_blank(f.string(&["imageUrl", "imageURL", "imagemUrl", "image_url"])),
        }))
    }
}

/// A product as read from the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct InboundProduct(pub Product);

impl TryFrom<Map<String, Value>> for InboundProduct {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = Fields(&map);
        let id = f.id(&["id"]).ok_or("product without id")?;

        // `categoria` is either the category name or a nested {id, nome} object
        let (nested_id, nested_name) = match f.first(&["categoria", "category"]) {
            Some(Value::Object(category)) => {
                let c = Fields(category);
                (c.id(&["id"]), c.string(&["nome", "name"]))
            }
            Some(Value::String(name)) => (None, Some(name.clone())),
            _ => (None, None),
        };

        let category_id = f
            .id(&["categoriaId", "categoryId", "categoria_id"])
            .or(nested_id);
        let category_name = non_blank(
            nested_name.or_else(|| f.string(&["categoriaNome", "categoryName"])),
        )
        .filter(|name| name != NO_CATEGORY_LABEL);

        Ok(InboundProduct(Product {
            id,
            name: f.string(&["nome", "name"]).unwrap_or_default(),
            description: f.string(&["descricao", "description"]).unwrap_or_default(),
            complete_description: f
                .string(&["descricaoCompleta", "completeDescription"])
                .unwrap_or_default(),
            price: f.money(&["preco", "price"])?.unwrap_or_default(),
            discount_price: f.money(&["precoDesconto", "discountPrice"])?,
            active: f.flag(&["ativo", "active"]).unwrap_or(true),
            category_id,
            category_name,
            ingredients: f.list(&["ingredientes", "ingredients"]),
            tags: f.list(&["tags"]),
            how_to_use: f.string(&["modoUso", "howToUse"]).unwrap_or_default(),
            image_url: non_blank(f.string(&["imageUrl", "imageURL", "imagemUrl", "image_url"])),
            created_at: f.timestamp(&["dataCriacao", "createdAt", "created_at"]),
            updated_at: f.timestamp(&["dataAtualizacao", "updatedAt", "updated_at"]),
        }))
    }
}

/// A subcategory as read from the backend. The parent category may be absent
/// when the list was requested under a category path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct InboundSubcategory {
    pub id: CatalogId,
    pub name: String,
    pub category_id: Option<CatalogId>,
}

impl TryFrom<Map<String, Value>> for InboundSubcategory {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = Fields(&map);
        let id = f.id(&["id"]).ok_or("subcategory without id")?;

        let nested_id = match f.first(&["categoria", "category"]) {
            Some(Value::Object(category)) => Fields(category).id(&["id"]),
            _ => None,
        };

        Ok(InboundSubcategory {
            id,
            name: f.string(&["nome", "name"]).unwrap_or_default(),
            category_id: f
                .id(&["categoriaId", "categoryId", "categoria_id"])
                .or(nested_id),
        })
    }
}

impl InboundSubcategory {
    /// Completes the record, using `scope` when the body named no parent.
    pub fn resolve(self, scope: Option<CatalogId>) -> Option<Subcategory> {
        let category_id = self.category_id.or(scope)?;
        Some(Subcategory {
            id: self.id,
            name: self.name,
            category_id,
        })
    }
}

// =============================================================================
// Outbound Payloads
// =============================================================================

/// `dados` part of a category create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub nome: &'a str,
    pub descricao: &'a str,
    pub ativo: bool,
}

impl<'a> From<&'a CategoryDraft> for CategoryPayload<'a> {
    fn from(draft: &'a CategoryDraft) -> Self {
        CategoryPayload {
            id: draft.id,
            nome: draft.name.trim(),
            descricao: draft.description.trim(),
            ativo: draft.active,
        }
    }
}

/// `dados` part of a product create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub nome: &'a str,
    pub descricao: &'a str,
    pub descricao_completa: &'a str,
    pub preco: Money,
    pub preco_desconto: Option<Money>,
    pub categoria_id: Option<CatalogId>,
    pub ingredientes: &'a [String],
    pub tags: &'a [String],
    pub modo_uso: &'a str,
    pub ativo: bool,
}

impl<'a> From<&'a ProductDraft> for ProductPayload<'a> {
    fn from(draft: &'a ProductDraft) -> Self {
        ProductPayload {
            id: draft.id,
            nome: draft.name.trim(),
            descricao: draft.description.trim(),
            descricao_completa: draft.complete_description.trim(),
            preco: draft.price,
            // a zero discount means "no discount" on the form
            preco_desconto: draft.discount_price.filter(|d| !d.is_zero()),
            categoria_id: draft.category_id,
            ingredientes: &draft.ingredients,
            tags: &draft.tags,
            modo_uso: draft.how_to_use.trim(),
            ativo: draft.active,
        }
    }
}

/// JSON body of a subcategory create/update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CatalogId>,
    pub nome: &'a str,
    pub categoria_id: Option<CatalogId>,
}

impl<'a> From<&'a SubcategoryDraft> for SubcategoryPayload<'a> {
    fn from(draft: &'a SubcategoryDraft) -> Self {
        SubcategoryPayload {
            id: draft.id,
            nome: draft.name.trim(),
            categoria_id: draft.category_id,
        }
    }
}

// =============================================================================
// Dual-Named Display View
// =============================================================================

/// Presentation projection carrying both the localized and the English name
/// of every field, for consumers written against either convention.
pub trait DualNamed {
    fn dual_named(&self) -> Value;
}

fn timestamp_value(at: Option<DateTime<Utc>>) -> Value {
    at.map_or(Value::Null, |t| Value::String(t.to_rfc3339()))
}

impl DualNamed for Category {
    fn dual_named(&self) -> Value {
        json!({
            "id": self.id,
            "nome": self.name,
            "name": self.name,
            "descricao": self.description,
            "description": self.description,
            "ativo": self.active,
            "active": self.active,
            "imageUrl": normalize_image_url(self.image_url.as_deref()),
        })
    }
}

impl DualNamed for Product {
    fn dual_named(&self) -> Value {
        json!({
            "id": self.id,
            "nome": self.name,
            "name": self.name,
            "descricao": self.description,
            "description": self.description,
            "descricaoCompleta": self.complete_description,
            "completeDescription": self.complete_description,
            "preco": self.price,
            "price": self.price,
            "precoDesconto": self.discount_price,
            "discountPrice": self.discount_price,
            "categoriaId": self.category_id,
            "categoryId": self.category_id,
            "categoria": self.category_name,
            "category": self.category_name,
            "categoriaNome": self.category_name,
            "categoryName": self.category_name,
            "ingredientes": self.ingredients,
            "ingredients": self.ingredients,
            "tags": self.tags,
            "modoUso": self.how_to_use,
            "howToUse": self.how_to_use,
            "ativo": self.active,
            "active": self.active,
            "imageUrl": normalize_image_url(self.image_url.as_deref()),
            "dataCriacao": timestamp_value(self.created_at),
            "createdAt": timestamp_value(self.created_at),
            "dataAtualizacao": timestamp_value(self.updated_at),
            "updatedAt": timestamp_value(self.updated_at),
        })
    }
}

impl DualNamed for Subcategory {
    fn dual_named(&self) -> Value {
        json!({
            "id": self.id,
            "nome": self.name,
            "name": self.name,
            "categoriaId": self.category_id,
            "categoryId": self.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(body: Value) -> Product {
        serde_json::from_value::<InboundProduct>(body).unwrap().0
    }

    #[test]
    fn test_localized_product_is_normalized() {
        let p = product(json!({
            "id": 12,
            "nome": "Shampoo",
            "preco": 50,
            "precoDesconto": 40,
            "categoria": { "id": 3, "nome": "Cabelos" },
            "ingredientes": ["aloe", "argan"],
            "ativo": false,
            "dataCriacao": "2024-03-07T09:05:00"
        }));

        assert_eq!(p.name, "Shampoo");
        assert_eq!(p.price.cents(), 5000);
        assert_eq!(p.discount_price.map(|d| d.cents()), Some(4000));
        assert!(p.has_active_discount());
        assert_eq!(p.category_id, Some(3));
        assert_eq!(p.category_label(), Some("Cabelos"));
        assert_eq!(p.ingredients, vec!["aloe", "argan"]);
        assert!(!p.active);
        assert!(p.created_at.is_some());
    }

    #[test]
    fn test_english_product_is_normalized() {
        let p = product(json!({
            "id": "12",
            "name": "Shampoo",
            "price": "12,90",
            "categoryId": 3,
            "categoryName": "Cabelos",
            "howToUse": "Aplicar",
        }));

        assert_eq!(p.id, 12);
        assert_eq!(p.price.cents(), 1290);
        assert_eq!(p.category_id, Some(3));
        assert_eq!(p.category_name.as_deref(), Some("Cabelos"));
        assert_eq!(p.how_to_use, "Aplicar");
        assert!(p.active);
        assert_eq!(p.discount_price, None);
    }

    #[test]
    fn test_both_spellings_and_placeholder_category() {
        let p = product(json!({
            "id": 1,
            "nome": "Sabonete",
            "name": "Soap",
            "preco": 10,
            "categoria": "Sem categoria",
            "categoria_id": 9
        }));
        assert_eq!(p.name, "Sabonete");
        assert_eq!(p.category_name, None);
        assert_eq!(p.category_id, Some(9));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(serde_json::from_value::<InboundCategory>(json!({ "nome": "x" })).is_err());
        assert!(serde_json::from_value::<InboundProduct>(json!({ "id": 1, "preco": "abc" })).is_err());
    }

    #[test]
    fn test_subcategory_scope_fallback() {
        let sub: InboundSubcategory =
            serde_json::from_value(json!({ "id": 5, "nome": "Shampoos" })).unwrap();
        assert_eq!(sub.clone().resolve(None), None);
        assert_eq!(sub.resolve(Some(3)).map(|s| s.category_id), Some(3));

        let sub: InboundSubcategory =
            serde_json::from_value(json!({ "id": 5, "name": "x", "categoria_id": 8 })).unwrap();
        assert_eq!(sub.resolve(Some(3)).map(|s| s.category_id), Some(8));
    }

    #[test]
    fn test_outbound_product_payload_is_localized() {
        let draft = ProductDraft {
            id: Some(7),
            name: "  Shampoo ".into(),
            description: "Uso diário".into(),
            price: Money::from_cents(1290),
            discount_price: Some(Money::zero()),
            category_id: Some(3),
            tags: vec!["vegano".into()],
            active: true,
            ..Default::default()
        };

        let body = serde_json::to_value(ProductPayload::from(&draft)).unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["nome"], "Shampoo");
        assert_eq!(body["preco"], 12.9);
        assert_eq!(body["precoDesconto"], Value::Null);
        assert_eq!(body["categoriaId"], 3);
        assert_eq!(body["tags"], json!(["vegano"]));
        assert!(body.get("name").is_none());
    }

    #[test]
    fn test_create_payload_omits_id() {
        let draft = CategoryDraft {
            name: "Pele".into(),
            description: "Cuidados".into(),
            active: true,
            ..Default::default()
        };
        let body = serde_json::to_value(CategoryPayload::from(&draft)).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["ativo"], true);
    }

    #[test]
    fn test_dual_named_view() {
        let p = product(json!({
            "id": 1, "nome": "Shampoo", "preco": 50, "precoDesconto": 40,
            "categoriaNome": "Cabelos", "imageUrl": "localhost:8080/img/1.png"
        }));
        let view = p.dual_named();
        assert_eq!(view["nome"], view["name"]);
        assert_eq!(view["preco"], 50.0);
        assert_eq!(view["discountPrice"], 40.0);
        assert_eq!(view["categoria"], "Cabelos");
        assert_eq!(view["categoryName"], "Cabelos");
        assert_eq!(view["imageUrl"], "http://localhost:8080/img/1.png");
        assert_eq!(view["createdAt"], Value::Null);
    }

    #[test]
    fn test_english_product_with_nested_category_shows_both_conventions() {
        let p = product(json!({
            "id": 1,
            "name": "Shampoo",
            "price": 50,
            "discountPrice": 40,
            "category": { "id": 9, "name": "Hair" },
            "active": true
        }));
        assert_eq!(p.category_id, Some(9));

        let view = p.dual_named();
        assert_eq!(view["nome"], "Shampoo");
        assert_eq!(view["name"], "Shampoo");
        assert_eq!(view["preco"].as_f64(), Some(50.0));
        assert_eq!(view["price"].as_f64(), Some(50.0));
        assert_eq!(view["precoDesconto"].as_f64(), Some(40.0));
        assert_eq!(view["discountPrice"].as_f64(), Some(40.0));
        assert_eq!(view["categoria"], "Hair");
        assert_eq!(view["category"], "Hair");
        assert_eq!(view["categoriaId"], 9);
        assert_eq!(view["ativo"], true);
        assert_eq!(view["active"], true);
    }
}
