//! # Catalog Statistics
//!
//! Dashboard counters derived from a store snapshot. Pure functions over
//! slices; recomputed on every render, never cached.

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Category, Product};

/// Rounded share of `part` in `total`, 0 for an empty total.
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

// =============================================================================
// Category Statistics
// =============================================================================

/// Counters shown on the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Active share, rounded to a whole percent.
    pub active_percentage: u32,
}

impl CategoryStats {
    pub fn from_categories(categories: &[Category]) -> Self {
        let total = categories.len();
        let active = categories.iter().filter(|c| c.active).count();

        CategoryStats {
            total,
            active,
            inactive: total - active,
            active_percentage: percentage(active, total),
        }
    }
}

// =============================================================================
// Product Statistics
// =============================================================================

/// Product counters plus catalog value.
///
/// ```text
/// total_value   = Σ effective_price   (discounts applied)
/// average_price = total_value / total (rounded half-up, zero when empty)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    /// Products with an active discount.
    pub discounted: usize,
    pub active_percentage: u32,
    #[ts(type = "number")]
    pub total_value: Money,
    #[ts(type = "number")]
    pub average_price: Money,
}

impl ProductStats {
    pub fn from_products(products: &[Product]) -> Self {
        let total = products.len();
        let active = products.iter().filter(|p| p.active).count();
        let discounted = products.iter().filter(|p| p.has_active_discount()).count();
        let total_value: Money = products.iter().map(Product::effective_price).sum();

        let average_price = if total == 0 {
            Money::zero()
        } else {
            let count = total as i128;
            let average = (i128::from(total_value.cents()) + count / 2) / count;
            Money::from_cents(i64::try_from(average).unwrap_or(i64::MAX))
        };

        ProductStats {
            total,
            active,
            inactive: total - active,
            discounted,
            active_percentage: percentage(active, total),
            total_value,
            average_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(active: bool) -> Category {
        Category {
            id: 1,
            name: "c".into(),
            description: String::new(),
            active,
            image_url: None,
        }
    }

    fn product(price: i64, discount: Option<i64>, active: bool) -> Product {
        Product {
            id: 1,
            name: "p".into(),
            description: String::new(),
            complete_description: String::new(),
            price: Money::from_cents(price),
            discount_price: discount.map(Money::from_cents),
            active,
            category_id: None,
            category_name: None,
            ingredients: vec![],
            tags: vec![],
            how_to_use: String::new(),
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_category_stats_round_percentage() {
        let stats =
            CategoryStats::from_categories(&[category(true), category(true), category(false)]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.active_percentage, 67);
    }

    #[test]
    fn test_empty_stats_are_zero() {
        assert_eq!(CategoryStats::from_categories(&[]), CategoryStats::default());
        assert_eq!(ProductStats::from_products(&[]), ProductStats::default());
    }

    #[test]
    fn test_product_stats_use_effective_price() {
        let stats = ProductStats::from_products(&[
            product(5000, Some(4000), true),
            product(3000, None, false),
            product(2000, Some(2500), true),
        ]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.discounted, 1);
        assert_eq!(stats.total_value.cents(), 9000);
        assert_eq!(stats.average_price.cents(), 3000);
        assert_eq!(stats.active_percentage, 67);
    }

    #[test]
    fn test_product_stats_saturate_on_huge_prices() {
        let huge = Money::from_decimal(1e17).cents();
        let stats = ProductStats::from_products(&[
            product(huge, None, true),
            product(huge, None, true),
        ]);
        assert_eq!(stats.total_value.cents(), i64::MAX);
        assert!(stats.average_price.cents() > 0);
    }
}
