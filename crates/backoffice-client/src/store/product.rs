//! Product store.

use std::sync::Arc;

use backoffice_core::filter::filter_products;
use backoffice_core::{CatalogFilter, CatalogId, Product, ProductStats};

use super::{FilteredView, SyncStore};
use crate::config::ClientConfig;
use crate::services::{ProductService, Resource};
use crate::toast::Notifier;

pub type ProductStore = SyncStore<ProductService>;

impl ProductStore {
    /// Product store with the configured freshness window (none by default).
    pub fn with_config(service: ProductService, notifier: Arc<dyn Notifier>, config: &ClientConfig) -> Self {
        SyncStore::new(Arc::new(service), notifier, config.product_freshness())
    }
}

impl<R: Resource<Entity = Product>> SyncStore<R> {
    pub fn product_stats(&self) -> ProductStats {
        ProductStats::from_products(&self.read().items)
    }

    /// Products matching `filter`, in server order.
    pub fn visible_products(&self, filter: &CatalogFilter) -> FilteredView<Product> {
        let s = self.read();
        let items = filter_products(&s.items, filter).into_iter().cloned().collect();
        FilteredView::new(s.items.len(), items)
    }

    /// Number of products filed under `category_id`.
    pub fn count_in_category(&self, category_id: CatalogId) -> usize {
        self.read()
            .items
            .iter()
            .filter(|p| p.category_id == Some(category_id))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{FakeService, RecordingNotifier};
    use backoffice_core::{EmptyState, Money, StatusFilter};

    fn product(id: i64, name: &str, cents: i64, discount: Option<i64>, category: i64) -> Product {
        Product {
            id,
            name: name.into(),
            description: String::new(),
            complete_description: String::new(),
            price: Money::from_cents(cents),
            discount_price: discount.map(Money::from_cents),
            active: true,
            category_id: Some(category),
            category_name: None,
            ingredients: Vec::new(),
            tags: Vec::new(),
            how_to_use: String::new(),
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_product_stats_and_category_filter() {
        let service = Arc::new(FakeService::new(vec![
            product(1, "Shampoo", 5000, Some(4000), 9),
            product(2, "Condicionador", 3000, None, 9),
            product(3, "Sabonete", 1000, None, 4),
        ]));
        let store = SyncStore::new(service, Arc::new(RecordingNotifier::default()), None);
        store.fetch(false).await;

        let stats = store.product_stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.discounted, 1);
        assert_eq!(stats.total_value, Money::from_cents(8000));
        assert_eq!(stats.average_price, Money::from_cents(2667));

        let filter = CatalogFilter::new("", StatusFilter::All).with_category(9);
        let view = store.visible_products(&filter);
        assert_eq!(view.items.len(), 2);
        assert_eq!(store.count_in_category(4), 1);

        let filter = CatalogFilter::new("", StatusFilter::Inactive);
        assert_eq!(
            store.visible_products(&filter).empty_state,
            Some(EmptyState::NoResults)
        );
    }
}
