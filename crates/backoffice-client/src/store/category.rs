//! Category store.

use std::sync::Arc;

use backoffice_core::filter::filter_categories;
use backoffice_core::{CatalogFilter, Category, CategoryStats};

use super::{FilteredView, SyncStore};
use crate::config::ClientConfig;
use crate::services::{CategoryService, Resource};
use crate::toast::Notifier;

pub type CategoryStore = SyncStore<CategoryService>;

impl CategoryStore {
    /// Category store with the configured freshness window (none by default).
    pub fn with_config(service: CategoryService, notifier: Arc<dyn Notifier>, config: &ClientConfig) -> Self {
        SyncStore::new(Arc::new(service), notifier, config.category_freshness())
    }
}

impl<R: Resource<Entity = Category>> SyncStore<R> {
    pub fn category_stats(&self) -> CategoryStats {
        CategoryStats::from_categories(&self.read().items)
    }

    /// Categories matching `filter`, in server order.
    pub fn visible_categories(&self, filter: &CatalogFilter) -> FilteredView<Category> {
        let s = self.read();
        let items = filter_categories(&s.items, filter).into_iter().cloned().collect();
        FilteredView::new(s.items.len(), items)
    }
}
