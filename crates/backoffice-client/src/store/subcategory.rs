//! # Subcategory Stores
//!
//! The master subcategory store caches its list for 30 seconds by default.
//! [`ScopedSubcategories`] follows one parent category at a time.
//!
//! ## Scope Changes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_category(Some(3))  ──► selection cleared, GET /categorias/3/...   │
//! │  set_category(Some(3))  ──► no-op                                      │
//! │  set_category(Some(4))  ──► selection cleared, results for 3 dropped   │
//! │  set_category(None)     ──► selection cleared, list emptied            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use backoffice_core::{messages, CatalogId, Subcategory, SubcategoryDraft};
use tracing::{debug, warn};

use super::{MutationOutcome, SyncStore};
use crate::config::ClientConfig;
use crate::services::{SubcategoryLookup, SubcategoryService};
use crate::toast::Notifier;

pub type SubcategoryStore = SyncStore<SubcategoryService>;

impl SubcategoryStore {
    /// Subcategory store with the configured freshness window (30 s by default).
    pub fn with_config(service: SubcategoryService, notifier: Arc<dyn Notifier>, config: &ClientConfig) -> Self {
        SyncStore::new(Arc::new(service), notifier, config.subcategory_freshness())
    }
}

impl<R: SubcategoryLookup> SyncStore<R> {
    /// One-shot query for the children of `category_id`.
    ///
    /// Leaves the store's own list alone. On failure an error toast is
    /// emitted and the result is empty.
    pub async fn fetch_by_category(&self, category_id: CatalogId) -> Vec<Subcategory> {
        self.lookup(category_id).await.unwrap_or_default()
    }

    /// Like [`fetch_by_category`](Self::fetch_by_category) but hands the
    /// failure message back instead of an empty list.
    async fn lookup(&self, category_id: CatalogId) -> Result<Vec<Subcategory>, String> {
        self.service()
            .fetch_by_category(category_id)
            .await
            .map_err(|err| {
                let message = err.message_or(messages::SUBCATEGORY_LOAD_BY_CATEGORY_ERROR);
                warn!(category_id, status = err.status, error = %message, "Subcategory lookup failed");
                self.notifier().error(&message);
                message
            })
    }

    /// Cached subcategories whose parent is `category_id`.
    pub fn by_category(&self, category_id: CatalogId) -> Vec<Subcategory> {
        self.read()
            .items
            .iter()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect()
    }
}

// =============================================================================
// Category-Scoped View
// =============================================================================

#[derive(Debug, Default)]
struct ScopeState {
    category_id: Option<CatalogId>,
    /// Bumped on every scope change so late results can be recognized.
    generation: u64,
    items: Vec<Subcategory>,
    error: Option<String>,
    in_flight: usize,
    selected: Option<CatalogId>,
}

/// Subcategories of one category, kept in step with the master store.
pub struct ScopedSubcategories<R: SubcategoryLookup = SubcategoryService> {
    store: Arc<SyncStore<R>>,
    state: RwLock<ScopeState>,
}

impl<R: SubcategoryLookup> ScopedSubcategories<R> {
    pub fn new(store: Arc<SyncStore<R>>) -> Self {
        ScopedSubcategories {
            store,
            state: RwLock::new(ScopeState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ScopeState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ScopeState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &Arc<SyncStore<R>> {
        &self.store
    }

    pub fn category_id(&self) -> Option<CatalogId> {
        self.read().category_id
    }

    /// Switches the scope. Re-fetches when the id changes and empties the
    /// list when it becomes `None`.
    pub async fn set_category(&self, category_id: Option<CatalogId>) {
        {
            let mut s = self.write();
            if s.category_id == category_id {
                return;
            }
            s.category_id = category_id;
            s.generation += 1;
            s.selected = None;
            s.error = None;
            if category_id.is_none() {
                s.items.clear();
            }
        }

        if category_id.is_some() {
            self.refresh().await;
        }
    }

    /// Reloads the current scope. Results for a scope that has since changed
    /// are dropped. A failed reload keeps the previous list and records the
    /// error.
    pub async fn refresh(&self) {
        let (category_id, generation) = {
            let mut s = self.write();
            let Some(id) = s.category_id else {
                return;
            };
            s.in_flight += 1;
            (id, s.generation)
        };

        let result = self.store.lookup(category_id).await;

        let mut s = self.write();
        s.in_flight = s.in_flight.saturating_sub(1);
        if s.generation != generation {
            debug!(category_id, "Dropping subcategories for a stale scope");
            return;
        }
        match result {
            Ok(items) => {
                s.items = items;
                s.error = None;
            }
            Err(message) => s.error = Some(message),
        }
    }

    /// Creates a subcategory, defaulting its parent to the current scope.
    pub async fn create(&self, draft: &SubcategoryDraft) -> MutationOutcome {
        let mut draft = draft.clone();
        if draft.category_id.is_none() {
            draft.category_id = self.category_id();
        }

        let outcome = self.store.create(&draft).await;
        if outcome.success {
            self.refresh().await;
        }
        outcome
    }

    pub async fn update(&self, draft: &SubcategoryDraft) -> MutationOutcome {
        let outcome = self.store.update(draft).await;
        if outcome.success {
            self.refresh().await;
        }
        outcome
    }

    /// Deletes a subcategory; clears the selection when it pointed at `id`.
    pub async fn delete(&self, id: CatalogId) -> MutationOutcome {
        let outcome = self.store.delete(id).await;
        if outcome.success {
            {
                let mut s = self.write();
                if s.selected == Some(id) {
                    s.selected = None;
                }
            }
            self.refresh().await;
        }
        outcome
    }

    pub fn toggle_selection(&self, id: CatalogId) {
        let mut s = self.write();
        s.selected = if s.selected == Some(id) { None } else { Some(id) };
    }

    pub fn clear_selection(&self) {
        self.write().selected = None;
    }

    pub fn selected(&self) -> Option<CatalogId> {
        self.read().selected
    }

    pub fn items(&self) -> Vec<Subcategory> {
        self.read().items.clone()
    }

    pub fn loading(&self) -> bool {
        self.read().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn has_error(&self) -> bool {
        self.read().error.is_some()
    }
}

impl<R: SubcategoryLookup> std::fmt::Debug for ScopedSubcategories<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.read();
        f.debug_struct("ScopedSubcategories")
            .field("category_id", &s.category_id)
            .field("items", &s.items.len())
            .field("error", &s.error)
            .field("selected", &s.selected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::store::testing::{FakeService, RecordingNotifier};
    use backoffice_core::ToastSeverity;
    use std::time::Duration;

    fn sub(id: CatalogId, name: &str, category_id: CatalogId) -> Subcategory {
        Subcategory {
            id,
            name: name.into(),
            category_id,
        }
    }

    fn fixtures() -> (
        Arc<SyncStore<FakeService<Subcategory>>>,
        Arc<FakeService<Subcategory>>,
        Arc<RecordingNotifier>,
    ) {
        let service = Arc::new(FakeService::new(vec![
            sub(1, "Shampoos", 3),
            sub(2, "Condicionadores", 3),
            sub(3, "Sabonetes", 4),
        ]));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = Arc::new(SyncStore::new(
            service.clone(),
            notifier.clone(),
            Some(Duration::from_secs(30)),
        ));
        (store, service, notifier)
    }

    #[tokio::test]
    async fn test_by_category_and_lookup_failure() {
        let (store, service, notifier) = fixtures();
        store.fetch(false).await;
        assert_eq!(store.by_category(3).len(), 2);
        assert_eq!(store.fetch_by_category(4).await[0].name, "Sabonetes");

        service.fail_fetch(ApiError::network());
        assert!(store.fetch_by_category(3).await.is_empty());
        assert_eq!(
            notifier.take(),
            vec![(ToastSeverity::Error, messages::CONNECTION_ERROR.to_string())]
        );
        assert_eq!(store.items().len(), 3, "lookup never touches the master list");
    }

    #[tokio::test]
    async fn test_scope_change_refetches_and_resets() {
        let (store, service, _) = fixtures();
        let scoped = ScopedSubcategories::new(store);

        scoped.set_category(Some(3)).await;
        assert_eq!(scoped.items().len(), 2);
        assert_eq!(service.fetch_count(), 1);

        scoped.set_category(Some(3)).await;
        assert_eq!(service.fetch_count(), 1);

        scoped.toggle_selection(1);
        scoped.set_category(Some(4)).await;
        assert_eq!(scoped.selected(), None);
        assert_eq!(scoped.items()[0].id, 3);

        scoped.set_category(None).await;
        assert!(scoped.items().is_empty());
        assert_eq!(service.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_list_and_records_error() {
        let (store, service, notifier) = fixtures();
        let scoped = ScopedSubcategories::new(store);
        scoped.set_category(Some(3)).await;
        assert_eq!(scoped.items().len(), 2);
        assert!(!scoped.has_error());

        service.fail_fetch(ApiError::new("Erro 500", 500, None));
        scoped.refresh().await;

        assert_eq!(scoped.items().len(), 2);
        assert_eq!(scoped.error().as_deref(), Some("Erro 500"));
        assert_eq!(
            notifier.take(),
            vec![(ToastSeverity::Error, "Erro 500".to_string())]
        );

        service.set_items(vec![sub(1, "Shampoos", 3)]);
        scoped.refresh().await;
        assert_eq!(scoped.items().len(), 1);
        assert!(!scoped.has_error());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_scope_results_are_dropped() {
        let (store, service, _) = fixtures();
        service.set_delay(Duration::from_secs(1));
        let scoped = ScopedSubcategories::new(store);

        let switch_later = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            scoped.set_category(Some(4)).await;
        };
        tokio::join!(scoped.set_category(Some(3)), switch_later);

        let ids: Vec<_> = scoped.items().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3]);
        assert!(!scoped.loading());
    }

    #[tokio::test]
    async fn test_delete_clears_selection_only_when_selected() {
        let (store, _, _) = fixtures();
        let scoped = ScopedSubcategories::new(store);
        scoped.set_category(Some(3)).await;

        scoped.toggle_selection(1);
        assert!(scoped.delete(2).await.success);
        assert_eq!(scoped.selected(), Some(1));

        assert!(scoped.delete(1).await.success);
        assert_eq!(scoped.selected(), None);
    }

    #[tokio::test]
    async fn test_create_fills_parent_from_scope() {
        let (store, service, _) = fixtures();
        let scoped = ScopedSubcategories::new(store);

        let draft = SubcategoryDraft {
            name: "Máscaras".into(),
            ..Default::default()
        };
        let outcome = scoped.create(&draft).await;
        assert_eq!(
            outcome.error.as_deref(),
            Some(messages::SUBCATEGORY_CATEGORY_REQUIRED)
        );
        assert_eq!(service.mutation_count(), 0);

        scoped.set_category(Some(3)).await;
        assert!(scoped.create(&draft).await.success);
        assert_eq!(service.mutation_count(), 1);
    }
}
