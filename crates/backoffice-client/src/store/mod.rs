//! # Sync Stores
//!
//! Per-resource state holders that keep a local snapshot of one REST
//! collection in step with the server.
//!
//! ## Store Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SyncStore<R>                                   │
//! │                                                                         │
//! │  fetch(force)                                                          │
//! │    ├── !force && fresh ──────────────────────────► return (cache hit)  │
//! │    ├── loading guard on, error cleared                                 │
//! │    ├── R::fetch_all()                                                  │
//! │    │     ├── Ok(items) → items replaced, last_fetch_at = now           │
//! │    │     └── Err(e)    → error = message, toast.error                  │
//! │    └── loading guard dropped (every path)                              │
//! │                                                                         │
//! │  create / update / delete                                              │
//! │    ├── local validation ── fail ──► toast.error, Outcome::failure      │
//! │    ├── R::create/update/delete                                         │
//! │    │     ├── Ok  → toast.success, fetch(true), Outcome::success        │
//! │    │     └── Err → curated | server | fallback message,                │
//! │    │               toast.error, Outcome::failure                       │
//! │    └── never returns Err                                               │
//! │                                                                         │
//! │  The local list is always a whole snapshot from the latest successful │
//! │  fetch; mutations are never patched in locally.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod product;
pub mod subcategory;

pub use category::CategoryStore;
pub use product::ProductStore;
pub use subcategory::{ScopedSubcategories, SubcategoryStore};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use backoffice_core::{CatalogId, DraftMode, EmptyState, ResourceMessages};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::ApiError;
use crate::services::{CatalogEntity, DraftOf, Resource};
use crate::toast::Notifier;

type EntityOf<R> = <R as Resource>::Entity;

// =============================================================================
// Mutation Outcome
// =============================================================================

/// What a create/update/delete call reports back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl MutationOutcome {
    pub fn success() -> Self {
        MutationOutcome {
            success: true,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        MutationOutcome {
            success: false,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

// =============================================================================
// Store State
// =============================================================================

#[derive(Debug)]
struct StoreState<T> {
    items: Vec<T>,
    in_flight: usize,
    error: Option<String>,
    last_fetch_at: Option<Instant>,
    selected: Option<CatalogId>,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        StoreState {
            items: Vec::new(),
            in_flight: 0,
            error: None,
            last_fetch_at: None,
            selected: None,
        }
    }
}

/// Point-in-time copy of a store's state.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_fetch_at: Option<Instant>,
    pub selected: Option<CatalogId>,
}

/// The records a list shows for one filter, and why it is empty if it is.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<T> {
    pub items: Vec<T>,
    pub empty_state: Option<EmptyState>,
}

impl<T> FilteredView<T> {
    fn new(total: usize, items: Vec<T>) -> Self {
        let empty_state = EmptyState::classify(total, items.len());
        FilteredView { items, empty_state }
    }
}

/// Marks a fetch in flight until dropped.
struct LoadingGuard<'a, T> {
    state: &'a RwLock<StoreState<T>>,
}

impl<'a, T> LoadingGuard<'a, T> {
    fn start(state: &'a RwLock<StoreState<T>>) -> Self {
        {
            let mut s = state.write().unwrap_or_else(PoisonError::into_inner);
            s.in_flight += 1;
            s.error = None;
        }
        LoadingGuard { state }
    }
}

impl<T> Drop for LoadingGuard<'_, T> {
    fn drop(&mut self) {
        let mut s = self.state.write().unwrap_or_else(PoisonError::into_inner);
        s.in_flight = s.in_flight.saturating_sub(1);
    }
}

// =============================================================================
// Sync Store
// =============================================================================

/// Local snapshot of one REST collection.
pub struct SyncStore<R: Resource> {
    service: Arc<R>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<StoreState<EntityOf<R>>>,
    alive: AtomicBool,
    freshness: Option<Duration>,
}

impl<R: Resource> SyncStore<R> {
    /// Creates a store. With a `freshness` window, non-forced fetches inside
    /// the window are served from the local snapshot.
    pub fn new(service: Arc<R>, notifier: Arc<dyn Notifier>, freshness: Option<Duration>) -> Self {
        SyncStore {
            service,
            notifier,
            state: RwLock::new(StoreState::default()),
            alive: AtomicBool::new(true),
            freshness,
        }
    }

    pub fn service(&self) -> &Arc<R> {
        &self.service
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn freshness(&self) -> Option<Duration> {
        self.freshness
    }

    fn messages() -> ResourceMessages {
        <EntityOf<R> as CatalogEntity>::MESSAGES
    }

    fn resource() -> &'static str {
        <EntityOf<R> as CatalogEntity>::RESOURCE
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState<EntityOf<R>>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState<EntityOf<R>>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    /// Refreshes the local snapshot from the server.
    ///
    /// Failures land in [`SyncStore::error`] and an error toast; this never
    /// returns an error.
    pub async fn fetch(&self, force: bool) {
        if !self.is_alive() {
            return;
        }

        if !force && self.is_fresh() {
            debug!(resource = Self::resource(), "Serving cached snapshot");
            return;
        }

        let _loading = LoadingGuard::start(&self.state);
        let result = self.service.fetch_all().await;

        if !self.is_alive() {
            debug!(resource = Self::resource(), "Store disposed, discarding fetch result");
            return;
        }

        match result {
            Ok(items) => {
                let count = items.len();
                let mut s = self.write();
                s.items = items;
                s.last_fetch_at = Some(Instant::now());
                s.error = None;
                drop(s);
                info!(resource = Self::resource(), count, "Snapshot refreshed");
            }
            Err(err) => {
                let message = err.message_or(Self::messages().load_error);
                error!(
                    resource = Self::resource(),
                    status = err.status,
                    error = %message,
                    "Fetch failed"
                );
                self.write().error = Some(message.clone());
                self.notifier.error(&message);
            }
        }
    }

    /// True while the last successful fetch is inside the freshness window.
    pub fn is_fresh(&self) -> bool {
        match (self.freshness, self.read().last_fetch_at) {
            (Some(window), Some(at)) => at.elapsed() <= window,
            _ => false,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn create(&self, draft: &DraftOf<R>) -> MutationOutcome {
        let messages = Self::messages();

        if let Err(e) = <EntityOf<R> as CatalogEntity>::validate(draft, DraftMode::Create) {
            return self.reject(e.to_string());
        }

        match self.service.create(draft).await {
            Ok(()) => self.succeed(messages.create_success).await,
            Err(err) => self.fail(&err, messages.create_error),
        }
    }

    /// Updates the record named by the draft's id.
    pub async fn update(&self, draft: &DraftOf<R>) -> MutationOutcome {
        let messages = Self::messages();

        if let Err(e) = <EntityOf<R> as CatalogEntity>::validate(draft, DraftMode::Update) {
            return self.reject(e.to_string());
        }
        if <EntityOf<R> as CatalogEntity>::draft_id(draft).is_none() {
            return self.reject(messages.update_error);
        }

        match self.service.update(draft).await {
            Ok(()) => self.succeed(messages.update_success).await,
            Err(err) => self.fail(&err, messages.update_error),
        }
    }

    /// Deletes a record. A successful delete of the selected id clears the
    /// selection.
    pub async fn delete(&self, id: CatalogId) -> MutationOutcome {
        let messages = Self::messages();

        match self.service.delete(id).await {
            Ok(true) => {
                {
                    let mut s = self.write();
                    if s.selected == Some(id) {
                        s.selected = None;
                    }
                }
                self.succeed(messages.delete_success).await
            }
            Ok(false) => self.reject(messages.delete_error),
            Err(err) => self.fail(&err, messages.delete_error),
        }
    }

    async fn succeed(&self, message: &str) -> MutationOutcome {
        info!(resource = Self::resource(), "{}", message);
        self.notifier.success(message);
        self.fetch(true).await;
        MutationOutcome::success()
    }

    fn reject(&self, message: impl Into<String>) -> MutationOutcome {
        let message = message.into();
        warn!(resource = Self::resource(), error = %message, "Mutation rejected");
        self.notifier.error(&message);
        MutationOutcome::failure(message)
    }

    fn fail(&self, err: &ApiError, fallback: &str) -> MutationOutcome {
        let message = Self::failure_message(err, fallback);
        error!(
            resource = Self::resource(),
            status = err.status,
            code = err.code.as_deref().unwrap_or("-"),
            error = %message,
            "Mutation failed"
        );
        self.notifier.error(&message);
        MutationOutcome::failure(message)
    }

    /// Curated text for this resource's conflict codes, else the server's
    /// message, else `fallback`.
    fn failure_message(err: &ApiError, fallback: &str) -> String {
        err.domain_code()
            .filter(|code| <EntityOf<R> as CatalogEntity>::CONFLICT_CODES.contains(code))
            .and_then(|code| code.curated_message())
            .map(str::to_string)
            .unwrap_or_else(|| err.message_or(fallback))
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn select(&self, id: CatalogId) {
        self.write().selected = Some(id);
    }

    /// Selects `id`, or clears the selection when `id` is already selected.
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

    /// The selected record, if it is in the current snapshot.
    pub fn selected_item(&self) -> Option<EntityOf<R>> {
        let s = self.read();
        let id = s.selected?;
        s.items.iter().find(|item| item.id() == id).cloned()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn items(&self) -> Vec<EntityOf<R>> {
        self.read().items.clone()
    }

    pub fn get_by_id(&self, id: CatalogId) -> Option<EntityOf<R>> {
        self.read().items.iter().find(|item| item.id() == id).cloned()
    }

    pub fn snapshot(&self) -> StoreSnapshot<EntityOf<R>> {
        let s = self.read();
        StoreSnapshot {
            items: s.items.clone(),
            loading: s.in_flight > 0,
            error: s.error.clone(),
            last_fetch_at: s.last_fetch_at,
            selected: s.selected,
        }
    }

    pub fn len(&self) -> usize {
        self.read().items.len()
    }

    /// Not loading and holding no records.
    pub fn is_empty(&self) -> bool {
        let s = self.read();
        s.in_flight == 0 && s.items.is_empty()
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

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    pub fn last_fetch_at(&self) -> Option<Instant> {
        self.read().last_fetch_at
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Marks the store dead. Fetches resolving afterwards are dropped.
    pub fn dispose(&self) {
        if self.alive.swap(false, Ordering::SeqCst) {
            debug!(resource = Self::resource(), "Store disposed");
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

impl<R: Resource> std::fmt::Debug for SyncStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.read();
        f.debug_struct("SyncStore")
            .field("resource", &Self::resource())
            .field("items", &s.items.len())
            .field("loading", &(s.in_flight > 0))
            .field("error", &s.error)
            .field("freshness", &self.freshness)
            .finish()
    }
}

// =============================================================================
// Test Support
// =============================================================================


#[cfg(test)]
mod tests {
    use super::testing::{FakeService, RecordingNotifier};
    use super::*;
    use backoffice_core::{
        messages, Category, CategoryDraft, ImageFile, Money, Product, ProductDraft, ToastSeverity,
    };

    fn category(id: CatalogId, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: String::new(),
            active: true,
            image_url: None,
        }
    }

    fn category_store(
        freshness: Option<Duration>,
    ) -> (
        SyncStore<FakeService<Category>>,
        Arc<FakeService<Category>>,
        Arc<RecordingNotifier>,
    ) {
        let service = Arc::new(FakeService::new(vec![category(1, "Cabelos"), category(2, "Pele")]));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = SyncStore::new(service.clone(), notifier.clone(), freshness);
        (store, service, notifier)
    }

    fn product_store() -> (
        SyncStore<FakeService<Product>>,
        Arc<FakeService<Product>>,
        Arc<RecordingNotifier>,
    ) {
        let service = Arc::new(FakeService::new(Vec::new()));
        let notifier = Arc::new(RecordingNotifier::default());
        let store = SyncStore::new(service.clone(), notifier.clone(), None);
        (store, service, notifier)
    }

    fn product_draft() -> ProductDraft {
        ProductDraft {
            name: "Shampoo".into(),
            description: "Limpeza suave".into(),
            price: Money::from_cents(5000),
            category_id: Some(9),
            active: true,
            image: Some(ImageFile::new("s.png", "image/png", vec![1, 2, 3])),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_inside_window_hit_network_once() {
        let (store, service, _) = category_store(Some(Duration::from_secs(30)));

        store.fetch(false).await;
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(5)).await;
            store.fetch(false).await;
        }
        assert_eq!(service.fetch_count(), 1);
        assert_eq!(store.len(), 2);

        store.fetch(true).await;
        assert_eq!(service.fetch_count(), 2);

        tokio::time::advance(Duration::from_secs(31)).await;
        store.fetch(false).await;
        assert_eq!(service.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_without_window_every_fetch_hits_network() {
        let (store, service, _) = category_store(None);
        store.fetch(false).await;
        store.fetch(false).await;
        assert_eq!(service.fetch_count(), 2);
        assert!(!store.is_fresh());
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error_and_toasts() {
        let (store, service, notifier) = category_store(None);
        store.fetch(false).await;

        service.fail_fetch(ApiError::new("", 500, None));
        store.fetch(true).await;

        assert_eq!(store.error().as_deref(), Some(messages::CATEGORY.load_error));
        assert!(!store.loading());
        assert_eq!(store.len(), 2, "previous snapshot survives a failed fetch");
        assert_eq!(
            notifier.take(),
            vec![(ToastSeverity::Error, messages::CATEGORY.load_error.to_string())]
        );

        service.set_items(vec![category(3, "Corpo")]);
        store.fetch(true).await;
        assert!(!store.has_error());
        assert_eq!(store.items()[0].name, "Corpo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_is_set_while_in_flight() {
        let (store, service, _) = category_store(None);
        service.set_delay(Duration::from_secs(1));

        let probe = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            (store.loading(), store.is_empty())
        };
        let (_, (loading, empty)) = tokio::join!(store.fetch(false), probe);

        assert!(loading);
        assert!(!empty);
        assert!(!store.loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disposed_store_discards_late_result() {
        let (store, service, notifier) = category_store(None);
        service.set_delay(Duration::from_secs(1));

        tokio::join!(store.fetch(false), async { store.dispose() });

        assert_eq!(service.fetch_count(), 1);
        assert!(store.items().is_empty());
        assert!(store.last_fetch_at().is_none());
        assert!(!store.loading());

        store.fetch(true).await;
        assert_eq!(service.fetch_count(), 1);
        assert!(notifier.take().is_empty());
    }

    #[tokio::test]
    async fn test_validation_gates_the_network() {
        let (store, service, notifier) = product_store();

        let mut zero_price = product_draft();
        zero_price.price = Money::zero();
        let outcome = store.create(&zero_price).await;
        assert_eq!(outcome, MutationOutcome::failure(messages::PRODUCT_PRICE_REQUIRED));

        let mut no_category = product_draft();
        no_category.category_id = None;
        let outcome = store.create(&no_category).await;
        assert_eq!(outcome.error.as_deref(), Some(messages::PRODUCT_CATEGORY_REQUIRED));

        let mut no_image = product_draft();
        no_image.image = None;
        assert!(!store.create(&no_image).await.success);

        assert_eq!(service.mutation_count(), 0);
        assert_eq!(service.fetch_count(), 0);
        assert_eq!(notifier.take().len(), 3);
    }

    #[tokio::test]
    async fn test_update_without_image_is_allowed_but_needs_id() {
        let (store, service, _) = product_store();

        let mut draft = product_draft();
        draft.image = None;
        let outcome = store.update(&draft).await;
        assert_eq!(outcome.error.as_deref(), Some(messages::PRODUCT.update_error));
        assert_eq!(service.mutation_count(), 0);

        draft.id = Some(4);
        assert!(store.update(&draft).await.success);
        assert_eq!(service.mutation_count(), 1);
    }

    #[tokio::test]
    async fn test_successful_mutation_toasts_and_refetches() {
        let (store, service, notifier) = product_store();

        let outcome = store.create(&product_draft()).await;
        assert_eq!(outcome, MutationOutcome::success());
        assert_eq!(service.fetch_count(), 1);
        assert_eq!(
            notifier.take(),
            vec![(ToastSeverity::Success, messages::PRODUCT.create_success.to_string())]
        );
    }

    #[tokio::test]
    async fn test_conflict_codes_get_curated_messages() {
        let (store, service, _) = category_store(None);

        service.fail_mutations(ApiError::new("raw", 409, Some("C.ITDx0001".into())));
        let outcome = store.delete(1).await;
        assert_eq!(outcome.error.as_deref(), Some(messages::CATEGORY_DELETE_WITH_PRODUCTS));

        // Another resource's code is not curated here.
        service.fail_mutations(ApiError::new("raw", 409, Some("S.ITDx0001".into())));
        assert_eq!(store.delete(1).await.error.as_deref(), Some("raw"));

        service.fail_mutations(ApiError::new(" ", 500, None));
        let draft = CategoryDraft {
            name: "Corpo".into(),
            description: "Hidratantes".into(),
            image: Some(ImageFile::new("c.png", "image/png", vec![1])),
            ..Default::default()
        };
        assert_eq!(
            store.create(&draft).await.error.as_deref(),
            Some(messages::CATEGORY.create_error)
        );
        assert_eq!(service.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_clears_selection_only_for_selected_id() {
        let (store, service, _) = category_store(None);
        store.fetch(false).await;

        store.select(1);
        assert!(store.delete(2).await.success);
        assert_eq!(store.selected(), Some(1));

        assert!(store.delete(1).await.success);
        assert_eq!(store.selected(), None);

        store.select(2);
        service.delete_confirms.store(false, Ordering::SeqCst);
        let outcome = store.delete(2).await;
        assert_eq!(outcome.error.as_deref(), Some(messages::CATEGORY.delete_error));
        assert_eq!(store.selected(), Some(2));
    }

    #[tokio::test]
    async fn test_selection_helpers() {
        let (store, _, _) = category_store(None);
        store.fetch(false).await;

        store.toggle_selection(2);
        assert_eq!(store.selected_item().map(|c| c.name), Some("Pele".to_string()));
        store.toggle_selection(2);
        assert_eq!(store.selected(), None);

        store.select(99);
        assert!(store.selected_item().is_none());
        store.clear_selection();
        assert_eq!(store.snapshot().selected, None);
        assert_eq!(store.get_by_id(1).map(|c| c.id), Some(1));
    }
}
