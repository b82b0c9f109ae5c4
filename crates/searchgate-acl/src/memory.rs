//! In-memory collaborators and JSON snapshots.
//!
//! These back the CLI and the tests. Production deployments implement
//! [`SearchStore`] and [`ViewLookup`] over their own database.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use searchgate_core::{Result, Search, SearchStore, SearchStream, View, ViewLookup};

use crate::SearchDomain;

// ============================================================================
// Search store
// ============================================================================

/// Search storage held in memory.
///
/// Enumeration follows insertion order. Inserting an id that already exists
/// replaces the stored search in place.
#[derive(Debug, Default)]
pub struct InMemorySearchStore {
    searches: RwLock<Vec<Search>>,
}

impl InMemorySearchStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given searches.
    pub fn with_searches(searches: impl IntoIterator<Item = Search>) -> Self {
        let mut stored: Vec<Search> = Vec::new();
        for search in searches {
            upsert(&mut stored, search);
        }
        Self {
            searches: RwLock::new(stored),
        }
    }

    /// Insert or replace a search.
    pub async fn insert(&self, search: Search) {
        upsert(&mut *self.searches.write().await, search);
    }

    /// Number of stored searches.
    pub async fn len(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.searches.read().await.is_empty()
    }
}

fn upsert(searches: &mut Vec<Search>, search: Search) {
    match searches.iter_mut().find(|s| s.id == search.id) {
        Some(existing) => *existing = search,
        None => searches.push(search),
    }
}

#[async_trait]
impl SearchStore for InMemorySearchStore {
    async fn get(&self, id: &str) -> Result<Option<Search>> {
        Ok(self.searches.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn stream_all(&self) -> Result<SearchStream<'_>> {
        // Snapshot so no lock is held while the caller consumes the stream.
        let searches = self.searches.read().await.clone();
        Ok(stream::iter(searches.into_iter().map(Ok)).boxed())
    }
}

// ============================================================================
// View store
// ============================================================================

/// View storage held in memory, keyed by view id.
#[derive(Debug, Default)]
pub struct InMemoryViewStore {
    views: RwLock<BTreeMap<String, View>>,
}

impl InMemoryViewStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given views.
    pub fn with_views(views: impl IntoIterator<Item = View>) -> Self {
        Self {
            views: RwLock::new(views.into_iter().map(|v| (v.id.clone(), v)).collect()),
        }
    }

    /// Insert or replace a view.
    pub async fn insert(&self, view: View) {
        self.views.write().await.insert(view.id.clone(), view);
    }

    /// Remove a view, returning it if present.
    pub async fn remove(&self, id: &str) -> Option<View> {
        self.views.write().await.remove(id)
    }
}

#[async_trait]
impl ViewLookup for InMemoryViewStore {
    async fn for_search(&self, search_id: &str) -> Result<Vec<View>> {
        Ok(self
            .views
            .read()
            .await
            .values()
            .filter(|view| view.references(search_id))
            .cloned()
            .collect())
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Serializable contents of both stores.
///
/// ```json
/// {
///   "searches": [{"id": "s1", "owner": "alice"}],
///   "views": [{"id": "v1", "title": "Errors", "search_id": "s1"}]
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// All searches, in enumeration order.
    #[serde(default)]
    pub searches: Vec<Search>,
    /// All views.
    #[serde(default)]
    pub views: Vec<View>,
}

impl Snapshot {
    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json(&content)?;
        log::debug!(
            "Loaded snapshot from {}: {} searches, {} views",
            path.display(),
            snapshot.searches.len(),
            snapshot.views.len()
        );
        Ok(snapshot)
    }

    /// Split into the two in-memory stores.
    pub fn into_stores(self) -> (InMemorySearchStore, InMemoryViewStore) {
        (
            InMemorySearchStore::with_searches(self.searches),
            InMemoryViewStore::with_views(self.views),
        )
    }

    /// Build a [`SearchDomain`] over this snapshot.
    pub fn into_domain(self) -> SearchDomain {
        let (searches, views) = self.into_stores();
        SearchDomain::from_arcs(Arc::new(searches), Arc::new(views))
    }
}

// ============================================================================
// Tests
// ============================================================================
