//! Collaborator traits for Searchgate.
//!
//! The access resolver never talks to a database or identity service
//! directly. Instead it consumes these traits:
//!
//! - [`SearchStore`]: fetches and enumerates searches
//! - [`ViewLookup`]: finds the views referencing a search
//! - [`Identity`]: exposes the requesting user's name
//!
//! Storage implementations report genuine I/O failures as
//! [`Error::Storage`](crate::Error::Storage). "Not found" is never an error.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::Result;
use crate::types::{Search, View};

/// Stream of searches produced by [`SearchStore::stream_all`].
///
/// Individual items may fail, e.g. when a record cannot be decoded mid-scan.
pub type SearchStream<'a> = BoxStream<'a, Result<Search>>;

/// The requesting principal.
///
/// Only the name is read, for ownership comparison.
pub trait Identity: Send + Sync {
    /// Stable user name.
    fn name(&self) -> &str;
}

/// Storage for searches.
///
/// # Example
///
/// ```rust,ignore
/// struct MongoSearchStore { /* ... */ }
///
/// #[async_trait]
/// impl SearchStore for MongoSearchStore {
///     async fn get(&self, id: &str) -> Result<Option<Search>> {
///         // Ok(None) when the id has no record
///     }
///
///     async fn stream_all(&self) -> Result<SearchStream<'_>> {
///         // Enumerate every stored search
///     }
/// }
/// ```
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Fetch a search by id.
    ///
    /// Returns `Ok(None)` when no search has this id.
    async fn get(&self, id: &str) -> Result<Option<Search>>;

    /// Enumerate all searches in storage order.
    async fn stream_all(&self) -> Result<SearchStream<'_>>;
}

/// Lookup of views by the search they reference.
#[async_trait]
pub trait ViewLookup: Send + Sync {
    /// All views referencing `search_id`.
    ///
    /// Returns an empty list, not an error, when nothing references the
    /// search. The result never contains the same view twice.
    async fn for_search(&self, search_id: &str) -> Result<Vec<View>>;
}
