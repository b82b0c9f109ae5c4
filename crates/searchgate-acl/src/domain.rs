//! Read-access resolution for searches.
//!
//! [`SearchDomain`] answers one question: may this user read this search?
//!
//! # Decision
//!
//! 1. The owner may always read their own search.
//! 2. Otherwise the views referencing the search are looked up. A search no
//!    view references is unreadable.
//! 3. Otherwise the search is readable if the caller's predicate accepts at
//!    least one of those views. Evaluation stops at the first match.
//!
//! Nothing is cached. Each call re-reads ownership and the referencing views,
//! and uses the predicate passed with that call.
//!
//! The predicate encodes "this user may read this view" and is built by the
//! caller (typically from the user's permission grants). It must be free of
//! side effects, since it may be skipped entirely (owner) or stop early.

use std::sync::Arc;

use futures::TryStreamExt;
use log::{debug, warn};

use searchgate_core::{Error, Identity, Result, Search, SearchStore, View, ViewLookup};

/// Resolves read access to searches.
///
/// Holds only shared handles to its collaborators, so it is cheap to clone
/// and safe to use from many tasks at once.
#[derive(Clone)]
pub struct SearchDomain {
    searches: Arc<dyn SearchStore>,
    views: Arc<dyn ViewLookup>,
}

impl SearchDomain {
    /// Create a domain over the given collaborators.
    pub fn new(searches: impl SearchStore + 'static, views: impl ViewLookup + 'static) -> Self {
        Self::from_arcs(Arc::new(searches), Arc::new(views))
    }

    /// Create a domain from collaborators that are already shared elsewhere.
    pub fn from_arcs(searches: Arc<dyn SearchStore>, views: Arc<dyn ViewLookup>) -> Self {
        Self { searches, views }
    }

    /// Fetch a search on behalf of `user`.
    ///
    /// Returns `Ok(None)` when no search has this id, in which case no view
    /// lookup happens.
    ///
    /// # Errors
    ///
    /// - [`Error::PermissionDenied`] when the search exists but `user` may
    ///   not read it
    /// - [`Error::InvalidData`] when `id` is empty
    /// - Any storage error, unchanged
    pub async fn get_for_user<I, P>(
        &self,
        id: &str,
        user: &I,
        view_read_permission: &P,
    ) -> Result<Option<Search>>
    where
        I: Identity + ?Sized,
        P: Fn(&View) -> bool + Sync + ?Sized,
    {
        if id.is_empty() {
            return Err(Error::invalid_data("search id must not be empty"));
        }

        let Some(search) = self.searches.get(id).await? else {
            debug!("Search {id} not found");
            return Ok(None);
        };

        if self
            .has_read_permission(user, view_read_permission, &search)
            .await?
        {
            Ok(Some(search))
        } else {
            warn!("User {} denied read access to search {}", user.name(), id);
            Err(Error::permission_denied(user.name(), search.id))
        }
    }

    /// All searches `user` may read, in storage order.
    ///
    /// Denied searches are left out. Only storage errors fail the call.
    pub async fn get_all_for_user<I, P>(
        &self,
        user: &I,
        view_read_permission: &P,
    ) -> Result<Vec<Search>>
    where
        I: Identity + ?Sized,
        P: Fn(&View) -> bool + Sync + ?Sized,
    {
        let mut searches = self.searches.stream_all().await?;
        let mut readable = Vec::new();
        let mut denied = 0usize;

        while let Some(search) = searches.try_next().await? {
            if self
                .has_read_permission(user, view_read_permission, &search)
                .await?
            {
                readable.push(search);
            } else {
                denied += 1;
            }
        }

        debug!(
            "User {} may read {} searches ({} filtered out)",
            user.name(),
            readable.len(),
            denied
        );
        Ok(readable)
    }

    /// Whether `user` may read `search`.
    ///
    /// Ownership short-circuits: the view lookup is skipped for the owner.
    pub async fn has_read_permission<I, P>(
        &self,
        user: &I,
        view_read_permission: &P,
        search: &Search,
    ) -> Result<bool>
    where
        I: Identity + ?Sized,
        P: Fn(&View) -> bool + Sync + ?Sized,
    {
        if search.is_owned_by(user) {
            debug!("User {} owns search {}", user.name(), search.id);
            return Ok(true);
        }

        let views = self.views.for_search(&search.id).await?;
        if views.is_empty() {
            debug!("Search {} is not referenced by any view", search.id);
            return Ok(false);
        }

        Ok(views.iter().any(|view| view_read_permission(view)))
    }
}

impl std::fmt::Debug for SearchDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDomain").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
