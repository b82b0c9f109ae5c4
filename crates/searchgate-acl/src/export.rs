//! Portable export of searches.
//!
//! [`SearchExporter`] reads searches through [`SearchDomain`] and wraps them
//! in a versioned [`Entity`]. A search the user may not read is reported the
//! same way as a missing one: unavailable for export.

use serde::{Deserialize, Serialize};

use searchgate_core::{Identity, Result, Search, View};

use crate::SearchDomain;

/// Model type and version of an exported entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelType {
    /// Model name, e.g. `"search"`.
    pub name: String,
    /// Model version.
    pub version: String,
}

impl ModelType {
    /// Version 1 of the search model.
    pub fn search_v1() -> Self {
        Self {
            name: "search".to_string(),
            version: "1".to_string(),
        }
    }
}

/// A search in its portable form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier of the exported search.
    pub id: String,
    /// Model type of `data`.
    #[serde(rename = "type")]
    pub model_type: ModelType,
    /// The search itself.
    pub data: serde_json::Value,
}

impl Entity {
    /// Wrap a search as a version 1 entity.
    pub fn from_search(search: &Search) -> Result<Self> {
        Ok(Self {
            id: search.id.clone(),
            model_type: ModelType::search_v1(),
            data: serde_json::to_value(search)?,
        })
    }

    /// Decode the wrapped search.
    pub fn to_search(&self) -> Result<Search> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Exports searches a user may read.
#[derive(Clone, Debug)]
pub struct SearchExporter {
    domain: SearchDomain,
}

impl SearchExporter {
    /// Create an exporter over the given domain.
    pub fn new(domain: SearchDomain) -> Self {
        Self { domain }
    }

    /// Export a single search on behalf of `user`.
    ///
    /// Returns `Ok(None)` when the search is missing or `user` may not read
    /// it. Storage errors still fail the call.
    pub async fn export_for_user<I, P>(
        &self,
        id: &str,
        user: &I,
        view_read_permission: &P,
    ) -> Result<Option<Entity>>
    where
        I: Identity + ?Sized,
        P: Fn(&View) -> bool + Sync + ?Sized,
    {
        match self
            .domain
            .get_for_user(id, user, view_read_permission)
            .await
        {
            Ok(Some(search)) => Entity::from_search(&search).map(Some),
            Ok(None) => Ok(None),
            Err(err) if err.is_permission_denied() => {
                log::debug!("Search {id} unavailable for export to {}", user.name());
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Export every search `user` may read, in storage order.
    pub async fn export_all_for_user<I, P>(
        &self,
        user: &I,
        view_read_permission: &P,
    ) -> Result<Vec<Entity>>
    where
        I: Identity + ?Sized,
        P: Fn(&View) -> bool + Sync + ?Sized,
    {
        self.domain
            .get_all_for_user(user, view_read_permission)
            .await?
            .iter()
            .map(Entity::from_search)
            .collect()
    }
}
