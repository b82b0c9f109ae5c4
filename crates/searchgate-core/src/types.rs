//! Domain types: searches, views, and users.
//!
//! All types derive `Serialize`/`Deserialize` so they can be loaded from
//! snapshot files and exported as portable entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::traits::Identity;

// ============================================================================
// Search
// ============================================================================

/// A saved search: the resource whose read access is being resolved.
///
/// An unset `owner` marks a system search with no owning user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Search {
    /// Unique search identifier.
    pub id: String,

    /// Name of the owning user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Creation timestamp, when the source recorded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Queries executed by this search.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<Query>,
}

impl Search {
    /// Create an unowned search with no queries.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: None,
            created_at: None,
            queries: Vec::new(),
        }
    }

    /// Set the owning user.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Append a query.
    pub fn with_query(mut self, query: Query) -> Self {
        self.queries.push(query);
        self
    }

    /// Whether `user` owns this search.
    ///
    /// An unowned search is owned by nobody, including a user whose name is
    /// empty.
    pub fn is_owned_by<I: Identity + ?Sized>(&self, user: &I) -> bool {
        self.owner.as_deref() == Some(user.name())
    }
}

/// A single query inside a search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Query identifier, unique within its search.
    pub id: String,
    /// Query string in the backend's query language.
    pub query_string: String,
}

impl Query {
    /// Create a new query.
    pub fn new(id: impl Into<String>, query_string: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            query_string: query_string.into(),
        }
    }
}

// ============================================================================
// View
// ============================================================================

/// Kind of view referencing a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    /// A saved search view.
    #[default]
    Search,
    /// A dashboard.
    Dashboard,
}

impl ViewType {
    /// Lowercase name, as used in permission strings and serialization.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Dashboard => "dashboard",
        }
    }
}

/// A view: a container that may reference one search.
///
/// Views carry their own access rules, which live outside this crate and are
/// only ever consulted through a caller-supplied predicate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// Unique view identifier.
    pub id: String,

    /// Display title.
    #[serde(default)]
    pub title: String,

    /// Kind of view.
    #[serde(default, rename = "type")]
    pub view_type: ViewType,

    /// Identifier of the referenced search, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_id: Option<String>,
}

impl View {
    /// Create a search view that references nothing.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            view_type: ViewType::Search,
            search_id: None,
        }
    }

    /// Create a dashboard that references nothing.
    pub fn dashboard(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            view_type: ViewType::Dashboard,
            ..Self::new(id, title)
        }
    }

    /// Point this view at a search.
    pub fn referencing(mut self, search_id: impl Into<String>) -> Self {
        self.search_id = Some(search_id.into());
        self
    }

    /// Whether this view references the given search.
    pub fn references(&self, search_id: &str) -> bool {
        self.search_id.as_deref() == Some(search_id)
    }
}

// ============================================================================
// User
// ============================================================================

/// A requesting user, identified by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// Stable user name used for ownership comparison.
    pub name: String,
}

impl User {
    /// Create a new user.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Identity for User {
    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_new_is_unowned() {
        let search = Search::new("s1");
        assert_eq!(search.id, "s1");
        assert!(search.owner.is_none());
        assert!(search.queries.is_empty());
    }

    #[test]
    fn test_search_with_created_at() {
        let created = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let search = Search::new("s1").with_created_at(created);
        assert_eq!(search.created_at, Some(created));
    }

    #[test]
    fn test_search_is_owned_by() {
        let search = Search::new("s1").with_owner("alice");
        assert!(search.is_owned_by(&User::new("alice")));
        assert!(!search.is_owned_by(&User::new("bob")));
    }

    #[test]
    fn test_unowned_search_is_not_owned_by_empty_name() {
        let search = Search::new("s1");
        assert!(!search.is_owned_by(&User::new("")));
    }

    #[test]
    fn test_search_deserialize_minimal() {
        let search: Search = serde_json::from_str(r#"{"id": "s1"}"#).unwrap();
        assert_eq!(search.id, "s1");
        assert!(search.owner.is_none());
        assert!(search.created_at.is_none());
        assert!(search.queries.is_empty());
    }

    #[test]
    fn test_search_without_timestamp_loads_identically() {
        let json = r#"{"id": "s1", "owner": "alice"}"#;
        let first: Search = serde_json::from_str(json).unwrap();
        let second: Search = serde_json::from_str(json).unwrap();
        assert_eq!(first, second);
        assert!(serde_json::to_value(&first).unwrap().get("created_at").is_none());
    }

    #[test]
    fn test_search_deserialize_full() {
        let json = r#"{
            "id": "s1",
            "owner": "alice",
            "created_at": "2024-03-01T12:00:00Z",
            "queries": [{"id": "q1", "query_string": "source:web"}]
        }"#;
        let search: Search = serde_json::from_str(json).unwrap();
        assert_eq!(search.owner.as_deref(), Some("alice"));
        assert_eq!(
            search.created_at.map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-03-01T12:00:00+00:00")
        );
        assert_eq!(search.queries, vec![Query::new("q1", "source:web")]);
    }

    #[test]
    fn test_search_serialize_skips_empty_fields() {
        let json = serde_json::to_value(Search::new("s1")).unwrap();
        assert!(json.get("owner").is_none());
        assert!(json.get("created_at").is_none());
        assert!(json.get("queries").is_none());
        assert_eq!(json["id"], "s1");
    }

    #[test]
    fn test_view_builders() {
        let view = View::new("v1", "Errors").referencing("s1");
        assert_eq!(view.view_type, ViewType::Search);
        assert!(view.references("s1"));
        assert!(!view.references("s2"));

        let dashboard = View::dashboard("d1", "Overview");
        assert_eq!(dashboard.view_type, ViewType::Dashboard);
        assert!(dashboard.search_id.is_none());
    }

    #[test]
    fn test_view_type_serde() {
        let view: View =
            serde_json::from_str(r#"{"id": "d1", "type": "dashboard", "search_id": "s1"}"#)
                .unwrap();
        assert_eq!(view.view_type, ViewType::Dashboard);
        assert_eq!(view.view_type.name(), "dashboard");
        assert!(view.title.is_empty());

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "dashboard");
    }

    #[test]
    fn test_user_identity() {
        let user = User::new("alice");
        assert_eq!(Identity::name(&user), "alice");
    }
}
