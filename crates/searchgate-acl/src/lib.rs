//! Access control layer for Searchgate.
//!
//! This crate decides whether a user may read a saved search and exposes
//! the filtered retrieval built on that decision.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     searchgate-acl                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchDomain (ownership → referencing views → predicate)   │
//! │  ├── get_for_user      (Ok(None) | PermissionDenied)        │
//! │  └── get_all_for_user  (silent filter)                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchExporter (denied == unavailable)                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  InMemorySearchStore / InMemoryViewStore / Snapshot         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use searchgate_acl::Snapshot;
//! use searchgate_core::{User, View};
//!
//! let domain = Snapshot::load("snapshot.json")?.into_domain();
//! let can_read = |view: &View| view.id == "v2";
//!
//! let search = domain.get_for_user("s1", &User::new("bob"), &can_read).await?;
//! let all = domain.get_all_for_user(&User::new("bob"), &can_read).await?;
//! ```

#![doc = include_str!("../README.md")]

pub mod domain;
pub mod export;
pub mod memory;

pub use domain::SearchDomain;
pub use export::{Entity, ModelType, SearchExporter};
pub use memory::{InMemorySearchStore, InMemoryViewStore, Snapshot};
