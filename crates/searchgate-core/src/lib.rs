//! Searchgate Core: shared types, traits, and errors.
//!
//! This crate provides the foundational types used across all Searchgate crates.
//! It has no internal Searchgate dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Collaborator traits (storage, view lookup, identity)
//! - [`types`]: Searches, views, and users

#![doc = include_str!("../README.md")]

pub mod error;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::{Identity, SearchStore, SearchStream, ViewLookup};
pub use types::{Query, Search, User, View, ViewType};
