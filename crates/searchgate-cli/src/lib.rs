//! Command-line front end for Searchgate.
//!
//! This crate is the caller of the access resolver: it loads searches and
//! views from a JSON snapshot, turns a user's configured grants into the
//! view read check, and prints the readable results.
//!
//! # Modules
//!
//! - [`app`]: Application wiring and command execution
//! - [`cli`]: Argument parsing
//! - [`config`]: Config loading (file, env, defaults)
//! - [`permissions`]: Grant parsing and the view read check

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod permissions;

pub use app::{EXIT_NOT_FOUND, EXIT_PERMISSION_DENIED, SearchgateCli, exit_code};
pub use cli::{CliArgs, Command};
pub use config::SearchgateConfig;
pub use permissions::{Permission, PermissionSet};
