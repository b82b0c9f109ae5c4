//! Configuration for the Searchgate CLI.
//!
//! Provides the [`SearchgateConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `SEARCHGATE_CONFIG` environment variable
//! 3. XDG default: `~/.config/searchgate/config.toml`
//! 4. Built-in defaults

use confyg::{Confygery, env};
use searchgate_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::permissions::PermissionSet;

/// Prefix of every environment variable the config reads.
const ENV_PREFIX: &str = "SEARCHGATE";

/// Config sections overlaid from the environment.
const ENV_SECTIONS: &[&str] = &["data"];

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the Searchgate CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchgateConfig {
    /// Snapshot data configuration.
    pub data: DataConfig,

    /// Permission grants, keyed by user name.
    pub permissions: BTreeMap<String, Vec<String>>,
}

/// Snapshot data configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the JSON snapshot of searches and views.
    pub path: Option<String>,
}

// ============================================================================
// Config loading
// ============================================================================

impl SearchgateConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level(ENV_PREFIX);
        for section in ENV_SECTIONS {
            env_opts.add_section(*section);
        }
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("SEARCHGATE_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("searchgate").join("config.toml"))
    }

    /// Path of the snapshot file.
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        self.data.path.as_deref().map(PathBuf::from).ok_or_else(|| {
            Error::config("No snapshot configured: set data.path or pass --data")
        })
    }

    /// Parsed grants for `user`. A user without an entry has no grants.
    pub fn permissions_for(&self, user: &str) -> Result<PermissionSet> {
        match self.permissions.get(user) {
            Some(grants) => PermissionSet::parse(grants),
            None => Ok(PermissionSet::default()),
        }
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `SEARCHGATE_` prefix.
    ///
    /// Only the sections read back by [`load`](Self::load) are exported.
    /// Permission grants are keyed by case-sensitive user names, which env
    /// var names cannot carry, so they stay in the config file.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let mut value: toml::Value =
            toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        if let Some(table) = value.as_table_mut() {
            table.retain(|section, _| ENV_SECTIONS.contains(&section));
        }
        let mut vars = Vec::new();
        flatten_toml_value(&value, ENV_PREFIX, &mut vars);
        Ok(vars)
    }
}

// ============================================================================
// Helper: flatten TOML to env vars
// ============================================================================

/// Recursively flatten a TOML value into `KEY=value` pairs.
///
/// Arrays are emitted as JSON.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
