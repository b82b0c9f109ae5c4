//! Handler functions for config CLI commands.
//!
//! Implements `searchgate config {path,get,init,export}`.

use crate::cli::ConfigAction;
use crate::config::SearchgateConfig;
use searchgate_core::{Error, Result};
use std::path::PathBuf;

// ============================================================================
// Command dispatch
// ============================================================================

/// Handle a config subcommand.
///
/// Receives the raw `--config` path (not a loaded config) because some
/// commands (path, init) work before a config file exists.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Get { key } => {
            let config = SearchgateConfig::load(config_path)?;
            println!("{}", config_value(&config, &key)?);
            Ok(())
        }
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force),
        ConfigAction::Export { docker_env } => {
            let config = SearchgateConfig::load(config_path)?;
            for line in env_lines(&config, docker_env)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

/// Show the resolved config file path.
fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    match SearchgateConfig::resolve_config_path(config_path) {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                log::warn!("{} does not exist; run `searchgate config init`", path.display());
            }
            Ok(())
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

/// Look up a configuration value by dotted key, formatted for display.
fn config_value(config: &SearchgateConfig, key: &str) -> Result<String> {
    let value = toml::Value::try_from(config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Create a default configuration file.
fn cmd_config_init(file: Option<&str>, force: bool) -> Result<()> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => SearchgateConfig::default_config_path()
            .ok_or_else(|| Error::config("Could not determine config directory"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&path, default_config_template())?;

    println!("Config file created at {}", path.display());
    Ok(())
}

/// Configuration as `KEY=value` lines, or Docker `--env` flags.
fn env_lines(config: &SearchgateConfig, docker_env: bool) -> Result<Vec<String>> {
    Ok(config
        .to_env_vars()?
        .into_iter()
        .map(|(key, value)| {
            if docker_env {
                format!("--env {key}={value}")
            } else {
                format!("{key}={value}")
            }
        })
        .collect())
}

/// Starter config written by `config init`.
fn default_config_template() -> &'static str {
    r#"# Searchgate configuration

[data]
# JSON snapshot of searches and views.
# path = "/var/lib/searchgate/snapshot.json"

# Grants per user, as domain:action:instance strings.
[permissions]
# bob = ["view:read:v1,v2"]
# carol = ["dashboards:read:*"]
"#
}

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Navigate a dotted key path in a TOML value tree.
fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Format a TOML value for display on stdout.
fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(_) => {
            serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
        }
        toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
        other => other.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SearchgateConfig {
        let mut config = SearchgateConfig::default();
        config.data.path = Some("/data/snapshot.json".into());
        config
            .permissions
            .insert("bob".into(), vec!["view:read:v1".into()]);
        config
    }

    #[test]
    fn test_cmd_config_path_explicit() {
        assert!(cmd_config_path(Some("/explicit/config.toml")).is_ok());
    }

    #[test]
    fn test_config_value_nested() {
        assert_eq!(
            config_value(&config(), "data.path").unwrap(),
            "/data/snapshot.json"
        );
        assert_eq!(
            config_value(&config(), "permissions.bob").unwrap(),
            r#"["view:read:v1"]"#
        );
    }

    #[test]
    fn test_config_value_missing_key() {
        let err = config_value(&config(), "nonexistent.key").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_config_get_dispatch_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, config().to_toml_string().unwrap()).unwrap();

        let result = handle_config_command(
            Some(path.to_str().unwrap()),
            ConfigAction::Get {
                key: "permissions.bob".into(),
            },
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_cmd_config_init_creates_loadable_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("searchgate").join("config.toml");

        cmd_config_init(Some(path.to_str().unwrap()), false).unwrap();
        assert!(path.exists());

        let loaded = SearchgateConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert!(loaded.permissions.is_empty());
    }

    #[test]
    fn test_cmd_config_init_no_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").unwrap();

        let err = cmd_config_init(Some(path.to_str().unwrap()), false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
    }

    #[test]
    fn test_cmd_config_init_force_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "old content").unwrap();

        cmd_config_init(Some(path.to_str().unwrap()), true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[permissions]"));
    }

    #[test]
    fn test_env_lines() {
        let lines = env_lines(&config(), false).unwrap();
        assert!(lines.contains(&"SEARCHGATE_DATA_PATH=/data/snapshot.json".to_string()));

        let docker = env_lines(&config(), true).unwrap();
        assert!(docker.iter().all(|l| l.starts_with("--env SEARCHGATE_")));
    }

    #[test]
    fn test_get_nested_value() {
        let val: toml::Value = toml::from_str("[data]\npath = \"x.json\"").unwrap();
        assert_eq!(
            get_nested_value(&val, "data.path"),
            Some(&toml::Value::String("x.json".into()))
        );
        assert!(get_nested_value(&val, "data.nonexistent").is_none());
        assert!(get_nested_value(&val, "data.path.deeper").is_none());
    }

    #[test]
    fn test_format_toml_value() {
        assert_eq!(format_toml_value(&toml::Value::String("hello".into())), "hello");
        assert_eq!(format_toml_value(&toml::Value::Integer(42)), "42");
        assert_eq!(format_toml_value(&toml::Value::Boolean(true)), "true");
    }
}
