//! Searchgate CLI application.
//!
//! Acts as the caller of [`SearchDomain`]: it builds the per-user view read
//! check from configured grants and passes it with every request.

use crate::cli::{CliArgs, Command};
use crate::config::SearchgateConfig;
use crate::config_handlers;
use searchgate_acl::{Entity, SearchDomain, SearchExporter, Snapshot};
use searchgate_core::{Error, Result, Search, User, View};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit code for a missing (or unexportable) search.
pub const EXIT_NOT_FOUND: i32 = 2;

/// Exit code for a search the user may not read.
pub const EXIT_PERMISSION_DENIED: i32 = 3;

/// Map an error to a process exit code.
///
/// Not found and permission denied get their own codes so scripts can react
/// differently to each.
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::NotFound(_) => EXIT_NOT_FOUND,
        Error::PermissionDenied { .. } => EXIT_PERMISSION_DENIED,
        _ => 1,
    }
}

// ============================================================================
// SearchgateCli
// ============================================================================

/// The CLI application.
pub struct SearchgateCli {
    name: String,
    config: Arc<SearchgateConfig>,
    version: String,
}

impl SearchgateCli {
    /// Create from CLI args, loading config from file/env.
    ///
    /// `--data` takes precedence over `data.path`.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let mut config = SearchgateConfig::load(args.config.as_deref())?;
        if let Some(data) = &args.data {
            config.data.path = Some(data.clone());
        }
        Ok(Self::new(name, config))
    }

    /// Create a new CLI application.
    pub fn new(name: impl Into<String>, config: SearchgateConfig) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &SearchgateConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Get { id, user }) => {
                let search = self.get_search(&id, &user).await?;
                print_json(&search)
            }
            Some(Command::List { user }) => {
                let searches = self.list_searches(&user).await?;
                print_json(&searches)
            }
            Some(Command::Export { id, user }) => {
                let entities = self.export(id.as_deref(), &user).await?;
                print_json(&entities)
            }
            Some(Command::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(Command::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            None => {
                println!("{} {}: use --help for usage", self.name, self.version);
                Ok(())
            }
        }
    }

    /// Fetch one search for `user`.
    ///
    /// A missing search is reported as [`Error::NotFound`].
    pub async fn get_search(&self, id: &str, user: &str) -> Result<Search> {
        tracing::debug!(id, user, "get search");
        let can_read = self.view_read_check(user)?;
        self.domain()?
            .get_for_user(id, &User::new(user), &can_read)
            .await?
            .ok_or_else(|| Error::not_found(format!("search {id}")))
    }

    /// List every search `user` may read.
    pub async fn list_searches(&self, user: &str) -> Result<Vec<Search>> {
        tracing::debug!(user, "list searches");
        let can_read = self.view_read_check(user)?;
        self.domain()?
            .get_all_for_user(&User::new(user), &can_read)
            .await
    }

    /// Export one search, or every readable search when `id` is `None`.
    ///
    /// A search that is missing or unreadable is reported as
    /// [`Error::NotFound`]; the two cases are not distinguished.
    pub async fn export(&self, id: Option<&str>, user: &str) -> Result<Vec<Entity>> {
        tracing::debug!(id, user, "export searches");
        let can_read = self.view_read_check(user)?;
        let exporter = SearchExporter::new(self.domain()?);
        let user = User::new(user);

        match id {
            Some(id) => exporter
                .export_for_user(id, &user, &can_read)
                .await?
                .map(|entity| vec![entity])
                .ok_or_else(|| {
                    Error::not_found(format!("search {id} is unavailable for export"))
                }),
            None => exporter.export_all_for_user(&user, &can_read).await,
        }
    }

    /// Build the domain over the configured snapshot.
    fn domain(&self) -> Result<SearchDomain> {
        Ok(Snapshot::load(self.config.snapshot_path()?)?.into_domain())
    }

    /// The view read check for `user`, from their configured grants.
    fn view_read_check(&self, user: &str) -> Result<impl Fn(&View) -> bool + Sync> {
        let permissions = self.config.permissions_for(user)?;
        Ok(move |view: &View| permissions.can_read_view(view))
    }
}

/// Pretty-print a value as JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    const SNAPSHOT: &str = r#"{
        "searches": [
            {"id": "s1", "owner": "alice"},
            {"id": "s2"},
            {"id": "s3"},
            {"id": "s4"}
        ],
        "views": [
            {"id": "v2", "title": "Errors", "search_id": "s2"},
            {"id": "d3", "title": "Overview", "type": "dashboard", "search_id": "s3"}
        ]
    }"#;

    struct Fixture {
        _dir: tempfile::TempDir,
        snapshot: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::TempDir::new().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(&snapshot, SNAPSHOT).unwrap();
        Fixture {
            _dir: dir,
            snapshot,
        }
    }

    fn cli(fixture: &Fixture) -> SearchgateCli {
        let mut config = SearchgateConfig::default();
        config.data.path = Some(fixture.snapshot.to_string_lossy().into_owned());
        config
            .permissions
            .insert("bob".into(), vec!["view:read:v2".into()]);
        config
            .permissions
            .insert("carol".into(), vec!["dashboards:read:*".into()]);
        SearchgateCli::new("searchgate", config)
    }

    fn ids(searches: &[Search]) -> Vec<&str> {
        searches.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&Error::not_found("s1")), EXIT_NOT_FOUND);
        assert_eq!(
            exit_code(&Error::permission_denied("bob", "s1")),
            EXIT_PERMISSION_DENIED
        );
        assert_eq!(exit_code(&Error::storage("down")), 1);
    }

    #[test]
    fn test_with_version() {
        let cli =
            SearchgateCli::new("searchgate", SearchgateConfig::default()).with_version("1.2.3");
        assert_eq!(cli.version, "1.2.3");
    }

    #[tokio::test]
    async fn test_get_owner() {
        let fixture = fixture();
        let search = cli(&fixture).get_search("s1", "alice").await.unwrap();
        assert_eq!(search.id, "s1");
    }

    #[tokio::test]
    async fn test_get_through_view_grant() {
        let fixture = fixture();
        assert!(cli(&fixture).get_search("s2", "bob").await.is_ok());
        assert!(cli(&fixture).get_search("s3", "carol").await.is_ok());
    }

    #[tokio::test]
    async fn test_get_denied_vs_missing() {
        let fixture = fixture();
        let cli = cli(&fixture);

        let denied = cli.get_search("s4", "bob").await.unwrap_err();
        assert_eq!(exit_code(&denied), EXIT_PERMISSION_DENIED);

        let missing = cli.get_search("missing-id", "bob").await.unwrap_err();
        assert_eq!(exit_code(&missing), EXIT_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_per_user() {
        let fixture = fixture();
        let cli = cli(&fixture);

        assert_eq!(ids(&cli.list_searches("alice").await.unwrap()), vec!["s1"]);
        assert_eq!(ids(&cli.list_searches("bob").await.unwrap()), vec!["s2"]);
        assert_eq!(ids(&cli.list_searches("carol").await.unwrap()), vec!["s3"]);
        assert!(cli.list_searches("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_single_and_all() {
        let fixture = fixture();
        let cli = cli(&fixture);

        let one = cli.export(Some("s2"), "bob").await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "s2");

        let all = cli.export(None, "alice").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "s1");
    }

    #[tokio::test]
    async fn test_export_denied_is_not_found() {
        let fixture = fixture();
        let err = cli(&fixture).export(Some("s4"), "bob").await.unwrap_err();
        assert_eq!(exit_code(&err), EXIT_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_snapshot_config() {
        let cli = SearchgateCli::new("searchgate", SearchgateConfig::default());
        let err = cli.list_searches("alice").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_run_commands() {
        let fixture = fixture();
        let cli = cli(&fixture);

        for argv in [
            vec!["test", "get", "s1", "--user", "alice"],
            vec!["test", "list", "--user", "bob"],
            vec!["test", "export", "--user", "carol"],
            vec!["test", "version"],
            vec!["test"],
        ] {
            let result = cli.run(CliArgs::parse_from(argv.clone())).await;
            assert!(result.is_ok(), "{argv:?} failed: {result:?}");
        }
    }

    #[tokio::test]
    async fn test_run_get_denied() {
        let fixture = fixture();
        let args = CliArgs::parse_from(["test", "get", "s4", "--user", "bob"]);
        let err = cli(&fixture).run(args).await.unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_from_args_data_flag_overrides_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[data]\npath = \"/from/file.json\"\n").unwrap();

        let args = CliArgs::parse_from([
            "test",
            "--config",
            path.to_str().unwrap(),
            "--data",
            "/from/flag.json",
        ]);
        let cli = SearchgateCli::from_args("searchgate", &args).unwrap();
        assert_eq!(cli.config().data.path.as_deref(), Some("/from/flag.json"));
    }

    #[test]
    fn test_init_logging_does_not_panic() {
        let cli = SearchgateCli::new("test", SearchgateConfig::default());
        cli.init_logging(false, false);
        cli.init_logging(true, false);
        cli.init_logging(false, true);
    }
}
