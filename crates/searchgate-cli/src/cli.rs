//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "searchgate", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "SEARCHGATE_CONFIG")]
    pub config: Option<String>,

    /// Path to the JSON snapshot (overrides `data.path`).
    #[arg(short, long)]
    pub data: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch one search on behalf of a user.
    Get {
        /// Search identifier.
        id: String,

        /// Name of the requesting user.
        #[arg(short, long)]
        user: String,
    },

    /// List every search a user may read.
    List {
        /// Name of the requesting user.
        #[arg(short, long)]
        user: String,
    },

    /// Export searches a user may read as portable entities.
    Export {
        /// Search identifier (all readable searches when omitted).
        id: Option<String>,

        /// Name of the requesting user.
        #[arg(short, long)]
        user: String,
    },

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "data.path").
        key: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
