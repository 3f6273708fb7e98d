//! CLI command definitions and argument parsing.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Friendzone CLI - Track who is friends with whom, and who introduced them.
#[derive(Debug, Parser)]
#[command(name = "friendzone")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FRIENDZONE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file path (overrides the config file)
    #[arg(long, global = true, env = "FRIENDZONE_DB")]
    pub db: Option<PathBuf>,

    /// Log validation and storage details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (minimal)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage people
    Friend(FriendArgs),

    /// Record a new friendship
    Befriend(FriendshipArgs),

    /// Validate a friendship without recording it
    Check(FriendshipArgs),

    /// Change the date two friends met
    Redate(RedateArgs),

    /// Remove a friendship
    Unfriend(PairArgs),

    /// List friendships
    Friendships(FriendshipsArgs),

    /// Write a default configuration file
    Init(InitArgs),
}

/// Arguments for the friend command.
#[derive(Debug, Parser)]
pub struct FriendArgs {
    #[command(subcommand)]
    pub action: FriendAction,
}

/// Person management actions.
#[derive(Debug, Subcommand)]
pub enum FriendAction {
    /// Add a person
    Add {
        /// Display name (unique)
        name: String,
    },

    /// List everyone
    List,

    /// Rename a person
    Rename {
        /// Current name
        name: String,
        /// New name
        new_name: String,
    },

    /// Remove a person and their friendships
    Remove {
        /// Name of the person to remove
        name: String,
    },
}

/// Arguments for befriend and check.
#[derive(Debug, Parser)]
pub struct FriendshipArgs {
    /// First friend
    pub party_a: String,

    /// Second friend
    pub party_b: String,

    /// Date they met (YYYY-MM-DD)
    #[arg(short, long)]
    pub met: Option<NaiveDate>,

    /// Who introduced them
    #[arg(long)]
    pub via: Option<String>,
}

/// Arguments for the redate command.
#[derive(Debug, Parser)]
pub struct RedateArgs {
    /// First friend
    pub party_a: String,

    /// Second friend
    pub party_b: String,

    /// New date they met (YYYY-MM-DD)
    #[arg(short, long)]
    pub met: NaiveDate,
}

/// Two people, in either order.
#[derive(Debug, Parser)]
pub struct PairArgs {
    /// First friend
    pub party_a: String,

    /// Second friend
    pub party_b: String,
}

/// Arguments for the friendships command.
#[derive(Debug, Parser)]
pub struct FriendshipsArgs {
    /// Only friendships involving this person
    #[arg(short, long)]
    pub person: Option<String>,

    /// Only friendships that began in the last 30 days
    #[arg(long)]
    pub recent: bool,
}

/// Arguments for the init command.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}
