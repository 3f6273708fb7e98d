//! Friendzone CLI - Command-line interface for tracking friendships.

use anyhow::Context as _;
use clap::Parser;
use friendzone_cli::{commands, CliError, Cli, Command, Config, Context, Formatter};
use friendzone_store::SqliteStore;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    config.validation.check()?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let command = match cli.command {
        Command::Init(args) => {
            let path = match cli.config {
                Some(path) => path,
                None => Config::path()?,
            };
            commands::execute_init(args, &path, &formatter)?;
            return Ok(());
        }
        command => command,
    };

    let db_path = match cli.db {
        Some(path) => path,
        None => config.database_path()?,
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let store = SqliteStore::new(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    let mut ctx = Context::new(store, config.validation.clone(), formatter);

    match commands::dispatch(command, &mut ctx) {
        Ok(()) => Ok(()),
        Err(CliError::Validation(errors)) => {
            println!("{}", ctx.formatter.format_validation_errors(&errors)?);
            anyhow::bail!("{} validation error(s)", errors.len())
        }
        Err(e) => Err(e.into()),
    }
}
