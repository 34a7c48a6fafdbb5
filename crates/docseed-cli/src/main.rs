//! docseed CLI
//!
//! Command-line tool that syncs application fixtures into a document store
//! and exports them back to the application directories.
//!
//! ## Usage
//!
//! ```bash
//! docseed sync-fixtures
//! docseed sync-fixtures --app shop
//! docseed --settings site/docseed.toml export-fixtures
//! docseed -vv sync-fixtures
//! ```
//!
//! The database URL comes from the settings file, or from
//! `DOCSEED_DATABASE_URL` when set. `RUST_LOG` overrides the log level
//! chosen by `-v`.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docseed_apps::{DEFAULT_SETTINGS_FILE, Settings};
use docseed_fixtures::commands::{
	ExportFixturesCommand, ExportFixturesOptions, SyncFixturesArgs, SyncFixturesCommand,
	SyncFixturesOptions,
};
use docseed_store::SqlStore;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "docseed")]
#[command(about = "Fixture synchronization for docseed applications", long_about = None)]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Path to the settings file
	#[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_SETTINGS_FILE)]
	settings: PathBuf,

	/// Verbosity level (can be repeated)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbosity: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
	/// Import fixtures and custom scripts of installed apps
	SyncFixtures {
		/// Only sync this app
		#[arg(long, value_name = "APP")]
		app: Option<String>,
	},

	/// Write the document types each app declares to its fixtures directory
	ExportFixtures,
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbosity);

	if let Err(e) = run(cli).await {
		eprintln!("Error: {:#}", e);
		process::exit(1);
	}
}

/// Log filter used when `RUST_LOG` is unset.
fn default_directive(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	}
}

fn init_tracing(verbosity: u8) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let settings = load_settings(&cli.settings)?;
	let apps = settings.build_apps()?;
	let meta = settings.meta_registry()?;

	tracing::info!("Connecting to {}", settings.database_url());
	let store = SqlStore::connect(settings.database_url(), meta)
		.await
		.with_context(|| format!("failed to open store {}", settings.database_url()))?;
	store.create_table().await?;

	match cli.command {
		Commands::SyncFixtures { app } => {
			let options = SyncFixturesOptions::new().with_verbosity(cli.verbosity);
			let report = SyncFixturesCommand
				.execute(&store, &apps, SyncFixturesArgs { app }, options)
				.await?;
			tracing::info!(
				"Sync finished: {} custom fields, {} documents, {} scripts",
				report.custom_fields_inserted(),
				report.documents_imported(),
				report.scripts_written()
			);
		}
		Commands::ExportFixtures => {
			let options = ExportFixturesOptions::new().with_verbosity(cli.verbosity);
			let report = ExportFixturesCommand
				.execute(&store, &apps, options)
				.await?;
			tracing::info!(
				"Export finished: {} documents in {} files",
				report.documents_exported(),
				report.files.len()
			);
		}
	}

	Ok(())
}

fn load_settings(path: &Path) -> anyhow::Result<Settings> {
	let settings = Settings::from_file(path)
		.with_context(|| format!("failed to load settings from {}", path.display()))?;
	Ok(settings.with_env_overrides())
}
