//! sync-fixtures command implementation.
//!
//! This command imports every installed application's fixtures into the
//! document store.

use docseed_apps::Apps;
use docseed_store::DocumentStore;

use crate::error::FixtureResult;
use crate::sync::{FileOutcome, FixtureImporter, SyncReport};

/// Arguments for the sync-fixtures command.
#[derive(Debug, Clone, Default)]
pub struct SyncFixturesArgs {
	/// Only sync this application.
	pub app: Option<String>,
}

/// Options for the sync-fixtures command.
#[derive(Debug, Clone, Default)]
pub struct SyncFixturesOptions {
	/// Verbosity level.
	pub verbosity: u8,
}

impl SyncFixturesOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets verbosity level.
	pub fn with_verbosity(mut self, level: u8) -> Self {
		self.verbosity = level;
		self
	}
}

/// The sync-fixtures command.
///
/// # Example
///
/// ```ignore
/// let command = SyncFixturesCommand::new();
/// let args = SyncFixturesArgs { app: Some("frappe".to_string()) };
/// let options = SyncFixturesOptions::new().with_verbosity(1);
/// let report = command.execute(&store, &apps, args, options).await?;
/// ```
#[derive(Debug, Default)]
pub struct SyncFixturesCommand;

impl SyncFixturesCommand {
	/// Creates a new sync-fixtures command.
	pub fn new() -> Self {
		Self
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"sync-fixtures"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Imports fixtures from each app's fixtures directory"
	}

	/// Returns the command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: sync-fixtures [options]

Imports fixtures from <app>/fixtures and custom scripts from
<app>/fixtures/custom_scripts into the database, for every installed app.

Options:
  --app APP            Only sync fixtures of the specified app
  -v, --verbose        Increase verbosity (repeat for more detail)
"#
	}

	/// Executes the sync-fixtures command.
	pub async fn execute(
		&self,
		store: &dyn DocumentStore,
		apps: &Apps,
		args: SyncFixturesArgs,
		options: SyncFixturesOptions,
	) -> FixtureResult<SyncReport> {
		let report = FixtureImporter::new(store, apps)
			.sync(args.app.as_deref())
			.await?;

		if options.verbosity > 0 {
			self.print_result(&report, options.verbosity);
		}

		Ok(report)
	}

	/// Prints the sync summary.
	fn print_result(&self, report: &SyncReport, verbosity: u8) {
		for app in &report.apps {
			if !app.has_fixtures {
				if verbosity > 1 {
					println!("{}: no fixtures", app.app);
				}
				continue;
			}
			println!("{}:", app.app);
			for file in &app.files {
				match &file.outcome {
					FileOutcome::Imported(result) => println!(
						"  {}: {} inserted, {} updated, {} skipped",
						file.file, result.inserted, result.updated, result.skipped
					),
					FileOutcome::SkippedExisting => {
						println!("  {}: skipped, custom fields already present", file.file)
					}
					FileOutcome::Unsupported if verbosity > 1 => {
						println!("  {}: not a fixture file", file.file)
					}
					FileOutcome::Unsupported => {}
				}
				if file.custom_fields_inserted > 0 {
					println!("    {} custom field(s) added", file.custom_fields_inserted);
				}
			}
			if app.scripts.total() > 0 {
				println!(
					"  custom scripts: {} created, {} updated",
					app.scripts.created.len(),
					app.scripts.updated.len()
				);
			}
		}

		if report.scan_errors() > 0 {
			eprintln!("{} file(s) could not be scanned as JSON", report.scan_errors());
		}
	}
}
