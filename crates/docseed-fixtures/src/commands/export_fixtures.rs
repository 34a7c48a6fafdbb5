//! export-fixtures command implementation.

use docseed_apps::Apps;
use docseed_store::DocumentStore;

use crate::error::FixtureResult;
use crate::sync::{ExportReport, FixtureExporter};

/// Options for the export-fixtures command.
#[derive(Debug, Clone, Default)]
pub struct ExportFixturesOptions {
	/// Verbosity level.
	pub verbosity: u8,
}

impl ExportFixturesOptions {
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

/// The export-fixtures command, writing declared fixtures to `<app>/fixtures`.
#[derive(Debug, Default)]
pub struct ExportFixturesCommand;

impl ExportFixturesCommand {
	/// Creates a new export-fixtures command.
	pub fn new() -> Self {
		Self
	}

	/// Returns the command name.
	pub fn name(&self) -> &str {
		"export-fixtures"
	}

	/// Returns the command description.
	pub fn description(&self) -> &str {
		"Exports each app's declared fixtures as JSON"
	}

	/// Returns the command help text.
	pub fn help(&self) -> &str {
		r#"
Usage: export-fixtures [options]

Writes every document type listed in an app's `fixtures` setting to
<app>/fixtures/<doctype>.json, replacing existing files.

Options:
  -v, --verbose        Increase verbosity
"#
	}

	/// Executes the export-fixtures command.
	pub async fn execute(
		&self,
		store: &dyn DocumentStore,
		apps: &Apps,
		options: ExportFixturesOptions,
	) -> FixtureResult<ExportReport> {
		let report = FixtureExporter::new(store, apps).export_fixtures().await?;

		if options.verbosity > 0 {
			println!(
				"Exported {} object(s) to {} file(s)",
				report.documents_exported(),
				report.files.len()
			);
		}

		Ok(report)
	}
}
