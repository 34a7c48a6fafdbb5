//! Summaries of sync and export runs.

use std::path::PathBuf;

use crate::transfer::ImportResult;

/// What happened to a fixture file after its Custom Field records were handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
	/// The file was bulk imported.
	Imported(ImportResult),
	/// A Custom Field in the file already existed, so the bulk import was skipped.
	SkippedExisting,
	/// The file is neither `.json` nor `.csv`.
	Unsupported,
}

/// Sync summary for one fixture file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSyncReport {
	/// File name inside the fixtures directory.
	pub file: String,
	/// Scan failure message, if the file could not be read as a JSON array.
	pub scan_error: Option<String>,
	/// Custom Field records inserted from the scan.
	pub custom_fields_inserted: usize,
	/// Custom Field records that already existed.
	pub custom_fields_existing: usize,
	/// Bulk import outcome.
	pub outcome: FileOutcome,
}

/// Custom scripts written for one application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptImportReport {
	/// Document types whose script was created.
	pub created: Vec<String>,
	/// Document types whose existing script was replaced.
	pub updated: Vec<String>,
}

impl ScriptImportReport {
	/// Number of scripts written.
	pub fn total(&self) -> usize {
		self.created.len() + self.updated.len()
	}
}

/// Sync summary for one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSyncReport {
	/// Application name.
	pub app: String,
	/// False when the application has no fixtures directory.
	pub has_fixtures: bool,
	/// Per-file results, in processing order.
	pub files: Vec<FileSyncReport>,
	/// Custom script results.
	pub scripts: ScriptImportReport,
}

impl AppSyncReport {
	pub(crate) fn without_fixtures(app: &str) -> Self {
		Self {
			app: app.to_string(),
			has_fixtures: false,
			files: Vec::new(),
			scripts: ScriptImportReport::default(),
		}
	}
}

/// Result of [`FixtureImporter::sync`](crate::sync::FixtureImporter::sync).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
	/// Per-application results, in processing order.
	pub apps: Vec<AppSyncReport>,
}

impl SyncReport {
	fn files(&self) -> impl Iterator<Item = &FileSyncReport> {
		self.apps.iter().flat_map(|app| app.files.iter())
	}

	/// Custom Field records inserted across all files.
	pub fn custom_fields_inserted(&self) -> usize {
		self.files().map(|f| f.custom_fields_inserted).sum()
	}

	/// Documents inserted or updated by bulk imports.
	pub fn documents_imported(&self) -> usize {
		self.files()
			.filter_map(|f| match &f.outcome {
				FileOutcome::Imported(result) => Some(result.inserted + result.updated),
				_ => None,
			})
			.sum()
	}

	/// Files whose bulk import was skipped because of an existing Custom Field.
	pub fn files_skipped(&self) -> usize {
		self.files()
			.filter(|f| f.outcome == FileOutcome::SkippedExisting)
			.count()
	}

	/// Files that failed the scan.
	pub fn scan_errors(&self) -> usize {
		self.files().filter(|f| f.scan_error.is_some()).count()
	}

	/// Custom scripts written across all applications.
	pub fn scripts_written(&self) -> usize {
		self.apps.iter().map(|app| app.scripts.total()).sum()
	}
}

/// A fixture file written by the exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
	/// Application the fixture belongs to.
	pub app: String,
	/// Exported document type.
	pub doctype: String,
	/// File written.
	pub path: PathBuf,
	/// Number of documents written.
	pub count: usize,
}

/// Result of [`FixtureExporter::export_fixtures`](crate::sync::FixtureExporter::export_fixtures).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
	/// Files written, in export order.
	pub files: Vec<ExportedFile>,
}

impl ExportReport {
	/// Number of documents written across all files.
	pub fn documents_exported(&self) -> usize {
		self.files.iter().map(|f| f.count).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn file(outcome: FileOutcome, inserted: usize) -> FileSyncReport {
		FileSyncReport {
			file: "custom_field.json".to_string(),
			scan_error: None,
			custom_fields_inserted: inserted,
			custom_fields_existing: 0,
			outcome,
		}
	}

	#[rstest]
	fn test_totals() {
		let report = SyncReport {
			apps: vec![AppSyncReport {
				app: "frappe".to_string(),
				has_fixtures: true,
				files: vec![
					file(
						FileOutcome::Imported(ImportResult {
							inserted: 2,
							updated: 1,
							skipped: 4,
						}),
						1,
					),
					file(FileOutcome::SkippedExisting, 0),
					file(FileOutcome::Unsupported, 0),
				],
				scripts: ScriptImportReport {
					created: vec!["Sales Order".to_string()],
					updated: vec![],
				},
			}],
		};

		assert_eq!(report.custom_fields_inserted(), 1);
		assert_eq!(report.documents_imported(), 3);
		assert_eq!(report.files_skipped(), 1);
		assert_eq!(report.scan_errors(), 0);
		assert_eq!(report.scripts_written(), 1);
	}
}
