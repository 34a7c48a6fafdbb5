//! Fixture import from application directories.

use std::path::Path;

use docseed_apps::{AppConfig, Apps};
use docseed_store::{CUSTOM_FIELD, DOCFIELD, DOCTYPE, DocumentStore, Filters, InsertPolicy};

use super::context::ImportContext;
use super::custom_scripts::import_custom_scripts;
use super::report::{AppSyncReport, FileOutcome, FileSyncReport, SyncReport};
use crate::error::{FixtureError, FixtureResult, OperationContext};
use crate::fixtures::{FixtureFormat, FixtureParser, FixtureRecord, ScanOutcome};
use crate::transfer::{ImportOptions, import_doc};

/// Imports fixtures from `<app>/fixtures` into a document store.
///
/// For each fixture file, Custom Field records are inserted first, one by
/// one, unless an equivalent field already exists. If any Custom Field of a
/// file already existed, the rest of that file is left alone; otherwise the
/// whole file is bulk imported, overwriting documents with the same name.
/// Custom scripts from `<app>/fixtures/custom_scripts` come last.
///
/// # Example
///
/// ```ignore
/// let importer = FixtureImporter::new(&store, &apps);
/// let report = importer.sync(None).await?;
/// println!("{} custom fields inserted", report.custom_fields_inserted());
/// ```
pub struct FixtureImporter<'a> {
	store: &'a dyn DocumentStore,
	apps: &'a Apps,
	parser: FixtureParser,
	options: ImportOptions,
}

impl<'a> FixtureImporter<'a> {
	/// Creates an importer over `store` for the applications in `apps`.
	pub fn new(store: &'a dyn DocumentStore, apps: &'a Apps) -> Self {
		Self {
			store,
			apps,
			parser: FixtureParser::new(),
			options: ImportOptions::new()
				.with_ignore_links(true)
				.with_overwrite(true),
		}
	}

	/// Syncs fixtures of `app`, or of every installed application in
	/// installation order, then commits once.
	///
	/// # Errors
	///
	/// An unknown `app`, a failed bulk import, a store failure or an
	/// unreadable custom script aborts the sync. Writes it already made are
	/// rolled back, so a later commit on the same store does not publish them.
	pub async fn sync(&self, app: Option<&str>) -> FixtureResult<SyncReport> {
		let configs: Vec<&AppConfig> = match app {
			Some(name) => vec![self.apps.get(name)?],
			None => self.apps.configs().iter().collect(),
		};

		let ctx = ImportContext::fixtures();
		let mut report = SyncReport::default();
		for config in configs {
			match self.sync_app(config, &ctx).await {
				Ok(app_report) => report.apps.push(app_report),
				Err(e) => {
					if let Err(rollback) = self.store.rollback().await {
						tracing::warn!("Could not roll back failed sync: {}", rollback);
					}
					return Err(e);
				}
			}
		}

		self.store.commit().await?;
		Ok(report)
	}

	/// Syncs a single application without committing.
	pub async fn sync_app(
		&self,
		config: &AppConfig,
		ctx: &ImportContext,
	) -> FixtureResult<AppSyncReport> {
		let fixtures_dir = config.fixtures_dir();
		if !fixtures_dir.is_dir() {
			tracing::debug!("App {} has no fixtures directory", config.name);
			return Ok(AppSyncReport::without_fixtures(&config.name));
		}

		tracing::info!("Syncing fixtures for app {}", config.name);
		let mut files = Vec::new();
		for path in fixture_files(&fixtures_dir)? {
			let file = self
				.sync_file(&path, ctx)
				.await
				.operation(|| format!("sync fixture {} of app {}", path.display(), config.name))?;
			files.push(file);
		}

		let scripts = import_custom_scripts(self.store, config, ctx).await?;

		Ok(AppSyncReport {
			app: config.name.clone(),
			has_fixtures: true,
			files,
			scripts,
		})
	}

	async fn sync_file(&self, path: &Path, ctx: &ImportContext) -> FixtureResult<FileSyncReport> {
		let file = file_name(path);
		let scan = self.parser.scan(path);
		if let ScanOutcome::ParseError(message) = &scan {
			if FixtureFormat::from_path(path) == Some(FixtureFormat::Json) {
				tracing::warn!("Could not scan {}: {}", path.display(), message);
			} else {
				tracing::debug!("{} is not a JSON array: {}", path.display(), message);
			}
		}

		let mut inserted = 0;
		let mut existing = 0;
		for record in scan.records() {
			if record.doctype() != Some(CUSTOM_FIELD) {
				continue;
			}
			if self.custom_field_exists(record).await? {
				tracing::debug!(
					"Custom Field {:?} on {:?} already exists",
					record.get_str("fieldname"),
					record.get_str("dt")
				);
				existing += 1;
				continue;
			}
			let doc = record.clone().into_document()?;
			self.store.insert(doc, &InsertPolicy::bypass_all()).await?;
			inserted += 1;
		}

		let outcome = if existing > 0 {
			tracing::info!("Skipping {}: custom fields already present", file);
			FileOutcome::SkippedExisting
		} else if FixtureFormat::from_path(path).is_some() {
			FileOutcome::Imported(import_doc(self.store, path, self.options, ctx).await?)
		} else {
			FileOutcome::Unsupported
		};

		Ok(FileSyncReport {
			file,
			scan_error: match scan {
				ScanOutcome::ParseError(message) => Some(message),
				_ => None,
			},
			custom_fields_inserted: inserted,
			custom_fields_existing: existing,
			outcome,
		})
	}

	/// Returns true if the field a Custom Field record describes already
	/// exists, either as a Custom Field or as a standard field of the
	/// document type.
	pub async fn custom_field_exists(&self, record: &FixtureRecord) -> FixtureResult<bool> {
		let fieldname = record.value("fieldname");
		let dt = record.value("dt");

		let custom = Filters::new()
			.with_eq("fieldname", fieldname.clone())
			.with_eq("dt", dt.clone());
		if self.store.exists(CUSTOM_FIELD, &custom).await? {
			return Ok(true);
		}

		let standard = Filters::new()
			.with_eq("fieldname", fieldname)
			.with_eq("parent", dt)
			.with_eq("parenttype", DOCTYPE)
			.with_eq("parentfield", "fields");
		Ok(self.store.exists(DOCFIELD, &standard).await?)
	}
}

/// Regular files in `dir`, sorted by file name.
fn fixture_files(dir: &Path) -> FixtureResult<Vec<std::path::PathBuf>> {
	let entries = std::fs::read_dir(dir).map_err(|e| FixtureError::io("list", dir, e))?;
	let mut files = Vec::new();
	for entry in entries {
		let path = entry.map_err(|e| FixtureError::io("list", dir, e))?.path();
		if path.is_file() {
			files.push(path);
		}
	}
	files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
	Ok(files)
}

fn file_name(path: &Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default()
}
