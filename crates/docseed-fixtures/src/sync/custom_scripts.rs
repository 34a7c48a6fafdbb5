//! Custom script import from `<app>/fixtures/custom_scripts`.
//!
//! Each `<DocType>.js` file holds the client script of one document type.

use std::path::Path;

use docseed_apps::AppConfig;
use docseed_store::{CUSTOM_SCRIPT, Document, DocumentStore, Filters, Lookup};

use super::context::ImportContext;
use super::report::ScriptImportReport;
use crate::error::{FixtureError, FixtureResult, OperationContext};

const SCRIPT_EXTENSION: &str = ".js";
const DEFAULT_SCRIPT_TYPE: &str = "Client";

/// Imports the custom scripts of an application.
///
/// A script for a document type that already has one replaces its `script`
/// field; otherwise a new `Client` script is inserted. Files are processed
/// in file name order. Nothing happens if the directory does not exist.
///
/// # Errors
///
/// An unreadable script file or a failed write aborts the import.
pub async fn import_custom_scripts(
	store: &dyn DocumentStore,
	config: &AppConfig,
	ctx: &ImportContext,
) -> FixtureResult<ScriptImportReport> {
	let dir = config.custom_scripts_dir();
	let mut report = ScriptImportReport::default();
	if !dir.is_dir() {
		return Ok(report);
	}

	for (dt, path) in script_files(&dir)? {
		let script = std::fs::read_to_string(&path).map_err(|e| FixtureError::io("read", &path, e))?;
		let created = import_script(store, &dt, script, ctx)
			.await
			.operation(|| format!("import custom script {}", path.display()))?;

		tracing::info!(
			"{} custom script for {} from app {}",
			if created { "Created" } else { "Updated" },
			dt,
			config.name
		);
		if created {
			report.created.push(dt);
		} else {
			report.updated.push(dt);
		}
	}

	Ok(report)
}

/// Writes the script of `dt`; returns true if a new document was created.
async fn import_script(
	store: &dyn DocumentStore,
	dt: &str,
	script: String,
	ctx: &ImportContext,
) -> FixtureResult<bool> {
	let policy = ctx.policy();
	let filters = Filters::new().with_eq("dt", dt);

	if store.exists(CUSTOM_SCRIPT, &filters).await? {
		let mut doc = store.get_doc(CUSTOM_SCRIPT, &Lookup::Filters(filters)).await?;
		doc.set("script", script);
		store.save(doc, &policy).await?;
		return Ok(false);
	}

	let doc = Document::new(CUSTOM_SCRIPT)
		.with_field("dt", dt)
		.with_field("script_type", DEFAULT_SCRIPT_TYPE)
		.with_field("script", script);
	store.insert(doc, &policy).await?;
	Ok(true)
}

/// `(document type, path)` of every `.js` file in `dir`, sorted by file name.
fn script_files(dir: &Path) -> FixtureResult<Vec<(String, std::path::PathBuf)>> {
	let entries = std::fs::read_dir(dir).map_err(|e| FixtureError::io("list", dir, e))?;
	let mut files = Vec::new();
	for entry in entries {
		let path = entry.map_err(|e| FixtureError::io("list", dir, e))?.path();
		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		if let Some(dt) = name.strip_suffix(SCRIPT_EXTENSION)
			&& path.is_file()
		{
			files.push((dt.to_string(), path.clone()));
		}
	}
	files.sort_by(|a, b| a.1.file_name().cmp(&b.1.file_name()));
	Ok(files)
}
