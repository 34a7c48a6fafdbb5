//! Bulk import of a fixture file.

use std::path::Path;

use docseed_store::{DocumentStore, InsertPolicy, Lookup};

use crate::error::FixtureResult;
use crate::fixtures::FixtureParser;
use crate::sync::ImportContext;

/// Options for [`import_doc`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
	/// Skip link integrity checks on insert and save.
	pub ignore_links: bool,

	/// Replace documents whose name already exists instead of skipping them.
	pub overwrite: bool,
}

impl ImportOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the ignore links flag.
	pub fn with_ignore_links(mut self, ignore: bool) -> Self {
		self.ignore_links = ignore;
		self
	}

	/// Sets the overwrite flag.
	pub fn with_overwrite(mut self, overwrite: bool) -> Self {
		self.overwrite = overwrite;
		self
	}

	/// Write policy for these options under `ctx`.
	///
	/// Only link checks can be relaxed; permissions, mandatory fields and
	/// validation always apply.
	pub fn policy(&self, ctx: &ImportContext) -> InsertPolicy {
		ctx.policy().with_ignore_links(self.ignore_links)
	}
}

/// Counts from a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportResult {
	/// Documents inserted.
	pub inserted: usize,
	/// Existing documents overwritten.
	pub updated: usize,
	/// Existing documents left untouched.
	pub skipped: usize,
}

impl ImportResult {
	/// Total number of records processed.
	pub fn total(&self) -> usize {
		self.inserted + self.updated + self.skipped
	}
}

/// Imports every record of a JSON or CSV fixture file.
///
/// A record whose name (given, or derived from the doctype's naming rule)
/// already exists is saved over the existing document when
/// `options.overwrite` is set and skipped otherwise. Every other record is
/// inserted.
///
/// # Errors
///
/// Parse errors of the file and store errors of any record abort the import;
/// records written before the failure stay written.
pub async fn import_doc(
	store: &dyn DocumentStore,
	path: &Path,
	options: ImportOptions,
	ctx: &ImportContext,
) -> FixtureResult<ImportResult> {
	let data = FixtureParser::new().parse_file(path)?;
	let policy = options.policy(ctx);
	let mut result = ImportResult::default();

	for record in data {
		let mut doc = record.into_document()?;
		if doc.name.is_none() {
			doc.name = store.meta().autoname(&doc);
		}

		let existing = match &doc.name {
			Some(name) => store.get(&doc.doctype, &Lookup::Name(name.clone())).await?,
			None => None,
		};

		match existing {
			Some(_) if options.overwrite => {
				tracing::debug!("Overwriting {} {:?}", doc.doctype, doc.name);
				store.save(doc, &policy).await?;
				result.updated += 1;
			}
			Some(_) => {
				tracing::debug!("Skipping existing {} {:?}", doc.doctype, doc.name);
				result.skipped += 1;
			}
			None => {
				store.insert(doc, &policy).await?;
				result.inserted += 1;
			}
		}
	}

	tracing::info!(
		"Imported {}: {} inserted, {} updated, {} skipped",
		path.display(),
		result.inserted,
		result.updated,
		result.skipped
	);
	Ok(result)
}
