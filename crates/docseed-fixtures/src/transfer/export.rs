//! Export of documents to a fixture file.

use std::path::Path;

use docseed_store::{DocumentStore, Filters};

use crate::error::FixtureResult;
use crate::fixtures::FixtureSerializer;

/// Writes every `doctype` document matching `filters` to `path` as a JSON
/// array, sorted by name. An existing file is replaced.
///
/// Returns the number of documents written.
pub async fn export_json(
	store: &dyn DocumentStore,
	doctype: &str,
	path: &Path,
	filters: &Filters,
) -> FixtureResult<usize> {
	let mut docs = store.list(doctype, filters).await?;
	docs.sort_by(|a, b| a.name.cmp(&b.name));

	FixtureSerializer::new().write_to_file(&docs, path)?;

	tracing::info!("Exported {} {} to {}", docs.len(), doctype, path.display());
	Ok(docs.len())
}
