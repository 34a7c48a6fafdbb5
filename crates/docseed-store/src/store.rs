//! The document store abstraction.

use std::fmt;

use async_trait::async_trait;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::filters::Filters;
use crate::meta::MetaRegistry;
use crate::policy::InsertPolicy;

/// How to locate a single document.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
	/// By document name.
	Name(String),
	/// First document matching the filters.
	Filters(Filters),
}

impl fmt::Display for Lookup {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Name(name) => f.write_str(name),
			Self::Filters(filters) => write!(f, "{}", filters),
		}
	}
}

/// Persistent storage for documents.
///
/// Writes are staged until [`commit`](DocumentStore::commit) is called.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	/// Metadata used for naming and write checks.
	fn meta(&self) -> &MetaRegistry;

	/// Returns true if any document of `doctype` matches `filters`.
	async fn exists(&self, doctype: &str, filters: &Filters) -> StoreResult<bool>;

	/// Fetches a single document.
	async fn get(&self, doctype: &str, lookup: &Lookup) -> StoreResult<Option<Document>>;

	/// Lists the documents of `doctype` matching `filters`, in insertion order.
	async fn list(&self, doctype: &str, filters: &Filters) -> StoreResult<Vec<Document>>;

	/// Inserts a new document and returns it with its assigned name.
	async fn insert(&self, doc: Document, policy: &InsertPolicy) -> StoreResult<Document>;

	/// Replaces an existing document, matched by doctype and name.
	async fn save(&self, doc: Document, policy: &InsertPolicy) -> StoreResult<Document>;

	/// Commits staged writes.
	async fn commit(&self) -> StoreResult<()>;

	/// Discards every write made since the last commit.
	async fn rollback(&self) -> StoreResult<()>;

	/// Like [`get`](DocumentStore::get), but a missing document is an error.
	async fn get_doc(&self, doctype: &str, lookup: &Lookup) -> StoreResult<Document> {
		self.get(doctype, lookup)
			.await?
			.ok_or_else(|| StoreError::NotFound {
				doctype: doctype.to_string(),
				lookup: lookup.to_string(),
			})
	}
}

/// Resolves the name a document will be stored under.
pub(crate) fn assign_name(meta: &MetaRegistry, doc: &Document) -> String {
	doc.name
		.clone()
		.or_else(|| meta.autoname(doc))
		.unwrap_or_else(|| {
			format!(
				"{}-{}",
				doc.doctype.to_lowercase().replace(' ', "-"),
				uuid::Uuid::new_v4().simple()
			)
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_lookup_display() {
		assert_eq!(Lookup::Name("welcome".to_string()).to_string(), "welcome");
		let lookup = Lookup::Filters(Filters::new().with_eq("dt", "Sales Order"));
		assert_eq!(lookup.to_string(), "[dt = \"Sales Order\"]");
	}

	#[rstest]
	fn test_assign_name() {
		let meta = MetaRegistry::core();

		let named = Document::new("Note").with_name("welcome");
		assert_eq!(assign_name(&meta, &named), "welcome");

		let field = Document::new("Custom Field")
			.with_field("dt", "Sales Invoice")
			.with_field("fieldname", "region");
		assert_eq!(assign_name(&meta, &field), "Sales Invoice-region");

		let generated = assign_name(&meta, &Document::new("Blog Post"));
		assert!(generated.starts_with("blog-post-"));
		assert_eq!(generated.len(), "blog-post-".len() + 32);
	}
}
