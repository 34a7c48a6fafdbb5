//! In-memory document store.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::filters::Filters;
use crate::meta::MetaRegistry;
use crate::policy::InsertPolicy;
use crate::store::{DocumentStore, Lookup, assign_name};

/// Document store kept entirely in memory.
///
/// Writes are visible immediately. [`commit`](DocumentStore::commit) records
/// the current documents as the state [`rollback`](DocumentStore::rollback)
/// returns to, and counts how often it was called. Useful for tests and dry
/// runs.
///
/// # Example
///
/// ```
/// use docseed_store::{Document, DocumentStore, Filters, InsertPolicy, MemoryStore};
///
/// # tokio_test(async {
/// let store = MemoryStore::new();
/// store
///     .insert(Document::new("Note").with_name("welcome"), &InsertPolicy::strict())
///     .await
///     .unwrap();
/// assert!(store.exists("Note", &Filters::new()).await.unwrap());
/// # });
/// # fn tokio_test<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f);
/// # }
/// ```
#[derive(Debug)]
pub struct MemoryStore {
	meta: MetaRegistry,
	docs: RwLock<Vec<Document>>,
	committed: RwLock<Vec<Document>>,
	commits: AtomicUsize,
}

impl MemoryStore {
	/// Creates a store with the core fixture document types registered.
	pub fn new() -> Self {
		Self::with_meta(MetaRegistry::core())
	}

	/// Creates a store with the given metadata.
	pub fn with_meta(meta: MetaRegistry) -> Self {
		Self {
			meta,
			docs: RwLock::new(Vec::new()),
			committed: RwLock::new(Vec::new()),
			commits: AtomicUsize::new(0),
		}
	}

	/// Returns every stored document.
	pub fn documents(&self) -> Vec<Document> {
		self.docs.read().clone()
	}

	/// Returns the number of stored documents.
	pub fn len(&self) -> usize {
		self.docs.read().len()
	}

	/// Returns true if the store holds no documents.
	pub fn is_empty(&self) -> bool {
		self.docs.read().is_empty()
	}

	/// Returns how many times `commit` was called.
	pub fn commit_count(&self) -> usize {
		self.commits.load(Ordering::SeqCst)
	}

	fn position(&self, doctype: &str, name: &str) -> Option<usize> {
		self.docs
			.read()
			.iter()
			.position(|doc| doc.doctype == doctype && doc.name.as_deref() == Some(name))
	}

	fn check_links(&self, doc: &Document, policy: &InsertPolicy) -> StoreResult<()> {
		for (field, target, value) in self.meta.required_links(doc, policy) {
			if self.position(target, value).is_none() {
				return Err(StoreError::LinkMissing {
					doctype: doc.doctype.clone(),
					field: field.to_string(),
					target: target.to_string(),
					value: value.to_string(),
				});
			}
		}
		Ok(())
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	fn meta(&self) -> &MetaRegistry {
		&self.meta
	}

	async fn exists(&self, doctype: &str, filters: &Filters) -> StoreResult<bool> {
		Ok(self
			.docs
			.read()
			.iter()
			.any(|doc| doc.doctype == doctype && filters.matches(doc)))
	}

	async fn get(&self, doctype: &str, lookup: &Lookup) -> StoreResult<Option<Document>> {
		let docs = self.docs.read();
		let found = match lookup {
			Lookup::Name(name) => docs
				.iter()
				.find(|doc| doc.doctype == doctype && doc.name.as_deref() == Some(name.as_str())),
			Lookup::Filters(filters) => docs
				.iter()
				.find(|doc| doc.doctype == doctype && filters.matches(doc)),
		};
		Ok(found.cloned())
	}

	async fn list(&self, doctype: &str, filters: &Filters) -> StoreResult<Vec<Document>> {
		Ok(self
			.docs
			.read()
			.iter()
			.filter(|doc| doc.doctype == doctype && filters.matches(doc))
			.cloned()
			.collect())
	}

	async fn insert(&self, mut doc: Document, policy: &InsertPolicy) -> StoreResult<Document> {
		self.meta.check(&doc, policy)?;
		self.check_links(&doc, policy)?;

		let name = assign_name(&self.meta, &doc);
		if self.position(&doc.doctype, &name).is_some() {
			return Err(StoreError::Duplicate {
				doctype: doc.doctype,
				name,
			});
		}
		doc.name = Some(name);

		tracing::debug!("Inserted {} {:?}", doc.doctype, doc.name);
		self.docs.write().push(doc.clone());
		Ok(doc)
	}

	async fn save(&self, doc: Document, policy: &InsertPolicy) -> StoreResult<Document> {
		let name = doc.name.clone().ok_or_else(|| {
			StoreError::Validation(format!("cannot save unnamed {}", doc.doctype))
		})?;
		self.meta.check(&doc, policy)?;
		self.check_links(&doc, policy)?;

		let index = self
			.position(&doc.doctype, &name)
			.ok_or_else(|| StoreError::NotFound {
				doctype: doc.doctype.clone(),
				lookup: name.clone(),
			})?;

		tracing::debug!("Saved {} {}", doc.doctype, name);
		self.docs.write()[index] = doc.clone();
		Ok(doc)
	}

	async fn commit(&self) -> StoreResult<()> {
		*self.committed.write() = self.docs.read().clone();
		self.commits.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	async fn rollback(&self) -> StoreResult<()> {
		let committed = self.committed.read().clone();
		tracing::debug!(
			"Rolling back {} uncommitted document(s)",
			self.len().saturating_sub(committed.len())
		);
		*self.docs.write() = committed;
		Ok(())
	}
}
