//! Document stores for integration tests.

use std::path::Path;

use docseed_store::{DocumentStore, MemoryStore, MetaRegistry, SqlStore};

/// Store backends the sync tests run against.
#[derive(Debug, Clone, Copy)]
pub enum Backend {
	Memory,
	Sqlite,
}

/// Open a fresh store; the SQLite database lives in `dir`.
pub async fn open_store(backend: Backend, dir: &Path) -> Box<dyn DocumentStore> {
	match backend {
		Backend::Memory => Box::new(MemoryStore::new()),
		Backend::Sqlite => {
			let url = format!("sqlite://{}?mode=rwc", dir.join("site.db").display());
			let store = SqlStore::connect(&url, MetaRegistry::core())
				.await
				.expect("connect sqlite");
			store.create_table().await.expect("create documents table");
			Box::new(store)
		}
	}
}
