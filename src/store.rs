//! Document store module.
//!
//! # Examples
//!
//! ```rust,ignore
//! use docseed::store::{Document, InsertPolicy, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.insert(Document::new("Note").with_name("welcome"), &InsertPolicy::strict()).await?;
//! ```

pub use docseed_store::*;
