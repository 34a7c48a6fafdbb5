//! Document storage for docseed.
//!
//! This crate provides the document model that fixtures are loaded into:
//!
//! - **Documents**: schemaless records tagged with a `doctype` and a `name`
//! - **Filters**: `field op value` conditions used to look documents up
//! - **Write policies**: which checks an insert or save may skip
//! - **Backends**: an in-memory store and a SQL store built on sqlx
//!
//! # Features
//!
//! - `sql` - [`SqlStore`] over sqlx's `Any` driver (enabled by default)
//!
//! # Quick Start
//!
//! ```ignore
//! use docseed_store::prelude::*;
//!
//! let store = SqlStore::connect("sqlite://site.db?mode=rwc", MetaRegistry::core()).await?;
//! store.create_table().await?;
//!
//! let doc = Document::new(CUSTOM_FIELD)
//!     .with_field("dt", "Sales Invoice")
//!     .with_field("fieldname", "region");
//! let saved = store.insert(doc, &InsertPolicy::strict()).await?;
//! assert_eq!(saved.name.as_deref(), Some("Sales Invoice-region"));
//! store.commit().await?;
//! ```
//!
//! # Architecture
//!
//! - [`Document`] - Flat JSON record with doctype and name
//! - [`Filters`] - Conjunction of [`Condition`]s
//! - [`InsertPolicy`] - Bypass flags for validation, mandatory, link and
//!   permission checks
//! - [`MetaRegistry`] - Per-doctype naming rules and write checks
//! - [`DocumentStore`] - Async storage trait, implemented by [`MemoryStore`]
//!   and [`SqlStore`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod error;
pub mod filters;
pub mod memory;
pub mod meta;
pub mod policy;
#[cfg(feature = "sql")]
pub mod sql;
pub mod store;

pub use document::Document;
pub use error::{StoreError, StoreResult};
pub use filters::{Condition, Filters, Operator};
pub use memory::MemoryStore;
pub use meta::{CUSTOM_FIELD, CUSTOM_SCRIPT, DOCFIELD, DOCTYPE, DocTypeMeta, LinkField, MetaRegistry};
pub use policy::InsertPolicy;
#[cfg(feature = "sql")]
pub use sql::SqlStore;
pub use store::{DocumentStore, Lookup};

/// Commonly used store types.
pub mod prelude {
	pub use crate::document::Document;
	pub use crate::error::{StoreError, StoreResult};
	pub use crate::filters::{Condition, Filters, Operator};
	pub use crate::memory::MemoryStore;
	pub use crate::meta::{CUSTOM_FIELD, CUSTOM_SCRIPT, DOCFIELD, DOCTYPE, DocTypeMeta, MetaRegistry};
	pub use crate::policy::InsertPolicy;
	#[cfg(feature = "sql")]
	pub use crate::sql::SqlStore;
	pub use crate::store::{DocumentStore, Lookup};
}
