//! # docseed
//!
//! Fixture synchronization between application directories and a document
//! store.
//!
//! Applications ship their customizations (Custom Fields, Custom Scripts and
//! seed documents) as fixture files. docseed imports them into a store
//! without duplicating what is already there, and exports the document types
//! each application declares back to its `fixtures` directory.
//!
//! ## Crates
//!
//! - [`store`] - Document model, write policies, memory and SQL stores
//! - [`apps`] - Installed applications, fixture hooks and settings
//! - [`fixtures`] - Fixture parsing, bulk import/export, sync and commands
//!
//! ## Feature Flags
//!
//! - `sql` (default) - SQL-backed store via `sqlx`
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use docseed::prelude::*;
//!
//! let settings = Settings::from_file("docseed.toml")?.with_env_overrides();
//! let apps = settings.build_apps()?;
//! let store = SqlStore::connect(settings.database_url(), settings.meta_registry()?).await?;
//! store.create_table().await?;
//!
//! let report = FixtureImporter::new(&store, &apps).sync(None).await?;
//! println!("{} custom fields added", report.custom_fields_inserted());
//! ```

#![warn(missing_docs)]

pub mod apps;
pub mod fixtures;
pub mod store;

/// Commonly used types from every docseed crate.
pub mod prelude {
	pub use docseed_apps::{AppConfig, Apps, FixtureHook, HookRegistry, Settings};
	pub use docseed_fixtures::prelude::*;
	pub use docseed_store::prelude::*;
}
