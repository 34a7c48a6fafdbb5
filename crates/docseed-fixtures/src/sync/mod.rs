//! Fixture synchronization between application directories and a store.
//!
//! - [`FixtureImporter`] - `<app>/fixtures` into the store
//! - [`import_custom_scripts`] - `<app>/fixtures/custom_scripts/*.js`
//! - [`FixtureExporter`] - declared fixtures out to `<app>/fixtures`

mod context;
mod custom_scripts;
mod exporter;
mod importer;
mod report;

pub use context::ImportContext;
pub use custom_scripts::import_custom_scripts;
pub use exporter::FixtureExporter;
pub use importer::FixtureImporter;
pub use report::{
	AppSyncReport, ExportReport, ExportedFile, FileOutcome, FileSyncReport, ScriptImportReport,
	SyncReport,
};
