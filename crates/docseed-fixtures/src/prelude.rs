//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```ignore
//! use docseed_fixtures::prelude::*;
//!
//! let report = FixtureImporter::new(&store, &apps).sync(None).await?;
//! ```

// Error types
pub use crate::error::{FixtureError, FixtureResult};

// Fixture types
pub use crate::fixtures::{
	FixtureData, FixtureFormat, FixtureParser, FixtureRecord, FixtureSerializer, ScanOutcome,
};

// Import / export routines
pub use crate::transfer::{ImportOptions, ImportResult, export_json, import_doc, scrub};

// Synchronization
pub use crate::sync::{
	ExportReport, FixtureExporter, FixtureImporter, ImportContext, SyncReport,
	import_custom_scripts,
};

// Command types
pub use crate::commands::{
	ExportFixturesCommand, ExportFixturesOptions, SyncFixturesArgs, SyncFixturesCommand,
	SyncFixturesOptions,
};
