//! Fixture synchronization for docseed.
//!
//! Applications ship seed data describing their customizations (Custom
//! Fields, Custom Scripts and any other document type) as *fixtures*: JSON or
//! CSV files under `<app>/fixtures`. This crate moves fixtures between those
//! directories and a [`DocumentStore`](docseed_store::DocumentStore):
//!
//! - **Sync**: import every app's fixtures, without duplicating Custom
//!   Fields that already exist
//! - **Custom scripts**: one `<DocType>.js` file per document type
//! - **Export**: write the document types each app declares back to disk
//!
//! # Quick Start
//!
//! A fixtures directory:
//!
//! ```text
//! apps/shop/fixtures/
//! ├── custom_field.json
//! ├── note.csv
//! └── custom_scripts/
//!     └── Sales Order.js
//! ```
//!
//! Sync it:
//!
//! ```ignore
//! use docseed_fixtures::prelude::*;
//!
//! let report = FixtureImporter::new(&store, &apps).sync(Some("shop")).await?;
//! println!("{} custom fields added", report.custom_fields_inserted());
//! ```
//!
//! # Architecture
//!
//! - [`FixtureRecord`](fixtures::FixtureRecord) - Single fixture record
//! - [`FixtureParser`](fixtures::FixtureParser) - Scan or parse fixture files
//! - [`FixtureSerializer`](fixtures::FixtureSerializer) - Write documents as fixtures
//! - [`import_doc`](transfer::import_doc) / [`export_json`](transfer::export_json) -
//!   Bulk import and export of one file
//! - [`FixtureImporter`](sync::FixtureImporter) / [`FixtureExporter`](sync::FixtureExporter) -
//!   Per-application sync and export
//! - [`SyncFixturesCommand`](commands::SyncFixturesCommand) /
//!   [`ExportFixturesCommand`](commands::ExportFixturesCommand) - Management commands

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod commands;
pub mod error;
pub mod fixtures;
pub mod prelude;
pub mod sync;
pub mod transfer;

// Re-export commonly used types at crate root
pub use error::{FixtureError, FixtureResult};
pub use fixtures::{FixtureData, FixtureFormat, FixtureParser, FixtureRecord, ScanOutcome};
pub use sync::{FixtureExporter, FixtureImporter, ImportContext, SyncReport};
