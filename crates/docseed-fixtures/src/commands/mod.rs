//! Management commands.
//!
//! - [`SyncFixturesCommand`] - import fixtures of installed apps
//! - [`ExportFixturesCommand`] - export declared fixtures

mod export_fixtures;
mod sync_fixtures;

pub use export_fixtures::{ExportFixturesCommand, ExportFixturesOptions};
pub use sync_fixtures::{SyncFixturesArgs, SyncFixturesCommand, SyncFixturesOptions};
