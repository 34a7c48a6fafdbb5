//! Fixture import, export and synchronization module.

pub use docseed_fixtures::*;
