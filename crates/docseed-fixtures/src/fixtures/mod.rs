//! Fixture file formats, parsing and serialization.

mod format;
mod parser;
mod serializer;

pub use format::{FixtureData, FixtureFormat, FixtureRecord};
pub use parser::{FixtureParser, ScanOutcome};
pub use serializer::FixtureSerializer;
