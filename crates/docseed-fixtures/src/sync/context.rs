//! Import context.

use docseed_store::InsertPolicy;

/// State describing the import a write belongs to.
///
/// Passed by reference down every call that writes documents during a
/// fixture sync, so code further down can tell a fixture load from an
/// ordinary import. It carries no bypass: writes made under it are checked
/// like any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportContext {
	/// True while fixtures are being synced.
	pub in_fixtures: bool,
}

impl ImportContext {
	/// Context for an ordinary import.
	pub fn new() -> Self {
		Self::default()
	}

	/// Context for a fixture sync.
	pub fn fixtures() -> Self {
		Self { in_fixtures: true }
	}

	/// Base write policy under this context: every check runs, fixture sync
	/// or not.
	pub fn policy(&self) -> InsertPolicy {
		InsertPolicy::strict()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case::ordinary(ImportContext::new())]
	#[case::fixtures(ImportContext::fixtures())]
	fn test_policy_is_strict(#[case] ctx: ImportContext) {
		assert_eq!(ctx.policy(), InsertPolicy::strict());
	}

	#[rstest]
	fn test_fixtures_flag() {
		assert!(ImportContext::fixtures().in_fixtures);
		assert!(!ImportContext::new().in_fixtures);
	}
}
