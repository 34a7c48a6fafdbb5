//! Write policies.
//!
//! Every write goes through [`DocumentStore::insert`](crate::DocumentStore::insert)
//! or [`DocumentStore::save`](crate::DocumentStore::save) together with an
//! [`InsertPolicy`] that says which checks the store must skip.

/// Checks to bypass when writing a document.
///
/// The default policy is [`InsertPolicy::strict`]: every check runs.
///
/// # Example
///
/// ```
/// use docseed_store::InsertPolicy;
///
/// let policy = InsertPolicy::strict().with_ignore_links(true);
/// assert!(policy.ignore_links);
/// assert!(!policy.ignore_mandatory);
///
/// let bypass = InsertPolicy::bypass_all();
/// assert!(bypass.ignore_validate && bypass.ignore_permissions);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertPolicy {
	/// Skip document validation.
	pub ignore_validate: bool,
	/// Skip mandatory field checks.
	pub ignore_mandatory: bool,
	/// Skip link integrity checks.
	pub ignore_links: bool,
	/// Skip permission checks.
	pub ignore_permissions: bool,
}

impl InsertPolicy {
	/// Runs every check.
	pub fn strict() -> Self {
		Self::default()
	}

	/// Skips every check.
	pub fn bypass_all() -> Self {
		Self {
			ignore_validate: true,
			ignore_mandatory: true,
			ignore_links: true,
			ignore_permissions: true,
		}
	}

	/// Sets whether validation is skipped.
	pub fn with_ignore_validate(mut self, ignore: bool) -> Self {
		self.ignore_validate = ignore;
		self
	}

	/// Sets whether mandatory field checks are skipped.
	pub fn with_ignore_mandatory(mut self, ignore: bool) -> Self {
		self.ignore_mandatory = ignore;
		self
	}

	/// Sets whether link integrity checks are skipped.
	pub fn with_ignore_links(mut self, ignore: bool) -> Self {
		self.ignore_links = ignore;
		self
	}

	/// Sets whether permission checks are skipped.
	pub fn with_ignore_permissions(mut self, ignore: bool) -> Self {
		self.ignore_permissions = ignore;
		self
	}
}
