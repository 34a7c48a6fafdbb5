//! Test helpers for docseed-fixtures integration tests.
//!
//! This module provides builders for application directory trees and the
//! stores the tests run against.

#[path = "helpers/app_tree.rs"]
pub mod app_tree;
#[path = "helpers/stores.rs"]
pub mod stores;
