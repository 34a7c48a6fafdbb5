//! Query filters.
//!
//! Filters are a conjunction of conditions evaluated against documents. They
//! are usually built from the opaque JSON value found in fixture hook
//! declarations, which accepts two shapes:
//!
//! - an object: `{"public": 1}` (equality) or `{"idx": [">", 3]}`
//! - a list of conditions: `[["public", "=", 1]]` or
//!   `[["Note", "public", "=", 1]]` (the leading doctype is ignored)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use regex::RegexBuilder;
use serde_json::Value;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
	/// `=`
	Eq,
	/// `!=`
	NotEq,
	/// `>`
	Gt,
	/// `<`
	Lt,
	/// `>=`
	Gte,
	/// `<=`
	Lte,
	/// `in`
	In,
	/// `not in`
	NotIn,
	/// `like`, with `%` and `_` wildcards
	Like,
	/// `not like`
	NotLike,
}

impl FromStr for Operator {
	type Err = StoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"=" | "==" => Ok(Self::Eq),
			"!=" | "<>" => Ok(Self::NotEq),
			">" => Ok(Self::Gt),
			"<" => Ok(Self::Lt),
			">=" => Ok(Self::Gte),
			"<=" => Ok(Self::Lte),
			"in" => Ok(Self::In),
			"not in" => Ok(Self::NotIn),
			"like" => Ok(Self::Like),
			"not like" => Ok(Self::NotLike),
			other => Err(StoreError::InvalidFilter(format!(
				"unknown operator '{}'",
				other
			))),
		}
	}
}

impl fmt::Display for Operator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let op = match self {
			Self::Eq => "=",
			Self::NotEq => "!=",
			Self::Gt => ">",
			Self::Lt => "<",
			Self::Gte => ">=",
			Self::Lte => "<=",
			Self::In => "in",
			Self::NotIn => "not in",
			Self::Like => "like",
			Self::NotLike => "not like",
		};
		f.write_str(op)
	}
}

/// A single `field op value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
	/// Field the condition applies to.
	pub field: String,
	/// Comparison operator.
	pub op: Operator,
	/// Right-hand value.
	pub value: Value,
}

impl Condition {
	/// Creates a condition.
	pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
		Self {
			field: field.into(),
			op,
			value: value.into(),
		}
	}

	/// Evaluates the condition against a document.
	pub fn matches(&self, doc: &Document) -> bool {
		let actual = doc.field_value(&self.field);
		match self.op {
			Operator::Eq => loose_eq(&actual, &self.value),
			Operator::NotEq => !loose_eq(&actual, &self.value),
			Operator::Gt => compare(&actual, &self.value) == Some(Ordering::Greater),
			Operator::Lt => compare(&actual, &self.value) == Some(Ordering::Less),
			Operator::Gte => matches!(
				compare(&actual, &self.value),
				Some(Ordering::Greater | Ordering::Equal)
			),
			Operator::Lte => matches!(
				compare(&actual, &self.value),
				Some(Ordering::Less | Ordering::Equal)
			),
			Operator::In => in_list(&actual, &self.value),
			Operator::NotIn => !in_list(&actual, &self.value),
			Operator::Like => like(&actual, &self.value),
			Operator::NotLike => !like(&actual, &self.value),
		}
	}
}

/// Conjunction of conditions. An empty filter matches every document.
///
/// # Example
///
/// ```
/// use docseed_store::{Document, Filters};
/// use serde_json::json;
///
/// let filters = Filters::from_value(&json!({"public": 1})).unwrap();
/// let public = Document::new("Note").with_field("public", 1);
/// let private = Document::new("Note").with_field("public", 0);
///
/// assert!(filters.matches(&public));
/// assert!(!filters.matches(&private));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
	conditions: Vec<Condition>,
}

impl Filters {
	/// Creates an empty filter.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an equality condition, builder style.
	pub fn with_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.conditions
			.push(Condition::new(field, Operator::Eq, value));
		self
	}

	/// Adds an arbitrary condition, builder style.
	pub fn with(mut self, condition: Condition) -> Self {
		self.conditions.push(condition);
		self
	}

	/// Parses filters from their JSON declaration form.
	///
	/// `null` yields an empty filter.
	pub fn from_value(value: &Value) -> StoreResult<Self> {
		match value {
			Value::Null => Ok(Self::new()),
			Value::Object(map) => {
				let mut filters = Self::new();
				for (field, spec) in map {
					filters.conditions.push(object_condition(field, spec)?);
				}
				Ok(filters)
			}
			Value::Array(items) => {
				let mut filters = Self::new();
				for item in items {
					filters.conditions.push(list_condition(item)?);
				}
				Ok(filters)
			}
			other => Err(StoreError::InvalidFilter(format!(
				"expected an object or a list, got {}",
				other
			))),
		}
	}

	/// Returns true if the document satisfies every condition.
	pub fn matches(&self, doc: &Document) -> bool {
		self.conditions.iter().all(|c| c.matches(doc))
	}

	/// Returns the conditions.
	pub fn conditions(&self) -> &[Condition] {
		&self.conditions
	}

	/// Returns true if there are no conditions.
	pub fn is_empty(&self) -> bool {
		self.conditions.is_empty()
	}
}

impl fmt::Display for Filters {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let parts: Vec<String> = self
			.conditions
			.iter()
			.map(|c| format!("{} {} {}", c.field, c.op, c.value))
			.collect();
		write!(f, "[{}]", parts.join(", "))
	}
}

fn object_condition(field: &str, spec: &Value) -> StoreResult<Condition> {
	if let Value::Array(pair) = spec
		&& pair.len() == 2
		&& let Some(op) = pair[0].as_str()
		&& let Ok(op) = op.parse::<Operator>()
	{
		return Ok(Condition::new(field, op, pair[1].clone()));
	}
	Ok(Condition::new(field, Operator::Eq, spec.clone()))
}

fn list_condition(item: &Value) -> StoreResult<Condition> {
	let parts = item
		.as_array()
		.ok_or_else(|| StoreError::InvalidFilter(format!("expected a list, got {}", item)))?;

	let (field, op, value) = match parts.as_slice() {
		[field, op, value] => (field, op, value),
		[_doctype, field, op, value] => (field, op, value),
		_ => {
			return Err(StoreError::InvalidFilter(format!(
				"expected 3 or 4 elements, got {}",
				parts.len()
			)));
		}
	};

	let field = field
		.as_str()
		.ok_or_else(|| StoreError::InvalidFilter(format!("field must be a string: {}", field)))?;
	let op = op
		.as_str()
		.ok_or_else(|| StoreError::InvalidFilter(format!("operator must be a string: {}", op)))?
		.parse::<Operator>()?;

	Ok(Condition::new(field, op, value.clone()))
}

fn as_number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(n) => n.as_f64(),
		Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	}
}

/// Equality with the coercions a relational store applies: `1 == true`,
/// `"5" == 5`, and `null == ""`.
fn loose_eq(left: &Value, right: &Value) -> bool {
	match (left, right) {
		(Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
		(Value::String(a), Value::String(b)) => a == b,
		(Value::Number(_) | Value::Bool(_), _) | (_, Value::Number(_) | Value::Bool(_)) => {
			match (as_number(left), as_number(right)) {
				(Some(a), Some(b)) => a == b,
				_ => left == right,
			}
		}
		_ => left == right,
	}
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
	if let (Some(a), Some(b)) = (as_number(left), as_number(right)) {
		return a.partial_cmp(&b);
	}
	match (left, right) {
		(Value::String(a), Value::String(b)) => Some(a.cmp(b)),
		_ => None,
	}
}

fn in_list(actual: &Value, candidates: &Value) -> bool {
	match candidates {
		Value::Array(items) => items.iter().any(|item| loose_eq(actual, item)),
		Value::String(s) => s.split(',').any(|item| loose_eq(actual, &Value::from(item.trim()))),
		other => loose_eq(actual, other),
	}
}

fn like(actual: &Value, pattern: &Value) -> bool {
	let (Some(pattern), Some(text)) = (pattern.as_str(), value_text(actual)) else {
		return false;
	};
	let translated = regex::escape(pattern).replace('%', ".*").replace('_', ".");
	RegexBuilder::new(&format!("^{}$", translated))
		.case_insensitive(true)
		.dot_matches_new_line(true)
		.build()
		.map(|re| re.is_match(&text))
		.unwrap_or(false)
}

fn value_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}
