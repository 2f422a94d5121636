//! Document locations used in error messages (`$.songs[1].title`)

use std::fmt;

/// Location of a value inside a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
	/// The document root, `$`
	pub fn root() -> Self {
		Self("$".to_string())
	}

	/// Path of a mapping key below this one
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_core::path::FieldPath;
	///
	/// let path = FieldPath::root().key("songs").index(1).key("title");
	/// assert_eq!(path.to_string(), "$.songs[1].title");
	/// ```
	pub fn key(&self, key: &str) -> Self {
		Self(format!("{}.{}", self.0, key))
	}

	/// Path of a sequence element below this one
	pub fn index(&self, index: usize) -> Self {
		Self(format!("{}[{}]", self.0, index))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Default for FieldPath {
	fn default() -> Self {
		Self::root()
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<FieldPath> for String {
	fn from(path: FieldPath) -> Self {
		path.0
	}
}

impl From<&FieldPath> for String {
	fn from(path: &FieldPath) -> Self {
		path.0.clone()
	}
}
