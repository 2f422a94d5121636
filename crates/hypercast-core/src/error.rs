//! Error types for the representer engine.
//!
//! Schema, access and shape errors abort the current serialize or deserialize
//! call. Link resolution errors never do: they are collected next to the
//! partial output and reported as warnings.

use thiserror::Error;

use crate::recursive::RecursiveError;

/// Errors raised while building, registering or resolving schemas.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
	/// A schema with this identifier is already registered.
	#[error("Schema '{0}' is already registered")]
	DuplicateSchema(String),

	/// No schema is registered under this identifier.
	#[error("Unknown schema: {0}")]
	UnknownSchema(String),

	/// The schema exists but the requested version was never published.
	#[error("Schema '{schema_id}' has no version {version}")]
	UnknownVersion {
		/// Schema identifier.
		schema_id: String,
		/// Requested version.
		version: u32,
	},

	/// A binding is malformed (empty or duplicated name, reserved key, ...).
	#[error("Invalid binding in schema '{schema_id}': {message}")]
	InvalidBinding {
		/// Schema identifier.
		schema_id: String,
		/// What is wrong with the binding.
		message: String,
	},
}

/// Errors raised while reading from or writing to a resource.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
	/// The object has no attribute for a binding that is not optional.
	#[error("Missing accessor '{name}' at {path}")]
	MissingAccessor {
		/// Location of the object in the document.
		path: String,
		/// Attribute name.
		name: String,
	},

	/// The document lacks a key whose binding is marked required.
	#[error("Missing required field '{key}' at {path}")]
	MissingField {
		/// Location of the mapping in the document.
		path: String,
		/// Wire key.
		key: String,
	},

	/// The resource refused to accept a value for this attribute.
	#[error("Attribute '{name}' cannot be written: {message}")]
	ReadOnly {
		/// Attribute name.
		name: String,
		/// Reason given by the resource.
		message: String,
	},
}

/// The shape of a value does not match what its binding expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Type mismatch at {path}: expected {expected}, found {found}")]
pub struct TypeMismatchError {
	/// Location of the offending value.
	pub path: String,
	/// Expected shape (`scalar`, `sequence`, `mapping`, `object`, `list`).
	pub expected: &'static str,
	/// Shape actually found.
	pub found: &'static str,
}

impl TypeMismatchError {
	/// Creates a new type mismatch error.
	pub fn new(path: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
		Self {
			path: path.into(),
			expected,
			found,
		}
	}
}

/// A link template failed to produce an href.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to resolve link '{rel}': {message}")]
pub struct LinkResolutionError {
	/// Relation of the failing link.
	pub rel: String,
	/// Failure reported by the template.
	pub message: String,
}

/// Umbrella error for serialize and deserialize calls.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepresenterError {
	/// Schema lookup or validation failed.
	#[error(transparent)]
	Schema(#[from] SchemaError),

	/// Reading or writing an attribute failed.
	#[error(transparent)]
	Access(#[from] AccessError),

	/// A value had the wrong shape.
	#[error(transparent)]
	TypeMismatch(#[from] TypeMismatchError),

	/// Nesting was too deep or an object referenced itself.
	#[error(transparent)]
	Recursive(#[from] RecursiveError),
}

impl RepresenterError {
	/// Returns true for schema errors.
	pub fn is_schema_error(&self) -> bool {
		matches!(self, RepresenterError::Schema(_))
	}

	/// Returns true for access errors.
	pub fn is_access_error(&self) -> bool {
		matches!(self, RepresenterError::Access(_))
	}

	/// Returns true for shape mismatches.
	pub fn is_type_mismatch(&self) -> bool {
		matches!(self, RepresenterError::TypeMismatch(_))
	}
}

/// Result alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result alias for serialize and deserialize calls.
pub type RepresenterResult<T> = Result<T, RepresenterError>;
