//! Errors surfaced by [`Representer`](crate::Representer).

use hypercast_core::{RepresenterError, SchemaError};
use hypercast_formats::CodecError;
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HypercastError {
	#[error(transparent)]
	Representer(#[from] RepresenterError),

	#[error(transparent)]
	Schema(#[from] SchemaError),

	#[error(transparent)]
	Codec(#[from] CodecError),

	/// A single object was parsed from a document holding several items
	#[error("Expected a single item, found {0}")]
	NotSingleItem(usize),
}

impl HypercastError {
	pub fn is_schema_error(&self) -> bool {
		match self {
			HypercastError::Schema(_) => true,
			HypercastError::Representer(e) => e.is_schema_error(),
			HypercastError::Codec(CodecError::Schema(_)) => true,
			HypercastError::Codec(CodecError::Representer(e)) => e.is_schema_error(),
			_ => false,
		}
	}
}

pub type HypercastResult<T> = Result<T, HypercastError>;
