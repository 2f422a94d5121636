//! Error types for wire codecs.

use hypercast_core::{RepresenterError, SchemaError};
use thiserror::Error;

/// Errors raised while encoding or decoding a wire document.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodecError {
	/// The input is not valid JSON, or the output could not be written.
	#[error("Invalid JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// The document tree could not be built or applied.
	#[error(transparent)]
	Representer(#[from] RepresenterError),

	/// A nested schema could not be resolved.
	#[error(transparent)]
	Schema(#[from] SchemaError),

	/// The JSON is valid but does not follow the format's layout.
	#[error("Malformed {format} document: {message}")]
	Malformed {
		/// Format name.
		format: &'static str,
		/// What is wrong with the document.
		message: String,
	},

	/// A float has no JSON spelling.
	#[error("Non-finite float values (Infinity, -Infinity, NaN) are not allowed at {path}")]
	NonFiniteFloat {
		/// Location of the value.
		path: String,
	},

	/// No codec handles this media type.
	#[error("Unsupported media type: {0}")]
	UnsupportedMediaType(String),

	/// No codec has this name.
	#[error("Unknown format: {0}")]
	UnknownFormat(String),
}

impl CodecError {
	pub(crate) fn malformed(format: &'static str, message: impl Into<String>) -> Self {
		CodecError::Malformed {
			format,
			message: message.into(),
		}
	}
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
