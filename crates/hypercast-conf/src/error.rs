//! Error types for settings loading.

use hypercast_formats::CodecError;
use thiserror::Error;

/// Errors raised while loading or validating settings
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid settings: {0}")]
	Json(#[from] serde_json::Error),

	/// A format name or media type is not known
	#[error(transparent)]
	Codec(#[from] CodecError),

	/// A value parsed but is out of range
	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },

	#[error("Invalid source: {0}")]
	InvalidSource(String),
}

impl SettingsError {
	pub(crate) fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
		SettingsError::InvalidValue {
			key: key.into(),
			message: message.into(),
		}
	}
}

/// Result alias for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;
