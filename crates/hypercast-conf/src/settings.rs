//! The settings consumed by a representer.

use hypercast_core::DEFAULT_MAX_DEPTH;
use hypercast_formats::{Codec, CollectionJsonCodec, CollectionJsonOptions, Format, JsonCodec};
use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};

/// Output settings for a representer
///
/// Every field has a default, so a settings file only needs the keys it
/// changes:
///
/// ```toml
/// format = "hal"
/// pretty = true
///
/// [collection_json]
/// href = "http://localhost/songs/"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepresenterSettings {
	/// Wire format used to render and parse documents
	pub format: Format,
	/// Whether rendered documents are indented
	pub pretty: bool,
	/// Maximum nesting depth of serialized objects
	pub max_depth: usize,
	/// Collection-level fields for the Collection+JSON format
	pub collection_json: CollectionJsonOptions,
}

impl Default for RepresenterSettings {
	fn default() -> Self {
		Self {
			format: Format::default(),
			pretty: false,
			max_depth: DEFAULT_MAX_DEPTH,
			collection_json: CollectionJsonOptions::default(),
		}
	}
}

impl RepresenterSettings {
	/// Settings with every field at its default
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_conf::RepresenterSettings;
	/// use hypercast_formats::Format;
	///
	/// let settings = RepresenterSettings::new();
	/// assert_eq!(settings.format, Format::Json);
	/// assert_eq!(settings.max_depth, 32);
	/// assert!(!settings.pretty);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses settings from a TOML document
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_conf::RepresenterSettings;
	/// use hypercast_formats::Format;
	///
	/// let settings = RepresenterSettings::from_toml(r#"format = "collection-json""#).unwrap();
	/// assert_eq!(settings.format, Format::CollectionJson);
	/// assert_eq!(settings.collection_json.version, "1.0");
	/// ```
	pub fn from_toml(content: &str) -> SettingsResult<Self> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn format(mut self, format: Format) -> Self {
		self.format = format;
		self
	}

	pub fn pretty(mut self, pretty: bool) -> Self {
		self.pretty = pretty;
		self
	}

	pub fn max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn collection_json(mut self, options: CollectionJsonOptions) -> Self {
		self.collection_json = options;
		self
	}

	/// Checks values that parse but cannot be used
	pub fn validate(&self) -> SettingsResult<()> {
		if self.max_depth == 0 {
			return Err(SettingsError::invalid_value(
				"max_depth",
				"must be at least 1",
			));
		}
		if self.collection_json.version.trim().is_empty() {
			return Err(SettingsError::invalid_value(
				"collection_json.version",
				"must not be empty",
			));
		}
		Ok(())
	}

	/// Codec for the configured format
	///
	/// Collection+JSON codecs carry the configured collection options.
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_conf::RepresenterSettings;
	/// use hypercast_formats::Format;
	///
	/// let codec = RepresenterSettings::new().format(Format::Hal).codec();
	/// assert_eq!(codec.media_type(), "application/hal+json");
	/// ```
	pub fn codec(&self) -> Box<dyn Codec> {
		match self.format {
			Format::CollectionJson => {
				Box::new(CollectionJsonCodec::new(self.collection_json.clone()))
			}
			Format::Json => Box::new(JsonCodec::new()),
			other => other.codec(),
		}
	}
}
