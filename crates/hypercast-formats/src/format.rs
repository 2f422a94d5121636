//! Format selection and media-type negotiation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::Codec;
use crate::collection_json::CollectionJsonCodec;
use crate::error::{CodecError, CodecResult};
use crate::hal::HalCodec;
use crate::json::JsonCodec;

/// Media type of plain JSON
pub const JSON_MEDIA_TYPE: &str = "application/json";
/// Media type of HAL documents
pub const HAL_MEDIA_TYPE: &str = "application/hal+json";
/// Media type of Collection+JSON documents
pub const COLLECTION_JSON_MEDIA_TYPE: &str = "application/vnd.collection+json";

/// Wire formats understood by hypercast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
	#[default]
	Json,
	Hal,
	CollectionJson,
}

impl Format {
	/// All formats, in negotiation preference order
	pub const ALL: [Format; 3] = [Format::Json, Format::Hal, Format::CollectionJson];

	/// Looks a format up by its configuration name
	///
	/// Names are case-insensitive; `collection-json`, `collection_json` and
	/// `collection+json` are all accepted.
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_formats::Format;
	///
	/// assert_eq!(Format::from_name("HAL").unwrap(), Format::Hal);
	/// assert_eq!(Format::from_name("collection_json").unwrap(), Format::CollectionJson);
	/// assert!(Format::from_name("xml").is_err());
	/// ```
	pub fn from_name(name: &str) -> CodecResult<Self> {
		match name.trim().to_ascii_lowercase().as_str() {
			"json" => Ok(Format::Json),
			"hal" | "hal+json" | "hal-json" => Ok(Format::Hal),
			"collection-json" | "collection_json" | "collection+json" => Ok(Format::CollectionJson),
			_ => Err(CodecError::UnknownFormat(name.to_string())),
		}
	}

	/// Picks the format for a `Content-Type` or `Accept` entry
	///
	/// Parameters such as `charset` are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_formats::Format;
	///
	/// let format = Format::from_media_type("application/hal+json; charset=utf-8").unwrap();
	/// assert_eq!(format, Format::Hal);
	/// ```
	pub fn from_media_type(media_type: &str) -> CodecResult<Self> {
		let essence = media_type
			.split(';')
			.next()
			.unwrap_or_default()
			.trim()
			.to_ascii_lowercase();

		Format::ALL
			.into_iter()
			.find(|format| format.media_type() == essence)
			.ok_or_else(|| CodecError::UnsupportedMediaType(media_type.to_string()))
	}

	pub fn media_type(&self) -> &'static str {
		match self {
			Format::Json => JSON_MEDIA_TYPE,
			Format::Hal => HAL_MEDIA_TYPE,
			Format::CollectionJson => COLLECTION_JSON_MEDIA_TYPE,
		}
	}

	/// Configuration name (`json`, `hal`, `collection-json`)
	pub fn name(&self) -> &'static str {
		match self {
			Format::Json => "json",
			Format::Hal => "hal",
			Format::CollectionJson => "collection-json",
		}
	}

	/// Codec with default options for this format
	pub fn codec(&self) -> Box<dyn Codec> {
		match self {
			Format::Json => Box::new(JsonCodec::new()),
			Format::Hal => Box::new(HalCodec::new()),
			Format::CollectionJson => Box::new(CollectionJsonCodec::default()),
		}
	}
}

impl fmt::Display for Format {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Format {
	type Err = CodecError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Format::from_name(s)
	}
}
