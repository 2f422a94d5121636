//! # hypercast
//!
//! Declarative representers for JSON, HAL and Collection+JSON documents.
//!
//! A representer is a [`Schema`]: an ordered list of properties,
//! collections, nested schemas and hypermedia links describing how an object
//! maps to a wire document. The same schema renders an object and parses a
//! document back into one, either creating new nested objects or syncing the
//! ones the target already holds.
//!
//! ## Crates
//!
//! - `hypercast-core` - schemas, registry, serializer, deserializer, links
//! - `hypercast-formats` - JSON, HAL and Collection+JSON codecs
//! - `hypercast-conf` - layered settings (feature `conf`, on by default)
//!
//! ## Quick Example
//!
//! ```
//! use hypercast::prelude::*;
//!
//! let registry = SchemaRegistry::new();
//! registry
//!     .register(
//!         "song",
//!         vec![
//!             FieldBinding::property("title"),
//!             FieldBinding::link("self", |song| {
//!                 Ok(format!("http://songs/{}", song.string("title")?))
//!             }),
//!         ],
//!     )
//!     .unwrap();
//!
//! let album = Schema::builder("album")
//!     .property("title")
//!     .binding(FieldBinding::collection("songs").nested_id("song").embedded())
//!     .build()
//!     .unwrap();
//!
//! let object = Record::new()
//!     .with("title", "True North")
//!     .with(
//!         "songs",
//!         AttrValue::list([Record::new().with("title", "True North").into_ref()]),
//!     )
//!     .into_ref();
//!
//! let hal = Representer::new(album)
//!     .with_registry(&registry)
//!     .with_format(Format::Hal)
//!     .render(&object)
//!     .unwrap();
//! assert!(!hal.has_warnings());
//! assert_eq!(
//!     hal.output,
//!     r#"{"title":"True North","_embedded":{"songs":[{"title":"True North","_links":{"self":{"href":"http://songs/True North"}}}]}}"#
//! );
//! ```

#[cfg(feature = "conf")]
pub mod conf;
pub mod error;
pub mod formats;
pub mod representer;

pub use error::{HypercastError, HypercastResult};
pub use representer::{Rendered, Representer};

// Re-export the engine
pub use hypercast_core::{
	AccessError, AttrValue, Deserializer, FieldBinding, Link, LinkResolutionError, LinkSet, Node,
	ObjectFactory, ObjectRef, ParseStrategy, Record, RecordFactory, RecursiveError,
	RepresenterError, Resource, ResourceExt, Scalar, Schema, SchemaBuilder, SchemaError,
	SchemaRegistry, Serialized, Serializer, TypeMismatchError, TypedFactory, deserialize, object,
	same_object, serialize,
};

// Re-export codecs
pub use hypercast_formats::{Codec, CodecError, Format};

// Re-export settings
#[cfg(feature = "conf")]
pub use hypercast_conf::{RepresenterSettings, SettingsBuilder, SettingsError};

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::{HypercastError, HypercastResult, Rendered, Representer};

	// Engine
	pub use hypercast_core::prelude::*;

	// Codecs
	pub use crate::{Codec, Format};
	pub use hypercast_formats::{CollectionJsonCodec, CollectionJsonOptions, QueryTemplate};

	// Settings feature
	#[cfg(feature = "conf")]
	pub use crate::{RepresenterSettings, SettingsBuilder};
}
