//! Wire codecs for hypercast documents.
//!
//! Every codec consumes the same [`Node`](hypercast_core::node::Node) tree
//! produced by the serializer:
//!
//! - [`JsonCodec`] - plain JSON, links under `links`
//! - [`HalCodec`] - HAL, links under `_links` and embedded resources under
//!   `_embedded`
//! - [`CollectionJsonCodec`] - Collection+JSON with items, queries and a
//!   write template
//!
//! [`Format`] names the codecs for configuration and content negotiation.
//!
//! # Example
//!
//! ```
//! use hypercast_core::prelude::*;
//! use hypercast_formats::{Codec, Format};
//!
//! let registry = SchemaRegistry::new();
//! let schema = Schema::builder("song")
//!     .property("title")
//!     .link("self", |song| Ok(format!("http://songs/{}", song.string("title")?)))
//!     .build()
//!     .unwrap();
//! let song = Record::new().with("title", "Roxanne").into_ref();
//! let node = Serializer::new(&registry).serialize(&song, &schema).unwrap().node;
//!
//! let codec = Format::from_media_type("application/hal+json").unwrap().codec();
//! assert_eq!(
//!     codec.to_string(&node, &schema, &registry).unwrap(),
//!     r#"{"title":"Roxanne","_links":{"self":{"href":"http://songs/Roxanne"}}}"#
//! );
//! ```

pub mod codec;
pub mod collection_json;
pub mod error;
pub mod format;
pub mod hal;
pub mod json;

pub use codec::Codec;
pub use collection_json::{CollectionJsonCodec, CollectionJsonOptions, QueryParam, QueryTemplate};
pub use error::{CodecError, CodecResult};
pub use format::Format;
pub use hal::HalCodec;
pub use json::JsonCodec;
