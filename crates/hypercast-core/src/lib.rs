//! Representer engine for hypercast.
//!
//! A representer is a declarative [`Schema`](schema::Schema): an ordered list
//! of properties, collections, nested schemas and hypermedia links describing
//! how an in-memory object maps to a wire document. This crate provides:
//!
//! - **Generic Node**: the wire-neutral document tree ([`node::Node`])
//! - **Object model**: the [`Resource`](resource::Resource) trait, shared
//!   [`ObjectRef`](resource::ObjectRef) handles and the open-struct
//!   [`Record`](resource::Record)
//! - **Schema Registry**: versioned, process-wide or standalone schema storage
//! - **Serializer / Deserializer**: object graph to tree and back, with the
//!   `create` and `sync` parse strategies
//! - **Link Resolver**: evaluates link templates and collects failures as
//!   warnings
//!
//! Wire encodings (JSON, HAL, Collection+JSON) live in `hypercast-formats`.
//!
//! # Quick Start
//!
//! ```
//! use hypercast_core::prelude::*;
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::new();
//! let album = Schema::builder("album")
//!     .property("title")
//!     .inline_collection("songs", |song| song.property("title"))
//!     .build()
//!     .unwrap();
//!
//! let node = Node::from(json!({
//!     "title": "True North",
//!     "songs": [{"title": "True North"}, {"title": "Robin Hood in Reverse"}]
//! }));
//! let object = Deserializer::new(&registry)
//!     .deserialize(&node, &album, &RecordFactory)
//!     .unwrap();
//!
//! let out = Serializer::new(&registry).serialize(&object, &album).unwrap();
//! assert_eq!(out.node, node);
//! ```
//!
//! # Parse strategies
//!
//! With [`ParseStrategy::Sync`](schema::ParseStrategy::Sync) the deserializer
//! updates the nested objects the target already holds, matched by position,
//! so their identity survives. Shorter incoming lists truncate the existing
//! collection and longer ones append new objects from the factory.

pub mod deserializer;
pub mod error;
pub mod factory;
pub mod link;
pub mod node;
pub mod path;
pub mod prelude;
pub mod recursive;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod serializer;

pub use deserializer::Deserializer;
pub use error::{
	AccessError, LinkResolutionError, RepresenterError, RepresenterResult, SchemaError,
	SchemaResult, TypeMismatchError,
};
pub use factory::{ObjectFactory, RecordFactory, TypedFactory};
pub use link::{LINKS_KEY, Link, LinkSet, LinkTemplate, resolve_links};
pub use node::{Node, Scalar};
pub use recursive::{DEFAULT_MAX_DEPTH, RecursiveError};
pub use registry::SchemaRegistry;
pub use resource::{AttrValue, ObjectRef, Record, Resource, ResourceExt, object, same_object};
pub use schema::{FieldBinding, ParseStrategy, Schema, SchemaBuilder, SchemaRef};
pub use serializer::{Serialized, Serializer};

/// Serializes `object` with `schema`, resolving named schemas through the
/// global registry.
pub fn serialize(object: &ObjectRef, schema: &Schema) -> RepresenterResult<Serialized> {
	Serializer::new(SchemaRegistry::global()).serialize(object, schema)
}

/// Deserializes `node` into a new object, resolving named schemas through
/// the global registry.
pub fn deserialize(
	node: &Node,
	schema: &Schema,
	factory: &dyn ObjectFactory,
) -> RepresenterResult<ObjectRef> {
	Deserializer::new(SchemaRegistry::global()).deserialize(node, schema, factory)
}
