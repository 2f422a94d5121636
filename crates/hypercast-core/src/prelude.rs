//! Convenience re-exports for common usage.
//!
//! ```
//! use hypercast_core::prelude::*;
//!
//! let schema = Schema::builder("song").property("title").build().unwrap();
//! let song = Record::new().with("title", "Fate").into_ref();
//! let out = Serializer::new(&SchemaRegistry::new()).serialize(&song, &schema).unwrap();
//! assert_eq!(out.node.get("title").and_then(Node::as_str), Some("Fate"));
//! ```

// Errors
pub use crate::error::{
	AccessError, LinkResolutionError, RepresenterError, RepresenterResult, SchemaError,
	SchemaResult, TypeMismatchError,
};
pub use crate::recursive::RecursiveError;

// Document tree and object model
pub use crate::link::{Link, LinkSet};
pub use crate::node::{Node, Scalar};
pub use crate::resource::{AttrValue, ObjectRef, Record, Resource, ResourceExt, object, same_object};

// Schemas
pub use crate::factory::{ObjectFactory, RecordFactory, TypedFactory};
pub use crate::registry::SchemaRegistry;
pub use crate::schema::{FieldBinding, ParseStrategy, Schema, SchemaBuilder};

// Engine
pub use crate::deserializer::Deserializer;
pub use crate::serializer::{Serialized, Serializer};
