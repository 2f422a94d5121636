//! The [`Codec`] trait shared by every wire format.

use std::fmt;

use hypercast_core::node::Node;
use hypercast_core::path::FieldPath;
use hypercast_core::registry::SchemaRegistry;
use hypercast_core::schema::Schema;
use serde_json::Value;

use crate::error::{CodecError, CodecResult};
use crate::format::Format;

/// Translates between document trees and one JSON-based wire format
///
/// Encoding and decoding take the schema the tree was produced with, so a
/// codec can move fields around (HAL's `_embedded`) or describe them
/// (Collection+JSON templates).
pub trait Codec: Send + Sync + fmt::Debug {
	/// The format this codec implements
	fn format(&self) -> Format;

	/// Primary media type of the format
	fn media_type(&self) -> &'static str {
		self.format().media_type()
	}

	/// Turns a tree into the wire layout
	fn encode(&self, node: &Node, schema: &Schema, registry: &SchemaRegistry) -> CodecResult<Value>;

	/// Turns the wire layout back into a tree
	fn decode(&self, value: Value, schema: &Schema, registry: &SchemaRegistry) -> CodecResult<Node>;

	/// Encodes into compact JSON text
	fn to_string(&self, node: &Node, schema: &Schema, registry: &SchemaRegistry) -> CodecResult<String> {
		tracing::debug!(format = %self.format(), schema = schema.id(), "encoding document");
		let value = self.encode(node, schema, registry)?;
		Ok(serde_json::to_string(&value)?)
	}

	/// Encodes into indented JSON text
	fn to_string_pretty(
		&self,
		node: &Node,
		schema: &Schema,
		registry: &SchemaRegistry,
	) -> CodecResult<String> {
		let value = self.encode(node, schema, registry)?;
		Ok(serde_json::to_string_pretty(&value)?)
	}

	/// Parses JSON text and decodes it
	fn from_str(&self, input: &str, schema: &Schema, registry: &SchemaRegistry) -> CodecResult<Node> {
		tracing::debug!(format = %self.format(), schema = schema.id(), bytes = input.len(), "decoding document");
		let value: Value = serde_json::from_str(input)?;
		self.decode(value, schema, registry)
	}
}

/// Rejects floats that have no JSON spelling
///
/// # Examples
///
/// ```
/// use hypercast_core::node::{Node, Scalar};
/// use hypercast_formats::codec::ensure_finite;
///
/// assert!(ensure_finite(&Node::from(1_i64)).is_ok());
/// assert!(ensure_finite(&Node::Scalar(Scalar::Float(f64::NAN))).is_err());
/// ```
pub fn ensure_finite(node: &Node) -> CodecResult<()> {
	check_finite(node, &FieldPath::root())
}

fn check_finite(node: &Node, path: &FieldPath) -> CodecResult<()> {
	match node {
		Node::Scalar(scalar) => match scalar.as_f64() {
			Some(f) if !f.is_finite() => Err(CodecError::NonFiniteFloat {
				path: path.to_string(),
			}),
			_ => Ok(()),
		},
		Node::Sequence(items) => items
			.iter()
			.enumerate()
			.try_for_each(|(i, item)| check_finite(item, &path.index(i))),
		Node::Mapping(map) => map
			.iter()
			.try_for_each(|(key, value)| check_finite(value, &path.key(key))),
	}
}
