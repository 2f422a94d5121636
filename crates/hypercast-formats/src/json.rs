//! Plain JSON codec (`application/json`).
//!
//! The tree maps one-to-one onto JSON; links stay under the `links` key as a
//! list of `{rel, href}` objects.

use hypercast_core::node::Node;
use hypercast_core::registry::SchemaRegistry;
use hypercast_core::schema::Schema;
use serde_json::Value;

use crate::codec::{Codec, ensure_finite};
use crate::error::CodecResult;
use crate::format::Format;

/// JSON codec
#[derive(Debug, Clone)]
pub struct JsonCodec {
	/// Whether to reject non-finite floats (Infinity, -Infinity, NaN) on encode
	pub strict: bool,
}

impl Default for JsonCodec {
	fn default() -> Self {
		Self { strict: true }
	}
}

impl JsonCodec {
	/// Create a strict JSON codec
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_formats::json::JsonCodec;
	///
	/// let codec = JsonCodec::new();
	/// assert!(codec.strict);
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// When not strict, non-finite floats are written as `null`
	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}
}

impl Codec for JsonCodec {
	fn format(&self) -> Format {
		Format::Json
	}

	fn encode(&self, node: &Node, _schema: &Schema, _registry: &SchemaRegistry) -> CodecResult<Value> {
		if self.strict {
			ensure_finite(node)?;
		}
		Ok(Value::from(node))
	}

	fn decode(&self, value: Value, _schema: &Schema, _registry: &SchemaRegistry) -> CodecResult<Node> {
		Ok(Node::from(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::CodecError;
	use hypercast_core::node::Scalar;
	use rstest::{fixture, rstest};

	#[fixture]
	fn schema() -> Schema {
		Schema::builder("song").property("title").build().unwrap()
	}

	#[rstest]
	fn test_to_string(schema: Schema) {
		let registry = SchemaRegistry::new();
		let node = Node::mapping([("title", Node::from("Fate"))]);

		let text = JsonCodec::new().to_string(&node, &schema, &registry).unwrap();

		assert_eq!(text, r#"{"title":"Fate"}"#);
	}

	#[rstest]
	fn test_strict_rejects_non_finite(schema: Schema) {
		let registry = SchemaRegistry::new();
		let node = Node::mapping([("rating", Node::Scalar(Scalar::Float(f64::INFINITY)))]);

		let err = JsonCodec::new().encode(&node, &schema, &registry).unwrap_err();
		assert!(matches!(err, CodecError::NonFiniteFloat { ref path } if path == "$.rating"));

		let lenient = JsonCodec::new().strict(false).encode(&node, &schema, &registry).unwrap();
		assert_eq!(lenient, serde_json::json!({"rating": null}));
	}

	#[rstest]
	fn test_from_str(schema: Schema) {
		let registry = SchemaRegistry::new();
		let node = JsonCodec::new()
			.from_str(r#"{"title":"Linoleum"}"#, &schema, &registry)
			.unwrap();
		assert_eq!(node.get("title").and_then(Node::as_str), Some("Linoleum"));
	}

	#[rstest]
	fn test_invalid_json(schema: Schema) {
		let registry = SchemaRegistry::new();
		let err = JsonCodec::new().from_str("{title", &schema, &registry).unwrap_err();
		assert!(err.to_string().starts_with("Invalid JSON"));
	}
}
