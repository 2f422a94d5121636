//! HAL codec (`application/hal+json`).
//!
//! Links move from the `links` list into a `_links` object keyed by
//! relation, and bindings flagged `embedded` move under `_embedded`. Both
//! rules apply recursively to nested objects.
//!
//! ```text
//! {"title": "Roxanne", "_links": {"self": {"href": "http://songs/Roxanne"}}}
//! ```

use hypercast_core::link::LINKS_KEY;
use hypercast_core::node::Node;
use hypercast_core::registry::SchemaRegistry;
use hypercast_core::schema::{FieldBinding, Schema};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::codec::{Codec, ensure_finite};
use crate::error::{CodecError, CodecResult};
use crate::format::Format;

/// Reserved HAL key for links
pub const HAL_LINKS_KEY: &str = "_links";
/// Reserved HAL key for embedded resources
pub const HAL_EMBEDDED_KEY: &str = "_embedded";

/// HAL codec
#[derive(Debug, Clone, Default)]
pub struct HalCodec;

impl HalCodec {
	pub fn new() -> Self {
		Self
	}

	fn encode_value(
		&self,
		node: &Node,
		binding: Option<&FieldBinding>,
		registry: &SchemaRegistry,
	) -> CodecResult<Value> {
		match binding.and_then(|b| b.nested.as_ref()) {
			Some(nested) => {
				let schema = registry.resolve_ref(nested)?;
				self.encode_resource(node, &schema, registry)
			}
			None => Ok(Value::from(node)),
		}
	}

	/// Encodes a mapping, or each mapping of a sequence
	fn encode_resource(
		&self,
		node: &Node,
		schema: &Schema,
		registry: &SchemaRegistry,
	) -> CodecResult<Value> {
		let map = match node {
			Node::Mapping(map) => map,
			Node::Sequence(items) => {
				return items
					.iter()
					.map(|item| self.encode_resource(item, schema, registry))
					.collect::<CodecResult<Vec<_>>>()
					.map(Value::Array);
			}
			Node::Scalar(_) => return Ok(Value::from(node)),
		};

		let mut object = Map::new();
		let mut embedded = Map::new();
		let mut links = None;

		for (key, value) in map {
			if key == LINKS_KEY && schema.has_links() {
				links = Some(encode_links(value)?);
				continue;
			}

			let binding = schema.field_bindings().find(|b| b.wire_key() == key);
			let encoded = self.encode_value(value, binding, registry)?;
			if binding.is_some_and(|b| b.embedded) {
				embedded.insert(key.clone(), encoded);
			} else {
				object.insert(key.clone(), encoded);
			}
		}

		if !embedded.is_empty() {
			object.insert(HAL_EMBEDDED_KEY.to_string(), Value::Object(embedded));
		}
		if let Some(links) = links {
			object.insert(HAL_LINKS_KEY.to_string(), links);
		}

		Ok(Value::Object(object))
	}

	fn decode_value(
		&self,
		value: Value,
		binding: Option<&FieldBinding>,
		registry: &SchemaRegistry,
	) -> CodecResult<Node> {
		match binding.and_then(|b| b.nested.as_ref()) {
			Some(nested) => {
				let schema = registry.resolve_ref(nested)?;
				self.decode_resource(value, &schema, registry)
			}
			None => Ok(Node::from(value)),
		}
	}

	fn decode_resource(
		&self,
		value: Value,
		schema: &Schema,
		registry: &SchemaRegistry,
	) -> CodecResult<Node> {
		let object = match value {
			Value::Object(object) => object,
			Value::Array(items) => {
				return items
					.into_iter()
					.map(|item| self.decode_resource(item, schema, registry))
					.collect::<CodecResult<Vec<_>>>()
					.map(Node::Sequence);
			}
			other => return Ok(Node::from(other)),
		};

		let mut map = IndexMap::with_capacity(object.len());
		let mut links = None;

		for (key, value) in object {
			if key == HAL_LINKS_KEY {
				links = Some(decode_links(value)?);
				continue;
			}

			if key == HAL_EMBEDDED_KEY {
				let Value::Object(embedded) = value else {
					return Err(CodecError::malformed("HAL", "_embedded must be an object"));
				};
				for (key, value) in embedded {
					let binding = schema.field_bindings().find(|b| b.wire_key() == key);
					let node = self.decode_value(value, binding, registry)?;
					map.insert(key, node);
				}
				continue;
			}

			let binding = schema.field_bindings().find(|b| b.wire_key() == key);
			let node = self.decode_value(value, binding, registry)?;
			map.insert(key, node);
		}

		if let Some(links) = links {
			map.insert(LINKS_KEY.to_string(), links);
		}

		Ok(Node::Mapping(map))
	}
}

/// `[{rel, href}, ..]` to `{rel: {href}, ..}`
fn encode_links(node: &Node) -> CodecResult<Value> {
	let items = node
		.as_sequence()
		.ok_or_else(|| CodecError::malformed("HAL", "links must be a list"))?;

	let mut links = Map::new();
	for item in items {
		let (Some(rel), Some(href)) = (
			item.get("rel").and_then(Node::as_str),
			item.get("href").and_then(Node::as_str),
		) else {
			return Err(CodecError::malformed("HAL", "link entries need rel and href"));
		};

		let mut link = Map::new();
		link.insert("href".to_string(), Value::String(href.to_string()));
		links.insert(rel.to_string(), Value::Object(link));
	}

	Ok(Value::Object(links))
}

/// `{rel: {href}, ..}` to `[{rel, href}, ..]`
///
/// A relation holding an array of link objects yields one entry per element.
fn decode_links(value: Value) -> CodecResult<Node> {
	let Value::Object(rels) = value else {
		return Err(CodecError::malformed("HAL", "_links must be an object"));
	};

	let mut links = Vec::new();
	for (rel, target) in rels {
		let targets = match target {
			Value::Array(targets) => targets,
			single => vec![single],
		};
		for target in targets {
			let href = target
				.get("href")
				.and_then(Value::as_str)
				.ok_or_else(|| {
					CodecError::malformed("HAL", format!("link '{}' has no href", rel))
				})?;
			links.push(Node::mapping([
				("rel", Node::from(rel.as_str())),
				("href", Node::from(href)),
			]));
		}
	}

	Ok(Node::Sequence(links))
}

impl Codec for HalCodec {
	fn format(&self) -> Format {
		Format::Hal
	}

	fn encode(&self, node: &Node, schema: &Schema, registry: &SchemaRegistry) -> CodecResult<Value> {
		ensure_finite(node)?;
		self.encode_resource(node, schema, registry)
	}

	fn decode(&self, value: Value, schema: &Schema, registry: &SchemaRegistry) -> CodecResult<Node> {
		self.decode_resource(value, schema, registry)
	}
}
