//! Collection+JSON codec (`application/vnd.collection+json`).
//!
//! A single object or a list of objects is wrapped into a collection
//! document:
//!
//! ```text
//! {"collection": {
//!     "version": "1.0",
//!     "href": "http://localhost/songs/",
//!     "items": [{
//!         "href": "//songs/Roxanne",
//!         "data": [{"name": "title", "value": "Roxanne", "prompt": "Song title"}],
//!         "links": [{"rel": "download", "href": "//songs/Roxanne.mp3"}]
//!     }],
//!     "queries": [{"rel": "search", "href": "//search", "data": [{"name": "q", "value": ""}]}],
//!     "template": {"data": [{"name": "title", "value": "", "prompt": "Song title"}]}
//! }}
//! ```
//!
//! An item's `href` is its `self` link. Decoding yields a sequence of item
//! mappings; a client submission (`{"template": {"data": [..]}}`) decodes to
//! a single mapping.

use hypercast_core::link::LINKS_KEY;
use hypercast_core::node::Node;
use hypercast_core::registry::SchemaRegistry;
use hypercast_core::schema::{FieldBinding, Schema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::codec::{Codec, ensure_finite};
use crate::error::{CodecError, CodecResult};
use crate::format::Format;

const FORMAT_NAME: &str = "Collection+JSON";
const SELF_REL: &str = "self";

/// Name/value pair of a query template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
	pub name: String,
	#[serde(default)]
	pub value: String,
}

/// A query the client may run against the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTemplate {
	pub rel: String,
	pub href: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prompt: Option<String>,
	#[serde(default)]
	pub data: Vec<QueryParam>,
}

impl QueryTemplate {
	pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
		Self {
			rel: rel.into(),
			href: href.into(),
			prompt: None,
			data: Vec::new(),
		}
	}

	pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = Some(prompt.into());
		self
	}

	/// Adds a parameter with an initial value
	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.data.push(QueryParam {
			name: name.into(),
			value: value.into(),
		});
		self
	}
}

/// Collection-level fields of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionJsonOptions {
	/// Collection+JSON version
	pub version: String,
	/// URI of the collection itself
	pub href: Option<String>,
	/// Query templates
	pub queries: Vec<QueryTemplate>,
}

impl Default for CollectionJsonOptions {
	fn default() -> Self {
		Self {
			version: "1.0".to_string(),
			href: None,
			queries: Vec::new(),
		}
	}
}

/// Collection+JSON codec
///
/// # Examples
///
/// ```
/// use hypercast_formats::collection_json::{CollectionJsonCodec, QueryTemplate};
///
/// let codec = CollectionJsonCodec::default()
///     .href("http://localhost/songs/")
///     .query(QueryTemplate::new("search", "//search").param("q", ""));
/// assert_eq!(codec.options().version, "1.0");
/// assert_eq!(codec.options().queries.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectionJsonCodec {
	options: CollectionJsonOptions,
}

impl CollectionJsonCodec {
	pub fn new(options: CollectionJsonOptions) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &CollectionJsonOptions {
		&self.options
	}

	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.options.version = version.into();
		self
	}

	pub fn href(mut self, href: impl Into<String>) -> Self {
		self.options.href = Some(href.into());
		self
	}

	pub fn query(mut self, query: QueryTemplate) -> Self {
		self.options.queries.push(query);
		self
	}

	fn encode_item(&self, node: &Node, schema: &Schema) -> CodecResult<Value> {
		let map = node.as_mapping().ok_or_else(|| {
			CodecError::malformed(FORMAT_NAME, format!("items must be mappings, found {}", node.kind()))
		})?;

		let mut item = Map::new();
		let mut data = Vec::with_capacity(map.len());
		let mut links = Vec::new();

		for (key, value) in map {
			if key == LINKS_KEY && schema.has_links() {
				let entries = value
					.as_sequence()
					.ok_or_else(|| CodecError::malformed(FORMAT_NAME, "links must be a list"))?;
				for link in entries {
					let rel = link.get("rel").and_then(Node::as_str);
					let href = link.get("href").and_then(Node::as_str);
					match (rel, href) {
						(Some(SELF_REL), Some(href)) => {
							item.insert("href".to_string(), Value::from(href));
						}
						(Some(rel), Some(href)) => links.push(json!({"rel": rel, "href": href})),
						_ => {
							return Err(CodecError::malformed(
								FORMAT_NAME,
								"link entries need rel and href",
							));
						}
					}
				}
				continue;
			}

			let mut entry = Map::new();
			entry.insert("name".to_string(), Value::from(key.as_str()));
			entry.insert("value".to_string(), Value::from(value));
			if let Some(prompt) = binding_for(schema, key).and_then(|b| b.prompt.as_deref()) {
				entry.insert("prompt".to_string(), Value::from(prompt));
			}
			data.push(Value::Object(entry));
		}

		item.insert("data".to_string(), Value::Array(data));
		if !links.is_empty() {
			item.insert("links".to_string(), Value::Array(links));
		}
		Ok(Value::Object(item))
	}

	/// Template data: one entry per scalar property
	fn template(&self, schema: &Schema) -> Value {
		let data: Vec<Value> = schema
			.field_bindings()
			.filter(|b| !b.collection && !b.is_nested())
			.map(|b| {
				let mut entry = Map::new();
				entry.insert("name".to_string(), Value::from(b.wire_key()));
				entry.insert("value".to_string(), Value::from(""));
				if let Some(prompt) = &b.prompt {
					entry.insert("prompt".to_string(), Value::from(prompt.as_str()));
				}
				Value::Object(entry)
			})
			.collect();

		json!({ "data": data })
	}

	fn decode_item(&self, item: &Value, schema: &Schema) -> CodecResult<Node> {
		let data = item.get("data").map(data_entries).transpose()?.unwrap_or_default();
		let mut map: IndexMap<String, Node> = data.into_iter().collect();

		if schema.has_links() {
			let mut links = Vec::new();
			if let Some(href) = item.get("href").and_then(Value::as_str) {
				links.push(link_node(SELF_REL, href));
			}
			for link in item.get("links").and_then(Value::as_array).into_iter().flatten() {
				let (Some(rel), Some(href)) = (
					link.get("rel").and_then(Value::as_str),
					link.get("href").and_then(Value::as_str),
				) else {
					return Err(CodecError::malformed(
						FORMAT_NAME,
						"link entries need rel and href",
					));
				};
				links.push(link_node(rel, href));
			}
			if !links.is_empty() {
				map.insert(LINKS_KEY.to_string(), Node::Sequence(links));
			}
		}

		Ok(Node::Mapping(map))
	}
}

fn binding_for<'s>(schema: &'s Schema, key: &str) -> Option<&'s FieldBinding> {
	schema.field_bindings().find(|b| b.wire_key() == key)
}

fn link_node(rel: &str, href: &str) -> Node {
	Node::mapping([("rel", Node::from(rel)), ("href", Node::from(href))])
}

/// `[{name, value}, ..]` to ordered key/node pairs
fn data_entries(data: &Value) -> CodecResult<Vec<(String, Node)>> {
	let entries = data
		.as_array()
		.ok_or_else(|| CodecError::malformed(FORMAT_NAME, "data must be an array"))?;

	entries
		.iter()
		.map(|entry| {
			let name = entry
				.get("name")
				.and_then(Value::as_str)
				.ok_or_else(|| CodecError::malformed(FORMAT_NAME, "data entries need a name"))?;
			let value = entry.get("value").cloned().unwrap_or(Value::Null);
			Ok((name.to_string(), Node::from(value)))
		})
		.collect()
}

impl Codec for CollectionJsonCodec {
	fn format(&self) -> Format {
		Format::CollectionJson
	}

	fn encode(&self, node: &Node, schema: &Schema, _registry: &SchemaRegistry) -> CodecResult<Value> {
		ensure_finite(node)?;

		let items = match node {
			Node::Sequence(items) => items
				.iter()
				.map(|item| self.encode_item(item, schema))
				.collect::<CodecResult<Vec<_>>>()?,
			single => vec![self.encode_item(single, schema)?],
		};

		let mut collection = Map::new();
		collection.insert("version".to_string(), Value::from(self.options.version.as_str()));
		if let Some(href) = &self.options.href {
			collection.insert("href".to_string(), Value::from(href.as_str()));
		}
		collection.insert("items".to_string(), Value::Array(items));
		if !self.options.queries.is_empty() {
			collection.insert("queries".to_string(), serde_json::to_value(&self.options.queries)?);
		}
		collection.insert("template".to_string(), self.template(schema));

		Ok(json!({ "collection": collection }))
	}

	fn decode(&self, value: Value, schema: &Schema, _registry: &SchemaRegistry) -> CodecResult<Node> {
		if let Some(collection) = value.get("collection") {
			let items = collection
				.get("items")
				.map(|items| {
					items.as_array().ok_or_else(|| {
						CodecError::malformed(FORMAT_NAME, "items must be an array")
					})
				})
				.transpose()?
				.map(Vec::as_slice)
				.unwrap_or_default();

			return items
				.iter()
				.map(|item| self.decode_item(item, schema))
				.collect::<CodecResult<Vec<_>>>()
				.map(Node::Sequence);
		}

		if let Some(template) = value.get("template") {
			let data = template
				.get("data")
				.ok_or_else(|| CodecError::malformed(FORMAT_NAME, "template has no data"))?;
			return Ok(Node::Mapping(data_entries(data)?.into_iter().collect()));
		}

		Err(CodecError::malformed(
			FORMAT_NAME,
			"expected a collection or a template",
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn song_schema() -> Schema {
		Schema::new(
			"song",
			vec![
				FieldBinding::property("title").prompt("Song title"),
				FieldBinding::collection("composers"),
				FieldBinding::link("self", |_| Ok(String::new())),
			],
		)
		.unwrap()
	}

	#[rstest]
	fn test_template_lists_scalar_properties() {
		let template = CollectionJsonCodec::default().template(&song_schema());
		assert_eq!(
			template,
			json!({"data": [{"name": "title", "value": "", "prompt": "Song title"}]})
		);
	}

	#[rstest]
	fn test_self_link_becomes_item_href() {
		let registry = SchemaRegistry::new();
		let node = Node::from(json!({
			"title": "Roxanne",
			"links": [
				{"rel": "self", "href": "//songs/Roxanne"},
				{"rel": "download", "href": "//songs/Roxanne.mp3"}
			]
		}));

		let value = CollectionJsonCodec::default()
			.encode(&node, &song_schema(), &registry)
			.unwrap();

		assert_eq!(
			value["collection"]["items"][0],
			json!({
				"href": "//songs/Roxanne",
				"data": [{"name": "title", "value": "Roxanne", "prompt": "Song title"}],
				"links": [{"rel": "download", "href": "//songs/Roxanne.mp3"}]
			})
		);
	}

	#[rstest]
	fn test_links_must_be_a_list() {
		let registry = SchemaRegistry::new();
		let node = Node::from(json!({
			"title": "Roxanne",
			"links": {"rel": "self", "href": "//songs/Roxanne"}
		}));

		let err = CollectionJsonCodec::default()
			.encode(&node, &song_schema(), &registry)
			.unwrap_err();

		assert!(matches!(
			err,
			CodecError::Malformed { ref message, .. } if message == "links must be a list"
		));
	}

	#[rstest]
	fn test_decode_template_submission() {
		let registry = SchemaRegistry::new();
		let value = json!({"template": {"data": [{"name": "title", "value": "Fate"}]}});

		let node = CollectionJsonCodec::default()
			.decode(value, &song_schema(), &registry)
			.unwrap();

		assert_eq!(node, Node::mapping([("title", Node::from("Fate"))]));
	}

	#[rstest]
	fn test_decode_rejects_unknown_layout() {
		let registry = SchemaRegistry::new();
		let err = CollectionJsonCodec::default()
			.decode(json!({"title": "Fate"}), &song_schema(), &registry)
			.unwrap_err();
		assert!(matches!(err, CodecError::Malformed { .. }));
	}

	#[rstest]
	fn test_options_deserialize_with_defaults() {
		let options: CollectionJsonOptions =
			serde_json::from_value(json!({"href": "http://localhost/songs/"})).unwrap();
		assert_eq!(options.version, "1.0");
		assert_eq!(options.href.as_deref(), Some("http://localhost/songs/"));
		assert!(options.queries.is_empty());
	}
}
