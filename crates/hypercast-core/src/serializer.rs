//! Object graph to document tree
//!
//! The serializer walks an object against a schema and emits a [`Node`]
//! mapping per object, in binding order. Links are resolved last and merged
//! under the reserved `links` key; templates that fail are reported as
//! warnings next to the output instead of failing the call.

use indexmap::IndexMap;

use crate::error::{AccessError, LinkResolutionError, RepresenterResult, TypeMismatchError};
use crate::link::{LINKS_KEY, LinkSet, resolve_links};
use crate::node::Node;
use crate::path::FieldPath;
use crate::recursive::{DEFAULT_MAX_DEPTH, SerializationContext, circular};
use crate::registry::SchemaRegistry;
use crate::resource::{AttrValue, ObjectRef};
use crate::schema::{FieldBinding, Schema};

/// Output of a serialize call
#[derive(Debug, Clone, PartialEq)]
pub struct Serialized {
	/// The document tree
	pub node: Node,
	/// Links that could not be resolved
	pub warnings: Vec<LinkResolutionError>,
}

impl Serialized {
	pub fn has_warnings(&self) -> bool {
		!self.warnings.is_empty()
	}

	pub fn into_node(self) -> Node {
		self.node
	}
}

/// Serializes objects, resolving named schemas through a registry
///
/// # Examples
///
/// ```
/// use hypercast_core::registry::SchemaRegistry;
/// use hypercast_core::resource::Record;
/// use hypercast_core::schema::Schema;
/// use hypercast_core::serializer::Serializer;
///
/// let registry = SchemaRegistry::new();
/// let schema = Schema::builder("song").property("title").build().unwrap();
/// let song = Record::new().with("title", "Fate").into_ref();
///
/// let out = Serializer::new(&registry).serialize(&song, &schema).unwrap();
/// assert_eq!(serde_json::Value::from(&out.node).to_string(), r#"{"title":"Fate"}"#);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'r> {
	registry: &'r SchemaRegistry,
	max_depth: usize,
}

impl<'r> Serializer<'r> {
	pub fn new(registry: &'r SchemaRegistry) -> Self {
		Self {
			registry,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Sets the nesting limit
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Serializes one object into a mapping
	pub fn serialize(&self, object: &ObjectRef, schema: &Schema) -> RepresenterResult<Serialized> {
		tracing::debug!(schema_id = schema.id(), "Serializing object");

		let mut context = SerializationContext::new(self.max_depth);
		let mut warnings = Vec::new();
		let node = self.object_node(
			object,
			schema,
			&FieldPath::root(),
			&mut context,
			&mut warnings,
		)?;

		Ok(Serialized { node, warnings })
	}

	/// Serializes a list of objects into a sequence of mappings
	pub fn serialize_collection(
		&self,
		objects: &[ObjectRef],
		schema: &Schema,
	) -> RepresenterResult<Serialized> {
		tracing::debug!(
			schema_id = schema.id(),
			count = objects.len(),
			"Serializing collection"
		);

		let root = FieldPath::root();
		let mut context = SerializationContext::new(self.max_depth);
		let mut warnings = Vec::new();
		let items = objects
			.iter()
			.enumerate()
			.map(|(i, object)| {
				self.object_node(object, schema, &root.index(i), &mut context, &mut warnings)
			})
			.collect::<RepresenterResult<Vec<_>>>()?;

		Ok(Serialized {
			node: Node::Sequence(items),
			warnings,
		})
	}

	fn object_node(
		&self,
		object: &ObjectRef,
		schema: &Schema,
		path: &FieldPath,
		context: &mut SerializationContext,
		warnings: &mut Vec<LinkResolutionError>,
	) -> RepresenterResult<Node> {
		circular::visit_with(context, object, |child| -> RepresenterResult<Node> {
			// Read everything up front so no lock is held while descending
			let (values, links, errors) = {
				let guard = object.read();
				let values: Vec<Option<AttrValue>> = schema
					.field_bindings()
					.map(|binding| guard.get(&binding.name))
					.collect();
				let (links, errors) = resolve_links(&*guard, schema.link_bindings());
				(values, links, errors)
			};

			let mut map = IndexMap::with_capacity(values.len() + 1);
			for (binding, value) in schema.field_bindings().zip(values) {
				let key_path = path.key(binding.wire_key());
				let Some(value) = value else {
					if binding.optional {
						continue;
					}
					return Err(AccessError::MissingAccessor {
						path: key_path.to_string(),
						name: binding.name.clone(),
					}
					.into());
				};

				if value.is_null() {
					if !binding.skip_nil {
						map.insert(binding.wire_key().to_string(), Node::null());
					}
					continue;
				}

				let node = self.value_node(binding, value, &key_path, child, warnings)?;
				map.insert(binding.wire_key().to_string(), node);
			}

			for error in errors {
				tracing::warn!(path = %path, rel = %error.rel, "{}", error);
				warnings.push(error);
			}
			if !links.is_empty() {
				map.insert(LINKS_KEY.to_string(), links_node(&links));
			}

			Ok(Node::Mapping(map))
		})
	}

	fn value_node(
		&self,
		binding: &FieldBinding,
		value: AttrValue,
		path: &FieldPath,
		context: &mut SerializationContext,
		warnings: &mut Vec<LinkResolutionError>,
	) -> RepresenterResult<Node> {
		match (&binding.nested, binding.collection) {
			(None, false) => scalar_node(value, path),
			(None, true) => {
				let items = list_items(value, path)?;
				items
					.into_iter()
					.enumerate()
					.map(|(i, item)| scalar_node(item, &path.index(i)))
					.collect::<RepresenterResult<Vec<_>>>()
					.map(Node::Sequence)
			}
			(Some(nested), false) => {
				let nested = self.registry.resolve_ref(nested)?;
				let object = object_of(value, path)?;
				self.object_node(&object, &nested, path, context, warnings)
			}
			(Some(nested), true) => {
				let nested = self.registry.resolve_ref(nested)?;
				let items = list_items(value, path)?;
				let mut nodes = Vec::with_capacity(items.len());
				for (i, item) in items.into_iter().enumerate() {
					let item_path = path.index(i);
					let object = object_of(item, &item_path)?;
					nodes.push(self.object_node(&object, &nested, &item_path, context, warnings)?);
				}
				Ok(Node::Sequence(nodes))
			}
		}
	}
}

fn scalar_node(value: AttrValue, path: &FieldPath) -> RepresenterResult<Node> {
	match value {
		AttrValue::Scalar(scalar) => Ok(Node::Scalar(scalar)),
		other => Err(TypeMismatchError::new(path, "scalar", other.kind()).into()),
	}
}

fn list_items(value: AttrValue, path: &FieldPath) -> RepresenterResult<Vec<AttrValue>> {
	match value {
		AttrValue::List(items) => Ok(items),
		other => Err(TypeMismatchError::new(path, "list", other.kind()).into()),
	}
}

fn object_of(value: AttrValue, path: &FieldPath) -> RepresenterResult<ObjectRef> {
	match value {
		AttrValue::Object(object) => Ok(object),
		other => Err(TypeMismatchError::new(path, "object", other.kind()).into()),
	}
}

fn links_node(links: &LinkSet) -> Node {
	Node::sequence(links.iter().map(|link| {
		Node::mapping([
			("rel", Node::from(link.rel.as_str())),
			("href", Node::from(link.href.as_str())),
		])
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RepresenterError;
	use crate::recursive::RecursiveError;
	use crate::resource::{Record, Resource, ResourceExt};
	use rstest::{fixture, rstest};
	use serde_json::{Value, json};

	fn to_json(node: &Node) -> Value {
		Value::from(node)
	}

	#[fixture]
	fn registry() -> SchemaRegistry {
		SchemaRegistry::new()
	}

	#[fixture]
	fn album_schema() -> Schema {
		Schema::builder("album")
			.property("title")
			.inline_collection("songs", |song| song.property("title"))
			.build()
			.unwrap()
	}

	#[rstest]
	fn test_scalar_property(registry: SchemaRegistry) {
		let schema = Schema::builder("song").property("title").build().unwrap();
		let song = Record::new().with("title", "Fate").into_ref();

		let out = Serializer::new(&registry).serialize(&song, &schema).unwrap();

		assert_eq!(to_json(&out.node), json!({"title": "Fate"}));
		assert!(!out.has_warnings());
	}

	#[rstest]
	fn test_nested_collection_keeps_order(registry: SchemaRegistry, album_schema: Schema) {
		let album = Record::new()
			.with("title", "True North")
			.with(
				"songs",
				AttrValue::list([
					Record::new().with("title", "Fate").into_ref(),
					Record::new().with("title", "Dharma and the Bomb").into_ref(),
				]),
			)
			.into_ref();

		let out = Serializer::new(&registry).serialize(&album, &album_schema).unwrap();

		assert_eq!(
			to_json(&out.node),
			json!({
				"title": "True North",
				"songs": [{"title": "Fate"}, {"title": "Dharma and the Bomb"}]
			})
		);
	}

	#[rstest]
	fn test_missing_accessor(registry: SchemaRegistry) {
		let schema = Schema::builder("song").property("title").build().unwrap();
		let song = Record::new().into_ref();

		let err = Serializer::new(&registry).serialize(&song, &schema).unwrap_err();

		assert_eq!(
			err,
			RepresenterError::Access(AccessError::MissingAccessor {
				path: "$.title".to_string(),
				name: "title".to_string(),
			})
		);
	}

	#[rstest]
	fn test_optional_absent_and_skip_nil(registry: SchemaRegistry) {
		let schema = Schema::new(
			"song",
			vec![
				FieldBinding::property("title"),
				FieldBinding::property("track").optional(),
				FieldBinding::property("label"),
				FieldBinding::property("genre").skip_nil(),
			],
		)
		.unwrap();
		let song = Record::new()
			.with("title", "Fate")
			.with("label", AttrValue::null())
			.with("genre", AttrValue::null())
			.into_ref();

		let out = Serializer::new(&registry).serialize(&song, &schema).unwrap();

		assert_eq!(to_json(&out.node), json!({"title": "Fate", "label": null}));
	}

	#[rstest]
	fn test_wire_key(registry: SchemaRegistry) {
		let schema = Schema::new("song", vec![FieldBinding::property("title").key("name")]).unwrap();
		let song = Record::new().with("title", "Fate").into_ref();

		let out = Serializer::new(&registry).serialize(&song, &schema).unwrap();

		assert_eq!(to_json(&out.node), json!({"name": "Fate"}));
	}

	#[rstest]
	fn test_collection_given_scalar_is_mismatch(registry: SchemaRegistry, album_schema: Schema) {
		let album = Record::new()
			.with("title", "True North")
			.with("songs", "Fate")
			.into_ref();

		let err = Serializer::new(&registry)
			.serialize(&album, &album_schema)
			.unwrap_err();

		assert_eq!(
			err,
			RepresenterError::TypeMismatch(TypeMismatchError::new("$.songs", "list", "scalar"))
		);
	}

	#[rstest]
	fn test_mismatch_path_points_into_collection(registry: SchemaRegistry, album_schema: Schema) {
		let album = Record::new()
			.with("title", "True North")
			.with(
				"songs",
				AttrValue::list([
					AttrValue::from(Record::new().with("title", "Fate").into_ref()),
					AttrValue::from(
						Record::new()
							.with("title", AttrValue::list(["a"]))
							.into_ref(),
					),
				]),
			)
			.into_ref();

		let err = Serializer::new(&registry)
			.serialize(&album, &album_schema)
			.unwrap_err();

		assert_eq!(
			err,
			RepresenterError::TypeMismatch(TypeMismatchError::new(
				"$.songs[1].title",
				"scalar",
				"list"
			))
		);
	}

	#[rstest]
	fn test_links_are_merged(registry: SchemaRegistry) {
		let schema = Schema::builder("song")
			.property("title")
			.link("self", |s: &dyn Resource| {
				Ok(format!("http://songs/{}", s.string("title")?))
			})
			.build()
			.unwrap();
		let song = Record::new().with("title", "Roxanne").into_ref();

		let out = Serializer::new(&registry).serialize(&song, &schema).unwrap();

		assert_eq!(
			to_json(&out.node),
			json!({
				"title": "Roxanne",
				"links": [{"rel": "self", "href": "http://songs/Roxanne"}]
			})
		);
	}

	#[rstest]
	fn test_links_entry_comes_last(registry: SchemaRegistry) {
		let schema = Schema::builder("song")
			.link("self", |s: &dyn Resource| {
				Ok(format!("http://songs/{}", s.string("title")?))
			})
			.property("title")
			.property("track")
			.build()
			.unwrap();
		let song = Record::new().with("title", "Roxanne").with("track", 2_i64).into_ref();

		let out = Serializer::new(&registry).serialize(&song, &schema).unwrap();
		let keys: Vec<&str> = out.node.as_mapping().unwrap().keys().map(String::as_str).collect();

		assert_eq!(keys, vec!["title", "track", LINKS_KEY]);
	}

	#[rstest]
	fn test_failed_link_is_a_warning(registry: SchemaRegistry) {
		let schema = Schema::builder("song")
			.property("title")
			.link("artist", |s: &dyn Resource| {
				Ok(format!("/artists/{}", s.string("artist")?))
			})
			.build()
			.unwrap();
		let song = Record::new().with("title", "Fate").into_ref();

		let out = Serializer::new(&registry).serialize(&song, &schema).unwrap();

		assert_eq!(to_json(&out.node), json!({"title": "Fate"}));
		assert_eq!(out.warnings.len(), 1);
		assert_eq!(out.warnings[0].rel, "artist");
	}

	#[rstest]
	fn test_named_nested_schema(registry: SchemaRegistry) {
		registry
			.register("song", vec![FieldBinding::property("title")])
			.unwrap();
		let schema = Schema::new(
			"album",
			vec![FieldBinding::collection("songs").nested_id("song")],
		)
		.unwrap();
		let album = Record::new()
			.with(
				"songs",
				AttrValue::list([Record::new().with("title", "Fate").into_ref()]),
			)
			.into_ref();

		let out = Serializer::new(&registry).serialize(&album, &schema).unwrap();
		assert_eq!(to_json(&out.node), json!({"songs": [{"title": "Fate"}]}));
	}

	#[rstest]
	fn test_unknown_named_schema(registry: SchemaRegistry) {
		let schema = Schema::new(
			"album",
			vec![FieldBinding::property("artist").nested_id("artist")],
		)
		.unwrap();
		let album = Record::new()
			.with("artist", Record::new().into_ref())
			.into_ref();

		let err = Serializer::new(&registry).serialize(&album, &schema).unwrap_err();
		assert!(err.is_schema_error());
	}

	#[rstest]
	fn test_self_reference_is_circular(registry: SchemaRegistry) {
		let schema = Schema::new(
			"node",
			vec![FieldBinding::property("next").nested_id("node")],
		)
		.unwrap();
		registry.register_schema(schema.clone()).unwrap();

		let node = Record::new().into_ref();
		node.write().set("next", node.clone().into()).unwrap();

		let err = Serializer::new(&registry).serialize(&node, &schema).unwrap_err();
		assert!(matches!(
			err,
			RepresenterError::Recursive(RecursiveError::CircularReference { .. })
		));
	}

	#[rstest]
	fn test_shared_sibling_is_not_circular(registry: SchemaRegistry, album_schema: Schema) {
		let fate = Record::new().with("title", "Fate").into_ref();
		let album = Record::new()
			.with("title", "Twice")
			.with("songs", AttrValue::list([fate.clone(), fate]))
			.into_ref();

		let out = Serializer::new(&registry).serialize(&album, &album_schema).unwrap();
		assert_eq!(out.node.get("songs").unwrap().as_sequence().unwrap().len(), 2);
	}

	#[rstest]
	fn test_max_depth(registry: SchemaRegistry, album_schema: Schema) {
		let album = Record::new()
			.with("title", "True North")
			.with(
				"songs",
				AttrValue::list([Record::new().with("title", "Fate").into_ref()]),
			)
			.into_ref();

		let err = Serializer::new(&registry)
			.with_max_depth(1)
			.serialize(&album, &album_schema)
			.unwrap_err();

		assert_eq!(
			err,
			RepresenterError::Recursive(RecursiveError::MaxDepthExceeded {
				current_depth: 1,
				max_depth: 1,
			})
		);
	}

	#[rstest]
	fn test_serialize_collection(registry: SchemaRegistry) {
		let schema = Schema::builder("song").property("title").build().unwrap();
		let songs = vec![
			Record::new().with("title", "Fate").into_ref(),
			Record::new().with("title", "Roxanne").into_ref(),
		];

		let out = Serializer::new(&registry)
			.serialize_collection(&songs, &schema)
			.unwrap();

		assert_eq!(
			to_json(&out.node),
			json!([{"title": "Fate"}, {"title": "Roxanne"}])
		);
	}
}
