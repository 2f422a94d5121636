//! Document tree to object graph
//!
//! Nested mappings become objects produced by an [`ObjectFactory`]. Bindings
//! using [`ParseStrategy::Sync`] update the objects already held by the
//! target instead, matched by position:
//!
//! - positions present on both sides keep the existing object;
//! - extra incoming elements are created with the factory and appended;
//! - existing elements beyond the incoming length are dropped.

use crate::error::{AccessError, RepresenterResult, TypeMismatchError};
use crate::factory::ObjectFactory;
use crate::link::{LINKS_KEY, Link, LinkSet};
use crate::node::Node;
use crate::path::FieldPath;
use crate::recursive::{DEFAULT_MAX_DEPTH, SerializationContext, circular};
use crate::registry::SchemaRegistry;
use crate::resource::{AttrValue, ObjectRef};
use crate::schema::{FieldBinding, ParseStrategy, Schema};

/// Deserializes documents, resolving named schemas through a registry
///
/// # Examples
///
/// ```
/// use hypercast_core::deserializer::Deserializer;
/// use hypercast_core::factory::RecordFactory;
/// use hypercast_core::node::Node;
/// use hypercast_core::registry::SchemaRegistry;
/// use hypercast_core::schema::Schema;
///
/// let registry = SchemaRegistry::new();
/// let schema = Schema::builder("song").property("title").build().unwrap();
/// let node = Node::from(serde_json::json!({"title": "Fate"}));
///
/// let song = Deserializer::new(&registry)
///     .deserialize(&node, &schema, &RecordFactory)
///     .unwrap();
/// assert_eq!(song.read().get("title").unwrap().as_str(), Some("Fate"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deserializer<'r> {
	registry: &'r SchemaRegistry,
	max_depth: usize,
}

impl<'r> Deserializer<'r> {
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

	/// Creates a new object from `factory` and populates it from `node`
	pub fn deserialize(
		&self,
		node: &Node,
		schema: &Schema,
		factory: &dyn ObjectFactory,
	) -> RepresenterResult<ObjectRef> {
		let target = factory.create(schema);
		self.deserialize_into(node, schema, &target, factory)?;
		Ok(target)
	}

	/// Populates an existing object from `node`
	///
	/// `factory` is used for nested objects that have no existing
	/// counterpart. The attributes of `target` are only written once every
	/// binding has parsed, so a failed call leaves them as they were.
	pub fn deserialize_into(
		&self,
		node: &Node,
		schema: &Schema,
		target: &ObjectRef,
		factory: &dyn ObjectFactory,
	) -> RepresenterResult<()> {
		tracing::debug!(schema_id = schema.id(), "Deserializing object");

		let mut context = SerializationContext::new(self.max_depth);
		self.populate(node, schema, target, factory, &FieldPath::root(), &mut context)
	}

	/// Deserializes a top-level sequence of mappings
	pub fn deserialize_collection(
		&self,
		node: &Node,
		schema: &Schema,
		factory: &dyn ObjectFactory,
	) -> RepresenterResult<Vec<ObjectRef>> {
		let root = FieldPath::root();
		let Node::Sequence(items) = node else {
			return Err(TypeMismatchError::new(&root, "sequence", node.kind()).into());
		};
		tracing::debug!(
			schema_id = schema.id(),
			count = items.len(),
			"Deserializing collection"
		);

		let mut context = SerializationContext::new(self.max_depth);
		items
			.iter()
			.enumerate()
			.map(|(i, item)| -> RepresenterResult<ObjectRef> {
				let target = factory.create(schema);
				self.populate(item, schema, &target, factory, &root.index(i), &mut context)?;
				Ok(target)
			})
			.collect()
	}

	fn populate(
		&self,
		node: &Node,
		schema: &Schema,
		target: &ObjectRef,
		factory: &dyn ObjectFactory,
		path: &FieldPath,
		context: &mut SerializationContext,
	) -> RepresenterResult<()> {
		let Node::Mapping(map) = node else {
			return Err(TypeMismatchError::new(path, "mapping", node.kind()).into());
		};

		circular::visit_with(context, target, |child| -> RepresenterResult<()> {
			// Nothing is written to `target` until every binding has parsed
			let mut values = Vec::with_capacity(map.len());
			for binding in schema.field_bindings() {
				let key = binding.wire_key();
				let Some(value) = map.get(key) else {
					if binding.required {
						return Err(AccessError::MissingField {
							path: path.to_string(),
							key: key.to_string(),
						}
						.into());
					}
					continue;
				};

				let value = self.attr_value(binding, value, target, factory, &path.key(key), child)?;
				values.push((binding.name.as_str(), value));
			}

			let links = match map.get(LINKS_KEY) {
				Some(links) if schema.has_links() => Some(parse_links(links, &path.key(LINKS_KEY))?),
				_ => None,
			};

			let mut guard = target.write();
			for (name, value) in values {
				guard.set(name, value)?;
			}
			if let Some(links) = links {
				guard.set_links(links);
			}
			Ok(())
		})
	}

	fn attr_value(
		&self,
		binding: &FieldBinding,
		value: &Node,
		target: &ObjectRef,
		factory: &dyn ObjectFactory,
		path: &FieldPath,
		context: &mut SerializationContext,
	) -> RepresenterResult<AttrValue> {
		if value.is_null() {
			return Ok(AttrValue::null());
		}

		let factory = binding.factory.as_deref().unwrap_or(factory);
		let sync = binding.strategy == ParseStrategy::Sync;

		match (&binding.nested, binding.collection) {
			(None, false) => scalar_value(value, path),
			(None, true) => sequence_items(value, path)?
				.iter()
				.enumerate()
				.map(|(i, item)| scalar_value(item, &path.index(i)))
				.collect::<RepresenterResult<Vec<_>>>()
				.map(AttrValue::List),
			(Some(nested), false) => {
				let nested = self.registry.resolve_ref(nested)?;
				let existing = if sync {
					existing_value(target, &binding.name).and_then(|v| v.as_object().cloned())
				} else {
					None
				};

				let object = existing.unwrap_or_else(|| factory.create(&nested));
				self.populate(value, &nested, &object, factory, path, context)?;
				Ok(AttrValue::Object(object))
			}
			(Some(nested), true) => {
				let nested = self.registry.resolve_ref(nested)?;
				let items = sequence_items(value, path)?;
				let existing: Vec<AttrValue> = if sync {
					existing_value(target, &binding.name)
						.and_then(|v| v.as_list().map(<[AttrValue]>::to_vec))
						.unwrap_or_default()
				} else {
					Vec::new()
				};

				let mut objects = Vec::with_capacity(items.len());
				for (i, item) in items.iter().enumerate() {
					let object = existing
						.get(i)
						.and_then(|v| v.as_object().cloned())
						.unwrap_or_else(|| factory.create(&nested));
					self.populate(item, &nested, &object, factory, &path.index(i), context)?;
					objects.push(AttrValue::Object(object));
				}
				Ok(AttrValue::List(objects))
			}
		}
	}
}

fn existing_value(target: &ObjectRef, name: &str) -> Option<AttrValue> {
	target.read().get(name)
}

fn scalar_value(value: &Node, path: &FieldPath) -> RepresenterResult<AttrValue> {
	match value {
		Node::Scalar(scalar) => Ok(AttrValue::Scalar(scalar.clone())),
		other => Err(TypeMismatchError::new(path, "scalar", other.kind()).into()),
	}
}

fn sequence_items<'n>(value: &'n Node, path: &FieldPath) -> RepresenterResult<&'n [Node]> {
	match value {
		Node::Sequence(items) => Ok(items),
		other => Err(TypeMismatchError::new(path, "sequence", other.kind()).into()),
	}
}

fn parse_links(node: &Node, path: &FieldPath) -> RepresenterResult<LinkSet> {
	let items = sequence_items(node, path)?;
	let mut links = LinkSet::new();
	for (i, item) in items.iter().enumerate() {
		let item_path = path.index(i);
		let field = |name: &str| -> RepresenterResult<String> {
			match item.get(name) {
				Some(Node::Scalar(scalar)) if scalar.as_str().is_some() => {
					Ok(scalar.to_string())
				}
				Some(other) => {
					Err(TypeMismatchError::new(item_path.key(name), "string", other.kind()).into())
				}
				None if item.as_mapping().is_none() => {
					Err(TypeMismatchError::new(&item_path, "mapping", item.kind()).into())
				}
				None => Err(AccessError::MissingField {
					path: item_path.to_string(),
					key: name.to_string(),
				}
				.into()),
			}
		};
		links.push(Link::new(field("rel")?, field("href")?));
	}
	Ok(links)
}
