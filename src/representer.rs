//! A schema bound to a codec and a registry at the call site.

use std::fmt;
use std::sync::Arc;

use hypercast_core::{
	DEFAULT_MAX_DEPTH, Deserializer, LinkResolutionError, Node, ObjectFactory, ObjectRef,
	RecordFactory, Schema, SchemaRegistry, Serialized, Serializer,
};
use hypercast_formats::{Codec, Format};
use serde_json::Value;

use crate::error::{HypercastError, HypercastResult};

/// Output of a render call
///
/// Links whose template failed are left out of `output` and reported in
/// `warnings`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<T = String> {
	pub output: T,
	pub warnings: Vec<LinkResolutionError>,
}

impl<T> Rendered<T> {
	pub fn has_warnings(&self) -> bool {
		!self.warnings.is_empty()
	}

	pub fn into_output(self) -> T {
		self.output
	}
}

impl fmt::Display for Rendered<String> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.output)
	}
}

/// Renders and parses objects of one schema in one wire format
///
/// # Examples
///
/// ```
/// use hypercast::prelude::*;
///
/// let registry = SchemaRegistry::new();
/// let schema = Schema::builder("song").property("title").build().unwrap();
/// let representer = Representer::new(schema).with_registry(&registry);
///
/// let song = Record::new().with("title", "Fate").into_ref();
/// let rendered = representer.render(&song).unwrap();
/// assert_eq!(rendered.output, r#"{"title":"Fate"}"#);
/// assert!(!rendered.has_warnings());
///
/// let parsed = representer.parse(r#"{"title":"Roxanne"}"#).unwrap();
/// assert_eq!(parsed.read().string("title").unwrap(), "Roxanne");
/// ```
pub struct Representer<'r> {
	schema: Arc<Schema>,
	registry: &'r SchemaRegistry,
	codec: Box<dyn Codec>,
	factory: Arc<dyn ObjectFactory>,
	pretty: bool,
	max_depth: usize,
}

impl Representer<'static> {
	/// Plain JSON representer resolving named schemas in the global registry
	pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
		Self {
			schema: schema.into(),
			registry: SchemaRegistry::global(),
			codec: Format::Json.codec(),
			factory: Arc::new(RecordFactory),
			pretty: false,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}

	/// Representer for the latest version of a globally registered schema
	pub fn for_id(schema_id: &str) -> HypercastResult<Self> {
		let schema = SchemaRegistry::global().resolve(schema_id)?;
		Ok(Self::new(schema))
	}

	/// Representer configured from loaded settings
	#[cfg(feature = "conf")]
	pub fn from_settings(
		schema: impl Into<Arc<Schema>>,
		settings: &hypercast_conf::RepresenterSettings,
	) -> Self {
		Self::new(schema).with_settings(settings)
	}
}

impl<'r> Representer<'r> {
	/// Representer for the latest version of a schema registered in `registry`
	pub fn in_registry(registry: &'r SchemaRegistry, schema_id: &str) -> HypercastResult<Self> {
		let schema = registry.resolve(schema_id)?;
		Ok(Representer::new(schema).with_registry(registry))
	}

	/// Resolves named schemas in `registry` instead
	pub fn with_registry<'a>(self, registry: &'a SchemaRegistry) -> Representer<'a> {
		Representer {
			schema: self.schema,
			registry,
			codec: self.codec,
			factory: self.factory,
			pretty: self.pretty,
			max_depth: self.max_depth,
		}
	}

	/// Switches to the default codec of `format`
	pub fn with_format(mut self, format: Format) -> Self {
		self.codec = format.codec();
		self
	}

	/// Switches to the codec negotiated for a `Content-Type` or `Accept` value
	pub fn with_media_type(self, media_type: &str) -> HypercastResult<Self> {
		let format = Format::from_media_type(media_type)?;
		Ok(self.with_format(format))
	}

	/// Uses a configured codec, such as a Collection+JSON codec with queries
	pub fn with_codec(mut self, codec: impl Codec + 'static) -> Self {
		self.codec = Box::new(codec);
		self
	}

	/// Factory for objects created while parsing
	pub fn with_factory(mut self, factory: impl ObjectFactory + 'static) -> Self {
		self.factory = Arc::new(factory);
		self
	}

	pub fn pretty(mut self, pretty: bool) -> Self {
		self.pretty = pretty;
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	/// Applies format, indentation, depth limit and Collection+JSON options
	#[cfg(feature = "conf")]
	pub fn with_settings(mut self, settings: &hypercast_conf::RepresenterSettings) -> Self {
		self.codec = settings.codec();
		self.pretty = settings.pretty;
		self.max_depth = settings.max_depth;
		self
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn format(&self) -> Format {
		self.codec.format()
	}

	pub fn media_type(&self) -> &'static str {
		self.codec.media_type()
	}

	fn serializer(&self) -> Serializer<'r> {
		Serializer::new(self.registry).with_max_depth(self.max_depth)
	}

	fn deserializer(&self) -> Deserializer<'r> {
		Deserializer::new(self.registry).with_max_depth(self.max_depth)
	}

	/// Serializes `object` into the format-neutral tree
	///
	/// Link failures are returned as warnings next to the partial tree.
	pub fn to_node(&self, object: &ObjectRef) -> HypercastResult<Serialized> {
		Ok(self.serializer().serialize(object, &self.schema)?)
	}

	/// Serializes and encodes `object` without writing text
	pub fn to_value(&self, object: &ObjectRef) -> HypercastResult<Rendered<Value>> {
		let Serialized { node, warnings } = self.to_node(object)?;
		let output = self.codec.encode(&node, &self.schema, self.registry)?;
		Ok(Rendered { output, warnings })
	}

	/// Renders `object` as a document
	pub fn render(&self, object: &ObjectRef) -> HypercastResult<Rendered> {
		let serialized = self.to_node(object)?;
		self.write(serialized)
	}

	/// Renders a list of objects as one document
	pub fn render_collection(&self, objects: &[ObjectRef]) -> HypercastResult<Rendered> {
		let serialized = self
			.serializer()
			.serialize_collection(objects, &self.schema)?;
		self.write(serialized)
	}

	fn write(&self, serialized: Serialized) -> HypercastResult<Rendered> {
		let Serialized { node, warnings } = serialized;
		tracing::debug!(
			schema_id = self.schema.id(),
			media_type = self.media_type(),
			pretty = self.pretty,
			"Rendering document"
		);
		let output = if self.pretty {
			self.codec.to_string_pretty(&node, &self.schema, self.registry)?
		} else {
			self.codec.to_string(&node, &self.schema, self.registry)?
		};
		Ok(Rendered { output, warnings })
	}

	fn read(&self, input: &str) -> HypercastResult<Node> {
		Ok(self.codec.from_str(input, &self.schema, self.registry)?)
	}

	/// Parses a document into a new object
	///
	/// A Collection+JSON document must hold exactly one item.
	pub fn parse(&self, input: &str) -> HypercastResult<ObjectRef> {
		let node = self.single(self.read(input)?)?;
		Ok(self
			.deserializer()
			.deserialize(&node, &self.schema, self.factory.as_ref())?)
	}

	/// Parses a document into an existing object
	///
	/// Bindings declared with the sync strategy update the nested objects
	/// `target` already holds.
	pub fn parse_into(&self, input: &str, target: &ObjectRef) -> HypercastResult<()> {
		let node = self.single(self.read(input)?)?;
		self.deserializer()
			.deserialize_into(&node, &self.schema, target, self.factory.as_ref())?;
		Ok(())
	}

	/// Parses a document holding a list of objects
	///
	/// A Collection+JSON template submission yields one object.
	pub fn parse_collection(&self, input: &str) -> HypercastResult<Vec<ObjectRef>> {
		let node = match self.read(input)? {
			mapping @ Node::Mapping(_) if self.format() == Format::CollectionJson => {
				Node::Sequence(vec![mapping])
			}
			node => node,
		};
		Ok(self
			.deserializer()
			.deserialize_collection(&node, &self.schema, self.factory.as_ref())?)
	}

	/// Unwraps the single item of a Collection+JSON document
	fn single(&self, node: Node) -> HypercastResult<Node> {
		if self.format() != Format::CollectionJson {
			return Ok(node);
		}
		match node {
			Node::Sequence(mut items) if items.len() == 1 => Ok(items.remove(0)),
			Node::Sequence(items) => Err(HypercastError::NotSingleItem(items.len())),
			node => Ok(node),
		}
	}
}

impl fmt::Debug for Representer<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Representer")
			.field("schema", &self.schema.id())
			.field("codec", &self.codec)
			.field("pretty", &self.pretty)
			.field("max_depth", &self.max_depth)
			.finish()
	}
}
