//! Schemas and field bindings
//!
//! A [`Schema`] is an ordered list of [`FieldBinding`]s. Schemas are built
//! explicitly (usually through [`Schema::builder`]) and are immutable once
//! built; nested schemas are referenced either inline or by registered id.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::factory::{ObjectFactory, TypedFactory};
use crate::link::{LINKS_KEY, LinkTemplate};
use crate::resource::Resource;

/// How nested objects are produced while deserializing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
	/// Every nested mapping becomes a new object from the factory
	#[default]
	Create,
	/// Existing nested objects are updated in place, matched by position
	Sync,
}

/// Reference to a nested schema
#[derive(Debug, Clone)]
pub enum SchemaRef {
	/// Schema carried by the binding itself
	Inline(Arc<Schema>),
	/// Schema looked up in the registry at call time
	Named(String),
}

impl SchemaRef {
	/// Identifier of the referenced schema
	pub fn id(&self) -> &str {
		match self {
			SchemaRef::Inline(schema) => schema.id(),
			SchemaRef::Named(id) => id,
		}
	}
}

impl From<Schema> for SchemaRef {
	fn from(schema: Schema) -> Self {
		SchemaRef::Inline(Arc::new(schema))
	}
}

impl From<Arc<Schema>> for SchemaRef {
	fn from(schema: Arc<Schema>) -> Self {
		SchemaRef::Inline(schema)
	}
}

/// One schema entry describing how to read and write a single field
///
/// # Examples
///
/// ```
/// use hypercast_core::schema::FieldBinding;
///
/// let title = FieldBinding::property("title").key("name").required();
/// assert_eq!(title.wire_key(), "name");
/// assert!(title.required);
/// ```
#[derive(Clone)]
pub struct FieldBinding {
	/// Attribute name on the object (link relation for link bindings)
	pub name: String,
	/// Wire key, when different from `name`
	pub key: Option<String>,
	/// The attribute holds a list
	pub collection: bool,
	/// Schema of the nested object(s)
	pub nested: Option<SchemaRef>,
	/// Href template; set only on link bindings
	pub link: Option<LinkTemplate>,
	/// Serializing an absent attribute skips it instead of failing
	pub optional: bool,
	/// Deserializing a document without this key fails
	pub required: bool,
	/// Null values are left out of the output instead of written as `null`
	pub skip_nil: bool,
	/// Parse strategy for nested objects
	pub strategy: ParseStrategy,
	/// Factory for nested objects, overriding the call-level one
	pub factory: Option<Arc<dyn ObjectFactory>>,
	/// HAL places this field under `_embedded`
	pub embedded: bool,
	/// Collection+JSON template prompt
	pub prompt: Option<String>,
}

impl FieldBinding {
	fn base(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			key: None,
			collection: false,
			nested: None,
			link: None,
			optional: false,
			required: false,
			skip_nil: false,
			strategy: ParseStrategy::Create,
			factory: None,
			embedded: false,
			prompt: None,
		}
	}

	/// A single-valued field
	pub fn property(name: impl Into<String>) -> Self {
		Self::base(name)
	}

	/// A list-valued field
	pub fn collection(name: impl Into<String>) -> Self {
		Self {
			collection: true,
			..Self::base(name)
		}
	}

	/// A hypermedia link whose href is computed from the object
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_core::resource::ResourceExt;
	/// use hypercast_core::schema::FieldBinding;
	///
	/// let link = FieldBinding::link("self", |song| {
	///     Ok(format!("http://songs/{}", song.string("title")?))
	/// });
	/// assert!(link.is_link());
	/// ```
	pub fn link<F>(rel: impl Into<String>, template: F) -> Self
	where
		F: Fn(&dyn Resource) -> Result<String, String> + Send + Sync + 'static,
	{
		Self {
			link: Some(LinkTemplate::new(template)),
			..Self::base(rel)
		}
	}

	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Nests a schema, inline or by reference
	pub fn nested(mut self, schema: impl Into<SchemaRef>) -> Self {
		self.nested = Some(schema.into());
		self
	}

	/// Nests a schema resolved through the registry by id
	pub fn nested_id(mut self, schema_id: impl Into<String>) -> Self {
		self.nested = Some(SchemaRef::Named(schema_id.into()));
		self
	}

	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Omits the key when the attribute holds `Null`
	///
	/// A document written this way parses back with the attribute unset.
	pub fn skip_nil(mut self) -> Self {
		self.skip_nil = true;
		self
	}

	/// Shorthand for `strategy(ParseStrategy::Sync)`
	pub fn sync(self) -> Self {
		self.strategy(ParseStrategy::Sync)
	}

	pub fn strategy(mut self, strategy: ParseStrategy) -> Self {
		self.strategy = strategy;
		self
	}

	pub fn factory(mut self, factory: impl ObjectFactory + 'static) -> Self {
		self.factory = Some(Arc::new(factory));
		self
	}

	/// Builds nested objects with `R::default()`
	pub fn factory_of<R: Resource + Default>(self) -> Self {
		self.factory(TypedFactory::<R>::new())
	}

	pub fn embedded(mut self) -> Self {
		self.embedded = true;
		self
	}

	pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
		self.prompt = Some(prompt.into());
		self
	}

	/// Key used in the document
	pub fn wire_key(&self) -> &str {
		self.key.as_deref().unwrap_or(&self.name)
	}

	pub fn is_link(&self) -> bool {
		self.link.is_some()
	}

	pub fn is_nested(&self) -> bool {
		self.nested.is_some()
	}
}

impl fmt::Debug for FieldBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldBinding")
			.field("name", &self.name)
			.field("key", &self.key)
			.field("collection", &self.collection)
			.field("nested", &self.nested.as_ref().map(SchemaRef::id))
			.field("link", &self.link.is_some())
			.field("optional", &self.optional)
			.field("required", &self.required)
			.field("skip_nil", &self.skip_nil)
			.field("strategy", &self.strategy)
			.field("factory", &self.factory.is_some())
			.field("embedded", &self.embedded)
			.field("prompt", &self.prompt)
			.finish()
	}
}

/// Ordered bindings describing one representation
#[derive(Debug, Clone)]
pub struct Schema {
	id: String,
	bindings: Vec<FieldBinding>,
}

impl Schema {
	/// Builds a schema, validating its bindings
	///
	/// Fails when a binding name is empty or duplicated, when a link binding
	/// is a collection or nested, or when a field uses the `links` key while
	/// the schema also declares links.
	pub fn new(id: impl Into<String>, bindings: Vec<FieldBinding>) -> SchemaResult<Self> {
		let id = id.into();
		validate(&id, &bindings)?;
		Ok(Self { id, bindings })
	}

	/// Starts a builder
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_core::schema::Schema;
	///
	/// let album = Schema::builder("album")
	///     .property("title")
	///     .inline_collection("songs", |song| song.property("title"))
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(album.len(), 2);
	/// assert_eq!(album.binding("songs").unwrap().nested.as_ref().unwrap().id(), "album.songs");
	/// ```
	pub fn builder(id: impl Into<String>) -> SchemaBuilder {
		SchemaBuilder::new(id)
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn bindings(&self) -> &[FieldBinding] {
		&self.bindings
	}

	pub fn binding(&self, name: &str) -> Option<&FieldBinding> {
		self.bindings.iter().find(|b| b.name == name)
	}

	/// Property and collection bindings, in order
	pub fn field_bindings(&self) -> impl Iterator<Item = &FieldBinding> {
		self.bindings.iter().filter(|b| !b.is_link())
	}

	/// Link bindings, in order
	pub fn link_bindings(&self) -> impl Iterator<Item = &FieldBinding> {
		self.bindings.iter().filter(|b| b.is_link())
	}

	pub fn has_links(&self) -> bool {
		self.bindings.iter().any(FieldBinding::is_link)
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}

fn validate(schema_id: &str, bindings: &[FieldBinding]) -> SchemaResult<()> {
	let invalid = |message: String| SchemaError::InvalidBinding {
		schema_id: schema_id.to_string(),
		message,
	};

	let has_links = bindings.iter().any(FieldBinding::is_link);
	let mut names = HashSet::new();
	let mut keys = HashSet::new();

	for binding in bindings {
		if binding.name.is_empty() {
			return Err(invalid("binding name is empty".to_string()));
		}
		if !names.insert(binding.name.as_str()) {
			return Err(invalid(format!("duplicate binding '{}'", binding.name)));
		}

		if binding.is_link() {
			if binding.collection || binding.is_nested() {
				return Err(invalid(format!(
					"link '{}' cannot be a collection or nested",
					binding.name
				)));
			}
			continue;
		}

		let key = binding.wire_key();
		if key.is_empty() {
			return Err(invalid(format!("binding '{}' has an empty key", binding.name)));
		}
		if !keys.insert(key) {
			return Err(invalid(format!("duplicate key '{}'", key)));
		}
		if has_links && key == LINKS_KEY {
			return Err(invalid(format!(
				"key '{}' is reserved for links",
				LINKS_KEY
			)));
		}
	}

	Ok(())
}

/// Builder for [`Schema`]
#[derive(Debug)]
pub struct SchemaBuilder {
	id: String,
	bindings: Vec<FieldBinding>,
	error: Option<SchemaError>,
}

impl SchemaBuilder {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			bindings: Vec::new(),
			error: None,
		}
	}

	pub fn property(self, name: impl Into<String>) -> Self {
		self.binding(FieldBinding::property(name))
	}

	pub fn collection(self, name: impl Into<String>) -> Self {
		self.binding(FieldBinding::collection(name))
	}

	pub fn link<F>(self, rel: impl Into<String>, template: F) -> Self
	where
		F: Fn(&dyn Resource) -> Result<String, String> + Send + Sync + 'static,
	{
		self.binding(FieldBinding::link(rel, template))
	}

	/// Adds a fully configured binding
	pub fn binding(mut self, binding: FieldBinding) -> Self {
		self.bindings.push(binding);
		self
	}

	/// Adds a property with an inline nested schema named `<id>.<name>`
	pub fn inline_property<F>(self, name: impl Into<String>, nested: F) -> Self
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		self.inline(FieldBinding::property(name), nested)
	}

	/// Adds a collection with an inline nested schema named `<id>.<name>`
	pub fn inline_collection<F>(self, name: impl Into<String>, nested: F) -> Self
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		self.inline(FieldBinding::collection(name), nested)
	}

	fn inline<F>(mut self, binding: FieldBinding, nested: F) -> Self
	where
		F: FnOnce(SchemaBuilder) -> SchemaBuilder,
	{
		let nested_id = format!("{}.{}", self.id, binding.name);
		match nested(SchemaBuilder::new(nested_id)).build() {
			Ok(schema) => self.binding(binding.nested(schema)),
			Err(e) => {
				self.error.get_or_insert(e);
				self
			}
		}
	}

	pub fn build(self) -> SchemaResult<Schema> {
		if let Some(error) = self.error {
			return Err(error);
		}
		Schema::new(self.id, self.bindings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::ResourceExt;
	use rstest::rstest;

	#[rstest]
	fn test_builder_keeps_binding_order() {
		let schema = Schema::builder("song")
			.property("title")
			.property("track")
			.collection("composers")
			.build()
			.unwrap();

		let names: Vec<_> = schema.bindings().iter().map(|b| b.name.as_str()).collect();
		assert_eq!(names, vec!["title", "track", "composers"]);
		assert!(schema.binding("composers").unwrap().collection);
	}

	#[rstest]
	#[case(vec![FieldBinding::property("")], "binding name is empty")]
	#[case(
		vec![FieldBinding::property("title"), FieldBinding::collection("title")],
		"duplicate binding 'title'"
	)]
	#[case(
		vec![FieldBinding::property("title"), FieldBinding::property("name").key("title")],
		"duplicate key 'title'"
	)]
	fn test_invalid_bindings(#[case] bindings: Vec<FieldBinding>, #[case] expected: &str) {
		let err = Schema::new("song", bindings).unwrap_err();
		assert_eq!(
			err,
			SchemaError::InvalidBinding {
				schema_id: "song".to_string(),
				message: expected.to_string(),
			}
		);
	}

	#[rstest]
	fn test_links_key_reserved_only_with_links() {
		let plain = Schema::builder("page").property("links").build();
		assert!(plain.is_ok());

		let linked = Schema::builder("page")
			.property("links")
			.link("self", |_| Ok("/".to_string()))
			.build();
		assert!(matches!(linked, Err(SchemaError::InvalidBinding { .. })));
	}

	#[rstest]
	fn test_link_binding_cannot_be_nested() {
		let song = Schema::builder("song").property("title").build().unwrap();
		let err = Schema::new(
			"album",
			vec![FieldBinding::link("self", |_| Ok("/".to_string())).nested(song)],
		);
		assert!(err.is_err());
	}

	#[rstest]
	fn test_link_and_field_bindings_split() {
		let schema = Schema::builder("song")
			.property("title")
			.link("self", |s| Ok(format!("/songs/{}", s.string("title")?)))
			.build()
			.unwrap();

		assert!(schema.has_links());
		assert_eq!(schema.field_bindings().count(), 1);
		assert_eq!(schema.link_bindings().next().unwrap().name, "self");
	}

	#[rstest]
	fn test_inline_schema_error_surfaces_on_build() {
		let result = Schema::builder("album")
			.inline_collection("songs", |song| song.property("title").property("title"))
			.build();

		assert_eq!(
			result.unwrap_err(),
			SchemaError::InvalidBinding {
				schema_id: "album.songs".to_string(),
				message: "duplicate binding 'title'".to_string(),
			}
		);
	}

	#[rstest]
	fn test_binding_modifiers() {
		let binding = FieldBinding::collection("songs")
			.nested_id("song")
			.sync()
			.embedded()
			.optional();

		assert_eq!(binding.strategy, ParseStrategy::Sync);
		assert!(binding.embedded && binding.optional && binding.is_nested());
		assert_eq!(binding.nested.as_ref().unwrap().id(), "song");
	}
}
