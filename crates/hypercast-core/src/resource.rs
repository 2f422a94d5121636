//! Object model the engine reads from and writes to
//!
//! A [`Resource`] exposes named attributes. Nested objects are shared handles
//! ([`ObjectRef`]), so identity is pointer identity and survives in-place
//! updates. [`Record`] is an open-struct resource that accepts any attribute.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::AccessError;
use crate::link::LinkSet;
use crate::node::Scalar;

/// Shared handle to a resource
pub type ObjectRef = Arc<RwLock<dyn Resource>>;

/// Wraps a resource into a shared handle
///
/// # Examples
///
/// ```
/// use hypercast_core::resource::{object, Record};
///
/// let song = object(Record::new().with("title", "Fate"));
/// assert!(song.read().get("title").is_some());
/// ```
pub fn object<R: Resource>(resource: R) -> ObjectRef {
	Arc::new(RwLock::new(resource))
}

/// Returns true when both handles point at the same object
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
	Arc::ptr_eq(a, b)
}

/// Address of the object behind a handle, stable for the handle's lifetime
pub fn object_address(object: &ObjectRef) -> usize {
	Arc::as_ptr(object) as *const () as usize
}

/// Value of a single attribute
#[derive(Clone)]
pub enum AttrValue {
	/// Scalar attribute (including `Null`)
	Scalar(Scalar),
	/// List of values (scalars or objects)
	List(Vec<AttrValue>),
	/// Nested object
	Object(ObjectRef),
}

impl AttrValue {
	/// Shape name used in error messages (`scalar`, `list`, `object`)
	pub fn kind(&self) -> &'static str {
		match self {
			AttrValue::Scalar(_) => "scalar",
			AttrValue::List(_) => "list",
			AttrValue::Object(_) => "object",
		}
	}

	pub fn null() -> Self {
		AttrValue::Scalar(Scalar::Null)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, AttrValue::Scalar(Scalar::Null))
	}

	/// Builds a list from anything convertible into attribute values
	pub fn list<I, V>(items: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<AttrValue>,
	{
		AttrValue::List(items.into_iter().map(Into::into).collect())
	}

	pub fn as_scalar(&self) -> Option<&Scalar> {
		match self {
			AttrValue::Scalar(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		self.as_scalar().and_then(Scalar::as_str)
	}

	pub fn as_list(&self) -> Option<&[AttrValue]> {
		match self {
			AttrValue::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&ObjectRef> {
		match self {
			AttrValue::Object(obj) => Some(obj),
			_ => None,
		}
	}

	/// Objects held by a list attribute, in order
	pub fn objects(&self) -> Vec<ObjectRef> {
		match self {
			AttrValue::List(items) => items
				.iter()
				.filter_map(|item| item.as_object().cloned())
				.collect(),
			_ => Vec::new(),
		}
	}
}

impl fmt::Debug for AttrValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttrValue::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
			AttrValue::List(items) => f.debug_tuple("List").field(items).finish(),
			AttrValue::Object(obj) => write!(f, "Object(0x{:x})", object_address(obj)),
		}
	}
}

/// Scalars compare by value, objects by identity
impl PartialEq for AttrValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(AttrValue::Scalar(a), AttrValue::Scalar(b)) => a == b,
			(AttrValue::List(a), AttrValue::List(b)) => a == b,
			(AttrValue::Object(a), AttrValue::Object(b)) => same_object(a, b),
			_ => false,
		}
	}
}

impl<T: Into<Scalar>> From<T> for AttrValue {
	fn from(value: T) -> Self {
		AttrValue::Scalar(value.into())
	}
}

impl From<ObjectRef> for AttrValue {
	fn from(value: ObjectRef) -> Self {
		AttrValue::Object(value)
	}
}

impl From<Vec<AttrValue>> for AttrValue {
	fn from(value: Vec<AttrValue>) -> Self {
		AttrValue::List(value)
	}
}

/// An object whose attributes can be read and written by name
///
/// `get` returns `None` when the object has no such attribute at all; an
/// attribute that exists but holds nothing returns `Some(AttrValue::Scalar(Scalar::Null))`.
pub trait Resource: Send + Sync + fmt::Debug + 'static {
	/// Reads an attribute
	fn get(&self, name: &str) -> Option<AttrValue>;

	/// Writes an attribute
	fn set(&mut self, name: &str, value: AttrValue) -> Result<(), AccessError>;

	/// Links parsed from the last document read into this object
	fn links(&self) -> Option<&LinkSet> {
		None
	}

	/// Stores links parsed from a document; ignored by default
	fn set_links(&mut self, _links: LinkSet) {}
}

/// Convenience readers for link templates and callers
pub trait ResourceExt: Resource {
	/// Reads a scalar attribute as a display string
	///
	/// Fails with a message when the attribute is absent, null or not a
	/// scalar, which makes it usable with `?` inside link templates.
	fn string(&self, name: &str) -> Result<String, String> {
		match self.get(name) {
			Some(AttrValue::Scalar(Scalar::Null)) | None => {
				Err(format!("attribute '{}' is not set", name))
			}
			Some(AttrValue::Scalar(s)) => Ok(s.to_string()),
			Some(other) => Err(format!("attribute '{}' is a {}", name, other.kind())),
		}
	}

	/// Reads a scalar attribute
	fn scalar(&self, name: &str) -> Option<Scalar> {
		match self.get(name) {
			Some(AttrValue::Scalar(s)) => Some(s),
			_ => None,
		}
	}
}

impl<T: Resource + ?Sized> ResourceExt for T {}

/// Open-struct resource that accepts any attribute
///
/// Attribute order is insertion order.
///
/// # Examples
///
/// ```
/// use hypercast_core::resource::{AttrValue, Record, Resource};
///
/// let song = Record::new()
///     .with("title", "Roxanne")
///     .with("composers", AttrValue::list(["Sting", "Stu Copeland"]));
/// assert_eq!(song.field("title").and_then(|v| v.as_str()), Some("Roxanne"));
/// assert_eq!(song.get("composers").unwrap().as_list().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
	fields: IndexMap<String, AttrValue>,
	links: LinkSet,
}

impl Record {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style attribute assignment
	pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
		self.fields.insert(name.into(), value.into());
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
		self.fields.insert(name.into(), value.into());
	}

	pub fn field(&self, name: &str) -> Option<&AttrValue> {
		self.fields.get(name)
	}

	pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
		self.fields.shift_remove(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Wraps the record into a shared handle
	pub fn into_ref(self) -> ObjectRef {
		object(self)
	}
}

impl Resource for Record {
	fn get(&self, name: &str) -> Option<AttrValue> {
		self.fields.get(name).cloned()
	}

	fn set(&mut self, name: &str, value: AttrValue) -> Result<(), AccessError> {
		self.fields.insert(name.to_string(), value);
		Ok(())
	}

	fn links(&self) -> Option<&LinkSet> {
		Some(&self.links)
	}

	fn set_links(&mut self, links: LinkSet) {
		self.links = links;
	}
}
