//! Object construction for deserialization
//!
//! The deserializer asks a factory for a fresh object whenever a nested
//! mapping has no existing target. A binding may carry its own factory, which
//! takes precedence over the one passed to the call.

use std::fmt;
use std::marker::PhantomData;

use crate::resource::{ObjectRef, Record, Resource, object};
use crate::schema::Schema;

/// Produces empty objects for a schema
pub trait ObjectFactory: Send + Sync {
	/// Creates a new, empty object for `schema`
	fn create(&self, schema: &Schema) -> ObjectRef;
}

impl<F> ObjectFactory for F
where
	F: Fn(&Schema) -> ObjectRef + Send + Sync,
{
	fn create(&self, schema: &Schema) -> ObjectRef {
		self(schema)
	}
}

/// Creates an empty [`Record`] for every schema
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordFactory;

impl ObjectFactory for RecordFactory {
	fn create(&self, _schema: &Schema) -> ObjectRef {
		object(Record::new())
	}
}

/// Creates `R::default()` regardless of the schema
///
/// # Examples
///
/// ```
/// use hypercast_core::factory::{ObjectFactory, TypedFactory};
/// use hypercast_core::resource::Record;
/// use hypercast_core::schema::Schema;
///
/// let schema = Schema::builder("song").property("title").build().unwrap();
/// let factory = TypedFactory::<Record>::new();
/// let song = factory.create(&schema);
/// assert!(song.read().get("title").is_none());
/// ```
pub struct TypedFactory<R> {
	_phantom: PhantomData<fn() -> R>,
}

impl<R> TypedFactory<R> {
	pub fn new() -> Self {
		Self {
			_phantom: PhantomData,
		}
	}
}

impl<R> Default for TypedFactory<R> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R> fmt::Debug for TypedFactory<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypedFactory<{}>", std::any::type_name::<R>())
	}
}

impl<R: Resource + Default> ObjectFactory for TypedFactory<R> {
	fn create(&self, _schema: &Schema) -> ObjectRef {
		object(R::default())
	}
}
