//! Schema registry.
//!
//! Schemas are published under an identifier and resolved by it later,
//! including nested schemas referenced by id. Publishing again under an
//! existing id is an explicit [`SchemaRegistry::replace`], which keeps every
//! earlier version reachable through [`SchemaRegistry::resolve_version`].

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{FieldBinding, Schema, SchemaRef};

/// Process-wide registry.
static GLOBAL_REGISTRY: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::new);

/// Registered schemas, keyed by id, each with its version history.
///
/// Reads take a shared lock; registration and replacement take the write
/// lock.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
	schemas: RwLock<IndexMap<String, Vec<Arc<Schema>>>>,
}

impl SchemaRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the process-wide registry.
	pub fn global() -> &'static SchemaRegistry {
		&GLOBAL_REGISTRY
	}

	/// Registers a schema built from `bindings`.
	///
	/// # Errors
	///
	/// Returns [`SchemaError::DuplicateSchema`] when `schema_id` is already
	/// registered and [`SchemaError::InvalidBinding`] when a binding is
	/// malformed.
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_core::registry::SchemaRegistry;
	/// use hypercast_core::schema::FieldBinding;
	///
	/// let registry = SchemaRegistry::new();
	/// registry.register("song", vec![FieldBinding::property("title")]).unwrap();
	///
	/// assert!(registry.register("song", vec![]).is_err());
	/// assert_eq!(registry.resolve("song").unwrap().len(), 1);
	/// ```
	pub fn register(
		&self,
		schema_id: impl Into<String>,
		bindings: Vec<FieldBinding>,
	) -> SchemaResult<Arc<Schema>> {
		let schema_id = schema_id.into();
		if self.contains(&schema_id) {
			return Err(SchemaError::DuplicateSchema(schema_id));
		}
		self.register_schema(Schema::new(schema_id, bindings)?)
	}

	/// Registers an already built schema under its own id.
	pub fn register_schema(&self, schema: Schema) -> SchemaResult<Arc<Schema>> {
		let mut schemas = self.schemas.write();
		if schemas.contains_key(schema.id()) {
			return Err(SchemaError::DuplicateSchema(schema.id().to_string()));
		}

		let schema = Arc::new(schema);
		schemas.insert(schema.id().to_string(), vec![schema.clone()]);
		tracing::debug!(schema_id = schema.id(), bindings = schema.len(), "Registered schema");
		Ok(schema)
	}

	/// Publishes a new version of an existing schema.
	///
	/// Returns the new version number.
	///
	/// # Errors
	///
	/// Returns [`SchemaError::UnknownSchema`] when `schema_id` was never
	/// registered.
	pub fn replace(
		&self,
		schema_id: impl Into<String>,
		bindings: Vec<FieldBinding>,
	) -> SchemaResult<u32> {
		self.replace_schema(Schema::new(schema_id, bindings)?)
	}

	/// Publishes an already built schema as the next version of its id.
	pub fn replace_schema(&self, schema: Schema) -> SchemaResult<u32> {
		let mut schemas = self.schemas.write();
		let Some(versions) = schemas.get_mut(schema.id()) else {
			return Err(SchemaError::UnknownSchema(schema.id().to_string()));
		};

		versions.push(Arc::new(schema));
		let version = versions.len() as u32;
		tracing::debug!(
			schema_id = versions[versions.len() - 1].id(),
			version,
			"Replaced schema"
		);
		Ok(version)
	}

	/// Returns the latest version of a schema.
	///
	/// # Errors
	///
	/// Returns [`SchemaError::UnknownSchema`] when nothing is registered
	/// under `schema_id`.
	pub fn resolve(&self, schema_id: &str) -> SchemaResult<Arc<Schema>> {
		self.schemas
			.read()
			.get(schema_id)
			.and_then(|versions| versions.last().cloned())
			.ok_or_else(|| SchemaError::UnknownSchema(schema_id.to_string()))
	}

	/// Returns a specific version of a schema; versions start at 1.
	pub fn resolve_version(&self, schema_id: &str, version: u32) -> SchemaResult<Arc<Schema>> {
		let schemas = self.schemas.read();
		let versions = schemas
			.get(schema_id)
			.ok_or_else(|| SchemaError::UnknownSchema(schema_id.to_string()))?;

		(version as usize)
			.checked_sub(1)
			.and_then(|index| versions.get(index).cloned())
			.ok_or_else(|| SchemaError::UnknownVersion {
				schema_id: schema_id.to_string(),
				version,
			})
	}

	/// Resolves a nested schema reference.
	pub fn resolve_ref(&self, schema_ref: &SchemaRef) -> SchemaResult<Arc<Schema>> {
		match schema_ref {
			SchemaRef::Inline(schema) => Ok(schema.clone()),
			SchemaRef::Named(id) => self.resolve(id),
		}
	}

	/// Current version of a schema, if registered.
	pub fn version(&self, schema_id: &str) -> Option<u32> {
		self.schemas
			.read()
			.get(schema_id)
			.map(|versions| versions.len() as u32)
	}

	pub fn contains(&self, schema_id: &str) -> bool {
		self.schemas.read().contains_key(schema_id)
	}

	/// Registered ids in registration order.
	pub fn schema_ids(&self) -> Vec<String> {
		self.schemas.read().keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.schemas.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.schemas.read().is_empty()
	}

	/// Removes every schema.
	///
	/// This is primarily useful for testing.
	pub fn clear(&self) {
		self.schemas.write().clear();
	}
}
