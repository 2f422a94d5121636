//! Assembles [`RepresenterSettings`] from prioritized sources.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::SettingsResult;
use crate::settings::RepresenterSettings;
use crate::sources::{DefaultSource, EnvSource, SettingsSource, TomlSource};

/// Builder merging configuration sources into settings
///
/// Sources are applied from the lowest to the highest priority; between
/// sources of equal priority, the one added last wins. Tables merge key by
/// key, every other value is replaced whole.
///
/// # Examples
///
/// ```
/// use hypercast_conf::SettingsBuilder;
/// use hypercast_conf::sources::{EnvSource, TomlSource};
/// use hypercast_formats::Format;
///
/// let settings = SettingsBuilder::new()
///     .add_source(TomlSource::string("format = \"hal\"\npretty = true"))
///     .add_source(EnvSource::new().with_vars([("HYPERCAST_PRETTY", "false")]))
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.format, Format::Hal);
/// assert!(!settings.pretty);
/// ```
pub struct SettingsBuilder {
	sources: Vec<Box<dyn SettingsSource>>,
}

impl SettingsBuilder {
	/// Builder holding only the default values
	pub fn new() -> Self {
		Self {
			sources: vec![Box::new(DefaultSource::new())],
		}
	}

	/// Defaults, then the optional file, then `HYPERCAST_*` variables
	pub fn standard(path: impl Into<PathBuf>) -> Self {
		Self::new()
			.add_source(TomlSource::file(path))
			.add_source(EnvSource::new())
	}

	pub fn add_source<S: SettingsSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Descriptions of the sources in merge order
	pub fn describe(&self) -> Vec<String> {
		self.ordered().iter().map(|s| s.description()).collect()
	}

	fn ordered(&self) -> Vec<&dyn SettingsSource> {
		let mut sources: Vec<&dyn SettingsSource> = self.sources.iter().map(|s| s.as_ref()).collect();
		sources.sort_by_key(|s| s.priority());
		sources
	}

	/// Merged raw values, before deserialization
	pub fn merged(&self) -> SettingsResult<IndexMap<String, Value>> {
		let mut merged = IndexMap::new();
		for source in self.ordered() {
			let values = source.load()?;
			tracing::debug!(
				source = %source.description(),
				keys = values.len(),
				"loaded settings source"
			);
			for (key, value) in values {
				match merged.get_mut(&key) {
					Some(existing) => merge_value(existing, value),
					None => {
						merged.insert(key, value);
					}
				}
			}
		}
		Ok(merged)
	}

	/// Merges every source and validates the result
	pub fn build(self) -> SettingsResult<RepresenterSettings> {
		let merged = self.merged()?;
		let settings: RepresenterSettings =
			serde_json::from_value(Value::Object(merged.into_iter().collect()))?;
		settings.validate()?;
		tracing::debug!(
			format = %settings.format,
			pretty = settings.pretty,
			max_depth = settings.max_depth,
			"settings loaded"
		);
		Ok(settings)
	}
}

impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn merge_value(existing: &mut Value, incoming: Value) {
	match (existing, incoming) {
		(Value::Object(existing), Value::Object(incoming)) => {
			for (key, value) in incoming {
				match existing.get_mut(&key) {
					Some(slot) => merge_value(slot, value),
					None => {
						existing.insert(key, value);
					}
				}
			}
		}
		(existing, incoming) => *existing = incoming,
	}
}
