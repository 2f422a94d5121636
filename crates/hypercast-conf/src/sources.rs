//! Configuration sources for layered settings
//!
//! Sources are merged in priority order (environment variables > settings
//! files > defaults). Each source yields a map of top-level keys; nested
//! tables such as `collection_json` merge key by key.

use std::fs;
use std::path::PathBuf;

use hypercast_formats::Format;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{SettingsError, SettingsResult};
use crate::settings::RepresenterSettings;

/// Default prefix of environment variables
pub const ENV_PREFIX: &str = "HYPERCAST_";

/// Separator between nested keys in environment variable names
pub const ENV_NESTING_SEPARATOR: &str = "__";

/// Trait for configuration sources
pub trait SettingsSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> SettingsResult<IndexMap<String, Value>>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Default values configuration source
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	/// Source holding [`RepresenterSettings::default`]
	pub fn new() -> Self {
		Self::from_settings(&RepresenterSettings::default())
	}

	/// Source holding the fields of `settings`
	pub fn from_settings(settings: &RepresenterSettings) -> Self {
		let values = match serde_json::to_value(settings) {
			Ok(Value::Object(map)) => map.into_iter().collect(),
			_ => IndexMap::new(),
		};
		Self { values }
	}

	/// Overrides one default value
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_conf::sources::{DefaultSource, SettingsSource};
	/// use serde_json::Value;
	///
	/// let source = DefaultSource::new().with_value("pretty", Value::Bool(true));
	/// assert_eq!(source.load().unwrap()["pretty"], Value::Bool(true));
	/// ```
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl SettingsSource for DefaultSource {
	fn load(&self) -> SettingsResult<IndexMap<String, Value>> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

enum TomlOrigin {
	File { path: PathBuf, required: bool },
	Inline(String),
}

/// TOML configuration source
pub struct TomlSource {
	origin: TomlOrigin,
}

impl TomlSource {
	/// Reads a TOML file; a missing file contributes nothing
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_conf::sources::{SettingsSource, TomlSource};
	///
	/// let source = TomlSource::file("does-not-exist.toml");
	/// assert!(source.load().unwrap().is_empty());
	/// ```
	pub fn file(path: impl Into<PathBuf>) -> Self {
		Self {
			origin: TomlOrigin::File {
				path: path.into(),
				required: false,
			},
		}
	}

	/// Reads a TOML file that must exist
	pub fn required_file(path: impl Into<PathBuf>) -> Self {
		Self {
			origin: TomlOrigin::File {
				path: path.into(),
				required: true,
			},
		}
	}

	/// Parses TOML text held in memory
	pub fn string(content: impl Into<String>) -> Self {
		Self {
			origin: TomlOrigin::Inline(content.into()),
		}
	}
}

impl SettingsSource for TomlSource {
	fn load(&self) -> SettingsResult<IndexMap<String, Value>> {
		let content = match &self.origin {
			TomlOrigin::File { path, required } => {
				if !path.exists() {
					if *required {
						return Err(SettingsError::InvalidSource(format!(
							"settings file not found: {}",
							path.display()
						)));
					}
					return Ok(IndexMap::new());
				}
				fs::read_to_string(path)?
			}
			TomlOrigin::Inline(content) => content.clone(),
		};

		let toml_value: toml::Table = toml::from_str(&content)?;
		let json_value = serde_json::to_value(toml_value)?;

		match json_value {
			Value::Object(map) => Ok(map.into_iter().collect()),
			_ => Err(SettingsError::InvalidSource(
				"Expected table at root".to_string(),
			)),
		}
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		match &self.origin {
			TomlOrigin::File { path, .. } => format!("TOML file: {}", path.display()),
			TomlOrigin::Inline(_) => "TOML string".to_string(),
		}
	}
}

/// Environment variable configuration source
///
/// `HYPERCAST_FORMAT=hal` sets `format`; a double underscore descends into a
/// table, so `HYPERCAST_COLLECTION_JSON__HREF` sets `collection_json.href`.
pub struct EnvSource {
	prefix: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Reads variables prefixed with [`ENV_PREFIX`]
	pub fn new() -> Self {
		Self {
			prefix: ENV_PREFIX.to_string(),
			vars: None,
		}
	}

	/// Set the prefix filter for environment variables
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Reads from the given pairs instead of the process environment
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_conf::sources::{EnvSource, SettingsSource};
	/// use serde_json::json;
	///
	/// let source = EnvSource::new().with_vars([
	///     ("HYPERCAST_FORMAT", "HAL"),
	///     ("HYPERCAST_MAX_DEPTH", "8"),
	///     ("HYPERCAST_COLLECTION_JSON__HREF", "http://localhost/songs/"),
	///     ("HOME", "/root"),
	/// ]);
	/// let config = source.load().unwrap();
	///
	/// assert_eq!(config["format"], json!("hal"));
	/// assert_eq!(config["max_depth"], json!(8));
	/// assert_eq!(config["collection_json"], json!({"href": "http://localhost/songs/"}));
	/// assert!(!config.contains_key("home"));
	/// ```
	pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.vars = Some(
			vars.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		);
		self
	}

	fn vars(&self) -> Vec<(String, String)> {
		match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl SettingsSource for EnvSource {
	fn load(&self) -> SettingsResult<IndexMap<String, Value>> {
		let mut config = IndexMap::new();

		for (key, value) in self.vars() {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};

			let path: Vec<String> = clean_key
				.to_lowercase()
				.split(ENV_NESTING_SEPARATOR)
				.map(str::to_string)
				.collect();
			if path.iter().any(String::is_empty) {
				continue;
			}

			let dotted = path.join(".");
			let parsed_value = parse_env_value(&dotted, &value)?;
			insert_nested(&mut config, &path, parsed_value);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

fn parse_env_value(key: &str, value: &str) -> SettingsResult<Value> {
	match key {
		"format" => {
			let format = Format::from_name(value)?;
			Ok(Value::String(format.name().to_string()))
		}
		"pretty" => parse_bool(value)
			.map(Value::Bool)
			.ok_or_else(|| SettingsError::invalid_value(key, format!("'{}' is not a boolean", value))),
		"max_depth" => value
			.trim()
			.parse::<u64>()
			.map(|n| Value::Number(n.into()))
			.map_err(|_| {
				SettingsError::invalid_value(key, format!("'{}' is not a positive integer", value))
			}),
		_ => Ok(Value::String(value.to_string())),
	}
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`
fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

fn insert_nested(config: &mut IndexMap<String, Value>, path: &[String], value: Value) {
	let Some((first, rest)) = path.split_first() else {
		return;
	};
	if rest.is_empty() {
		config.insert(first.clone(), value);
		return;
	}

	let entry = config
		.entry(first.clone())
		.or_insert_with(|| Value::Object(Map::new()));
	insert_into(entry, rest, value);
}

fn insert_into(target: &mut Value, path: &[String], value: Value) {
	if !target.is_object() {
		*target = Value::Object(Map::new());
	}
	let (Value::Object(map), Some((first, rest))) = (target, path.split_first()) else {
		return;
	};
	if rest.is_empty() {
		map.insert(first.clone(), value);
		return;
	}

	let entry = map
		.entry(first.clone())
		.or_insert_with(|| Value::Object(Map::new()));
	insert_into(entry, rest, value);
}
