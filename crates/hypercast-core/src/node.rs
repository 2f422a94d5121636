//! Wire-neutral document tree
//!
//! Every serialize call produces a [`Node`] and every deserialize call consumes
//! one. Codecs translate between this tree and a concrete wire format.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// Leaf value of a document tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
	/// Absent value (`null` on the wire)
	#[default]
	Null,
	/// Boolean value
	Bool(bool),
	/// Signed integer value
	Int(i64),
	/// Floating point value
	Float(f64),
	/// String value
	String(String),
}

impl Scalar {
	/// Name of the variant, used in error messages
	pub fn kind(&self) -> &'static str {
		match self {
			Scalar::Null => "null",
			Scalar::Bool(_) => "bool",
			Scalar::Int(_) => "int",
			Scalar::Float(_) => "float",
			Scalar::String(_) => "string",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Scalar::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Scalar::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Scalar::Int(i) => Some(*i),
			_ => None,
		}
	}

	/// Returns the value as a float, widening integers
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Scalar::Float(f) => Some(*f),
			Scalar::Int(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Scalar::Bool(b) => Some(*b),
			_ => None,
		}
	}
}

impl std::fmt::Display for Scalar {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Scalar::Null => write!(f, ""),
			Scalar::Bool(b) => write!(f, "{}", b),
			Scalar::Int(i) => write!(f, "{}", i),
			Scalar::Float(x) => write!(f, "{}", x),
			Scalar::String(s) => write!(f, "{}", s),
		}
	}
}

impl From<&str> for Scalar {
	fn from(value: &str) -> Self {
		Scalar::String(value.to_string())
	}
}

impl From<String> for Scalar {
	fn from(value: String) -> Self {
		Scalar::String(value)
	}
}

impl From<bool> for Scalar {
	fn from(value: bool) -> Self {
		Scalar::Bool(value)
	}
}

impl From<i64> for Scalar {
	fn from(value: i64) -> Self {
		Scalar::Int(value)
	}
}

impl From<i32> for Scalar {
	fn from(value: i32) -> Self {
		Scalar::Int(i64::from(value))
	}
}

impl From<u32> for Scalar {
	fn from(value: u32) -> Self {
		Scalar::Int(i64::from(value))
	}
}

impl From<f64> for Scalar {
	fn from(value: f64) -> Self {
		Scalar::Float(value)
	}
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Scalar::Null)
	}
}

/// Generic document node
///
/// Mappings keep insertion order, so a serialized object lists its fields in
/// binding order.
///
/// # Examples
///
/// ```
/// use hypercast_core::node::{Node, Scalar};
///
/// let node = Node::mapping([("title", Node::from("Fate"))]);
/// assert_eq!(node.get("title"), Some(&Node::Scalar(Scalar::from("Fate"))));
/// assert_eq!(serde_json::Value::from(&node).to_string(), r#"{"title":"Fate"}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	/// Leaf value
	Scalar(Scalar),
	/// Ordered list of nodes
	Sequence(Vec<Node>),
	/// Ordered key to node map
	Mapping(IndexMap<String, Node>),
}

impl Node {
	/// A `null` leaf
	pub fn null() -> Self {
		Node::Scalar(Scalar::Null)
	}

	/// Builds a mapping from key/node pairs, keeping their order
	pub fn mapping<K, I>(entries: I) -> Self
	where
		K: Into<String>,
		I: IntoIterator<Item = (K, Node)>,
	{
		Node::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}

	/// Builds a sequence from nodes
	pub fn sequence<I: IntoIterator<Item = Node>>(items: I) -> Self {
		Node::Sequence(items.into_iter().collect())
	}

	/// Shape name used in error messages (`scalar`, `sequence`, `mapping`)
	pub fn kind(&self) -> &'static str {
		match self {
			Node::Scalar(_) => "scalar",
			Node::Sequence(_) => "sequence",
			Node::Mapping(_) => "mapping",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Node::Scalar(Scalar::Null))
	}

	pub fn as_scalar(&self) -> Option<&Scalar> {
		match self {
			Node::Scalar(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_sequence(&self) -> Option<&[Node]> {
		match self {
			Node::Sequence(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
		match self {
			Node::Mapping(map) => Some(map),
			_ => None,
		}
	}

	/// Looks up a key when this node is a mapping
	pub fn get(&self, key: &str) -> Option<&Node> {
		self.as_mapping().and_then(|map| map.get(key))
	}

	/// Returns the string content of a scalar leaf
	pub fn as_str(&self) -> Option<&str> {
		self.as_scalar().and_then(Scalar::as_str)
	}
}

impl From<Scalar> for Node {
	fn from(value: Scalar) -> Self {
		Node::Scalar(value)
	}
}

impl From<&str> for Node {
	fn from(value: &str) -> Self {
		Node::Scalar(value.into())
	}
}

impl From<String> for Node {
	fn from(value: String) -> Self {
		Node::Scalar(value.into())
	}
}

impl From<i64> for Node {
	fn from(value: i64) -> Self {
		Node::Scalar(value.into())
	}
}

impl From<bool> for Node {
	fn from(value: bool) -> Self {
		Node::Scalar(value.into())
	}
}

impl From<Value> for Node {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Node::null(),
			Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
			Value::Number(n) => match n.as_i64() {
				Some(i) => Node::Scalar(Scalar::Int(i)),
				// u64 beyond i64::MAX and real numbers both land here
				None => Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
			},
			Value::String(s) => Node::Scalar(Scalar::String(s)),
			Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
			Value::Object(map) => {
				Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
			}
		}
	}
}

impl From<&Scalar> for Value {
	fn from(value: &Scalar) -> Self {
		match value {
			Scalar::Null => Value::Null,
			Scalar::Bool(b) => Value::Bool(*b),
			Scalar::Int(i) => Value::Number((*i).into()),
			// Non-finite floats have no JSON spelling
			Scalar::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
			Scalar::String(s) => Value::String(s.clone()),
		}
	}
}

impl From<&Node> for Value {
	fn from(value: &Node) -> Self {
		match value {
			Node::Scalar(s) => Value::from(s),
			Node::Sequence(items) => Value::Array(items.iter().map(Value::from).collect()),
			Node::Mapping(map) => {
				let mut object = Map::with_capacity(map.len());
				for (key, node) in map {
					object.insert(key.clone(), Value::from(node));
				}
				Value::Object(object)
			}
		}
	}
}
