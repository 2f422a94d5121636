//! Recursion guard for walking object graphs
//!
//! Object identity is the address of the shared handle, so two handles to the
//! same object count as one visit.

use std::collections::HashSet;

use crate::resource::{ObjectRef, object_address};

/// Default nesting limit for serialize and deserialize calls
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Tracks nesting depth and the objects on the current path
#[derive(Debug, Clone)]
pub struct SerializationContext {
	/// Current depth level (0 = root)
	current_depth: usize,
	/// Maximum allowed depth
	max_depth: usize,
	/// Addresses of the objects being walked, root to current
	visited: HashSet<usize>,
}

impl SerializationContext {
	/// Create a new context
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_core::recursive::SerializationContext;
	///
	/// let context = SerializationContext::new(3);
	/// assert_eq!(context.current_depth(), 0);
	/// assert_eq!(context.max_depth(), 3);
	/// ```
	pub fn new(max_depth: usize) -> Self {
		Self {
			current_depth: 0,
			max_depth,
			visited: HashSet::new(),
		}
	}

	pub fn current_depth(&self) -> usize {
		self.current_depth
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Check if we can go deeper
	pub fn can_go_deeper(&self) -> bool {
		self.current_depth < self.max_depth
	}

	/// Marks an object as being walked
	///
	/// Returns `false` when the object is already on the current path.
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_core::recursive::SerializationContext;
	/// use hypercast_core::resource::Record;
	///
	/// let song = Record::new().into_ref();
	/// let alias = song.clone();
	///
	/// let mut context = SerializationContext::new(5);
	/// assert!(context.visit(&song));
	/// assert!(!context.visit(&alias));
	/// ```
	pub fn visit(&mut self, object: &ObjectRef) -> bool {
		self.visited.insert(object_address(object))
	}

	/// Unmarks an object once its subtree is done
	pub fn leave(&mut self, object: &ObjectRef) {
		self.visited.remove(&object_address(object));
	}

	/// Create a child context with increased depth
	pub fn child(&self) -> Self {
		Self {
			current_depth: self.current_depth + 1,
			max_depth: self.max_depth,
			visited: self.visited.clone(),
		}
	}
}

impl Default for SerializationContext {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_DEPTH)
	}
}

/// Result type for recursion checks
pub type RecursiveResult<T> = Result<T, RecursiveError>;

/// Errors raised by the recursion guard
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecursiveError {
	/// Maximum depth exceeded
	MaxDepthExceeded {
		current_depth: usize,
		max_depth: usize,
	},
	/// An object was reached again from inside its own subtree
	CircularReference { object_id: String },
}

impl std::fmt::Display for RecursiveError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RecursiveError::MaxDepthExceeded {
				current_depth,
				max_depth,
			} => write!(
				f,
				"Maximum depth exceeded: current={}, max={}",
				current_depth, max_depth
			),
			RecursiveError::CircularReference { object_id } => {
				write!(f, "Circular reference detected: {}", object_id)
			}
		}
	}
}

impl std::error::Error for RecursiveError {}

/// Helper functions for circular reference detection
pub mod circular {
	use super::*;

	/// Walks into an object and runs `f` with a child context
	///
	/// The object is unmarked again once `f` returns, whether it succeeded or
	/// not, so siblings may share the same object.
	///
	/// # Examples
	///
	/// ```
	/// use hypercast_core::recursive::{RecursiveError, SerializationContext, circular};
	/// use hypercast_core::resource::Record;
	///
	/// let song = Record::new().into_ref();
	/// let mut context = SerializationContext::new(5);
	///
	/// let result: Result<_, RecursiveError> =
	///     circular::visit_with(&mut context, &song, |child| Ok(child.current_depth()));
	///
	/// assert_eq!(result.unwrap(), 1);
	/// assert!(context.visit(&song));
	/// ```
	pub fn visit_with<F, R, E>(
		context: &mut SerializationContext,
		object: &ObjectRef,
		f: F,
	) -> Result<R, E>
	where
		F: FnOnce(&mut SerializationContext) -> Result<R, E>,
		E: From<RecursiveError>,
	{
		if !context.visit(object) {
			return Err(RecursiveError::CircularReference {
				object_id: format!("0x{:x}", object_address(object)),
			}
			.into());
		}

		if !context.can_go_deeper() {
			context.leave(object);
			return Err(RecursiveError::MaxDepthExceeded {
				current_depth: context.current_depth(),
				max_depth: context.max_depth(),
			}
			.into());
		}

		let mut child_context = context.child();
		let result = f(&mut child_context);

		context.leave(object);
		result
	}
}
