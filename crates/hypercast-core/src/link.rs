//! Hypermedia links
//!
//! A link binding carries a [`LinkTemplate`]: a closure evaluated with the
//! object being serialized as its context. The resolved [`Link`]s are emitted
//! under the reserved `links` key and parsed back into a [`LinkSet`] when a
//! document is read.

use std::fmt;
use std::ops::Index;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LinkResolutionError;
use crate::resource::Resource;
use crate::schema::FieldBinding;

/// Reserved mapping key holding resolved links
///
/// The serializer writes this entry after every field binding, wherever the
/// link bindings sit in the schema.
pub const LINKS_KEY: &str = "links";

/// A resolved hypermedia link
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
	/// Link relation (`self`, `next`, `download`, ...)
	pub rel: String,
	/// Resolved target
	pub href: String,
}

impl Link {
	pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
		Self {
			rel: rel.into(),
			href: href.into(),
		}
	}
}

/// Ordered links, addressable by relation
///
/// Inserting a link whose relation is already present replaces the earlier
/// one in place.
///
/// # Examples
///
/// ```
/// use hypercast_core::link::{Link, LinkSet};
///
/// let mut links = LinkSet::new();
/// links.push(Link::new("self", "http://songs/Roxanne"));
/// assert_eq!(links["self"].href, "http://songs/Roxanne");
/// assert!(links.get("next").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
	links: Vec<Link>,
}

impl LinkSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a link, replacing any link with the same relation
	pub fn push(&mut self, link: Link) {
		match self.links.iter_mut().find(|l| l.rel == link.rel) {
			Some(existing) => *existing = link,
			None => self.links.push(link),
		}
	}

	pub fn get(&self, rel: &str) -> Option<&Link> {
		self.links.iter().find(|l| l.rel == rel)
	}

	/// Returns the href of the given relation
	pub fn href(&self, rel: &str) -> Option<&str> {
		self.get(rel).map(|l| l.href.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = &Link> {
		self.links.iter()
	}

	pub fn rels(&self) -> Vec<&str> {
		self.links.iter().map(|l| l.rel.as_str()).collect()
	}

	pub fn len(&self) -> usize {
		self.links.len()
	}

	pub fn is_empty(&self) -> bool {
		self.links.is_empty()
	}
}

impl Index<&str> for LinkSet {
	type Output = Link;

	fn index(&self, rel: &str) -> &Link {
		self.get(rel)
			.unwrap_or_else(|| panic!("no link with relation '{}'", rel))
	}
}

impl FromIterator<Link> for LinkSet {
	fn from_iter<I: IntoIterator<Item = Link>>(iter: I) -> Self {
		let mut set = LinkSet::new();
		for link in iter {
			set.push(link);
		}
		set
	}
}

impl IntoIterator for LinkSet {
	type Item = Link;
	type IntoIter = std::vec::IntoIter<Link>;

	fn into_iter(self) -> Self::IntoIter {
		self.links.into_iter()
	}
}

impl<'a> IntoIterator for &'a LinkSet {
	type Item = &'a Link;
	type IntoIter = std::slice::Iter<'a, Link>;

	fn into_iter(self) -> Self::IntoIter {
		self.links.iter()
	}
}

type LinkFn = dyn Fn(&dyn Resource) -> Result<String, String> + Send + Sync;

/// Closure computing an href from the object being serialized
///
/// Templates report failure with an `Err` message; a panicking template is
/// reported the same way.
#[derive(Clone)]
pub struct LinkTemplate(Arc<LinkFn>);

impl LinkTemplate {
	pub fn new<F>(template: F) -> Self
	where
		F: Fn(&dyn Resource) -> Result<String, String> + Send + Sync + 'static,
	{
		Self(Arc::new(template))
	}

	/// Evaluates the template against a resource
	pub fn evaluate(&self, resource: &dyn Resource) -> Result<String, String> {
		(self.0)(resource)
	}
}

impl fmt::Debug for LinkTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("LinkTemplate(..)")
	}
}

/// Resolves every link binding against `object`
///
/// Bindings without a template are ignored. A failing template never aborts
/// the others: its error is returned next to the links that did resolve.
pub fn resolve_links<'a, I>(object: &dyn Resource, link_bindings: I) -> (LinkSet, Vec<LinkResolutionError>)
where
	I: IntoIterator<Item = &'a FieldBinding>,
{
	let mut links = LinkSet::new();
	let mut errors = Vec::new();

	for binding in link_bindings {
		let Some(template) = binding.link.as_ref() else {
			continue;
		};

		let outcome = catch_unwind(AssertUnwindSafe(|| template.evaluate(object)));
		match outcome {
			Ok(Ok(href)) => links.push(Link::new(binding.name.clone(), href)),
			Ok(Err(message)) => errors.push(LinkResolutionError {
				rel: binding.name.clone(),
				message,
			}),
			Err(panic) => errors.push(LinkResolutionError {
				rel: binding.name.clone(),
				message: panic_message(panic.as_ref()),
			}),
		}
	}

	(links, errors)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		format!("template panicked: {}", s)
	} else if let Some(s) = payload.downcast_ref::<String>() {
		format!("template panicked: {}", s)
	} else {
		"template panicked".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::resource::{Record, ResourceExt};
	use rstest::rstest;

	fn song(title: &str) -> Record {
		Record::new().with("title", title)
	}

	#[rstest]
	fn test_link_set_replaces_same_rel() {
		let mut links = LinkSet::new();
		links.push(Link::new("self", "/a"));
		links.push(Link::new("next", "/b"));
		links.push(Link::new("self", "/c"));

		assert_eq!(links.len(), 2);
		assert_eq!(links.rels(), vec!["self", "next"]);
		assert_eq!(links.href("self"), Some("/c"));
	}

	#[rstest]
	fn test_resolve_links_in_binding_order() {
		let bindings = vec![
			FieldBinding::link("self", |s| Ok(format!("http://songs/{}", s.string("title")?))),
			FieldBinding::link("download", |s| {
				Ok(format!("//songs/{}.mp3", s.string("title")?))
			}),
		];

		let (links, errors) = resolve_links(&song("Roxanne"), &bindings);

		assert!(errors.is_empty());
		assert_eq!(links.rels(), vec!["self", "download"]);
		assert_eq!(links["self"].href, "http://songs/Roxanne");
		assert_eq!(links["download"].href, "//songs/Roxanne.mp3");
	}

	#[rstest]
	fn test_failed_template_does_not_abort_others() {
		let bindings = vec![
			FieldBinding::link("artist", |s| Ok(format!("/artists/{}", s.string("artist")?))),
			FieldBinding::link("self", |s| Ok(format!("/songs/{}", s.string("title")?))),
		];

		let (links, errors) = resolve_links(&song("Fate"), &bindings);

		assert_eq!(links.rels(), vec!["self"]);
		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].rel, "artist");
	}

	#[rstest]
	fn test_panicking_template_is_captured() {
		let bindings = vec![FieldBinding::link("self", |_| panic!("boom"))];

		let (links, errors) = resolve_links(&song("Fate"), &bindings);

		assert!(links.is_empty());
		assert_eq!(errors[0].message, "template panicked: boom");
	}
}
