//! Custom element registry.
//!
//! Maps element tag names to factories. Each tag can be defined once; names
//! follow the custom element naming rules (lowercase ASCII letter first, at
//! least one hyphen, no uppercase letters, not a reserved name).

use std::collections::BTreeMap;

use log::info;

use super::error::{GraphError, Result};
use super::lifecycle::TAG_NAME;
use super::view::GraphView;

/// Builds a fresh element instance.
pub type ElementFactory = fn() -> GraphView;

const RESERVED_NAMES: &[&str] = &[
	"annotation-xml",
	"color-profile",
	"font-face",
	"font-face-src",
	"font-face-uri",
	"font-face-format",
	"font-face-name",
	"missing-glyph",
];

/// Check a custom element name.
pub fn validate_tag_name(tag: &str) -> Result<()> {
	let valid = tag.chars().next().is_some_and(|c| c.is_ascii_lowercase())
		&& tag.contains('-')
		&& !tag.chars().any(|c| c.is_ascii_uppercase())
		&& !RESERVED_NAMES.contains(&tag);
	if valid {
		Ok(())
	} else {
		Err(GraphError::InvalidTagName(tag.to_string()))
	}
}

/// Tag name to factory map for custom elements.
#[derive(Clone, Debug, Default)]
pub struct ElementRegistry {
	definitions: BTreeMap<String, ElementFactory>,
}

impl ElementRegistry {
	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `factory` under `tag`.
	///
	/// Fails with [`GraphError::InvalidTagName`] or [`GraphError::AlreadyDefined`].
	pub fn define(&mut self, tag: &str, factory: ElementFactory) -> Result<()> {
		validate_tag_name(tag)?;
		if self.definitions.contains_key(tag) {
			return Err(GraphError::AlreadyDefined(tag.to_string()));
		}
		self.definitions.insert(tag.to_string(), factory);
		info!("registry: defined <{}>", tag);
		Ok(())
	}

	/// Whether `tag` has been defined.
	pub fn is_defined(&self, tag: &str) -> bool {
		self.definitions.contains_key(tag)
	}

	/// Instantiate the element registered as `tag`.
	pub fn create(&self, tag: &str) -> Result<GraphView> {
		self.definitions
			.get(tag)
			.map(|factory| factory())
			.ok_or_else(|| GraphError::UnknownElement(tag.to_string()))
	}

	/// Defined tags in sorted order.
	pub fn tags(&self) -> impl Iterator<Item = &str> {
		self.definitions.keys().map(String::as_str)
	}
}

/// Define the `graph-view` element in `registry`.
pub fn register(registry: &mut ElementRegistry) -> Result<()> {
	registry.define(TAG_NAME, GraphView::default)
}
