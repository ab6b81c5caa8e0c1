//! Error types for the graph view.

use thiserror::Error;

use super::model::MAX_MINLEN;

/// Errors raised while updating, registering or mounting a graph view.
#[derive(Debug, Error)]
pub enum GraphError {
	/// The GraphSpec payload could not be decoded.
	#[error("malformed graph data: {0}")]
	Parse(#[from] serde_json::Error),

	/// An edge references a node that is neither in the model nor in the
	/// same update.
	#[error("edge {from} -> {to} references unknown node '{missing}'")]
	DanglingEdge {
		/// Source node id of the edge.
		from: String,
		/// Target node id of the edge.
		to: String,
		/// The endpoint that could not be found.
		missing: String,
	},

	/// A node carries a size attribute that cannot be laid out.
	#[error("node '{id}' has invalid {field}: {value}")]
	InvalidDimension {
		/// Node id.
		id: String,
		/// Attribute name, e.g. `width`.
		field: &'static str,
		/// Rejected value.
		value: f64,
	},

	/// An edge asks for more ranks between its endpoints than allowed.
	#[error("edge {from} -> {to} has minlen {value}, maximum is {MAX_MINLEN}")]
	MinlenOutOfRange {
		/// Source node id of the edge.
		from: String,
		/// Target node id of the edge.
		to: String,
		/// Rejected value.
		value: u32,
	},

	/// Tag name is not a valid custom element name.
	#[error("invalid custom element name '{0}'")]
	InvalidTagName(String),

	/// Tag name was already defined in the registry.
	#[error("element '{0}' has already been defined")]
	AlreadyDefined(String),

	/// No factory is registered for the tag name.
	#[error("no element registered as '{0}'")]
	UnknownElement(String),

	/// A browser DOM call failed.
	#[error("DOM error: {0}")]
	Dom(String),
}

/// Result alias for graph view operations.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let error = GraphError::DanglingEdge {
			from: "a".into(),
			to: "x".into(),
			missing: "x".into(),
		};
		assert_eq!(
			error.to_string(),
			"edge a -> x references unknown node 'x'"
		);

		let error = GraphError::InvalidDimension {
			id: "a".into(),
			field: "width",
			value: -3.0,
		};
		assert_eq!(error.to_string(), "node 'a' has invalid width: -3");

		let error = GraphError::MinlenOutOfRange {
			from: "a".into(),
			to: "b".into(),
			value: 3_000_000,
		};
		assert_eq!(
			error.to_string(),
			"edge a -> b has minlen 3000000, maximum is 64"
		);

		let error = GraphError::AlreadyDefined("graph-view".into());
		assert_eq!(
			error.to_string(),
			"element 'graph-view' has already been defined"
		);
	}

	#[test]
	fn test_parse_error_converts() {
		let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let error: GraphError = parse.into();
		assert!(matches!(error, GraphError::Parse(_)));
		assert!(error.to_string().starts_with("malformed graph data"));
	}
}
