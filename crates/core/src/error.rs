//! Error types for the dimtable core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend operation that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackendOp {
	Begin,
	Select,
	Cancel,
}

impl fmt::Display for BackendOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			BackendOp::Begin => "begin",
			BackendOp::Select => "select",
			BackendOp::Cancel => "cancel",
		};
		f.write_str(name)
	}
}

/// Errors surfaced by the render path, configuration and backend clients.
///
/// Backend errors never leave the engine: they are logged and swallowed there.
/// The variant exists so that [`crate::backend::SelectionBackend`]
/// implementations have something typed to reject with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Layout object is missing data the render path needs.
	#[error("Invalid layout: {0}")]
	InvalidLayout(String),

	/// Hypercube shape cannot be shown as a dimension/measure table.
	#[error("Unsupported hypercube shape: {dimensions} dimension(s), {measures} measure(s)")]
	UnsupportedShape { dimensions: usize, measures: usize },

	/// A backend selection call rejected.
	#[error("Backend {op} failed: {message}")]
	Backend { op: BackendOp, message: String },

	/// Configuration parsed but holds an unusable value.
	#[error("Invalid configuration: {0}")]
	Config(String),

	/// Configuration JSON did not match the expected shape.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Shorthand for a backend rejection.
	pub fn backend(op: BackendOp, message: impl Into<String>) -> Self {
		Error::Backend {
			op,
			message: message.into(),
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn backend_error_names_operation() {
		let err = Error::backend(BackendOp::Cancel, "engine went away");
		assert_eq!(err.to_string(), "Backend cancel failed: engine went away");
	}

	#[test]
	fn shape_error_reports_counts() {
		let err = Error::UnsupportedShape { dimensions: 0, measures: 2 };
		assert!(err.to_string().contains("0 dimension(s), 2 measure(s)"));
	}
}
