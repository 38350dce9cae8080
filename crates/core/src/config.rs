//! Engine configuration.
//!
//! Every field has a default so hosts may pass a partial object (or nothing).

use serde::{Deserialize, Serialize};

use dimtable_protocol::DEFAULT_SELECTION_PATH;

use crate::error::{Error, Result};

pub const DEFAULT_MEASURE_PLACEHOLDER: &str = "-";
pub const DEFAULT_ERROR_MESSAGE: &str = "Unable to render the table";

/// Tunables for the selection engine and the table view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
	/// Property path passed to every backend selection call.
	pub selection_path: String,
	/// Hypercube column whose values are selected.
	pub dimension_column: usize,
	/// Text shown when a row has no measure cell.
	pub measure_placeholder: String,
	/// Message shown in place of the table when rendering fails.
	pub error_message: String,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			selection_path: DEFAULT_SELECTION_PATH.to_string(),
			dimension_column: 0,
			measure_placeholder: DEFAULT_MEASURE_PLACEHOLDER.to_string(),
			error_message: DEFAULT_ERROR_MESSAGE.to_string(),
		}
	}
}

impl EngineConfig {
	/// Parses a JSON object, filling absent fields with defaults.
	pub fn from_json_str(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Rejects values the engine cannot work with.
	pub fn validate(&self) -> Result<()> {
		if self.selection_path.is_empty() {
			return Err(Error::Config("selectionPath must not be empty".to_string()));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_host_conventions() {
		let config = EngineConfig::default();
		assert_eq!(config.selection_path, "/qHyperCubeDef");
		assert_eq!(config.dimension_column, 0);
		assert_eq!(config.measure_placeholder, "-");
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let config = EngineConfig::from_json_str(r#"{"measurePlaceholder": "n/a"}"#).unwrap();
		assert_eq!(config.measure_placeholder, "n/a");
		assert_eq!(config.selection_path, DEFAULT_SELECTION_PATH);
	}

	#[test]
	fn empty_selection_path_is_rejected() {
		let err = EngineConfig::from_json_str(r#"{"selectionPath": ""}"#).unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}

	#[test]
	fn malformed_json_keeps_the_parser_error() {
		let err = EngineConfig::from_json_str("{").unwrap_err();
		assert!(matches!(err, Error::Json(_)));
		assert!(err.to_string().starts_with("JSON error:"));
	}

	#[test]
	fn wrong_field_type_is_a_json_error() {
		let err = EngineConfig::from_json_str(r#"{"dimensionColumn": "first"}"#).unwrap_err();
		assert!(matches!(err, Error::Json(_)));
	}
}
