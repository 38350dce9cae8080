//! Hypercube layout shapes.
//!
//! Field names follow the host's `q`-prefixed camelCase convention, e.g.
//! `qHyperCube.qDataPages[0].qMatrix[row][col].qElemNumber`.

use serde::{Deserialize, Serialize};

/// Selection path of the hypercube definition inside the object properties.
pub const DEFAULT_SELECTION_PATH: &str = "/qHyperCubeDef";

/// Root layout object delivered on each render.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub q_info: Option<ObjectInfo>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub q_hyper_cube: Option<HyperCube>,
	#[serde(default)]
	pub q_selection_info: SelectionInfo,
}

/// Identity of the generic object backing the visualization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectInfo {
	#[serde(default)]
	pub q_id: String,
	#[serde(default)]
	pub q_type: String,
}

/// Whether the object is currently in selection mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInfo {
	#[serde(default)]
	pub q_in_selections: bool,
}

/// Calculated hypercube: headers plus the fetched data pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperCube {
	#[serde(default)]
	pub q_dimension_info: Vec<DimensionInfo>,
	#[serde(default)]
	pub q_measure_info: Vec<MeasureInfo>,
	#[serde(default)]
	pub q_data_pages: Vec<DataPage>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub q_size: Option<Size>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionInfo {
	#[serde(default)]
	pub q_fallback_title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureInfo {
	#[serde(default)]
	pub q_fallback_title: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
	pub q_cx: u32,
	pub q_cy: u32,
}

/// One fetched page of the data matrix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPage {
	#[serde(default)]
	pub q_matrix: Vec<Vec<Cell>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub q_area: Option<Area>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
	pub q_left: u32,
	pub q_top: u32,
	pub q_width: u32,
	pub q_height: u32,
}

/// A single matrix cell.
///
/// `q_text` is the display text; `q_elem_number` is the element identity of a
/// dimension value. Measure cells carry an identity too, but it has no meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub q_text: Option<String>,
	#[serde(default)]
	pub q_elem_number: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub q_state: Option<String>,
}

impl Cell {
	/// Dimension cell with text and identity.
	pub fn dimension(text: impl Into<String>, elem: i64) -> Self {
		Self {
			q_text: Some(text.into()),
			q_elem_number: elem,
			q_state: None,
		}
	}

	/// Measure cell carrying only display text.
	pub fn measure(text: impl Into<String>) -> Self {
		Self {
			q_text: Some(text.into()),
			q_elem_number: 0,
			q_state: None,
		}
	}
}

impl Layout {
	/// Builds a one-page layout from a matrix, mostly for tests and tooling.
	pub fn from_matrix(dimension: &str, measure: Option<&str>, matrix: Vec<Vec<Cell>>, in_selection: bool) -> Self {
		let rows = u32::try_from(matrix.len()).unwrap_or(u32::MAX);
		let q_measure_info = measure
			.map(|title| {
				vec![MeasureInfo {
					q_fallback_title: title.to_string(),
				}]
			})
			.unwrap_or_default();
		let columns = if q_measure_info.is_empty() { 1 } else { 2 };

		Self {
			q_info: None,
			q_hyper_cube: Some(HyperCube {
				q_dimension_info: vec![DimensionInfo {
					q_fallback_title: dimension.to_string(),
				}],
				q_measure_info,
				q_data_pages: vec![DataPage {
					q_matrix: matrix,
					q_area: Some(Area {
						q_left: 0,
						q_top: 0,
						q_width: columns,
						q_height: rows,
					}),
				}],
				q_size: Some(Size { q_cx: columns, q_cy: rows }),
			}),
			q_selection_info: SelectionInfo {
				q_in_selections: in_selection,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn layout_deserializes_host_shape() {
		let json = r#"{
			"qInfo": {"qId": "abc", "qType": "dimtable"},
			"qHyperCube": {
				"qDimensionInfo": [{"qFallbackTitle": "Region", "qCardinal": 4}],
				"qMeasureInfo": [{"qFallbackTitle": "Sum(Sales)"}],
				"qDataPages": [{
					"qMatrix": [
						[{"qText": "North", "qElemNumber": 3, "qState": "O"}, {"qText": "12", "qNum": 12}],
						[{"qText": "South", "qElemNumber": 7}, {"qText": "5", "qNum": "NaN"}]
					]
				}]
			},
			"qSelectionInfo": {"qInSelections": true}
		}"#;

		let layout: Layout = serde_json::from_str(json).unwrap();
		let cube = layout.q_hyper_cube.unwrap();
		assert_eq!(cube.q_dimension_info[0].q_fallback_title, "Region");
		assert_eq!(cube.q_measure_info[0].q_fallback_title, "Sum(Sales)");
		let matrix = &cube.q_data_pages[0].q_matrix;
		assert_eq!(matrix[1][0].q_elem_number, 7);
		assert_eq!(matrix[0][0].q_state.as_deref(), Some("O"));
		assert_eq!(matrix[1][1].q_text.as_deref(), Some("5"));
		assert!(layout.q_selection_info.q_in_selections);
	}

	#[test]
	fn missing_selection_info_defaults_to_not_in_selection() {
		let layout: Layout = serde_json::from_str(r#"{"qHyperCube": {}}"#).unwrap();
		assert!(!layout.q_selection_info.q_in_selections);
		assert!(layout.q_hyper_cube.unwrap().q_data_pages.is_empty());
	}

	#[test]
	fn from_matrix_fills_headers_and_size() {
		let layout = Layout::from_matrix("Dim", None, vec![vec![Cell::dimension("A", 1)]], false);
		let cube = layout.q_hyper_cube.unwrap();
		assert_eq!(cube.q_size, Some(Size { q_cx: 1, q_cy: 1 }));
		assert!(cube.q_measure_info.is_empty());
	}

	#[test]
	fn from_matrix_counts_measure_column_and_rows() {
		let matrix = (0..3).map(|i| vec![Cell::dimension(format!("D{i}"), i), Cell::measure("1")]).collect();
		let layout = Layout::from_matrix("Dim", Some("Sum"), matrix, true);
		let cube = layout.q_hyper_cube.unwrap();
		assert_eq!(cube.q_size, Some(Size { q_cx: 2, q_cy: 3 }));
		let area = cube.q_data_pages[0].q_area.as_ref().unwrap();
		assert_eq!((area.q_width, area.q_height), (2, 3));
	}
}
