//! Extraction of a render snapshot from the host layout.

use dimtable_protocol::{Cell, Layout};

use crate::error::{Error, Result};

/// Everything one render needs from the layout, borrowed from it.
#[derive(Debug, Clone, Copy)]
pub struct DataSnapshot<'a> {
	pub dim_count: usize,
	pub meas_count: usize,
	pub matrix: &'a [Vec<Cell>],
	pub dim_header: &'a str,
	pub meas_header: &'a str,
	pub in_selection: bool,
}

impl<'a> DataSnapshot<'a> {
	/// Reads the snapshot out of `layout`.
	///
	/// Fails when there is no hypercube or it has no dimension; a cube without
	/// data pages yields an empty matrix.
	pub fn read(layout: &'a Layout) -> Result<Self> {
		let cube = layout
			.q_hyper_cube
			.as_ref()
			.ok_or_else(|| Error::InvalidLayout("layout has no qHyperCube".to_string()))?;

		let dim_count = cube.q_dimension_info.len();
		let meas_count = cube.q_measure_info.len();
		if dim_count == 0 {
			return Err(Error::UnsupportedShape {
				dimensions: dim_count,
				measures: meas_count,
			});
		}

		let matrix = cube.q_data_pages.first().map(|page| page.q_matrix.as_slice()).unwrap_or(&[]);

		Ok(Self {
			dim_count,
			meas_count,
			matrix,
			dim_header: cube.q_dimension_info.first().map(|d| d.q_fallback_title.as_str()).unwrap_or(""),
			meas_header: cube.q_measure_info.first().map(|m| m.q_fallback_title.as_str()).unwrap_or(""),
			in_selection: layout.q_selection_info.q_in_selections,
		})
	}
}

#[cfg(test)]
mod tests {
	use dimtable_protocol::HyperCube;

	use super::*;

	#[test]
	fn reads_headers_matrix_and_flag() {
		let layout = Layout::from_matrix(
			"Region",
			Some("Sales"),
			vec![vec![Cell::dimension("North", 1), Cell::measure("10")]],
			true,
		);
		let snapshot = DataSnapshot::read(&layout).unwrap();
		assert_eq!(snapshot.dim_count, 1);
		assert_eq!(snapshot.meas_count, 1);
		assert_eq!(snapshot.dim_header, "Region");
		assert_eq!(snapshot.meas_header, "Sales");
		assert_eq!(snapshot.matrix.len(), 1);
		assert!(snapshot.in_selection);
	}

	#[test]
	fn missing_cube_is_invalid_layout() {
		let err = DataSnapshot::read(&Layout::default()).unwrap_err();
		assert!(matches!(err, Error::InvalidLayout(_)));
	}

	#[test]
	fn cube_without_dimension_is_unsupported() {
		let layout = Layout {
			q_hyper_cube: Some(HyperCube::default()),
			..Default::default()
		};
		let err = DataSnapshot::read(&layout).unwrap_err();
		assert!(matches!(err, Error::UnsupportedShape { dimensions: 0, .. }));
	}

	#[test]
	fn cube_without_pages_has_empty_matrix() {
		let mut layout = Layout::from_matrix("Region", None, Vec::new(), false);
		if let Some(cube) = layout.q_hyper_cube.as_mut() {
			cube.q_data_pages.clear();
		}
		let snapshot = DataSnapshot::read(&layout).unwrap();
		assert!(snapshot.matrix.is_empty());
		assert_eq!(snapshot.meas_header, "");
	}
}
