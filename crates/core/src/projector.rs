//! Row projection: data matrix plus selection state to row view-models.
//!
//! The projector is pure. It reads the session set and the `in_selection` flag
//! and never looks at pending clicks, so a pending click is never shown as a
//! selected row.

use std::collections::{BTreeSet, HashMap};

use dimtable_protocol::Cell;
use serde::Serialize;
use tracing::debug;

use crate::state::ElemId;

/// Dimension half of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimCell {
	pub text: String,
	pub elem: ElemId,
	pub selected: bool,
}

/// Measure half of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeasCell {
	pub text: String,
}

/// View-model of one data row, recreated on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowEntry {
	/// Position of the row in the source matrix.
	pub row_index: usize,
	pub dim: DimCell,
	pub meas: MeasCell,
}

/// Rows of one render together with the identity index built from them.
///
/// The two halves are only ever produced and replaced together, so the index
/// can never point into rows from another render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
	rows: Vec<RowEntry>,
	index: HashMap<ElemId, usize>,
}

impl Projection {
	pub fn rows(&self) -> &[RowEntry] {
		&self.rows
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Position in [`Self::rows`] of the first row showing `elem`.
	pub fn position_of(&self, elem: ElemId) -> Option<usize> {
		self.index.get(&elem).copied()
	}

	/// Finds the row for `elem`: index lookup first, then a linear scan.
	pub fn find(&self, elem: ElemId) -> Option<usize> {
		self.position_of(elem)
			.filter(|&pos| self.rows.get(pos).is_some_and(|row| row.dim.elem == elem))
			.or_else(|| self.rows.iter().position(|row| row.dim.elem == elem))
	}

	/// Sets the selected flag of the row showing `elem`.
	///
	/// Returns the row position, or `None` when no row shows `elem`.
	pub fn mark_selected(&mut self, elem: ElemId, selected: bool) -> Option<usize> {
		let pos = self.find(elem)?;
		let row = self.rows.get_mut(pos)?;
		row.dim.selected = selected;
		Some(pos)
	}
}

/// Builds a fresh [`Projection`] for one render.
///
/// Column 0 supplies the dimension text and identity, column 1 the measure
/// text (or `placeholder` when the row has no measure cell).
pub fn project(matrix: &[Vec<Cell>], session: &BTreeSet<ElemId>, in_selection: bool, placeholder: &str) -> Projection {
	let mut rows = Vec::with_capacity(matrix.len());
	let mut index = HashMap::with_capacity(matrix.len());

	for (row_index, cells) in matrix.iter().enumerate() {
		let Some(dim) = cells.first() else {
			debug!(target = "dimtable.render", row_index, "row has no dimension cell; skipping");
			continue;
		};
		let elem = dim.q_elem_number;
		let meas_text = cells
			.get(1)
			.and_then(|cell| cell.q_text.clone())
			.unwrap_or_else(|| placeholder.to_string());

		index.entry(elem).or_insert(rows.len());
		rows.push(RowEntry {
			row_index,
			dim: DimCell {
				text: dim.q_text.clone().unwrap_or_default(),
				elem,
				selected: in_selection && session.contains(&elem),
			},
			meas: MeasCell { text: meas_text },
		});
	}

	Projection { rows, index }
}
