//! Table construction: rows to view tree.

use super::Node;
use crate::projector::RowEntry;
use crate::state::ElemId;

pub const CONTAINER_CLASS: &str = "dimtable-container";
pub const IN_SELECTION_CLASS: &str = "in-selection";
pub const SELECTED_CLASS: &str = "local-selected";
pub const DIM_CELL_CLASS: &str = "dim-cell";
pub const MEAS_CELL_CLASS: &str = "meas-cell";
pub const ERROR_CLASS: &str = "dimtable-error";
pub const ELEM_ATTR: &str = "data-q-elem";

/// Column headers of the table.
#[derive(Debug, Clone, Copy)]
pub struct Headers<'a> {
	pub dimension: &'a str,
	pub measure: &'a str,
}

/// Builds the container with the full table for one render.
pub fn table_view(headers: Headers<'_>, rows: &[RowEntry], in_selection: bool) -> Node {
	let head = Node::new("thead").with_child(
		Node::new("tr")
			.with_child(Node::new("th").with_text(headers.dimension))
			.with_child(Node::new("th").with_text(headers.measure)),
	);
	let body = Node::new("tbody").with_children(rows.iter().map(row_view));

	let mut container = Node::new("div")
		.with_class(CONTAINER_CLASS)
		.with_child(Node::new("table").with_class("dimtable").with_child(head).with_child(body));
	container.set_class(IN_SELECTION_CLASS, in_selection);
	container
}

fn row_view(row: &RowEntry) -> Node {
	let mut dim = Node::new("td")
		.with_class(DIM_CELL_CLASS)
		.with_attr("role", "button")
		.with_attr("tabindex", "0")
		.with_attr(ELEM_ATTR, row.dim.elem.to_string())
		.with_attr("aria-label", format!("Select {}", row.dim.text))
		.with_text(row.dim.text.as_str());
	dim.set_class(SELECTED_CLASS, row.dim.selected);

	Node::new("tr")
		.with_attr("data-row", row.row_index.to_string())
		.with_child(dim)
		.with_child(Node::new("td").with_class(MEAS_CELL_CLASS).with_text(row.meas.text.as_str()))
}

/// Container replacing the table after a failed render.
pub fn error_view(message: &str) -> Node {
	Node::new("div")
		.with_class(CONTAINER_CLASS)
		.with_class(ERROR_CLASS)
		.with_child(Node::new("p").with_class("dimtable-error-message").with_text(message))
}

/// The dimension cell carrying `elem`, if the view shows one.
pub fn dim_cell_mut(root: &mut Node, elem: ElemId) -> Option<&mut Node> {
	let wanted = elem.to_string();
	root.find_mut(&|node| node.has_class(DIM_CELL_CLASS) && node.attr(ELEM_ATTR) == Some(wanted.as_str()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::projector::{DimCell, MeasCell};

	fn row(row_index: usize, text: &str, elem: ElemId, selected: bool) -> RowEntry {
		RowEntry {
			row_index,
			dim: DimCell {
				text: text.to_string(),
				elem,
				selected,
			},
			meas: MeasCell { text: "1".to_string() },
		}
	}

	#[test]
	fn dimension_cells_expose_activation_surface() {
		let view = table_view(
			Headers {
				dimension: "Region",
				measure: "Sales",
			},
			&[row(0, "North", 3, true), row(1, "South", 7, false)],
			true,
		);

		assert!(view.has_class(IN_SELECTION_CLASS));
		let cells = view.find_all(&|n| n.has_class(DIM_CELL_CLASS));
		assert_eq!(cells.len(), 2);
		assert_eq!(cells[0].attr("role"), Some("button"));
		assert_eq!(cells[0].attr("tabindex"), Some("0"));
		assert_eq!(cells[0].attr(ELEM_ATTR), Some("3"));
		assert_eq!(cells[0].attr("aria-label"), Some("Select North"));
		assert!(cells[0].has_class(SELECTED_CLASS));
		assert!(!cells[1].has_class(SELECTED_CLASS));
	}

	#[test]
	fn idle_container_has_no_selection_class() {
		let view = table_view(
			Headers {
				dimension: "D",
				measure: "M",
			},
			&[],
			false,
		);
		assert!(!view.has_class(IN_SELECTION_CLASS));
		assert!(view.to_html().contains("<tbody></tbody>"));
	}

	#[test]
	fn dim_cell_lookup_by_identity() {
		let mut view = table_view(
			Headers {
				dimension: "D",
				measure: "M",
			},
			&[row(0, "A", 1, false), row(1, "B", 2, false)],
			false,
		);
		let cell = dim_cell_mut(&mut view, 2).unwrap();
		assert_eq!(cell.text(), Some("B"));
		assert!(dim_cell_mut(&mut view, 5).is_none());
	}

	#[test]
	fn error_view_carries_message() {
		let view = error_view("Unable to render the table");
		assert!(view.has_class(ERROR_CLASS));
		assert!(view.to_html().contains("Unable to render the table"));
	}
}
