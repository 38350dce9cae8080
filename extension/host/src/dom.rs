//! Materializes view trees into real DOM elements.

use dimtable::Node;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

pub fn materialize(document: &Document, node: &Node) -> Result<Element, JsValue> {
	let element = document.create_element(node.tag())?;
	if !node.classes().is_empty() {
		element.set_class_name(&node.classes().join(" "));
	}
	for (name, value) in node.attrs() {
		element.set_attribute(name, value)?;
	}
	if let Some(text) = node.text() {
		element.set_text_content(Some(text));
	}
	for child in node.children() {
		element.append_child(&materialize(document, child)?.into())?;
	}
	Ok(element)
}
