//! Owned element tree for the table view.
//!
//! The reconciler keeps one of these per host as the description of the live
//! DOM. Hosts either serialize it ([`Node::to_html`]) or materialize it into
//! real elements.

use std::collections::BTreeMap;
use std::fmt::Write;

pub mod table;

/// An element with attributes, classes, optional text and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
	tag: String,
	attrs: BTreeMap<String, String>,
	classes: Vec<String>,
	text: Option<String>,
	children: Vec<Node>,
}

impl Node {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			..Default::default()
		}
	}

	pub fn with_class(mut self, class: &str) -> Self {
		self.set_class(class, true);
		self
	}

	pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
		self.attrs.insert(name.to_string(), value.into());
		self
	}

	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	pub fn with_child(mut self, child: Node) -> Self {
		self.children.push(child);
		self
	}

	pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
		self.children.extend(children);
		self
	}

	pub fn tag(&self) -> &str {
		&self.tag
	}

	pub fn attr(&self, name: &str) -> Option<&str> {
		self.attrs.get(name).map(String::as_str)
	}

	pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
		self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn classes(&self) -> &[String] {
		&self.classes
	}

	pub fn has_class(&self, class: &str) -> bool {
		self.classes.iter().any(|c| c == class)
	}

	/// Adds or removes `class`. Returns whether anything changed.
	pub fn set_class(&mut self, class: &str, on: bool) -> bool {
		let present = self.has_class(class);
		match (present, on) {
			(false, true) => {
				self.classes.push(class.to_string());
				true
			}
			(true, false) => {
				self.classes.retain(|c| c != class);
				true
			}
			_ => false,
		}
	}

	pub fn text(&self) -> Option<&str> {
		self.text.as_deref()
	}

	pub fn children(&self) -> &[Node] {
		&self.children
	}

	/// Depth-first search for the first node matching `pred`.
	pub fn find(&self, pred: &dyn Fn(&Node) -> bool) -> Option<&Node> {
		if pred(self) {
			return Some(self);
		}
		self.children.iter().find_map(|child| child.find(pred))
	}

	pub fn find_mut(&mut self, pred: &dyn Fn(&Node) -> bool) -> Option<&mut Node> {
		if pred(self) {
			return Some(self);
		}
		self.children.iter_mut().find_map(|child| child.find_mut(pred))
	}

	/// All nodes matching `pred`, in document order.
	pub fn find_all(&self, pred: &dyn Fn(&Node) -> bool) -> Vec<&Node> {
		let mut found = Vec::new();
		self.collect(pred, &mut found);
		found
	}

	fn collect<'a>(&'a self, pred: &dyn Fn(&Node) -> bool, found: &mut Vec<&'a Node>) {
		if pred(self) {
			found.push(self);
		}
		for child in &self.children {
			child.collect(pred, found);
		}
	}

	/// Serializes the tree as HTML.
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		self.write_html(&mut out);
		out
	}

	fn write_html(&self, out: &mut String) {
		let _ = write!(out, "<{}", self.tag);
		if !self.classes.is_empty() {
			let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
		}
		for (name, value) in &self.attrs {
			let _ = write!(out, " {}=\"{}\"", name, escape(value));
		}
		out.push('>');
		if let Some(text) = &self.text {
			out.push_str(&escape(text));
		}
		for child in &self.children {
			child.write_html(out);
		}
		let _ = write!(out, "</{}>", self.tag);
	}
}

fn escape(raw: &str) -> String {
	let mut escaped = String::with_capacity(raw.len());
	for ch in raw.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(ch),
		}
	}
	escaped
}
