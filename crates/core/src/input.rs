//! Translation of raw UI events into activations.
//!
//! A physical input may arrive as more than one event: a keyboard press on a
//! button-like element can be followed by a synthesized click. The filter
//! makes sure each input produces at most one activation.

use serde::{Deserialize, Serialize};

/// Raw event delivered to the delegated listener.
///
/// `target` is the `data-q-elem` attribute of the closest dimension cell, or
/// `None` when the event did not happen inside one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiEvent {
	/// `detail` is the click count; 0 means the click was synthesized.
	Click {
		target: Option<String>,
		#[serde(default = "default_click_detail")]
		detail: u32,
	},
	KeyDown {
		target: Option<String>,
		key: String,
		#[serde(default)]
		repeat: bool,
	},
}

fn default_click_detail() -> u32 {
	1
}

impl UiEvent {
	pub fn click(target: &str) -> Self {
		UiEvent::Click {
			target: Some(target.to_string()),
			detail: 1,
		}
	}

	pub fn key(target: &str, key: &str) -> Self {
		UiEvent::KeyDown {
			target: Some(target.to_string()),
			key: key.to_string(),
			repeat: false,
		}
	}
}

/// How an activation was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivationSource {
	Pointer,
	Keyboard,
}

/// One discrete user activation of a dimension cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
	/// Raw identity attribute; parsed by the engine.
	pub target: String,
	pub source: ActivationSource,
}

impl Activation {
	/// Keyboard activations must suppress the platform default (scrolling,
	/// synthesized clicks).
	pub fn prevents_default(&self) -> bool {
		self.source == ActivationSource::Keyboard
	}
}

/// Whether `key` activates a focused cell.
pub fn is_activation_key(key: &str) -> bool {
	matches!(key, "Enter" | " " | "Space" | "Spacebar")
}

/// Per-mount event filter.
#[derive(Debug, Clone, Default)]
pub struct ActivationFilter {
	last_keyboard: Option<String>,
}

impl ActivationFilter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the activation `event` stands for, if any.
	pub fn accept(&mut self, event: UiEvent) -> Option<Activation> {
		match event {
			UiEvent::Click { target, detail } => {
				let keyboard = self.last_keyboard.take();
				let target = target?;
				if detail == 0 && keyboard.as_deref() == Some(target.as_str()) {
					return None;
				}
				Some(Activation {
					target,
					source: ActivationSource::Pointer,
				})
			}
			UiEvent::KeyDown { target, key, repeat } => {
				if repeat || !is_activation_key(&key) {
					return None;
				}
				let target = target?;
				self.last_keyboard = Some(target.clone());
				Some(Activation {
					target,
					source: ActivationSource::Keyboard,
				})
			}
		}
	}
}
