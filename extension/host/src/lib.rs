//! Browser binding for the dimtable visualization.
//!
//! ```js
//! import init, { DimTable, initLogging } from "./dimtable_ext.js";
//!
//! await init();
//! initLogging("debug");
//! const table = new DimTable(backend, { selectionPath: "/qHyperCubeDef" });
//! table.paint(element, layout); // on every layout change
//! table.dispose(element);       // when the host tears the object down
//! ```
//!
//! Each painted element gets a `data-dimtable-host` attribute naming its
//! selection state. The container is rebuilt on every paint and carries
//! exactly one click and one keydown listener.

mod backend;
mod dom;
pub mod logging;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use dimtable::dom::table::{ELEM_ATTR, SELECTED_CLASS};
use dimtable::protocol::Layout;
use dimtable::{EngineConfig, HostId, ListenerGeneration, TableVisualization, UiEvent};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, KeyboardEvent, MouseEvent};

pub use backend::JsBackend;

const HOST_ATTR: &str = "data-dimtable-host";

/// Installs the console log subscriber and the panic hook.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
	console_error_panic_hook::set_once();
	logging::init(logging::parse_level(level.as_deref()));
}

struct Listeners {
	root: Element,
	click: Closure<dyn FnMut(MouseEvent)>,
	keydown: Closure<dyn FnMut(KeyboardEvent)>,
}

impl Listeners {
	fn detach(self) {
		let _ = self
			.root
			.remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
		let _ = self
			.root
			.remove_event_listener_with_callback("keydown", self.keydown.as_ref().unchecked_ref());
	}
}

struct Mounted {
	root: Element,
	listeners: Option<Listeners>,
}

struct Inner {
	vis: TableVisualization,
	mounts: RefCell<HashMap<HostId, Mounted>>,
	next_host: Cell<u64>,
}

impl Inner {
	fn host_of(&self, element: &Element) -> Result<HostId, JsValue> {
		if let Some(host) = element.get_attribute(HOST_ATTR).as_deref().and_then(parse_host_id) {
			return Ok(host);
		}
		let host = HostId(self.next_host.get());
		self.next_host.set(host.0 + 1);
		element.set_attribute(HOST_ATTR, &host.0.to_string())?;
		Ok(host)
	}

	/// Replaces the element's content with the current view of `host`.
	fn mount(self: &Rc<Self>, host: HostId, element: &Element, generation: ListenerGeneration) -> Result<(), JsValue> {
		if let Some(previous) = self.mounts.borrow_mut().remove(&host) {
			if let Some(listeners) = previous.listeners {
				listeners.detach();
			}
		}
		element.set_text_content(None);

		let Some(view) = self.vis.view(host) else {
			return Ok(());
		};
		let document = element.owner_document().ok_or("element is not attached to a document")?;
		let root = dom::materialize(&document, &view)?;
		element.append_child(&root)?;

		let listeners = if self.vis.listener_count(host) > 0 {
			Some(self.listen(host, generation, &root)?)
		} else {
			None
		};
		self.mounts.borrow_mut().insert(host, Mounted { root, listeners });
		Ok(())
	}

	fn listen(self: &Rc<Self>, host: HostId, generation: ListenerGeneration, root: &Element) -> Result<Listeners, JsValue> {
		let click = {
			let inner = Rc::downgrade(self);
			Closure::wrap(Box::new(move |event: MouseEvent| {
				let ui = UiEvent::Click {
					target: cell_identity(&event),
					detail: u32::try_from(event.detail()).unwrap_or(0),
				};
				Inner::activate(&inner, host, generation, ui, &event);
			}) as Box<dyn FnMut(MouseEvent)>)
		};
		let keydown = {
			let inner = Rc::downgrade(self);
			Closure::wrap(Box::new(move |event: KeyboardEvent| {
				let ui = UiEvent::KeyDown {
					target: cell_identity(&event),
					key: event.key(),
					repeat: event.repeat(),
				};
				Inner::activate(&inner, host, generation, ui, &event);
			}) as Box<dyn FnMut(KeyboardEvent)>)
		};

		root.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
		root.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
		Ok(Listeners {
			root: root.clone(),
			click,
			keydown,
		})
	}

	/// Local half runs inside the event handler; the backend half is spawned.
	fn activate(inner: &Weak<Inner>, host: HostId, generation: ListenerGeneration, ui: UiEvent, event: &Event) {
		let Some(inner) = inner.upgrade() else {
			return;
		};
		let Some(pending) = inner.vis.activate(host, generation, ui) else {
			return;
		};
		if pending.prevents_default() {
			event.prevent_default();
		}

		let local = *pending.local();
		if local.row.is_some() {
			let root = inner.mounts.borrow().get(&host).map(|m| m.root.clone());
			let selector = format!("[{ELEM_ATTR}=\"{}\"]", local.elem);
			if let Some(Ok(Some(cell))) = root.map(|root| root.query_selector(&selector)) {
				let _ = cell.class_list().toggle_with_force(SELECTED_CLASS, local.selected);
			}
		}

		spawn_local(async move {
			let outcome = inner.vis.synchronize(pending).await;
			debug!(target = "dimtable.backend", %host, elem = outcome.local.elem, backend = ?outcome.backend, exit = ?outcome.exit, "toggle settled");
		});
	}
}

impl Drop for Inner {
	fn drop(&mut self) {
		for (_, mounted) in self.mounts.get_mut().drain() {
			if let Some(listeners) = mounted.listeners {
				listeners.detach();
			}
		}
	}
}

/// Table visualization bound to a JS selection backend.
#[wasm_bindgen]
pub struct DimTable {
	inner: Rc<Inner>,
}

#[wasm_bindgen]
impl DimTable {
	/// `config` may be `undefined` for defaults.
	#[wasm_bindgen(constructor)]
	pub fn new(backend: JsValue, config: JsValue) -> Result<DimTable, JsError> {
		console_error_panic_hook::set_once();

		let config = if config.is_undefined() || config.is_null() {
			EngineConfig::default()
		} else {
			serde_wasm_bindgen::from_value::<EngineConfig>(config).map_err(|e| JsError::new(&format!("invalid config: {e}")))?
		};
		config.validate().map_err(|e| JsError::new(&e.to_string()))?;

		Ok(DimTable {
			inner: Rc::new(Inner {
				vis: TableVisualization::new(Arc::new(JsBackend::new(backend)), config),
				mounts: RefCell::new(HashMap::new()),
				next_host: Cell::new(1),
			}),
		})
	}

	/// Renders `layout` into `element`, replacing whatever was there.
	pub fn paint(&self, element: &Element, layout: JsValue) -> Result<(), JsValue> {
		let host = self.inner.host_of(element)?;
		let layout = serde_wasm_bindgen::from_value::<Layout>(layout).unwrap_or_else(|err| {
			warn!(target = "dimtable.render", %host, error = %err, "layout did not deserialize");
			Layout::default()
		});

		let outcome = self.inner.vis.render(host, &layout);
		self.inner.mount(host, element, outcome.generation())?;
		debug!(target = "dimtable.render", %host, generation = %outcome.generation(), "painted");

		if outcome.needs_settle() {
			let inner = Rc::clone(&self.inner);
			spawn_local(async move {
				let status = inner.vis.settle(host).await;
				debug!(target = "dimtable.engine", %host, ?status, "empty session settled");
			});
		}
		Ok(())
	}

	/// Drops the state and listeners of `element` and empties it.
	pub fn dispose(&self, element: &Element) {
		let Some(host) = element.get_attribute(HOST_ATTR).as_deref().and_then(parse_host_id) else {
			return;
		};
		if let Some(mounted) = self.inner.mounts.borrow_mut().remove(&host) {
			if let Some(listeners) = mounted.listeners {
				listeners.detach();
			}
		}
		self.inner.vis.dispose(host);
		element.set_text_content(None);
		let _ = element.remove_attribute(HOST_ATTR);
	}
}

/// `data-q-elem` of the dimension cell an event happened in.
fn cell_identity(event: &Event) -> Option<String> {
	let target = event.target()?.dyn_into::<Element>().ok()?;
	let cell = target.closest(&format!("[{ELEM_ATTR}]")).ok()??;
	cell.get_attribute(ELEM_ATTR)
}

fn parse_host_id(raw: &str) -> Option<HostId> {
	raw.trim().parse().ok().map(HostId)
}
