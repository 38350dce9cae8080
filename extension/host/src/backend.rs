//! Selection backend backed by a JS object.
//!
//! The object supplies `beginSelections(path)`,
//! `selectHyperCubeValues(path, column, elements, append)` and
//! `cancelSelections()`. Each may return a promise or a plain value; a throw
//! or a rejection becomes an [`Error::Backend`].

use dimtable::{BackendFuture, BackendOp, ElemId, Error, SelectionBackend};
use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

pub struct JsBackend {
	target: JsValue,
}

impl JsBackend {
	pub fn new(target: JsValue) -> Self {
		Self { target }
	}

	/// Invokes `method` now and returns a future for its settlement.
	fn invoke(&self, op: BackendOp, method: &str, args: Array) -> BackendFuture<'static> {
		let called = Reflect::get(&self.target, &JsValue::from_str(method))
			.and_then(|f| f.dyn_into::<Function>().map_err(|_| JsValue::from_str(&format!("{method} is not a function"))))
			.and_then(|f| f.apply(&self.target, &args));

		Box::pin(async move {
			let value = called.map_err(|err| Error::backend(op, describe(&err)))?;
			JsFuture::from(Promise::resolve(&value))
				.await
				.map(|_| ())
				.map_err(|err| Error::backend(op, describe(&err)))
		})
	}
}

impl SelectionBackend for JsBackend {
	fn begin<'a>(&'a self, path: &'a str) -> BackendFuture<'a> {
		let args = Array::of1(&JsValue::from_str(path));
		self.invoke(BackendOp::Begin, "beginSelections", args)
	}

	fn select<'a>(&'a self, path: &'a str, column: usize, elements: &'a [ElemId], append: bool) -> BackendFuture<'a> {
		let elements: Array = elements.iter().map(|&e| JsValue::from_f64(e as f64)).collect();
		let args = Array::of4(
			&JsValue::from_str(path),
			&JsValue::from_f64(column as f64),
			&elements,
			&JsValue::from_bool(append),
		);
		self.invoke(BackendOp::Select, "selectHyperCubeValues", args)
	}

	fn cancel(&self) -> BackendFuture<'_> {
		self.invoke(BackendOp::Cancel, "cancelSelections", Array::new())
	}
}

pub(crate) fn describe(err: &JsValue) -> String {
	if let Some(text) = err.as_string() {
		return text;
	}
	match err.dyn_ref::<js_sys::Error>() {
		Some(err) => String::from(err.message()),
		None => format!("{err:?}"),
	}
}
