//! In-memory backend for tests and the replay harness.
//!
//! Records every call in issue order, can reject chosen operations and can
//! yield to the executor a few times per call to let activations overlap.
//!
//! # Example
//!
//! ```ignore
//! let backend = RecordingBackend::new();
//! backend.fail_next(BackendOp::Select);
//! let engine = SelectionEngine::new(Arc::new(backend.clone()), EngineConfig::default());
//! engine.toggle(&state, 3, false).await;
//! assert_eq!(backend.count(BackendOp::Begin), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::task::Poll;

use parking_lot::Mutex;
use serde::Serialize;

use super::{BackendFuture, SelectionBackend};
use crate::error::{BackendOp, Error};
use crate::state::ElemId;

/// One call as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum BackendCall {
	Begin {
		path: String,
	},
	Select {
		path: String,
		column: usize,
		elements: Vec<ElemId>,
		append: bool,
	},
	Cancel,
}

impl BackendCall {
	pub fn op(&self) -> BackendOp {
		match self {
			BackendCall::Begin { .. } => BackendOp::Begin,
			BackendCall::Select { .. } => BackendOp::Select,
			BackendCall::Cancel => BackendOp::Cancel,
		}
	}
}

#[derive(Debug, Default)]
struct Recorder {
	calls: Vec<BackendCall>,
	fail_next: HashMap<BackendOp, usize>,
	fail_always: Vec<BackendOp>,
}

impl Recorder {
	fn record(&mut self, call: BackendCall) -> bool {
		let op = call.op();
		self.calls.push(call);

		if self.fail_always.contains(&op) {
			return true;
		}
		match self.fail_next.get_mut(&op) {
			Some(remaining) if *remaining > 0 => {
				*remaining -= 1;
				true
			}
			_ => false,
		}
	}
}

/// Cloneable handle; clones share the same call log and failure plan.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
	inner: Arc<Mutex<Recorder>>,
	yields: usize,
}

impl RecordingBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes every call yield `yields` times before settling.
	pub fn with_latency(mut self, yields: usize) -> Self {
		self.yields = yields;
		self
	}

	/// Rejects the next call of `op`. Stacks when called repeatedly.
	pub fn fail_next(&self, op: BackendOp) {
		*self.inner.lock().fail_next.entry(op).or_insert(0) += 1;
	}

	/// Rejects every call of `op` from now on.
	pub fn fail_always(&self, op: BackendOp) {
		let mut inner = self.inner.lock();
		if !inner.fail_always.contains(&op) {
			inner.fail_always.push(op);
		}
	}

	pub fn calls(&self) -> Vec<BackendCall> {
		self.inner.lock().calls.clone()
	}

	/// Takes all recorded calls, clearing the log.
	pub fn take_calls(&self) -> Vec<BackendCall> {
		std::mem::take(&mut self.inner.lock().calls)
	}

	/// Number of recorded calls of `op`.
	pub fn count(&self, op: BackendOp) -> usize {
		self.inner.lock().calls.iter().filter(|call| call.op() == op).count()
	}

	fn respond(&self, call: BackendCall) -> BackendFuture<'static> {
		let op = call.op();
		let fails = self.inner.lock().record(call);
		let mut remaining = self.yields;

		Box::pin(async move {
			futures::future::poll_fn(|cx| {
				if remaining == 0 {
					Poll::Ready(())
				} else {
					remaining -= 1;
					cx.waker().wake_by_ref();
					Poll::Pending
				}
			})
			.await;

			if fails {
				Err(Error::backend(op, "injected failure"))
			} else {
				Ok(())
			}
		})
	}
}

impl SelectionBackend for RecordingBackend {
	fn begin<'a>(&'a self, path: &'a str) -> BackendFuture<'a> {
		self.respond(BackendCall::Begin { path: path.to_string() })
	}

	fn select<'a>(&'a self, path: &'a str, column: usize, elements: &'a [ElemId], append: bool) -> BackendFuture<'a> {
		self.respond(BackendCall::Select {
			path: path.to_string(),
			column,
			elements: elements.to_vec(),
			append,
		})
	}

	fn cancel(&self) -> BackendFuture<'_> {
		self.respond(BackendCall::Cancel)
	}
}
