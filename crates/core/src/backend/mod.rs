//! Backend selection client abstraction.
//!
//! The host's selection subsystem is asynchronous and may reject any call.
//! Futures are not `Send`: the visualization runs on one cooperative thread
//! and browser promises cannot cross threads anyway.

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::state::ElemId;

mod recording;

pub use recording::{BackendCall, RecordingBackend};

/// Future returned by every backend call.
pub type BackendFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// The host's selection/confirmation service.
pub trait SelectionBackend {
	/// Opens a selection session on `path`. Called before the first select.
	fn begin<'a>(&'a self, path: &'a str) -> BackendFuture<'a>;

	/// Selects `elements` in `column`; `append` keeps the existing selection.
	fn select<'a>(&'a self, path: &'a str, column: usize, elements: &'a [ElemId], append: bool) -> BackendFuture<'a>;

	/// Abandons the current session.
	fn cancel(&self) -> BackendFuture<'_>;
}
