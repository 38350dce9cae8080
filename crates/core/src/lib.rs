//! dimtable: a dimension/measure table visualization with optimistic,
//! backend-confirmed selections.
//!
//! The host calls [`TableVisualization::render`] whenever the layout changes
//! and forwards UI events to [`TableVisualization::handle_event`]. Selection
//! state lives per host element in a [`StateRegistry`] and survives renders;
//! the view is rebuilt from scratch every time.

pub mod backend;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod input;
pub mod projector;
pub mod reconciler;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod visualization;

pub use backend::{BackendCall, BackendFuture, RecordingBackend, SelectionBackend};
pub use config::EngineConfig;
pub use dom::Node;
pub use engine::{BackendStatus, LocalToggle, SelectionEngine, ToggleOutcome};
pub use error::{BackendOp, Error, Result};
pub use input::{Activation, ActivationFilter, ActivationSource, UiEvent};
pub use projector::{DimCell, MeasCell, Projection, RowEntry, project};
pub use reconciler::{ContainerReconciler, ListenerGeneration};
pub use registry::{HostId, StateRegistry};
pub use snapshot::DataSnapshot;
pub use state::{ElemId, SelectionState, SessionPhase, SessionTransition, SharedState, ToggleScope};
pub use visualization::{PendingSync, RenderOutcome, TableVisualization};

pub use dimtable_protocol as protocol;
