//! Wire types for the host layout object.
//!
//! This crate contains the serde-serializable shapes the host framework hands
//! to the visualization on every render. They mirror the host's hypercube
//! layout as it appears on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * Lenient: Unknown fields are ignored, absent optional blocks default
//! * Stable: Changes only when the host's layout format changes
//!
//! Snapshot extraction and everything stateful lives in `dimtable-core`.

pub mod layout;

pub use layout::*;
