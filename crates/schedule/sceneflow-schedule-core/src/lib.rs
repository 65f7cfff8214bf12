//! sceneflow scheduling core
//!
//! Turns declaratively registered actions (consumed keys, produced keys,
//! optional serialization key) into an ordered list of internally-parallel
//! batches, and tracks element reuse/duplication across consumers. The crate
//! never touches geometry or timing; it only reports which actions may play
//! together and which element ids stand in for repeated reads.

pub mod action;
pub mod batch;
pub mod graph;
pub mod tracker;

pub use action::{ActionDescriptor, ActionRecord};
pub use batch::Batch;
pub use graph::FlowGraph;
pub use tracker::ElementTracker;
