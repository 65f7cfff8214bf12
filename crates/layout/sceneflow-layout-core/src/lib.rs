//! sceneflow layout core
//!
//! Owns a grid of unit cells and an object registry, and answers "where can
//! this rectangle go" and "how big is the canvas now". Placement is a search
//! for a rectangle that is free, keeps a 1-cell ring of free-or-margin cells
//! around itself, and shares its row range only with objects of the same
//! category. When no such rectangle exists the canvas grows by one cell on
//! each axis, preserving its target aspect ratio, and the search retries.
//!
//! The allocator deals purely in integer cells; translating a cell origin
//! into scene coordinates is the rendering collaborator's job.

pub mod config;
pub mod grid;
pub mod item;
pub mod map;

pub use config::{CanvasConfig, SearchStrategy};
pub use grid::{Cell, PlacementGrid};
pub use item::PlacementItem;
pub use map::PlacementMap;
