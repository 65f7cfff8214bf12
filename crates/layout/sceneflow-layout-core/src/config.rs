use serde::{Deserialize, Serialize};

/// Candidate search order over the grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Scan left-to-right within rows, preferring the current row before
    /// advancing. Objects line up beside each other.
    BesideFirst,
    /// Scan top-to-bottom within columns, preferring a new row. Objects
    /// stack below each other.
    BelowFirst,
}

/// Canvas-derived parameters of the placement grid.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Initial grid width in cells.
    pub width: usize,
    /// Initial grid height in cells.
    pub height: usize,
    /// Maximum number of growth attempts per placement before the allocator
    /// gives up with `PlacementExhausted`.
    pub growth_cap: usize,
    pub strategy: SearchStrategy,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 9,
            growth_cap: 64,
            strategy: SearchStrategy::BesideFirst,
        }
    }
}

impl CanvasConfig {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
