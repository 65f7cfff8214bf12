use sceneflow_api_core::{ObjectCategory, ObjectId, Placement};
use serde::{Deserialize, Serialize};

/// One placed object as recorded in the allocator's registry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacementItem {
    pub object: ObjectId,
    pub category: ObjectCategory,
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

impl PlacementItem {
    pub fn placement(&self) -> Placement {
        Placement {
            row: self.row,
            col: self.col,
            width: self.width,
            height: self.height,
            category: self.category,
        }
    }
}
