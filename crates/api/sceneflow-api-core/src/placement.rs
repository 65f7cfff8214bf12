use crate::category::ObjectCategory;
use serde::{Deserialize, Serialize};

/// Integer-cell placement of one object, as handed to the rendering
/// collaborator. `row`/`col` are the top-left corner of the occupied
/// rectangle; the 1-cell margin ring around it is not included.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
    pub category: ObjectCategory,
}

impl Placement {
    pub fn origin(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Exclusive bottom row of the occupied rectangle.
    pub fn bottom(&self) -> usize {
        self.row + self.height
    }

    /// Exclusive right column of the occupied rectangle.
    pub fn right(&self) -> usize {
        self.col + self.width
    }
}
