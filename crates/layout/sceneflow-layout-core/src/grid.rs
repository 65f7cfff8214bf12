//! Cell grid with occupancy and margin tracking.

use sceneflow_api_core::ObjectCategory;
use serde::{Deserialize, Serialize};

/// State of one unit cell.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Free,
    /// Boundary ring around an occupied rectangle. Margins may be shared
    /// between neighbouring rectangles.
    Margin,
    Occupied(ObjectCategory),
}

/// 2-D array of cell states. Rows grow downward, columns to the right.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlacementGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl PlacementGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Free; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.width + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.width + col] = cell;
    }

    /// Resize the grid while keeping existing cell states. Shrinking
    /// truncates on the right/bottom edges.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        let mut cells = vec![Cell::Free; new_width * new_height];
        for row in 0..self.height.min(new_height) {
            for col in 0..self.width.min(new_width) {
                cells[row * new_width + col] = self.cell(row, col);
            }
        }
        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
    }

    /// Check whether a rectangle can live at `(row, col)`:
    /// the rectangle and its 1-cell ring hold no occupied cell, and (when a
    /// category is given) the full row range it spans holds nothing but
    /// free, margin or same-category cells.
    pub fn check_rect(
        &self,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
        category: Option<ObjectCategory>,
    ) -> bool {
        // The ring itself must fit inside the grid.
        if row == 0 || col == 0 {
            return false;
        }
        if col + width + 1 > self.width || row + height + 1 > self.height {
            return false;
        }

        for r in (row - 1)..=(row + height) {
            for c in (col - 1)..=(col + width) {
                if matches!(self.cell(r, c), Cell::Occupied(_)) {
                    return false;
                }
            }
        }

        if let Some(category) = category {
            for r in (row - 1)..=(row + height) {
                for c in 0..self.width {
                    if let Cell::Occupied(other) = self.cell(r, c) {
                        if other != category {
                            return false;
                        }
                    }
                }
            }
        }

        true
    }

    /// Mark a rectangle as occupied and its ring as margin. Ring cells that
    /// fall outside the grid are skipped.
    pub fn mark_rect(
        &mut self,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
        category: ObjectCategory,
    ) {
        for r in row.saturating_sub(1)..=(row + height) {
            for c in col.saturating_sub(1)..=(col + width) {
                if r >= self.height || c >= self.width {
                    continue;
                }
                let border = r + 1 == row || r == row + height || c + 1 == col || c == col + width;
                if border {
                    self.set(r, c, Cell::Margin);
                } else {
                    self.set(r, c, Cell::Occupied(category));
                }
            }
        }
    }

    /// Draw only the margin ring of a rectangle, leaving its interior free.
    /// Used to reserve the envelope of a group before its members land.
    pub fn mark_ring(&mut self, row: usize, col: usize, width: usize, height: usize) {
        for r in row.saturating_sub(1)..=(row + height) {
            for c in col.saturating_sub(1)..=(col + width) {
                if r >= self.height || c >= self.width {
                    continue;
                }
                let border = r + 1 == row || r == row + height || c + 1 == col || c == col + width;
                if border {
                    self.set(r, c, Cell::Margin);
                }
            }
        }
    }

    /// Width of the touched region: occupied cells and margins count, from
    /// column 0 up to the rightmost non-free cell.
    pub fn used_width(&self) -> usize {
        let mut max_col = 0;
        for row in 0..self.height {
            for col in 0..self.width {
                if self.cell(row, col) != Cell::Free && col > max_col {
                    max_col = col;
                }
            }
        }
        max_col + 1
    }

    /// Height of the touched region, mirroring [`used_width`](Self::used_width).
    pub fn used_height(&self) -> usize {
        let mut max_row = 0;
        for row in 0..self.height {
            for col in 0..self.width {
                if self.cell(row, col) != Cell::Free && row > max_row {
                    max_row = row;
                }
            }
        }
        max_row + 1
    }

    /// ASCII rendering of the grid for logs and debugging: space for free,
    /// `*` for margin, `O` for occupied.
    pub fn dump(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                out.push(match self.cell(row, col) {
                    Cell::Free => ' ',
                    Cell::Margin => '*',
                    Cell::Occupied(_) => 'O',
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_and_check() {
        let mut grid = PlacementGrid::new(16, 9);
        assert!(grid.check_rect(1, 1, 5, 1, Some(ObjectCategory::Row)));
        grid.mark_rect(1, 1, 5, 1, ObjectCategory::Row);

        assert_eq!(grid.cell(1, 1), Cell::Occupied(ObjectCategory::Row));
        assert_eq!(grid.cell(0, 0), Cell::Margin);
        assert_eq!(grid.cell(1, 6), Cell::Margin);
        // Same cells cannot be taken again.
        assert!(!grid.check_rect(1, 1, 5, 1, Some(ObjectCategory::Row)));
        // The ring may overlap existing margins.
        assert!(grid.check_rect(1, 7, 5, 1, Some(ObjectCategory::Row)));
    }

    #[test]
    fn ring_must_fit() {
        let grid = PlacementGrid::new(8, 4);
        assert!(!grid.check_rect(0, 1, 2, 1, None));
        assert!(!grid.check_rect(1, 0, 2, 1, None));
        assert!(!grid.check_rect(1, 6, 2, 1, None));
        assert!(!grid.check_rect(3, 1, 2, 1, None));
        assert!(grid.check_rect(1, 1, 2, 1, None));
    }

    #[test]
    fn resize_preserves_cells() {
        let mut grid = PlacementGrid::new(8, 4);
        grid.mark_rect(1, 1, 2, 1, ObjectCategory::Row);
        grid.resize(12, 6);
        assert_eq!(grid.cell(1, 1), Cell::Occupied(ObjectCategory::Row));
        assert_eq!(grid.cell(5, 11), Cell::Free);
    }
}
