//! Placement search, growth and the object registry.

use crate::config::{CanvasConfig, SearchStrategy};
use crate::grid::{Cell, PlacementGrid};
use crate::item::PlacementItem;
use indexmap::IndexMap;
use sceneflow_api_core::{CoreError, CoreResult, ObjectCategory, ObjectId, Placement};

/// Grid plus registry, the allocator's public face.
///
/// Every placement either succeeds at the current canvas size or grows the
/// grid by one cell on each axis and retries, up to the configured cap.
#[derive(Debug)]
pub struct PlacementMap {
    cfg: CanvasConfig,
    grid: PlacementGrid,
    items: IndexMap<ObjectId, PlacementItem>,
}

impl PlacementMap {
    pub fn new(cfg: CanvasConfig) -> Self {
        Self {
            cfg,
            grid: PlacementGrid::new(cfg.width, cfg.height),
            items: IndexMap::new(),
        }
    }

    pub fn grid(&self) -> &PlacementGrid {
        &self.grid
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid.width(), self.grid.height())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.items.contains_key(&object)
    }

    pub fn get(&self, object: ObjectId) -> Option<&PlacementItem> {
        self.items.get(&object)
    }

    pub fn placement_of(&self, object: ObjectId) -> Option<Placement> {
        self.items.get(&object).map(PlacementItem::placement)
    }

    /// Registry iteration in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &PlacementItem> {
        self.items.values()
    }

    /// Find and mark a spot for one object.
    ///
    /// With `align_with` the search is restricted to the target's row; a
    /// category mismatch against the target is a fatal precondition error,
    /// not a silent retry.
    pub fn place(
        &mut self,
        object: ObjectId,
        category: ObjectCategory,
        width: usize,
        height: usize,
        align_with: Option<ObjectId>,
    ) -> CoreResult<(usize, usize)> {
        let align_rows = match align_with.and_then(|id| self.items.get(&id)) {
            Some(target) => {
                if target.category != category {
                    return Err(CoreError::InvalidAlignment {
                        target: target.object,
                        target_category: target.category,
                        category,
                    });
                }
                Some((target.row, target.height))
            }
            None => None,
        };

        for _ in 0..self.cfg.growth_cap {
            if let Some((row, col)) = self.search(width, height, Some(category), align_rows) {
                self.grid.mark_rect(row, col, width, height, category);
                self.items.insert(
                    object,
                    PlacementItem {
                        object,
                        category,
                        row,
                        col,
                        width,
                        height,
                    },
                );
                log::trace!("placed {object:?} ({width}x{height}) at ({row}, {col})");
                return Ok((row, col));
            }
            self.grow();
        }

        Err(CoreError::PlacementExhausted {
            width,
            height,
            attempts: self.cfg.growth_cap,
        })
    }

    /// Pin an object at known coordinates, growing the grid if the pinned
    /// rectangle does not fit yet. Used when a section reset keeps positions
    /// and when group members land inside their reserved envelope.
    pub fn place_at(
        &mut self,
        object: ObjectId,
        category: ObjectCategory,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    ) -> CoreResult<()> {
        for _ in 0..self.cfg.growth_cap {
            if self.grid.check_rect(row, col, width, height, Some(category)) {
                self.grid.mark_rect(row, col, width, height, category);
                self.items.insert(
                    object,
                    PlacementItem {
                        object,
                        category,
                        row,
                        col,
                        width,
                        height,
                    },
                );
                return Ok(());
            }
            self.grow();
        }

        Err(CoreError::PlacementExhausted {
            width,
            height,
            attempts: self.cfg.growth_cap,
        })
    }

    /// Place a group of same-category objects as one sub-grid.
    ///
    /// The arrangement doubles the number of items per row until the group's
    /// aggregate aspect ratio reaches the canvas aspect ratio, unless
    /// `force_columns` fixes it. One envelope placement is reserved for the
    /// whole group, then each member is pinned inside it.
    pub fn place_group(
        &mut self,
        category: ObjectCategory,
        members: &[(ObjectId, usize, usize)],
        force_columns: Option<usize>,
    ) -> CoreResult<Vec<(usize, usize)>> {
        if members.is_empty() {
            return Ok(Vec::new());
        }

        let columns = force_columns
            .unwrap_or_else(|| self.group_columns(members))
            .max(1);

        let rows: Vec<&[(ObjectId, usize, usize)]> = members.chunks(columns).collect();
        let row_widths: Vec<usize> = rows
            .iter()
            .map(|row| row.iter().map(|(_, w, _)| *w).sum::<usize>() + row.len() - 1)
            .collect();
        let row_heights: Vec<usize> = rows
            .iter()
            .map(|row| row.iter().map(|(_, _, h)| *h).max().unwrap_or(1))
            .collect();
        let envelope_width = row_widths.iter().copied().max().unwrap_or(1);
        let envelope_height = row_heights.iter().sum::<usize>() + rows.len() - 1;

        // Reserve the envelope, then fill it row by row.
        let (origin_row, origin_col) = self.reserve(envelope_width, envelope_height, category)?;
        self.grid
            .mark_ring(origin_row, origin_col, envelope_width, envelope_height);

        let mut origins = Vec::with_capacity(members.len());
        let mut row_cursor = origin_row;
        for (row, height) in rows.iter().zip(&row_heights) {
            let mut col_cursor = origin_col;
            for (object, w, h) in row.iter() {
                self.place_at(*object, category, row_cursor, col_cursor, *w, *h)?;
                origins.push((row_cursor, col_cursor));
                col_cursor += w + 1;
            }
            row_cursor += height + 1;
        }

        Ok(origins)
    }

    /// Reset the registry and grid to the canvas-derived initial size,
    /// keeping only the listed objects. With `keep_positions` they stay at
    /// their recorded coordinates, otherwise they are re-placed by search.
    pub fn reset(&mut self, keep: &[ObjectId], keep_positions: bool) -> CoreResult<()> {
        let kept: Vec<PlacementItem> = keep
            .iter()
            .filter_map(|id| self.items.get(id).copied())
            .collect();

        self.items.clear();
        self.grid = PlacementGrid::new(self.cfg.width, self.cfg.height);

        for item in kept {
            if keep_positions {
                self.place_at(
                    item.object,
                    item.category,
                    item.row,
                    item.col,
                    item.width,
                    item.height,
                )?;
            } else {
                self.place(item.object, item.category, item.width, item.height, None)?;
            }
        }
        Ok(())
    }

    /// Grow the grid while preserving existing placements.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.grid.resize(width, height);
    }

    /// Width of the occupied bounding region (touched columns plus margins).
    pub fn used_width(&self) -> usize {
        self.grid.used_width()
    }

    pub fn used_height(&self) -> usize {
        self.grid.used_height()
    }

    /// Centre of the used region, `(x, y)` in cell units.
    pub fn origin(&self) -> (f32, f32) {
        (
            self.used_width() as f32 / 2.0,
            self.used_height() as f32 / 2.0,
        )
    }

    /// Scale factor that fits the used region (padded by one cell) into the
    /// given viewport.
    pub fn fit_scale(&self, viewport_width: f32, viewport_height: f32) -> f32 {
        let w = (self.used_width() + 1) as f32;
        let h = (self.used_height() + 1) as f32;
        (h / viewport_height).max(w / viewport_width)
    }

    pub fn dump(&self) -> String {
        self.grid.dump()
    }

    fn grow(&mut self) {
        let width = self.grid.width() + 1;
        let height = self.grid.height() + 1;
        self.grid.resize(width, height);
        log::debug!("placement grid grown to {width}x{height}");
    }

    /// Search for an envelope origin with growth, without marking interior
    /// cells.
    fn reserve(
        &mut self,
        width: usize,
        height: usize,
        category: ObjectCategory,
    ) -> CoreResult<(usize, usize)> {
        for _ in 0..self.cfg.growth_cap {
            if let Some(origin) = self.search(width, height, Some(category), None) {
                return Ok(origin);
            }
            self.grow();
        }
        Err(CoreError::PlacementExhausted {
            width,
            height,
            attempts: self.cfg.growth_cap,
        })
    }

    /// Items-per-row count whose aggregate aspect ratio first reaches the
    /// canvas aspect ratio, doubling from 1.
    fn group_columns(&self, members: &[(ObjectId, usize, usize)]) -> usize {
        let canvas_aspect = self.cfg.aspect();
        let mut columns = 1usize;
        while columns < members.len() {
            let row_width: usize =
                members[..columns].iter().map(|(_, w, _)| *w).sum::<usize>() + columns - 1;
            let rows = members.len().div_ceil(columns);
            let row_height = members[0].2.max(1);
            let total_height = row_height * rows + rows - 1;
            if row_width as f32 / total_height as f32 >= canvas_aspect {
                break;
            }
            columns *= 2;
        }
        columns.min(members.len())
    }

    fn search(
        &self,
        width: usize,
        height: usize,
        category: Option<ObjectCategory>,
        align_rows: Option<(usize, usize)>,
    ) -> Option<(usize, usize)> {
        let free = |row: usize, col: usize| self.grid.cell(row, col) == Cell::Free;

        // Alignment restricts candidate origins to the rows the target
        // occupies; a taller target offers each of its rows in turn.
        if let Some((first_row, rows)) = align_rows {
            for row in first_row..first_row + rows {
                for col in 1..self.grid.width() {
                    if free(row, col) && self.grid.check_rect(row, col, width, height, category) {
                        return Some((row, col));
                    }
                }
            }
            return None;
        }

        match self.cfg.strategy {
            SearchStrategy::BesideFirst => {
                for row in 1..self.grid.height() {
                    for col in 1..self.grid.width() {
                        if free(row, col)
                            && self.grid.check_rect(row, col, width, height, category)
                        {
                            return Some((row, col));
                        }
                    }
                }
            }
            SearchStrategy::BelowFirst => {
                for col in 1..self.grid.width() {
                    for row in 1..self.grid.height() {
                        if free(row, col)
                            && self.grid.check_rect(row, col, width, height, category)
                        {
                            return Some((row, col));
                        }
                    }
                }
            }
        }
        None
    }
}
