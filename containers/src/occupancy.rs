//! Dense occupancy tracking for a single container grid.

use grid_stash_core::{CellCoord, CellRect, Footprint};

/// Boolean matrix recording which cells of a grid are covered by items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![false; capacity],
        }
    }

    /// Provides the dimensions of the grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Reports whether the cell is covered. Cells outside the grid are never covered.
    #[must_use]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether every cell of the rectangle lies inside the grid and is free.
    #[must_use]
    pub fn is_area_free(&self, start: CellCoord, footprint: Footprint) -> bool {
        let rect = CellRect::new(start, footprint);
        if !rect.fits_within(self.columns, self.rows) {
            return false;
        }

        rect.cells().all(|cell| !self.is_occupied(cell))
    }

    /// Reports whether every cell of the rectangle currently holds `value`.
    #[must_use]
    pub fn is_uniform(&self, rect: CellRect, value: bool) -> bool {
        rect.fits_within(self.columns, self.rows)
            && rect.cells().all(|cell| self.is_occupied(cell) == value)
    }

    /// Sets every cell of the rectangle to `value`.
    ///
    /// The caller validates the rectangle; writing outside the grid is a
    /// bookkeeping fault and panics.
    pub fn occupy(&mut self, rect: CellRect, value: bool) {
        assert!(
            rect.fits_within(self.columns, self.rows),
            "occupancy write outside a {}x{} grid: {rect:?}",
            self.columns,
            self.rows,
        );

        for cell in rect.cells() {
            if let Some(index) = self.index(cell) {
                self.cells[index] = value;
            }
        }
    }

    /// Frees every cell.
    pub fn reset(&mut self) {
        self.cells.fill(false);
    }

    /// Finds the first free anchor for the footprint.
    ///
    /// Anchors are scanned row-major, top row first, left to right, so the
    /// same occupancy always yields the same answer.
    #[must_use]
    pub fn first_fit(&self, footprint: Footprint) -> Option<CellCoord> {
        if footprint.width() > self.columns || footprint.height() > self.rows {
            return None;
        }

        let last_row = self.rows - footprint.height();
        let last_column = self.columns - footprint.width();
        for row in 0..=last_row {
            for column in 0..=last_column {
                let start = CellCoord::new(column, row);
                if self.is_area_free(start, footprint) {
                    return Some(start);
                }
            }
        }

        None
    }

    /// Number of covered cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// Raw row-major cell states.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_outside_grid_is_never_free() {
        let grid = OccupancyGrid::new(4, 3);
        assert!(grid.is_area_free(CellCoord::new(2, 1), Footprint::new(2, 2)));
        assert!(!grid.is_area_free(CellCoord::new(3, 0), Footprint::new(2, 1)));
        assert!(!grid.is_area_free(CellCoord::new(0, 2), Footprint::new(1, 2)));
    }

    #[test]
    fn occupy_and_release_restores_grid() {
        let mut grid = OccupancyGrid::new(5, 5);
        let before = grid.clone();
        let rect = CellRect::new(CellCoord::new(1, 2), Footprint::new(3, 2));

        grid.occupy(rect, true);
        assert_eq!(grid.occupied_count(), 6);
        assert!(grid.is_uniform(rect, true));
        assert!(!grid.is_area_free(CellCoord::new(3, 3), Footprint::new(1, 1)));

        grid.occupy(rect, false);
        assert_eq!(grid, before);
    }

    #[test]
    fn first_fit_scans_row_major_from_top() {
        let mut grid = OccupancyGrid::new(4, 4);
        let first = grid.first_fit(Footprint::new(2, 2));
        assert_eq!(first, Some(CellCoord::new(0, 0)));
        grid.occupy(CellRect::new(CellCoord::new(0, 0), Footprint::new(2, 2)), true);

        let second = grid.first_fit(Footprint::new(2, 2));
        assert_eq!(second, Some(CellCoord::new(2, 0)));
        grid.occupy(CellRect::new(CellCoord::new(2, 0), Footprint::new(2, 2)), true);

        assert_eq!(
            grid.first_fit(Footprint::new(4, 1)),
            Some(CellCoord::new(0, 2))
        );
    }

    #[test]
    fn first_fit_rejects_oversized_footprints() {
        let grid = OccupancyGrid::new(2, 2);
        assert_eq!(grid.first_fit(Footprint::new(3, 1)), None);
        assert_eq!(grid.first_fit(Footprint::new(1, 3)), None);
    }

    #[test]
    #[should_panic(expected = "occupancy write outside")]
    fn occupy_outside_grid_panics() {
        let mut grid = OccupancyGrid::new(2, 2);
        grid.occupy(CellRect::new(CellCoord::new(1, 1), Footprint::new(2, 1)), true);
    }
}
