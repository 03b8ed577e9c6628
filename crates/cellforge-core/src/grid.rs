use crate::cell::{Cell, PendingOrder};
use rand::Rng;
use std::{error::Error, fmt};

/// Uniform draw above this marks a candidate resource node.
const NODE_DRAW_THRESHOLD: f64 = 0.99;

/// Fixed-size board of cells, stored row-major: index = `row * columns + col`.
///
/// Dimensions are constant for the lifetime of the grid. The `resource_node`
/// flag on each cell is assigned once by [`Grid::generate`] (or supplied via
/// [`Grid::from_cells`]) and never altered by any grid operation.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridInitError {
    ZeroDimension,
    CellCountMismatch { expected: usize, actual: usize },
}

impl fmt::Display for GridInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridInitError::ZeroDimension => {
                write!(f, "grid dimensions must both be positive")
            }
            GridInitError::CellCountMismatch { expected, actual } => write!(
                f,
                "cells.len() ({actual}) must match rows * columns ({expected})"
            ),
        }
    }
}

impl Error for GridInitError {}

impl Grid {
    /// Generate an all-dead grid, scattering resource nodes in a single
    /// row-major pass: each cell takes one uniform draw and becomes a node
    /// iff the draw exceeds the threshold while quota remains. The realized
    /// node count is therefore at most `rows * columns / 100` and may fall
    /// short of it.
    pub fn generate<R: Rng + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Self {
        let mut remaining_nodes = rows * columns / 100;
        let mut cells = Vec::with_capacity(rows * columns);
        for _ in 0..rows * columns {
            let draw = rng.random::<f64>();
            let resource_node = draw > NODE_DRAW_THRESHOLD && remaining_nodes > 0;
            if resource_node {
                remaining_nodes -= 1;
            }
            cells.push(Cell {
                alive: false,
                pending: PendingOrder::None,
                resource_node,
            });
        }
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Build a grid from explicit cells, e.g. a hand-laid test pattern.
    pub fn from_cells(
        rows: usize,
        columns: usize,
        cells: Vec<Cell>,
    ) -> Result<Self, GridInitError> {
        if rows == 0 || columns == 0 {
            return Err(GridInitError::ZeroDimension);
        }
        let expected = rows * columns;
        if cells.len() != expected {
            return Err(GridInitError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.columns {
            self.cells.get(row * self.columns + col)
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        if row < self.rows && col < self.columns {
            self.cells.get_mut(row * self.columns + col)
        } else {
            None
        }
    }

    pub(crate) fn replace_cells(&mut self, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.cells.len());
        self.cells = cells;
    }

    /// Count live Moore neighbors, clipped to the grid bounds (no wraparound).
    pub fn live_neighbors(&self, row: usize, col: usize) -> u8 {
        let mut count = 0;
        for row_offset in -1i64..=1 {
            for col_offset in -1i64..=1 {
                if row_offset == 0 && col_offset == 0 {
                    continue;
                }
                let neighbor_row = row as i64 + row_offset;
                let neighbor_col = col as i64 + col_offset;
                if neighbor_row < 0
                    || neighbor_row >= self.rows as i64
                    || neighbor_col < 0
                    || neighbor_col >= self.columns as i64
                {
                    continue;
                }
                if self.cells[neighbor_row as usize * self.columns + neighbor_col as usize].alive {
                    count += 1;
                }
            }
        }
        count
    }

    /// Next `alive` status for one cell under the Game of Life rule, reading
    /// only the grid's current `alive` values. Staged orders are invisible
    /// here.
    pub fn next_state(&self, row: usize, col: usize) -> bool {
        let alive = self.cells[row * self.columns + col].alive;
        let neighbors = self.live_neighbors(row, col);
        matches!((alive, neighbors), (true, 2 | 3) | (false, 3))
    }

    /// Bake every staged order into `alive` and reset all markers. Returns
    /// the number of non-neutral orders applied.
    pub(crate) fn apply_staged_orders(&mut self) -> usize {
        let mut applied = 0;
        for cell in &mut self.cells {
            if !cell.pending.is_none() {
                cell.alive = cell.pending == PendingOrder::MarkAlive;
                applied += 1;
            }
            cell.pending = PendingOrder::None;
        }
        applied
    }

    /// Overwrite every cell's `alive` with an independent draw of
    /// probability `fill`. Staged orders and resource nodes are untouched.
    pub(crate) fn randomize_alive<R: Rng + ?Sized>(&mut self, rng: &mut R, fill: f64) {
        for cell in &mut self.cells {
            cell.alive = rng.random_bool(fill);
        }
    }

    /// Kill every cell, leaving staged orders and resource nodes untouched.
    pub(crate) fn clear_alive(&mut self) {
        for cell in &mut self.cells {
            cell.alive = false;
        }
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    pub fn resource_node_count(&self) -> usize {
        self.cells.iter().filter(|c| c.resource_node).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn grid_with_alive(rows: usize, columns: usize, alive: &[(usize, usize)]) -> Grid {
        let mut cells = vec![Cell::default(); rows * columns];
        for &(row, col) in alive {
            cells[row * columns + col].alive = true;
        }
        Grid::from_cells(rows, columns, cells).expect("valid test grid")
    }

    #[test]
    fn generated_grid_respects_node_quota() {
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let grid = Grid::generate(40, 40, &mut rng);
        assert_eq!(grid.alive_count(), 0);
        assert!(grid.resource_node_count() <= 16);
    }

    #[test]
    fn generation_is_deterministic_for_fixed_seed() {
        let mut rng_a = ChaCha12Rng::seed_from_u64(123);
        let mut rng_b = ChaCha12Rng::seed_from_u64(123);
        let a = Grid::generate(40, 40, &mut rng_a);
        let b = Grid::generate(40, 40, &mut rng_b);
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn from_cells_rejects_wrong_count() {
        let result = Grid::from_cells(3, 3, vec![Cell::default(); 8]);
        assert_eq!(
            result.unwrap_err(),
            GridInitError::CellCountMismatch {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn neighbor_count_clips_at_corners_and_edges() {
        // Full 3x3 block: the corner sees 3 neighbors, an edge cell 5,
        // the center 8. Nothing wraps around.
        let all: Vec<(usize, usize)> = (0..3).flat_map(|r| (0..3).map(move |c| (r, c))).collect();
        let grid = grid_with_alive(3, 3, &all);
        assert_eq!(grid.live_neighbors(0, 0), 3);
        assert_eq!(grid.live_neighbors(0, 1), 5);
        assert_eq!(grid.live_neighbors(1, 1), 8);
    }

    #[test]
    fn rule_covers_survival_birth_and_death() {
        let grid = grid_with_alive(3, 3, &[(0, 0), (0, 1), (0, 2), (1, 1)]);
        // (1, 1) is alive with 3 neighbors: survives.
        assert!(grid.next_state(1, 1));
        // (1, 0) is dead with 3 neighbors: born.
        assert!(grid.next_state(1, 0));
        // (0, 0) is alive with 2 neighbors: survives.
        assert!(grid.next_state(0, 0));
        // (2, 1) is dead with 1 neighbor: stays dead.
        assert!(!grid.next_state(2, 1));
    }

    #[test]
    fn rule_is_pure_over_the_current_grid() {
        let grid = grid_with_alive(3, 3, &[(0, 1), (1, 1), (2, 1)]);
        let first: Vec<bool> = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .map(|(r, c)| grid.next_state(r, c))
            .collect();
        let second: Vec<bool> = (0..3)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .map(|(r, c)| grid.next_state(r, c))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn apply_staged_orders_bakes_and_clears_markers() {
        let mut grid = grid_with_alive(2, 2, &[(0, 0)]);
        grid.cell_mut(0, 0).unwrap().pending = PendingOrder::MarkDead;
        grid.cell_mut(1, 1).unwrap().pending = PendingOrder::MarkAlive;
        let applied = grid.apply_staged_orders();
        assert_eq!(applied, 2);
        assert!(!grid.cell(0, 0).unwrap().alive);
        assert!(grid.cell(1, 1).unwrap().alive);
        assert!(grid.cells().iter().all(|c| c.pending.is_none()));
    }

    #[test]
    fn clear_alive_preserves_orders_and_nodes() {
        let mut cells = vec![Cell::default(); 4];
        cells[0].alive = true;
        cells[1].resource_node = true;
        cells[2].pending = PendingOrder::MarkAlive;
        let mut grid = Grid::from_cells(2, 2, cells).unwrap();
        grid.clear_alive();
        grid.clear_alive();
        assert_eq!(grid.alive_count(), 0);
        assert!(grid.cell(0, 1).unwrap().resource_node);
        assert_eq!(grid.cell(1, 0).unwrap().pending, PendingOrder::MarkAlive);
    }
}
