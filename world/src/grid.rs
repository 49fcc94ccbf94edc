//! Dense cell-state grid backing the maze.

use maze_race_core::{CellCoord, CellState, Direction};

/// Corner margin, in cells, reserved around agent start and goal corners.
const CORNER_MARGIN: u32 = 2;

/// Row-major matrix of [`CellState`] values with wall-filled initial state.
///
/// The grid mirrors the original carving lattice: the outer border and
/// every even-indexed row/column line begin as walls, and generation only
/// ever opens odd-coordinate cells plus the walls between them.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<CellState>,
}

impl Grid {
    /// Creates a grid of the given dimensions with every cell a wall.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        let capacity = rows as usize * cols as usize;
        Self {
            rows,
            cols,
            cells: vec![CellState::Wall; capacity],
        }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.cols && cell.row() < self.rows {
            Some(cell.row() as usize * self.cols as usize + cell.column() as usize)
        } else {
            None
        }
    }

    /// State of `cell`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Overwrites the state of `cell`; out-of-frame writes are ignored.
    pub fn set(&mut self, cell: CellCoord, state: CellState) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = state;
        }
    }

    /// Reports whether `cell` lies anywhere on the grid.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Reports whether `cell` lies strictly inside the border walls.
    #[must_use]
    pub fn is_interior(&self, cell: CellCoord) -> bool {
        cell.column() > 0
            && cell.column() < self.cols.saturating_sub(1)
            && cell.row() > 0
            && cell.row() < self.rows.saturating_sub(1)
    }

    /// The four corner cells agents start from and race toward, ordered
    /// top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn corners(&self) -> [CellCoord; 4] {
        let right = self.cols - 2;
        let bottom = self.rows - 2;
        [
            CellCoord::new(1, 1),
            CellCoord::new(right, 1),
            CellCoord::new(1, bottom),
            CellCoord::new(right, bottom),
        ]
    }

    /// Reports whether `cell` falls inside the reserved margin around any
    /// of the four corners.
    #[must_use]
    pub fn in_corner_margin(&self, cell: CellCoord) -> bool {
        let near_left = cell.column() <= CORNER_MARGIN;
        let near_right = cell.column() >= self.cols.saturating_sub(CORNER_MARGIN + 1);
        let near_top = cell.row() <= CORNER_MARGIN;
        let near_bottom = cell.row() >= self.rows.saturating_sub(CORNER_MARGIN + 1);
        (near_left || near_right) && (near_top || near_bottom)
    }

    /// Reports whether `cell` is a dead end: an open corridor cell with
    /// exactly one orthogonal path or goal neighbour. Goal cells are never
    /// dead ends themselves.
    #[must_use]
    pub fn is_dead_end(&self, cell: CellCoord) -> bool {
        if self.get(cell) != Some(CellState::Path) {
            return false;
        }

        let mut open_neighbours = 0;
        for direction in Direction::ALL {
            let Some(neighbour) = direction.step_from(cell) else {
                continue;
            };
            match self.get(neighbour) {
                Some(CellState::Path) | Some(CellState::Goal(_)) => open_neighbours += 1,
                _ => {}
            }
        }

        open_neighbours == 1
    }
}

#[cfg(test)]
mod tests {
    use super::Grid;
    use maze_race_core::{AgentId, CellCoord, CellState};

    fn open(grid: &mut Grid, column: u32, row: u32) {
        grid.set(CellCoord::new(column, row), CellState::Path);
    }

    #[test]
    fn new_grid_is_all_walls() {
        let grid = Grid::new(5, 7);
        for row in 0..5 {
            for column in 0..7 {
                assert_eq!(
                    grid.get(CellCoord::new(column, row)),
                    Some(CellState::Wall)
                );
            }
        }
        assert_eq!(grid.get(CellCoord::new(7, 0)), None);
    }

    #[test]
    fn corners_sit_one_cell_inside_the_border() {
        let grid = Grid::new(11, 15);
        assert_eq!(
            grid.corners(),
            [
                CellCoord::new(1, 1),
                CellCoord::new(13, 1),
                CellCoord::new(1, 9),
                CellCoord::new(13, 9),
            ]
        );
    }

    #[test]
    fn corner_margin_covers_all_four_corners() {
        let grid = Grid::new(11, 11);
        assert!(grid.in_corner_margin(CellCoord::new(1, 1)));
        assert!(grid.in_corner_margin(CellCoord::new(2, 2)));
        assert!(grid.in_corner_margin(CellCoord::new(9, 1)));
        assert!(grid.in_corner_margin(CellCoord::new(1, 9)));
        assert!(grid.in_corner_margin(CellCoord::new(8, 8)));
        assert!(!grid.in_corner_margin(CellCoord::new(5, 5)));
        assert!(!grid.in_corner_margin(CellCoord::new(5, 1)));
    }

    #[test]
    fn dead_end_requires_exactly_one_open_neighbour() {
        let mut grid = Grid::new(7, 7);
        open(&mut grid, 1, 1);
        open(&mut grid, 2, 1);
        open(&mut grid, 3, 1);
        // (1, 1) has a single open neighbour; (2, 1) has two.
        assert!(grid.is_dead_end(CellCoord::new(1, 1)));
        assert!(!grid.is_dead_end(CellCoord::new(2, 1)));
        assert!(!grid.is_dead_end(CellCoord::new(4, 4)));
    }

    #[test]
    fn goal_neighbour_counts_but_goal_is_never_a_dead_end() {
        let mut grid = Grid::new(7, 7);
        grid.set(CellCoord::new(1, 1), CellState::Goal(AgentId::new(4)));
        open(&mut grid, 2, 1);
        assert!(!grid.is_dead_end(CellCoord::new(1, 1)));
        assert!(grid.is_dead_end(CellCoord::new(2, 1)));
    }

    #[test]
    fn interior_excludes_border_cells() {
        let grid = Grid::new(9, 9);
        assert!(grid.is_interior(CellCoord::new(1, 1)));
        assert!(grid.is_interior(CellCoord::new(7, 7)));
        assert!(!grid.is_interior(CellCoord::new(0, 4)));
        assert!(!grid.is_interior(CellCoord::new(8, 4)));
        assert!(!grid.is_interior(CellCoord::new(4, 0)));
    }
}
