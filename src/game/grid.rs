use super::state::Position;

/// Fixed square board of `size` x `size` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        let n = self.size as i32;
        pos.x >= 0 && pos.x < n && pos.y >= 0 && pos.y < n
    }

    /// Centre cell, used as the snake's starting point
    pub fn center(&self) -> Position {
        let mid = (self.size / 2) as i32;
        Position::new(mid, mid)
    }

    /// Iterate every cell row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let n = self.size as i32;
        (0..n).flat_map(move |y| (0..n).map(move |x| Position::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(20);

        assert!(grid.in_bounds(Position::new(0, 0)));
        assert!(grid.in_bounds(Position::new(19, 19)));
        assert!(!grid.in_bounds(Position::new(-1, 0)));
        assert!(!grid.in_bounds(Position::new(0, -1)));
        assert!(!grid.in_bounds(Position::new(20, 0)));
        assert!(!grid.in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_center_and_cells() {
        let grid = Grid::new(20);
        assert_eq!(grid.center(), Position::new(10, 10));
        assert_eq!(grid.cell_count(), 400);
        assert_eq!(grid.cells().count(), 400);
        assert!(grid.cells().all(|p| grid.in_bounds(p)));
    }
}
