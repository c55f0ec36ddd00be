use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IteratorRandom};

use super::grid::Grid;
use super::state::Position;

/// Random draws tried before falling back to scanning free cells
const MAX_REJECTION_ATTEMPTS: usize = 64;

/// Places food on a uniformly random free cell
pub struct FoodSpawner {
    grid: Grid,
    rng: StdRng,
}

impl FoodSpawner {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic spawner, for reproducible games and tests
    pub fn with_seed(grid: Grid, seed: u64) -> Self {
        Self {
            grid,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pick a free cell, or `None` when `occupied` covers the whole board.
    pub fn spawn(&mut self, occupied: &HashSet<Position>) -> Option<Position> {
        let free = self.grid.cell_count().saturating_sub(occupied.len());
        if free == 0 {
            return None;
        }

        let n = self.grid.size() as i32;
        for _ in 0..MAX_REJECTION_ATTEMPTS {
            let pos = Position::new(self.rng.gen_range(0..n), self.rng.gen_range(0..n));
            if !occupied.contains(&pos) {
                return Some(pos);
            }
        }

        // Crowded board: choose among the remaining cells directly
        self.grid
            .cells()
            .filter(|pos| !occupied.contains(pos))
            .choose(&mut self.rng)
    }
}
