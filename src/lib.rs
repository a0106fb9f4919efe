//! # grid_astar
//!
//! Observable [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search on a rectangular,
//! 4-connected grid with a uniform step cost. Every cell carries a [Role] which the search updates
//! as it runs (frontier, visited, path), so a presentation layer can replay the search through a
//! [SearchObserver](solver::SearchObserver) or by reading the grid afterwards. The search itself
//! works headless and is fully deterministic for identical inputs.
//!
//! Neighbour lists are a cache of the barrier layout: call
//! [refresh_all_neighbours](PathingGrid::refresh_all_neighbours) after editing the grid and before
//! searching.
//!
//! ```
//! use grid_astar::{run_search, Heuristic, PathingGrid, Position, Role};
//!
//! let mut grid = PathingGrid::new(5, 5).unwrap();
//! let start = Position::new(0, 0);
//! let goal = Position::new(4, 4);
//! grid.set_role(start, Role::Start).unwrap();
//! grid.set_role(goal, Role::Goal).unwrap();
//! grid.refresh_all_neighbours();
//! let result = run_search(&mut grid, start, goal, 1.0, Heuristic::Manhattan).unwrap();
//! assert!(result.found);
//! assert_eq!(result.path.len(), 9);
//! ```
pub mod error;
pub mod heuristic;
pub mod pathing_grid;
mod search_context;
pub mod solver;

use core::fmt;
use smallvec::SmallVec;

pub use error::{Error, Result};
pub use heuristic::Heuristic;
pub use pathing_grid::{Cell, PathingGrid, Role};
pub use solver::astar::AstarSolver;
pub use solver::{SearchConfig, SearchObserver, SearchResult};

/// Inline capacity for neighbour lists; a cell has at most four neighbours.
pub const N_SMALLVEC_SIZE: usize = 4;

/// A (row, column) grid coordinate. Ordered by row first, then column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Absolute row and column offsets to `other`.
    pub fn abs_delta(&self, other: &Position) -> (usize, usize) {
        (self.row.abs_diff(other.row), self.col.abs_diff(other.col))
    }

    /// The in-bounds von Neumann neighbourhood, always in the order down, up, right, left.
    /// Search visitation order depends on this order.
    pub fn neumann_neighborhood(
        &self,
        rows: usize,
        cols: usize,
    ) -> SmallVec<[Position; N_SMALLVEC_SIZE]> {
        let mut neighbours = SmallVec::new();
        if self.row + 1 < rows {
            neighbours.push(Position::new(self.row + 1, self.col));
        }
        if self.row > 0 {
            neighbours.push(Position::new(self.row - 1, self.col));
        }
        if self.col + 1 < cols {
            neighbours.push(Position::new(self.row, self.col + 1));
        }
        if self.col > 0 {
            neighbours.push(Position::new(self.row, self.col - 1));
        }
        neighbours
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Runs a single A* search with the given step cost and heuristic and no observer.
/// See [AstarSolver::search] for the exact semantics.
pub fn run_search(
    grid: &mut PathingGrid,
    start: Position,
    goal: Position,
    step_cost: f64,
    heuristic: Heuristic,
) -> Result<SearchResult> {
    let solver = AstarSolver::with_config(
        SearchConfig::default()
            .with_step_cost(step_cost)
            .with_heuristic(heuristic),
    );
    solver.search(grid, start, goal)
}
