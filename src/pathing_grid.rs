use core::fmt;
use itertools::iproduct;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::{Position, N_SMALLVEC_SIZE};

/// What a cell currently represents. The caller places [Start](Role::Start), [Goal](Role::Goal)
/// and [Barrier](Role::Barrier); the search writes [Frontier](Role::Frontier),
/// [Visited](Role::Visited) and [Path](Role::Path).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Empty,
    Start,
    Goal,
    Barrier,
    /// Discovered and waiting in the open set.
    Frontier,
    /// Expanded.
    Visited,
    /// Part of the reconstructed path.
    Path,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::Empty => "empty",
            Role::Start => "start",
            Role::Goal => "goal",
            Role::Barrier => "barrier",
            Role::Frontier => "frontier",
            Role::Visited => "visited",
            Role::Path => "path",
        }
    }

    /// Single character used by the [Display] implementation of [PathingGrid].
    pub fn symbol(&self) -> char {
        match self {
            Role::Empty => '.',
            Role::Start => 'S',
            Role::Goal => 'G',
            Role::Barrier => '#',
            Role::Frontier => 'o',
            Role::Visited => 'x',
            Role::Path => '*',
        }
    }

    /// Roles written by a search run, as opposed to the ones placed by the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self, Role::Frontier | Role::Visited | Role::Path)
    }

    fn is_endpoint(&self) -> bool {
        matches!(self, Role::Start | Role::Goal)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single grid position. Neighbours are stored as positions into the owning [PathingGrid].
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    position: Position,
    role: Role,
    neighbours: SmallVec<[Position; N_SMALLVEC_SIZE]>,
}

impl Cell {
    fn new(position: Position) -> Cell {
        Cell {
            position,
            role: Role::Empty,
            neighbours: SmallVec::new(),
        }
    }
    pub fn position(&self) -> Position {
        self.position
    }
    pub fn role(&self) -> Role {
        self.role
    }
    /// Adjacent non-barrier cells as of the last refresh, in down, up, right, left order.
    pub fn neighbours(&self) -> &[Position] {
        &self.neighbours
    }
}

/// [PathingGrid] owns a fixed `rows x cols` block of [Cell]s in row-major order. Besides the
/// roles it caches per-cell neighbour lists, which are only rebuilt on request, and maintains
/// connected components of the non-barrier cells in a [UnionFind] structure.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl PathingGrid {
    /// Builds a grid of empty cells. Fails with [Error::InvalidDimensions] if either extent is 0.
    pub fn new(rows: usize, cols: usize) -> Result<PathingGrid> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidDimensions { rows, cols });
        }
        let cells = iproduct!(0..rows, 0..cols)
            .map(|(row, col)| Cell::new(Position::new(row, col)))
            .collect();
        let mut grid = PathingGrid {
            rows,
            cols,
            cells,
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn in_bounds(&self, position: &Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }
    fn get_ix(&self, position: &Position) -> usize {
        position.row * self.cols + position.col
    }
    fn checked_ix(&self, position: &Position) -> Result<usize> {
        if self.in_bounds(position) {
            Ok(self.get_ix(position))
        } else {
            Err(Error::OutOfBounds {
                position: *position,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
    pub fn cell(&self, position: Position) -> Result<&Cell> {
        let ix = self.checked_ix(&position)?;
        Ok(&self.cells[ix])
    }
    pub fn role(&self, position: Position) -> Result<Role> {
        self.cell(position).map(Cell::role)
    }
    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }
    /// Every position of the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        iproduct!(0..self.rows, 0..self.cols).map(|(row, col)| Position::new(row, col))
    }

    /// Sets the role of one cell without touching its neighbours. Placing a barrier over a start
    /// or goal, or an endpoint over a barrier, is rejected with [Error::ConflictingRole]; clear the
    /// cell to [Role::Empty] first. Neighbour caches are not updated.
    pub fn set_role(&mut self, position: Position, role: Role) -> Result<()> {
        let ix = self.checked_ix(&position)?;
        let current = self.cells[ix].role;
        let conflicting = (current == Role::Barrier && role.is_endpoint())
            || (current.is_endpoint() && role == Role::Barrier);
        if conflicting {
            debug!("Rejected marking {} as {} over {}", position, role, current);
            return Err(Error::ConflictingRole {
                position,
                current,
                requested: role,
            });
        }
        self.write_role(ix, role);
        Ok(())
    }

    /// Role update used by the search; positions come from neighbour lists and are in bounds.
    pub(crate) fn mark(&mut self, position: Position, role: Role) {
        let ix = self.get_ix(&position);
        self.write_role(ix, role);
    }

    /// Joins newly connected components and flags the components as dirty if components are
    /// (potentially) broken apart into multiple.
    fn write_role(&mut self, ix: usize, role: Role) {
        let was_blocked = self.cells[ix].role == Role::Barrier;
        let blocked = role == Role::Barrier;
        self.cells[ix].role = role;
        if blocked && !was_blocked {
            self.components_dirty = true;
        } else if was_blocked && !blocked {
            let position = self.cells[ix].position;
            for n in position.neumann_neighborhood(self.rows, self.cols) {
                let n_ix = self.get_ix(&n);
                if self.cells[n_ix].role != Role::Barrier {
                    self.components.union(ix, n_ix);
                }
            }
        }
    }

    fn compute_neighbours(&self, position: &Position) -> SmallVec<[Position; N_SMALLVEC_SIZE]> {
        position
            .neumann_neighborhood(self.rows, self.cols)
            .into_iter()
            .filter(|n| self.cells[self.get_ix(n)].role != Role::Barrier)
            .collect()
    }

    /// Rebuilds the neighbour list of a single cell from the current barrier layout.
    pub fn recompute_neighbours(&mut self, position: Position) -> Result<()> {
        let ix = self.checked_ix(&position)?;
        self.cells[ix].neighbours = self.compute_neighbours(&position);
        Ok(())
    }

    /// Rebuilds every neighbour list. Must be called before a search whenever barriers changed.
    pub fn refresh_all_neighbours(&mut self) {
        for ix in 0..self.cells.len() {
            let position = self.cells[ix].position;
            self.cells[ix].neighbours = self.compute_neighbours(&position);
        }
    }

    /// Cached neighbours of an in-bounds position.
    pub(crate) fn neighbours_of(&self, position: &Position) -> &[Position] {
        &self.cells[self.get_ix(position)].neighbours
    }

    /// Resets every cell to [Role::Empty] and drops all neighbour caches.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.role = Role::Empty;
            cell.neighbours.clear();
        }
        self.generate_components();
    }

    /// Removes the traces of a previous search and any old start or goal marks while keeping
    /// barriers, then marks `start` and `goal`.
    pub fn reset_search(&mut self, start: Position, goal: Position) -> Result<()> {
        self.validate_endpoints(&start, &goal)?;
        let transient: Vec<Position> = self
            .cells
            .iter()
            .filter(|c| c.role.is_transient() || c.role.is_endpoint())
            .map(|c| c.position)
            .collect();
        for position in transient {
            self.set_role(position, Role::Empty)?;
        }
        self.set_role(start, Role::Start)?;
        self.set_role(goal, Role::Goal)
    }

    /// Checks that both endpoints are in bounds and not barriers.
    pub fn validate_endpoints(&self, start: &Position, goal: &Position) -> Result<()> {
        for (position, requested) in [(start, Role::Start), (goal, Role::Goal)] {
            let current = self.role(*position)?;
            if current == Role::Barrier {
                debug!("Search endpoint {} is a barrier", position);
                return Err(Error::ConflictingRole {
                    position: *position,
                    current,
                    requested,
                });
            }
        }
        Ok(())
    }

    /// Retrieves the component id a given [Position] belongs to.
    pub fn get_component(&self, position: &Position) -> Result<usize> {
        let ix = self.checked_ix(position)?;
        Ok(self.components.find(ix))
    }

    /// Checks if start and goal are non-barrier cells on the same component. Uses the components
    /// as last generated; see [update](Self::update).
    pub fn reachable(&self, start: &Position, goal: &Position) -> bool {
        if !self.in_bounds(start) || !self.in_bounds(goal) {
            return false;
        }
        let (start_ix, goal_ix) = (self.get_ix(start), self.get_ix(goal));
        self.cells[start_ix].role != Role::Barrier
            && self.cells[goal_ix].role != Role::Barrier
            && self.components.equiv(start_ix, goal_ix)
    }

    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up 4-connected non-barrier cells.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for (row, col) in iproduct!(0..self.rows, 0..self.cols) {
            let ix = row * self.cols + col;
            if self.cells[ix].role == Role::Barrier {
                continue;
            }
            if row + 1 < self.rows && self.cells[ix + self.cols].role != Role::Barrier {
                self.components.union(ix, ix + self.cols);
            }
            if col + 1 < self.cols && self.cells[ix + 1].role != Role::Barrier {
                self.components.union(ix, ix + 1);
            }
        }
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.cols) {
            let line: String = row.iter().map(|c| c.role.symbol()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
