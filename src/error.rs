use thiserror::Error;

use crate::pathing_grid::Role;
use crate::Position;

/// Convenient result alias for grid and search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by grid mutation and search setup. A search that has started never fails;
/// not finding a path is reported through [SearchResult](crate::solver::SearchResult).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Raised when a grid is constructed with zero rows or zero columns.
    #[error("invalid grid dimensions {rows}x{cols}: both must be positive")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Raised when a position lies outside `[0, rows) x [0, cols)`.
    #[error("position {position} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },

    /// Raised when a barrier would overlap a start or goal cell.
    #[error("cannot mark {position} as {requested}: cell is currently {current}")]
    ConflictingRole {
        position: Position,
        current: Role,
        requested: Role,
    },

    /// Raised when a heuristic selector is not recognised.
    #[error("unknown heuristic: {0} (expected manhattan, euclidean or chebyshev)")]
    UnknownHeuristic(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = Error::OutOfBounds {
            position: Position::new(7, 2),
            rows: 5,
            cols: 5,
        };
        assert_eq!(err.to_string(), "position (7, 2) is outside the 5x5 grid");

        let err = Error::ConflictingRole {
            position: Position::new(0, 0),
            current: Role::Start,
            requested: Role::Barrier,
        };
        assert_eq!(
            err.to_string(),
            "cannot mark (0, 0) as barrier: cell is currently start"
        );
    }
}
