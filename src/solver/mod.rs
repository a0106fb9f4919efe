use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::heuristic::Heuristic;
use crate::pathing_grid::Role;
use crate::Position;

pub mod astar;

/// Tuning for [AstarSolver](astar::AstarSolver).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    /// Cost of every move between adjacent cells. Must be positive and finite.
    pub step_cost: f64,
    pub heuristic: Heuristic,
    /// Consult the connected components before searching and return immediately, without
    /// visiting anything, when the goal cannot be reached.
    pub skip_unreachable: bool,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            step_cost: 1.0,
            heuristic: Heuristic::Manhattan,
            skip_unreachable: false,
        }
    }
}

impl SearchConfig {
    pub fn with_step_cost(mut self, step_cost: f64) -> SearchConfig {
        self.step_cost = step_cost;
        self
    }
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> SearchConfig {
        self.heuristic = heuristic;
        self
    }
    pub fn with_skip_unreachable(mut self, skip_unreachable: bool) -> SearchConfig {
        self.skip_unreachable = skip_unreachable;
        self
    }
}

/// Outcome of one search. Not finding a path is a regular outcome with `found == false`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchResult {
    /// Positions in the order they were discovered, ending with the goal if it was reached.
    pub visited_in_order: Vec<Position>,
    pub found: bool,
    /// Start to goal inclusive, empty if no path was found.
    pub path: Vec<Position>,
    /// Total cost of `path`.
    pub cost: Option<f64>,
    /// Set when the observer stopped the search early.
    pub cancelled: bool,
}

impl SearchResult {
    pub(crate) fn not_found(visited_in_order: Vec<Position>, cancelled: bool) -> SearchResult {
        SearchResult {
            visited_in_order,
            cancelled,
            ..SearchResult::default()
        }
    }
}

/// Receives every role change the search makes and may stop it between expansions.
/// The search behaves identically whether or not anything observes it.
pub trait SearchObserver {
    fn on_role_change(&mut self, position: Position, role: Role);

    /// Polled once per expansion, before the next position is taken from the open set.
    fn cancelled(&mut self) -> bool {
        false
    }
}

/// Observer for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_role_change(&mut self, _: Position, _: Role) {}
}

impl<F> SearchObserver for F
where
    F: FnMut(Position, Role),
{
    fn on_role_change(&mut self, position: Position, role: Role) {
        self(position, role)
    }
}

/// Forwards to an inner observer and cancels the search once the shared flag is raised, e.g. from
/// an event loop on another thread.
#[derive(Clone, Debug)]
pub struct CancelOnFlag<O> {
    inner: O,
    flag: Arc<AtomicBool>,
}

impl<O: SearchObserver> CancelOnFlag<O> {
    pub fn new(inner: O, flag: Arc<AtomicBool>) -> CancelOnFlag<O> {
        CancelOnFlag { inner, flag }
    }
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: SearchObserver> SearchObserver for CancelOnFlag<O> {
    fn on_role_change(&mut self, position: Position, role: Role) {
        self.inner.on_role_change(position, role)
    }
    fn cancelled(&mut self) -> bool {
        self.flag.load(Ordering::Relaxed) || self.inner.cancelled()
    }
}
