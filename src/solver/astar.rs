use log::{debug, info, warn};
use smallvec::SmallVec;

use crate::error::Result;
use crate::pathing_grid::{PathingGrid, Role};
use crate::search_context::SearchContext;
use crate::solver::{NoopObserver, SearchConfig, SearchObserver, SearchResult};
use crate::{Position, N_SMALLVEC_SIZE};

/// A* over the cached neighbour lists of a [PathingGrid] with a uniform step cost.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver {
    pub config: SearchConfig,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver::default()
    }

    pub fn with_config(config: SearchConfig) -> AstarSolver {
        AstarSolver { config }
    }

    /// Searches from `start` to `goal` without an observer.
    pub fn search(
        &self,
        grid: &mut PathingGrid,
        start: Position,
        goal: Position,
    ) -> Result<SearchResult> {
        self.search_with_observer(grid, start, goal, &mut NoopObserver)
    }

    /// Searches from `start` to `goal`, marking cells on the grid as it goes and reporting each
    /// change to `observer`.
    ///
    /// Newly discovered cells become [Frontier](Role::Frontier) and are appended to
    /// [visited_in_order](SearchResult::visited_in_order); expanded cells other than the start
    /// become [Visited](Role::Visited). When the goal is popped, every cell before it on the path
    /// becomes [Path](Role::Path) (walking back from the goal), the goal is set to
    /// [Goal](Role::Goal) and appended to the trace.
    ///
    /// Only the endpoints are validated; the neighbour caches are used as they are, so refresh
    /// them after editing barriers. Once started the search cannot fail.
    pub fn search_with_observer<O>(
        &self,
        grid: &mut PathingGrid,
        start: Position,
        goal: Position,
        observer: &mut O,
    ) -> Result<SearchResult>
    where
        O: SearchObserver + ?Sized,
    {
        grid.validate_endpoints(&start, &goal)?;
        let SearchConfig {
            step_cost,
            heuristic,
            skip_unreachable,
        } = self.config;
        debug_assert!(step_cost.is_finite() && step_cost > 0.0);

        if skip_unreachable {
            grid.update();
            if !grid.reachable(&start, &goal) {
                info!("{} is not reachable from {}", goal, start);
                return Ok(SearchResult::not_found(Vec::new(), false));
            }
        }
        if start != goal && grid.neighbours_of(&start).is_empty() {
            warn!("Start {} has no neighbours, were they refreshed?", start);
        }
        info!(
            "Searching {} -> {} ({} heuristic, step cost {})",
            start, goal, heuristic, step_cost
        );

        let mut ct = SearchContext::new(step_cost);
        let mut visited_in_order = Vec::new();
        ct.open_start(start, heuristic.distance(&start, &goal));

        loop {
            if observer.cancelled() {
                debug!("Search cancelled after {} cells", visited_in_order.len());
                return Ok(SearchResult::not_found(visited_in_order, true));
            }
            let Some(current) = ct.pop() else {
                break;
            };

            if current == goal {
                let path = ct.reconstruct_path(goal);
                for &p in path.iter().rev().skip(1) {
                    update_role(grid, observer, p, Role::Path);
                }
                update_role(grid, observer, goal, Role::Goal);
                visited_in_order.push(goal);
                let cost = ct.g_score(&goal);
                info!(
                    "Found path of {} cells (cost {}) after visiting {} cells",
                    path.len(),
                    cost,
                    visited_in_order.len()
                );
                return Ok(SearchResult {
                    visited_in_order,
                    found: true,
                    path,
                    cost: Some(cost),
                    cancelled: false,
                });
            }

            let tentative_g = ct.g_score(&current) + step_cost;
            let neighbours: SmallVec<[Position; N_SMALLVEC_SIZE]> =
                SmallVec::from_slice(grid.neighbours_of(&current));
            for neighbour in neighbours {
                if ct.is_closed(&neighbour) {
                    continue;
                }
                let estimate = heuristic.distance(&neighbour, &goal);
                if ct.relax(current, neighbour, tentative_g, estimate) && !ct.is_open(&neighbour) {
                    ct.push(neighbour);
                    update_role(grid, observer, neighbour, Role::Frontier);
                    visited_in_order.push(neighbour);
                }
            }

            if current != start {
                update_role(grid, observer, current, Role::Visited);
            }
            ct.close(current);
        }

        info!(
            "No path from {} to {} after visiting {} cells",
            start,
            goal,
            visited_in_order.len()
        );
        Ok(SearchResult::not_found(visited_in_order, false))
    }
}

fn update_role<O>(grid: &mut PathingGrid, observer: &mut O, position: Position, role: Role)
where
    O: SearchObserver + ?Sized,
{
    grid.mark(position, role);
    observer.on_role_change(position, role);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::Heuristic;
    use crate::solver::CancelOnFlag;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn prepared_grid(rows: usize, cols: usize, barriers: &[Position]) -> PathingGrid {
        let mut grid = PathingGrid::new(rows, cols).unwrap();
        for &b in barriers {
            grid.set_role(b, Role::Barrier).unwrap();
        }
        grid.refresh_all_neighbours();
        grid
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let mut grid = prepared_grid(3, 3, &[]);
        grid.set_role(p(1, 1), Role::Start).unwrap();
        let result = AstarSolver::new().search(&mut grid, p(1, 1), p(1, 1)).unwrap();
        assert!(result.found);
        assert_eq!(result.path, vec![p(1, 1)]);
        assert_eq!(result.visited_in_order, vec![p(1, 1)]);
        assert_eq!(result.cost, Some(0.0));
        assert_eq!(grid.role(p(1, 1)), Ok(Role::Goal));
    }

    /// Asserts that the optimal 4 step solution is found around a centre obstacle.
    #[test]
    fn solve_simple_problem() {
        // |S  |
        // | # |
        // |  G|
        for heuristic in Heuristic::ALL {
            let mut grid = prepared_grid(3, 3, &[p(1, 1)]);
            let config = SearchConfig::default().with_heuristic(heuristic);
            let solver = AstarSolver::with_config(config);
            let result = solver.search(&mut grid, p(0, 0), p(2, 2)).unwrap();
            assert!(result.found);
            assert_eq!(result.path.len(), 5);
            assert_eq!(result.cost, Some(4.0));
        }
    }

    /// Traces the exact expansion on a 2x2 grid: neighbours come down, up, right, left and ties
    /// go to the earliest discovery.
    #[test]
    fn visitation_order_is_exact() {
        let mut grid = prepared_grid(2, 2, &[]);
        grid.set_role(p(0, 0), Role::Start).unwrap();
        grid.set_role(p(1, 1), Role::Goal).unwrap();
        let mut changes = Vec::new();
        let result = AstarSolver::new()
            .search_with_observer(&mut grid, p(0, 0), p(1, 1), &mut |pos: Position, role: Role| {
                changes.push((pos, role))
            })
            .unwrap();
        assert_eq!(result.visited_in_order, vec![p(1, 0), p(0, 1), p(1, 1), p(1, 1)]);
        assert_eq!(result.path, vec![p(0, 0), p(1, 0), p(1, 1)]);
        assert_eq!(
            changes,
            vec![
                (p(1, 0), Role::Frontier),
                (p(0, 1), Role::Frontier),
                (p(1, 1), Role::Frontier),
                (p(1, 0), Role::Visited),
                (p(0, 1), Role::Visited),
                (p(1, 0), Role::Path),
                (p(0, 0), Role::Path),
                (p(1, 1), Role::Goal),
            ]
        );
        assert_eq!(grid.to_string(), "*x\n*G\n");
    }

    #[test]
    fn enclosed_goal_is_not_found() {
        let walls = [p(1, 2), p(3, 2), p(2, 1), p(2, 3)];
        for heuristic in Heuristic::ALL {
            let mut grid = prepared_grid(5, 5, &walls);
            let config = SearchConfig::default().with_heuristic(heuristic);
            let solver = AstarSolver::with_config(config);
            let result = solver.search(&mut grid, p(0, 0), p(2, 2)).unwrap();
            assert!(!result.found);
            assert!(!result.cancelled);
            assert!(result.path.is_empty());
            assert_eq!(result.cost, None);
            // Everything outside the enclosure is discovered.
            assert_eq!(result.visited_in_order.len(), 25 - 4 - 1 - 1);
            assert!(!result.visited_in_order.contains(&p(2, 2)));
        }
    }

    #[test]
    fn skip_unreachable_visits_nothing() {
        let walls = [p(1, 2), p(3, 2), p(2, 1), p(2, 3)];
        let mut grid = prepared_grid(5, 5, &walls);
        let solver = AstarSolver::with_config(SearchConfig::default().with_skip_unreachable(true));
        let result = solver.search(&mut grid, p(0, 0), p(2, 2)).unwrap();
        assert!(!result.found);
        assert!(result.visited_in_order.is_empty());
        assert!(grid.cells().all(|c| !c.role().is_transient()));

        let result = solver.search(&mut grid, p(0, 0), p(4, 4)).unwrap();
        assert!(result.found);
        assert_eq!(result.path.len(), 9);
    }

    #[test]
    fn barrier_endpoint_is_rejected_before_search() {
        let mut grid = prepared_grid(3, 3, &[p(2, 2)]);
        let before = grid.to_string();
        let err = AstarSolver::new().search(&mut grid, p(0, 0), p(2, 2));
        assert!(matches!(err, Err(crate::Error::ConflictingRole { .. })));
        let err = AstarSolver::new().search(&mut grid, p(0, 0), p(3, 0));
        assert!(matches!(err, Err(crate::Error::OutOfBounds { .. })));
        assert_eq!(grid.to_string(), before);
    }

    #[test]
    fn cancellation_returns_partial_trace() {
        let mut grid = prepared_grid(10, 10, &[]);
        let mut expansions = 0;
        struct StopAfter<'a>(&'a mut usize, usize);
        impl SearchObserver for StopAfter<'_> {
            fn on_role_change(&mut self, _: Position, _: Role) {}
            fn cancelled(&mut self) -> bool {
                *self.0 += 1;
                *self.0 > self.1
            }
        }
        let result = AstarSolver::new()
            .search_with_observer(&mut grid, p(0, 0), p(9, 9), &mut StopAfter(&mut expansions, 3))
            .unwrap();
        assert!(!result.found);
        assert!(result.cancelled);
        assert!(result.path.is_empty());
        assert!(!result.visited_in_order.is_empty());
        assert_eq!(expansions, 4);
    }

    #[test]
    fn raised_flag_cancels_immediately() {
        let mut grid = prepared_grid(4, 4, &[]);
        let flag = Arc::new(AtomicBool::new(true));
        let mut observer = CancelOnFlag::new(NoopObserver, flag);
        let result = AstarSolver::new()
            .search_with_observer(&mut grid, p(0, 0), p(3, 3), &mut observer)
            .unwrap();
        assert!(result.cancelled);
        assert!(result.visited_in_order.is_empty());
    }

    #[test]
    fn step_cost_scales_path_cost() {
        let mut grid = prepared_grid(4, 4, &[]);
        let solver = AstarSolver::with_config(SearchConfig::default().with_step_cost(2.5));
        let result = solver.search(&mut grid, p(0, 0), p(3, 3)).unwrap();
        assert!(result.found);
        assert_eq!(result.path.len(), 7);
        assert_eq!(result.cost, Some(15.0));
    }
}
