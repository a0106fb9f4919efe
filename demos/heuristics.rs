use grid_astar::{AstarSolver, Heuristic, PathingGrid, Position, Role, SearchConfig};

// All heuristics are admissible on a 4-grid and find equally short paths, but the looser ones
// (Euclidean, Chebyshev) expand more cells. The heuristic can be picked by name, e.g.
// `cargo run --example heuristics -- chebyshev`.

fn main() -> grid_astar::Result<()> {
    const N: usize = 30;
    let selected: Vec<Heuristic> = match std::env::args().nth(1) {
        Some(name) => vec![name.parse()?],
        None => Heuristic::ALL.to_vec(),
    };
    let start = Position::new(1, 1);
    let end = Position::new(N - 3, N - 3);
    for heuristic in selected {
        let mut pathing_grid = PathingGrid::new(N, N)?;
        for i in 4..N - 4 {
            pathing_grid.set_role(Position::new(i, N / 2), Role::Barrier)?;
            pathing_grid.set_role(Position::new(N / 2, i), Role::Barrier)?;
        }
        pathing_grid.refresh_all_neighbours();
        let solver = AstarSolver::with_config(SearchConfig::default().with_heuristic(heuristic));
        let result = solver.search(&mut pathing_grid, start, end)?;
        println!(
            "{:>9}: path length {:>3}, cells visited {:>4}",
            heuristic,
            result.path.len(),
            result.visited_in_order.len()
        );
    }
    Ok(())
}
