use grid_astar::{run_search, Heuristic, PathingGrid, Position, Role};

// A wall across row 2 with a single gap in the last column. Every role change is printed as it
// happens, which is how a renderer would animate the search.
// S....
// .....
// ####.
// .....
// E....

fn main() -> grid_astar::Result<()> {
    let mut pathing_grid = PathingGrid::new(5, 5)?;
    for col in 0..4 {
        pathing_grid.set_role(Position::new(2, col), Role::Barrier)?;
    }
    let start = Position::new(0, 0);
    let end = Position::new(4, 0);
    pathing_grid.set_role(start, Role::Start)?;
    pathing_grid.set_role(end, Role::Goal)?;
    pathing_grid.refresh_all_neighbours();

    let solver = grid_astar::AstarSolver::new();
    let result = solver.search_with_observer(
        &mut pathing_grid,
        start,
        end,
        &mut |p: Position, role: Role| println!("{} -> {}", p, role),
    )?;
    println!("\n{}", pathing_grid);
    println!("Found: {}, path length: {}", result.found, result.path.len());

    // Close the gap and search again on the same grid.
    pathing_grid.reset_search(start, end)?;
    pathing_grid.set_role(Position::new(2, 4), Role::Barrier)?;
    pathing_grid.refresh_all_neighbours();
    let result = run_search(&mut pathing_grid, start, end, 1.0, Heuristic::Manhattan)?;
    println!("\n{}", pathing_grid);
    println!(
        "Found: {}, cells visited: {}",
        result.found,
        result.visited_in_order.len()
    );
    Ok(())
}
