use grid_astar::{AstarSolver, PathingGrid, Position, Role};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

fn main() -> grid_astar::Result<()> {
    let mut pathing_grid = PathingGrid::new(3, 3)?;
    let start = Position::new(0, 0);
    let end = Position::new(2, 2);
    pathing_grid.set_role(Position::new(1, 1), Role::Barrier)?;
    pathing_grid.set_role(start, Role::Start)?;
    pathing_grid.set_role(end, Role::Goal)?;
    pathing_grid.refresh_all_neighbours();
    println!("{}", pathing_grid);
    let result = AstarSolver::new().search(&mut pathing_grid, start, end)?;
    println!("Path:");
    for p in result.path {
        println!("{}", p);
    }
    println!("\n{}", pathing_grid);
    Ok(())
}
