extern crate gridworld;
extern crate rand;

use gridworld::{maps::TileDistribution, ui, GridWorld, RewardTable};
use rand::prelude::*;

fn main() -> gridworld::Result<()> {
    let n = std::env::args()
        .nth(1)
        .and_then(|a| a.parse().ok())
        .unwrap_or(10);

    let rng = &mut StdRng::from_entropy();
    let grid = TileDistribution::default().generate(n, rng)?;
    println!("{}\n", ui::render_labels(&grid));
    println!("{}\n", ui::render_grid(&grid));

    let gw = GridWorld::new(grid, RewardTable::default())?;
    println!("{} traversable states", gw.states().len());

    Ok(())
}
