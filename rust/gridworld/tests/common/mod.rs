use gridworld::*;

#[allow(dead_code)]
pub fn world(rows: &[Vec<&str>]) -> GridWorld {
    GridWorld::new(Grid::from_labels(rows).unwrap(), RewardTable::default()).unwrap()
}

#[allow(dead_code)]
pub fn state_actions(gw: &GridWorld) -> Vec<(State, Action)> {
    gw.states()
        .iter()
        .flat_map(|&s| Action::ALL.map(|a| (s, a)))
        .collect()
}
