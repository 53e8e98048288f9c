use crate::algos::model_based::mdp::Mdp;
use gridworld::*;
use std::rc::Rc;

/// Exposes a `GridWorld` under a slip model as an `Mdp`, with the outcome
/// table computed once up front.
pub struct GridAdapter {
    world: Rc<GridWorld>,
    transitions: Rc<Transitions>,
}

impl GridAdapter {
    pub fn new(world: Rc<GridWorld>, model: SlipModel) -> Result<Self> {
        let transitions = Rc::new(world.transitions(&model)?);

        Ok(Self { world, transitions })
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }
}

#[cfg(test)]
pub fn default_adapter() -> GridAdapter {
    GridAdapter::new(Rc::new(GridWorld::default()), SlipModel::default()).unwrap()
}

impl Mdp for GridAdapter {
    fn shape(&self) -> (usize, usize) {
        self.world.shape()
    }

    fn states(&self) -> &[State] {
        self.world.states()
    }

    fn transitions(&self) -> Rc<Transitions> {
        Rc::clone(&self.transitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;

    #[test]
    fn default_adapter_covers_default_map() {
        let adapter = default_adapter();
        let expected = GridWorld::default()
            .transitions(&SlipModel::default())
            .unwrap();

        assert_eq!(*adapter.transitions(), expected);
        assert_eq!(adapter.shape(), (6, 6));
        assert_eq!(adapter.states().len(), 31);
    }

    #[test]
    fn outcome_probabilities_sum_to_one() {
        let adapter = default_adapter();
        for ts in adapter.transitions().values() {
            assert_float_eq!(ts.iter().map(|t| t.probability).sum::<f64>(), 1., abs <= 1e-9);
        }
    }

    #[test]
    fn deterministic_model_has_certain_outcomes() {
        let gw = GridWorld::new(
            Grid::from_labels(&[vec!["Green", "White"]]).unwrap(),
            RewardTable::default(),
        )
        .unwrap();
        let adapter = GridAdapter::new(Rc::new(gw), SlipModel::new(1., 0.).unwrap()).unwrap();

        let ts = &adapter.transitions()[&(State::new(1, 0), Action::Left)];

        assert_eq!(ts[0].next_state, State::new(0, 0));
        assert_eq!(ts[0].probability, 1.);
    }
}
