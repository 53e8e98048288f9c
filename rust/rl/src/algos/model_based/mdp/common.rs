use super::*;

/// Expected one-step return of a weighted set of outcomes under `v`.
pub fn expected_return(ts: &[Transition], v: &Array2<Continous>, gamma: Continous) -> Continous {
    ts.iter()
        .map(|t| t.probability * (t.reward + gamma * v[[t.next_state.y, t.next_state.x]]))
        .sum()
}

pub fn q_value(
    transitions: &Transitions,
    v: &Array2<Continous>,
    gamma: Continous,
    s: State,
    a: Action,
) -> Option<Continous> {
    transitions
        .get(&(s, a))
        .map(|ts| expected_return(ts, v, gamma))
}

/// Whether `s` is a traversable state of the table's world.
pub fn is_state(transitions: &Transitions, s: State) -> bool {
    transitions.contains_key(&(s, Action::Up))
}

/// One-step lookahead over all actions. Only a strictly larger value replaces
/// the incumbent, so the first maximum in `Action::ALL` order wins.
pub fn greedy(
    transitions: &Transitions,
    v: &Array2<Continous>,
    gamma: Continous,
    s: State,
) -> Option<(Action, Continous)> {
    let mut best: Option<(Action, Continous)> = None;
    for a in Action::ALL {
        let Some(q) = q_value(transitions, v, gamma, s, a) else {
            continue;
        };

        if best.map_or(true, |(_, b)| q > b) {
            best = Some((a, q));
        }
    }

    best
}

/// Per-state value trajectories. Observational only; solvers never read it back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueHistory {
    states: Vec<State>,
    snapshots: Vec<Vec<Continous>>,
}

impl ValueHistory {
    pub fn new(states: &[State]) -> Self {
        Self {
            states: states.to_vec(),
            snapshots: vec![],
        }
    }

    pub fn record(&mut self, v: &Array2<Continous>) {
        let snapshot = self.states.iter().map(|s| v[[s.y, s.x]]).collect();
        self.snapshots.push(snapshot);
    }

    /// Column keys, in state enumeration order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// One row per recorded iteration.
    pub fn snapshots(&self) -> &[Vec<Continous>] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use ndarray::arr2;

    fn series(h: &ValueHistory, s: State) -> Option<Vec<Continous>> {
        let i = h.states().iter().position(|&x| x == s)?;
        Some(h.snapshots().iter().map(|row| row[i]).collect())
    }

    fn corridor() -> Transitions {
        let gw = GridWorld::new(
            Grid::from_labels(&[vec!["Green", "White"]]).unwrap(),
            RewardTable::default(),
        )
        .unwrap();
        gw.transitions(&SlipModel::default()).unwrap()
    }

    #[test]
    fn expected_return_weights_each_outcome() {
        let ts = corridor();
        let v = arr2(&[[10., 2.]]);

        let q = q_value(&ts, &v, 0.5, State::new(1, 0), Action::Left).unwrap();

        // 0.8 * (1 + 0.5 * 10) + 0.2 * (-0.04 + 0.5 * 2)
        assert_float_eq!(q, 4.992, abs <= 1e-12);
    }

    #[test]
    fn greedy_prefers_first_action_on_ties() {
        let gw = GridWorld::new(
            Grid::from_labels(&[vec!["Green"]]).unwrap(),
            RewardTable::default(),
        )
        .unwrap();
        let ts = gw.transitions(&SlipModel::default()).unwrap();

        let (a, q) = greedy(&ts, &arr2(&[[0.]]), 0.99, State::new(0, 0)).unwrap();

        assert_eq!(a, Action::Up);
        assert_float_eq!(q, 1., abs <= 1e-12);
    }

    #[test]
    fn greedy_moves_towards_green() {
        let (a, _) = greedy(&corridor(), &arr2(&[[0., 0.]]), 0.99, State::new(1, 0)).unwrap();

        assert_eq!(a, Action::Left);
    }

    #[test]
    fn unknown_state_has_no_lookahead() {
        assert_eq!(greedy(&corridor(), &arr2(&[[0., 0.]]), 0.99, State::new(7, 7)), None);
    }

    #[test]
    fn history_keeps_one_series_per_state() {
        let states = [State::new(0, 0), State::new(1, 0)];
        let h = &mut ValueHistory::new(&states);

        h.record(&arr2(&[[1., -1.]]));
        h.record(&arr2(&[[2., -0.5]]));

        assert_eq!(h.len(), 2);
        assert!(!h.is_empty());
        assert_eq!(series(h, State::new(1, 0)), Some(vec![-1., -0.5]));
        assert_eq!(series(h, State::new(0, 1)), None);
    }
}
