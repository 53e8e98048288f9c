use super::{common::*, *};
use tracing::{debug, info, warn};

pub const VI_THETA: Continous = 0.00101;

/// Value iteration - Sutton & Barto 2018, section 4.4.
///
/// Each sweep is synchronous: every lookahead reads the value table as it was
/// at the start of the sweep, and the sweep's delta is the largest change over
/// all states.
#[derive(Clone)]
pub struct ValueIteration {
    mdp: Rc<dyn Mdp>,
    transitions: Rc<Transitions>,
    gamma: Continous,
    v: Array2<Continous>,
    pi: Array2<Option<Action>>,
    history: ValueHistory,
}

impl ValueIteration {
    pub fn new(mdp: Rc<dyn Mdp>, gamma: Continous) -> Result<Self, SolverError> {
        let gamma = check_gamma(gamma)?;
        let transitions = mdp.transitions();
        let v = Array2::zeros(mdp.shape());
        let pi = Array2::from_elem(mdp.shape(), None);
        let history = ValueHistory::new(mdp.states());

        Ok(Self {
            mdp,
            transitions,
            gamma,
            v,
            pi,
            history,
        })
    }

    pub fn gamma(&self) -> Continous {
        self.gamma
    }

    /// One Bellman-optimality sweep over all states. Returns the largest absolute change.
    pub fn sweep(&mut self) -> Continous {
        let v_prev = self.v.clone();
        let mut delta: Continous = 0.;
        for &s in self.mdp.states() {
            let Some((a, q)) = greedy(&self.transitions, &v_prev, self.gamma, s) else {
                continue;
            };

            let ix = [s.y, s.x];
            self.pi[ix] = Some(a);
            self.v[ix] = q;
            delta = delta.max((v_prev[ix] - q).abs());
        }

        self.history.record(&self.v);
        delta
    }
}

impl MdpSolver<Continous> for ValueIteration {
    fn v_star(&self, s: State) -> Option<Continous> {
        is_state(&self.transitions, s).then(|| self.v[[s.y, s.x]])
    }

    fn q_star(&self, s: State, a: Action) -> Option<Continous> {
        q_value(&self.transitions, &self.v, self.gamma, s, a)
    }

    fn pi_star(&self, s: State) -> Option<Action> {
        self.pi.get([s.y, s.x]).copied().flatten()
    }

    fn values(&self) -> &Array2<Continous> {
        &self.v
    }

    fn value_history(&self) -> &ValueHistory {
        &self.history
    }

    /// Sweeps until the delta drops below `theta` or `num_iterations` sweeps have run.
    /// With `gamma == 1` and no limit, `UNDISCOUNTED_MAX_SWEEPS` applies.
    /// Returns the last delta and the number of sweeps.
    fn exec(
        &mut self,
        theta: Continous,
        num_iterations: Option<usize>,
    ) -> Result<(Continous, usize), SolverError> {
        let theta = check_theta(theta)?;
        let cap = sweep_cap(self.gamma, num_iterations);

        let mut delta = Continous::INFINITY;
        let mut count = 0;
        while delta >= theta && cap.map_or(true, |n| count < n) {
            delta = self.sweep();
            count += 1;
            debug!(sweep = count, delta, "value iteration sweep");
        }

        if delta < theta {
            info!(sweeps = count, delta, "value iteration converged");
        } else {
            warn!(sweeps = count, delta, theta, "value iteration stopped before converging");
        }
        Ok((delta, count))
    }
}
