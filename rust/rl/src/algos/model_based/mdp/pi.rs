use super::{common::*, *};
use tracing::{debug, info, warn};

pub const PI_EVAL_THETA: Continous = 0.1;

/// Policy iteration - Sutton & Barto 2018, section 4.3.
///
/// Starts from the policy that always moves up and alternates iterative policy
/// evaluation with greedy improvement until no state changes its action.
#[derive(Clone)]
pub struct PolicyIteration {
    mdp: Rc<dyn Mdp>,
    transitions: Rc<Transitions>,
    gamma: Continous,
    v: Array2<Continous>,
    pi: Array2<Option<Action>>,
    history: ValueHistory,
}

impl PolicyIteration {
    pub fn new(mdp: Rc<dyn Mdp>, gamma: Continous) -> Result<Self, SolverError> {
        let gamma = check_gamma(gamma)?;
        let transitions = mdp.transitions();
        let v = Array2::zeros(mdp.shape());
        let mut pi = Array2::from_elem(mdp.shape(), None);
        for s in mdp.states() {
            pi[[s.y, s.x]] = Some(Action::Up);
        }
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

    /// Synchronous Bellman expectation sweeps for the current policy until the
    /// largest per-sweep change is below `theta` or `max_sweeps` sweeps have run.
    /// With `gamma == 1` and no limit, `UNDISCOUNTED_MAX_SWEEPS` applies.
    /// Returns the last delta and the number of sweeps.
    pub fn evaluate_policy(
        &mut self,
        theta: Continous,
        max_sweeps: Option<usize>,
    ) -> Result<(Continous, usize), SolverError> {
        let theta = check_theta(theta)?;
        let cap = sweep_cap(self.gamma, max_sweeps);

        let mut delta = Continous::INFINITY;
        let mut sweeps = 0;
        while delta >= theta && cap.map_or(true, |n| sweeps < n) {
            let v_prev = self.v.clone();
            delta = 0.;
            for &s in self.mdp.states() {
                let ix = [s.y, s.x];
                let Some(a) = self.pi[ix] else {
                    continue;
                };

                if let Some(q) = q_value(&self.transitions, &v_prev, self.gamma, s, a) {
                    self.v[ix] = q;
                    delta = delta.max((v_prev[ix] - q).abs());
                }
            }

            sweeps += 1;
        }

        if delta >= theta {
            warn!(sweeps, delta, theta, "policy evaluation stopped before converging");
        }
        self.history.record(&self.v);
        Ok((delta, sweeps))
    }

    /// Greedy one-step improvement against the current values. Returns `true`
    /// when no state changed its action.
    pub fn improve_policy(&mut self) -> bool {
        let mut stable = true;
        for &s in self.mdp.states() {
            let Some((a, _)) = greedy(&self.transitions, &self.v, self.gamma, s) else {
                continue;
            };

            let ix = [s.y, s.x];
            if self.pi[ix] != Some(a) {
                stable = false;
            }
            self.pi[ix] = Some(a);
        }

        stable
    }
}

impl MdpSolver<bool> for PolicyIteration {
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

    /// Alternates evaluation (to `theta`) and improvement until the policy is
    /// stable or `num_iterations` rounds have run. `num_iterations` also caps
    /// the sweeps of each evaluation.
    fn exec(
        &mut self,
        theta: Continous,
        num_iterations: Option<usize>,
    ) -> Result<(bool, usize), SolverError> {
        let theta = check_theta(theta)?;

        let mut stable = false;
        let mut count = 0;
        while !stable && num_iterations.map_or(true, |n| count < n) {
            let (_, sweeps) = self.evaluate_policy(theta, num_iterations)?;
            stable = self.improve_policy();
            count += 1;
            debug!(iteration = count, sweeps, stable, "policy iteration step");
        }

        info!(iterations = count, stable, "policy iteration finished");
        Ok((stable, count))
    }
}
