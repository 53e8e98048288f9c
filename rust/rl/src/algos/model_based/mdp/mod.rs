pub mod common;
pub mod pi;
pub mod vi;

use common::ValueHistory;
use gridworld::*;
use ndarray::Array2;
use std::rc::Rc;
use std::result::Result;
use thiserror::Error;

pub const DEFAULT_GAMMA: Continous = 0.99;

/// Sweep cap applied when the caller gives none and `gamma == 1`, where the
/// Bellman operator is no longer a contraction.
pub const UNDISCOUNTED_MAX_SWEEPS: usize = 10_000;

#[derive(Error, Debug, PartialEq)]
pub enum SolverError {
    #[error("discount factor must be in (0, 1], got {0}")]
    InvalidDiscount(Continous),
    #[error("convergence threshold must be positive and finite, got {0}")]
    InvalidThreshold(Continous),
}

/// Markov Decision Process - Sutton & Barto 2018.
pub trait Mdp {
    /// `(rows, cols)` of the value and policy tables.
    fn shape(&self) -> (usize, usize);

    fn states(&self) -> &[State];

    fn transitions(&self) -> Rc<Transitions>;
}

pub trait MdpSolver<T> {
    /// `None` for walls and coordinates outside the grid.
    fn v_star(&self, s: State) -> Option<Continous>;

    fn q_star(&self, s: State, a: Action) -> Option<Continous>;

    fn pi_star(&self, s: State) -> Option<Action>;

    fn values(&self) -> &Array2<Continous>;

    fn value_history(&self) -> &ValueHistory;

    fn exec(
        &mut self,
        theta: Continous,
        num_iterations: Option<usize>,
    ) -> Result<(T, usize), SolverError>;
}

pub struct MdpSolverPolicy<T> {
    pub mdp_solver: Rc<dyn MdpSolver<T>>,
}

impl<T> Policy for MdpSolverPolicy<T> {
    fn policy(&self, s: &State) -> Option<Action> {
        self.mdp_solver.pi_star(*s)
    }
}

pub fn check_gamma(gamma: Continous) -> Result<Continous, SolverError> {
    if gamma > 0. && gamma <= 1. {
        Ok(gamma)
    } else {
        Err(SolverError::InvalidDiscount(gamma))
    }
}

pub fn check_theta(theta: Continous) -> Result<Continous, SolverError> {
    if theta.is_finite() && theta > 0. {
        Ok(theta)
    } else {
        Err(SolverError::InvalidThreshold(theta))
    }
}

/// Effective sweep budget: the caller's, or `UNDISCOUNTED_MAX_SWEEPS` when
/// `gamma == 1` leaves convergence unguaranteed.
pub fn sweep_cap(gamma: Continous, num_iterations: Option<usize>) -> Option<usize> {
    num_iterations.or((gamma >= 1.).then_some(UNDISCOUNTED_MAX_SWEEPS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(0.)]
    #[case(-0.5)]
    #[case(1.01)]
    #[case(Continous::NAN)]
    fn discount_outside_unit_interval_is_rejected(#[case] gamma: Continous) {
        assert!(matches!(
            check_gamma(gamma),
            Err(SolverError::InvalidDiscount(_))
        ));
    }

    #[rstest]
    #[case(0.)]
    #[case(-1e-3)]
    #[case(Continous::INFINITY)]
    fn non_positive_threshold_is_rejected(#[case] theta: Continous) {
        assert_eq!(check_theta(theta), Err(SolverError::InvalidThreshold(theta)));
    }

    #[rstest]
    #[case(0.99, None, None)]
    #[case(0.99, Some(5), Some(5))]
    #[case(1., Some(5), Some(5))]
    #[case(1., None, Some(UNDISCOUNTED_MAX_SWEEPS))]
    fn undiscounted_runs_are_capped(
        #[case] gamma: Continous,
        #[case] requested: Option<usize>,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(sweep_cap(gamma, requested), expected);
    }

    #[test]
    fn undiscounted_is_allowed() {
        assert_eq!(check_gamma(1.), Ok(1.));
    }
}
