use super::*;

const TOLERANCE: Continous = 1e-9;

/// Action-outcome model of a slippery agent. The intended move happens with
/// probability `intended`; otherwise the agent veers to either perpendicular
/// direction with probability `slip`. It never moves backwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlipModel {
    intended: Continous,
    slip: Continous,
}

impl Default for SlipModel {
    fn default() -> Self {
        Self {
            intended: 0.8,
            slip: 0.1,
        }
    }
}

impl SlipModel {
    pub fn new(intended: Continous, slip: Continous) -> Result<Self> {
        if !(intended.is_finite() && slip.is_finite()) || intended < 0. || slip < 0. {
            return Err(GridError::InvalidProbability(format!(
                "probabilities must be finite and non-negative, got {intended} and {slip}"
            )));
        }

        let total = intended + 2. * slip;
        if (total - 1.).abs() > TOLERANCE {
            return Err(GridError::InvalidProbability(format!(
                "outcome probabilities sum to {total}"
            )));
        }

        Ok(Self { intended, slip })
    }

    /// Actual actions and their probabilities, intended action first.
    pub fn outcomes(&self, a: Action) -> ([Action; 3], [Continous; 3]) {
        let [l, r] = a.perpendicular();
        ([a, l, r], [self.intended, self.slip, self.slip])
    }

    pub fn outcomes_for_code(&self, code: Discrete) -> Result<([Action; 3], [Continous; 3])> {
        Ok(self.outcomes(Action::try_from(code)?))
    }
}
