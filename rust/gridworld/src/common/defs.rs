use crate::*;

pub type Discrete = i32;
pub type Continous = f64;

/// A deterministic policy. `None` means no action has been decided for `s` yet.
pub trait Policy {
    fn policy(&self, s: &State) -> Option<Action>;
}
