/// Where a play request currently is. Only used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Drawing,
    Evaluating,
    Settling,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Validating => write!(f, "validating"),
            Self::Drawing => write!(f, "drawing"),
            Self::Evaluating => write!(f, "evaluating"),
            Self::Settling => write!(f, "settling"),
        }
    }
}
