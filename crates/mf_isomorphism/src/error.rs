use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsomorphismError {
    /// The pattern has more nodes than the target.
    PatternTooLarge { alpha: usize, beta: usize },
}

impl fmt::Display for IsomorphismError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternTooLarge { alpha, beta } =>
                write!(f, "Cannot map a graph of {alpha} nodes into a graph of {beta} nodes"),
        }
    }
}

impl std::error::Error for IsomorphismError {}
