use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// Concurrency must be at least 1.
    InvalidConcurrency(usize),
    /// Weight tolerance must be non-negative and finite.
    InvalidTolerance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConcurrency(n) => {
                write!(f, "concurrency must be at least 1, got {n}")
            }
            Self::InvalidTolerance(t) => {
                write!(f, "weight tolerance must be a non-negative percentage, got {t}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
