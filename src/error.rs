//! Error types for the deadline calculator

use std::fmt;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Direction of a business-day walk, reported when a walk gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Counting business days back from the trial date
    Backward,
    /// Looking for the grace day after the theoretical deadline
    Forward,
}

impl fmt::Display for Walk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Walk::Backward => write!(f, "backward"),
            Walk::Forward => write!(f, "forward"),
        }
    }
}

/// Main error type for the deadline calculator
#[derive(Error, Debug)]
pub enum Error {
    /// Trial date could not be parsed
    #[error("Invalid trial date: {0}")]
    InvalidTrialDate(String),

    /// A business-day walk examined more calendar days than allowed
    #[error("{walk} business-day search gave up after {cap} calendar days")]
    UnboundedSearch { walk: Walk, cap: u32 },

    /// Calculator configuration rejected before any computation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Holiday discovery response could not be decoded
    #[error("Invalid holiday response: {0}")]
    Json(#[from] serde_json::Error),
}
