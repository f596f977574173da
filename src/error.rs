//! Round input errors
//!
//! The only thing that can go wrong in the core is a bad round length.
//! Callers get the error back, the machine has already shown the
//! validation message by then.

use std::fmt;

use crate::consts::{MAX_ROUND_MINUTES, MIN_ROUND_MINUTES};

/// Invalid round duration
#[derive(Debug, Clone, PartialEq)]
pub enum RoundError {
    /// Input had no leading digits at all
    NotANumber { input: String },
    /// Numeric input with a fractional part
    NotWhole { value: f64 },
    /// Whole number outside the allowed minutes
    OutOfRange { minutes: i64 },
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber { input } => write!(f, "round length {:?} is not a number", input),
            Self::NotWhole { value } => {
                write!(f, "round length {} is not a whole number of minutes", value)
            }
            Self::OutOfRange { minutes } => write!(
                f,
                "round length {} is outside {}..={} minutes",
                minutes, MIN_ROUND_MINUTES, MAX_ROUND_MINUTES
            ),
        }
    }
}

impl std::error::Error for RoundError {}
