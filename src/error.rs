//! Configuration errors
//!
//! Presentation itself never fails: invalid task transitions are ignored.
//! Only attribute values coming from code or a settings file are checked.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributesError {
    #[error("delay must not be negative (got {0}s)")]
    NegativeDelay(f64),

    #[error("duration must not be negative (got {0}s)")]
    NegativeDuration(f64),

    #[error("max width ratio must be in (0, 1] (got {0})")]
    InvalidWidthRatio(f64),

    #[error("invalid color '{0}', expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}
