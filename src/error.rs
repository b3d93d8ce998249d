use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal conditions that abort a single matchup projection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("insufficient data for {team}: no games in either window for {metric}")]
    InsufficientData { team: String, metric: &'static str },

    #[error("missing input for {team}: {field} is absent and no override was supplied")]
    MissingInput { team: String, field: &'static str },
}

pub type Result<T> = std::result::Result<T, ProjectionError>;

/// An input or derived rate that fell outside its allowed range and was
/// clamped (or replaced, for NaN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutOfRangeWarning {
    pub team: String,
    pub field: String,
    pub value: f64,
    pub clamped: f64,
}

impl fmt::Display for OutOfRangeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} = {:.4} out of range, clamped to {:.4}",
            self.team, self.field, self.value, self.clamped
        )
    }
}

/// Clamps `value` into [0, 1], recording a warning when it had to move.
pub(crate) fn clamp_unit(
    team: &str,
    field: &str,
    value: f64,
    warnings: &mut Vec<OutOfRangeWarning>,
) -> f64 {
    clamp_range(team, field, value, 0.0, 1.0, warnings)
}

/// Clamps `value` into `[lo, hi]`, recording a warning when it had to move.
pub(crate) fn clamp_range(
    team: &str,
    field: &str,
    value: f64,
    lo: f64,
    hi: f64,
    warnings: &mut Vec<OutOfRangeWarning>,
) -> f64 {
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        record(team, field, value, clamped, warnings);
    }
    clamped
}

pub(crate) fn record(
    team: &str,
    field: &str,
    value: f64,
    clamped: f64,
    warnings: &mut Vec<OutOfRangeWarning>,
) {
    let warning = OutOfRangeWarning {
        team: team.to_string(),
        field: field.to_string(),
        value,
        clamped,
    };
    log::warn!("{warning}");
    warnings.push(warning);
}
