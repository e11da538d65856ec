//! Engine errors

use thiserror::Error;

/// Engine result type
pub type Result<T> = std::result::Result<T, BasinError>;

#[derive(Debug, Error)]
pub enum BasinError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error(
        "compaction solve failed to converge for layer '{layer_id}' at top depth {top_m:.1} m \
         (residual {residual_m:.3} m after {iterations} iterations)"
    )]
    CompactionNonConvergence {
        layer_id: String,
        top_m: f64,
        residual_m: f64,
        iterations: u32,
    },

    #[error("simulation aborted at {time_ma:.1} Ma: {source}")]
    Aborted {
        time_ma: f64,
        #[source]
        source: Box<BasinError>,
    },
}

impl BasinError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        BasinError::InvalidInput { reason: reason.into() }
    }

    /// Annotate a mid-run failure with the simulation time it occurred at.
    pub fn at_time(self, time_ma: f64) -> Self {
        BasinError::Aborted { time_ma, source: Box::new(self) }
    }
}
