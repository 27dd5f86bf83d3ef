use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::data::series::Axis;

/// Failure modes of a resampling run.
///
/// Every stage reports these as explicit results; a failure is total for
/// the run and the caller decides whether to abort or skip the source.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The sample source yielded zero data rows. Raised at load time;
    /// a successfully loaded set that filters down to nothing is not an
    /// error and grids to an empty matrix instead.
    EmptyInput,
    /// The normalization reference window selects no samples, so no peak
    /// is defined.
    DegenerateReference { low: f64, high: f64 },
    /// An axis has fewer distinct values than the caller requires.
    AxisCardinality {
        axis: Axis,
        found: usize,
        required: usize,
    },
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::EmptyInput => write!(f, "input table contains no data rows"),
            PipelineError::DegenerateReference { low, high } => {
                write!(f, "normalization reference [{}, {}] selects no samples", low, high)
            }
            PipelineError::AxisCardinality {
                axis,
                found,
                required,
            } => {
                write!(
                    f,
                    "{} axis has {} distinct values, at least {} required",
                    axis, found, required
                )
            }
        }
    }
}

impl Error for PipelineError {}
