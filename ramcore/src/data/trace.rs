use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::data::series::SECONDS_PER_HOUR;

/// An electrochemical potential trace recorded alongside a Raman run,
/// one (time, potential) pair per index across the two parallel vectors.
///
/// The trace keeps its native sampling; it is never resampled onto the
/// Raman time axis, only windowed to the same interval.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PotentialTrace {
    pub time: Vec<f64>,
    pub potential: Vec<f64>,
}

impl PotentialTrace {
    /// Creates a new `PotentialTrace` instance.
    ///
    /// # Arguments
    ///
    /// * `time` - A vector of measurement times.
    /// * `potential` - A vector of cell potentials in volts.
    ///
    /// Panics when the lengths differ.
    pub fn new(time: Vec<f64>, potential: Vec<f64>) -> Self {
        assert_eq!(time.len(), potential.len());
        PotentialTrace { time, potential }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns the same trace with the time column divided down to hours.
    pub fn to_hours(&self) -> PotentialTrace {
        PotentialTrace {
            time: self.time.iter().map(|t| t / SECONDS_PER_HOUR).collect(),
            potential: self.potential.clone(),
        }
    }

    /// Filters the trace by time, both bounds inclusive. Pairs survive in
    /// their original order.
    pub fn filter_ranged(&self, time_min: f64, time_max: f64) -> PotentialTrace {
        let mut time_vec = Vec::new();
        let mut potential_vec = Vec::new();

        for (time, potential) in self.time.iter().zip(&self.potential) {
            if time >= &time_min && time <= &time_max {
                time_vec.push(*time);
                potential_vec.push(*potential);
            }
        }

        PotentialTrace::new(time_vec, potential_vec)
    }
}

impl Display for PotentialTrace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "PotentialTrace(data points: {})", self.len())
    }
}
