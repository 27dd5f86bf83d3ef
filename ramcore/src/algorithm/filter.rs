use std::fmt;
use std::fmt::{Display, Formatter};

use itertools::multizip;
use serde::{Deserialize, Serialize};

use crate::data::series::RamanSeries;
use crate::data::trace::PotentialTrace;

/// A closed interval on one axis. Both endpoints belong to the interval;
/// an interval with `low > high` contains nothing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64) -> Self {
        Interval { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// Per-axis windows applied to a series in one pass.
///
/// Each axis carries zero or more windows. An axis without windows is
/// unconstrained; all windows act as a conjunction, a sample survives only
/// when every one of them contains it. Filtering never reorders and never
/// deduplicates.
///
/// # Examples
///
/// ```
/// use ramcore::algorithm::filter::RangeFilter;
/// use ramcore::data::series::RamanSeries;
///
/// let series = RamanSeries::new(vec![1.0, 5.0, 30.0], vec![900.0, 1400.0, 1400.0], vec![1.0, 2.0, 3.0]);
/// let filter = RangeFilter::new().with_time(0.0, 18.0).with_shift(1000.0, 1750.0);
///
/// let kept = filter.filter(&series);
/// assert_eq!(kept.time, vec![5.0]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RangeFilter {
    pub time: Vec<Interval>,
    pub shift: Vec<Interval>,
    pub intensity: Vec<Interval>,
}

impl RangeFilter {
    /// A filter with no windows, passing every sample.
    pub fn new() -> Self {
        RangeFilter::default()
    }

    pub fn with_time(mut self, low: f64, high: f64) -> Self {
        self.time.push(Interval::new(low, high));
        self
    }

    pub fn with_shift(mut self, low: f64, high: f64) -> Self {
        self.shift.push(Interval::new(low, high));
        self
    }

    pub fn with_intensity(mut self, low: f64, high: f64) -> Self {
        self.intensity.push(Interval::new(low, high));
        self
    }

    /// Checks a single sample against every window.
    pub fn passes(&self, time: f64, shift: f64, intensity: f64) -> bool {
        self.time.iter().all(|window| window.contains(time))
            && self.shift.iter().all(|window| window.contains(shift))
            && self.intensity.iter().all(|window| window.contains(intensity))
    }

    /// Filters a series down to the samples passing every window, keeping
    /// their original order.
    pub fn filter(&self, series: &RamanSeries) -> RamanSeries {
        let mut time_vec = Vec::new();
        let mut shift_vec = Vec::new();
        let mut intensity_vec = Vec::new();

        for (time, shift, intensity) in
            multizip((&series.time, &series.shift, &series.intensity))
        {
            if self.passes(*time, *shift, *intensity) {
                time_vec.push(*time);
                shift_vec.push(*shift);
                intensity_vec.push(*intensity);
            }
        }

        RamanSeries::new(time_vec, shift_vec, intensity_vec)
    }

    /// Applies the time windows to a potential trace. Only the time axis
    /// applies, the shift and intensity windows concern Raman samples.
    pub fn filter_trace(&self, trace: &PotentialTrace) -> PotentialTrace {
        let mut windowed = trace.clone();
        for window in &self.time {
            windowed = windowed.filter_ranged(window.low, window.high);
        }
        windowed
    }
}
