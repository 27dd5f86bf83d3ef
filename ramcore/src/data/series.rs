use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use itertools::multizip;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::data::spectrum::RamanSpectrum;

/// Seconds per hour, used when converting acquisition clocks to hours.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// The two independent axes of a resampled intensity map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Time,
    Shift,
}

impl Display for Axis {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Time => write!(f, "time"),
            Axis::Shift => write!(f, "Raman shift"),
        }
    }
}

/// Unit of the time column of an incoming sample table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    #[default]
    Seconds,
    Hours,
}

/// A sparse collection of Raman samples, one (time, shift, intensity)
/// triple per index across the three parallel vectors.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RamanSeries {
    pub time: Vec<f64>,
    pub shift: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl RamanSeries {
    /// Creates a new `RamanSeries` instance.
    ///
    /// # Arguments
    ///
    /// * `time` - A vector of acquisition times.
    /// * `shift` - A vector of Raman shift values in 1/cm.
    /// * `intensity` - A vector of detector counts.
    ///
    /// The vectors are parallel, sample `k` is the triple
    /// `(time[k], shift[k], intensity[k])`. Panics when the lengths differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use ramcore::data::series::RamanSeries;
    ///
    /// let series = RamanSeries::new(vec![0.0, 0.0], vec![1000.0, 1001.0], vec![5.0, 7.0]);
    /// assert_eq!(series.len(), 2);
    /// ```
    pub fn new(time: Vec<f64>, shift: Vec<f64>, intensity: Vec<f64>) -> Self {
        assert_eq!(time.len(), shift.len());
        assert_eq!(time.len(), intensity.len());
        RamanSeries {
            time,
            shift,
            intensity,
        }
    }

    /// Number of samples held by the series.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Returns the same samples with the time column divided down to hours.
    pub fn to_hours(&self) -> RamanSeries {
        RamanSeries {
            time: self.time.iter().map(|t| t / SECONDS_PER_HOUR).collect(),
            shift: self.shift.clone(),
            intensity: self.intensity.clone(),
        }
    }

    /// Filters the series by time, Raman shift and intensity.
    ///
    /// # Arguments
    ///
    /// * `time_min` - The minimum time to keep.
    /// * `time_max` - The maximum time to keep.
    /// * `shift_min` - The minimum Raman shift to keep.
    /// * `shift_max` - The maximum Raman shift to keep.
    /// * `intensity_min` - The minimum intensity to keep.
    /// * `intensity_max` - The maximum intensity to keep.
    ///
    /// All bounds are inclusive, a sample sitting exactly on a bound survives.
    ///
    /// # Returns
    ///
    /// * `RamanSeries` - The surviving samples in their original order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ramcore::data::series::RamanSeries;
    ///
    /// let series = RamanSeries::new(vec![0.0, 5.0], vec![1000.0, 1800.0], vec![5.0, 7.0]);
    /// let filtered = series.filter_ranged(0.0, 18.0, 1000.0, 1750.0, 0.0, f64::MAX);
    /// assert_eq!(filtered.len(), 1);
    /// ```
    pub fn filter_ranged(
        &self,
        time_min: f64,
        time_max: f64,
        shift_min: f64,
        shift_max: f64,
        intensity_min: f64,
        intensity_max: f64,
    ) -> RamanSeries {
        let mut time_vec = Vec::new();
        let mut shift_vec = Vec::new();
        let mut intensity_vec = Vec::new();

        for (time, shift, intensity) in multizip((&self.time, &self.shift, &self.intensity)) {
            if time >= &time_min
                && time <= &time_max
                && shift >= &shift_min
                && shift <= &shift_max
                && intensity >= &intensity_min
                && intensity <= &intensity_max
            {
                time_vec.push(*time);
                shift_vec.push(*shift);
                intensity_vec.push(*intensity);
            }
        }

        RamanSeries::new(time_vec, shift_vec, intensity_vec)
    }

    /// Splits the series into one spectrum per distinct acquisition time.
    ///
    /// Spectra come back sorted by time; within a spectrum the samples keep
    /// their original order. Times are compared bit-exact, two readings that
    /// differ in the last digit become two spectra.
    pub fn to_spectra(&self) -> Vec<RamanSpectrum> {
        // sorted map keyed by acquisition time
        let mut spectra = BTreeMap::<OrderedFloat<f64>, (Vec<f64>, Vec<f64>)>::new();

        for (time, shift, intensity) in multizip((&self.time, &self.shift, &self.intensity)) {
            let entry = spectra
                .entry(OrderedFloat(*time))
                .or_insert_with(|| (Vec::new(), Vec::new()));
            entry.0.push(*shift);
            entry.1.push(*intensity);
        }

        spectra
            .into_iter()
            .map(|(time, (shift, intensity))| RamanSpectrum::new(time.into_inner(), shift, intensity))
            .collect()
    }

    /// The sample carrying the highest intensity, as `(time, shift, intensity)`.
    pub fn max_by_intensity(&self) -> Option<(f64, f64, f64)> {
        multizip((&self.time, &self.shift, &self.intensity))
            .max_by(|a, b| a.2.partial_cmp(b.2).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(time, shift, intensity)| (*time, *shift, *intensity))
    }
}

impl Display for RamanSeries {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.max_by_intensity() {
            Some((time, shift, intensity)) => write!(
                f,
                "RamanSeries(data points: {}, max by intensity: (time: {}, shift: {}, intensity: {}))",
                self.len(),
                time,
                shift,
                intensity
            ),
            None => write!(f, "RamanSeries(data points: 0)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_series() -> RamanSeries {
        RamanSeries::new(
            vec![0.0, 0.0, 3600.0, 3600.0, 7200.0],
            vec![1000.0, 1500.0, 1000.0, 1500.0, 1000.0],
            vec![5.0, 7.0, 9.0, 0.0, 2.0],
        )
    }

    #[test]
    fn test_filter_ranged_bounds_are_inclusive() {
        let series = example_series();
        // time bound sits exactly on 3600.0, shift bound exactly on 1500.0
        let filtered = series.filter_ranged(0.0, 3600.0, 1000.0, 1500.0, 0.0, f64::MAX);

        assert_eq!(filtered.len(), 4);
        assert_eq!(filtered.time, vec![0.0, 0.0, 3600.0, 3600.0]);
        assert_eq!(filtered.intensity, vec![5.0, 7.0, 9.0, 0.0]);
    }

    #[test]
    fn test_filter_ranged_keeps_original_order() {
        let series = RamanSeries::new(
            vec![9.0, 1.0, 5.0],
            vec![100.0, 100.0, 100.0],
            vec![1.0, 2.0, 3.0],
        );
        let filtered = series.filter_ranged(0.0, 10.0, 0.0, 200.0, 0.0, f64::MAX);

        // no reordering, samples survive in input order
        assert_eq!(filtered.time, vec![9.0, 1.0, 5.0]);
    }

    #[test]
    fn test_to_hours() {
        let series = example_series().to_hours();
        // 3600 s and 7200 s divide exactly to 1 h and 2 h
        assert_eq!(series.time, vec![0.0, 0.0, 1.0, 1.0, 2.0]);
        assert_eq!(series.shift, example_series().shift);
    }

    #[test]
    fn test_to_spectra_groups_by_time() {
        let spectra = example_series().to_spectra();

        assert_eq!(spectra.len(), 3);
        assert_eq!(spectra[0].time, 0.0);
        assert_eq!(spectra[0].shift, vec![1000.0, 1500.0]);
        assert_eq!(spectra[0].intensity, vec![5.0, 7.0]);
        assert_eq!(spectra[1].time, 3600.0);
        assert_eq!(spectra[1].intensity, vec![9.0, 0.0]);
        assert_eq!(spectra[2].intensity, vec![2.0]);
    }

    #[test]
    fn test_max_by_intensity() {
        let (time, shift, intensity) = example_series().max_by_intensity().unwrap();

        assert_eq!(time, 3600.0);
        assert_eq!(shift, 1000.0);
        assert_eq!(intensity, 9.0);
        assert!(RamanSeries::default().max_by_intensity().is_none());
    }
}
