use crate::algorithm::filter::Interval;
use crate::algorithm::grid::IntensityGrid;
use crate::data::series::RamanSeries;
use crate::error::PipelineError;

/// The highest intensity among samples whose shift falls inside the
/// reference window.
///
/// The window is closed on both ends. When it selects no sample at all
/// there is no peak to speak of and `DegenerateReference` comes back.
pub fn reference_peak(series: &RamanSeries, reference: &Interval) -> Result<f64, PipelineError> {
    let mut peak: Option<f64> = None;

    for (shift, intensity) in series.shift.iter().zip(&series.intensity) {
        if reference.contains(*shift) {
            peak = match peak {
                Some(max) if max >= *intensity => Some(max),
                _ => Some(*intensity),
            };
        }
    }

    peak.ok_or(PipelineError::DegenerateReference {
        low: reference.low,
        high: reference.high,
    })
}

/// Scales a series so the reference peak becomes 1.0.
///
/// Every intensity is divided by [`reference_peak`], times and shifts stay
/// untouched. The peak is used as-is, a zero peak divides through to
/// non-finite values.
///
/// # Examples
///
/// ```
/// use ramcore::algorithm::filter::Interval;
/// use ramcore::algorithm::normalize::peak_normalized_series;
/// use ramcore::data::series::RamanSeries;
///
/// let series = RamanSeries::new(vec![1.0, 2.0], vec![1000.0, 1600.0], vec![4.0, 8.0]);
/// let normalized = peak_normalized_series(&series, &Interval::new(1200.0, 1700.0)).unwrap();
///
/// assert_eq!(normalized.intensity, vec![0.5, 1.0]);
/// ```
pub fn peak_normalized_series(
    series: &RamanSeries,
    reference: &Interval,
) -> Result<RamanSeries, PipelineError> {
    let peak = reference_peak(series, reference)?;

    Ok(RamanSeries::new(
        series.time.clone(),
        series.shift.clone(),
        series.intensity.iter().map(|i| i / peak).collect(),
    ))
}

/// The highest cell value among grid columns whose shift falls inside the
/// reference window.
///
/// A window that selects no column, or a grid with no time points, leaves
/// nothing to take a maximum over and comes back `DegenerateReference`.
/// Zero-filled cells of selected columns do participate.
pub fn grid_reference_peak(
    grid: &IntensityGrid,
    reference: &Interval,
) -> Result<f64, PipelineError> {
    let mut peak: Option<f64> = None;

    for (col, shift) in grid.shift_axis.iter().enumerate() {
        if !reference.contains(*shift) {
            continue;
        }
        for row in 0..grid.time_axis.len() {
            let value = grid.values[(row, col)];
            peak = match peak {
                Some(max) if max >= value => Some(max),
                _ => Some(value),
            };
        }
    }

    peak.ok_or(PipelineError::DegenerateReference {
        low: reference.low,
        high: reference.high,
    })
}

/// Scales every cell of a grid so the reference peak becomes 1.0.
pub fn peak_normalized_grid(
    grid: &IntensityGrid,
    reference: &Interval,
) -> Result<IntensityGrid, PipelineError> {
    let peak = grid_reference_peak(grid, reference)?;

    Ok(IntensityGrid {
        time_axis: grid.time_axis.clone(),
        shift_axis: grid.shift_axis.clone(),
        values: grid.values.map(|value| value / peak),
    })
}

impl RamanSeries {
    /// Convenience for [`peak_normalized_series`].
    pub fn peak_normalized(&self, reference: &Interval) -> Result<RamanSeries, PipelineError> {
        peak_normalized_series(self, reference)
    }
}

impl IntensityGrid {
    /// Convenience for [`peak_normalized_grid`].
    pub fn peak_normalized(&self, reference: &Interval) -> Result<IntensityGrid, PipelineError> {
        peak_normalized_grid(self, reference)
    }
}
