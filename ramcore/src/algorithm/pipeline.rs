use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};

use crate::algorithm::filter::{Interval, RangeFilter};
use crate::algorithm::grid::IntensityGrid;
use crate::algorithm::normalize::peak_normalized_series;
use crate::data::series::{RamanSeries, TimeUnit};
use crate::data::trace::PotentialTrace;
use crate::error::PipelineError;

/// Configuration for turning a raw sample series into an intensity map
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Unit of the time column of the Raman table (default: seconds).
    /// Seconds are converted to hours before any window applies, so
    /// `time_range` is always given in hours.
    pub time_unit: TimeUnit,
    /// Unit of the time column of the potential trace (default: hours)
    pub trace_time_unit: TimeUnit,
    /// Time window in hours, both ends inclusive (default: none)
    pub time_range: Option<Interval>,
    /// Raman shift window in 1/cm, both ends inclusive (default: none)
    pub shift_range: Option<Interval>,
    /// Intensity window in counts, both ends inclusive (default: none)
    pub intensity_range: Option<Interval>,
    /// Whether to scale intensities by the reference peak (default: false)
    pub normalize: bool,
    /// Shift window the reference peak is taken over (default: 1200 to 1700)
    pub reference_range: Interval,
    /// Minimum distinct points required on each grid axis, zero disables
    /// the check (default: 0)
    pub min_axis_points: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            time_unit: TimeUnit::Seconds,
            trace_time_unit: TimeUnit::Hours,
            time_range: None,
            shift_range: None,
            intensity_range: None,
            normalize: false,
            reference_range: Interval::new(1200.0, 1700.0),
            min_axis_points: 0,
        }
    }
}

impl PipelineConfig {
    /// Preset for carbon D/G band maps: keeps the 1200 to 1700 1/cm window
    /// and scales by the G band peak so runs become comparable.
    pub fn d_g_band() -> Self {
        PipelineConfig {
            shift_range: Some(Interval::new(1200.0, 1700.0)),
            normalize: true,
            reference_range: Interval::new(1200.0, 1700.0),
            ..PipelineConfig::default()
        }
    }

    /// Preset for low frequency lattice modes: keeps the 150 to 300 1/cm
    /// window, intensities stay in raw counts.
    pub fn low_frequency() -> Self {
        PipelineConfig {
            shift_range: Some(Interval::new(150.0, 300.0)),
            ..PipelineConfig::default()
        }
    }

    fn range_filter(&self) -> RangeFilter {
        RangeFilter {
            time: self.time_range.into_iter().collect(),
            shift: self.shift_range.into_iter().collect(),
            intensity: self.intensity_range.into_iter().collect(),
        }
    }
}

/// Runs the pre-grid stages: unit conversion, window filtering, optional
/// peak normalization. The samples stay sparse and keep their surviving
/// order, ready for gridding or a stacked-spectra export.
pub fn shape_series(
    series: &RamanSeries,
    config: &PipelineConfig,
) -> Result<RamanSeries, PipelineError> {
    let series = match config.time_unit {
        TimeUnit::Seconds => series.to_hours(),
        TimeUnit::Hours => series.clone(),
    };

    let filtered = config.range_filter().filter(&series);

    if config.normalize {
        peak_normalized_series(&filtered, &config.reference_range)
    } else {
        Ok(filtered)
    }
}

/// Runs a series through the configured stages: unit conversion, window
/// filtering, optional peak normalization, resampling onto a dense grid.
///
/// Normalization happens on the filtered samples, before gridding, so the
/// reference peak comes from the samples that end up on the map.
///
/// # Examples
///
/// ```
/// use ramcore::algorithm::pipeline::{build_map, PipelineConfig};
/// use ramcore::data::series::RamanSeries;
///
/// let series = RamanSeries::new(
///     vec![0.0, 0.0, 3600.0],
///     vec![1300.0, 1600.0, 1300.0],
///     vec![5.0, 10.0, 8.0],
/// );
/// let grid = build_map(&series, &PipelineConfig::d_g_band()).unwrap();
///
/// assert_eq!(grid.time_axis, vec![0.0, 1.0]);
/// assert_eq!(grid.max_intensity(), Some(1.0));
/// ```
pub fn build_map(
    series: &RamanSeries,
    config: &PipelineConfig,
) -> Result<IntensityGrid, PipelineError> {
    let shaped = shape_series(series, config)?;

    let grid = IntensityGrid::from_series(&shaped);
    grid.ensure_axis_points(config.min_axis_points)?;

    Ok(grid)
}

/// Windows a potential trace to the configured time range.
///
/// The trace keeps its native sampling, nothing is interpolated onto the
/// Raman time axis; plotting both against the same hour axis is what
/// lines them up.
///
/// The window is interpreted in hours, the unit the trace is converted
/// to. A caller keeping the Raman axis in raw seconds clears `time_range`
/// before aligning rather than windowing the trace with it.
pub fn align_trace(trace: &PotentialTrace, config: &PipelineConfig) -> PotentialTrace {
    let trace = match config.trace_time_unit {
        TimeUnit::Seconds => trace.to_hours(),
        TimeUnit::Hours => trace.clone(),
    };

    config.range_filter().filter_trace(&trace)
}

/// Builds maps for a batch of series on a dedicated thread pool.
///
/// Results come back in input order, one per series; a failing series
/// does not abort the rest of the batch.
pub fn build_maps_batch(
    series_list: &[RamanSeries],
    config: &PipelineConfig,
    num_threads: usize,
) -> Vec<Result<IntensityGrid, PipelineError>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .unwrap();

    pool.install(|| {
        series_list
            .par_iter()
            .map(|series| build_map(series, config))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_series() -> RamanSeries {
        // two spectra, 0 h and 1 h, with one out of band sample each
        RamanSeries::new(
            vec![0.0, 0.0, 0.0, 3600.0, 3600.0, 3600.0],
            vec![900.0, 1300.0, 1600.0, 900.0, 1300.0, 1600.0],
            vec![1.0, 5.0, 10.0, 2.0, 8.0, 4.0],
        )
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.time_unit == TimeUnit::Seconds);
        assert!(config.trace_time_unit == TimeUnit::Hours);
        assert!(!config.normalize);
        assert!(config.reference_range == Interval::new(1200.0, 1700.0));
        assert!(config.min_axis_points == 0);
    }

    #[test]
    fn test_d_g_band_preset() {
        let config = PipelineConfig::d_g_band();
        assert!(config.shift_range == Some(Interval::new(1200.0, 1700.0)));
        assert!(config.normalize);
        assert!(config.reference_range == Interval::new(1200.0, 1700.0));
    }

    #[test]
    fn test_low_frequency_preset() {
        let config = PipelineConfig::low_frequency();
        assert!(config.shift_range == Some(Interval::new(150.0, 300.0)));
        assert!(!config.normalize);
    }

    #[test]
    fn test_low_frequency_preset_keeps_raw_counts() {
        let series = RamanSeries::new(
            vec![0.0, 0.0, 3600.0],
            vec![200.0, 250.0, 1400.0],
            vec![5.0, 7.0, 9.0],
        );
        let grid = build_map(&series, &PipelineConfig::low_frequency()).unwrap();

        // the 1400 1/cm sample falls outside the lattice band, counts stay raw
        assert_eq!(grid.shift_axis, vec![200.0, 250.0]);
        assert_eq!(grid.max_intensity(), Some(7.0));
    }

    #[test]
    fn test_build_map_runs_all_stages() {
        let config = PipelineConfig {
            time_range: Some(Interval::new(0.0, 18.0)),
            ..PipelineConfig::d_g_band()
        };
        let grid = build_map(&example_series(), &config).unwrap();

        // the 900 1/cm samples fall outside the shift window
        assert_eq!(grid.time_axis, vec![0.0, 1.0]);
        assert_eq!(grid.shift_axis, vec![1300.0, 1600.0]);
        // reference peak over the kept samples is 10, rows follow time
        assert_eq!(grid.to_row_major(), vec![0.5, 1.0, 0.8, 0.4]);
    }

    #[test]
    fn test_shape_series_keeps_sparse_samples() {
        let shaped = shape_series(&example_series(), &PipelineConfig::d_g_band()).unwrap();

        // still sparse triples, no gridding yet
        assert_eq!(shaped.time, vec![0.0, 0.0, 1.0, 1.0]);
        assert_eq!(shaped.shift, vec![1300.0, 1600.0, 1300.0, 1600.0]);
        assert_eq!(shaped.intensity, vec![0.5, 1.0, 0.8, 0.4]);
    }

    #[test]
    fn test_shift_window_collapses_grid_to_surviving_samples() {
        let series = RamanSeries::new(
            vec![0.0, 0.0, 3600.0],
            vec![100.0, 200.0, 100.0],
            vec![5.0, 7.0, 9.0],
        );
        let config = PipelineConfig {
            shift_range: Some(Interval::new(150.0, 250.0)),
            ..PipelineConfig::default()
        };
        let grid = build_map(&series, &config).unwrap();

        // only the (0 h, 200 1/cm) sample survives, so both axes shrink
        assert_eq!(grid.time_axis, vec![0.0]);
        assert_eq!(grid.shift_axis, vec![200.0]);
        assert_eq!(grid.to_row_major(), vec![7.0]);
    }

    #[test]
    fn test_build_map_without_normalization_keeps_counts() {
        let config = PipelineConfig {
            shift_range: Some(Interval::new(1200.0, 1700.0)),
            ..PipelineConfig::default()
        };
        let grid = build_map(&example_series(), &config).unwrap();

        assert_eq!(grid.max_intensity(), Some(10.0));
    }

    #[test]
    fn test_build_map_respects_min_axis_points() {
        let config = PipelineConfig {
            time_range: Some(Interval::new(0.0, 0.5)),
            min_axis_points: 2,
            ..PipelineConfig::default()
        };
        let result = build_map(&example_series(), &config);

        // only the 0 h spectrum survives the window
        assert!(matches!(
            result,
            Err(PipelineError::AxisCardinality { found: 1, .. })
        ));
    }

    #[test]
    fn test_build_map_on_fully_filtered_input() {
        let config = PipelineConfig {
            time_range: Some(Interval::new(100.0, 200.0)),
            ..PipelineConfig::default()
        };
        let grid = build_map(&example_series(), &config).unwrap();

        // no cardinality requirement by default, the map just comes out empty
        assert!(grid.is_empty());
        assert_eq!(grid.shape(), (0, 0));
    }

    #[test]
    fn test_build_map_on_fully_filtered_input_in_strict_mode() {
        let config = PipelineConfig {
            time_range: Some(Interval::new(100.0, 200.0)),
            min_axis_points: 2,
            ..PipelineConfig::default()
        };
        let result = build_map(&example_series(), &config);

        assert!(matches!(
            result,
            Err(PipelineError::AxisCardinality { found: 0, .. })
        ));
    }

    #[test]
    fn test_normalization_on_empty_selection_is_degenerate() {
        let config = PipelineConfig {
            shift_range: Some(Interval::new(800.0, 1000.0)),
            normalize: true,
            ..PipelineConfig::default()
        };
        let result = build_map(&example_series(), &config);

        assert!(matches!(
            result,
            Err(PipelineError::DegenerateReference { .. })
        ));
    }

    #[test]
    fn test_align_trace_windows_without_resampling() {
        let trace = PotentialTrace::new(
            vec![0.0, 0.3, 0.9, 2.5],
            vec![3.2, 3.4, 3.8, 4.1],
        );
        let config = PipelineConfig {
            time_range: Some(Interval::new(0.0, 1.0)),
            ..PipelineConfig::default()
        };
        let aligned = align_trace(&trace, &config);

        assert_eq!(aligned.time, vec![0.0, 0.3, 0.9]);
        assert_eq!(aligned.potential, vec![3.2, 3.4, 3.8]);
    }

    #[test]
    fn test_align_trace_without_window_keeps_full_span() {
        let trace = PotentialTrace::new(
            vec![0.0, 0.3, 0.9, 2.5],
            vec![3.2, 3.4, 3.8, 4.1],
        );
        let aligned = align_trace(&trace, &PipelineConfig::default());

        assert_eq!(aligned.time, trace.time);
        assert_eq!(aligned.potential, trace.potential);
    }

    #[test]
    fn test_align_trace_converts_seconds() {
        let trace = PotentialTrace::new(vec![0.0, 1800.0, 7200.0], vec![3.2, 3.5, 4.0]);
        let config = PipelineConfig {
            trace_time_unit: TimeUnit::Seconds,
            time_range: Some(Interval::new(0.0, 1.0)),
            ..PipelineConfig::default()
        };
        let aligned = align_trace(&trace, &config);

        assert_eq!(aligned.time, vec![0.0, 0.5]);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let series_list = vec![
            example_series(),
            RamanSeries::default(),
            example_series().filter_ranged(0.0, 0.0, 0.0, 2000.0, 0.0, f64::MAX),
        ];
        let config = PipelineConfig::d_g_band();

        let batch = build_maps_batch(&series_list, &config, 2);
        let sequential: Vec<_> = series_list
            .iter()
            .map(|series| build_map(series, &config))
            .collect();

        assert_eq!(batch.len(), 3);
        for (b, s) in batch.iter().zip(&sequential) {
            assert_eq!(b, s);
        }
    }
}
