use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fmt::{Display, Formatter};

use itertools::multizip;
use nalgebra::DMatrix;
use ordered_float::OrderedFloat;

use crate::data::series::{Axis, RamanSeries};
use crate::error::PipelineError;

/// A dense intensity map resampled from a sparse series.
///
/// Rows follow `time_axis`, columns follow `shift_axis`, both sorted
/// ascending and free of duplicates. `values[(row, col)]` is the intensity
/// recorded at `(time_axis[row], shift_axis[col])`, or 0.0 where the
/// series had no sample.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityGrid {
    pub time_axis: Vec<f64>,
    pub shift_axis: Vec<f64>,
    pub values: DMatrix<f64>,
}

impl IntensityGrid {
    /// Resamples a sparse series onto a dense grid.
    ///
    /// The axes are the distinct time and shift coordinates of the series,
    /// sorted ascending. Coordinates compare bit-exact; when two samples
    /// land on the same (time, shift) cell the first one in input order
    /// wins and later ones are dropped. Cells no sample lands on hold 0.0.
    ///
    /// An empty series produces an empty grid, not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ramcore::algorithm::grid::IntensityGrid;
    /// use ramcore::data::series::RamanSeries;
    ///
    /// let series = RamanSeries::new(
    ///     vec![10.0, 10.0, 20.0],
    ///     vec![1000.0, 1100.0, 1000.0],
    ///     vec![5.0, 7.0, 9.0],
    /// );
    /// let grid = IntensityGrid::from_series(&series);
    ///
    /// assert_eq!(grid.shape(), (2, 2));
    /// assert_eq!(grid.values[(1, 0)], 9.0);
    /// assert_eq!(grid.values[(1, 1)], 0.0);
    /// ```
    pub fn from_series(series: &RamanSeries) -> IntensityGrid {
        // TODO: coordinates compare bit-exact for now, a jittered acquisition
        // clock fragments the time axis; needs a resolution-based merge pass
        let mut time_points = BTreeSet::new();
        let mut shift_points = BTreeSet::new();
        let mut cells: HashMap<(OrderedFloat<f64>, OrderedFloat<f64>), f64> =
            HashMap::with_capacity(series.len());

        for (time, shift, intensity) in multizip((&series.time, &series.shift, &series.intensity))
        {
            time_points.insert(OrderedFloat(*time));
            shift_points.insert(OrderedFloat(*shift));
            // first sample of a coordinate pair wins, later duplicates drop
            cells
                .entry((OrderedFloat(*time), OrderedFloat(*shift)))
                .or_insert(*intensity);
        }

        let time_index: HashMap<OrderedFloat<f64>, usize> = time_points
            .iter()
            .enumerate()
            .map(|(index, time)| (*time, index))
            .collect();
        let shift_index: HashMap<OrderedFloat<f64>, usize> = shift_points
            .iter()
            .enumerate()
            .map(|(index, shift)| (*shift, index))
            .collect();

        let mut values = DMatrix::zeros(time_points.len(), shift_points.len());
        for ((time, shift), intensity) in &cells {
            values[(time_index[time], shift_index[shift])] = *intensity;
        }

        IntensityGrid {
            time_axis: time_points.into_iter().map(|p| p.into_inner()).collect(),
            shift_axis: shift_points.into_iter().map(|p| p.into_inner()).collect(),
            values,
        }
    }

    /// Rebuilds a grid from its axes and row-major cell values.
    ///
    /// Row `r` of `values` is the intensity row of `time_axis[r]` across
    /// all shifts. Panics when `values.len()` does not equal
    /// `time_axis.len() * shift_axis.len()`.
    pub fn from_row_major(time_axis: Vec<f64>, shift_axis: Vec<f64>, values: &[f64]) -> IntensityGrid {
        let values = DMatrix::from_row_slice(time_axis.len(), shift_axis.len(), values);
        IntensityGrid {
            time_axis,
            shift_axis,
            values,
        }
    }

    /// Cell values in row-major order, one row per time axis point.
    pub fn to_row_major(&self) -> Vec<f64> {
        let (rows, cols) = self.shape();
        let mut out = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                out.push(self.values[(row, col)]);
            }
        }
        out
    }

    /// Grid dimensions as `(time points, shift points)`, matching the
    /// row and column counts of `values`.
    pub fn shape(&self) -> (usize, usize) {
        (self.time_axis.len(), self.shift_axis.len())
    }

    pub fn is_empty(&self) -> bool {
        self.time_axis.is_empty() || self.shift_axis.is_empty()
    }

    /// The highest cell value of the grid, `None` when the grid is empty.
    pub fn max_intensity(&self) -> Option<f64> {
        self.values.iter().copied().fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }

    /// Checks that both axes carry at least `required` distinct points.
    ///
    /// The time axis is checked first, so when both fall short the error
    /// names the time axis.
    pub fn ensure_axis_points(&self, required: usize) -> Result<(), PipelineError> {
        if self.time_axis.len() < required {
            return Err(PipelineError::AxisCardinality {
                axis: Axis::Time,
                found: self.time_axis.len(),
                required,
            });
        }
        if self.shift_axis.len() < required {
            return Err(PipelineError::AxisCardinality {
                axis: Axis::Shift,
                found: self.shift_axis.len(),
                required,
            });
        }
        Ok(())
    }
}

impl RamanSeries {
    /// Convenience for [`IntensityGrid::from_series`].
    pub fn to_grid(&self) -> IntensityGrid {
        IntensityGrid::from_series(self)
    }
}

impl Display for IntensityGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.max_intensity() {
            Some(max) => write!(
                f,
                "IntensityGrid(time points: {}, shift points: {}, max intensity: {})",
                self.time_axis.len(),
                self.shift_axis.len(),
                max
            ),
            None => write!(f, "IntensityGrid(empty)"),
        }
    }
}

// Manual bincode implementation, the matrix travels as row-major cells
impl bincode::Encode for IntensityGrid {
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.time_axis, encoder)?;
        bincode::Encode::encode(&self.shift_axis, encoder)?;
        bincode::Encode::encode(&self.to_row_major(), encoder)?;
        Ok(())
    }
}

impl<Context> bincode::Decode<Context> for IntensityGrid {
    fn decode<D: bincode::de::Decoder<Context = Context>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        let time_axis: Vec<f64> = bincode::Decode::decode(decoder)?;
        let shift_axis: Vec<f64> = bincode::Decode::decode(decoder)?;
        let values: Vec<f64> = bincode::Decode::decode(decoder)?;
        if values.len() != time_axis.len() * shift_axis.len() {
            return Err(bincode::error::DecodeError::OtherString(format!(
                "intensity grid holds {} cells, axes require {}",
                values.len(),
                time_axis.len() * shift_axis.len()
            )));
        }
        Ok(IntensityGrid::from_row_major(time_axis, shift_axis, &values))
    }
}

impl<'de, Context> bincode::BorrowDecode<'de, Context> for IntensityGrid {
    fn borrow_decode<D: bincode::de::BorrowDecoder<'de, Context = Context>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        let time_axis: Vec<f64> = bincode::BorrowDecode::borrow_decode(decoder)?;
        let shift_axis: Vec<f64> = bincode::BorrowDecode::borrow_decode(decoder)?;
        let values: Vec<f64> = bincode::BorrowDecode::borrow_decode(decoder)?;
        if values.len() != time_axis.len() * shift_axis.len() {
            return Err(bincode::error::DecodeError::OtherString(format!(
                "intensity grid holds {} cells, axes require {}",
                values.len(),
                time_axis.len() * shift_axis.len()
            )));
        }
        Ok(IntensityGrid::from_row_major(time_axis, shift_axis, &values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_series() -> RamanSeries {
        RamanSeries::new(
            vec![0.0, 0.0, 3600.0],
            vec![100.0, 200.0, 100.0],
            vec![5.0, 7.0, 9.0],
        )
    }

    #[test]
    fn test_from_series_fills_missing_cells_with_zero() {
        let grid = IntensityGrid::from_series(&example_series());

        assert_eq!(grid.time_axis, vec![0.0, 3600.0]);
        assert_eq!(grid.shift_axis, vec![100.0, 200.0]);
        // row 0 is time 0, row 1 is time 3600
        assert_eq!(grid.to_row_major(), vec![5.0, 7.0, 9.0, 0.0]);
    }

    #[test]
    fn test_axes_come_out_sorted_and_distinct() {
        let series = RamanSeries::new(
            vec![20.0, 10.0, 10.0, 20.0],
            vec![1100.0, 1100.0, 1000.0, 1000.0],
            vec![1.0, 2.0, 3.0, 4.0],
        );
        let grid = IntensityGrid::from_series(&series);

        assert_eq!(grid.time_axis, vec![10.0, 20.0]);
        assert_eq!(grid.shift_axis, vec![1000.0, 1100.0]);
        assert_eq!(grid.shape(), (2, 2));
    }

    #[test]
    fn test_duplicate_coordinates_keep_first_sample() {
        let series = RamanSeries::new(
            vec![10.0, 10.0, 10.0],
            vec![1000.0, 1000.0, 1000.0],
            vec![5.0, 8.0, 11.0],
        );
        let grid = IntensityGrid::from_series(&series);

        // first occurrence in input order wins, not the largest
        assert_eq!(grid.shape(), (1, 1));
        assert_eq!(grid.values[(0, 0)], 5.0);
    }

    #[test]
    fn test_empty_series_grids_to_empty() {
        let grid = IntensityGrid::from_series(&RamanSeries::default());

        assert_eq!(grid.shape(), (0, 0));
        assert!(grid.is_empty());
        assert!(grid.max_intensity().is_none());
    }

    #[test]
    fn test_bit_exact_comparison_fragments_close_coordinates() {
        // 1000.0 and 1000.00001 are distinct floats and become two axis points
        let series = RamanSeries::new(
            vec![10.0, 10.0],
            vec![1000.0, 1000.00001],
            vec![5.0, 6.0],
        );
        let grid = IntensityGrid::from_series(&series);

        assert_eq!(grid.shape(), (1, 2));
        assert_eq!(grid.to_row_major(), vec![5.0, 6.0]);
    }

    #[test]
    fn test_ensure_axis_points() {
        let grid = IntensityGrid::from_series(&example_series());

        assert!(grid.ensure_axis_points(2).is_ok());
        assert_eq!(
            grid.ensure_axis_points(3),
            Err(PipelineError::AxisCardinality {
                axis: Axis::Time,
                found: 2,
                required: 3,
            })
        );
    }

    #[test]
    fn test_ensure_axis_points_names_the_short_axis() {
        // 3 time points but only 1 shift point
        let series = RamanSeries::new(
            vec![1.0, 2.0, 3.0],
            vec![1000.0, 1000.0, 1000.0],
            vec![1.0, 2.0, 3.0],
        );
        let grid = IntensityGrid::from_series(&series);

        assert_eq!(
            grid.ensure_axis_points(2),
            Err(PipelineError::AxisCardinality {
                axis: Axis::Shift,
                found: 1,
                required: 2,
            })
        );
    }

    #[test]
    fn test_row_major_round_trip() {
        let grid = example_series().to_grid();
        let rebuilt = IntensityGrid::from_row_major(
            grid.time_axis.clone(),
            grid.shift_axis.clone(),
            &grid.to_row_major(),
        );

        assert_eq!(rebuilt, grid);
    }

    #[test]
    fn test_bincode_round_trip() {
        let grid = IntensityGrid::from_series(&example_series());
        let bytes = bincode::encode_to_vec(&grid, bincode::config::standard()).unwrap();
        let (decoded, _): (IntensityGrid, usize) =
            bincode::decode_from_slice(&bytes, bincode::config::standard()).unwrap();

        assert_eq!(decoded, grid);
    }
}
