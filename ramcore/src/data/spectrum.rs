use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A single Raman spectrum: all samples sharing one acquisition time.
///
/// `shift` and `intensity` are parallel vectors in acquisition order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RamanSpectrum {
    pub time: f64,
    pub shift: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl RamanSpectrum {
    /// Constructs a new `RamanSpectrum`.
    ///
    /// # Arguments
    ///
    /// * `time` - The acquisition time shared by all samples.
    /// * `shift` - A vector of Raman shift values in 1/cm.
    /// * `intensity` - A vector of intensity values corresponding to the shifts.
    ///
    /// # Examples
    ///
    /// ```
    /// use ramcore::data::spectrum::RamanSpectrum;
    ///
    /// let spectrum = RamanSpectrum::new(2.5, vec![1000.0, 1100.0], vec![10.0, 20.0]);
    /// assert_eq!(spectrum.shift, vec![1000.0, 1100.0]);
    /// ```
    pub fn new(time: f64, shift: Vec<f64>, intensity: Vec<f64>) -> Self {
        RamanSpectrum {
            time,
            shift,
            intensity,
        }
    }

    pub fn len(&self) -> usize {
        self.shift.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shift.is_empty()
    }

    /// The highest intensity of the spectrum, `None` when it holds no samples.
    pub fn max_intensity(&self) -> Option<f64> {
        self.intensity
            .iter()
            .copied()
            .fold(None, |acc, i| match acc {
                Some(m) if m >= i => Some(m),
                _ => Some(i),
            })
    }
}

impl Display for RamanSpectrum {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.max_intensity() {
            Some(max) => write!(
                f,
                "RamanSpectrum(time: {}, data points: {}, max intensity: {})",
                self.time,
                self.len(),
                max
            ),
            None => write!(f, "RamanSpectrum(time: {}, data points: 0)", self.time),
        }
    }
}
