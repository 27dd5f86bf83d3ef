use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use ramcore::algorithm::grid::IntensityGrid;
use ramcore::data::series::RamanSeries;
use ramcore::data::spectrum::RamanSpectrum;
use ramcore::data::trace::PotentialTrace;

use crate::data::markers::CycleMarkers;

/// Flat potential trace as the renderer consumes it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TracePayload {
    pub time: Vec<f64>,
    pub potential: Vec<f64>,
}

impl TracePayload {
    pub fn from_trace(trace: &PotentialTrace) -> Self {
        TracePayload {
            time: trace.time.clone(),
            potential: trace.potential.clone(),
        }
    }
}

/// Everything a surface renderer needs for one run: the dense map with
/// its axes, plus the optional electrochemistry overlay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfacePayload {
    pub version: u32,
    pub times: Vec<f64>,
    pub shifts: Vec<f64>,
    /// Row-major cells, one row per entry of `times`.
    pub values: Vec<Vec<f64>>,
    pub potential: Option<TracePayload>,
    pub markers: Option<CycleMarkers>,
}

impl SurfacePayload {
    pub fn from_grid(grid: &IntensityGrid) -> Self {
        let (rows, cols) = grid.shape();
        let flat = grid.to_row_major();
        let values = (0..rows)
            .map(|row| flat[row * cols..(row + 1) * cols].to_vec())
            .collect();

        SurfacePayload {
            version: 1,
            times: grid.time_axis.clone(),
            shifts: grid.shift_axis.clone(),
            values,
            potential: None,
            markers: None,
        }
    }

    pub fn with_potential(mut self, trace: &PotentialTrace) -> Self {
        self.potential = Some(TracePayload::from_trace(trace));
        self
    }

    pub fn with_markers(mut self, markers: CycleMarkers) -> Self {
        self.markers = Some(markers);
        self
    }
}

/// Stacked spectra payload for line and waterfall renderers, one entry
/// per distinct acquisition time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectraPayload {
    pub version: u32,
    pub spectra: Vec<RamanSpectrum>,
}

impl SpectraPayload {
    pub fn from_series(series: &RamanSeries) -> Self {
        SpectraPayload {
            version: 1,
            spectra: series.to_spectra(),
        }
    }
}

// --- JSON (human-readable) ---
pub fn write_json<T: Serialize>(path: &Path, payload: &T) -> std::io::Result<()> {
    let f = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(f, payload)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}
