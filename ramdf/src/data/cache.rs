use std::fs;
use std::path::Path;

use bincode::config;

use ramcore::algorithm::grid::IntensityGrid;

// --- Bincode grid cache ---
//
// Resampling a long operando run is the slow step, the cache stores the
// finished matrix so downstream tools reload it without touching the raw
// table again.

pub fn grid_to_bytes(grid: &IntensityGrid) -> std::io::Result<Vec<u8>> {
    bincode::encode_to_vec(grid, config::standard())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

pub fn grid_from_bytes(bytes: &[u8]) -> std::io::Result<IntensityGrid> {
    let (grid, _) = bincode::decode_from_slice(bytes, config::standard())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    Ok(grid)
}

pub fn write_grid_cache(path: &Path, grid: &IntensityGrid) -> std::io::Result<()> {
    fs::write(path, grid_to_bytes(grid)?)
}

pub fn read_grid_cache(path: &Path) -> std::io::Result<IntensityGrid> {
    grid_from_bytes(&fs::read(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ramcore::data::series::RamanSeries;

    #[test]
    fn test_bytes_round_trip() {
        let grid = IntensityGrid::from_series(&RamanSeries::new(
            vec![0.0, 0.0, 3600.0],
            vec![1000.0, 1100.0, 1000.0],
            vec![5.0, 7.0, 9.0],
        ));
        let bytes = grid_to_bytes(&grid).unwrap();
        let back = grid_from_bytes(&bytes).unwrap();

        assert_eq!(back, grid);
    }

    #[test]
    fn test_truncated_bytes_fail_cleanly() {
        let grid =
            IntensityGrid::from_series(&RamanSeries::new(vec![0.0], vec![1000.0], vec![5.0]));
        let bytes = grid_to_bytes(&grid).unwrap();

        assert!(grid_from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }
}
