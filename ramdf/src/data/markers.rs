use serde::{Deserialize, Serialize};

/// Charge and discharge switch times of the electrochemical program, in
/// hours. These are annotation payload handed through to the renderer,
/// nothing downstream validates or sorts them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleMarkers {
    pub charge: Vec<f64>,
    pub discharge: Vec<f64>,
}

impl CycleMarkers {
    pub fn new(charge: Vec<f64>, discharge: Vec<f64>) -> Self {
        CycleMarkers { charge, discharge }
    }

    pub fn is_empty(&self) -> bool {
        self.charge.is_empty() && self.discharge.is_empty()
    }

    /// Pairs each charge time with the matching discharge time, the cycle
    /// label midpoint sits between the two. Stops at the shorter list when
    /// the run ends mid-cycle.
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.charge
            .iter()
            .zip(&self.discharge)
            .map(|(charge, discharge)| (*charge, *discharge))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_stop_at_shorter_list() {
        let markers = CycleMarkers::new(vec![0.5, 4.5, 9.0], vec![2.5, 7.0]);

        assert_eq!(markers.pairs(), vec![(0.5, 2.5), (4.5, 7.0)]);
    }

    #[test]
    fn test_empty_markers() {
        let markers = CycleMarkers::default();

        assert!(markers.is_empty());
        assert!(markers.pairs().is_empty());
    }
}
