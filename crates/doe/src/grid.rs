use linfa::Float;
use ndarray::{Array, Array1};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Deterministic grid over `[lower, upper]`: `resolution` evenly spaced
/// levels, both endpoints included when `resolution >= 2`. Identical inputs
/// always produce identical levels.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Grid<F: Float> {
    lower: F,
    upper: F,
    resolution: usize,
}

impl<F: Float> Grid<F> {
    /// Constructor given the interval bounds and the number of levels
    pub fn new(lower: F, upper: F, resolution: usize) -> Self {
        Grid {
            lower,
            upper,
            resolution,
        }
    }

    /// Number of levels of the grid
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Generates the ordered grid levels.
    ///
    /// A resolution of 1 yields the single level `lower`, so no interval
    /// subdivision ever occurs in that case.
    pub fn levels(&self) -> Array1<F> {
        if self.resolution == 1 {
            return Array1::from_elem(1, self.lower);
        }
        Array::linspace(self.lower, self.upper, self.resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_grid_levels() {
        let levels = Grid::new(0., 1., 5).levels();
        assert_abs_diff_eq!(levels, array![0., 0.25, 0.5, 0.75, 1.], epsilon = 1e-12);
    }

    #[test]
    fn test_grid_endpoints_and_monotonicity() {
        let levels = Grid::new(-3., 7., 9).levels();
        assert_eq!(9, levels.len());
        assert_abs_diff_eq!(levels[0], -3., epsilon = 1e-12);
        assert_abs_diff_eq!(levels[8], 7., epsilon = 1e-12);
        for w in levels.to_vec().windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn test_single_level_grid() {
        let levels = Grid::new(2.5, 9., 1).levels();
        assert_abs_diff_eq!(levels, array![2.5], epsilon = 1e-12);
    }

    #[test]
    fn test_two_level_grid() {
        let levels = Grid::new(0., 10., 2).levels();
        assert_abs_diff_eq!(levels, array![0., 10.], epsilon = 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let g = Grid::new(0., 1., 7);
        assert_eq!(g.levels(), g.levels());
    }
}
