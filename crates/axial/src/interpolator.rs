//! Interpolation between axial level centres

// crate modules
use crate::error::{Error, Result};

// ctools modules
use ctools_utils::SliceExt;

// standard library
use std::iter::once;

// external crates
use log::trace;
use ndarray::{ArrayD, ArrayViewD, Axis};
use serde::{Deserialize, Serialize};

/// How values between source level centres are found
///
/// Both modes extrapolate linearly outside the range of source centres.
///
/// ```rust
/// # use ctools_axial::InterpolationMode;
/// assert_eq!(InterpolationMode::default(), InterpolationMode::Nearest);
/// assert_eq!(InterpolationMode::Linear.to_string(), "linear");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMode {
    /// Value of the closest level centre, ties going to the lower level
    #[default]
    Nearest,
    /// Piecewise linear between neighbouring level centres
    Linear,
}

impl std::fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            InterpolationMode::Nearest => write!(f, "nearest"),
            InterpolationMode::Linear => write!(f, "linear"),
        }
    }
}

/// Evaluates a level-resolved array at any axial position
///
/// The source levels are described by a mesh of boundaries, and each level
/// value is taken to sit at the level centre. Evaluating at a position gives
/// an array with the axial axis removed.
///
/// Positions below the first centre or above the last centre are linearly
/// extrapolated from the two outermost levels on that side:
///
/// ```text
///     y = (x - x0) / (x1 - x0) * (y1 - y0) + y0
/// ```
///
/// A source with a single level has nothing to extrapolate from, and always
/// gives that level.
///
/// ```rust
/// # use ctools_axial::{AxialInterpolator, InterpolationMode};
/// # use ndarray::array;
/// let data = array![1.0, 2.0, 4.0].into_dyn();
/// let mesh = [0.0, 10.0, 20.0, 30.0];
///
/// let nearest =
///     AxialInterpolator::new(data.view(), &mesh, 0, InterpolationMode::Nearest).unwrap();
/// assert_eq!(nearest.evaluate(10.0).unwrap().sum(), 1.0);
/// assert_eq!(nearest.evaluate(12.0).unwrap().sum(), 2.0);
/// assert_eq!(nearest.evaluate(0.0).unwrap().sum(), 0.5);
///
/// let linear =
///     AxialInterpolator::new(data.view(), &mesh, 0, InterpolationMode::Linear).unwrap();
/// assert_eq!(linear.evaluate(10.0).unwrap().sum(), 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct AxialInterpolator<'a> {
    data: ArrayViewD<'a, f64>,
    axis: Axis,
    mode: InterpolationMode,
    /// Source level centres
    centres: Vec<f64>,
    /// Extent of every level centre's nearest neighbour region
    regions: Vec<f64>,
}

impl<'a> AxialInterpolator<'a> {
    /// Interpolator over `data`, whose `axis` holds the levels of `mesh`
    pub fn new(
        data: ArrayViewD<'a, f64>,
        mesh: &[f64],
        axis: usize,
        mode: InterpolationMode,
    ) -> Result<Self> {
        mesh.check_boundaries()?;

        if axis >= data.ndim() {
            return Err(Error::InvalidAxis {
                axis,
                ndim: data.ndim(),
            });
        }

        let centres = mesh.midpoints();
        if data.len_of(Axis(axis)) != centres.len() {
            return Err(Error::LevelMismatch {
                axis,
                expected: centres.len(),
                found: data.len_of(Axis(axis)),
            });
        }

        let regions = once(centres[0])
            .chain(centres.midpoints())
            .chain(once(centres[centres.len() - 1]))
            .collect();

        Ok(Self {
            data,
            axis: Axis(axis),
            mode,
            centres,
            regions,
        })
    }

    /// Number of source levels
    pub fn levels(&self) -> usize {
        self.centres.len()
    }

    /// Interpolated values at axial position `x`
    pub fn evaluate(&self, x: f64) -> Result<ArrayD<f64>> {
        let n = self.levels();
        if n == 1 {
            return Ok(self.level(0));
        }

        if x < self.centres[0] {
            trace!("Extrapolating below the first level centre to {x}");
            return Ok(self.blend(0, 1, x));
        }

        if x > self.centres[n - 1] {
            trace!("Extrapolating above the last level centre to {x}");
            return Ok(self.blend(n - 2, n - 1, x));
        }

        match self.mode {
            InterpolationMode::Nearest => Ok(self.level(self.regions.find_bin_inclusive(x)?)),
            InterpolationMode::Linear => {
                let lower = self.centres.find_bin_inclusive(x)?;
                Ok(self.blend(lower, lower + 1, x))
            }
        }
    }

    fn level(&self, index: usize) -> ArrayD<f64> {
        self.data.index_axis(self.axis, index).to_owned()
    }

    /// Line through levels `i` and `j` evaluated at `x`
    fn blend(&self, i: usize, j: usize, x: f64) -> ArrayD<f64> {
        let (x0, x1) = (self.centres[i], self.centres[j]);
        let y0 = self.data.index_axis(self.axis, i);
        let y1 = self.data.index_axis(self.axis, j);

        let ratio = (x - x0) / (x1 - x0);
        (&y1 - &y0) * ratio + &y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    fn interpolator(data: &ArrayD<f64>, mode: InterpolationMode) -> AxialInterpolator<'_> {
        AxialInterpolator::new(data.view(), &[0.0, 10.0, 20.0, 40.0], 0, mode).unwrap()
    }

    #[test]
    fn nearest_ties_go_down() {
        let data = array![1.0, 2.0, 3.0].into_dyn();
        let interp = interpolator(&data, InterpolationMode::Nearest);

        // centres at 5, 15, 30 split at 10 and 22.5
        assert_eq!(interp.evaluate(5.0).unwrap().sum(), 1.0);
        assert_eq!(interp.evaluate(10.0).unwrap().sum(), 1.0);
        assert_eq!(interp.evaluate(10.1).unwrap().sum(), 2.0);
        assert_eq!(interp.evaluate(22.5).unwrap().sum(), 2.0);
        assert_eq!(interp.evaluate(22.6).unwrap().sum(), 3.0);
        assert_eq!(interp.evaluate(30.0).unwrap().sum(), 3.0);
    }

    #[test]
    fn linear_between_centres() {
        let data = array![1.0, 2.0, 4.0].into_dyn();
        let interp = interpolator(&data, InterpolationMode::Linear);

        assert_eq!(interp.evaluate(5.0).unwrap().sum(), 1.0);
        assert_eq!(interp.evaluate(10.0).unwrap().sum(), 1.5);
        assert_eq!(interp.evaluate(22.5).unwrap().sum(), 3.0);
        assert_eq!(interp.evaluate(30.0).unwrap().sum(), 4.0);
    }

    #[test]
    fn extrapolation_uses_outer_pairs() {
        let data = array![1.0, 2.0, 4.0].into_dyn();
        for mode in [InterpolationMode::Nearest, InterpolationMode::Linear] {
            let interp = interpolator(&data, mode);
            // (0 - 5) / 10 * (2 - 1) + 1
            assert_eq!(interp.evaluate(0.0).unwrap().sum(), 0.5);
            // (40 - 15) / 15 * (4 - 2) + 2
            let above = interp.evaluate(40.0).unwrap().sum();
            assert!((above - 16.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn levels_along_any_axis() {
        let data = Array3::from_shape_fn((2, 3, 2), |(i, j, k)| (100 * i + 10 * j + k) as f64);
        let data = data.into_dyn();
        let mesh = [0.0, 1.0, 2.0, 3.0];
        let interp =
            AxialInterpolator::new(data.view(), &mesh, 1, InterpolationMode::Nearest).unwrap();

        assert_eq!(interp.levels(), 3);
        assert_eq!(
            interp.evaluate(2.5).unwrap(),
            array![[20.0, 21.0], [120.0, 121.0]].into_dyn()
        );
    }

    #[test]
    fn single_level_is_constant() {
        let data = array![[7.0], [8.0]].into_dyn();
        let interp =
            AxialInterpolator::new(data.view(), &[0.0, 10.0], 1, InterpolationMode::Nearest).unwrap();
        assert_eq!(interp.evaluate(-50.0).unwrap(), array![7.0, 8.0].into_dyn());
        assert_eq!(interp.evaluate(500.0).unwrap(), array![7.0, 8.0].into_dyn());
    }

    #[test]
    fn inconsistent_inputs() {
        let data = array![1.0, 2.0].into_dyn();
        let mode = InterpolationMode::Nearest;
        assert!(matches!(
            AxialInterpolator::new(data.view(), &[0.0, 1.0, 2.0], 1, mode),
            Err(Error::InvalidAxis { axis: 1, ndim: 1 })
        ));
        assert!(matches!(
            AxialInterpolator::new(data.view(), &[0.0, 1.0], 0, mode),
            Err(Error::LevelMismatch { .. })
        ));
        assert!(matches!(
            AxialInterpolator::new(data.view(), &[0.0], 0, mode),
            Err(Error::MeshError(_))
        ));

        let interp = AxialInterpolator::new(data.view(), &[0.0, 1.0, 2.0], 0, mode).unwrap();
        assert!(interp.evaluate(f64::NAN).is_err());
    }
}
