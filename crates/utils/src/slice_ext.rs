use crate::error::{Error, Result};

/// Extends functionality for slices of mesh boundaries
///
/// Axial meshes are stored as a list of ascending boundaries, so that `n`
/// levels are described by `n + 1` values. Everything here works on that
/// convention.
pub trait SliceExt {
    /// Make sure the slice is a usable set of mesh boundaries
    ///
    /// At least two values are needed to describe a single level, and every
    /// boundary must be strictly above the one before it.
    ///
    /// ```rust
    /// # use ctools_utils::SliceExt;
    /// assert!([0.0, 10.0, 20.0].check_boundaries().is_ok());
    ///
    /// // repeated or descending boundaries are rejected
    /// assert!([0.0, 10.0, 10.0].check_boundaries().is_err());
    /// assert!([10.0].check_boundaries().is_err());
    /// ```
    fn check_boundaries(&self) -> Result<()>;

    /// Centre of every level between consecutive boundaries
    ///
    /// ```rust
    /// # use ctools_utils::SliceExt;
    /// let mesh = [0.0, 10.0, 30.0];
    /// assert_eq!(mesh.midpoints(), vec![5.0, 20.0]);
    ///
    /// // fewer than two boundaries have no levels at all
    /// assert!([1.0].midpoints().is_empty());
    /// ```
    fn midpoints(&self) -> Vec<f64>;

    /// Height of every level between consecutive boundaries
    ///
    /// ```rust
    /// # use ctools_utils::SliceExt;
    /// let mesh = [0.0, 10.0, 30.0, 32.5];
    /// assert_eq!(mesh.widths(), vec![10.0, 20.0, 2.5]);
    /// ```
    fn widths(&self) -> Vec<f64>;

    /// Find index bin containing 'value', where bins are low < value <= high
    ///
    /// A value on a bin edge returns the bin below. Values equal to the lowest
    /// bound are considered part of the first bin.
    ///
    /// # Example
    /// ```text
    ///     Boundaries: 0.0 10.0 20.0 30.0
    ///
    ///     0.0  <= bin 0 <= 10.0
    ///     10.0 <  bin 1 <= 20.0
    ///     20.0 <  bin 2 <= 30.0
    /// ```
    ///
    /// ```rust
    /// # use ctools_utils::SliceExt;
    /// let bounds = vec![0.0, 10.0, 20.0, 30.0];
    ///
    /// // Find values in the array
    /// assert_eq!(bounds.find_bin_inclusive(0.0), Ok(0));
    /// assert_eq!(bounds.find_bin_inclusive(10.0), Ok(0));
    /// assert_eq!(bounds.find_bin_inclusive(10.5), Ok(1));
    /// assert_eq!(bounds.find_bin_inclusive(30.0), Ok(2));
    ///
    /// // Values outside the bin bounds are an error case
    /// assert!(bounds.find_bin_inclusive(-1.0).is_err());
    /// assert!(bounds.find_bin_inclusive(31.0).is_err());
    /// ```
    fn find_bin_inclusive(&self, value: f64) -> Result<usize>;
}

impl SliceExt for [f64] {
    fn check_boundaries(&self) -> Result<()> {
        let n = self.len();
        if n < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: n,
                minimum_required: 2,
            });
        }

        match self.windows(2).position(|w| w[1] <= w[0] || w[0].is_nan()) {
            Some(index) => Err(Error::NonAscendingBoundaries {
                index,
                lower: self[index],
                upper: self[index + 1],
            }),
            None => Ok(()),
        }
    }

    fn midpoints(&self) -> Vec<f64> {
        self.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    fn widths(&self) -> Vec<f64> {
        self.windows(2).map(|w| w[1] - w[0]).collect()
    }

    fn find_bin_inclusive(&self, value: f64) -> Result<usize> {
        // make sure there are bin edges to check against
        let n = self.len();
        if n < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: n,
                minimum_required: 2,
            });
        }

        let lower_bound = self[0];
        let upper_bound = self[n - 1];

        // is the value relevant?
        if value < lower_bound || value > upper_bound || value.is_nan() {
            return Err(Error::ValueOutsideOfBounds {
                value,
                lower_bound,
                upper_bound,
            });
        }

        // special case for being on the lowest edge
        if value == lower_bound {
            return Ok(0);
        }

        // edges are sorted, so the first upper edge at or above the value
        // closes the bin
        match self[1..].iter().position(|high| value <= *high) {
            Some(idx) => Ok(idx),
            // this should be unreachable
            None => Err(Error::UncapturedErrorCondition),
        }
    }
}
