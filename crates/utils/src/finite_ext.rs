// external crates
use ndarray::{ArrayBase, DataMut, Dimension};

/// Replace undefined values with zero
///
/// Weighted reductions divide by sums of weights that are legitimately zero
/// for cells with no data. Displaying these as zero is preferred over letting
/// NaN or infinite values reach the caller.
///
/// Implemented for `f64` and any mutable `ndarray` array of `f64`.
///
/// ```rust
/// # use ctools_utils::FiniteExt;
/// # use ndarray::array;
/// assert_eq!((0.0_f64 / 0.0).or_zero(), 0.0);
/// assert_eq!((1.0_f64 / 0.0).or_zero(), 0.0);
/// assert_eq!(2.5_f64.or_zero(), 2.5);
///
/// let mut values = array![1.0, f64::NAN, f64::NEG_INFINITY];
/// values.scrub();
/// assert_eq!(values, array![1.0, 0.0, 0.0]);
/// ```
pub trait FiniteExt {
    /// Value if finite, otherwise zero
    fn or_zero(self) -> Self
    where
        Self: Sized;

    /// Replace every non-finite value in place
    fn scrub(&mut self);
}

impl FiniteExt for f64 {
    fn or_zero(self) -> f64 {
        if self.is_finite() {
            self
        } else {
            0.0
        }
    }

    fn scrub(&mut self) {
        *self = self.or_zero();
    }
}

impl<S, D> FiniteExt for ArrayBase<S, D>
where
    S: DataMut<Elem = f64>,
    D: Dimension,
{
    fn or_zero(mut self) -> Self {
        self.scrub();
        self
    }

    fn scrub(&mut self) {
        self.mapv_inplace(f64::or_zero);
    }
}
