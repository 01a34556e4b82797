//! NaN-aware reductions over pin tensors

// crate modules
use crate::error::{Error, Result};

// ctools modules
use ctools_utils::FiniteExt;

// external crates
use ndarray::{Array4, ArrayD, ArrayView4, ArrayViewD, Axis, Zip};

/// Sort and validate the axes to reduce, highest first
///
/// Reducing from the highest axis down keeps the remaining axis indices
/// valid after each step.
pub(crate) fn reduction_order(axes: &[usize], ndim: usize) -> Result<Vec<usize>> {
    let mut order = axes.to_vec();
    order.sort_unstable_by(|a, b| b.cmp(a));
    order.dedup();

    if order.len() != axes.len() || order.iter().any(|&ax| ax >= ndim) {
        return Err(Error::InvalidAxes(axes.to_vec()));
    }

    Ok(order)
}

/// Fold `data` over every axis in `axes`
fn fold_axes<F>(data: ArrayViewD<f64>, axes: &[usize], init: f64, op: F) -> Result<ArrayD<f64>>
where
    F: Fn(f64, f64) -> f64,
{
    let order = reduction_order(axes, data.ndim())?;
    let mut reduced = data.to_owned();
    for ax in order {
        reduced = reduced.fold_axis(Axis(ax), init, |acc, value| op(*acc, *value));
    }
    Ok(reduced)
}

/// Sum over the given axes
pub(crate) fn sum_axes(data: ArrayViewD<f64>, axes: &[usize]) -> Result<ArrayD<f64>> {
    fold_axes(data, axes, 0.0, |acc, value| acc + value)
}

/// Maximum over the given axes, ignoring NaN
///
/// Lanes with nothing but NaN stay NaN for the caller to deal with.
pub(crate) fn nanmax_axes(data: ArrayViewD<f64>, axes: &[usize]) -> Result<ArrayD<f64>> {
    fold_axes(data, axes, f64::NAN, f64::max)
}

/// Minimum over the given axes, ignoring NaN
pub(crate) fn nanmin_axes(data: ArrayViewD<f64>, axes: &[usize]) -> Result<ArrayD<f64>> {
    fold_axes(data, axes, f64::NAN, f64::min)
}

/// Elementwise `values * factors` where cells without weight contribute
/// nothing
///
/// Undefined values in weighted cells are kept, so the lanes they fall in
/// end up undefined and are scrubbed to zero.
pub(crate) fn weighted(values: ArrayView4<f64>, factors: ArrayView4<f64>) -> Array4<f64> {
    Zip::from(&values)
        .and(&factors)
        .map_collect(|&v, &f| match f == 0.0 {
            true => 0.0,
            false => v * f,
        })
}

/// Elementwise quotient with undefined results set to zero
pub(crate) fn divide(numerator: &ArrayD<f64>, denominator: &ArrayD<f64>) -> ArrayD<f64> {
    Zip::from(numerator)
        .and(denominator)
        .map_collect(|&n, &d| (n / d).or_zero())
}
