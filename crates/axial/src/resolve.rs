//! Resampling datasets and cycles onto a common axial mesh

// crate modules
use crate::error::{Error, Result};
use crate::interpolator::{AxialInterpolator, InterpolationMode};

// ctools modules
use ctools_utils::SliceExt;

// external crates
use log::{debug, trace};
use ndarray::{concatenate, ArrayD, ArrayViewD, Axis};

/// Resample `data` from the levels of `from_mesh` onto those of `to_mesh`
///
/// The result has the same shape as `data`, except `axis` is resized to the
/// number of levels in `to_mesh`. Every target level takes the interpolated
/// value at its centre, see [AxialInterpolator] for details.
///
/// ```rust
/// # use ctools_axial::{resolve_axial_dataset, InterpolationMode};
/// # use ndarray::array;
/// let mesh = [0.0, 10.0, 20.0];
/// let data = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
///
/// // identical meshes give the data back
/// let resolved = resolve_axial_dataset(&mesh, data.view(), 0, &mesh, InterpolationMode::Nearest);
/// assert_eq!(resolved.unwrap(), data);
/// ```
pub fn resolve_axial_dataset(
    to_mesh: &[f64],
    data: ArrayViewD<f64>,
    axis: usize,
    from_mesh: &[f64],
    mode: InterpolationMode,
) -> Result<ArrayD<f64>> {
    to_mesh.check_boundaries()?;
    let interpolator = AxialInterpolator::new(data.view(), from_mesh, axis, mode)?;

    let centres = to_mesh.midpoints();
    let mut shape = data.shape().to_vec();
    shape[axis] = centres.len();

    trace!(
        "Resampling {} levels onto {} ({mode})",
        interpolator.levels(),
        centres.len()
    );

    let mut resolved = ArrayD::zeros(shape);
    for (k, centre) in centres.into_iter().enumerate() {
        resolved
            .index_axis_mut(Axis(axis), k)
            .assign(&interpolator.evaluate(centre)?);
    }

    Ok(resolved)
}

/// Choose the common mesh from a set of candidates
///
/// The mesh with the most boundaries wins outright. Boundaries are never
/// merged, and the first candidate wins a tie.
///
/// ```rust
/// # use ctools_axial::resolve_axial_mesh;
/// let coarse = vec![0.0, 20.0];
/// let fine = vec![0.0, 5.0, 10.0, 20.0];
/// let other = vec![0.0, 10.0, 20.0, 30.0];
///
/// let mesh = resolve_axial_mesh([coarse.as_slice(), fine.as_slice(), other.as_slice()]);
/// assert_eq!(mesh.unwrap(), fine.as_slice());
/// ```
pub fn resolve_axial_mesh<'m, I>(meshes: I) -> Result<&'m [f64]>
where
    I: IntoIterator<Item = &'m [f64]>,
{
    let mut candidates = 0;
    let mut selected: Option<&'m [f64]> = None;

    for mesh in meshes {
        candidates += 1;
        if selected.map_or(true, |s| mesh.len() > s.len()) {
            selected = Some(mesh);
        }
    }

    let mesh = selected.ok_or(Error::NoMeshes)?;
    mesh.check_boundaries()?;

    debug!(
        "Selected a {} level axial mesh from {candidates} candidates",
        mesh.len() - 1
    );
    Ok(mesh)
}

/// Stack several cycles on a common axial mesh
///
/// Each cycle is a mesh with data whose `axial_axis` holds its levels. The
/// common mesh is chosen by [resolve_axial_mesh], every cycle is resampled
/// onto it, and the results are concatenated along `stack_axis`.
///
/// Returns the common mesh and the stacked data.
///
/// ```rust
/// # use ctools_axial::{combine_cycles, InterpolationMode};
/// # use ndarray::array;
/// let first = array![[1.0, 2.0]].into_dyn();
/// let second = array![[3.0]].into_dyn();
/// let cycles = [
///     (&[0.0, 10.0, 20.0][..], first.view()),
///     (&[0.0, 20.0][..], second.view()),
/// ];
///
/// let (mesh, stacked) = combine_cycles(&cycles, 1, 0, InterpolationMode::Nearest).unwrap();
/// assert_eq!(mesh, vec![0.0, 10.0, 20.0]);
/// assert_eq!(stacked, array![[1.0, 2.0], [3.0, 3.0]].into_dyn());
/// ```
pub fn combine_cycles(
    cycles: &[(&[f64], ArrayViewD<f64>)],
    axial_axis: usize,
    stack_axis: usize,
    mode: InterpolationMode,
) -> Result<(Vec<f64>, ArrayD<f64>)> {
    let mesh = resolve_axial_mesh(cycles.iter().map(|(mesh, _)| *mesh))?;

    let resolved = cycles
        .iter()
        .map(|(from_mesh, data)| {
            resolve_axial_dataset(mesh, data.view(), axial_axis, from_mesh, mode)
        })
        .collect::<Result<Vec<ArrayD<f64>>>>()?;

    let views = resolved.iter().map(|r| r.view()).collect::<Vec<_>>();
    let stacked = concatenate(Axis(stack_axis), &views)?;

    debug!("Combined {} cycles into {:?}", cycles.len(), stacked.shape());
    Ok((mesh.to_vec(), stacked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn output_takes_target_levels() {
        let data = array![[1.0, 2.0, 3.0, 4.0]].into_dyn();
        let from_mesh = [0.0, 1.0, 2.0, 3.0, 4.0];
        let to_mesh = [0.0, 2.0, 4.0];

        // target centres 1.0 and 3.0 sit on region edges and go down
        let resolved =
            resolve_axial_dataset(&to_mesh, data.view(), 1, &from_mesh, InterpolationMode::Nearest)
                .unwrap();
        assert_eq!(resolved, array![[1.0, 3.0]].into_dyn());

        let resolved =
            resolve_axial_dataset(&to_mesh, data.view(), 1, &from_mesh, InterpolationMode::Linear)
                .unwrap();
        assert_eq!(resolved, array![[1.5, 3.5]].into_dyn());
    }

    #[test]
    fn invalid_target_mesh() {
        let data = array![1.0].into_dyn();
        let mode = InterpolationMode::Nearest;
        assert!(matches!(
            resolve_axial_dataset(&[5.0, 1.0], data.view(), 0, &[0.0, 1.0], mode),
            Err(Error::MeshError(_))
        ));
    }

    #[test]
    fn first_mesh_wins_ties() {
        let a = [0.0, 1.0, 2.0];
        let b = [0.0, 5.0, 10.0];
        let mesh = resolve_axial_mesh([a.as_slice(), b.as_slice()]).unwrap();
        assert_eq!(mesh, a.as_slice());

        let mesh = resolve_axial_mesh([b.as_slice(), a.as_slice()]).unwrap();
        assert_eq!(mesh, b.as_slice());
    }

    #[test]
    fn no_meshes() {
        let meshes: Vec<&[f64]> = Vec::new();
        assert!(matches!(resolve_axial_mesh(meshes), Err(Error::NoMeshes)));
    }

    #[test]
    fn mismatched_cycles() {
        let first = array![[1.0, 2.0]].into_dyn();
        let second = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let mesh = [0.0, 1.0, 2.0];
        let cycles = [(&mesh[..], first.view()), (&mesh[..], second.view())];

        // stacking works along the first axis only
        let (_, stacked) = combine_cycles(&cycles, 1, 0, InterpolationMode::Nearest).unwrap();
        assert_eq!(stacked.shape(), &[3, 2]);
        assert!(matches!(
            combine_cycles(&cycles, 1, 1, InterpolationMode::Nearest),
            Err(Error::NdarrayShapeError(_))
        ));
    }
}
