//! Result and Error types for ctools-weights

use crate::weight_set::WeightKind;

/// Type alias for Result<T, weights::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ctools-weights` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid axial mesh: {0}")]
    MeshError(#[from] ctools_utils::Error),

    #[error("ndarray shape error")]
    NdarrayShapeError(#[from] ndarray::ShapeError),

    #[error("failed to parse core geometry")]
    JsonError(#[from] serde_json::Error),

    #[error("core symmetry code {0} is unknown")]
    UnknownSymmetry(u8),

    #[error("core map references assembly {index} but only {nass} assemblies exist")]
    AssemblyOutOfRange { index: i32, nass: usize },

    #[error("assemblies need at least one pin in each direction (found {npiny}x{npinx})")]
    EmptyAssembly { npiny: usize, npinx: usize },

    #[error("inconsistent shape for {name} (expected {expected:?}, found {found:?})")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("axes {0:?} are not valid for a 4-dimensional pin tensor")]
    InvalidAxes(Vec<usize>),

    #[error("{0} cannot be used for a generic pin reduction")]
    UnsupportedWeights(WeightKind),
}
