//! Result and Error types for ctools-axial

/// Type alias for Result<T, axial::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `ctools-axial` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid axial mesh: {0}")]
    MeshError(#[from] ctools_utils::Error),

    #[error("ndarray shape error")]
    NdarrayShapeError(#[from] ndarray::ShapeError),

    #[error("axis {axis} does not exist for a {ndim}-dimensional array")]
    InvalidAxis { axis: usize, ndim: usize },

    #[error("mesh describes {expected} levels but axis {axis} has {found}")]
    LevelMismatch {
        axis: usize,
        expected: usize,
        found: usize,
    },

    #[error("no axial meshes to choose from")]
    NoMeshes,
}
