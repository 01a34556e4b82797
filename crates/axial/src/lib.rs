//! Axial mesh resampling for level-resolved datasets
//!
#![doc = include_str!("../readme.md")]

mod error;
mod interpolator;
mod resolve;

#[doc(inline)]
pub use crate::interpolator::{AxialInterpolator, InterpolationMode};

#[doc(inline)]
pub use crate::resolve::{combine_cycles, resolve_axial_dataset, resolve_axial_mesh};

#[doc(inline)]
pub use crate::error::{Error, Result};
