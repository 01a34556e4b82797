//! Pin weight tensors and weighted statistics for reactor core data
//!
#![doc = include_str!("../readme.md")]

mod dataset;
mod engine;
mod error;
mod geometry;
mod node;
mod reduce;
mod symmetry;
mod weight_set;

#[doc(inline)]
pub use crate::engine::WeightEngine;

#[doc(inline)]
pub use crate::geometry::{AssemblyPosition, CoreGeometry};

#[doc(inline)]
pub use crate::dataset::{AggregationKind, Dataset};

#[doc(inline)]
pub use crate::symmetry::Symmetry;

#[doc(inline)]
pub use crate::weight_set::{Reductions, WeightKind, WeightSet};

#[doc(inline)]
pub use crate::node::NODES;

#[doc(inline)]
pub use crate::error::{Error, Result};
