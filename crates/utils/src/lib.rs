//! Common utility for extended `std` and `ndarray` types
//!
//! These are left public for convenience.
//!
//! For example, finding level centres of an axial mesh or scrubbing undefined
//! values out of a reduced array are needed by every crate in the toolkit.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod error;
mod finite_ext;
mod slice_ext;
mod string_ext;

// Flatten
pub use error::{Error, Result};
pub use finite_ext::FiniteExt;
pub use slice_ext::SliceExt;
pub use string_ext::StringExt;
