//! `ctools` is a semi-modular toolkit of libraries for reactor core
//! simulation post-processing
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use ctools_utils as utils;

#[cfg(feature = "axial")]
#[cfg_attr(docsrs, doc(cfg(feature = "axial")))]
#[doc(inline)]
pub use ctools_axial as axial;

#[cfg(feature = "weights")]
#[cfg_attr(docsrs, doc(cfg(feature = "weights")))]
#[doc(inline)]
pub use ctools_weights as weights;
