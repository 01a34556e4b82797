//! Core symmetry models

// crate modules
use crate::error::Error;

// external crates
use serde::{Deserialize, Serialize};

/// Core symmetry types, i.e. `Full`, `Quarter`, `Eighth`
///
/// Stored in simulation output as an integer code (1, 4, 8). A code of 0 is
/// treated the same as a full core model.
///
/// Reduced symmetry models only store the south-east part of the core, so
/// pins and assemblies on a line of symmetry must not be double counted when
/// building weights.
///
/// ```rust
/// # use ctools_weights::Symmetry;
/// assert_eq!(Symmetry::try_from(4).unwrap(), Symmetry::Quarter);
/// assert_eq!(Symmetry::Eighth.code(), 8);
/// assert!(Symmetry::try_from(3).is_err());
/// ```
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Symmetry {
    /// Full core modelled
    #[default]
    Full = 1,
    /// One quarter modelled, mirrored twice
    Quarter = 4,
    /// One octant modelled
    Eighth = 8,
}

impl Symmetry {
    /// Integer code used in simulation output
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// True for anything other than a full core model
    pub fn is_reduced(&self) -> bool {
        *self != Symmetry::Full
    }

    /// Full name i.e. 'Full', 'Quarter', 'Eighth'
    pub fn long_name(&self) -> &str {
        match self {
            Symmetry::Full => "Full",
            Symmetry::Quarter => "Quarter",
            Symmetry::Eighth => "Eighth",
        }
    }
}

impl TryFrom<u8> for Symmetry {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 | 1 => Ok(Symmetry::Full),
            4 => Ok(Symmetry::Quarter),
            8 => Ok(Symmetry::Eighth),
            _ => Err(Error::UnknownSymmetry(code)),
        }
    }
}

impl From<Symmetry> for u8 {
    fn from(symmetry: Symmetry) -> u8 {
        symmetry.code()
    }
}

impl std::fmt::Display for Symmetry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.long_name())
    }
}
