//! Module for the core geometry consumed by the weight engine

// crate modules
use crate::error::{Error, Result};
use crate::symmetry::Symmetry;

// ctools modules
use ctools_utils::SliceExt;

// standard library
use std::collections::{BTreeMap, BTreeSet};

// external crates
use log::{trace, warn};
use ndarray::{Array2, ArrayD, ArrayView4, Ix4};
use serde::{Deserialize, Serialize};

/// Description of a reactor core and its auxiliary pin datasets
///
/// Pin-resolved datasets are 4-D "pin tensors" with the shape
/// `(npiny, npinx, nax, nass)`, i.e. pin row, pin column, axial level, and
/// assembly. Every array handed to the weight engine is checked against
/// [pin_shape()](CoreGeometry::pin_shape).
///
/// The `core_map` holds 1-based assembly indices into the last pin tensor
/// dimension, with anything `<= 0` meaning there is no assembly at that
/// position. For reduced [Symmetry] models the map is the full core, with
/// mirrored positions sharing an index.
///
/// ## Auxiliary datasets
///
/// The `group` mirrors the datasets found alongside the core description in
/// simulation output. Only two uses are made of it:
///
/// - an `initial_mass` (or `pin_initial_mass`) pin tensor enables
///   mass-weighted exposure averages
/// - any other pin tensor may be named as an alternate averaging factor by a
///   [Dataset](crate::Dataset)
///
/// ## Configuration
///
/// The geometry is `serde` compatible, so core descriptions can be kept as
/// JSON. Arrays use the `ndarray` serde layout.
///
/// ```rust
/// # use ctools_weights::{CoreGeometry, Symmetry};
/// let core = CoreGeometry::from_json(r#"{
///     "axial_mesh": [0.0, 10.0, 20.0],
///     "core_map": {"v": 1, "dim": [1, 1], "data": [1]},
///     "symmetry": 1,
///     "npinx": 2,
///     "npiny": 2,
///     "nass": 1
/// }"#).unwrap();
///
/// assert_eq!(core.symmetry, Symmetry::Full);
/// assert_eq!(core.pin_shape(), [2, 2, 2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreGeometry {
    /// Ascending axial level boundaries \[cm\]
    pub axial_mesh: Vec<f64>,
    /// Assembly indices by position, shape `(nassy, nassx)`
    pub core_map: Array2<i32>,
    /// Modelled fraction of the core
    pub symmetry: Symmetry,
    /// Pins across an assembly
    pub npinx: usize,
    /// Pins down an assembly
    pub npiny: usize,
    /// Total number of assemblies in the pin tensors
    pub nass: usize,
    /// Auxiliary datasets registered on the core
    #[serde(default)]
    pub group: BTreeMap<String, ArrayD<f64>>,
}

/// Location of a modelled assembly in the core map
///
/// Only the positions visited for the core [Symmetry] are listed, so an
/// assembly index appears at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyPosition {
    /// 0-based index into the assembly dimension of pin tensors
    pub index: usize,
    /// Core map row
    pub row: usize,
    /// Core map column
    pub column: usize,
    /// Assembly straddles the vertical line of symmetry
    pub on_vertical_line: bool,
    /// Assembly straddles the horizontal line of symmetry
    pub on_horizontal_line: bool,
}

impl CoreGeometry {
    /// Parse and validate a core description from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let core: CoreGeometry = serde_json::from_str(json)?;
        core.validate()?;
        Ok(core)
    }

    /// Make sure the description is self-consistent
    ///
    /// The axial mesh must ascend, assemblies need pins, and the core map may
    /// not reference assemblies beyond `nass`.
    pub fn validate(&self) -> Result<()> {
        self.axial_mesh.check_boundaries()?;

        if self.npinx == 0 || self.npiny == 0 {
            return Err(Error::EmptyAssembly {
                npiny: self.npiny,
                npinx: self.npinx,
            });
        }

        if let Some(index) = self.core_map.iter().find(|&&i| i as i64 > self.nass as i64) {
            return Err(Error::AssemblyOutOfRange {
                index: *index,
                nass: self.nass,
            });
        }

        Ok(())
    }

    /// Number of axial levels
    pub fn nax(&self) -> usize {
        self.axial_mesh.len().saturating_sub(1)
    }

    /// Number of assembly positions across the core map
    pub fn nassx(&self) -> usize {
        self.core_map.ncols()
    }

    /// Number of assembly positions down the core map
    pub fn nassy(&self) -> usize {
        self.core_map.nrows()
    }

    /// Pins along the longest assembly edge
    pub fn npin(&self) -> usize {
        self.npinx.max(self.npiny)
    }

    /// Shape of every pin tensor for this core, `(npiny, npinx, nax, nass)`
    pub fn pin_shape(&self) -> [usize; 4] {
        [self.npiny, self.npinx, self.nax(), self.nass]
    }

    /// Height of every axial level
    pub fn level_heights(&self) -> Vec<f64> {
        self.axial_mesh.widths()
    }

    /// Register an auxiliary dataset on the core
    pub fn with_dataset(mut self, name: &str, data: ArrayD<f64>) -> Self {
        self.group.insert(name.to_string(), data);
        self
    }

    /// True if a dataset of this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.group.contains_key(name)
    }

    /// Auxiliary dataset by name, of any shape
    pub fn get(&self, name: &str) -> Option<&ArrayD<f64>> {
        self.group.get(name)
    }

    /// Auxiliary dataset by name, only if it is a pin tensor for this core
    pub fn pin_dataset(&self, name: &str) -> Option<ArrayView4<'_, f64>> {
        let data = self.group.get(name)?;
        if data.shape() != self.pin_shape() {
            trace!(
                "{name} has shape {:?}, not a pin tensor {:?}",
                data.shape(),
                self.pin_shape()
            );
            return None;
        }
        data.view().into_dimensionality::<Ix4>().ok()
    }

    /// Initial heavy metal mass per pin, if available
    ///
    /// Looks for `initial_mass` then `pin_initial_mass`.
    pub fn initial_mass(&self) -> Option<ArrayView4<'_, f64>> {
        self.pin_dataset("initial_mass")
            .or_else(|| self.pin_dataset("pin_initial_mass"))
    }

    /// Assemblies that carry weight for the core symmetry
    ///
    /// Full cores list every assembly in the map. Reduced symmetry cores only
    /// visit the south-east quadrant, starting from the centre column
    /// `nassx / 2` and row `nassy / 2`. With an odd number of positions along
    /// an axis the centre column (row) straddles the line of symmetry.
    pub fn modelled_assemblies(&self) -> Vec<AssemblyPosition> {
        let (mid_x, mid_y) = match self.symmetry.is_reduced() {
            true => (self.nassx() / 2, self.nassy() / 2),
            false => (0, 0),
        };

        let odd_x = self.symmetry.is_reduced() && self.nassx() % 2 == 1;
        let odd_y = self.symmetry.is_reduced() && self.nassy() % 2 == 1;

        let mut seen = BTreeSet::new();
        let mut positions = Vec::new();

        for row in mid_y..self.nassy() {
            for column in mid_x..self.nassx() {
                let entry = self.core_map[[row, column]];
                if entry <= 0 {
                    continue;
                }

                let index = (entry - 1) as usize;
                if !seen.insert(index) {
                    warn!("Assembly {entry} appears more than once in the modelled core");
                    continue;
                }

                positions.push(AssemblyPosition {
                    index,
                    row,
                    column,
                    on_vertical_line: odd_x && column == mid_x,
                    on_horizontal_line: odd_y && row == mid_y,
                });
            }
        }

        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array4};

    fn quarter_core() -> CoreGeometry {
        CoreGeometry {
            axial_mesh: vec![0.0, 1.0],
            core_map: array![[4, 3, 4], [2, 1, 2], [4, 3, 4]],
            symmetry: Symmetry::Quarter,
            npinx: 3,
            npiny: 3,
            nass: 4,
            group: BTreeMap::new(),
        }
    }

    #[test]
    fn quarter_positions_skip_mirrored_assemblies() {
        let positions = quarter_core().modelled_assemblies();
        let indices = positions.iter().map(|p| p.index).collect::<Vec<usize>>();
        assert_eq!(indices, vec![0, 1, 2, 3]);

        // centre assembly sits on both lines
        assert!(positions[0].on_vertical_line && positions[0].on_horizontal_line);
        // east neighbour only on the horizontal line
        assert!(!positions[1].on_vertical_line && positions[1].on_horizontal_line);
        // south neighbour only on the vertical line
        assert!(positions[2].on_vertical_line && !positions[2].on_horizontal_line);
        // corner on neither
        assert!(!positions[3].on_vertical_line && !positions[3].on_horizontal_line);
    }

    #[test]
    fn even_quarter_core_has_no_line_assemblies() {
        let core = CoreGeometry {
            core_map: array![[1, 1], [1, 1]],
            nass: 1,
            ..quarter_core()
        };
        let positions = core.modelled_assemblies();
        assert_eq!(positions.len(), 1);
        assert_eq!((positions[0].row, positions[0].column), (1, 1));
        assert!(!positions[0].on_vertical_line && !positions[0].on_horizontal_line);
    }

    #[test]
    fn validation_failures() {
        let core = CoreGeometry {
            nass: 3,
            ..quarter_core()
        };
        assert!(matches!(
            core.validate(),
            Err(Error::AssemblyOutOfRange { index: 4, nass: 3 })
        ));

        let core = CoreGeometry {
            axial_mesh: vec![0.0],
            ..quarter_core()
        };
        assert!(matches!(core.validate(), Err(Error::MeshError(_))));

        let core = CoreGeometry {
            npinx: 0,
            ..quarter_core()
        };
        assert!(matches!(core.validate(), Err(Error::EmptyAssembly { .. })));
    }

    #[test]
    fn initial_mass_lookup() {
        let core = quarter_core();
        assert!(core.initial_mass().is_none());

        // wrong shape is ignored
        let core = core.with_dataset("initial_mass", ArrayD::zeros(vec![3, 3]));
        assert!(core.contains("initial_mass"));
        assert!(core.initial_mass().is_none());

        // falls back to the pin_ prefixed name
        let mass = Array4::from_elem((3, 3, 1, 4), 2.0).into_dyn();
        let core = core.with_dataset("pin_initial_mass", mass);
        assert_eq!(core.initial_mass().map(|m| m.sum()), Some(72.0));
    }

    #[test]
    fn symmetry_from_json_code() {
        let json = r#"{
            "axial_mesh": [0.0, 5.0, 10.0],
            "core_map": {"v": 1, "dim": [1, 1], "data": [1]},
            "symmetry": 8,
            "npinx": 17,
            "npiny": 17,
            "nass": 1
        }"#;
        let core = CoreGeometry::from_json(json).unwrap();
        assert_eq!(core.symmetry, Symmetry::Eighth);
        assert_eq!(core.nax(), 2);
        assert_eq!(core.npin(), 17);
        assert!(core.group.is_empty());

        let bad = json.replace("\"symmetry\": 8", "\"symmetry\": 2");
        assert!(CoreGeometry::from_json(&bad).is_err());
    }
}
