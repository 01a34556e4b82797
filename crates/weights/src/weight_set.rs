//! Module for the full family of weight tensors built for a core

// crate modules
use crate::geometry::CoreGeometry;
use crate::node::{assembly_node_weights, node_sums, QuadrantFold};

// ctools modules
use ctools_utils::{f, FiniteExt, StringExt};

// external crates
use ndarray::{aview0, Array1, Array2, Array3, Array4, ArrayView4, ArrayViewD, Axis, Zip};

/// Named weight tensors, i.e. `Pin`, `Assembly`, `Core`
///
/// Each kind is a reduction of the pin weights over a fixed set of pin tensor
/// axes `(pin-row, pin-col, axial, assembly)`:
///
/// | Kind             | Name                    | Axes reduced | Shape                |
/// | ---------------- | ----------------------- | ------------ | -------------------- |
/// | `Pin`            | `pinWeights`            | none         | (npiny,npinx,nax,nass) |
/// | `Assembly`       | `assemblyWeights`       | 0, 1         | (nax, nass)          |
/// | `Axial`          | `axialWeights`          | 0, 1, 3      | (nax,)               |
/// | `Core`           | `coreWeights`           | all          | scalar               |
/// | `RadialAssembly` | `radialAssemblyWeights` | 0, 1, 2      | (nass,)              |
/// | `Radial`         | `radialWeights`         | 2            | (npiny, npinx, nass) |
/// | `Node`           | `nodeWeights`           | quadrants    | (4, nax, nass)       |
/// | `RadialNode`     | `radialNodeWeights`     | quadrants, 2 | (4, nass)            |
///
/// ```rust
/// # use ctools_weights::WeightKind;
/// assert_eq!(WeightKind::Assembly.name(), "assemblyWeights");
/// assert_eq!(WeightKind::Assembly.exposure_name(), "exposureAssemblyWeights");
/// assert_eq!(WeightKind::Axial.axes(), Some([0, 1, 3].as_slice()));
/// assert_eq!(WeightKind::Node.axes(), None);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum WeightKind {
    /// Per-pin weights
    Pin,
    /// Per assembly and axial level
    Assembly,
    /// Per axial level
    Axial,
    /// Whole core
    Core,
    /// Per assembly, all levels
    RadialAssembly,
    /// Per pin position, all levels
    Radial,
    /// Per node, axial level, and assembly
    Node,
    /// Per node and assembly, all levels
    RadialNode,
}

impl WeightKind {
    /// Every kind, in table order
    pub const ALL: [WeightKind; 8] = [
        WeightKind::Pin,
        WeightKind::Assembly,
        WeightKind::Axial,
        WeightKind::Core,
        WeightKind::RadialAssembly,
        WeightKind::Radial,
        WeightKind::Node,
        WeightKind::RadialNode,
    ];

    /// Camel-case name used by the data model, e.g. `assemblyWeights`
    pub fn name(&self) -> &'static str {
        match self {
            WeightKind::Pin => "pinWeights",
            WeightKind::Assembly => "assemblyWeights",
            WeightKind::Axial => "axialWeights",
            WeightKind::Core => "coreWeights",
            WeightKind::RadialAssembly => "radialAssemblyWeights",
            WeightKind::Radial => "radialWeights",
            WeightKind::Node => "nodeWeights",
            WeightKind::RadialNode => "radialNodeWeights",
        }
    }

    /// Name of the mass-weighted variant, e.g. `exposureAssemblyWeights`
    pub fn exposure_name(&self) -> String {
        f!("exposure{}", self.name().capitalise())
    }

    /// Pin tensor axes summed to produce this kind
    ///
    /// Node kinds are built from quadrant masks rather than a plain sum and
    /// return `None`.
    pub fn axes(&self) -> Option<&'static [usize]> {
        match self {
            WeightKind::Pin => Some(&[]),
            WeightKind::Assembly => Some(&[0, 1]),
            WeightKind::Axial => Some(&[0, 1, 3]),
            WeightKind::Core => Some(&[0, 1, 2, 3]),
            WeightKind::RadialAssembly => Some(&[0, 1, 2]),
            WeightKind::Radial => Some(&[2]),
            WeightKind::Node | WeightKind::RadialNode => None,
        }
    }
}

impl std::fmt::Display for WeightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Pin weights and every reduction of them
///
/// One of these is built from the plain pin weights, and another from pin
/// weights multiplied by initial mass for exposure averaging.
#[derive(Debug, Clone, PartialEq)]
pub struct Reductions {
    /// (npiny, npinx, nax, nass)
    pub pin: Array4<f64>,
    /// (nax, nass)
    pub assembly: Array2<f64>,
    /// (nax,)
    pub axial: Array1<f64>,
    /// Sum of everything
    pub core: f64,
    /// (nass,)
    pub radial_assembly: Array1<f64>,
    /// (npiny, npinx, nass)
    pub radial: Array3<f64>,
    /// (4, nax, nass)
    pub node: Array3<f64>,
    /// (4, nass)
    pub radial_node: Array2<f64>,
}

impl Reductions {
    fn new(pin: Array4<f64>, masks: &Array3<f64>, fold: &QuadrantFold) -> Self {
        let assembly = pin.sum_axis(Axis(1)).sum_axis(Axis(0));
        let axial = assembly.sum_axis(Axis(1));
        let radial_assembly = assembly.sum_axis(Axis(0));
        let radial = pin.sum_axis(Axis(2));
        let core = pin.sum();

        let mut node = node_sums(pin.view(), masks);
        fold.apply(&mut node);
        node.scrub();
        let radial_node = node.sum_axis(Axis(1));

        Self {
            pin,
            assembly,
            axial,
            core,
            radial_assembly,
            radial,
            node,
            radial_node,
        }
    }

    /// View of the named tensor with a dynamic dimension
    pub fn get(&self, kind: WeightKind) -> ArrayViewD<'_, f64> {
        match kind {
            WeightKind::Pin => self.pin.view().into_dyn(),
            WeightKind::Assembly => self.assembly.view().into_dyn(),
            WeightKind::Axial => self.axial.view().into_dyn(),
            WeightKind::Core => aview0(&self.core).into_dyn(),
            WeightKind::RadialAssembly => self.radial_assembly.view().into_dyn(),
            WeightKind::Radial => self.radial.view().into_dyn(),
            WeightKind::Node => self.node.view().into_dyn(),
            WeightKind::RadialNode => self.radial_node.view().into_dyn(),
        }
    }
}

/// Complete set of weight tensors for a core
///
/// Built wholesale by [WeightEngine](crate::WeightEngine), never updated in
/// place. Typed fields replace string lookups, though
/// [by_name()](WeightSet::by_name) still resolves the camel-case names used by
/// the data model.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSet {
    /// Reductions of the plain pin weights
    pub standard: Reductions,
    /// Reductions of pin weights times initial mass, if the core has a mass
    pub exposure: Option<Reductions>,
    /// Quadrant masks, shape (4, npiny, npinx)
    pub assembly_node: Array3<f64>,
    pub(crate) fold: QuadrantFold,
}

impl WeightSet {
    /// Derive every tensor from a set of pin weights
    pub(crate) fn build(core: &CoreGeometry, pin: Array4<f64>) -> Self {
        let assembly_node = assembly_node_weights(core.npiny, core.npinx);
        let fold = QuadrantFold::new(core);

        let exposure = core
            .initial_mass()
            .map(|mass| Reductions::new(mass_weighted(pin.view(), mass), &assembly_node, &fold));

        Self {
            standard: Reductions::new(pin, &assembly_node, &fold),
            exposure,
            assembly_node,
            fold,
        }
    }

    /// Plain weight tensor
    pub fn get(&self, kind: WeightKind) -> ArrayViewD<'_, f64> {
        self.standard.get(kind)
    }

    /// Mass-weighted tensor, if an initial mass was available
    pub fn exposure(&self, kind: WeightKind) -> Option<ArrayViewD<'_, f64>> {
        self.exposure.as_ref().map(|e| e.get(kind))
    }

    /// Look up any tensor by its data model name
    ///
    /// Covers `assemblyNodeWeights`, every [WeightKind::name], and the
    /// `exposure` variants. Unknown names, or exposure names without an
    /// initial mass, return `None`.
    pub fn by_name(&self, name: &str) -> Option<ArrayViewD<'_, f64>> {
        if name == "assemblyNodeWeights" {
            return Some(self.assembly_node.view().into_dyn());
        }

        for kind in WeightKind::ALL {
            if name == kind.name() {
                return Some(self.get(kind));
            }
            if name == kind.exposure_name() {
                return self.exposure(kind);
            }
        }

        None
    }

    /// Pin weights
    pub fn pin(&self) -> ArrayView4<'_, f64> {
        self.standard.pin.view()
    }

    /// Total weight of the core
    pub fn core(&self) -> f64 {
        self.standard.core
    }

    /// True if the exposure family was built
    pub fn has_exposure(&self) -> bool {
        self.exposure.is_some()
    }
}

/// Elementwise `weights * mass`, ignoring mass where there is no weight
pub(crate) fn mass_weighted(weights: ArrayView4<f64>, mass: ArrayView4<f64>) -> Array4<f64> {
    Zip::from(&weights)
        .and(&mass)
        .map_collect(|&w, &m| match w == 0.0 {
            true => 0.0,
            false => (w * m).or_zero(),
        })
}
