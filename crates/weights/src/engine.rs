//! Module for building weights and computing weighted pin statistics

// crate modules
use crate::dataset::{AggregationKind, Dataset};
use crate::error::{Error, Result};
use crate::geometry::CoreGeometry;
use crate::node::node_sums;
use crate::reduce::{divide, nanmax_axes, nanmin_axes, reduction_order, sum_axes, weighted};
use crate::weight_set::{mass_weighted, Reductions, WeightKind, WeightSet};

// ctools modules
use ctools_utils::FiniteExt;

// external crates
use itertools::izip;
use log::{debug, trace, warn};
use ndarray::{
    s, Array1, Array2, Array3, Array4, ArrayD, ArrayView4, ArrayViewMut4, Axis, CowArray, Ix1,
    Ix2, Ix3, Ix4, Zip,
};

/// Weighted spatial averaging over pin-resolved core data
///
/// The engine owns a [CoreGeometry] and the [WeightSet] built for it. Loading
/// always computes every weight tensor from scratch, and a
/// [reload()](WeightEngine::reload) replaces the whole state.
///
/// ## Pin weights
///
/// Pin weights are 1.0 wherever the reference array (typically pin powers) is
/// positive, scaled by the height of the axial level. For reduced symmetry
/// cores only the modelled part of the core carries weight, and pins sitting
/// exactly on a line of symmetry count as half a pin.
///
/// ## Statistics
///
/// Averages are weighted, maxima and minima are not. Every result has NaN and
/// infinite values replaced by zero, since a cell with no data is displayed
/// as zero.
///
/// ```rust
/// # use ctools_weights::{CoreGeometry, Dataset, Symmetry, WeightEngine};
/// # use ndarray::{array, Array4};
/// # use std::collections::BTreeMap;
/// let core = CoreGeometry {
///     axial_mesh: vec![0.0, 10.0, 20.0],
///     core_map: array![[1]],
///     symmetry: Symmetry::Full,
///     npinx: 2,
///     npiny: 2,
///     nass: 1,
///     group: BTreeMap::new(),
/// };
///
/// let powers = Array4::from_elem((2, 2, 2, 1), 1.0);
/// let engine = WeightEngine::load(core, powers.view()).unwrap();
///
/// // 2x2 pins in each of two 10 cm levels
/// assert_eq!(engine.weights().core(), 80.0);
/// assert_eq!(engine.weights().standard.assembly, array![[40.0], [40.0]]);
///
/// // average of a flat distribution is flat
/// let dataset = Dataset::new("pin_powers", powers.view());
/// assert_eq!(engine.calc_pin_core_avg(&dataset).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct WeightEngine {
    core: CoreGeometry,
    weights: WeightSet,
}

/// Node sums of a dataset with the node weights to divide them by
struct NodeTerms<'w> {
    sums: Array3<f64>,
    node: &'w Array3<f64>,
    radial_node: &'w Array2<f64>,
}

/// Factors and denominators to use for one dataset
struct Weighting<'w> {
    /// Multiplied into the data before summing
    factors: CowArray<'w, f64, Ix4>,
    /// Weight tensors to divide by
    reductions: &'w Reductions,
}

impl WeightEngine {
    /// Build weights from a reference pin tensor
    ///
    /// The reference is only used to detect which pins exist, i.e. have a
    /// positive value. NaN is treated as zero.
    pub fn load(core: CoreGeometry, reference: ArrayView4<f64>) -> Result<Self> {
        core.validate()?;
        check_shape("reference", reference.shape(), &core.pin_shape())?;
        let pin = presence_weights(&core, reference);
        Ok(Self::from_pin_weights(core, pin))
    }

    /// Build weights from precomputed pin weights
    ///
    /// The factors are used verbatim, with no thickness scaling or symmetry
    /// treatment.
    pub fn load_with_factors(core: CoreGeometry, pin_factors: Array4<f64>) -> Result<Self> {
        core.validate()?;
        check_shape("pin factors", pin_factors.shape(), &core.pin_shape())?;
        Ok(Self::from_pin_weights(core, pin_factors))
    }

    /// Replace the core and every weight tensor
    pub fn reload(&mut self, core: CoreGeometry, reference: ArrayView4<f64>) -> Result<()> {
        *self = Self::load(core, reference)?;
        Ok(())
    }

    fn from_pin_weights(core: CoreGeometry, pin: Array4<f64>) -> Self {
        let weights = WeightSet::build(&core, pin);
        debug!(
            "Loaded {} symmetry core weights: total {:.5e}, exposure weights {}, folded nodes {}",
            core.symmetry,
            weights.core(),
            weights.has_exposure(),
            !weights.fold.is_empty()
        );
        Self { core, weights }
    }

    /// The core the weights were built for
    pub fn core(&self) -> &CoreGeometry {
        &self.core
    }

    /// Every weight tensor
    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }
}

impl WeightEngine {
    /// Weighted average over the pin tensor `axes`
    ///
    /// Computes `sum(data * factors, axes) / weights`, where `weights` is the
    /// tensor for `kind`. Its shape must match the reduced shape.
    ///
    /// - factors are the pin weights unless the dataset names a valid factor
    ///   dataset, which replaces them in the numerator only
    /// - mass-weighted exposure datasets multiply factors by the initial mass
    ///   and use the exposure weights, if the core has a mass
    ///
    /// Cells without weight are ignored. An undefined value in a weighted
    /// cell leaves its lane without an average, reported as zero.
    pub fn calc_avg(
        &self,
        dataset: &Dataset,
        kind: WeightKind,
        axes: &[usize],
    ) -> Result<ArrayD<f64>> {
        self.check_dataset(dataset)?;
        let expected = self.reduced_shape(kind, axes)?;

        let weighting = self.weighting(dataset);
        let product = weighted(dataset.values, weighting.factors.view());
        let numerator = sum_axes(product.view().into_dyn(), axes)?;

        let denominator = weighting.reductions.get(kind).to_owned();

        check_shape(kind.name(), denominator.shape(), &expected)?;
        check_shape("reduced dataset", numerator.shape(), &expected)?;
        Ok(divide(&numerator, &denominator))
    }

    /// Unweighted maximum over the pin tensor `axes`, ignoring NaN
    ///
    /// `kind` is only checked for consistency with `axes`.
    pub fn calc_max(
        &self,
        dataset: &Dataset,
        kind: WeightKind,
        axes: &[usize],
    ) -> Result<ArrayD<f64>> {
        self.check_dataset(dataset)?;
        self.reduced_shape(kind, axes)?;
        Ok(nanmax_axes(dataset.values.into_dyn(), axes)?.or_zero())
    }

    /// Unweighted minimum over the pin tensor `axes`, ignoring NaN and zero
    ///
    /// Zero marks a cell with no data, so it only wins when nothing else is
    /// available. `kind` is only checked for consistency with `axes`.
    pub fn calc_min(
        &self,
        dataset: &Dataset,
        kind: WeightKind,
        axes: &[usize],
    ) -> Result<ArrayD<f64>> {
        self.check_dataset(dataset)?;
        self.reduced_shape(kind, axes)?;
        let masked = dataset
            .values
            .mapv(|v| if v == 0.0 { f64::NAN } else { v })
            .into_dyn();
        Ok(nanmin_axes(masked.view(), axes)?.or_zero())
    }

    /// Shape of `kind` weights, if they are what summing over `axes` gives
    fn reduced_shape(&self, kind: WeightKind, axes: &[usize]) -> Result<Vec<usize>> {
        if kind.axes().is_none() {
            return Err(Error::UnsupportedWeights(kind));
        }

        let pin_shape = self.core.pin_shape();
        let order = reduction_order(axes, pin_shape.len())?;
        let expected = pin_shape
            .iter()
            .enumerate()
            .filter(|(ax, _)| !order.contains(ax))
            .map(|(_, n)| *n)
            .collect::<Vec<usize>>();

        check_shape(kind.name(), self.weights.get(kind).shape(), &expected)?;
        Ok(expected)
    }

    fn check_dataset(&self, dataset: &Dataset) -> Result<()> {
        check_shape(dataset.name, dataset.values.shape(), &self.core.pin_shape())
    }

    /// Resolve factors for a dataset from its kind and factor attribute
    fn weighting(&self, dataset: &Dataset) -> Weighting<'_> {
        let exposure = match dataset.kind {
            AggregationKind::Standard => None,
            AggregationKind::MassWeightedExposure => {
                match (&self.weights.exposure, self.core.initial_mass()) {
                    (Some(reductions), Some(mass)) => Some((reductions, mass)),
                    _ => {
                        warn!(
                            "No initial mass on the core, {} averaged without mass weighting",
                            dataset.name
                        );
                        None
                    }
                }
            }
        };

        let custom = dataset
            .factor
            .and_then(|name| self.custom_factor(dataset.name, name));

        match (custom, exposure) {
            (None, None) => Weighting {
                factors: CowArray::from(self.weights.standard.pin.view()),
                reductions: &self.weights.standard,
            },
            (None, Some((reductions, _))) => Weighting {
                factors: CowArray::from(reductions.pin.view()),
                reductions,
            },
            (Some(factors), None) => Weighting {
                factors: CowArray::from(factors),
                reductions: &self.weights.standard,
            },
            (Some(factors), Some((reductions, mass))) => Weighting {
                factors: CowArray::from(mass_weighted(factors, mass)),
                reductions,
            },
        }
    }

    /// Alternate factor dataset, if it exists and is a pin tensor
    fn custom_factor(&self, dataset: &str, factor: &str) -> Option<ArrayView4<'_, f64>> {
        if !self.core.contains(factor) {
            warn!("Factor {factor} for {dataset} not found on the core, using pin weights");
            return None;
        }

        let factors = self.core.pin_dataset(factor);
        if factors.is_none() {
            warn!("Factor {factor} for {dataset} is not a pin tensor, using pin weights");
        }
        factors
    }
}

// Named reductions for each aggregation level
impl WeightEngine {
    /// Average per assembly and axial level, shape (nax, nass)
    pub fn calc_pin_assembly_avg(&self, dataset: &Dataset) -> Result<Array2<f64>> {
        Ok(self
            .calc_avg(dataset, WeightKind::Assembly, &[0, 1])?
            .into_dimensionality::<Ix2>()?)
    }

    /// Maximum per assembly and axial level, shape (nax, nass)
    pub fn calc_pin_assembly_max(&self, dataset: &Dataset) -> Result<Array2<f64>> {
        Ok(self
            .calc_max(dataset, WeightKind::Assembly, &[0, 1])?
            .into_dimensionality::<Ix2>()?)
    }

    /// Minimum per assembly and axial level, shape (nax, nass)
    pub fn calc_pin_assembly_min(&self, dataset: &Dataset) -> Result<Array2<f64>> {
        Ok(self
            .calc_min(dataset, WeightKind::Assembly, &[0, 1])?
            .into_dimensionality::<Ix2>()?)
    }

    /// Core average per axial level, shape (nax,)
    pub fn calc_pin_axial_avg(&self, dataset: &Dataset) -> Result<Array1<f64>> {
        Ok(self
            .calc_avg(dataset, WeightKind::Axial, &[0, 1, 3])?
            .into_dimensionality::<Ix1>()?)
    }

    /// Core maximum per axial level, shape (nax,)
    pub fn calc_pin_axial_max(&self, dataset: &Dataset) -> Result<Array1<f64>> {
        Ok(self
            .calc_max(dataset, WeightKind::Axial, &[0, 1, 3])?
            .into_dimensionality::<Ix1>()?)
    }

    /// Core minimum per axial level, shape (nax,)
    pub fn calc_pin_axial_min(&self, dataset: &Dataset) -> Result<Array1<f64>> {
        Ok(self
            .calc_min(dataset, WeightKind::Axial, &[0, 1, 3])?
            .into_dimensionality::<Ix1>()?)
    }

    /// Whole core average
    pub fn calc_pin_core_avg(&self, dataset: &Dataset) -> Result<f64> {
        Ok(scalar(self.calc_avg(dataset, WeightKind::Core, &[0, 1, 2, 3])?))
    }

    /// Whole core maximum
    pub fn calc_pin_core_max(&self, dataset: &Dataset) -> Result<f64> {
        Ok(scalar(self.calc_max(dataset, WeightKind::Core, &[0, 1, 2, 3])?))
    }

    /// Whole core minimum
    pub fn calc_pin_core_min(&self, dataset: &Dataset) -> Result<f64> {
        Ok(scalar(self.calc_min(dataset, WeightKind::Core, &[0, 1, 2, 3])?))
    }

    /// Average per assembly over all levels, shape (nass,)
    pub fn calc_pin_radial_assembly_avg(&self, dataset: &Dataset) -> Result<Array1<f64>> {
        Ok(self
            .calc_avg(dataset, WeightKind::RadialAssembly, &[0, 1, 2])?
            .into_dimensionality::<Ix1>()?)
    }

    /// Maximum per assembly over all levels, shape (nass,)
    pub fn calc_pin_radial_assembly_max(&self, dataset: &Dataset) -> Result<Array1<f64>> {
        Ok(self
            .calc_max(dataset, WeightKind::RadialAssembly, &[0, 1, 2])?
            .into_dimensionality::<Ix1>()?)
    }

    /// Minimum per assembly over all levels, shape (nass,)
    pub fn calc_pin_radial_assembly_min(&self, dataset: &Dataset) -> Result<Array1<f64>> {
        Ok(self
            .calc_min(dataset, WeightKind::RadialAssembly, &[0, 1, 2])?
            .into_dimensionality::<Ix1>()?)
    }

    /// Average per pin position over all levels, shape (npiny, npinx, nass)
    pub fn calc_pin_radial_avg(&self, dataset: &Dataset) -> Result<Array3<f64>> {
        Ok(self
            .calc_avg(dataset, WeightKind::Radial, &[2])?
            .into_dimensionality::<Ix3>()?)
    }

    /// Maximum per pin position over all levels, shape (npiny, npinx, nass)
    pub fn calc_pin_radial_max(&self, dataset: &Dataset) -> Result<Array3<f64>> {
        Ok(self
            .calc_max(dataset, WeightKind::Radial, &[2])?
            .into_dimensionality::<Ix3>()?)
    }

    /// Minimum per pin position over all levels, shape (npiny, npinx, nass)
    pub fn calc_pin_radial_min(&self, dataset: &Dataset) -> Result<Array3<f64>> {
        Ok(self
            .calc_min(dataset, WeightKind::Radial, &[2])?
            .into_dimensionality::<Ix3>()?)
    }
}

// Node (quadrant) averages
impl WeightEngine {
    /// Weighted node sums and the node weights to divide them by
    fn node_terms(&self, dataset: &Dataset) -> Result<NodeTerms<'_>> {
        self.check_dataset(dataset)?;
        let weighting = self.weighting(dataset);

        let product = weighted(dataset.values, weighting.factors.view());
        let mut sums = node_sums(product.view(), &self.weights.assembly_node);
        self.weights.fold.apply(&mut sums);

        let reductions = weighting.reductions;
        Ok(NodeTerms {
            sums,
            node: &reductions.node,
            radial_node: &reductions.radial_node,
        })
    }

    /// Average per node, axial level, and assembly, shape (4, nax, nass)
    ///
    /// Nodes are ordered NW, NE, SW, SE. Assemblies on a line of symmetry have
    /// their mirrored nodes folded into the modelled ones.
    pub fn calc_pin_node_avg(&self, dataset: &Dataset) -> Result<Array3<f64>> {
        let NodeTerms { sums, node, .. } = self.node_terms(dataset)?;
        Ok(Zip::from(&sums)
            .and(node)
            .map_collect(|&s, &w| (s / w).or_zero()))
    }

    /// Average per node and assembly over all levels, shape (4, nass)
    ///
    /// Node averages are weighted by the node weights of each level, summed
    /// over the axial levels, then divided by the radial node weights.
    pub fn calc_pin_radial_node_avg(&self, dataset: &Dataset) -> Result<Array2<f64>> {
        let NodeTerms {
            sums,
            node,
            radial_node,
        } = self.node_terms(dataset)?;

        let node_avg = Zip::from(&sums)
            .and(node)
            .map_collect(|&s, &w| (s / w).or_zero());
        let radial_sums = (&node_avg * node).sum_axis(Axis(1));

        Ok(Zip::from(&radial_sums)
            .and(radial_node)
            .map_collect(|&s, &w| (s / w).or_zero()))
    }
}

// Core-wide metrics
impl WeightEngine {
    /// Axial offset of a pin power distribution, in percent
    ///
    /// The core is split at the midpoint of the axial mesh. Levels entirely
    /// below or above count fully, and the level straddling the midpoint is
    /// split by the fraction of its height on each side.
    ///
    /// ```text
    ///     AO = (top - bottom) / (top + bottom) * 100
    /// ```
    ///
    /// A single level has no offset and gives exactly 0.0.
    pub fn calc_axial_offset(&self, pin_powers: &Dataset) -> Result<f64> {
        let mesh = &self.core.axial_mesh;
        if mesh.len() <= 2 {
            return Ok(0.0);
        }
        self.check_dataset(pin_powers)?;

        let product = weighted(pin_powers.values, self.weights.pin());
        let level_power = product.sum_axis(Axis(3)).sum_axis(Axis(1)).sum_axis(Axis(0));

        let mid = 0.5 * (mesh[0] + mesh[mesh.len() - 1]);
        let (mut bottom, mut top) = (0.0, 0.0);

        for (lower, upper, power) in izip!(mesh.iter(), mesh[1..].iter(), level_power.iter()) {
            let below = ((mid - lower) / (upper - lower)).clamp(0.0, 1.0);
            bottom += power * below;
            top += power * (1.0 - below);
        }

        trace!("Axial power split at {mid}: bottom {bottom:.5e}, top {top:.5e}");
        Ok(((top - bottom) / (top + bottom) * 100.0).or_zero())
    }

    /// Mass-weighted average exposure of the whole core
    ///
    /// Returns 0.0 if the core has no initial mass.
    pub fn calc_core_exposure(&self, pin_exposures: &Dataset) -> Result<f64> {
        self.check_dataset(pin_exposures)?;

        let Some(exposure) = &self.weights.exposure else {
            warn!("No initial mass on the core, core exposure unavailable");
            return Ok(0.0);
        };

        let total = weighted(pin_exposures.values, exposure.pin.view()).sum();
        Ok((total / exposure.core).or_zero())
    }
}

/// Pin weights from the positive cells of a reference tensor
fn presence_weights(core: &CoreGeometry, reference: ArrayView4<f64>) -> Array4<f64> {
    let mut pin = Array4::<f64>::zeros(reference.raw_dim());

    match core.symmetry.is_reduced() {
        false => mark_present(pin.view_mut(), reference),
        true => {
            let (npiny, npinx) = (core.npiny, core.npinx);
            for p in core.modelled_assemblies() {
                let pxlo = if p.on_vertical_line { npinx / 2 } else { 0 };
                let pylo = if p.on_horizontal_line { npiny / 2 } else { 0 };
                mark_present(
                    pin.slice_mut(s![pylo.., pxlo.., .., p.index..=p.index]),
                    reference.slice(s![pylo.., pxlo.., .., p.index..=p.index]),
                );

                // pins exactly on the line are shared with the mirror image
                if p.on_vertical_line && npinx % 2 == 1 {
                    pin.slice_mut(s![.., npinx / 2, .., p.index])
                        .mapv_inplace(|w| w * 0.5);
                }
                if p.on_horizontal_line && npiny % 2 == 1 {
                    pin.slice_mut(s![npiny / 2, .., .., p.index])
                        .mapv_inplace(|w| w * 0.5);
                }
            }
        }
    }

    for (k, height) in core.level_heights().into_iter().enumerate() {
        pin.slice_mut(s![.., .., k, ..]).mapv_inplace(|w| w * height);
    }

    pin
}

/// Set 1.0 wherever the reference is positive
fn mark_present(mut pin: ArrayViewMut4<f64>, reference: ArrayView4<f64>) {
    Zip::from(&mut pin).and(&reference).for_each(|w, &r| {
        if r > 0.0 {
            *w = 1.0;
        }
    });
}

/// Value of a fully reduced array
fn scalar(reduced: ArrayD<f64>) -> f64 {
    reduced.iter().next().copied().unwrap_or(0.0)
}

fn check_shape(name: &str, found: &[usize], expected: &[usize]) -> Result<()> {
    if found != expected {
        return Err(Error::ShapeMismatch {
            name: name.to_string(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        });
    }
    Ok(())
}
