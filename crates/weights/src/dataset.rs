//! Module for datasets handed to the weight engine

// external crates
use ndarray::ArrayView4;

/// How a dataset should be weighted when averaged
///
/// Exposure (burnup) datasets are averaged with mass weighting rather than
/// plain volume weighting. The data model has historically flagged these by
/// a `_exposures` name suffix, which [AggregationKind::from_name] preserves.
///
/// ```rust
/// # use ctools_weights::AggregationKind;
/// assert_eq!(AggregationKind::from_name("pin_exposures"), AggregationKind::MassWeightedExposure);
/// assert_eq!(AggregationKind::from_name("pin_powers"), AggregationKind::Standard);
/// assert_eq!(AggregationKind::from_name("exposures_pin"), AggregationKind::Standard);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AggregationKind {
    /// Weighted by pin volume/presence only
    #[default]
    Standard,
    /// Weighted by pin volume/presence and initial heavy metal mass
    MassWeightedExposure,
}

impl AggregationKind {
    /// Resolve the kind from the dataset naming convention
    pub fn from_name(name: &str) -> Self {
        if name.ends_with("_exposures") {
            AggregationKind::MassWeightedExposure
        } else {
            AggregationKind::Standard
        }
    }
}

/// A pin tensor to be reduced, with its averaging attributes
///
/// Borrows the values, which must have the core's
/// [pin_shape()](crate::CoreGeometry::pin_shape).
///
/// - `kind` defaults from the dataset name, see [AggregationKind]
/// - `factor` optionally names another dataset on the core group to use in
///   place of the pin weights when averaging
///
/// ```rust
/// # use ctools_weights::{AggregationKind, Dataset};
/// # use ndarray::Array4;
/// let values = Array4::<f64>::zeros((17, 17, 49, 56));
/// let dataset = Dataset::new("pin_exposures", values.view());
/// assert_eq!(dataset.kind, AggregationKind::MassWeightedExposure);
///
/// // kinds can be set explicitly by the data model
/// let dataset = dataset.with_kind(AggregationKind::Standard).with_factor("pin_volumes");
/// assert_eq!(dataset.factor, Some("pin_volumes"));
/// ```
#[derive(Debug, Clone)]
pub struct Dataset<'a> {
    /// Dataset name, used for logging and the default kind
    pub name: &'a str,
    /// Pin tensor values
    pub values: ArrayView4<'a, f64>,
    /// Weighting applied by averages
    pub kind: AggregationKind,
    /// Name of an alternate factor dataset on the core group
    pub factor: Option<&'a str>,
}

impl<'a> Dataset<'a> {
    /// New dataset with the kind inferred from its name
    pub fn new(name: &'a str, values: ArrayView4<'a, f64>) -> Self {
        Self {
            name,
            values,
            kind: AggregationKind::from_name(name),
            factor: None,
        }
    }

    /// Override the aggregation kind
    pub fn with_kind(mut self, kind: AggregationKind) -> Self {
        self.kind = kind;
        self
    }

    /// Average with an alternate factor dataset from the core group
    pub fn with_factor(mut self, factor: &'a str) -> Self {
        self.factor = Some(factor);
        self
    }
}
