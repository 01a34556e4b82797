//! Quadrant (node) subdivision of assemblies

// crate modules
use crate::geometry::CoreGeometry;

// external crates
use ndarray::{s, Array3, ArrayView4, ArrayViewMut2, Axis, Zip};

/// Number of nodes per assembly, ordered NW, NE, SW, SE
pub const NODES: usize = 4;

/// Share of each pin row/column in the low and high halves of an assembly
///
/// For odd pin counts the centre row/column is split evenly between halves.
fn halves(npin: usize) -> (Vec<f64>, Vec<f64>) {
    let mid = npin / 2;
    let odd = npin % 2 == 1;
    (0..npin)
        .map(|p| match (p.cmp(&mid), odd) {
            (std::cmp::Ordering::Less, _) => (1.0, 0.0),
            (std::cmp::Ordering::Equal, true) => (0.5, 0.5),
            _ => (0.0, 1.0),
        })
        .unzip()
}

/// Quadrant membership of every pin position, shape `(4, npiny, npinx)`
///
/// Each pin position is split across the NW, NE, SW, SE nodes such that its
/// four entries sum to 1. With odd pin counts the centre row and column are
/// shared at 0.5, so the very centre pin carries 0.25 in every node.
///
/// ```text
///     npin = 3, NW node    npin = 3, SE node
///     1.0  0.5  0.0        0.0  0.0  0.0
///     0.5  0.25 0.0        0.0  0.25 0.5
///     0.0  0.0  0.0        0.0  0.5  1.0
/// ```
pub(crate) fn assembly_node_weights(npiny: usize, npinx: usize) -> Array3<f64> {
    let (north, south) = halves(npiny);
    let (west, east) = halves(npinx);

    let quadrants = [(&north, &west), (&north, &east), (&south, &west), (&south, &east)];

    let mut masks = Array3::zeros((NODES, npiny, npinx));
    for (node, (rows, cols)) in quadrants.into_iter().enumerate() {
        for ((row, col), mask) in masks.index_axis_mut(Axis(0), node).indexed_iter_mut() {
            *mask = rows[row] * cols[col];
        }
    }
    masks
}

/// Sum of a pin tensor over each node, shape `(4, nax, nass)`
///
/// Pins outside a node never reach its sum, even when undefined.
pub(crate) fn node_sums(data: ArrayView4<f64>, masks: &Array3<f64>) -> Array3<f64> {
    let (_, _, nax, nass) = data.dim();
    let mut sums = Array3::zeros((NODES, nax, nass));

    for k in 0..nax {
        for l in 0..nass {
            let slab = data.slice(s![.., .., k, l]);
            for (node, mask) in masks.outer_iter().enumerate() {
                sums[[node, k, l]] = Zip::from(&slab)
                    .and(&mask)
                    .fold(0.0, |acc, &d, &m| match m == 0.0 {
                        true => acc,
                        false => acc + d * m,
                    });
            }
        }
    }
    sums
}

/// Folding of mirrored nodes for assemblies on a line of symmetry
///
/// A reduced symmetry model only holds half of an assembly sitting on a line
/// of symmetry (a quarter for the centre assembly), so it has two distinct
/// nodes rather than four. Mirrored nodes are folded into their modelled
/// counterparts and zeroed:
///
/// - vertical line: NW into NE, SW into SE
/// - horizontal line: NW into SW, NE into SE
///
/// The centre assembly is folded both ways and ends up entirely in SE. The
/// same fold applies to node weights and to node sums of a dataset, so that
/// the two always divide consistently.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct QuadrantFold {
    /// (assembly index, fold west to east, fold north to south)
    assemblies: Vec<(usize, bool, bool)>,
}

impl QuadrantFold {
    /// Find the assemblies that need folding for this core
    ///
    /// Only reduced symmetry cores with an odd number of assemblies and an
    /// odd number of pins along an axis are affected.
    pub(crate) fn new(core: &CoreGeometry) -> Self {
        if !core.symmetry.is_reduced() {
            return Self::default();
        }

        let odd_pins_x = core.npinx % 2 == 1;
        let odd_pins_y = core.npiny % 2 == 1;

        let assemblies = core
            .modelled_assemblies()
            .into_iter()
            .map(|p| {
                (
                    p.index,
                    p.on_vertical_line && odd_pins_x,
                    p.on_horizontal_line && odd_pins_y,
                )
            })
            .filter(|(_, vertical, horizontal)| *vertical || *horizontal)
            .collect();

        Self { assemblies }
    }

    /// Apply the fold in place to a `(4, nax, nass)` node array
    pub(crate) fn apply(&self, nodes: &mut Array3<f64>) {
        for &(l, vertical, horizontal) in &self.assemblies {
            let mut lane = nodes.slice_mut(s![.., .., l]);
            if vertical {
                fold(&mut lane, 0, 1);
                fold(&mut lane, 2, 3);
            }
            if horizontal {
                fold(&mut lane, 0, 2);
                fold(&mut lane, 1, 3);
            }
        }
    }

    /// True if no assembly needs folding
    pub(crate) fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }
}

/// Move node `from` into node `into` across all axial levels
fn fold(lane: &mut ArrayViewMut2<f64>, from: usize, into: usize) {
    let moved = lane.row(from).to_owned();
    let mut target = lane.row_mut(into);
    target += &moved;
    lane.row_mut(from).fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetry::Symmetry;
    use ndarray::{array, Array2, Array4};
    use std::collections::BTreeMap;

    #[test]
    fn odd_masks_share_centre() {
        let masks = assembly_node_weights(3, 3);
        assert_eq!(
            masks.index_axis(Axis(0), 0),
            array![[1.0, 0.5, 0.0], [0.5, 0.25, 0.0], [0.0, 0.0, 0.0]]
        );
        assert_eq!(
            masks.index_axis(Axis(0), 3),
            array![[0.0, 0.0, 0.0], [0.0, 0.25, 0.5], [0.0, 0.5, 1.0]]
        );
        // every pin is fully accounted for
        assert_eq!(masks.sum_axis(Axis(0)), Array2::<f64>::ones((3, 3)));
    }

    #[test]
    fn even_masks_are_exclusive() {
        let masks = assembly_node_weights(2, 4);
        assert_eq!(
            masks.index_axis(Axis(0), 1),
            array![[0.0, 0.0, 1.0, 1.0], [0.0, 0.0, 0.0, 0.0]]
        );
        assert_eq!(masks.sum(), 8.0);
    }

    #[test]
    fn node_sums_split_assembly() {
        let masks = assembly_node_weights(2, 2);
        let data = Array4::from_shape_vec((2, 2, 1, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let sums = node_sums(data.view(), &masks);
        assert_eq!(sums.into_raw_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn undefined_pins_stay_in_their_node() {
        let masks = assembly_node_weights(2, 2);
        let data =
            Array4::from_shape_vec((2, 2, 1, 1), vec![f64::NAN, 2.0, 3.0, 4.0]).unwrap();
        let sums = node_sums(data.view(), &masks);
        assert!(sums[[0, 0, 0]].is_nan());
        assert_eq!(sums.slice(s![1.., 0, 0]), array![2.0, 3.0, 4.0]);
    }

    #[test]
    fn fold_moves_mirrored_nodes() {
        let core = CoreGeometry {
            axial_mesh: vec![0.0, 1.0],
            core_map: array![[4, 3, 4], [2, 1, 2], [4, 3, 4]],
            symmetry: Symmetry::Quarter,
            npinx: 3,
            npiny: 3,
            nass: 4,
            group: BTreeMap::new(),
        };
        let fold = QuadrantFold::new(&core);
        assert!(!fold.is_empty());

        let mut nodes = Array3::from_elem((NODES, 1, 4), 1.0);
        fold.apply(&mut nodes);

        // centre assembly collapses into SE
        assert_eq!(nodes.slice(s![.., 0, 0]), array![0.0, 0.0, 0.0, 4.0]);
        // east neighbour, horizontal line: north folded south
        assert_eq!(nodes.slice(s![.., 0, 1]), array![0.0, 0.0, 2.0, 2.0]);
        // south neighbour, vertical line: west folded east
        assert_eq!(nodes.slice(s![.., 0, 2]), array![0.0, 2.0, 0.0, 2.0]);
        // corner untouched
        assert_eq!(nodes.slice(s![.., 0, 3]), array![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn no_fold_for_full_or_even_cores() {
        let core = CoreGeometry {
            axial_mesh: vec![0.0, 1.0],
            core_map: array![[1]],
            symmetry: Symmetry::Full,
            npinx: 3,
            npiny: 3,
            nass: 1,
            group: BTreeMap::new(),
        };
        assert!(QuadrantFold::new(&core).is_empty());

        let core = CoreGeometry {
            symmetry: Symmetry::Quarter,
            npinx: 2,
            npiny: 2,
            ..core
        };
        assert!(QuadrantFold::new(&core).is_empty());
    }
}
