//! Integration tests for resampling between axial meshes

use ctools_axial::{combine_cycles, resolve_axial_dataset, resolve_axial_mesh, InterpolationMode};
use ndarray::{array, s, Array4, ArrayD};
use rstest::{fixture, rstest};

/// Pin tensor with levels along axis 2, valued by level index
#[fixture]
fn pin_powers() -> ArrayD<f64> {
    Array4::from_shape_fn((2, 2, 4, 3), |(i, j, k, l)| {
        1.0 + k as f64 + 0.1 * (i + j + l) as f64
    })
    .into_dyn()
}

#[fixture]
fn uneven_mesh() -> Vec<f64> {
    vec![0.0, 11.0, 20.0, 35.0, 40.0]
}

#[rstest]
#[case::nearest(InterpolationMode::Nearest)]
#[case::linear(InterpolationMode::Linear)]
fn identical_meshes_are_identity(
    pin_powers: ArrayD<f64>,
    uneven_mesh: Vec<f64>,
    #[case] mode: InterpolationMode,
) {
    let resolved =
        resolve_axial_dataset(&uneven_mesh, pin_powers.view(), 2, &uneven_mesh, mode).unwrap();

    assert_eq!(resolved.shape(), pin_powers.shape());
    for (a, b) in resolved.iter().zip(pin_powers.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[rstest]
#[case::nearest(InterpolationMode::Nearest)]
#[case::linear(InterpolationMode::Linear)]
fn extrapolates_rather_than_clamps(#[case] mode: InterpolationMode) {
    // source centres at 15 and 25
    let from_mesh = [10.0, 20.0, 30.0];
    let to_mesh = [0.0, 10.0, 20.0, 30.0, 40.0];
    let data = array![[2.0, 4.0], [1.0, 1.0]].into_dyn();

    let resolved = resolve_axial_dataset(&to_mesh, data.view(), 1, &from_mesh, mode).unwrap();

    // below: (5 - 15) / 10 * (4 - 2) + 2, above: (35 - 15) / 10 * (4 - 2) + 2
    assert_eq!(resolved.slice(s![0, ..]), array![0.0, 2.0, 4.0, 6.0]);
    assert_eq!(resolved.slice(s![1, ..]), array![1.0, 1.0, 1.0, 1.0]);
}

#[rstest]
fn refines_onto_finer_mesh(pin_powers: ArrayD<f64>) {
    let from_mesh = [0.0, 10.0, 20.0, 30.0, 40.0];
    let to_mesh = (0..=8).map(|i| 5.0 * i as f64).collect::<Vec<f64>>();

    let resolved = resolve_axial_dataset(
        &to_mesh,
        pin_powers.view(),
        2,
        &from_mesh,
        InterpolationMode::Nearest,
    )
    .unwrap();
    assert_eq!(resolved.shape(), &[2, 2, 8, 3]);

    // each source level covers two interior target levels
    for k in 1..7 {
        let expected = pin_powers.slice(s![.., .., k / 2, ..]);
        assert_eq!(resolved.slice(s![.., .., k, ..]), expected);
    }
}

#[rstest]
#[case(vec![0.0, 20.0], vec![0.0, 5.0, 10.0, 15.0, 20.0], vec![0.0, 10.0, 20.0])]
#[case(vec![0.0, 5.0, 10.0, 15.0, 20.0], vec![0.0, 10.0, 20.0], vec![0.0, 20.0])]
#[case(vec![0.0, 10.0, 20.0], vec![0.0, 20.0], vec![0.0, 5.0, 10.0, 15.0, 20.0])]
fn most_boundaries_wins_in_any_order(
    #[case] a: Vec<f64>,
    #[case] b: Vec<f64>,
    #[case] c: Vec<f64>,
) {
    let mesh = resolve_axial_mesh([a.as_slice(), b.as_slice(), c.as_slice()]).unwrap();
    assert_eq!(mesh, [0.0, 5.0, 10.0, 15.0, 20.0].as_slice());
}

#[rstest]
fn cycles_share_the_finest_mesh(pin_powers: ArrayD<f64>) {
    let coarse_mesh = [0.0, 20.0, 40.0];
    let fine_mesh = [0.0, 10.0, 20.0, 30.0, 40.0];
    let coarse = Array4::from_elem((2, 2, 2, 3), 1.0).into_dyn();

    let cycles = [
        (&coarse_mesh[..], coarse.view()),
        (&fine_mesh[..], pin_powers.view()),
    ];
    let (mesh, stacked) = combine_cycles(&cycles, 2, 3, InterpolationMode::Nearest).unwrap();

    assert_eq!(mesh, fine_mesh.to_vec());
    assert_eq!(stacked.shape(), &[2, 2, 4, 6]);
    assert_eq!(stacked.slice(s![.., .., .., 3..]).into_dyn(), pin_powers);
    assert!(stacked.slice(s![.., .., 1..3, ..3]).iter().all(|v| *v == 1.0));
}

#[rstest]
fn modes_from_configuration() {
    let mode: InterpolationMode = serde_json::from_str("\"linear\"").unwrap();
    assert_eq!(mode, InterpolationMode::Linear);
    assert_eq!(
        serde_json::to_string(&InterpolationMode::Nearest).unwrap(),
        "\"nearest\""
    );
    assert!(serde_json::from_str::<InterpolationMode>("\"cubic\"").is_err());
}
