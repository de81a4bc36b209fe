use super::*;
use crate::pipeline::node::ProcessingNode;
use crate::transforms::test_support::{approx, flat_frames, output_pixel};

#[test]
fn zero_factors_leave_frames_unchanged() {
    let mut p = flat_frames(4, 4, &[[0.5; 4]]);
    p.add_node(ProcessingNode::from_transform(FixBorders::default()))
        .unwrap();
    assert_eq!(output_pixel(&mut p, 0), [0.5; 4]);
}

#[test]
fn left_band_fades_toward_the_edge_colour() {
    let mut p = flat_frames(4, 1, &[[1.0; 4]]);
    p.add_node(ProcessingNode::from_transform(FixBorders {
        factors: [0.5, 0.0, 0.0, 0.0],
        color: [0.0; 3],
        alpha: 0.0,
        exponent: 1.0,
    }))
    .unwrap();
    assert_eq!(p.labels(), ["Fix Borders (L0.5 R0 T0 B0)"]);
    // The first pixel centre is a quarter of the way into the band.
    let px = output_pixel(&mut p, 0);
    assert!(px.iter().all(|c| approx(*c, 0.25)), "{px:?}");
}

#[test]
fn parameters_are_validated() {
    let wide = FixBorders {
        factors: [1.5, 0.0, 0.0, 0.0],
        ..FixBorders::default()
    };
    assert!(wide.validate().is_err());
    let flat = FixBorders {
        exponent: 8.0,
        ..FixBorders::default()
    };
    assert!(flat.validate().is_err());
    assert!(FixBorders::default().validate().is_ok());
}
