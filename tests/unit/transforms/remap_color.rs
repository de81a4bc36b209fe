use super::*;
use crate::pipeline::node::ProcessingNode;
use crate::transforms::test_support::{approx, flat_frames, output_pixel};

#[test]
fn default_maps_luminance_to_grey_ramp() {
    let mut p = flat_frames(2, 2, &[[1.0; 4], [0.0, 0.0, 0.0, 1.0]]);
    p.add_node(ProcessingNode::from_transform(RemapColor::default()))
        .unwrap();
    let white = output_pixel(&mut p, 0);
    assert!(white.iter().all(|c| approx(*c, 1.0)), "{white:?}");
    assert_eq!(output_pixel(&mut p, 1), [0.0; 4]);
}

#[test]
fn source_channel_selects_the_gradient_position() {
    let mut p = flat_frames(2, 2, &[[0.5, 1.0, 0.0, 1.0]]);
    let remap = RemapColor {
        source: RemapSource::Red,
        ..RemapColor::default()
    };
    assert_eq!(remap.label(), "Remap Color (Red)");
    p.add_node(ProcessingNode::from_transform(remap)).unwrap();
    let px = output_pixel(&mut p, 0);
    assert!(px.iter().all(|c| approx(*c, 0.5)), "{px:?}");
}
