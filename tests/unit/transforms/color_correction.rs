use super::*;
use crate::pipeline::node::ProcessingNode;
use crate::transforms::test_support::{approx, flat_frames, output_pixel};

const PIXEL: [f32; 4] = [0.8, 0.4, 0.2, 0.5];

#[test]
fn defaults_leave_frames_unchanged() {
    let mut p = flat_frames(2, 2, &[PIXEL]);
    p.add_node(ProcessingNode::from_transform(ColorCorrection::default()))
        .unwrap();
    let px = output_pixel(&mut p, 0);
    assert!(px.iter().zip(PIXEL).all(|(a, b)| approx(*a, b)), "{px:?}");
}

#[test]
fn saturation_and_alpha_curve_apply() {
    let mut p = flat_frames(2, 2, &[PIXEL]);
    p.add_node(ProcessingNode::from_transform(ColorCorrection {
        saturation: 0.0,
        alpha_curve: Curve::ramp((0.0, 1.0), (1.0, 1.0)),
        ..ColorCorrection::default()
    }))
    .unwrap();
    let px = output_pixel(&mut p, 0);
    let luma = 0.2126 * 0.8 + 0.7152 * 0.4 + 0.0722 * 0.2;
    assert!(px[..3].iter().all(|c| approx(*c, luma)), "{px:?}");
    assert!(approx(px[3], 1.0));
}

#[test]
fn factors_are_validated() {
    let too_bright = ColorCorrection {
        brightness: 2.5,
        ..ColorCorrection::default()
    };
    assert!(too_bright.validate().is_err());
    assert!(ColorCorrection::default().validate().is_ok());
}
