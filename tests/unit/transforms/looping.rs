use super::*;
use crate::pipeline::node::ProcessingNode;
use crate::transforms::test_support::{approx, output_pixel, red_frames, track_reads};

/// Red of input `i` is `i² / 100`, so blends of different pairs stay distinguishable.
fn squares(n: usize) -> Vec<f32> {
    (0..n).map(|i| (i * i) as f32 / 100.0).collect()
}

fn linear_loop(length: u32, sync_frame: u32) -> Looping {
    Looping {
        length,
        sync_frame,
        curve: Curve::ramp((0.0, 0.0), (1.0, 1.0)),
    }
}

#[test]
fn shape_and_label() {
    let l = Looping::default();
    assert_eq!(l.output_length(0), 0);
    assert_eq!(l.output_length(3), 25);
    assert_eq!(l.label(), "Looping (25 frame(s), Sync : 26)");
}

#[test]
fn mixes_frames_after_sync_with_frames_before_it() {
    let mut p = red_frames(&squares(10));
    let reads = track_reads(&mut p);
    p.add_node(ProcessingNode::from_transform(linear_loop(4, 5)))
        .unwrap();
    assert_eq!(p.output_sequence().len(), 4);

    // Frame 1 mixes input 6 with input 5 - (4 - 1) = 2 at a quarter.
    let red = output_pixel(&mut p, 1)[0];
    assert_eq!(*reads.borrow(), [6, 2]);
    assert!(approx(red, 0.36 * 0.75 + 0.04 * 0.25), "{red}");

    // Frame 0 is the sync frame untouched.
    reads.borrow_mut().clear();
    assert!(approx(output_pixel(&mut p, 0)[0], 0.25));
    assert_eq!(*reads.borrow(), [5, 1]);
}

#[test]
fn sync_near_the_start_clamps_backward_reads() {
    let mut p = red_frames(&squares(10));
    let reads = track_reads(&mut p);
    p.add_node(ProcessingNode::from_transform(linear_loop(4, 0)))
        .unwrap();

    assert!(approx(output_pixel(&mut p, 0)[0], 0.0));
    assert_eq!(*reads.borrow(), [0]);

    // Input 0 - (4 - 2) clamps to 0.
    let red = output_pixel(&mut p, 2)[0];
    assert_eq!(*reads.borrow(), [0, 2]);
    assert!(approx(red, 0.04 * 0.5), "{red}");
}

#[test]
fn sync_near_the_end_clamps_forward_reads() {
    let mut p = red_frames(&squares(10));
    let reads = track_reads(&mut p);
    p.add_node(ProcessingNode::from_transform(linear_loop(4, 9)))
        .unwrap();

    // Input 9 + 1 clamps to 9; the earlier frame is 9 - 3.
    let red = output_pixel(&mut p, 1)[0];
    assert_eq!(*reads.borrow(), [9, 6]);
    assert!(approx(red, 0.81 * 0.75 + 0.36 * 0.25), "{red}");

    let red = output_pixel(&mut p, 3)[0];
    assert_eq!(*reads.borrow(), [9, 6, 8]);
    assert!(approx(red, 0.81 * 0.25 + 0.64 * 0.75), "{red}");
}

#[test]
fn mix_factor_is_clamped() {
    let mut p = red_frames(&squares(10));
    p.add_node(ProcessingNode::from_transform(Looping {
        curve: Curve::ramp((0.0, -1.0), (1.0, 2.0)),
        ..linear_loop(4, 5)
    }))
    .unwrap();

    // curve(0) = -1 keeps input 5 only.
    assert!(approx(output_pixel(&mut p, 0)[0], 0.25));
    // curve(0.75) = 1.25 keeps input 5 - 1 only.
    assert!(approx(output_pixel(&mut p, 3)[0], 0.16));
}

#[test]
fn validation_rejects_zero_length() {
    assert!(linear_loop(0, 0).validate().is_err());
    assert!(Looping::default().validate().is_ok());
}
