use super::*;
use crate::pipeline::node::ProcessingNode;
use crate::transforms::test_support::{approx, flat_frames, output_pixel, track_reads};

#[test]
fn resize_reads_the_same_index_at_the_new_extent() {
    let mut p = flat_frames(4, 4, &[[0.5, 0.25, 0.0, 1.0]; 3]);
    let reads = track_reads(&mut p);
    p.add_node(ProcessingNode::from_transform(Resize::new(2, 3).unwrap()))
        .unwrap();

    let frame = p.request_output_frame(1).unwrap();
    assert_eq!(frame.extent, Some(Extent::new(2, 3)));
    assert_eq!(*reads.borrow(), [1]);
    let px = output_pixel(&mut p, 1);
    assert!(approx(px[0], 0.5) && approx(px[1], 0.25));
}

#[test]
fn target_must_fit_the_limits() {
    assert!(Resize::new(0, 4).is_err());
    assert!(Resize::new(4, 8193).is_err());
}
