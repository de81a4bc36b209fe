use super::*;
use crate::foundation::core::Extent;
use crate::pipeline::node::ProcessingNode;
use crate::transforms::test_support::{flat_frames, output_pixel};

#[test]
fn crop_removes_borders_in_input_pixels() {
    let mut src = crate::assets::source::MemorySource::new();
    let mut img = image::Rgba32FImage::new(4, 1);
    for (x, _, px) in img.enumerate_pixels_mut() {
        *px = image::Rgba([x as f32 / 10.0, 0.0, 0.0, 1.0]);
    }
    src.insert("row", image::DynamicImage::ImageRgba32F(img));
    let mut p = crate::Pipeline::new(Box::new(crate::CpuBackend::new()), Box::new(src));
    p.set_input_frames(["row"]).unwrap();

    p.add_node(ProcessingNode::from_transform(Crop {
        left: 2,
        right: 1,
        ..Crop::default()
    }))
    .unwrap();
    assert_eq!(p.output_sequence().extent(), Some(Extent::new(1, 1)));
    assert_eq!(output_pixel(&mut p, 0), [0.2, 0.0, 0.0, 1.0]);
}

#[test]
fn oversized_borders_leave_one_clean_column() {
    let mut p = flat_frames(8, 8, &[[0.5; 4]]);
    p.add_node(ProcessingNode::from_transform(Crop {
        left: u32::MAX,
        right: 1,
        ..Crop::default()
    }))
    .unwrap();
    assert_eq!(p.output_sequence().extent(), Some(Extent::new(1, 8)));

    let frame = p.request_output_frame(0).unwrap();
    assert!(frame.is_ready());
    assert_eq!(frame.extent, Some(Extent::new(1, 8)));
}
