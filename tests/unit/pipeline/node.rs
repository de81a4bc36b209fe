use super::*;
use crate::assets::source::MemorySource;
use crate::backend::cpu::CpuBackend;
use crate::transforms::decimate::Decimate;
use crate::transforms::resize::Resize;

fn sources(n: usize) -> MemorySource {
    let mut src = MemorySource::new();
    for i in 0..n {
        src.insert(format!("f{i}"), image::DynamicImage::new_rgba8(4, 2));
    }
    src
}

fn loaded_input(n: usize, env: &mut ExecEnv<'_>) -> FrameSequence {
    let mut input = FrameSequence::from_sources((0..n).map(|i| format!("f{i}")));
    for i in 0..n {
        input.request_source_frame(i, env).unwrap();
    }
    input
}

#[test]
fn label_marks_disabled_nodes() {
    let node = ProcessingNode::from_transform(Decimate::new(2).unwrap());
    assert_eq!(node.label(), "Decimate (1 of 2)");
    let node = node.with_enabled(false);
    assert_eq!(node.label(), "Decimate (1 of 2) (Disabled)");
}

#[test]
fn ids_are_unique() {
    let a = ProcessingNode::from_transform(Decimate::default());
    let b = ProcessingNode::from_transform(Decimate::default());
    assert_ne!(a.id(), b.id());
    assert_eq!(a.owned_output().owner(), Some(a.id()));
}

#[test]
fn invalidate_recomputes_shape_and_clamps_extent() {
    let mut backend = CpuBackend::new();
    let mut node = ProcessingNode::from_transform(Resize {
        width: 10_000,
        height: 0,
    });
    let shape = SequenceShape {
        len: 6,
        extent: Some(Extent::new(4, 2)),
        grid: Grid::new(2, 1),
    };
    node.invalidate(shape, &mut backend);

    assert_eq!(node.output_extent(), Some(Extent::new(8192, 1)));
    assert_eq!(node.output_grid(), Grid::new(2, 1));
    assert_eq!(node.owned_output().len(), 6);
    assert_eq!(node.owned_output().dirty_count(), 6);

    node.invalidate(
        SequenceShape {
            extent: None,
            ..shape
        },
        &mut backend,
    );
    assert_eq!(node.output_extent(), None);
}

#[test]
fn process_one_frame_scans_after_seed_and_wraps() {
    let mut backend = CpuBackend::new();
    let src = sources(4);
    let mut env = ExecEnv {
        backend: &mut backend,
        sources: &src,
        preview: None,
    };
    let mut input = loaded_input(4, &mut env);
    let mut node = ProcessingNode::from_transform(Decimate::new(1).unwrap());
    node.invalidate(input.shape(), &mut *env.backend);

    let mut up = Chain::new(&mut input, &mut []);
    assert_eq!(node.request_process_one_frame(1, &mut up, &mut env), Some(2));
    assert_eq!(node.request_process_one_frame(2, &mut up, &mut env), Some(3));
    assert_eq!(node.request_process_one_frame(3, &mut up, &mut env), Some(0));
    // Only the seed itself is left; it is tried last.
    assert_eq!(node.request_process_one_frame(1, &mut up, &mut env), Some(1));
    assert_eq!(node.request_process_one_frame(1, &mut up, &mut env), None);
    assert_eq!(node.stats().processed, 4);
}

#[test]
fn unknown_extent_fails_without_allocating() {
    let mut backend = CpuBackend::new();
    let src = sources(0);
    let mut env = ExecEnv {
        backend: &mut backend,
        sources: &src,
        preview: None,
    };
    let mut input = FrameSequence::from_sources(["missing"]);
    let mut node = ProcessingNode::from_transform(Decimate::new(1).unwrap());
    node.invalidate(input.shape(), &mut *env.backend);

    let mut up = Chain::new(&mut input, &mut []);
    let frame = node.request_frame(0, &mut up, &mut env).unwrap();
    assert!(frame.dirty);
    assert_eq!(frame.handle, None);
    assert_eq!(node.stats().failed, 1);
    assert!(node.request_frame(1, &mut up, &mut env).is_err());
}

#[test]
fn request_frame_follows_input_length_changes() {
    let mut backend = CpuBackend::new();
    let src = sources(6);
    let mut env = ExecEnv {
        backend: &mut backend,
        sources: &src,
        preview: None,
    };
    let mut input = loaded_input(6, &mut env);
    let mut node = ProcessingNode::from_transform(Decimate::new(2).unwrap());
    node.invalidate(input.shape(), &mut *env.backend);
    assert_eq!(node.owned_output().len(), 3);

    let mut shorter = loaded_input(2, &mut env);
    let mut up = Chain::new(&mut shorter, &mut []);
    let frame = node.request_frame(0, &mut up, &mut env).unwrap();
    assert!(frame.is_ready());
    assert_eq!(node.owned_output().len(), 1);

    node.dispose(&mut *env.backend);
    drop(up);
    input.dispose(&mut *env.backend);
    shorter.dispose(&mut *env.backend);
    assert_eq!(env.backend.stats().live, 0);
}
