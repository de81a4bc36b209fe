use super::*;
use crate::assets::source::MemorySource;
use crate::backend::cpu::CpuBackend;

#[test]
fn input_extent_comes_from_first_loaded_frame() {
    let mut backend = CpuBackend::new();
    let sources = MemorySource::new().with("a", image::DynamicImage::new_rgba8(5, 4));
    let mut env = ExecEnv {
        backend: &mut backend,
        sources: &sources,
        preview: None,
    };

    let mut seq = FrameSequence::from_sources(["a", "b"]);
    assert_eq!(seq.extent(), None);
    let r = seq.request_source_frame(0, &mut env).unwrap();
    assert!(r.is_ready());
    assert_eq!(seq.extent(), Some(Extent::new(5, 4)));
    assert_eq!(seq.grid(), Grid::SINGLE);
    assert!(seq.request_source_frame(2, &mut env).is_err());
}

#[test]
fn resize_appends_dirty_and_disposes_surplus() {
    let mut backend = CpuBackend::new();
    let mut seq = FrameSequence::owned(NodeId(3));

    assert!(seq.resize(3, &mut backend));
    assert_eq!(seq.len(), 3);
    assert_eq!(seq.dirty_count(), 3);
    assert!(seq.frames().iter().all(|f| f.owner() == Some(NodeId(3))));
    assert!(!seq.resize(3, &mut backend));
    assert!(seq.resize(1, &mut backend));
    assert_eq!(seq.len(), 1);
}

#[test]
fn unowned_sequences_keep_their_length() {
    let mut backend = CpuBackend::new();
    let mut seq = FrameSequence::from_sources(["a"]);
    assert!(!seq.resize(4, &mut backend));
    assert_eq!(seq.len(), 1);
    seq.invalidate_all();
    assert_eq!(seq.dirty_count(), 0);
}

#[test]
fn owned_extent_is_the_cached_value() {
    let mut seq = FrameSequence::owned(NodeId(1));
    assert_eq!(seq.extent(), None);
    seq.set_shape(Some(Extent::new(9, 8)), Grid::new(2, 2));
    assert_eq!(seq.extent(), Some(Extent::new(9, 8)));
    assert_eq!(seq.shape().grid, Grid::new(2, 2));
}

#[test]
fn reorder_sources_sorts_and_reverses() {
    let mut seq = FrameSequence::from_sources(["c", "a", "b"]);
    seq.reorder_sources(SourceOrder::ById);
    let ids: Vec<_> = seq.frames().iter().filter_map(Frame::source_id).collect();
    assert_eq!(ids, ["a", "b", "c"]);
    seq.reorder_sources(SourceOrder::Reversed);
    assert_eq!(seq.frame(0).and_then(Frame::source_id), Some("c"));
}
