use super::*;
use crate::assets::source::{MemorySource, PLACEHOLDER_SIZE};
use crate::backend::cpu::CpuBackend;
use crate::foundation::error::SeqError;

fn env<'a>(backend: &'a mut CpuBackend, sources: &'a MemorySource) -> ExecEnv<'a> {
    ExecEnv {
        backend,
        sources,
        preview: None,
    }
}

#[test]
fn source_frames_load_once() {
    let mut backend = CpuBackend::new();
    let sources = MemorySource::new().with("a", image::DynamicImage::new_rgba8(4, 3));
    let mut env = env(&mut backend, &sources);

    let mut f = Frame::source("a");
    assert!(!f.is_dirty());
    let h1 = f.ensure_loaded(&mut env).unwrap();
    let h2 = f.ensure_loaded(&mut env).unwrap();
    assert_eq!(h1, h2);
    assert_eq!(f.extent(), Some(Extent::new(4, 3)));
    assert!(!f.is_placeholder());
    assert_eq!(env.backend.stats().allocations, 1);
}

#[test]
fn missing_source_uses_placeholder() {
    let mut backend = CpuBackend::new();
    let sources = MemorySource::new();
    let mut env = env(&mut backend, &sources);

    let mut f = Frame::source("nope.png");
    assert!(f.ensure_loaded(&mut env).unwrap().is_some());
    assert!(f.is_placeholder());
    assert_eq!(
        f.extent(),
        Some(Extent::new(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE))
    );
}

#[test]
fn process_computes_once_until_dirty() {
    let mut backend = CpuBackend::new();
    let sources = MemorySource::new();
    let mut env = env(&mut backend, &sources);
    let mut f = Frame::computed(NodeId(7));
    let mut calls = 0;

    assert!(f.process(Extent::new(2, 2), &mut env, |_, _| {
        calls += 1;
        Ok(())
    }));
    assert!(!f.is_dirty());
    assert!(!f.process(Extent::new(2, 2), &mut env, |_, _| {
        calls += 1;
        Ok(())
    }));
    assert_eq!(calls, 1);

    f.mark_dirty();
    assert!(f.process(Extent::new(2, 2), &mut env, |_, _| Ok(())));
    assert_eq!(env.backend.stats().allocations, 1);
}

#[test]
fn failed_compute_leaves_frame_dirty() {
    let mut backend = CpuBackend::new();
    let sources = MemorySource::new();
    let mut env = env(&mut backend, &sources);
    let mut f = Frame::computed(NodeId(1));

    let ok = f.process(Extent::new(2, 2), &mut env, |_, _| {
        Err(SeqError::evaluation("boom"))
    });
    assert!(!ok);
    assert!(f.is_dirty());
    // The image is kept for the next attempt.
    assert_eq!(f.extent(), Some(Extent::new(2, 2)));
}

#[test]
fn extent_change_reallocates_at_next_process() {
    let mut backend = CpuBackend::new();
    let sources = MemorySource::new();
    let mut env = env(&mut backend, &sources);
    let mut f = Frame::computed(NodeId(1));

    assert!(f.process(Extent::new(2, 2), &mut env, |_, _| Ok(())));
    f.mark_dirty();
    assert_eq!(f.extent(), Some(Extent::new(2, 2)));
    assert_eq!(env.backend.stats().releases, 0);

    assert!(f.process(Extent::new(3, 1), &mut env, |(_, extent), _| {
        assert_eq!(extent, Extent::new(3, 1));
        Ok(())
    }));
    let st = env.backend.stats();
    assert_eq!((st.allocations, st.releases, st.live), (2, 1, 1));
}

#[test]
fn dispose_releases_and_dirties() {
    let mut backend = CpuBackend::new();
    let sources = MemorySource::new();
    let mut env = env(&mut backend, &sources);
    let mut f = Frame::computed(NodeId(1));
    assert!(f.process(Extent::new(2, 2), &mut env, |_, _| Ok(())));

    f.dispose(&mut *env.backend);
    assert!(f.is_dirty());
    assert_eq!(f.handle(), None);
    assert_eq!(env.backend.stats().live, 0);
}

#[test]
fn source_frames_are_never_processed() {
    let mut backend = CpuBackend::new();
    let sources = MemorySource::new();
    let mut env = env(&mut backend, &sources);
    let mut f = Frame::source("a");
    f.mark_dirty();
    assert!(!f.is_dirty());
    assert!(!f.process(Extent::new(1, 1), &mut env, |_, _| Ok(())));
    assert_eq!(f.owner(), None);
    assert_eq!(f.source_id(), Some("a"));
}
