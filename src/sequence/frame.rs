use std::sync::Arc;

use tracing::{debug, warn};

use crate::assets::source::placeholder_image;
use crate::backend::kernel::Kernel;
use crate::backend::{ExecutionBackend, ImageHandle};
use crate::foundation::core::{Extent, NodeId};
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ExecEnv;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Origin {
    Source { id: String },
    Computed { owner: NodeId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Resource {
    handle: ImageHandle,
    extent: Extent,
}

/// Lightweight view of a frame after a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRef {
    /// Index in its sequence.
    pub index: usize,
    /// Backend image, if one has been allocated.
    pub handle: Option<ImageHandle>,
    /// Extent of the backend image.
    pub extent: Option<Extent>,
    /// Whether the content is stale. Source frames are never dirty.
    pub dirty: bool,
}

impl FrameRef {
    /// Clean and backed by an image.
    pub fn is_ready(&self) -> bool {
        !self.dirty && self.handle.is_some()
    }
}

/// One image slot of a [`crate::FrameSequence`].
///
/// Source frames wrap an externally loaded image and never become dirty. Computed frames belong
/// to a node; their backend image is (re)allocated lazily at the extent requested at compute
/// time, so a frame whose extent changed keeps its old image until it is next processed.
#[derive(Clone, Debug)]
pub struct Frame {
    origin: Origin,
    dirty: bool,
    placeholder: bool,
    resource: Option<Resource>,
}

impl Frame {
    /// A source frame identified by `id`. Its image is loaded on first access.
    pub fn source(id: impl Into<String>) -> Self {
        Self {
            origin: Origin::Source { id: id.into() },
            dirty: false,
            placeholder: false,
            resource: None,
        }
    }

    /// A dirty computed frame owned by `owner`.
    pub fn computed(owner: NodeId) -> Self {
        Self {
            origin: Origin::Computed { owner },
            dirty: true,
            placeholder: false,
            resource: None,
        }
    }

    /// Owning node, `None` for source frames.
    pub fn owner(&self) -> Option<NodeId> {
        match self.origin {
            Origin::Computed { owner } => Some(owner),
            Origin::Source { .. } => None,
        }
    }

    /// Source id, `None` for computed frames.
    pub fn source_id(&self) -> Option<&str> {
        match &self.origin {
            Origin::Source { id } => Some(id),
            Origin::Computed { .. } => None,
        }
    }

    /// Whether this is a source frame.
    pub fn is_source(&self) -> bool {
        matches!(self.origin, Origin::Source { .. })
    }

    /// Whether the content is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a missing source was replaced by the placeholder image.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Extent of the current backend image.
    pub fn extent(&self) -> Option<Extent> {
        self.resource.map(|r| r.extent)
    }

    /// Current backend image.
    pub fn handle(&self) -> Option<ImageHandle> {
        self.resource.map(|r| r.handle)
    }

    pub(crate) fn frame_ref(&self, index: usize) -> FrameRef {
        FrameRef {
            index,
            handle: self.handle(),
            extent: self.extent(),
            dirty: self.dirty,
        }
    }

    /// Mark a computed frame stale. Source frames stay clean.
    pub fn mark_dirty(&mut self) {
        if !self.is_source() {
            self.dirty = true;
        }
    }

    /// Load a source frame into the backend if it is not resident yet.
    ///
    /// A provider failure substitutes [`placeholder_image`] and logs a warning; only backend
    /// failures are returned.
    pub(crate) fn ensure_loaded(
        &mut self,
        env: &mut ExecEnv<'_>,
    ) -> SeqResult<Option<ImageHandle>> {
        let Origin::Source { id } = &self.origin else {
            return Ok(self.handle());
        };
        if let Some(r) = self.resource {
            return Ok(Some(r.handle));
        }

        let pixels = match env.sources.load(id) {
            Ok(img) => {
                self.placeholder = false;
                img.to_rgba32f()
            }
            Err(e) => {
                warn!(id = %id, error = %e, "source frame unavailable; using placeholder");
                self.placeholder = true;
                placeholder_image()
            }
        };
        let extent = Extent::new(pixels.width(), pixels.height());
        let handle = env.backend.allocate(extent)?;
        if let Err(e) = env
            .backend
            .execute(&Kernel::Upload(Arc::new(pixels)), &[], handle)
        {
            env.backend.release(handle);
            return Err(e);
        }
        debug!(id = %id, %extent, "loaded source frame");
        self.resource = Some(Resource { handle, extent });
        Ok(Some(handle))
    }

    /// Image for a computed frame at `target`, reallocating when the extent changed.
    fn sync_resource(
        &mut self,
        target: Extent,
        backend: &mut dyn ExecutionBackend,
    ) -> SeqResult<ImageHandle> {
        match self.resource {
            Some(r) if r.extent == target => return Ok(r.handle),
            Some(r) => {
                debug!(from = %r.extent, to = %target, "reallocating frame image");
                backend.release(r.handle);
                self.resource = None;
            }
            None => {}
        }
        let handle = backend.allocate(target)?;
        self.resource = Some(Resource {
            handle,
            extent: target,
        });
        Ok(handle)
    }

    /// Compute a dirty computed frame at `target` extent.
    ///
    /// Returns `false` without doing anything when the frame is clean or a source frame. On
    /// failure the error is logged, the frame stays dirty and `false` is returned.
    pub(crate) fn process<F>(&mut self, target: Extent, env: &mut ExecEnv<'_>, compute: F) -> bool
    where
        F: FnOnce((ImageHandle, Extent), &mut ExecEnv<'_>) -> SeqResult<()>,
    {
        let Origin::Computed { owner } = self.origin else {
            return false;
        };
        if !self.dirty {
            return false;
        }

        let dest = match self.sync_resource(target, &mut *env.backend) {
            Ok(h) => h,
            Err(e) => {
                warn!(node = %owner, error = %e, "frame allocation failed");
                return false;
            }
        };
        match compute((dest, target), env) {
            Ok(()) => {
                self.dirty = false;
                true
            }
            Err(e) => {
                warn!(node = %owner, error = %e, "frame computation failed; frame stays dirty");
                false
            }
        }
    }

    /// Release the backend image. Computed frames become dirty.
    pub fn dispose(&mut self, backend: &mut dyn ExecutionBackend) {
        if let Some(r) = self.resource.take() {
            backend.release(r.handle);
        }
        self.mark_dirty();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/frame.rs"]
mod tests;
