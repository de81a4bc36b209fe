use crate::backend::ExecutionBackend;
use crate::foundation::core::{Extent, Grid, NodeId};
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ExecEnv;
use crate::sequence::frame::{Frame, FrameRef};

/// Length, extent and grid of a sequence, as seen by a downstream node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SequenceShape {
    pub(crate) len: usize,
    pub(crate) extent: Option<Extent>,
    pub(crate) grid: Grid,
}

/// Ordered frames produced either by the input (no owner) or by one processing node.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    owner: Option<NodeId>,
    extent: Option<Extent>,
    grid: Grid,
}

impl FrameSequence {
    /// Unowned sequence of source frames.
    pub fn from_sources<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frames: ids.into_iter().map(Frame::source).collect(),
            owner: None,
            extent: None,
            grid: Grid::SINGLE,
        }
    }

    /// Empty sequence owned by `owner`.
    pub fn owned(owner: NodeId) -> Self {
        Self {
            frames: Vec::new(),
            owner: Some(owner),
            extent: None,
            grid: Grid::SINGLE,
        }
    }

    /// Owning node, `None` for the input sequence.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Borrow the frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Frame at `index`.
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Frame extent, `None` when unknown.
    ///
    /// Owned sequences report the extent computed by their node. The input sequence reports the
    /// extent of its first loaded frame.
    pub fn extent(&self) -> Option<Extent> {
        match self.owner {
            Some(_) => self.extent,
            None => self.frames.first().and_then(Frame::extent),
        }
    }

    /// Flipbook grid of every frame.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Number of dirty frames.
    pub fn dirty_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_dirty()).count()
    }

    pub(crate) fn shape(&self) -> SequenceShape {
        SequenceShape {
            len: self.len(),
            extent: self.extent(),
            grid: self.grid,
        }
    }

    pub(crate) fn set_shape(&mut self, extent: Option<Extent>, grid: Grid) {
        self.extent = extent;
        self.grid = grid;
    }

    pub(crate) fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.frames.get_mut(index)
    }

    /// Grow or shrink an owned sequence to `len`.
    ///
    /// Surplus frames are disposed; new frames start dirty. Returns whether the length changed.
    pub(crate) fn resize(&mut self, len: usize, backend: &mut dyn ExecutionBackend) -> bool {
        let Some(owner) = self.owner else {
            return false;
        };
        let current = self.frames.len();
        if len < current {
            for mut f in self.frames.drain(len..) {
                f.dispose(backend);
            }
        } else if len > current {
            self.frames
                .extend(std::iter::repeat_with(|| Frame::computed(owner)).take(len - current));
        } else {
            return false;
        }
        true
    }

    /// Mark every frame dirty.
    pub fn invalidate_all(&mut self) {
        for f in &mut self.frames {
            f.mark_dirty();
        }
    }

    /// Look up a frame of the input sequence, loading it on first access.
    pub(crate) fn request_source_frame(
        &mut self,
        index: usize,
        env: &mut ExecEnv<'_>,
    ) -> SeqResult<FrameRef> {
        let len = self.frames.len();
        let frame = self.frames.get_mut(index).ok_or_else(|| {
            SeqError::validation(format!("frame index {index} out of range for {len} frame(s)"))
        })?;
        frame.ensure_loaded(env)?;
        Ok(frame.frame_ref(index))
    }

    /// Release every backend image and drop all frames.
    pub fn dispose(&mut self, backend: &mut dyn ExecutionBackend) {
        for mut f in self.frames.drain(..) {
            f.dispose(backend);
        }
    }

    pub(crate) fn reorder_sources(&mut self, order: SourceOrder) {
        match order {
            SourceOrder::ById => self
                .frames
                .sort_by(|a, b| a.source_id().cmp(&b.source_id())),
            SourceOrder::Reversed => self.frames.reverse(),
        }
    }
}

/// Reordering applied to the input sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SourceOrder {
    ById,
    Reversed,
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/frame_sequence.rs"]
mod tests;
