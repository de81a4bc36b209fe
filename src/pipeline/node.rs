use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::backend::ExecutionBackend;
use crate::foundation::core::{Extent, Grid, NodeId};
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::chain::Chain;
use crate::pipeline::context::{ExecEnv, ProcessCtx};
use crate::sequence::frame::FrameRef;
use crate::sequence::frame_sequence::{FrameSequence, SequenceShape};
use crate::transforms::Transform;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Compute counters of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Frames computed successfully.
    pub processed: u64,
    /// Compute attempts that left a frame dirty.
    pub failed: u64,
}

/// One stage of a [`crate::Pipeline`]: a transform plus the frames it produced.
///
/// A disabled node keeps its own frames but is skipped by input resolution, so consumers read
/// its input instead.
#[derive(Debug)]
pub struct ProcessingNode {
    id: NodeId,
    transform: Box<dyn Transform>,
    enabled: bool,
    output: FrameSequence,
    stats: NodeStats,
}

impl ProcessingNode {
    /// Enabled node around a boxed transform, with a fresh [`NodeId`].
    pub fn new(transform: Box<dyn Transform>) -> Self {
        let id = NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            id,
            transform,
            enabled: true,
            output: FrameSequence::owned(id),
            stats: NodeStats::default(),
        }
    }

    /// Enabled node around `transform`.
    pub fn from_transform<T: Transform + 'static>(transform: T) -> Self {
        Self::new(Box::new(transform))
    }

    /// Builder-style enabled flag, for nodes not yet in a pipeline.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Stable identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's transform.
    pub fn transform(&self) -> &dyn Transform {
        self.transform.as_ref()
    }

    /// Whether the node takes part in input resolution.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Compute counters.
    pub fn stats(&self) -> NodeStats {
        self.stats
    }

    /// Display label, suffixed with `(Disabled)` when the node is bypassed.
    pub fn label(&self) -> String {
        let label = self.transform.label();
        if self.enabled {
            label
        } else {
            format!("{label} (Disabled)")
        }
    }

    /// Frames owned by this node, regardless of whether it is enabled.
    pub fn owned_output(&self) -> &FrameSequence {
        &self.output
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn replace_transform(&mut self, transform: Box<dyn Transform>) {
        self.transform = transform;
    }

    /// Match the output length to what the transform produces for `input_len`.
    pub(crate) fn update_sequence_length(
        &mut self,
        input_len: usize,
        backend: &mut dyn ExecutionBackend,
    ) -> bool {
        let len = self.transform.output_length(input_len);
        self.output.resize(len, backend)
    }

    /// Recompute length, extent and grid from `input`, then mark every frame dirty.
    pub(crate) fn invalidate(&mut self, input: SequenceShape, backend: &mut dyn ExecutionBackend) {
        self.update_sequence_length(input.len, backend);
        let extent = input
            .extent
            .map(|e| self.transform.output_size(e).clamp_to_limits());
        let grid = self.transform.output_grid(input.grid);
        self.output.set_shape(extent, grid);
        self.output.invalidate_all();
        debug!(
            node = %self.id,
            kind = self.transform.kind(),
            len = self.output.len(),
            extent = ?extent,
            "node invalidated"
        );
    }

    /// Output extent computed at the last invalidation.
    pub fn output_extent(&self) -> Option<Extent> {
        self.output.extent()
    }

    /// Output grid computed at the last invalidation.
    pub fn output_grid(&self) -> Grid {
        self.output.grid()
    }

    pub(crate) fn request_frame(
        &mut self,
        index: usize,
        up: &mut Chain<'_>,
        env: &mut ExecEnv<'_>,
    ) -> SeqResult<FrameRef> {
        self.update_sequence_length(up.len(), &mut *env.backend);
        let len = self.output.len();
        let dirty = self
            .output
            .frame(index)
            .ok_or_else(|| {
                SeqError::validation(format!(
                    "frame index {index} out of range for {len} frame(s) of {}",
                    self.id
                ))
            })?
            .is_dirty();
        if dirty {
            self.process(index, up, env);
        }
        self.output
            .frame(index)
            .map(|f| f.frame_ref(index))
            .ok_or_else(|| SeqError::evaluation(format!("frame {index} vanished during compute")))
    }

    /// Compute dirty frame `index`. Returns whether a compute succeeded.
    pub(crate) fn process(
        &mut self,
        index: usize,
        up: &mut Chain<'_>,
        env: &mut ExecEnv<'_>,
    ) -> bool {
        let Some(target) = self.output.extent() else {
            warn!(node = %self.id, index, "output extent unknown; frame stays dirty");
            self.stats.failed += 1;
            return false;
        };
        let node = self.id;
        let output_len = self.output.len();
        let transform = self.transform.as_ref();
        let Some(frame) = self.output.frame_mut(index) else {
            return false;
        };
        if !frame.is_dirty() {
            return false;
        }

        let ok = frame.process(target, env, |dest, env| {
            let mut ctx =
                ProcessCtx::new(node, index, output_len, dest, up.reborrow(), env.reborrow());
            transform.process(&mut ctx)
        });
        if ok {
            self.stats.processed += 1;
        } else {
            self.stats.failed += 1;
        }
        ok
    }

    /// Compute one dirty frame, scanning forward from `seed + 1` with wrap-around.
    ///
    /// The seed itself is tried last. Frames whose compute fails are skipped and the scan goes
    /// on. Returns the index computed, or `None` when nothing could be.
    pub(crate) fn request_process_one_frame(
        &mut self,
        seed: usize,
        up: &mut Chain<'_>,
        env: &mut ExecEnv<'_>,
    ) -> Option<usize> {
        self.update_sequence_length(up.len(), &mut *env.backend);
        let len = self.output.len();
        if len == 0 {
            return None;
        }
        let seed = seed % len;
        for step in 1..=len {
            let index = (seed + step) % len;
            let dirty = self.output.frame(index).is_some_and(|f| f.is_dirty());
            if dirty && self.process(index, up, env) {
                return Some(index);
            }
        }
        None
    }

    /// Release every frame image.
    pub(crate) fn dispose(&mut self, backend: &mut dyn ExecutionBackend) {
        self.output.dispose(backend);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/node.rs"]
mod tests;
