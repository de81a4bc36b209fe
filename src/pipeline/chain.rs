use crate::foundation::core::{Extent, Grid};
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ExecEnv;
use crate::pipeline::node::ProcessingNode;
use crate::sequence::frame::FrameRef;
use crate::sequence::frame_sequence::FrameSequence;

/// Mutable view of the input plus the nodes `0..=k` of a pipeline.
///
/// The view's output is the output of its last enabled node, or the input when every node is
/// disabled. Input resolution is positional and recomputed on every call.
pub(crate) struct Chain<'p> {
    pub(crate) input: &'p mut FrameSequence,
    pub(crate) nodes: &'p mut [ProcessingNode],
}

impl<'p> Chain<'p> {
    pub(crate) fn new(input: &'p mut FrameSequence, nodes: &'p mut [ProcessingNode]) -> Self {
        Self { input, nodes }
    }

    pub(crate) fn reborrow(&mut self) -> Chain<'_> {
        Chain {
            input: &mut *self.input,
            nodes: &mut *self.nodes,
        }
    }

    /// Sequence a downstream consumer of this view reads.
    pub(crate) fn output(&self) -> &FrameSequence {
        self.nodes
            .iter()
            .rev()
            .find(|n| n.is_enabled())
            .map_or(&*self.input, ProcessingNode::owned_output)
    }

    pub(crate) fn len(&self) -> usize {
        self.output().len()
    }

    pub(crate) fn extent(&self) -> Option<Extent> {
        self.output().extent()
    }

    pub(crate) fn grid(&self) -> Grid {
        self.output().grid()
    }

    pub(crate) fn is_source(&self) -> bool {
        self.output().owner().is_none()
    }

    /// Pull frame `index` of this view's output, computing it upstream first when dirty.
    pub(crate) fn request_frame(
        &mut self,
        index: usize,
        env: &mut ExecEnv<'_>,
    ) -> SeqResult<FrameRef> {
        let Some((last, upstream)) = self.nodes.split_last_mut() else {
            return self.input.request_source_frame(index, env);
        };
        let mut up = Chain::new(&mut *self.input, upstream);
        if !last.is_enabled() {
            return up.request_frame(index, env);
        }
        last.request_frame(index, &mut up, env)
    }
}
