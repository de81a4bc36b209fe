use tracing::{debug, instrument, warn};

use crate::assets::source::SourceProvider;
use crate::backend::{ExecutionBackend, ImageHandle};
use crate::foundation::core::{Extent, Grid, NodeId};
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::chain::Chain;
use crate::pipeline::context::{ExecEnv, PreviewCtx};
use crate::pipeline::node::ProcessingNode;
use crate::sequence::frame::FrameRef;
use crate::sequence::frame_sequence::{FrameSequence, SourceOrder};
use crate::transforms::Transform;

/// Position of a sequence in a pipeline.
///
/// Two stages are equal exactly when they name the same sequence object, so disabled-node
/// passthrough shows up as [`Pipeline::output_stage`] returning an upstream stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The raw input sequence.
    Input,
    /// Output owned by the node at this position.
    Node(usize),
}

/// Ordered chain of processing nodes over one input sequence.
///
/// Frames are computed lazily when requested; edits invalidate the edited node and everything
/// downstream of it. The pipeline owns the execution backend and the source provider.
pub struct Pipeline {
    input: FrameSequence,
    nodes: Vec<ProcessingNode>,
    backend: Box<dyn ExecutionBackend>,
    sources: Box<dyn SourceProvider>,
    preview: Option<PreviewCtx>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("input", &self.input.len())
            .field("nodes", &self.labels())
            .field("backend", &self.backend.stats())
            .finish()
    }
}

impl Pipeline {
    /// Empty pipeline with no input frames.
    pub fn new(backend: Box<dyn ExecutionBackend>, sources: Box<dyn SourceProvider>) -> Self {
        Self {
            input: FrameSequence::default(),
            nodes: Vec::new(),
            backend,
            sources,
            preview: None,
        }
    }

    /// The execution backend, for readback and resource counters.
    pub fn backend(&self) -> &dyn ExecutionBackend {
        self.backend.as_ref()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the pipeline has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in pipeline order.
    pub fn nodes(&self) -> &[ProcessingNode] {
        &self.nodes
    }

    /// Node at `index`.
    pub fn node(&self, index: usize) -> Option<&ProcessingNode> {
        self.nodes.get(index)
    }

    /// Position of the node with `id`.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    /// Node labels in pipeline order.
    pub fn labels(&self) -> Vec<String> {
        self.nodes.iter().map(ProcessingNode::label).collect()
    }

    /// Preview state handed to transforms.
    pub fn set_preview(&mut self, preview: Option<PreviewCtx>) {
        self.preview = preview;
    }

    /// Current preview state.
    pub fn preview(&self) -> Option<&PreviewCtx> {
        self.preview.as_ref()
    }

    /// Replace the raw input with source frames `ids`.
    ///
    /// Every frame is loaded right away so the input extent is known; missing sources become
    /// placeholders. Invalidates the whole pipeline.
    pub fn set_input_frames<I, S>(&mut self, ids: I) -> SeqResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input.dispose(self.backend.as_mut());
        self.input = FrameSequence::from_sources(ids);
        let mut env = ExecEnv {
            backend: self.backend.as_mut(),
            sources: self.sources.as_ref(),
            preview: self.preview.as_ref(),
        };
        for index in 0..self.input.len() {
            self.input.request_source_frame(index, &mut env)?;
        }
        debug!(frames = self.input.len(), extent = ?self.input.extent(), "input frames set");
        self.invalidate_from(0)
    }

    /// Sort the raw input by source id. Invalidates the whole pipeline.
    pub fn sort_input_frames(&mut self) -> SeqResult<()> {
        self.input.reorder_sources(SourceOrder::ById);
        self.invalidate_from(0)
    }

    /// Reverse the raw input. Invalidates the whole pipeline.
    pub fn reverse_input_frames(&mut self) -> SeqResult<()> {
        self.input.reorder_sources(SourceOrder::Reversed);
        self.invalidate_from(0)
    }

    /// Append a node. Returns its id.
    pub fn add_node(&mut self, node: ProcessingNode) -> SeqResult<NodeId> {
        let index = self.nodes.len();
        self.insert_node(index, node)
    }

    /// Insert a node at `index`, shifting later nodes downstream.
    pub fn insert_node(&mut self, index: usize, node: ProcessingNode) -> SeqResult<NodeId> {
        if index > self.nodes.len() {
            return Err(SeqError::validation(format!(
                "insert position {index} out of range for {} node(s)",
                self.nodes.len()
            )));
        }
        let id = node.id();
        self.nodes.insert(index, node);
        self.invalidate_from(0)?;
        Ok(id)
    }

    /// Remove the node at `index`, releasing its frames.
    pub fn remove_node(&mut self, index: usize) -> SeqResult<()> {
        if index >= self.nodes.len() {
            return Err(SeqError::validation(format!(
                "node index {index} out of range for {} node(s)",
                self.nodes.len()
            )));
        }
        let mut node = self.nodes.remove(index);
        node.dispose(self.backend.as_mut());
        self.invalidate_from(0)
    }

    /// Reorder nodes so position `j` holds the node previously at `order[j]`.
    ///
    /// `order` must be a permutation of `0..len`. Node frames move with their node.
    pub fn reorder(&mut self, order: &[usize]) -> SeqResult<()> {
        let n = self.nodes.len();
        let mut seen = vec![false; n];
        if order.len() != n {
            return Err(SeqError::validation(format!(
                "reorder needs {n} indices, got {}",
                order.len()
            )));
        }
        for &i in order {
            match seen.get_mut(i) {
                Some(s) if !*s => *s = true,
                _ => {
                    return Err(SeqError::validation(format!(
                        "reorder is not a permutation of 0..{n}"
                    )));
                }
            }
        }

        let mut slots: Vec<Option<ProcessingNode>> = self.nodes.drain(..).map(Some).collect();
        self.nodes = order.iter().filter_map(|&i| slots[i].take()).collect();
        self.invalidate_from(0)
    }

    /// Enable or bypass the node at `index`, then invalidate from it downstream.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> SeqResult<()> {
        let node = self.node_mut(index)?;
        if node.is_enabled() == enabled {
            return Ok(());
        }
        node.set_enabled(enabled);
        self.invalidate_from(index)
    }

    /// Swap the transform of the node at `index`, then invalidate from it downstream.
    pub fn replace_transform(
        &mut self,
        index: usize,
        transform: Box<dyn Transform>,
    ) -> SeqResult<()> {
        self.node_mut(index)?.replace_transform(transform);
        self.invalidate_from(index)
    }

    fn node_mut(&mut self, index: usize) -> SeqResult<&mut ProcessingNode> {
        let n = self.nodes.len();
        self.nodes.get_mut(index).ok_or_else(|| {
            SeqError::validation(format!("node index {index} out of range for {n} node(s)"))
        })
    }

    /// Invalidate nodes `start..len` in pipeline order.
    ///
    /// Each node recomputes its length, extent and grid from its resolved input before the next
    /// one reads them. Upstream nodes are untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn invalidate_from(&mut self, start: usize) -> SeqResult<()> {
        if start > self.nodes.len() {
            return Err(SeqError::validation(format!(
                "node index {start} out of range for {} node(s)",
                self.nodes.len()
            )));
        }
        for k in start..self.nodes.len() {
            let shape = self.input_sequence_at(k)?.shape();
            self.nodes[k].invalidate(shape, self.backend.as_mut());
        }
        Ok(())
    }

    /// Invalidate every node.
    pub fn refresh(&mut self) -> SeqResult<()> {
        self.invalidate_from(0)
    }

    /// Stage whose sequence the node at `index` reads.
    ///
    /// The nearest enabled upstream node wins; with none, the raw input.
    pub fn resolve_input(&self, index: usize) -> SeqResult<Stage> {
        if index >= self.nodes.len() {
            return Err(SeqError::validation(format!(
                "node index {index} out of range for {} node(s)",
                self.nodes.len()
            )));
        }
        Ok(self.nodes[..index]
            .iter()
            .rposition(ProcessingNode::is_enabled)
            .map_or(Stage::Input, Stage::Node))
    }

    /// Stage holding what the node at `index` exposes: its own frames, or its input when bypassed.
    pub fn output_stage_of(&self, index: usize) -> SeqResult<Stage> {
        if self.node_at(index)?.is_enabled() {
            Ok(Stage::Node(index))
        } else {
            self.resolve_input(index)
        }
    }

    /// Stage holding the pipeline's final output.
    pub fn output_stage(&self) -> Stage {
        self.nodes
            .iter()
            .rposition(ProcessingNode::is_enabled)
            .map_or(Stage::Input, Stage::Node)
    }

    fn node_at(&self, index: usize) -> SeqResult<&ProcessingNode> {
        self.nodes.get(index).ok_or_else(|| {
            SeqError::validation(format!(
                "node index {index} out of range for {} node(s)",
                self.nodes.len()
            ))
        })
    }

    /// Sequence at `stage`.
    pub fn sequence(&self, stage: Stage) -> SeqResult<&FrameSequence> {
        match stage {
            Stage::Input => Ok(&self.input),
            Stage::Node(k) => Ok(self.node_at(k)?.owned_output()),
        }
    }

    /// The raw input sequence.
    pub fn input_sequence(&self) -> &FrameSequence {
        &self.input
    }

    /// Sequence the node at `index` reads.
    pub fn input_sequence_at(&self, index: usize) -> SeqResult<&FrameSequence> {
        self.sequence(self.resolve_input(index)?)
    }

    /// Sequence the node at `index` exposes downstream.
    pub fn output_sequence_at(&self, index: usize) -> SeqResult<&FrameSequence> {
        self.sequence(self.output_stage_of(index)?)
    }

    /// The pipeline's final output sequence.
    pub fn output_sequence(&self) -> &FrameSequence {
        match self.output_stage() {
            Stage::Input => &self.input,
            Stage::Node(k) => self.nodes[k].owned_output(),
        }
    }

    /// Output extent of the node at `index`; a bypassed node reports its input's.
    pub fn output_extent(&self, index: usize) -> SeqResult<Option<Extent>> {
        Ok(self.output_sequence_at(index)?.extent())
    }

    /// Output grid of the node at `index`; a bypassed node reports its input's.
    pub fn output_grid(&self, index: usize) -> SeqResult<Grid> {
        Ok(self.output_sequence_at(index)?.grid())
    }

    /// Pull frame `index` of the sequence at `stage`, computing dirty frames upstream first.
    ///
    /// Requests on a bypassed node's stage read through to its input. A frame whose compute
    /// failed comes back with `dirty` set.
    #[instrument(level = "debug", skip(self))]
    pub fn request_frame(&mut self, stage: Stage, index: usize) -> SeqResult<FrameRef> {
        let end = match stage {
            Stage::Input => 0,
            Stage::Node(k) => {
                self.node_at(k)?;
                k + 1
            }
        };
        let mut env = ExecEnv {
            backend: self.backend.as_mut(),
            sources: self.sources.as_ref(),
            preview: self.preview.as_ref(),
        };
        let mut chain = Chain::new(&mut self.input, &mut self.nodes[..end]);
        let frame = chain.request_frame(index, &mut env)?;
        if frame.dirty {
            warn!(?stage, index, "frame could not be computed");
        }
        Ok(frame)
    }

    /// Pull frame `index` of the final output.
    pub fn request_output_frame(&mut self, index: usize) -> SeqResult<FrameRef> {
        self.request_frame(self.output_stage(), index)
    }

    /// Compute at most one dirty frame of the node at `index`.
    ///
    /// The scan starts after `seed`, wraps around and tries `seed` last. Returns the index
    /// computed, or `None` when every frame is clean, every attempt failed, or the node is
    /// bypassed.
    #[instrument(level = "debug", skip(self))]
    pub fn request_process_one_frame(
        &mut self,
        index: usize,
        seed: usize,
    ) -> SeqResult<Option<usize>> {
        if !self.node_at(index)?.is_enabled() {
            return Ok(None);
        }
        let mut env = ExecEnv {
            backend: self.backend.as_mut(),
            sources: self.sources.as_ref(),
            preview: self.preview.as_ref(),
        };
        let (upstream, rest) = self.nodes.split_at_mut(index);
        let Some(node) = rest.first_mut() else {
            return Ok(None);
        };
        let mut up = Chain::new(&mut self.input, upstream);
        Ok(node.request_process_one_frame(seed, &mut up, &mut env))
    }

    /// Copy a computed frame back to host memory.
    pub fn read_frame(&self, frame: &FrameRef) -> SeqResult<image::Rgba32FImage> {
        let handle: ImageHandle = frame
            .handle
            .ok_or_else(|| SeqError::evaluation(format!("frame {} has no image", frame.index)))?;
        self.backend.read_back(handle)
    }

    /// Release every backend image held by the input and the nodes.
    pub fn dispose(&mut self) {
        for node in &mut self.nodes {
            node.dispose(self.backend.as_mut());
        }
        self.input.dispose(self.backend.as_mut());
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/pipeline.rs"]
mod tests;
