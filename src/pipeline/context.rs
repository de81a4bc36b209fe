use crate::assets::source::SourceProvider;
use crate::backend::kernel::Kernel;
use crate::backend::{ExecutionBackend, ImageHandle};
use crate::foundation::core::{Extent, Grid, NodeId, clamp_index};
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::chain::Chain;

/// What the presentation layer is currently showing.
///
/// Set on the pipeline with [`crate::Pipeline::set_preview`] and handed to transforms through
/// [`ProcessCtx::preview`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PreviewCtx {
    /// Node whose output is previewed; `None` for the raw input.
    pub node: Option<NodeId>,
    /// Frame index shown by the viewer.
    pub current_frame: usize,
    /// Length of the previewed sequence.
    pub sequence_length: usize,
}

impl PreviewCtx {
    /// Position of the current frame in `[0, 1]` along the previewed sequence.
    pub fn sequence_ratio(&self) -> f64 {
        if self.sequence_length > 1 {
            self.current_frame as f64 / (self.sequence_length - 1) as f64
        } else {
            0.0
        }
    }
}

/// Collaborators threaded through every pull request.
pub(crate) struct ExecEnv<'a> {
    pub(crate) backend: &'a mut (dyn ExecutionBackend + 'static),
    pub(crate) sources: &'a (dyn SourceProvider + 'static),
    pub(crate) preview: Option<&'a PreviewCtx>,
}

impl ExecEnv<'_> {
    pub(crate) fn reborrow(&mut self) -> ExecEnv<'_> {
        ExecEnv {
            backend: &mut *self.backend,
            sources: self.sources,
            preview: self.preview,
        }
    }
}

/// Everything a [`crate::Transform`] may touch while computing one output frame.
///
/// The destination image is owned by the node; transforms write into it only through
/// [`ProcessCtx::execute`].
pub struct ProcessCtx<'c> {
    node: NodeId,
    out_index: usize,
    output_len: usize,
    dest: ImageHandle,
    dest_extent: Extent,
    input: Chain<'c>,
    env: ExecEnv<'c>,
}

impl<'c> ProcessCtx<'c> {
    pub(crate) fn new(
        node: NodeId,
        out_index: usize,
        output_len: usize,
        dest: (ImageHandle, Extent),
        input: Chain<'c>,
        env: ExecEnv<'c>,
    ) -> Self {
        Self {
            node,
            out_index,
            output_len,
            dest: dest.0,
            dest_extent: dest.1,
            input,
            env,
        }
    }

    /// Node being computed.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Output frame index being computed.
    pub fn out_index(&self) -> usize {
        self.out_index
    }

    /// Length of the node's output sequence.
    pub fn output_len(&self) -> usize {
        self.output_len
    }

    /// Extent of the destination frame.
    pub fn dest_extent(&self) -> Extent {
        self.dest_extent
    }

    /// Length of the resolved input sequence.
    pub fn input_len(&self) -> usize {
        self.input.len()
    }

    /// Extent of the resolved input sequence, if known.
    pub fn input_extent(&self) -> Option<Extent> {
        self.input.extent()
    }

    /// Flipbook grid of the resolved input sequence.
    pub fn input_grid(&self) -> Grid {
        self.input.grid()
    }

    /// Whether the resolved input is the raw source sequence.
    pub fn input_is_source(&self) -> bool {
        self.input.is_source()
    }

    /// Clamp a computed input index into the input sequence.
    pub fn clamp_input(&self, index: i64) -> usize {
        clamp_index(index, self.input.len())
    }

    /// Pull input frame `index`, computing it upstream if needed.
    ///
    /// Fails when the index is out of range or the input frame could not be computed; either way
    /// the frame being processed stays dirty.
    pub fn request_input(&mut self, index: usize) -> SeqResult<ImageHandle> {
        let len = self.input.len();
        if index >= len {
            return Err(SeqError::evaluation(format!(
                "input index {index} out of range for {len} frame(s)"
            )));
        }
        let frame = self.input.request_frame(index, &mut self.env)?;
        if frame.dirty {
            return Err(SeqError::evaluation(format!(
                "input frame {index} is not ready"
            )));
        }
        frame
            .handle
            .ok_or_else(|| SeqError::evaluation(format!("input frame {index} has no image")))
    }

    /// Run `kernel` over `inputs`, writing the destination frame.
    pub fn execute(&mut self, kernel: &Kernel, inputs: &[ImageHandle]) -> SeqResult<()> {
        self.env.backend.execute(kernel, inputs, self.dest)
    }

    /// Preview state supplied by the presentation layer, if any.
    pub fn preview(&self) -> Option<&PreviewCtx> {
        self.env.preview
    }

    /// Whether this node's output is the one being previewed.
    pub fn is_previewed(&self) -> bool {
        self.env.preview.is_some_and(|p| p.node == Some(self.node))
    }
}
