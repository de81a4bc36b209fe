//! imgseq is a lazy, pull-based processing pipeline for image sequences.
//!
//! A [`Pipeline`] holds one raw input sequence and an ordered list of [`ProcessingNode`]s. Each
//! node applies a [`Transform`] to the output of the nearest enabled node upstream:
//!
//! - Build nodes directly or from a [`SequenceDocument`] through a [`TransformRegistry`]
//! - Pull frames with [`Pipeline::request_frame`] or cook incrementally with
//!   [`Pipeline::request_process_one_frame`]
//! - Edits invalidate only the edited node and what lies downstream of it
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod animation;
/// Execution backends and kernels.
pub mod backend;
pub(crate) mod config;
pub(crate) mod pipeline;
pub(crate) mod sequence;
pub(crate) mod transforms;

pub use crate::foundation::core::{Extent, Grid, MAX_EXTENT, NodeId, clamp_index};
pub use crate::foundation::error::{SeqError, SeqResult};

pub use crate::animation::curve::{Curve, CurveKey};
pub use crate::animation::ease::Ease;
pub use crate::animation::gradient::{Gradient, GradientKey};
pub use crate::assets::source::{
    DirectorySource, MemorySource, PLACEHOLDER_SIZE, SourceProvider, normalize_rel_path,
    placeholder_image,
};
pub use crate::backend::cpu::CpuBackend;
pub use crate::backend::kernel::{Kernel, PixelRect, RemapSource, Rotation};
pub use crate::backend::{BackendKind, BackendStats, ExecutionBackend, ImageHandle, create_backend};
pub use crate::config::document::{
    DocumentSet, ProcessorConfig, ResolvedProcessors, SequenceDocument,
};
pub use crate::pipeline::context::{PreviewCtx, ProcessCtx};
pub use crate::pipeline::node::{NodeStats, ProcessingNode};
pub use crate::pipeline::pipeline::{Pipeline, Stage};
pub use crate::sequence::frame::{Frame, FrameRef};
pub use crate::sequence::frame_sequence::FrameSequence;
pub use crate::transforms::assemble::{AssembleFlipbook, AssembleMode};
pub use crate::transforms::break_flipbook::{BreakFlipbook, MAX_BREAK_FRAMES};
pub use crate::transforms::color::{AlphaFromRgb, PremultiplyAlpha};
pub use crate::transforms::color_correction::ColorCorrection;
pub use crate::transforms::crop::Crop;
pub use crate::transforms::decimate::Decimate;
pub use crate::transforms::fade::Fade;
pub use crate::transforms::fix_borders::FixBorders;
pub use crate::transforms::looping::Looping;
pub use crate::transforms::registry::{KindInfo, TransformRegistry};
pub use crate::transforms::remap_color::RemapColor;
pub use crate::transforms::remove_background::RemoveBackground;
pub use crate::transforms::resize::Resize;
pub use crate::transforms::retime::Retime;
pub use crate::transforms::rotate::Rotate;
pub use crate::transforms::{Transform, TransformKind};
