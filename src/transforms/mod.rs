//! Frame transforms and the registry that builds them from serialized parameters.
//!
//! A [`Transform`] describes how one node's output relates to its input: the output length,
//! frame extent and flipbook grid as pure functions of the input's, plus the per-frame compute.

pub(crate) mod assemble;
pub(crate) mod break_flipbook;
pub(crate) mod color;
pub(crate) mod color_correction;
pub(crate) mod crop;
pub(crate) mod decimate;
pub(crate) mod fade;
pub(crate) mod fix_borders;
pub(crate) mod looping;
pub(crate) mod registry;
pub(crate) mod remap_color;
pub(crate) mod remove_background;
pub(crate) mod resize;
pub(crate) mod retime;
pub(crate) mod rotate;

#[cfg(test)]
#[path = "../../tests/unit/transforms/support.rs"]
pub(crate) mod test_support;

use crate::foundation::core::{Extent, Grid};
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ProcessCtx;

/// Entries in the lookup tables baked from curves and gradients.
pub(crate) const LUT_SIZE: usize = 256;

/// Per-node frame operation.
///
/// The shape methods must be pure: they are re-evaluated on every invalidation.
pub trait Transform: std::fmt::Debug {
    /// Registry tag, e.g. `"decimate"`.
    fn kind(&self) -> &'static str;

    /// Human-readable label including the main parameters.
    fn label(&self) -> String {
        self.kind().to_string()
    }

    /// Output frame count for an input of `input_len` frames.
    fn output_length(&self, input_len: usize) -> usize {
        input_len
    }

    /// Output frame extent for the given input extent, before clamping to limits.
    fn output_size(&self, input: Extent) -> Extent {
        input
    }

    /// Output flipbook grid for the given input grid.
    fn output_grid(&self, input: Grid) -> Grid {
        input
    }

    /// Compute output frame [`ProcessCtx::out_index`] into the destination.
    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()>;

    /// Parameters as a JSON object, the inverse of the registry's constructor.
    fn params(&self) -> SeqResult<serde_json::Value> {
        Ok(serde_json::Value::Object(serde_json::Map::new()))
    }
}

/// Statically known transform kind that the [`registry::TransformRegistry`] can construct.
///
/// Parameters deserialize with defaults for missing fields, then pass [`TransformKind::validate`].
pub trait TransformKind:
    Transform + Default + serde::Serialize + serde::de::DeserializeOwned + 'static
{
    /// Registry tag.
    const KIND: &'static str;
    /// Menu category.
    const CATEGORY: &'static str;
    /// Menu name.
    const NAME: &'static str;

    /// Reject parameters the transform cannot work with.
    fn validate(&self) -> SeqResult<()> {
        Ok(())
    }
}

pub(crate) fn params_of<T: serde::Serialize>(t: &T) -> SeqResult<serde_json::Value> {
    Ok(serde_json::to_value(t)?)
}

/// Index computations shared by transforms sampling a float position in the input.
pub(crate) fn blend_indices(ctx: &ProcessCtx<'_>, position: f64) -> (usize, usize, f32) {
    let floor = position.floor();
    let prev = ctx.clamp_input(floor as i64);
    let next = ctx.clamp_input(position.ceil() as i64);
    (prev, next, (position - floor) as f32)
}
