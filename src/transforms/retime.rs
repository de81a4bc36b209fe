use crate::animation::curve::Curve;
use crate::backend::kernel::Kernel;
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, blend_indices, params_of};

/// Resample the sequence to a fixed length, blending neighbouring input frames.
///
/// With `use_curve` the curve maps normalized output time to an input frame position; otherwise
/// the input is stretched linearly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Retime {
    /// Output frame count.
    pub length: u32,
    /// Input frame position over normalized output time.
    pub curve: Curve,
    /// Sample `curve` instead of stretching linearly.
    pub use_curve: bool,
}

impl Default for Retime {
    fn default() -> Self {
        Self {
            length: 25,
            curve: Curve::ramp((0.0, 0.0), (1.0, 24.0)),
            use_curve: true,
        }
    }
}

impl Retime {
    /// Linear stretch to `length` frames.
    pub fn linear(length: u32) -> SeqResult<Self> {
        let t = Self {
            length,
            use_curve: false,
            ..Self::default()
        };
        t.validate()?;
        Ok(t)
    }
}

impl Transform for Retime {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        format!("Retime ({} frame(s))", self.length)
    }

    fn output_length(&self, input_len: usize) -> usize {
        if input_len == 0 {
            0
        } else {
            self.length as usize
        }
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let t = ctx.out_index() as f64 / ctx.output_len().max(1) as f64;
        let position = if self.use_curve {
            self.curve.evaluate(t)
        } else {
            t * ctx.input_len() as f64
        };
        let (prev, next, factor) = blend_indices(ctx, position);
        let a = ctx.request_input(prev)?;
        let b = ctx.request_input(next)?;
        ctx.execute(&Kernel::Blend { factor }, &[a, b])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for Retime {
    const KIND: &'static str = "retime";
    const CATEGORY: &'static str = "Sequence";
    const NAME: &'static str = "Retime";

    fn validate(&self) -> SeqResult<()> {
        if self.length == 0 {
            return Err(SeqError::validation("retime length must be at least 1"));
        }
        self.curve.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/retime.rs"]
mod tests;
