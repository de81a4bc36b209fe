use tracing::warn;

use crate::animation::curve::Curve;
use crate::backend::kernel::Kernel;
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Make a seamless loop of `length` frames around `sync_frame`.
///
/// Output frame `i` mixes input `sync_frame + i` with input `sync_frame - (length - i)`, weighted
/// by the mix curve at `i / length`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Looping {
    /// Output frame count.
    pub length: u32,
    /// Input frame the loop is built around.
    pub sync_frame: u32,
    /// Mix weight of the earlier frame over normalized loop time.
    pub curve: Curve,
}

impl Default for Looping {
    fn default() -> Self {
        Self {
            length: 25,
            sync_frame: 25,
            curve: Curve::ramp((0.25, 0.0), (0.75, 1.0)),
        }
    }
}

impl Transform for Looping {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        format!(
            "Looping ({} frame(s), Sync : {})",
            self.length,
            self.sync_frame + 1
        )
    }

    fn output_length(&self, input_len: usize) -> usize {
        if input_len == 0 {
            0
        } else {
            self.length as usize
        }
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let i = ctx.out_index() as i64;
        let length = i64::from(self.length);
        let sync = i64::from(self.sync_frame);

        let prev = ctx.clamp_input(sync + i);
        let next = ctx.clamp_input(sync - (length - i));
        let t = ctx.out_index() as f64 / f64::from(self.length.max(1));
        let factor = self.curve.evaluate(t).clamp(0.0, 1.0) as f32;

        let a = ctx.request_input(prev)?;
        let b = ctx.request_input(next)?;
        ctx.execute(&Kernel::Blend { factor }, &[a, b])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for Looping {
    const KIND: &'static str = "loop";
    const CATEGORY: &'static str = "Sequence";
    const NAME: &'static str = "Make Loop";

    fn validate(&self) -> SeqResult<()> {
        if self.length == 0 {
            return Err(SeqError::validation("loop length must be at least 1"));
        }
        self.curve.validate()?;
        if !self.curve.spans_unit_range() {
            warn!("loop mix curve does not cover [0, 1]; the loop point will pop");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/looping.rs"]
mod tests;
