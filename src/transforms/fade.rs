use crate::animation::curve::Curve;
use crate::backend::kernel::Kernel;
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Fade frames toward a flat colour along a curve over normalized sequence time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Fade {
    /// Input weight over time; 1 keeps the input, 0 gives `color`.
    pub curve: Curve,
    /// Straight RGBA target colour.
    pub color: [f32; 4],
}

impl Default for Fade {
    fn default() -> Self {
        Self {
            curve: Curve::ramp((0.85, 1.0), (1.0, 0.0)),
            color: [0.25, 0.25, 0.25, 0.0],
        }
    }
}

impl Transform for Fade {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        "Fade".to_string()
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let t = ctx.out_index() as f64 / ctx.output_len().max(1) as f64;
        let ratio = self.curve.evaluate(t) as f32;
        let index = ctx.clamp_input(ctx.out_index() as i64);
        let src = ctx.request_input(index)?;
        ctx.execute(
            &Kernel::Fade {
                ratio,
                color: self.color,
            },
            &[src],
        )
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for Fade {
    const KIND: &'static str = "fade";
    const CATEGORY: &'static str = "Sequence";
    const NAME: &'static str = "Fade";

    fn validate(&self) -> SeqResult<()> {
        self.curve.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/fade.rs"]
mod tests;
