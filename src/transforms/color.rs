use crate::backend::kernel::Kernel;
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Multiply colour by alpha, optionally replacing alpha with a constant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PremultiplyAlpha {
    /// Replace alpha with `alpha_value` after multiplying.
    pub remove_alpha: bool,
    /// Alpha written when `remove_alpha` is set.
    pub alpha_value: f32,
}

impl Default for PremultiplyAlpha {
    fn default() -> Self {
        Self {
            remove_alpha: false,
            alpha_value: 1.0,
        }
    }
}

impl Transform for PremultiplyAlpha {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        if self.remove_alpha {
            format!("Premultiply Alpha (alpha = {})", self.alpha_value)
        } else {
            "Premultiply Alpha".to_string()
        }
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let src = ctx.request_input(ctx.clamp_input(ctx.out_index() as i64))?;
        let kernel = Kernel::Premultiply {
            alpha_override: self.remove_alpha.then_some(self.alpha_value),
        };
        ctx.execute(&kernel, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for PremultiplyAlpha {
    const KIND: &'static str = "premultiply_alpha";
    const CATEGORY: &'static str = "Color";
    const NAME: &'static str = "Premultiply Alpha";

    fn validate(&self) -> SeqResult<()> {
        if !(0.0..=1.0).contains(&self.alpha_value) {
            return Err(SeqError::validation(format!(
                "alpha value {} outside [0, 1]",
                self.alpha_value
            )));
        }
        Ok(())
    }
}

/// Derive alpha from tinted luminance.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AlphaFromRgb {
    /// Per-channel weights applied before luminance.
    pub tint: [f32; 3],
}

impl Default for AlphaFromRgb {
    fn default() -> Self {
        Self { tint: [1.0; 3] }
    }
}

impl Transform for AlphaFromRgb {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        "Alpha From RGB".to_string()
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let src = ctx.request_input(ctx.clamp_input(ctx.out_index() as i64))?;
        ctx.execute(&Kernel::AlphaFromRgb { tint: self.tint }, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for AlphaFromRgb {
    const KIND: &'static str = "alpha_from_rgb";
    const CATEGORY: &'static str = "Color";
    const NAME: &'static str = "Alpha From RGB";
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/color.rs"]
mod tests;
