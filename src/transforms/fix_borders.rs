use crate::backend::kernel::Kernel;
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Fade frame edges toward a flat colour so flipbook cells do not bleed into each other.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FixBorders {
    /// Band widths as fractions of the frame: left, right, top, bottom.
    pub factors: [f32; 4],
    /// Linear colour reached at the edge.
    pub color: [f32; 3],
    /// Alpha reached at the edge.
    pub alpha: f32,
    /// Falloff exponent in `[0.5, 4]`.
    pub exponent: f32,
}

impl Default for FixBorders {
    fn default() -> Self {
        Self {
            factors: [0.0; 4],
            color: [0.0; 3],
            alpha: 0.0,
            exponent: 1.5,
        }
    }
}

impl Transform for FixBorders {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        let [l, r, t, b] = self.factors;
        format!("Fix Borders (L{l} R{r} T{t} B{b})")
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let src = ctx.request_input(ctx.clamp_input(ctx.out_index() as i64))?;
        let [r, g, b] = self.color;
        let kernel = Kernel::FixBorders {
            factors: self.factors,
            color: [r, g, b, self.alpha],
            exponent: self.exponent,
        };
        ctx.execute(&kernel, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for FixBorders {
    const KIND: &'static str = "fix_borders";
    const CATEGORY: &'static str = "Common";
    const NAME: &'static str = "Fix Borders";

    fn validate(&self) -> SeqResult<()> {
        if !self.factors.iter().all(|f| (0.0..=1.0).contains(f)) {
            return Err(SeqError::validation("border factors must lie in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(SeqError::validation(format!(
                "border alpha {} outside [0, 1]",
                self.alpha
            )));
        }
        if !(0.5..=4.0).contains(&self.exponent) {
            return Err(SeqError::validation(format!(
                "border exponent {} outside [0.5, 4]",
                self.exponent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/fix_borders.rs"]
mod tests;
