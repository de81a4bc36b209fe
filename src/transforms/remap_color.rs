use std::sync::Arc;

use crate::animation::gradient::Gradient;
use crate::backend::kernel::{Kernel, RemapSource};
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{LUT_SIZE, Transform, TransformKind, params_of};

/// Replace colours by a gradient sampled at a per-pixel scalar.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RemapColor {
    /// Scalar the gradient is sampled at.
    pub source: RemapSource,
    /// Output colours over `[0, 1]`.
    pub gradient: Gradient,
}

impl Transform for RemapColor {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        format!("Remap Color ({:?})", self.source)
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let src = ctx.request_input(ctx.clamp_input(ctx.out_index() as i64))?;
        let kernel = Kernel::RemapColor {
            source: self.source,
            lut: Arc::from(self.gradient.bake(LUT_SIZE)),
        };
        ctx.execute(&kernel, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for RemapColor {
    const KIND: &'static str = "remap_color";
    const CATEGORY: &'static str = "Color";
    const NAME: &'static str = "Remap Color";

    fn validate(&self) -> SeqResult<()> {
        self.gradient.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/remap_color.rs"]
mod tests;
