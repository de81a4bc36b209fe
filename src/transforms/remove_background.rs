use crate::backend::kernel::Kernel;
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Rebuild colour and alpha of frames rendered over a solid background colour.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RemoveBackground {
    /// Linear background colour the frames were rendered on.
    pub background: [f32; 3],
}

impl Default for RemoveBackground {
    fn default() -> Self {
        Self {
            background: [0.25; 3],
        }
    }
}

impl Transform for RemoveBackground {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        "Remove Background".to_string()
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let src = ctx.request_input(ctx.clamp_input(ctx.out_index() as i64))?;
        let kernel = Kernel::Unblend {
            background: self.background,
        };
        ctx.execute(&kernel, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for RemoveBackground {
    const KIND: &'static str = "remove_background";
    const CATEGORY: &'static str = "Color";
    const NAME: &'static str = "Remove Background";
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/remove_background.rs"]
mod tests;
