use crate::backend::kernel::Kernel;
use crate::foundation::core::Extent;
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Remove borders from every frame.
///
/// Borders larger than the frame leave a one pixel frame after clamping.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Crop {
    /// Pixels removed on the left.
    pub left: u32,
    /// Pixels removed on the right.
    pub right: u32,
    /// Pixels removed on the top.
    pub top: u32,
    /// Pixels removed on the bottom.
    pub bottom: u32,
}

impl Transform for Crop {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        format!(
            "Crop (L{} R{} T{} B{})",
            self.left, self.right, self.top, self.bottom
        )
    }

    fn output_size(&self, input: Extent) -> Extent {
        Extent::new(
            input.width.saturating_sub(self.left).saturating_sub(self.right),
            input.height.saturating_sub(self.top).saturating_sub(self.bottom),
        )
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let index = ctx.clamp_input(ctx.out_index() as i64);
        let src = ctx.request_input(index)?;
        let kernel = Kernel::Crop {
            left: self.left,
            right: self.right,
            top: self.top,
            bottom: self.bottom,
        };
        ctx.execute(&kernel, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for Crop {
    const KIND: &'static str = "crop";
    const CATEGORY: &'static str = "Common";
    const NAME: &'static str = "Crop";
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/crop.rs"]
mod tests;
