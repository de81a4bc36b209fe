use crate::backend::kernel::Kernel;
use crate::foundation::core::{Extent, MAX_EXTENT};
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Resample every frame to a fixed extent.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Resize {
    /// Target width.
    pub width: u32,
    /// Target height.
    pub height: u32,
}

impl Default for Resize {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
        }
    }
}

impl Resize {
    /// Validated resize to `width` x `height`.
    pub fn new(width: u32, height: u32) -> SeqResult<Self> {
        let t = Self { width, height };
        t.validate()?;
        Ok(t)
    }
}

impl Transform for Resize {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        format!("Resize ({}x{})", self.width, self.height)
    }

    fn output_size(&self, _input: Extent) -> Extent {
        Extent::new(self.width, self.height)
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let index = ctx.clamp_input(ctx.out_index() as i64);
        let src = ctx.request_input(index)?;
        ctx.execute(&Kernel::Resample, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for Resize {
    const KIND: &'static str = "resize";
    const CATEGORY: &'static str = "Common";
    const NAME: &'static str = "Resize";

    fn validate(&self) -> SeqResult<()> {
        let range = 1..=MAX_EXTENT;
        if !range.contains(&self.width) || !range.contains(&self.height) {
            return Err(SeqError::validation(format!(
                "resize extent {}x{} outside 1..={MAX_EXTENT}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/resize.rs"]
mod tests;
