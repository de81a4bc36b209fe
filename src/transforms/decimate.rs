use crate::backend::kernel::Kernel;
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Keep one frame out of every `by`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Decimate {
    /// Decimation factor, at least 1.
    pub by: u32,
}

impl Default for Decimate {
    fn default() -> Self {
        Self { by: 3 }
    }
}

impl Decimate {
    /// Validated decimation by `by`.
    pub fn new(by: u32) -> SeqResult<Self> {
        let t = Self { by };
        t.validate()?;
        Ok(t)
    }
}

impl Transform for Decimate {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        format!("Decimate (1 of {})", self.by)
    }

    fn output_length(&self, input_len: usize) -> usize {
        input_len / self.by.max(1) as usize
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let index = ctx.clamp_input(ctx.out_index() as i64 * i64::from(self.by));
        let src = ctx.request_input(index)?;
        ctx.execute(&Kernel::Copy, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for Decimate {
    const KIND: &'static str = "decimate";
    const CATEGORY: &'static str = "Sequence";
    const NAME: &'static str = "Decimate";

    fn validate(&self) -> SeqResult<()> {
        if self.by == 0 {
            return Err(SeqError::validation("decimate factor must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/decimate.rs"]
mod tests;
