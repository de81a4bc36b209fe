use crate::backend::kernel::Kernel;
use crate::foundation::core::Extent;
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Largest number of frames a flipbook may be broken into.
pub const MAX_BREAK_FRAMES: u32 = 4096;

/// Split the first input frame, a `cols` x `rows` flipbook, into one frame per cell.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BreakFlipbook {
    /// Columns in the flipbook.
    pub cols: u32,
    /// Rows in the flipbook.
    pub rows: u32,
}

impl Default for BreakFlipbook {
    fn default() -> Self {
        Self { cols: 5, rows: 5 }
    }
}

impl BreakFlipbook {
    /// Validated `cols` x `rows` split.
    pub fn new(cols: u32, rows: u32) -> SeqResult<Self> {
        let t = Self { cols, rows };
        t.validate()?;
        Ok(t)
    }
}

impl Transform for BreakFlipbook {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        format!(
            "Break Flipbook ({}x{}): {} frame(s).",
            self.cols,
            self.rows,
            self.cols.saturating_mul(self.rows)
        )
    }

    fn output_length(&self, input_len: usize) -> usize {
        if input_len == 0 {
            0
        } else {
            self.cols.saturating_mul(self.rows) as usize
        }
    }

    fn output_size(&self, input: Extent) -> Extent {
        Extent::new(
            input.width.div_ceil(self.cols.max(1)),
            input.height.div_ceil(self.rows.max(1)),
        )
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let frame = ctx.out_index() as u32;
        let src = ctx.request_input(0)?;
        let kernel = Kernel::SubRect {
            col: frame % self.cols.max(1),
            row: frame / self.cols.max(1),
            cols: self.cols,
            rows: self.rows,
        };
        ctx.execute(&kernel, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for BreakFlipbook {
    const KIND: &'static str = "break_flipbook";
    const CATEGORY: &'static str = "Flipbook";
    const NAME: &'static str = "Break Flipbook";

    fn validate(&self) -> SeqResult<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(SeqError::validation(format!(
                "flipbook grid {}x{} must have at least one cell",
                self.cols, self.rows
            )));
        }
        if self.cols.saturating_mul(self.rows) > MAX_BREAK_FRAMES {
            return Err(SeqError::validation(format!(
                "breaking {}x{} would produce more than {MAX_BREAK_FRAMES} frames",
                self.cols, self.rows
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/break_flipbook.rs"]
mod tests;
