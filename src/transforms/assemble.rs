use crate::backend::kernel::{Kernel, PixelRect};
use crate::foundation::core::{Extent, Grid};
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Layout produced by [`AssembleFlipbook`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssembleMode {
    /// The first `cols * rows` frames tiled into one sheet, row-major from the top-left.
    #[default]
    FullSpriteSheet,
    /// `rows` frames, one cycle apart, stacked vertically in each output frame.
    VerticalSequence,
}

/// Tile input frames into flipbook sheets.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssembleFlipbook {
    /// Columns per sheet.
    pub cols: u32,
    /// Rows per sheet.
    pub rows: u32,
    /// Sheet layout.
    pub mode: AssembleMode,
}

impl Default for AssembleFlipbook {
    fn default() -> Self {
        Self {
            cols: 5,
            rows: 5,
            mode: AssembleMode::FullSpriteSheet,
        }
    }
}

impl AssembleFlipbook {
    /// Validated full sprite sheet of `cols` x `rows` cells.
    pub fn sheet(cols: u32, rows: u32) -> SeqResult<Self> {
        let t = Self {
            cols,
            rows,
            mode: AssembleMode::FullSpriteSheet,
        };
        t.validate()?;
        Ok(t)
    }
}

fn tile_rect(dest: Extent, col: u32, row: u32, cols: u32, rows: u32) -> PixelRect {
    let width = (dest.width / cols).max(1);
    let height = (dest.height / rows).max(1);
    PixelRect {
        x: col * width,
        y: row * height,
        width,
        height,
    }
}

impl Transform for AssembleFlipbook {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        match self.mode {
            AssembleMode::FullSpriteSheet => {
                format!("Assemble Flipbook ({}x{})", self.cols, self.rows)
            }
            AssembleMode::VerticalSequence => format!("Assemble Flipbook (*x{})", self.rows),
        }
    }

    fn output_length(&self, input_len: usize) -> usize {
        match self.mode {
            AssembleMode::FullSpriteSheet => usize::from(input_len > 0),
            AssembleMode::VerticalSequence => input_len / self.rows.max(1) as usize,
        }
    }

    fn output_size(&self, input: Extent) -> Extent {
        let rows = input.height.saturating_mul(self.rows);
        match self.mode {
            AssembleMode::FullSpriteSheet => {
                Extent::new(input.width.saturating_mul(self.cols), rows)
            }
            AssembleMode::VerticalSequence => Extent::new(input.width, rows),
        }
    }

    fn output_grid(&self, input: Grid) -> Grid {
        match self.mode {
            AssembleMode::FullSpriteSheet => Grid::new(
                input.u.saturating_mul(self.cols),
                input.v.saturating_mul(self.rows),
            ),
            AssembleMode::VerticalSequence => {
                Grid::new(input.u, input.v.saturating_mul(self.rows))
            }
        }
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let dest = ctx.dest_extent();
        match self.mode {
            AssembleMode::FullSpriteSheet => {
                for i in 0..self.cols.saturating_mul(self.rows) {
                    let src = ctx.request_input(ctx.clamp_input(i64::from(i)))?;
                    let (col, row) = (i % self.cols, i / self.cols);
                    let rect = tile_rect(dest, col, row, self.cols, self.rows);
                    ctx.execute(&Kernel::Tile { rect }, &[src])?;
                }
            }
            AssembleMode::VerticalSequence => {
                let cycle = (ctx.input_len() / self.rows.max(1) as usize) as i64;
                let frame = ctx.out_index() as i64;
                for i in 0..self.rows {
                    let index = ctx.clamp_input(i64::from(i) * cycle + frame);
                    let src = ctx.request_input(index)?;
                    let rect = tile_rect(dest, 0, i, 1, self.rows);
                    ctx.execute(&Kernel::Tile { rect }, &[src])?;
                }
            }
        }
        Ok(())
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for AssembleFlipbook {
    const KIND: &'static str = "assemble";
    const CATEGORY: &'static str = "Flipbook";
    const NAME: &'static str = "Assemble Flipbook";

    fn validate(&self) -> SeqResult<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(SeqError::validation(format!(
                "flipbook grid {}x{} must have at least one cell",
                self.cols, self.rows
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/assemble.rs"]
mod tests;
