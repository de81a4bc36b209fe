use crate::backend::kernel::{Kernel, Rotation};
use crate::foundation::core::{Extent, Grid};
use crate::foundation::error::SeqResult;
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{Transform, TransformKind, params_of};

/// Rotate every frame by quarter turns. Quarter turns also swap the flipbook grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Rotate {
    /// Quarter turns applied.
    pub mode: Rotation,
}

impl Rotate {
    /// Rotation by `mode`.
    pub fn new(mode: Rotation) -> Self {
        Self { mode }
    }
}

impl Transform for Rotate {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        format!("Rotate ({:?})", self.mode)
    }

    fn output_size(&self, input: Extent) -> Extent {
        if self.mode.swaps_axes() {
            input.swapped()
        } else {
            input
        }
    }

    fn output_grid(&self, input: Grid) -> Grid {
        if self.mode.swaps_axes() {
            input.swapped()
        } else {
            input
        }
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let index = ctx.clamp_input(ctx.out_index() as i64);
        let src = ctx.request_input(index)?;
        ctx.execute(&Kernel::Rotate(self.mode), &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for Rotate {
    const KIND: &'static str = "rotate";
    const CATEGORY: &'static str = "Common";
    const NAME: &'static str = "Rotate";
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/rotate.rs"]
mod tests;
