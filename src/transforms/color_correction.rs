use std::sync::Arc;

use crate::animation::curve::Curve;
use crate::backend::kernel::Kernel;
use crate::foundation::error::{SeqError, SeqResult};
use crate::pipeline::context::ProcessCtx;
use crate::transforms::{LUT_SIZE, Transform, TransformKind, params_of};

/// Brightness, contrast and saturation adjustment with an alpha remapping curve.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorCorrection {
    /// Colour multiplier in `[0, 2]`.
    pub brightness: f32,
    /// Contrast around mid grey in `[0, 2]`.
    pub contrast: f32,
    /// Saturation in `[0, 2]`; 0 is greyscale.
    pub saturation: f32,
    /// Output alpha over input alpha.
    pub alpha_curve: Curve,
}

impl Default for ColorCorrection {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            alpha_curve: Curve::ramp((0.0, 0.0), (1.0, 1.0)),
        }
    }
}

impl Transform for ColorCorrection {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn label(&self) -> String {
        "Color Correction".to_string()
    }

    fn process(&self, ctx: &mut ProcessCtx<'_>) -> SeqResult<()> {
        let src = ctx.request_input(ctx.clamp_input(ctx.out_index() as i64))?;
        let kernel = Kernel::ColorCorrection {
            brightness: self.brightness,
            contrast: self.contrast,
            saturation: self.saturation,
            alpha_lut: Arc::from(self.alpha_curve.bake(LUT_SIZE)),
        };
        ctx.execute(&kernel, &[src])
    }

    fn params(&self) -> SeqResult<serde_json::Value> {
        params_of(self)
    }
}

impl TransformKind for ColorCorrection {
    const KIND: &'static str = "color_correction";
    const CATEGORY: &'static str = "Color";
    const NAME: &'static str = "Color Correction";

    fn validate(&self) -> SeqResult<()> {
        for (name, v) in [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
        ] {
            if !(0.0..=2.0).contains(&v) {
                return Err(SeqError::validation(format!("{name} {v} outside [0, 2]")));
            }
        }
        self.alpha_curve.validate()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/color_correction.rs"]
mod tests;
