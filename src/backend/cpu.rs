use std::borrow::Cow;

use image::{Rgba, Rgba32FImage, imageops};

use crate::backend::kernel::{Kernel, PixelRect, RemapSource, Rotation};
use crate::backend::{BackendStats, ExecutionBackend, ImageHandle};
use crate::foundation::core::Extent;
use crate::foundation::error::{SeqError, SeqResult};

const FILTER: imageops::FilterType = imageops::FilterType::Triangle;

/// Linear-float RGBA backend running every kernel on the CPU.
///
/// Images live in a slot table; released slots are recycled through a free list.
#[derive(Debug, Default)]
pub struct CpuBackend {
    slots: Vec<Option<Rgba32FImage>>,
    free: Vec<u32>,
    stats: BackendStats,
}

impl CpuBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn image(&self, handle: ImageHandle) -> SeqResult<&Rgba32FImage> {
        self.slots
            .get(handle.0 as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| SeqError::backend(format!("unknown image handle {}", handle.0)))
    }

    fn run(
        &self,
        kernel: &Kernel,
        inputs: &[ImageHandle],
        dst: &mut Rgba32FImage,
    ) -> SeqResult<()> {
        let extent = Extent::new(dst.width(), dst.height());
        match kernel {
            Kernel::Upload(src) => {
                *dst = fit(src, extent).into_owned();
            }
            Kernel::Copy | Kernel::Resample => {
                *dst = fit(self.image(inputs[0])?, extent).into_owned();
            }
            Kernel::Crop {
                left,
                right,
                top,
                bottom,
            } => {
                let src = self.image(inputs[0])?;
                let x = (*left).min(src.width().saturating_sub(1));
                let y = (*top).min(src.height().saturating_sub(1));
                let w = src.width().saturating_sub(*left).saturating_sub(*right).max(1);
                let h = src.height().saturating_sub(*top).saturating_sub(*bottom).max(1);
                let cropped = imageops::crop_imm(src, x, y, w, h).to_image();
                *dst = fit(&cropped, extent).into_owned();
            }
            Kernel::Rotate(rotation) => {
                let src = self.image(inputs[0])?;
                let rotated = match rotation {
                    Rotation::None => src.clone(),
                    Rotation::Rotate90 => imageops::rotate90(src),
                    Rotation::Rotate180 => imageops::rotate180(src),
                    Rotation::Rotate270 => imageops::rotate270(src),
                };
                *dst = fit(&rotated, extent).into_owned();
            }
            Kernel::Blend { factor } => {
                let a = fit(self.image(inputs[0])?, extent);
                let b = fit(self.image(inputs[1])?, extent);
                let t = factor.clamp(0.0, 1.0);
                for ((d, pa), pb) in dst.pixels_mut().zip(a.pixels()).zip(b.pixels()) {
                    *d = lerp_px(pa, pb, t);
                }
            }
            Kernel::Fade { ratio, color } => {
                let src = fit(self.image(inputs[0])?, extent);
                let target = Rgba(*color);
                let t = ratio.clamp(0.0, 1.0);
                for (d, s) in dst.pixels_mut().zip(src.pixels()) {
                    *d = lerp_px(&target, s, t);
                }
            }
            Kernel::Tile { rect } => {
                check_rect(*rect, extent)?;
                let src = self.image(inputs[0])?;
                let tile = fit(src, Extent::new(rect.width, rect.height));
                imageops::replace(dst, tile.as_ref(), i64::from(rect.x), i64::from(rect.y));
            }
            Kernel::SubRect {
                col,
                row,
                cols,
                rows,
            } => {
                if *cols == 0 || *rows == 0 {
                    return Err(SeqError::backend("sub_rect needs at least one cell"));
                }
                let src = self.image(inputs[0])?;
                let cell_w = (src.width() / cols).max(1);
                let cell_h = (src.height() / rows).max(1);
                let x = (col * cell_w).min(src.width().saturating_sub(cell_w));
                let y = (row * cell_h).min(src.height().saturating_sub(cell_h));
                let cell = imageops::crop_imm(src, x, y, cell_w, cell_h).to_image();
                *dst = fit(&cell, extent).into_owned();
            }
            Kernel::Premultiply { alpha_override } => {
                let src = fit(self.image(inputs[0])?, extent);
                for (d, s) in dst.pixels_mut().zip(src.pixels()) {
                    let [r, g, b, a] = s.0;
                    *d = Rgba([r * a, g * a, b * a, alpha_override.unwrap_or(a)]);
                }
            }
            Kernel::AlphaFromRgb { tint } => {
                let src = fit(self.image(inputs[0])?, extent);
                for (d, s) in dst.pixels_mut().zip(src.pixels()) {
                    let [r, g, b, _] = s.0;
                    let luma = luminance([r * tint[0], g * tint[1], b * tint[2]]);
                    *d = Rgba([r, g, b, luma.clamp(0.0, 1.0)]);
                }
            }
            Kernel::ColorCorrection {
                brightness,
                contrast,
                saturation,
                alpha_lut,
            } => {
                if alpha_lut.is_empty() {
                    return Err(SeqError::backend("color_correction needs an alpha table"));
                }
                let src = fit(self.image(inputs[0])?, extent);
                for (d, s) in dst.pixels_mut().zip(src.pixels()) {
                    let [r, g, b, a] = s.0;
                    let mut c = [r, g, b].map(|v| (v * brightness - 0.5) * contrast + 0.5);
                    let l = luminance(c);
                    c = c.map(|v| l + (v - l) * saturation);
                    let (lo, hi, f) = lut_position(alpha_lut.len(), a);
                    let alpha = alpha_lut[lo] + (alpha_lut[hi] - alpha_lut[lo]) * f;
                    *d = Rgba([c[0], c[1], c[2], alpha]);
                }
            }
            Kernel::RemapColor { source, lut } => {
                if lut.is_empty() {
                    return Err(SeqError::backend("remap_color needs a colour table"));
                }
                let src = fit(self.image(inputs[0])?, extent);
                for (d, s) in dst.pixels_mut().zip(src.pixels()) {
                    let [r, g, b, a] = s.0;
                    let t = match source {
                        RemapSource::SrgbLuminance => luminance([r, g, b].map(linear_to_srgb)),
                        RemapSource::LinearLuminance => luminance([r, g, b]),
                        RemapSource::Alpha => a,
                        RemapSource::Red => r,
                        RemapSource::Green => g,
                        RemapSource::Blue => b,
                    };
                    let (lo, hi, f) = lut_position(lut.len(), t);
                    *d = lerp_px(&Rgba(lut[lo]), &Rgba(lut[hi]), f);
                }
            }
            Kernel::FixBorders {
                factors,
                color,
                exponent,
            } => {
                let src = fit(self.image(inputs[0])?, extent);
                let target = Rgba(*color);
                let (w, h) = (extent.width as f32, extent.height as f32);
                for (x, y, d) in dst.enumerate_pixels_mut() {
                    let u = (x as f32 + 0.5) / w;
                    let v = (y as f32 + 0.5) / h;
                    let mask = [u, 1.0 - u, v, 1.0 - v]
                        .iter()
                        .zip(factors)
                        .map(|(dist, band)| band_weight(*dist, *band))
                        .product::<f32>();
                    *d = lerp_px(&target, src.get_pixel(x, y), mask.powf(*exponent));
                }
            }
            Kernel::Unblend { background } => {
                let src = fit(self.image(inputs[0])?, extent);
                for (d, s) in dst.pixels_mut().zip(src.pixels()) {
                    *d = unblend(s, *background);
                }
            }
        }
        Ok(())
    }
}

impl ExecutionBackend for CpuBackend {
    fn allocate(&mut self, extent: Extent) -> SeqResult<ImageHandle> {
        if extent.width == 0 || extent.height == 0 {
            return Err(SeqError::backend(format!("cannot allocate empty image {extent}")));
        }
        let img = Rgba32FImage::new(extent.width, extent.height);
        let idx = match self.free.pop() {
            Some(i) => {
                self.slots[i as usize] = Some(img);
                i
            }
            None => {
                let i = u32::try_from(self.slots.len())
                    .map_err(|_| SeqError::backend("image slot table exhausted"))?;
                self.slots.push(Some(img));
                i
            }
        };
        self.stats.live += 1;
        self.stats.allocations += 1;
        Ok(ImageHandle(idx))
    }

    fn release(&mut self, handle: ImageHandle) {
        let Some(slot) = self.slots.get_mut(handle.0 as usize) else {
            return;
        };
        if slot.take().is_some() {
            self.free.push(handle.0);
            self.stats.live = self.stats.live.saturating_sub(1);
            self.stats.releases += 1;
        }
    }

    fn execute(
        &mut self,
        kernel: &Kernel,
        inputs: &[ImageHandle],
        dest: ImageHandle,
    ) -> SeqResult<()> {
        if inputs.len() != kernel.input_count() {
            return Err(SeqError::backend(format!(
                "kernel '{}' expects {} input(s), got {}",
                kernel.name(),
                kernel.input_count(),
                inputs.len()
            )));
        }
        if inputs.contains(&dest) {
            return Err(SeqError::backend(format!(
                "kernel '{}' cannot read its own destination",
                kernel.name()
            )));
        }

        let mut dst = self
            .slots
            .get_mut(dest.0 as usize)
            .and_then(Option::take)
            .ok_or_else(|| SeqError::backend(format!("unknown image handle {}", dest.0)))?;
        let result = self.run(kernel, inputs, &mut dst);
        self.slots[dest.0 as usize] = Some(dst);
        self.stats.executions += 1;
        result
    }

    fn read_back(&self, handle: ImageHandle) -> SeqResult<Rgba32FImage> {
        self.image(handle).cloned()
    }

    fn stats(&self) -> BackendStats {
        self.stats
    }
}

fn fit(src: &Rgba32FImage, extent: Extent) -> Cow<'_, Rgba32FImage> {
    if src.width() == extent.width && src.height() == extent.height {
        Cow::Borrowed(src)
    } else {
        Cow::Owned(imageops::resize(src, extent.width, extent.height, FILTER))
    }
}

fn lerp_px(a: &Rgba<f32>, b: &Rgba<f32>, t: f32) -> Rgba<f32> {
    let mut out = [0.0f32; 4];
    for (i, o) in out.iter_mut().enumerate() {
        *o = a.0[i] + (b.0[i] - a.0[i]) * t;
    }
    Rgba(out)
}

fn luminance([r, g, b]: [f32; 3]) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn linear_to_srgb(v: f32) -> f32 {
    let v = v.clamp(0.0, 1.0);
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Neighbouring table entries around `t` in `[0, 1]` and the weight of the upper one.
fn lut_position(len: usize, t: f32) -> (usize, usize, f32) {
    let last = len.saturating_sub(1);
    let x = t.clamp(0.0, 1.0) * last as f32;
    let lo = (x.floor() as usize).min(last);
    (lo, (lo + 1).min(last), x - lo as f32)
}

fn band_weight(dist: f32, band: f32) -> f32 {
    if band > 0.0 {
        (dist / band).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Invert `c = fg * a + bg * (1 - a)` with the smallest alpha that keeps `fg` in `[0, 1]`.
fn unblend(s: &Rgba<f32>, bg: [f32; 3]) -> Rgba<f32> {
    const EPS: f32 = 1e-6;
    let [r, g, b, src_alpha] = s.0;
    let c = [r, g, b];
    let alpha = (0..3)
        .map(|i| {
            let diff = c[i] - bg[i];
            if diff > 0.0 && 1.0 - bg[i] > EPS {
                diff / (1.0 - bg[i])
            } else if diff < 0.0 && bg[i] > EPS {
                -diff / bg[i]
            } else {
                0.0
            }
        })
        .fold(0.0f32, f32::max)
        .clamp(0.0, 1.0);
    if alpha <= EPS {
        return Rgba([0.0, 0.0, 0.0, 0.0]);
    }
    let fg: [f32; 3] = std::array::from_fn(|i| (c[i] - bg[i] * (1.0 - alpha)) / alpha);
    Rgba([fg[0], fg[1], fg[2], alpha * src_alpha])
}

fn check_rect(rect: PixelRect, extent: Extent) -> SeqResult<()> {
    let fits = rect.width > 0
        && rect.height > 0
        && rect.x.checked_add(rect.width).is_some_and(|r| r <= extent.width)
        && rect.y.checked_add(rect.height).is_some_and(|b| b <= extent.height);
    if fits {
        Ok(())
    } else {
        Err(SeqError::backend(format!(
            "tile rect {}x{}+{}+{} outside destination {extent}",
            rect.width, rect.height, rect.x, rect.y
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/backend/cpu.rs"]
mod tests;
