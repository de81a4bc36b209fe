use std::sync::Arc;

/// Quarter-turn rotation applied by [`Kernel::Rotate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// 90 degrees clockwise.
    Rotate90,
    /// 180 degrees.
    Rotate180,
    /// 270 degrees clockwise.
    Rotate270,
}

impl Rotation {
    /// Whether the rotation exchanges width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }
}

/// Scalar that [`Kernel::RemapColor`] feeds through its lookup table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemapSource {
    /// Rec.709 luminance of the sRGB-encoded colour.
    #[default]
    SrgbLuminance,
    /// Rec.709 luminance of the linear colour.
    LinearLuminance,
    /// Alpha channel.
    Alpha,
    /// Linear red channel.
    Red,
    /// Linear green channel.
    Green,
    /// Linear blue channel.
    Blue,
}

/// Destination rectangle in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// One image operation understood by every [`super::ExecutionBackend`].
///
/// Unless noted otherwise a kernel reads exactly one input and resamples it to the destination
/// extent when sizes differ.
#[derive(Clone, Debug)]
pub enum Kernel {
    /// Write host pixels into the destination. No inputs.
    Upload(Arc<image::Rgba32FImage>),
    /// Copy the input.
    Copy,
    /// Resample the input to the destination extent (bilinear).
    Resample,
    /// Remove borders from the input, in input pixels.
    Crop {
        /// Pixels removed on the left.
        left: u32,
        /// Pixels removed on the right.
        right: u32,
        /// Pixels removed on the top.
        top: u32,
        /// Pixels removed on the bottom.
        bottom: u32,
    },
    /// Rotate the input by quarter turns.
    Rotate(Rotation),
    /// Linear blend of two inputs: `a * (1 - factor) + b * factor`.
    Blend {
        /// Weight of the second input.
        factor: f32,
    },
    /// Linear blend from `color` (ratio 0) to the input (ratio 1).
    Fade {
        /// Weight of the input.
        ratio: f32,
        /// Straight RGBA target colour.
        color: [f32; 4],
    },
    /// Resample the input into `rect` of the destination, leaving other pixels untouched.
    Tile {
        /// Destination rectangle.
        rect: PixelRect,
    },
    /// Extract cell `(col, row)` of a `cols` x `rows` flipbook input, top-left origin.
    SubRect {
        /// Cell column.
        col: u32,
        /// Cell row.
        row: u32,
        /// Columns in the input.
        cols: u32,
        /// Rows in the input.
        rows: u32,
    },
    /// Multiply colour by alpha, optionally replacing alpha afterwards.
    Premultiply {
        /// Alpha written after premultiplication, if any.
        alpha_override: Option<f32>,
    },
    /// Derive alpha from tinted Rec.709 luminance.
    AlphaFromRgb {
        /// Per-channel weights applied before luminance.
        tint: [f32; 3],
    },
    /// Brightness, contrast and saturation on colour, then alpha through a lookup table.
    ColorCorrection {
        /// Colour multiplier.
        brightness: f32,
        /// Scale around mid grey.
        contrast: f32,
        /// Scale away from luminance.
        saturation: f32,
        /// Output alpha sampled over input alpha in `[0, 1]`.
        alpha_lut: Arc<[f32]>,
    },
    /// Replace every pixel by a lookup-table colour indexed by `source`.
    RemapColor {
        /// Scalar used as the table position.
        source: RemapSource,
        /// Straight RGBA colours over `[0, 1]`.
        lut: Arc<[[f32; 4]]>,
    },
    /// Fade toward `color` inside border bands given as fractions of the frame size.
    FixBorders {
        /// Band widths, left, right, top and bottom.
        factors: [f32; 4],
        /// Straight RGBA colour reached at the very edge.
        color: [f32; 4],
        /// Falloff exponent of the band mask.
        exponent: f32,
    },
    /// Recover straight colour and alpha of a frame rendered over a solid background.
    Unblend {
        /// Linear background colour.
        background: [f32; 3],
    },
}

impl Kernel {
    /// Number of inputs the kernel reads.
    pub fn input_count(&self) -> usize {
        match self {
            Self::Upload(_) => 0,
            Self::Blend { .. } => 2,
            _ => 1,
        }
    }

    /// Short stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Upload(_) => "upload",
            Self::Copy => "copy",
            Self::Resample => "resample",
            Self::Crop { .. } => "crop",
            Self::Rotate(_) => "rotate",
            Self::Blend { .. } => "blend",
            Self::Fade { .. } => "fade",
            Self::Tile { .. } => "tile",
            Self::SubRect { .. } => "sub_rect",
            Self::Premultiply { .. } => "premultiply",
            Self::AlphaFromRgb { .. } => "alpha_from_rgb",
            Self::ColorCorrection { .. } => "color_correction",
            Self::RemapColor { .. } => "remap_color",
            Self::FixBorders { .. } => "fix_borders",
            Self::Unblend { .. } => "unblend",
        }
    }
}
