use crate::foundation::error::{SeqError, SeqResult};

/// Largest width or height a computed frame may have.
pub const MAX_EXTENT: u32 = 8192;

/// Frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Extent {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Extent {
    /// Create an extent from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Create a validated extent with both axes non-zero.
    pub fn non_empty(width: u32, height: u32) -> SeqResult<Self> {
        if width == 0 || height == 0 {
            return Err(SeqError::validation(format!(
                "extent must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Clamp both axes into `[1, MAX_EXTENT]`.
    pub fn clamp_to_limits(self) -> Self {
        Self {
            width: self.width.clamp(1, MAX_EXTENT),
            height: self.height.clamp(1, MAX_EXTENT),
        }
    }

    /// Width and height exchanged.
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Number of pixels.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Flipbook subdivision of a frame: `u` columns by `v` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Grid {
    /// Columns.
    pub u: u32,
    /// Rows.
    pub v: u32,
}

impl Grid {
    /// A frame holding a single cell.
    pub const SINGLE: Self = Self { u: 1, v: 1 };

    /// Create a grid from columns and rows.
    pub const fn new(u: u32, v: u32) -> Self {
        Self { u, v }
    }

    /// Columns and rows exchanged.
    pub fn swapped(self) -> Self {
        Self {
            u: self.v,
            v: self.u,
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Stable identity of a processing node, independent of its position in the pipeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Clamp a possibly negative or oversized index into `[0, len - 1]`.
///
/// Empty sequences clamp to `0`.
pub fn clamp_index(index: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = (len - 1) as i64;
    index.clamp(0, max) as usize
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
