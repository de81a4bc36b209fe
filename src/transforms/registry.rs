use std::collections::BTreeMap;

use crate::foundation::error::{SeqError, SeqResult};
use crate::transforms::assemble::AssembleFlipbook;
use crate::transforms::break_flipbook::BreakFlipbook;
use crate::transforms::color::{AlphaFromRgb, PremultiplyAlpha};
use crate::transforms::color_correction::ColorCorrection;
use crate::transforms::crop::Crop;
use crate::transforms::decimate::Decimate;
use crate::transforms::fade::Fade;
use crate::transforms::fix_borders::FixBorders;
use crate::transforms::looping::Looping;
use crate::transforms::remap_color::RemapColor;
use crate::transforms::remove_background::RemoveBackground;
use crate::transforms::resize::Resize;
use crate::transforms::retime::Retime;
use crate::transforms::rotate::Rotate;
use crate::transforms::{Transform, TransformKind};

type Factory = fn(serde_json::Value) -> SeqResult<Box<dyn Transform>>;

/// Menu entry describing a registered kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindInfo {
    /// Registry tag.
    pub kind: &'static str,
    /// Menu category.
    pub category: &'static str,
    /// Menu name.
    pub name: &'static str,
}

#[derive(Clone, Copy)]
struct Entry {
    info: KindInfo,
    factory: Factory,
}

/// Constructs transforms from `(kind, params)` pairs.
#[derive(Clone, Default)]
pub struct TransformRegistry {
    entries: BTreeMap<&'static str, Entry>,
}

impl std::fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

impl TransformRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in transform.
    pub fn builtin() -> Self {
        let mut r = Self::new();
        r.register::<Decimate>();
        r.register::<Resize>();
        r.register::<Crop>();
        r.register::<Rotate>();
        r.register::<FixBorders>();
        r.register::<Retime>();
        r.register::<Looping>();
        r.register::<Fade>();
        r.register::<AssembleFlipbook>();
        r.register::<BreakFlipbook>();
        r.register::<PremultiplyAlpha>();
        r.register::<AlphaFromRgb>();
        r.register::<ColorCorrection>();
        r.register::<RemapColor>();
        r.register::<RemoveBackground>();
        r
    }

    /// Register `T` under [`TransformKind::KIND`], replacing any previous entry.
    pub fn register<T: TransformKind>(&mut self) -> &mut Self {
        self.entries.insert(
            T::KIND,
            Entry {
                info: KindInfo {
                    kind: T::KIND,
                    category: T::CATEGORY,
                    name: T::NAME,
                },
                factory: build::<T>,
            },
        );
        self
    }

    /// Whether `kind` is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Registered kinds, sorted by tag.
    pub fn kinds(&self) -> impl Iterator<Item = KindInfo> + '_ {
        self.entries.values().map(|e| e.info)
    }

    /// Build a transform of `kind` from JSON parameters. `null` selects the defaults.
    pub fn create(&self, kind: &str, params: serde_json::Value) -> SeqResult<Box<dyn Transform>> {
        let entry = self
            .entries
            .get(kind)
            .ok_or_else(|| SeqError::validation(format!("unknown transform kind '{kind}'")))?;
        (entry.factory)(params)
    }

    /// Build a transform of `kind` with default parameters.
    pub fn create_default(&self, kind: &str) -> SeqResult<Box<dyn Transform>> {
        self.create(kind, serde_json::Value::Null)
    }
}

fn build<T: TransformKind>(params: serde_json::Value) -> SeqResult<Box<dyn Transform>> {
    let t = if params.is_null() {
        T::default()
    } else {
        serde_json::from_value::<T>(params)
            .map_err(|e| SeqError::serde(format!("{} params: {e}", T::KIND)))?
    };
    t.validate()?;
    Ok(Box::new(t))
}

#[cfg(test)]
#[path = "../../tests/unit/transforms/registry.rs"]
mod tests;
