use crate::animation::ease::Ease;
use crate::foundation::error::{SeqError, SeqResult};

/// One key of a [`Curve`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    /// Key position on the curve's time axis.
    pub time: f64,
    /// Value at `time`.
    pub value: f64,
    /// Ease applied toward the next key.
    #[serde(default)]
    pub ease: Ease,
}

impl CurveKey {
    /// Linear key at `(time, value)`.
    pub fn linear(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            ease: Ease::Linear,
        }
    }
}

/// Piecewise curve over sorted keys.
///
/// Sampling before the first key returns the first value, after the last key the last value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Curve {
    keys: Vec<CurveKey>,
}

impl Curve {
    /// Build a validated curve. Keys must be finite and sorted by time.
    pub fn new(keys: Vec<CurveKey>) -> SeqResult<Self> {
        let curve = Self { keys };
        curve.validate()?;
        Ok(curve)
    }

    /// Linear curve through `(time, value)` pairs.
    pub fn linear(points: &[(f64, f64)]) -> SeqResult<Self> {
        Self::new(
            points
                .iter()
                .map(|&(t, v)| CurveKey::linear(t, v))
                .collect(),
        )
    }

    /// Linear ramp between two points. Keys out of order are rejected by [`Curve::validate`].
    pub fn ramp(from: (f64, f64), to: (f64, f64)) -> Self {
        Self {
            keys: vec![CurveKey::linear(from.0, from.1), CurveKey::linear(to.0, to.1)],
        }
    }

    /// Borrow the keys.
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Check sortedness and finiteness. Deserialized curves are validated by their owners.
    pub fn validate(&self) -> SeqResult<()> {
        if self.keys.is_empty() {
            return Err(SeqError::validation("curve must have at least one key"));
        }
        if self
            .keys
            .iter()
            .any(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(SeqError::validation("curve keys must be finite"));
        }
        if !self.keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(SeqError::validation("curve keys must be sorted by time"));
        }
        Ok(())
    }

    /// Sample the curve at `t`.
    pub fn evaluate(&self, t: f64) -> f64 {
        let Some(first) = self.keys.first() else {
            return 0.0;
        };
        let idx = self.keys.partition_point(|k| k.time <= t);
        if idx == 0 {
            return first.value;
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value;
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.time - a.time;
        if span <= 0.0 {
            return a.value;
        }
        let te = a.ease.apply((t - a.time) / span);
        a.value + (b.value - a.value) * te
    }

    /// `samples` values evenly spaced over `t` in `[0, 1]`.
    pub fn bake(&self, samples: usize) -> Vec<f32> {
        let last = samples.saturating_sub(1).max(1) as f64;
        (0..samples)
            .map(|i| self.evaluate(i as f64 / last) as f32)
            .collect()
    }

    /// Whether the curve starts at or below 0 and ends at or above 1.
    ///
    /// Mix curves that do not cover the full range produce visible pops at the loop point.
    pub fn spans_unit_range(&self) -> bool {
        match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => {
                self.keys.len() >= 2 && first.value <= 0.0 && last.value >= 1.0
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
