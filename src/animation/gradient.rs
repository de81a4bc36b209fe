use crate::foundation::error::{SeqError, SeqResult};

/// One colour stop of a [`Gradient`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientKey {
    /// Stop position in `[0, 1]`.
    pub time: f32,
    /// Straight RGBA colour at `time`.
    pub color: [f32; 4],
}

/// Linear colour ramp over sorted stops, clamped outside the first and last stop.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Gradient {
    keys: Vec<GradientKey>,
}

impl Default for Gradient {
    /// Transparent black to opaque white.
    fn default() -> Self {
        Self {
            keys: vec![
                GradientKey {
                    time: 0.0,
                    color: [0.0, 0.0, 0.0, 0.0],
                },
                GradientKey {
                    time: 1.0,
                    color: [1.0; 4],
                },
            ],
        }
    }
}

impl Gradient {
    /// Build a validated gradient.
    pub fn new(keys: Vec<GradientKey>) -> SeqResult<Self> {
        let gradient = Self { keys };
        gradient.validate()?;
        Ok(gradient)
    }

    /// Borrow the stops.
    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }

    /// Check the stops are non-empty, finite and sorted by time.
    pub fn validate(&self) -> SeqResult<()> {
        if self.keys.is_empty() {
            return Err(SeqError::validation("gradient must have at least one stop"));
        }
        let finite = self
            .keys
            .iter()
            .all(|k| k.time.is_finite() && k.color.iter().all(|c| c.is_finite()));
        if !finite {
            return Err(SeqError::validation("gradient stops must be finite"));
        }
        if !self.keys.windows(2).all(|w| w[0].time <= w[1].time) {
            return Err(SeqError::validation("gradient stops must be sorted by time"));
        }
        Ok(())
    }

    /// Colour at `t`.
    pub fn evaluate(&self, t: f32) -> [f32; 4] {
        let Some(first) = self.keys.first() else {
            return [0.0; 4];
        };
        let idx = self.keys.partition_point(|k| k.time <= t);
        if idx == 0 {
            return first.color;
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].color;
        }
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.time - a.time;
        if span <= 0.0 {
            return a.color;
        }
        let f = (t - a.time) / span;
        std::array::from_fn(|i| a.color[i] + (b.color[i] - a.color[i]) * f)
    }

    /// `samples` colours evenly spaced over `[0, 1]`.
    pub fn bake(&self, samples: usize) -> Vec<[f32; 4]> {
        let last = samples.saturating_sub(1).max(1) as f32;
        (0..samples).map(|i| self.evaluate(i as f32 / last)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/gradient.rs"]
mod tests;
