/// LodData: per-model level table and distance thresholds.
///
/// Level 0 is the base model and is always present. Coarser levels map to
/// alternate models and may have gaps (a model can register levels 0, 1
/// and 3 only). Threshold `i` is the largest adjusted distance at which
/// level `i` is still the nominal level.

use std::collections::BTreeMap;
use crate::engine_err;
use crate::error::Result;
use crate::scene::ModelKey;

const SOURCE: &str = "galaxy3d::LodSystem";

/// Integer index used for the culled level when exposed as a number.
pub const LOD_CULLED: i32 = -1;

/// A discrete detail level.
///
/// Ordering follows coarseness: `Level(0) < Level(1) < ... < Culled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LodLevel {
    /// Draw the model registered at this level (0 = most detailed)
    Level(u32),
    /// Beyond the render distance: do not draw
    Culled,
}

impl LodLevel {
    /// Level index, `None` when culled.
    pub fn index(self) -> Option<u32> {
        match self {
            LodLevel::Level(index) => Some(index),
            LodLevel::Culled => None,
        }
    }

    /// Integer form: the level index, or `LOD_CULLED`.
    pub fn as_i32(self) -> i32 {
        match self {
            LodLevel::Level(index) => i32::try_from(index).unwrap_or(i32::MAX),
            LodLevel::Culled => LOD_CULLED,
        }
    }

    /// Inverse of `as_i32`: negative values map to `Culled`.
    pub fn from_i32(value: i32) -> Self {
        u32::try_from(value).map_or(LodLevel::Culled, LodLevel::Level)
    }

    pub fn is_culled(self) -> bool {
        self == LodLevel::Culled
    }
}

impl Default for LodLevel {
    fn default() -> Self {
        LodLevel::Level(0)
    }
}

/// Level table for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct LodData {
    /// Level index → model to draw (level 0 always present)
    levels: BTreeMap<u32, ModelKey>,
    /// Ascending adjusted-distance thresholds
    thresholds: Vec<f32>,
}

impl LodData {
    /// Table with only the base model and no thresholds (always level 0).
    pub fn new(base_model: ModelKey) -> Self {
        let mut levels = BTreeMap::new();
        levels.insert(0, base_model);
        Self {
            levels,
            thresholds: Vec::new(),
        }
    }

    /// Builder: register the model drawn at `level`.
    ///
    /// Level 0 is fixed to the base model; use `LodData::new` to change it.
    pub fn with_level(mut self, level: u32, model: ModelKey) -> Result<Self> {
        self.set_level(level, model)?;
        Ok(self)
    }

    /// Builder: set the distance thresholds.
    pub fn with_thresholds(mut self, thresholds: Vec<f32>) -> Result<Self> {
        self.set_thresholds(thresholds)?;
        Ok(self)
    }

    /// Register or replace the model drawn at `level` (> 0).
    pub fn set_level(&mut self, level: u32, model: ModelKey) -> Result<()> {
        if level == 0 {
            return Err(engine_err!(SOURCE, "Level 0 is the base model and cannot be replaced"));
        }
        self.levels.insert(level, model);
        Ok(())
    }

    /// Unregister a level (> 0). Returns the model that was registered.
    pub fn remove_level(&mut self, level: u32) -> Result<Option<ModelKey>> {
        if level == 0 {
            return Err(engine_err!(SOURCE, "Level 0 is the base model and cannot be removed"));
        }
        Ok(self.levels.remove(&level))
    }

    /// Replace the thresholds.
    ///
    /// Values must be finite, non-negative and non-decreasing.
    pub fn set_thresholds(&mut self, thresholds: Vec<f32>) -> Result<()> {
        if let Some(bad) = thresholds.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(engine_err!(SOURCE, "LOD threshold {} must be finite and non-negative", bad));
        }
        if let Some(pair) = thresholds.windows(2).find(|pair| pair[1] < pair[0]) {
            return Err(engine_err!(
                SOURCE,
                "LOD thresholds must be ascending ({} followed by {})",
                pair[0], pair[1]
            ));
        }
        self.thresholds = thresholds;
        Ok(())
    }

    pub fn base_model(&self) -> Option<ModelKey> {
        self.levels.get(&0).copied()
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    /// Model registered at exactly `level`.
    pub fn model_at(&self, level: u32) -> Option<ModelKey> {
        self.levels.get(&level).copied()
    }

    /// Registered level indices, ascending.
    pub fn levels(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }

    /// Nominal level for an adjusted distance: index of the first
    /// threshold >= `adjusted`, or the last index when the distance is
    /// beyond every threshold.
    pub fn nominal_level(&self, adjusted: f32) -> u32 {
        let index = self.thresholds
            .iter()
            .position(|&threshold| threshold >= adjusted)
            .unwrap_or(self.thresholds.len().saturating_sub(1));
        u32::try_from(index).unwrap_or(u32::MAX)
    }

    /// Deepest registered level <= `level` (level 0 is always registered).
    pub fn registered_at_or_below(&self, level: u32) -> u32 {
        self.levels
            .range(..=level)
            .next_back()
            .map_or(0, |(&registered, _)| registered)
    }

    /// Model for `level`: the exact one, else the nearest registered level
    /// by index distance, preferring the lower (more detailed) one on ties.
    pub fn nearest_model(&self, level: u32) -> Option<ModelKey> {
        if let Some(model) = self.model_at(level) {
            return Some(model);
        }
        let below = self.levels.range(..level).next_back();
        let above = self.levels.range(level..).next();
        match (below, above) {
            (Some((&low, &low_model)), Some((&high, &high_model))) => {
                if level - low <= high - level {
                    Some(low_model)
                } else {
                    Some(high_model)
                }
            }
            (Some((_, &model)), None) | (None, Some((_, &model))) => Some(model),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
#[path = "lod_data_tests.rs"]
mod tests;
