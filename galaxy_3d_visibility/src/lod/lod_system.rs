/// LodSystem: distance-based discrete LOD selection.
///
/// Maps (model, camera distance) to a detail level and the model to draw
/// at that level. Unregistered models fail open to level 0 (the model
/// itself). Usage counters are diagnostics only; selection never reads
/// them.

use rustc_hash::FxHashMap;
use glam::Vec3;
use crate::config::LodSettings;
use crate::engine_debug;
use crate::error::Result;
use crate::scene::ModelKey;
use super::lod_data::{LodData, LodLevel};

const SOURCE: &str = "galaxy3d::LodSystem";

/// Result of a full LOD resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LodSelection {
    pub level: LodLevel,
    /// Model to draw (`None` when culled)
    pub model: Option<ModelKey>,
}

/// Per-level usage counters since the last `reset_stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LodStats {
    /// `per_level[i]` = resolutions that returned `Level(i)`
    pub per_level: Vec<u64>,
    pub culled: u64,
}

impl LodStats {
    /// All resolutions counted, culled included.
    pub fn total(&self) -> u64 {
        self.per_level.iter().sum::<u64>() + self.culled
    }

    /// Resolutions that returned `level`.
    pub fn count(&self, level: LodLevel) -> u64 {
        match level {
            LodLevel::Culled => self.culled,
            LodLevel::Level(index) => usize::try_from(index)
                .ok()
                .and_then(|i| self.per_level.get(i))
                .copied()
                .unwrap_or(0),
        }
    }

    fn record(&mut self, level: LodLevel) {
        match level {
            LodLevel::Culled => self.culled += 1,
            LodLevel::Level(index) => {
                let Ok(i) = usize::try_from(index) else {
                    return;
                };
                if self.per_level.len() <= i {
                    self.per_level.resize(i + 1, 0);
                }
                self.per_level[i] += 1;
            }
        }
    }
}

/// Registry of per-model LOD tables plus global settings.
#[derive(Debug, Default)]
pub struct LodSystem {
    registry: FxHashMap<ModelKey, LodData>,
    settings: LodSettings,
    stats: LodStats,
}

impl LodSystem {
    /// Create an empty LodSystem with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty LodSystem with validated settings.
    pub fn with_settings(settings: LodSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    // ===== REGISTRY =====

    /// Register (or replace) the LOD table of a model.
    pub fn register(&mut self, model: ModelKey, data: LodData) {
        engine_debug!(
            SOURCE,
            "Registered LOD table for {:?}: {} levels, {} thresholds",
            model, data.levels().count(), data.thresholds().len()
        );
        self.registry.insert(model, data);
    }

    /// Remove the LOD table of a model. Returns the removed table.
    pub fn unregister(&mut self, model: ModelKey) -> Option<LodData> {
        self.registry.remove(&model)
    }

    pub fn lod_data(&self, model: ModelKey) -> Option<&LodData> {
        self.registry.get(&model)
    }

    pub fn is_registered(&self, model: ModelKey) -> bool {
        self.registry.contains_key(&model)
    }

    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    // ===== SETTINGS =====

    pub fn settings(&self) -> &LodSettings {
        &self.settings
    }

    pub fn lod_bias(&self) -> f32 {
        self.settings.lod_bias
    }

    pub fn max_render_distance(&self) -> f32 {
        self.settings.max_render_distance
    }

    /// Replace all settings at once.
    pub fn set_settings(&mut self, settings: LodSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Set the global bias (must be finite and > -1).
    pub fn set_lod_bias(&mut self, lod_bias: f32) -> Result<()> {
        self.set_settings(LodSettings { lod_bias, ..self.settings })
    }

    /// Set the cull distance (must be > 0, +inf disables the cull).
    pub fn set_max_render_distance(&mut self, max_render_distance: f32) -> Result<()> {
        self.set_settings(LodSettings { max_render_distance, ..self.settings })
    }

    // ===== SELECTION =====

    /// Detail level for an object seen from `camera_pos`.
    ///
    /// `bias_override` replaces the global bias for this call; a
    /// non-finite override is ignored.
    pub fn get_lod_level(
        &mut self,
        model: ModelKey,
        camera_pos: Vec3,
        object_pos: Vec3,
        bias_override: Option<f32>,
    ) -> LodLevel {
        let level = self.compute_level(model, camera_pos, object_pos, bias_override);
        self.stats.record(level);
        level
    }

    /// Model to draw for `level`.
    ///
    /// `Culled` gives `None`. An unregistered level falls back to the
    /// nearest registered one, the lower index winning ties. Unregistered
    /// models resolve to themselves.
    pub fn get_model_for_lod(&self, model: ModelKey, level: LodLevel) -> Option<ModelKey> {
        let index = level.index()?;
        match self.registry.get(&model) {
            Some(data) => data.nearest_model(index),
            None => Some(model),
        }
    }

    /// Level and model in one call.
    pub fn select(
        &mut self,
        model: ModelKey,
        camera_pos: Vec3,
        object_pos: Vec3,
        bias_override: Option<f32>,
    ) -> LodSelection {
        let level = self.get_lod_level(model, camera_pos, object_pos, bias_override);
        LodSelection {
            level,
            model: self.get_model_for_lod(model, level),
        }
    }

    fn compute_level(
        &self,
        model: ModelKey,
        camera_pos: Vec3,
        object_pos: Vec3,
        bias_override: Option<f32>,
    ) -> LodLevel {
        let distance = object_pos.distance(camera_pos);
        let bias = bias_override
            .filter(|bias| bias.is_finite())
            .unwrap_or(self.settings.lod_bias);
        let adjusted = distance * (1.0 + bias);

        if adjusted > self.settings.max_render_distance {
            return LodLevel::Culled;
        }

        match self.registry.get(&model) {
            Some(data) => LodLevel::Level(data.registered_at_or_below(data.nominal_level(adjusted))),
            None => LodLevel::Level(0),
        }
    }

    // ===== DIAGNOSTICS =====

    pub fn stats(&self) -> &LodStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = LodStats::default();
    }
}

#[cfg(test)]
#[path = "lod_system_tests.rs"]
mod tests;
