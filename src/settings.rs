//! Game settings and world generation parameters
//!
//! Loaded from a JSON file; every field has a default so partial files work.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid world config: {0}")]
    InvalidWorld(String),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 150,
            QualityPreset::Medium => 600,
            QualityPreset::High => 2000,
        }
    }
}

/// Size of the visible play area in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Parameters for the concentric ring laboratory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of concentric rings
    pub ring_count: u32,
    /// Side of the innermost square room
    pub center_room_size: f32,
    /// Each ring adds this much on every side
    pub ring_thickness: f32,
    /// Walls are cut into segments of this length so they break piecewise
    pub wall_segment_size: f32,
    pub wall_thickness: f32,
    pub wall_visual_height: f32,

    // === Density ===
    pub humans_base: u32,
    pub humans_per_ring: u32,
    pub props_base: u32,
    pub props_per_ring: u32,

    // === Placement ===
    /// Random positions tried before an entity is skipped
    pub placement_attempts: u32,
    pub human_padding: f32,
    pub prop_padding: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ring_count: 5,
            center_room_size: 600.0,
            ring_thickness: 450.0,
            wall_segment_size: 100.0,
            wall_thickness: 40.0,
            wall_visual_height: 100.0,

            humans_base: 10,
            humans_per_ring: 8,
            props_base: 6,
            props_per_ring: 5,

            placement_attempts: 50,
            human_padding: 30.0,
            prop_padding: 60.0,
        }
    }
}

impl WorldConfig {
    /// Full side length of the generated map
    pub fn world_size(&self) -> f32 {
        self.center_room_size + self.ring_count as f32 * self.ring_thickness * 2.0
    }

    /// Half the map side; escaping past this (plus a margin) wins
    pub fn world_radius(&self) -> f32 {
        self.world_size() / 2.0
    }

    /// Outer side length of ring `index` (ring 0 is the center room)
    pub fn ring_size(&self, index: u32) -> f32 {
        self.center_room_size + index as f32 * self.ring_thickness * 2.0
    }

    /// Reject sizes that would make world generation degenerate or unbounded
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("center_room_size", self.center_room_size),
            ("wall_segment_size", self.wall_segment_size),
            ("wall_thickness", self.wall_thickness),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidWorld(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !self.ring_thickness.is_finite() || self.ring_thickness < 0.0 {
            return Err(ConfigError::InvalidWorld(format!(
                "ring_thickness must be non-negative, got {}",
                self.ring_thickness
            )));
        }
        if self.wall_thickness * 2.0 >= self.center_room_size {
            return Err(ConfigError::InvalidWorld(format!(
                "wall_thickness {} leaves no room inside a {} center room",
                self.wall_thickness, self.center_room_size
            )));
        }
        Ok(())
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on impacts
    pub screen_shake: bool,
    /// Particle effects (blood, sparks, debris)
    pub particles: bool,
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,

    // === Play area ===
    pub viewport: Viewport,
    pub world: WorldConfig,

    // === Narration ===
    /// Request flavor text on level-ups and escape (off in the live loop by default)
    pub narration: bool,
    /// Narration calls that take longer than this fall back to canned text
    pub narration_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            screen_shake: true,
            particles: true,
            reduced_motion: false,
            viewport: Viewport::default(),
            world: WorldConfig::default(),
            narration: false,
            narration_timeout_ms: 8000,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.world.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Read settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_world_radius() {
        let world = WorldConfig::default();
        assert_eq!(world.world_size(), 5100.0);
        assert_eq!(world.world_radius(), 2550.0);
        assert_eq!(world.ring_size(0), 600.0);
        assert_eq!(world.ring_size(2), 2400.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "quality": "Low", "world": { "ring_count": 3 } }"#)
            .unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert_eq!(settings.world.ring_count, 3);
        assert_eq!(settings.world.center_room_size, 600.0);
        assert!(!settings.narration);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_degenerate_world_sizes_rejected() {
        for json in [
            r#"{ "world": { "wall_segment_size": 0 } }"#,
            r#"{ "world": { "wall_segment_size": -100 } }"#,
            r#"{ "world": { "center_room_size": 60, "wall_thickness": 40 } }"#,
            r#"{ "world": { "ring_thickness": -1 } }"#,
        ] {
            let err = Settings::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidWorld(_)), "{json}");
        }
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/definitely/not/here.json");
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_particle_cap_and_motion() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 2000);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);

        settings.reduced_motion = true;
        assert!(!settings.effective_screen_shake());
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::High.as_str(), "High");
    }
}
