//! Game settings and tuning
//!
//! Fixed at run start. Loaded from JSON; every field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Play-field geometry, all in simulation length units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
}

impl Default for PlayField {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            wall_thickness: WALL_THICKNESS,
        }
    }
}

impl PlayField {
    pub fn new(width: f32, height: f32, wall_thickness: f32) -> Self {
        Self {
            width,
            height,
            wall_thickness,
        }
    }

    /// Vertical space between the two walls
    #[inline]
    pub fn playable_height(&self) -> f32 {
        self.height - self.wall_thickness * 2.0
    }

    /// x where new obstacles enter
    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.width + SPAWN_MARGIN
    }
}

/// Physics feel. Two numbers (gravity, drag) shape the flip independent of radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Constant force magnitude
    pub gravity: f32,
    /// Velocity damping per tick (0-1)
    pub drag: f32,
    /// Force kick applied on flip
    pub flip_kick: f32,
    pub player_radius: f32,
    /// Collision radius = player_radius - hitbox_inset
    pub hitbox_inset: f32,
    /// Player x as a fraction of field width
    pub player_x_ratio: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            drag: DRAG,
            flip_kick: FLIP_KICK,
            player_radius: PLAYER_RADIUS,
            hitbox_inset: HITBOX_INSET,
            player_x_ratio: PLAYER_X_RATIO,
        }
    }
}

impl Tuning {
    /// Radius used for obstacle hits (slightly forgiving)
    #[inline]
    pub fn hit_radius(&self) -> f32 {
        (self.player_radius - self.hitbox_inset).max(0.0)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: PlayField,
    pub tuning: Tuning,

    // === Collaborator preferences (no effect on simulation) ===
    /// Haptic feedback on flip/death
    pub haptics: bool,
    /// Player skin color (hex)
    pub skin_color: String,
    /// Player trail color (hex)
    pub trail_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: PlayField::default(),
            tuning: Tuning::default(),
            haptics: true,
            skin_color: "#36E27B".to_string(),
            trail_color: "#36E27B".to_string(),
        }
    }
}

impl Settings {
    /// Environment variable naming a settings file for the native runner
    pub const ENV_PATH: &'static str = "GVOID_SETTINGS";

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot clamp its way out of
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.field;
        if !(f.width > 0.0 && f.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "play field must be positive, got {}x{}",
                f.width, f.height
            )));
        }
        if f.wall_thickness < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "wall thickness must be non-negative, got {}",
                f.wall_thickness
            )));
        }
        let t = &self.tuning;
        if !(0.0..1.0).contains(&t.drag) {
            return Err(ConfigError::Invalid(format!(
                "drag must be in [0, 1), got {}",
                t.drag
            )));
        }
        if t.player_radius <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "player radius must be positive, got {}",
                t.player_radius
            )));
        }
        if !(0.0..=1.0).contains(&t.player_x_ratio) {
            return Err(ConfigError::Invalid(format!(
                "player x ratio must be in [0, 1], got {}",
                t.player_x_ratio
            )));
        }
        if f.playable_height() < t.player_radius * 2.0 {
            return Err(ConfigError::Invalid(format!(
                "playable height {} cannot fit a body of radius {}",
                f.playable_height(),
                t.player_radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.field.wall_thickness, 32.0);
        assert_eq!(settings.tuning.hit_radius(), 12.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "field": { "height": 600 }, "haptics": false }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.field.height, 600.0);
        assert_eq!(settings.field.width, DEFAULT_WIDTH);
        assert!(!settings.haptics);
        assert_eq!(settings.tuning.gravity, GRAVITY);
    }

    #[test]
    fn test_rejects_bad_drag() {
        let json = r#"{ "tuning": { "drag": 1.5 } }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_field_too_small_for_body() {
        let json = r#"{ "field": { "height": 70 } }"#;
        let err = Settings::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = Settings::default();
        settings.tuning.drag = 0.05;
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}
