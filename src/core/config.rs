//! Game configuration

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::scene::LoadError;

/// Tunables for a play session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playable canvas size in scene units
    pub view_size: Vec2,
    /// Lower bound for the frame timestep, in seconds
    pub min_dt: f32,
    /// Upper bound for the frame timestep, in seconds
    pub max_dt: f32,
    /// Speed cap for inertia imparted on release
    pub max_inertia_speed: f32,
    /// Pointer delta magnitude above which a release imparts inertia
    pub inertia_threshold: f32,
    /// Collision signal above which a velocity component is reflected
    pub bounce_threshold: f32,
    /// Maximum backward steps per axis during de-penetration
    pub max_depenetration_steps: u32,
    /// Maximum number of links followed when walking a hook chain
    pub max_hierarchy_depth: usize,
    /// First value handed out by the paint-order counter
    pub first_paint_order: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            view_size: Vec2::new(1920.0, 1080.0),
            min_dt: 1.0 / 240.0,
            max_dt: 1.0 / 20.0,
            max_inertia_speed: 1000.0,
            inertia_threshold: 0.5,
            bounce_threshold: 0.1,
            max_depenetration_steps: 4096,
            max_hierarchy_depth: 1024,
            first_paint_order: 1000,
        }
    }
}

impl GameConfig {
    /// Set the playable canvas size
    pub fn with_view_size(mut self, width: f32, height: f32) -> Self {
        self.view_size = Vec2::new(width, height);
        self
    }

    /// Set the timestep clamp range
    pub fn with_dt_range(mut self, min_dt: f32, max_dt: f32) -> Self {
        self.min_dt = min_dt;
        self.max_dt = max_dt;
        self
    }

    /// Set the release inertia cap
    pub fn with_max_inertia_speed(mut self, speed: f32) -> Self {
        self.max_inertia_speed = speed;
        self
    }

    /// Clamp a raw frame delta into the configured range.
    ///
    /// A non-finite delta is treated as the shortest frame.
    #[must_use]
    pub fn clamp_dt(&self, raw_dt: f32) -> f32 {
        if !raw_dt.is_finite() {
            return self.min_dt;
        }
        raw_dt.max(self.min_dt).min(self.max_dt)
    }

    /// Check that the timestep range is usable
    ///
    /// # Errors
    ///
    /// Returns an error if a bound is negative or not finite, or if the range
    /// is inverted
    pub fn validate(&self) -> Result<(), LoadError> {
        let finite = self.min_dt.is_finite() && self.max_dt.is_finite();
        if !finite || self.min_dt < 0.0 || self.min_dt > self.max_dt {
            return Err(LoadError::DeserializeError(format!(
                "invalid timestep range [{}, {}]",
                self.min_dt, self.max_dt
            )));
        }
        Ok(())
    }

    /// Whether a position lies on the playable canvas
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.y >= 0.0
            && position.x <= self.view_size.x
            && position.y <= self.view_size.y
    }

    /// Load a configuration from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Parse and validate a configuration from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization or validation fails
    pub fn from_ron_str(content: &str) -> Result<Self, LoadError> {
        let config: Self =
            ron::from_str(content).map_err(|e| LoadError::DeserializeError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|e| LoadError::IoError(e.to_string()))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| LoadError::DeserializeError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        let config = GameConfig::default().with_dt_range(0.01, 0.05);
        assert_eq!(config.clamp_dt(1.0), 0.05);
        assert_eq!(config.clamp_dt(0.0), 0.01);
        assert_eq!(config.clamp_dt(0.02), 0.02);
        assert_eq!(config.clamp_dt(f32::NAN), 0.01);
        assert_eq!(config.clamp_dt(f32::INFINITY), 0.01);
    }

    #[test]
    fn test_inverted_dt_range_is_rejected() {
        let err = GameConfig::from_ron_str("(min_dt: 0.1)").unwrap_err();
        assert!(matches!(err, LoadError::DeserializeError(_)));

        assert!(GameConfig::default().with_dt_range(-1.0, 0.05).validate().is_err());
        assert!(GameConfig::default().with_dt_range(0.01, f32::NAN).validate().is_err());
        assert!(GameConfig::from_ron_str("(min_dt: 0.01, max_dt: 0.1)").is_ok());
    }

    #[test]
    fn test_json_file_is_validated() {
        let path = std::env::temp_dir().join(format!("giftbench-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"min_dt": 0.5, "max_dt": 0.1}"#).unwrap();

        let result = GameConfig::load_json(&path);
        let _ = fs::remove_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_canvas_bounds() {
        let config = GameConfig::default().with_view_size(100.0, 50.0);
        assert!(config.contains(Vec2::new(0.0, 0.0)));
        assert!(config.contains(Vec2::new(100.0, 50.0)));
        assert!(!config.contains(Vec2::new(-0.1, 10.0)));
        assert!(!config.contains(Vec2::new(10.0, 50.5)));
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: GameConfig = ron::from_str("(max_inertia_speed: 250.0)").unwrap();
        assert_eq!(config.max_inertia_speed, 250.0);
        assert_eq!(config.first_paint_order, 1000);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default().with_view_size(640.0, 360.0);
        let json = serde_json::to_string(&config).unwrap();
        let loaded: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, config);
    }
}
