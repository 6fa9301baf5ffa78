//! Session configuration
//!
//! Field geometry, bubble sizing and timing. Fixed when a session is built;
//! nothing here changes while a game is running.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::Rank;

/// Largest `max_rank` accepted (keeps `2^rank` scores and radii sane)
pub const MAX_RANK_LIMIT: u8 = 30;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Wall thickness, also the interior margin used when clamping bubbles
    pub wall_thickness: f32,
    /// Deadline line distance from the top edge
    pub deadline_from_top: f32,
    /// Vertical position of an armed (pending) bubble
    pub spawn_y: f32,

    // === Bubbles ===
    pub base_radius: f32,
    pub radius_per_rank: f32,
    pub friction: f32,
    pub mass: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Top rank; two of these fuse into nothing
    pub max_rank: u8,
    /// Spawned ranks are uniform over `0..starter_ranks`
    pub starter_ranks: u8,

    // === Timing ===
    pub time_limit_secs: u32,
    pub drop_cooldown_ms: u64,
    pub physics_hz: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            deadline_from_top: DEADLINE_FROM_TOP,
            spawn_y: SPAWN_Y,

            base_radius: BASE_RADIUS,
            radius_per_rank: RADIUS_PER_RANK,
            friction: FRICTION,
            mass: MASS,
            gravity: GRAVITY,
            max_rank: MAX_RANK,
            starter_ranks: STARTER_RANKS,

            time_limit_secs: TIME_LIMIT_SECS,
            drop_cooldown_ms: DROP_COOLDOWN_MS,
            physics_hz: PHYSICS_HZ,
        }
    }
}

impl GameConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the game cannot be played with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("wall_thickness", self.wall_thickness),
            ("base_radius", self.base_radius),
            ("mass", self.mass),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if !(self.radius_per_rank.is_finite() && self.radius_per_rank >= 0.0) {
            return Err(ConfigError::Invalid("radius_per_rank must not be negative".into()));
        }
        if !(self.friction.is_finite() && self.friction >= 0.0) {
            return Err(ConfigError::Invalid("friction must not be negative".into()));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid("gravity must be finite".into()));
        }
        if self.max_rank > MAX_RANK_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_rank {} exceeds {MAX_RANK_LIMIT}",
                self.max_rank
            )));
        }
        if self.starter_ranks == 0 || self.starter_ranks > self.max_rank + 1 {
            return Err(ConfigError::Invalid(format!(
                "starter_ranks must be in 1..={}, got {}",
                self.max_rank + 1,
                self.starter_ranks
            )));
        }
        let largest = self.radius_for(Rank::new(self.max_rank));
        if self.field_width < 2.0 * (self.wall_thickness + largest) {
            return Err(ConfigError::Invalid(format!(
                "field_width {} cannot hold a rank {} bubble",
                self.field_width, self.max_rank
            )));
        }
        if !(self.deadline_from_top > 0.0 && self.deadline_from_top < self.field_height) {
            return Err(ConfigError::Invalid("deadline must lie inside the field".into()));
        }
        if !(self.spawn_y > 0.0 && self.spawn_y < self.deadline_from_top) {
            return Err(ConfigError::Invalid(format!(
                "spawn_y {} must lie between the top edge and the deadline",
                self.spawn_y
            )));
        }
        if self.time_limit_secs == 0 {
            return Err(ConfigError::Invalid("time_limit_secs must be at least 1".into()));
        }
        if self.physics_hz == 0 {
            return Err(ConfigError::Invalid("physics_hz must be at least 1".into()));
        }
        Ok(())
    }

    /// Radius of a bubble of the given rank
    #[inline]
    pub fn radius_for(&self, rank: Rank) -> f32 {
        rank.get() as f32 * self.radius_per_rank + self.base_radius
    }

    /// Screen-space y of the deadline line
    #[inline]
    pub fn deadline_y(&self) -> f32 {
        self.deadline_from_top
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.field_width / 2.0
    }

    /// Clamp a horizontal position so a bubble of `radius` stays inside the walls
    pub fn clamp_x(&self, x: f32, radius: f32) -> f32 {
        let min = self.wall_thickness + radius;
        let max = self.field_width - self.wall_thickness - radius;
        if max < min {
            return self.center_x();
        }
        if x.is_nan() {
            return min;
        }
        x.clamp(min, max)
    }

    pub fn drop_cooldown(&self) -> Duration {
        Duration::from_millis(self.drop_cooldown_ms)
    }

    /// Length of one physics step in seconds
    pub fn physics_dt(&self) -> f32 {
        1.0 / self.physics_hz as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.radius_for(Rank::new(0)), 20.0);
        assert_eq!(config.radius_for(Rank::new(10)), 120.0);
        assert_eq!(config.deadline_y(), 100.0);
        assert_eq!(config.center_x(), 210.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "time_limit_secs": 90 }"#).unwrap();
        assert_eq!(config.time_limit_secs, 90);
        assert_eq!(config.field_width, FIELD_WIDTH);
        assert_eq!(config.starter_ranks, STARTER_RANKS);
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig {
            max_rank: 8,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "starter_ranks": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "max_rank": 3, "starter_ranks": 5 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "field_width": 100.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "physics_hz": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "spawn_y": 150.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "spawn_y": -5.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_clamp_x_uses_radius() {
        let config = GameConfig::default();
        assert_eq!(config.clamp_x(-500.0, 20.0), 30.0);
        assert_eq!(config.clamp_x(5000.0, 20.0), 390.0);
        assert_eq!(config.clamp_x(5000.0, 60.0), 350.0);
        assert_eq!(config.clamp_x(200.0, 60.0), 200.0);
    }
}
