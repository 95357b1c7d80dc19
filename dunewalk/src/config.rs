//! Game tuning values, loadable from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collision::RayMode;
use crate::error::{DuneError, DuneResult};
use crate::input::KeyBindings;
use crate::math::Vec2;

/// Tuning for a play session. Every field has a default, so a JSON file only
/// needs the values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Screen-space distance moved per tick along one axis.
    pub move_speed: f32,
    /// Ray steps checked ahead of the player.
    pub lookahead: u32,
    pub ray_mode: RayMode,
    /// Cap diagonal moves to the single-axis speed.
    pub normalize_diagonal: bool,

    /// World scale at startup.
    pub initial_zoom: f32,
    pub zoom_step: f32,
    pub min_zoom: f32,

    /// Interpolation factor between pointer and screen centre.
    pub camera_lerp: f32,

    pub pickup_radius: f32,
    pub door_radius: f32,
    pub talk_radius: f32,

    /// Animation frames advanced per tick.
    pub animation_speed: f32,

    pub screen_width: u32,
    pub screen_height: u32,

    /// Seed for the floor tile shuffle.
    pub floor_seed: u64,

    pub bindings: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            lookahead: 20,
            ray_mode: RayMode::Sweep,
            normalize_diagonal: true,
            initial_zoom: 2.0,
            zoom_step: 0.1,
            min_zoom: 0.1,
            camera_lerp: 0.5,
            pickup_radius: 100.0,
            door_radius: 400.0,
            talk_radius: 250.0,
            animation_speed: 0.2,
            screen_width: 1024,
            screen_height: 768,
            floor_seed: 0x5EED,
            bindings: KeyBindings::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> DuneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DuneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: &Path) -> DuneResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| DuneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Centre of the screen in pixels.
    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(self.screen_width as f32 / 2.0, self.screen_height as f32 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "move_speed": 5.0, "ray_mode": "line" }"#)
            .expect("partial config should parse");
        assert_eq!(config.move_speed, 5.0);
        assert_eq!(config.ray_mode, RayMode::Line);
        assert_eq!(config.lookahead, 20);
        assert_eq!(config.pickup_radius, 100.0);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = GameConfig::from_json("{ nope").expect_err("should fail");
        assert!(matches!(err, DuneError::Config(_)));
    }

    #[test]
    fn json_round_trip_preserves_bindings() {
        let config = GameConfig::default();
        let json = config.to_json().expect("serialize");
        assert_eq!(GameConfig::from_json(&json).expect("parse"), config);
    }

    #[test]
    fn screen_center_is_half_the_screen() {
        assert_eq!(GameConfig::default().screen_center(), Vec2::new(512.0, 384.0));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GameConfig::load_from_file(Path::new("/definitely/not/here.json"))
            .expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
