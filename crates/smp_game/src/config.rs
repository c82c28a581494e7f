//! Gameplay tuning values.
//!
//! Every physics and scoring constant lives in `GameConfig` and is handed to
//! the entities at construction. The defaults are the shipped tuning; an
//! optional JSON file can override any subset of fields.

use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Downward acceleration in units/s².
    pub gravity: f32,
    /// Vertical velocity applied on jump; negative is up.
    pub jump_velocity: f32,
    pub move_speed: f32,
    pub enemy_speed: f32,
    /// Gap left between a body and the platform side it was pushed out of.
    pub collision_epsilon: f32,
    /// A player whose top edge passes below this y has fallen out of the level.
    pub fall_threshold_y: f32,
    /// How far below an enemy's top edge the player's feet may be and still stomp.
    pub stomp_tolerance: f32,
    pub stomp_score: u32,
    pub coin_score: u32,
    pub initial_lives: u32,
    pub coin_frame_count: u32,
    pub coin_frame_time: f32,
    pub player_size: [f32; 2],
    pub enemy_size: [f32; 2],
    pub coin_size: [f32; 2],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 900.0,
            jump_velocity: -500.0,
            move_speed: 200.0,
            enemy_speed: 80.0,
            collision_epsilon: 0.1,
            fall_threshold_y: 700.0,
            stomp_tolerance: 20.0,
            stomp_score: 100,
            coin_score: 10,
            initial_lives: 3,
            coin_frame_count: 4,
            coin_frame_time: 0.1,
            player_size: [40.0, 60.0],
            enemy_size: [40.0, 40.0],
            coin_size: [30.0, 30.0],
        }
    }
}

impl GameConfig {
    pub fn player_size(&self) -> Vec2 {
        Vec2::from(self.player_size)
    }

    pub fn enemy_size(&self) -> Vec2 {
        Vec2::from(self.enemy_size)
    }

    pub fn coin_size(&self) -> Vec2 {
        Vec2::from(self.coin_size)
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load tuning from `path`, falling back to defaults. A missing file is the
/// normal case; anything else wrong with it is logged.
pub fn load_config_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!(
            "No config at '{}', using default tuning",
            path.display()
        );
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Loaded tuning from '{}'", path.display());
            config
        }
        Err(err) => {
            log::warn!("{err}. Using default tuning.");
            GameConfig::default()
        }
    }
}

fn validate_config(config: &GameConfig) -> Result<(), String> {
    let positive = [
        ("gravity", config.gravity),
        ("move_speed", config.move_speed),
        ("enemy_speed", config.enemy_speed),
        ("coin_frame_time", config.coin_frame_time),
        ("player_size.w", config.player_size[0]),
        ("player_size.h", config.player_size[1]),
        ("enemy_size.w", config.enemy_size[0]),
        ("enemy_size.h", config.enemy_size[1]),
        ("coin_size.w", config.coin_size[0]),
        ("coin_size.h", config.coin_size[1]),
    ];
    for (name, value) in positive {
        if !(value > 0.0) || !value.is_finite() {
            return Err(format!(
                "Config validation failed: {name} must be a positive number (got {value})"
            ));
        }
    }
    if !(config.jump_velocity < 0.0) {
        return Err(format!(
            "Config validation failed: jump_velocity must be negative (got {})",
            config.jump_velocity
        ));
    }
    if config.collision_epsilon < 0.0 || config.stomp_tolerance < 0.0 {
        return Err(
            "Config validation failed: collision_epsilon and stomp_tolerance must be >= 0"
                .to_string(),
        );
    }
    if config.initial_lives == 0 {
        return Err("Config validation failed: initial_lives must be >= 1".to_string());
    }
    if config.coin_frame_count == 0 {
        return Err("Config validation failed: coin_frame_count must be >= 1".to_string());
    }
    Ok(())
}
