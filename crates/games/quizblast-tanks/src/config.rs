use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Tile edge length in pixels.
pub const TILE_SIZE: f32 = 32.0;
/// Player hitbox edge length. Smaller than a tile so one-tile corridors are passable.
pub const PLAYER_SIZE: f32 = 26.0;
/// Player move speed in pixels per second.
pub const PLAYER_SPEED: f32 = 120.0;
/// Bullet hitbox edge length.
pub const BULLET_SIZE: f32 = 6.0;
/// Bullet speed in pixels per second.
pub const BULLET_SPEED: f32 = 360.0;
/// Minimum seconds between successful shots.
pub const FIRE_COOLDOWN: f32 = 0.35;
/// Maximum simultaneously alive bullets.
pub const MAX_BULLETS: usize = 3;

/// Data-driven configuration for the tank quiz game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TankQuizConfig {
    pub tile_size: f32,
    pub player_size: f32,
    pub player_speed: f32,
    pub bullet_size: f32,
    pub bullet_speed: f32,
    pub fire_cooldown_secs: f32,
    pub max_bullets: usize,
    /// Ammo granted for a correct answer.
    pub ammo_reward: u32,
    pub starting_ammo: u32,
    pub starting_hearts: u32,
    pub tick_rate_hz: f32,
}

impl Default for TankQuizConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            bullet_size: BULLET_SIZE,
            bullet_speed: BULLET_SPEED,
            fire_cooldown_secs: FIRE_COOLDOWN,
            max_bullets: MAX_BULLETS,
            ammo_reward: 5,
            starting_ammo: 10,
            starting_hearts: 3,
            tick_rate_hz: 60.0,
        }
    }
}

impl TankQuizConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("QUIZBLAST_TANKS_CONFIG")
            .unwrap_or_else(|_| "config/tanks.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<TankQuizConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    TankQuizConfig::default()
                },
            },
            Err(_) => TankQuizConfig::default(),
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), WorldError> {
        let finite_positive = |v: f32| v.is_finite() && v > 0.0;
        if !finite_positive(self.tile_size) {
            return Err(WorldError::InvalidConfig("tile_size must be positive"));
        }
        if !finite_positive(self.player_size) || self.player_size > self.tile_size {
            return Err(WorldError::InvalidConfig(
                "player_size must be positive and no larger than a tile",
            ));
        }
        if !finite_positive(self.bullet_size) || self.bullet_size >= self.tile_size {
            return Err(WorldError::InvalidConfig(
                "bullet_size must be positive and smaller than a tile",
            ));
        }
        if !finite_positive(self.player_speed) || !finite_positive(self.bullet_speed) {
            return Err(WorldError::InvalidConfig("speeds must be positive"));
        }
        if !self.fire_cooldown_secs.is_finite() || self.fire_cooldown_secs < 0.0 {
            return Err(WorldError::InvalidConfig(
                "fire_cooldown_secs must be non-negative",
            ));
        }
        if !finite_positive(self.tick_rate_hz) {
            return Err(WorldError::InvalidConfig("tick_rate_hz must be positive"));
        }
        // Neither the tank nor a bullet may cover a whole tile in one step at the
        // host tick rate, or it could hop over a wall.
        if self.player_speed / self.tick_rate_hz >= self.tile_size {
            return Err(WorldError::InvalidConfig(
                "player_speed is too high for the tick rate and would tunnel through tiles",
            ));
        }
        if self.bullet_speed / self.tick_rate_hz >= self.tile_size {
            return Err(WorldError::InvalidConfig(
                "bullet_speed is too high for the tick rate and would tunnel through tiles",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TankQuizConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: TankQuizConfig = toml::from_str("max_bullets = 5\nammo_reward = 2").unwrap();
        assert_eq!(cfg.max_bullets, 5);
        assert_eq!(cfg.ammo_reward, 2);
        assert_eq!(cfg.tile_size, TILE_SIZE);
        assert_eq!(cfg.fire_cooldown_secs, FIRE_COOLDOWN);
    }

    #[test]
    fn oversized_player_rejected() {
        let cfg = TankQuizConfig {
            player_size: TILE_SIZE + 1.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn tunneling_bullet_speed_rejected() {
        let cfg = TankQuizConfig {
            bullet_speed: TILE_SIZE * 60.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn tunneling_player_speed_rejected() {
        let cfg = TankQuizConfig {
            player_speed: 6000.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(WorldError::InvalidConfig(_))));

        let just_under = TankQuizConfig {
            player_speed: TILE_SIZE * 60.0 - 1.0,
            ..Default::default()
        };
        assert!(just_under.validate().is_ok());
    }

    #[test]
    fn nan_speed_rejected() {
        let cfg = TankQuizConfig {
            player_speed: f32::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
