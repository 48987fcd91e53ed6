//! 游戏配置：生成、视野与战斗参数的汇总
//!
//! Every section falls back to its defaults, so a file only needs the keys it
//! overrides.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use combat::CombatTuning;
use dungeon::{FovConfig, GenConfig};
use error::GameError;

/// Smallest grid the generators accept.
const MIN_GRID_SIDE: i32 = 8;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub generation: GenConfig,
    pub fov: FovConfig,
    pub combat: CombatTuning,
}

impl GameConfig {
    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, GameError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        serde_json::to_string_pretty(self).map_err(|e| GameError::SerializationError(e.to_string()))
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), GameError> {
        let g = &self.generation;
        if g.width < MIN_GRID_SIDE || g.height < MIN_GRID_SIDE {
            return Err(GameError::Config(format!(
                "grid must be at least {MIN_GRID_SIDE}x{MIN_GRID_SIDE}, got {}x{}",
                g.width, g.height
            )));
        }
        if g.room_min < 1 || g.room_min > g.room_max {
            return Err(GameError::Config(format!(
                "room size range {}..={} is empty",
                g.room_min, g.room_max
            )));
        }
        if !(0.0..=1.0).contains(&g.cave_fill) || !(0.0..=1.0).contains(&g.cave_chance) {
            return Err(GameError::Config("cave probabilities must be within [0, 1]".into()));
        }
        if self.fov.ray_count == 0 || self.fov.radius <= 0.0 || self.fov.ray_step <= 0.0 {
            return Err(GameError::Config("fov needs rays, a radius and a step".into()));
        }
        let c = &self.combat;
        if c.frame_ms <= 0.0 || c.max_dt_ms <= 0.0 {
            return Err(GameError::Config("frame_ms and max_dt_ms must be positive".into()));
        }
        if !(0.0..1.0).contains(&c.knockback_drag) || c.knockback_snap <= 0.0 {
            return Err(GameError::Config(
                "knockback_drag must be in [0, 1) and knockback_snap positive".into(),
            ));
        }
        if c.burn_damage_min > c.burn_damage_max {
            return Err(GameError::Config("burn damage range is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "fov": { "radius": 5.0 } }"#).unwrap();
        assert_eq!(config.fov.radius, 5.0);
        assert_eq!(config.fov.ray_count, 360);
        assert_eq!(config.generation, GenConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "combat": {{ "max_dt_ms": 50.0 }} }}"#).unwrap();
        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.combat.max_dt_ms, 50.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GameConfig::from_json(r#"{ "combat": { "knockback_drag": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
        assert!(GameConfig::from_json("not json").is_err());
        assert!(matches!(
            GameConfig::load("/definitely/not/here.json"),
            Err(GameError::IoError(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default();
        let text = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json(&text).unwrap(), config);
    }
}
