//! 游戏错误处理模块
//!
//! 模拟核心内部的失败（生成重试、过期引用、越界坐标）都在原地消化，
//! 这里只收录调用方需要处理的可恢复错误：施法、交易、配置和快照编解码。

use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

/// 调用方可见的错误类型
#[derive(Debug, Error)]
pub enum GameError {
    /// 英雄已阵亡
    #[error("The hero is dead")]
    HeroDead,

    /// 法术槽位不存在
    #[error("Unknown spell slot: {0}")]
    UnknownSpell(usize),

    /// 法力不足
    #[error("Not enough mana: need {needed}, have {available}")]
    InsufficientMana { needed: u32, available: u32 },

    /// 法术冷却中
    #[error("Spell is on cooldown ({remaining_ms:.0}ms left)")]
    SpellOnCooldown { remaining_ms: f32 },

    /// 金币不足
    #[error("Not enough gold: need {needed}, have {available}")]
    NotEnoughGold { needed: u32, available: u32 },

    /// 目标实体不存在或已失效
    #[error("Unknown entity: {0}")]
    UnknownEntity(u32),

    /// 商人货架上没有该商品
    #[error("Offer {0} is out of stock")]
    OutOfStock(usize),

    /// 玩家不在已开启的出口上
    #[error("The exit is not reachable from here")]
    NotOnExit,

    /// 配置文件无效
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO操作错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 反序列化错误
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<DecodeError> for GameError {
    fn from(err: DecodeError) -> Self {
        GameError::DeserializationError(err.to_string())
    }
}

impl From<EncodeError> for GameError {
    fn from(err: EncodeError) -> Self {
        GameError::SerializationError(err.to_string())
    }
}

/// 将错误转换为玩家可读的提示
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::InsufficientMana { needed, .. } => {
            format!("You need {} mana to cast that.", needed)
        }
        GameError::SpellOnCooldown { .. } => "That spell is not ready yet.".to_string(),
        GameError::NotEnoughGold { needed, .. } => format!("That costs {} gold.", needed),
        GameError::OutOfStock(_) => "The merchant has nothing left of that.".to_string(),
        GameError::HeroDead => "You are dead.".to_string(),
        GameError::NotOnExit => "The way down is still sealed.".to_string(),
        GameError::IoError(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "Config file not found".to_string(),
            std::io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
            _ => format!("IO error: {}", e),
        },
        _ => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_facing_messages() {
        let err = GameError::InsufficientMana {
            needed: 20,
            available: 5,
        };
        assert_eq!(handle_error(&err), "You need 20 mana to cast that.");

        let err = GameError::UnknownEntity(42);
        assert_eq!(handle_error(&err), "Unknown entity: 42");
    }

    #[test]
    fn test_io_error_mapping() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GameError = io.into();
        assert_eq!(handle_error(&err), "Config file not found");
    }
}
