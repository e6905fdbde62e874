//! Settings files read by the binaries.
use crate::bots::BotSettings;
use crate::rainworms::GameSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings in {path}: {reason}")]
    Invalid { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArenaSettings {
    #[serde(default)]
    pub game: GameSettings,
    pub episodes: usize,
    /// Seeds every bot and the dice; entropy when missing
    #[serde(default)]
    pub seed: Option<u64>,
    pub players: Vec<BotSettings>,
}

pub fn parse_arena_settings(json: &str, path: &str) -> Result<ArenaSettings, ConfigError> {
    let mut settings: ArenaSettings =
        serde_json::from_str(json).map_err(|source| ConfigError::Json {
            path: path.to_string(),
            source,
        })?;
    // The seat count always follows the player list
    settings.game.player_count =
        u8::try_from(settings.players.len()).map_err(|_| ConfigError::Invalid {
            path: path.to_string(),
            reason: format!("{} players is too many", settings.players.len()),
        })?;
    settings
        .game
        .validate()
        .map_err(|error| ConfigError::Invalid {
            path: path.to_string(),
            reason: error.to_string(),
        })?;
    Ok(settings)
}

pub fn load_arena_settings<P: AsRef<Path>>(path: P) -> Result<ArenaSettings, ConfigError> {
    let display = path.as_ref().display().to_string();
    let json = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    parse_arena_settings(&json, &display)
}
