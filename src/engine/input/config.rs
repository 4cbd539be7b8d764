// Assignment configuration

use std::env;

/// Default number of player slots
pub const DEFAULT_MAX_PLAYERS: usize = 6;

/// Default movement speed in units per second
pub const DEFAULT_MOVE_SPEED: f32 = 10.0;

/// Environment override for `max_players`
pub const MAX_PLAYERS_ENV: &str = "RUSTED_JOIN_MAX_PLAYERS";

/// Environment override for `move_speed`
pub const MOVE_SPEED_ENV: &str = "RUSTED_JOIN_MOVE_SPEED";

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("max_players must be at least 1")]
    NoPlayerSlots,

    #[error("move_speed must be finite and non-negative, got {0}")]
    InvalidMoveSpeed(f32),

    #[error("Invalid value for {name}: {value:?}")]
    Unparsable { name: &'static str, value: String },
}

/// Settings for the device assignment layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignmentConfig {
    /// Number of player slots
    pub max_players: usize,

    /// Units per second a player moves at full stick deflection
    pub move_speed: f32,
}

impl AssignmentConfig {
    pub fn new(max_players: usize, move_speed: f32) -> Result<Self, ConfigError> {
        let config = Self {
            max_players,
            move_speed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    pub fn with_move_speed(mut self, move_speed: f32) -> Self {
        self.move_speed = move_speed;
        self
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_players == 0 {
            return Err(ConfigError::NoPlayerSlots);
        }
        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            return Err(ConfigError::InvalidMoveSpeed(self.move_speed));
        }
        Ok(())
    }

    /// Defaults, overridden by `RUSTED_JOIN_MAX_PLAYERS` and
    /// `RUSTED_JOIN_MOVE_SPEED` when set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(MAX_PLAYERS_ENV) {
            config.max_players = parse(MAX_PLAYERS_ENV, &value)?;
        }
        if let Some(value) = lookup(MOVE_SPEED_ENV) {
            config.move_speed = parse(MOVE_SPEED_ENV, &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Unparsable {
        name,
        value: value.to_string(),
    })
}
