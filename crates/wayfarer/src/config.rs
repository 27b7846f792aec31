//! World server configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wayfarer_command::CommandSettings;
use wayfarer_world::{Locale, LocationId, Player, PlayerId};

use crate::ConfigError;

/// Tunables for a world server.
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```json
/// { "default_move_cost": 2, "starting_energy": 50 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Locale for new players, and the fallback for catalog lookups.
    pub default_locale: Locale,

    /// Energy an exit costs when it doesn't set its own.
    pub default_move_cost: u32,

    /// Energy a freshly created player starts with.
    pub starting_energy: u32,

    /// How many alias hops one dispatch may follow.
    pub max_alias_depth: usize,

    /// Depth of the server's input channel. Senders wait when it is full.
    pub input_channel_size: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            default_move_cost: 1,
            starting_energy: 100,
            max_alias_depth: 8,
            input_channel_size: 64,
        }
    }
}

impl WorldConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The subset the command layer reads.
    pub fn command_settings(&self) -> CommandSettings {
        CommandSettings {
            default_move_cost: self.default_move_cost,
            max_alias_depth: self.max_alias_depth,
        }
    }

    /// A new player with this config's locale and starting energy.
    pub fn new_player(
        &self,
        id: PlayerId,
        account: &str,
        name: &str,
        location: LocationId,
    ) -> Player {
        Player::new(id, account, name, location)
            .with_locale(self.default_locale.clone())
            .with_energy(self.starting_energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorldConfig::default();
        assert_eq!(config.default_locale, Locale::new("en"));
        assert_eq!(config.default_move_cost, 1);
        assert_eq!(config.max_alias_depth, 8);
        assert_eq!(config.input_channel_size, 64);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = WorldConfig::from_json(r#"{"default_locale": "es", "starting_energy": 5}"#)
            .unwrap();
        assert_eq!(config.default_locale, Locale::new("es"));
        assert_eq!(config.starting_energy, 5);
        assert_eq!(config.default_move_cost, 1);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            WorldConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(matches!(
            WorldConfig::from_file("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_new_player_uses_config() {
        let config = WorldConfig {
            default_locale: Locale::new("es"),
            starting_energy: 7,
            ..WorldConfig::default()
        };
        let player = config.new_player(PlayerId(1), "ann", "Ann", LocationId(3));
        assert_eq!(player.locale(), &Locale::new("es"));
        assert_eq!(player.energy(), 7);
        assert_eq!(player.location(), LocationId(3));
    }
}
