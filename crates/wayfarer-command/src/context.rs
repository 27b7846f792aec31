//! The context every command runs against.

use serde::{Deserialize, Serialize};
use wayfarer_world::{EventBus, MessageCatalog, World};

use crate::CommandRegistry;

/// Tunables the command layer reads at call time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandSettings {
    /// Energy charged for an exit that doesn't set its own cost.
    pub default_move_cost: u32,
    /// How many alias hops a single dispatch may follow.
    pub max_alias_depth: usize,
}

impl Default for CommandSettings {
    fn default() -> Self {
        Self {
            default_move_cost: 1,
            max_alias_depth: 8,
        }
    }
}

/// Everything a handler may touch, passed explicitly on every call.
///
/// `commands` is the registry the handler was dispatched from, so a
/// handler can invoke other commands by name (movement re-renders the
/// room through `look`, for instance).
pub struct CommandContext<'a> {
    pub world: &'a mut World,
    pub commands: &'a CommandRegistry,
    pub events: &'a EventBus,
    pub catalog: &'a MessageCatalog,
    pub settings: &'a CommandSettings,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        world: &'a mut World,
        commands: &'a CommandRegistry,
        events: &'a EventBus,
        catalog: &'a MessageCatalog,
        settings: &'a CommandSettings,
    ) -> Self {
        Self {
            world,
            commands,
            events,
            catalog,
            settings,
        }
    }
}

/// Arguments handed to a player command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandArgs<'a> {
    /// Everything the player typed after the command name.
    pub text: &'a str,
    /// Set by the movement engine when it re-renders a room the player
    /// has never seen before.
    pub first_visit: bool,
}

impl<'a> CommandArgs<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            first_visit: false,
        }
    }

    pub fn with_first_visit(mut self, first_visit: bool) -> Self {
        self.first_visit = first_visit;
        self
    }
}

impl<'a> From<&'a str> for CommandArgs<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_fill_missing_fields_with_defaults() {
        let settings: CommandSettings = serde_json::from_str(r#"{"default_move_cost": 2}"#).unwrap();
        assert_eq!(settings.default_move_cost, 2);
        assert_eq!(settings.max_alias_depth, 8);
    }

    #[test]
    fn test_args_from_str_is_not_first_visit() {
        let args = CommandArgs::from("north");
        assert_eq!(args.text, "north");
        assert!(!args.first_visit);
        assert!(args.with_first_visit(true).first_visit);
    }
}
