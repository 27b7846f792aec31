//! Error types for the world layer.

use crate::{ItemId, LocationId, NpcId};

/// Errors raised while building or loading a world.
///
/// Gameplay never produces these: a missing destination room or an
/// unknown player during a command is handled in place. These only come
/// out of loading world definitions.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The world definition was not valid JSON or did not match the schema.
    #[error("invalid world definition: {0}")]
    Load(#[from] serde_json::Error),

    /// Reading a world file failed.
    #[error("failed to read world file: {0}")]
    Io(#[from] std::io::Error),

    /// Two rooms share a vnum.
    #[error("duplicate room {0}")]
    DuplicateRoom(LocationId),

    /// Two items share an id.
    #[error("duplicate item {0}")]
    DuplicateItem(ItemId),

    /// Two NPCs share an id.
    #[error("duplicate npc {0}")]
    DuplicateNpc(NpcId),
}

/// Errors raised by the message catalog.
#[derive(Debug, thiserror::Error)]
pub enum L10nError {
    #[error("unknown message key {0}")]
    UnknownKey(String),

    /// The key exists but has neither the requested nor the default locale.
    #[error("message {key} has no translation for {locale}")]
    MissingTranslation { key: String, locale: String },

    /// The template has more `%s` placeholders than arguments supplied.
    #[error("template {template:?} needs argument {index} but only {supplied} given")]
    MissingArgument {
        template: String,
        index: usize,
        supplied: usize,
    },

    #[error("invalid message catalog: {0}")]
    Load(#[from] serde_json::Error),
}
