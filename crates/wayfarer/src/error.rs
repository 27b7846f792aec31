//! Unified error type for Wayfarer.

use wayfarer_command::StartupError;
use wayfarer_world::{L10nError, PlayerId, WorldError};

/// Errors loading a [`WorldConfig`](crate::WorldConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors talking to a running world server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServerError {
    /// The server task has stopped.
    #[error("world server is not running")]
    Closed,

    #[error("player {0} is not connected")]
    UnknownPlayer(PlayerId),

    #[error("player {0} is already connected")]
    AlreadyConnected(PlayerId),
}

/// Top-level error that wraps every crate-specific error.
///
/// The `#[from]` conversions let `?` lift a sub-crate error straight into
/// this type.
#[derive(Debug, thiserror::Error)]
pub enum WayfarerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    L10n(#[from] L10nError),

    /// Command registration failed; every failure is listed.
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Server(#[from] ServerError),
}
