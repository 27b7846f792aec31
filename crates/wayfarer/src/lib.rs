//! # Wayfarer
//!
//! Command dispatch and movement core for multiplayer text worlds.
//!
//! A host loads a [`World`](wayfarer_world::World), registers its commands
//! in a [`CommandTable`](wayfarer_command::CommandTable), and spawns a
//! [`WorldServer`]. Input lines go in through a [`WorldHandle`]; output
//! comes back on each player's channel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wayfarer::prelude::*;
//!
//! # async fn run() -> Result<(), WayfarerError> {
//! let config = WorldConfig::default();
//! let world = World::from_file("world.json")?;
//! let handle = WorldServer::builder()
//!     .config(config.clone())
//!     .world(world)
//!     .commands(CommandTable::with_builtins())
//!     .build()?
//!     .spawn();
//!
//! let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
//! let player = config.new_player(PlayerId(1), "ann", "Ann", LocationId(1));
//! handle.connect(player, tx).await?;
//! handle.input(PlayerId(1), "north").await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod server;

pub use config::WorldConfig;
pub use error::{ConfigError, ServerError, WayfarerError};
pub use server::{WorldHandle, WorldServer, WorldServerBuilder, ADMIN_PREFIX};

pub use wayfarer_command as command;
pub use wayfarer_room as room;
pub use wayfarer_world as world;

/// Everything a host usually needs.
pub mod prelude {
    pub use crate::{
        ConfigError, ServerError, WayfarerError, WorldConfig, WorldHandle, WorldServer,
    };
    pub use wayfarer_command::{
        CommandArgs, CommandContext, CommandTable, Dispatch, ExitOutcome, MoveOutcome,
    };
    pub use wayfarer_world::{
        AreaId, Door, DoorState, EventBus, Exit, ItemId, Locale, Localized, LocationId, Message,
        MessageCatalog, NpcEvent, NpcId, Outbound, Player, PlayerEvent, PlayerId, Room,
        RoomEvent, World,
    };
}
