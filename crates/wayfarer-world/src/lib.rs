//! World model for Wayfarer.
//!
//! This crate holds everything the command core reads and mutates:
//!
//! - **Ids** ([`LocationId`], [`PlayerId`], [`NpcId`], [`ItemId`], ...):
//!   one newtype per entity kind.
//! - **Topology** ([`Room`], [`Exit`], [`Door`]): loaded once from a
//!   [`WorldDefinition`].
//! - **Registries** ([`World`], [`Players`], [`Rooms`], ...), with
//!   snapshot iteration so callbacks may move players mid-loop.
//! - **Events** ([`EventBus`]): typed room/NPC/player events.
//! - **Messages** ([`MessageCatalog`], [`Message`]): the localization
//!   contract.
//!
//! # How it fits in the stack
//!
//! ```text
//! Command layer (wayfarer-command)  ← registry, movement, dispatch
//!     ↕
//! Room layer (wayfarer-room)        ← doors, exit matching, broadcast
//!     ↕
//! World layer (this crate)          ← data, registries, events, l10n
//! ```

mod error;
mod events;
mod ids;
mod l10n;
mod player;
mod registry;
mod room;

pub use error::{L10nError, WorldError};
pub use events::{
    EventBus, NpcEvent, NpcListener, PlayerEvent, PlayerListener, RoomEvent, RoomListener,
};
pub use ids::{AreaId, ItemId, Locale, LocationId, NpcId, PlayerId};
pub use l10n::{format_template, Message, MessageCatalog};
pub use player::{Outbound, Player, PlayerSender};
pub use registry::{Item, Items, Npc, Npcs, Players, Rooms, World, WorldDefinition};
pub use room::{Door, DoorState, Exit, Localized, Room};
