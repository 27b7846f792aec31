//! Room-level mechanics for Wayfarer.
//!
//! # Key items
//!
//! - [`door`]: door state queries, open/close, unlock
//! - [`resolve_exit`]: prefix matching of typed directions
//! - [`to_room`] / [`to_area`]: actor/target/bystander messaging

pub mod door;
mod broadcast;
mod exits;

pub use broadcast::{to_area, to_room, AreaBroadcast, Party, RoomBroadcast, RoomMessage};
pub use door::{DoorAction, DoorOutcome};
pub use exits::{matching_exits, resolve_exit, ExitMatch};
