//! Command dispatch and movement for Wayfarer.
//!
//! A line of input goes to the [`CommandRegistry`] first. If no command
//! claims it, the first word is tried as an exit of the player's room and,
//! on a single match, handed to the movement engine.
//!
//! ```text
//! input ─→ handle_input ─→ CommandRegistry::dispatch ─→ handler
//!                 │
//!                 └─(no command)─→ room_exits ─→ move_through
//! ```
//!
//! Handlers get an explicit [`CommandContext`] on every call; there is no
//! global state.

mod builtins;
mod context;
mod dispatch;
mod error;
mod movement;
mod registry;

pub use builtins::{close, look, open, teleport};
pub use context::{CommandArgs, CommandContext, CommandSettings};
pub use dispatch::{handle_admin_input, handle_input, Dispatch};
pub use error::{RegistrationError, Scope, StartupError};
pub use movement::{move_through, room_exits, ExitOutcome, MoveOutcome};
pub use registry::{AdminHandler, CommandRegistry, CommandTable, PlayerHandler};
