//! Top-level input dispatch: registry first, then the room's exits.

use wayfarer_world::PlayerId;

use crate::movement::{room_exits, ExitOutcome};
use crate::CommandContext;

/// What became of one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank line.
    Empty,
    /// A registered command (or alias) ran.
    Command,
    /// The input named an exit of the player's room.
    Exit(ExitOutcome),
    /// Nothing claimed the input. The caller decides what to tell the
    /// player.
    NotHandled,
}

impl Dispatch {
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::NotHandled)
    }
}

/// Splits `line` into a command word and the rest.
fn split_command(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (line, ""),
    })
}

/// Handles one line of player input.
pub fn handle_input(ctx: &mut CommandContext<'_>, line: &str, player: PlayerId) -> Dispatch {
    let Some((name, args)) = split_command(line) else {
        return Dispatch::Empty;
    };

    let commands = ctx.commands;
    if commands.dispatch(ctx, name, args, player) {
        return Dispatch::Command;
    }

    match room_exits(ctx, name, player) {
        ExitOutcome::NoMatch => {
            tracing::debug!(%player, command = name, "input not handled");
            Dispatch::NotHandled
        }
        outcome => Dispatch::Exit(outcome),
    }
}

/// Handles one line of admin input (`teleport 12`). Admin commands never
/// fall through to exits.
pub fn handle_admin_input(ctx: &mut CommandContext<'_>, line: &str, player: PlayerId) -> Dispatch {
    let Some((name, args)) = split_command(line) else {
        return Dispatch::Empty;
    };
    let commands = ctx.commands;
    if commands.dispatch_admin(ctx, name, player, args) {
        Dispatch::Command
    } else {
        Dispatch::NotHandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("  "), None);
        assert_eq!(split_command("look"), Some(("look", "")));
        assert_eq!(split_command(" open   north door "), Some(("open", "north door")));
    }

    #[test]
    fn test_only_not_handled_is_unhandled() {
        assert!(Dispatch::Empty.is_handled());
        assert!(Dispatch::Exit(ExitOutcome::Ambiguous).is_handled());
        assert!(!Dispatch::NotHandled.is_handled());
    }
}
