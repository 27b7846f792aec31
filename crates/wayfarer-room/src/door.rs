//! Door state machine.
//!
//! Queries treat a missing door as open and unlocked. The only mutations
//! are [`toggle`] (open/close, refused while locked) and [`unlock_door`],
//! which the movement engine calls once the player proves they hold the
//! key. Nothing here ever locks a door.

use wayfarer_world::{DoorState, Exit, LocationId, Message, MessageCatalog, PlayerId, World};

use crate::broadcast::{to_room, Party, RoomMessage};
use crate::exits::{resolve_exit, ExitMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAction {
    Open,
    Close,
}

impl DoorAction {
    fn target(self) -> DoorState {
        match self {
            Self::Open => DoorState::Open,
            Self::Close => DoorState::Closed,
        }
    }
}

/// What an open/close attempt ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    /// The door changed state.
    Toggled,
    /// The door was already in the requested state.
    Unchanged,
    /// The door is locked; nothing changed.
    Locked,
    /// The exit has no door.
    NoDoor,
    /// No exit matched, or the fragment was ambiguous.
    NoExit,
}

pub fn is_open(exit: &Exit) -> bool {
    exit.door.as_ref().is_none_or(|door| door.state.is_open())
}

pub fn is_locked(exit: &Exit) -> bool {
    exit.door.as_ref().is_some_and(|door| door.state.is_locked())
}

/// Locked → closed. Returns `false` (and changes nothing) for any door
/// that isn't locked, so unlocking twice is harmless.
pub fn unlock_door(exit: &mut Exit) -> bool {
    match exit.door.as_mut() {
        Some(door) if door.state.is_locked() => {
            door.state = DoorState::Closed;
            true
        }
        _ => false,
    }
}

/// Resolves `args` against the player's current room and opens or closes
/// the matching door.
pub fn open_or_close(
    world: &mut World,
    catalog: &MessageCatalog,
    action: DoorAction,
    args: &str,
    player_id: PlayerId,
) -> DoorOutcome {
    let Some(player) = world.players.get(player_id) else {
        tracing::warn!(%player_id, "door command from unknown player");
        return DoorOutcome::NoExit;
    };
    let location = player.location();
    let fragment = args.split_whitespace().next().unwrap_or("");

    let matched = match world.rooms.get(location) {
        Some(room) => resolve_exit(room, fragment),
        None => ExitMatch::None,
    };

    match matched {
        ExitMatch::One(index) => toggle(world, catalog, action, location, index, player_id),
        ExitMatch::Ambiguous(_) => {
            player.say_l10n(catalog, "AMBIG_EXIT", &[]);
            DoorOutcome::NoExit
        }
        ExitMatch::None => {
            player.say_l10n(catalog, "NO_EXIT", &[]);
            DoorOutcome::NoExit
        }
    }
}

/// Opens or closes the door on exit `index` of `location`, telling the
/// actor and everyone else in the room.
pub fn toggle(
    world: &mut World,
    catalog: &MessageCatalog,
    action: DoorAction,
    location: LocationId,
    index: usize,
    player_id: PlayerId,
) -> DoorOutcome {
    let Some(exit) = world
        .rooms
        .get_mut(location)
        .and_then(|room| room.exit_mut(index))
    else {
        return DoorOutcome::NoExit;
    };
    let direction = exit.direction.clone();
    let target = action.target();

    let (outcome, key) = match exit.door.as_mut() {
        None => (DoorOutcome::NoDoor, "NO_DOOR"),
        Some(door) if door.state.is_locked() => (DoorOutcome::Locked, "DOOR_IS_LOCKED"),
        Some(door) if door.state == target => (
            DoorOutcome::Unchanged,
            match action {
                DoorAction::Open => "DOOR_ALREADY_OPEN",
                DoorAction::Close => "DOOR_ALREADY_CLOSED",
            },
        ),
        Some(door) if door.state.can_transition_to(target) => {
            door.state = target;
            (
                DoorOutcome::Toggled,
                match action {
                    DoorAction::Open => "DOOR_OPENED",
                    DoorAction::Close => "DOOR_CLOSED",
                },
            )
        }
        Some(_) => (DoorOutcome::Locked, "DOOR_IS_LOCKED"),
    };

    let Some(player) = world.players.get(player_id) else {
        return outcome;
    };
    if outcome != DoorOutcome::Toggled {
        player.say_l10n(catalog, key, &[&direction]);
        return outcome;
    }

    tracing::debug!(%player_id, %location, %direction, ?action, "door toggled");

    let observer_key = match action {
        DoorAction::Open => "OTHER_DOOR_OPENED",
        DoorAction::Close => "OTHER_DOOR_CLOSED",
    };
    to_room(location, player_id, Party::Nobody, &world.players, catalog).send(
        RoomMessage::new()
            .first(Message::key(key, &[&direction]))
            .third(Message::key(observer_key, &[player.name(), &direction])),
    );

    outcome
}
