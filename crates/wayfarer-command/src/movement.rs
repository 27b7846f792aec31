//! The movement engine.
//!
//! A move runs through a fixed series of gates and stops at the first one
//! that fails:
//!
//! ```text
//! combat ─→ leave event ─→ door/key ─→ destination ─→ energy
//!                                                       │
//!   arrival ←─ room event ←─ npc events ←─ look ←─ relocate ←─ open door
//! ```
//!
//! Every gate resolves to player messages and a [`MoveOutcome`]; nothing
//! here returns an error.

use wayfarer_room::door::{self, DoorAction};
use wayfarer_room::{resolve_exit, to_room, ExitMatch, Party, RoomMessage};
use wayfarer_world::{
    format_template, Exit, LocationId, Message, MessageCatalog, NpcEvent, Player, PlayerEvent,
    PlayerId, RoomEvent, World,
};

use crate::{CommandArgs, CommandContext};

/// How a single move attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player now stands in the destination room.
    Moved { first_visit: bool },
    /// Engaged in combat; nothing else was checked.
    InCombat,
    /// Locked door and no key in the inventory.
    Locked,
    /// Not enough energy for the exit's cost.
    NoEnergy,
    /// The exit leads to a location with no room. The player stays put.
    Limbo,
    /// The player, their room or the exit vanished before the move began.
    Invalid,
}

impl MoveOutcome {
    /// Whether the move counts as completed. Limbo does, even though the
    /// player didn't go anywhere.
    pub fn succeeded(self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Limbo)
    }
}

/// Result of trying typed input as an exit of the player's room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// No exit starts with the fragment. The input is someone else's
    /// problem.
    NoMatch,
    /// Several exits matched; the player was asked to be more specific.
    Ambiguous,
    /// Exactly one exit matched and a move was attempted.
    Move(MoveOutcome),
}

impl ExitOutcome {
    /// `true` unless nothing matched. A blocked move (including the
    /// combat lock) still consumed the input.
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::NoMatch)
    }
}

/// Tries `fragment` as a direction out of the player's current room.
pub fn room_exits(ctx: &mut CommandContext<'_>, fragment: &str, player_id: PlayerId) -> ExitOutcome {
    let Some(player) = ctx.world.players.get(player_id) else {
        return ExitOutcome::NoMatch;
    };
    let location = player.location();
    let Some(room) = ctx.world.rooms.get(location) else {
        return ExitOutcome::NoMatch;
    };

    match resolve_exit(room, fragment) {
        ExitMatch::None => ExitOutcome::NoMatch,
        ExitMatch::Ambiguous(_) => {
            player.say_l10n(ctx.catalog, "AMBIG_EXIT", &[]);
            ExitOutcome::Ambiguous
        }
        ExitMatch::One(index) => ExitOutcome::Move(move_through(ctx, location, index, player_id)),
    }
}

/// Moves the player out of `from` through exit `index`.
pub fn move_through(
    ctx: &mut CommandContext<'_>,
    from: LocationId,
    index: usize,
    player_id: PlayerId,
) -> MoveOutcome {
    let catalog = ctx.catalog;
    let events = ctx.events;

    let Some(player) = ctx.world.players.get(player_id) else {
        return MoveOutcome::Invalid;
    };
    if player.is_in_combat() {
        player.say_l10n(catalog, "MOVE_COMBAT", &[]);
        return MoveOutcome::InCombat;
    }

    events.emit_room(ctx.world, from, RoomEvent::PlayerLeave { player: player_id });

    let Some(exit) = ctx.world.rooms.get(from).and_then(|room| room.exit(index)).cloned() else {
        tracing::warn!(%player_id, %from, index, "exit disappeared during leave event");
        return MoveOutcome::Invalid;
    };
    let was_closed = !door::is_open(&exit);

    if door::is_locked(&exit) {
        let key = exit.door.as_ref().and_then(|d| d.key.clone());
        let has_key = match (&key, ctx.world.players.get(player_id)) {
            (Some(key), Some(player)) => player.has_in_inventory(key),
            _ => false,
        };

        if !has_key {
            report_locked(ctx.world, catalog, from, &exit, player_id);
            return MoveOutcome::Locked;
        }

        if let Some(exit) = ctx.world.rooms.get_mut(from).and_then(|r| r.exit_mut(index)) {
            door::unlock_door(exit);
        }
        let key = key.map(|k| k.as_str().to_string()).unwrap_or_default();
        report_unlocked(ctx.world, catalog, from, &key, player_id);
    }

    let to = exit.location;
    if !ctx.world.rooms.contains(to) {
        tracing::warn!(%player_id, %from, %to, direction = %exit.direction, "exit leads to limbo");
        if let Some(player) = ctx.world.players.get(player_id) {
            player.say_l10n(catalog, "LIMBO", &[]);
        }
        return MoveOutcome::Limbo;
    }

    let cost = exit.cost.unwrap_or(ctx.settings.default_move_cost);
    let paid = ctx
        .world
        .players
        .get_mut(player_id)
        .is_some_and(|p| p.spend_energy(cost));
    if !paid {
        if let Some(player) = ctx.world.players.get(player_id) {
            player.say_l10n(catalog, "NO_ENERGY", &[]);
        }
        events.emit_player(ctx.world, player_id, PlayerEvent::NoEnergy { cost });
        return MoveOutcome::NoEnergy;
    }

    if was_closed {
        door::toggle(ctx.world, catalog, DoorAction::Open, from, index, player_id);
    }

    announce_leave(ctx.world, catalog, from, &exit, player_id);

    let Some(player) = ctx.world.players.get_mut(player_id) else {
        return MoveOutcome::Invalid;
    };
    player.set_location(to);
    let first_visit = player.explore(to);
    tracing::debug!(%player_id, %from, %to, first_visit, "player moved");
    if first_visit {
        events.emit_player(ctx.world, player_id, PlayerEvent::Explored { location: to });
    }

    let commands = ctx.commands;
    if !commands.dispatch(ctx, "look", CommandArgs::new("").with_first_visit(first_visit), player_id) {
        tracing::warn!(%player_id, "no look command registered");
    }

    let npcs = ctx
        .world
        .rooms
        .get(to)
        .map(|room| room.npcs.clone())
        .unwrap_or_default();
    for npc in npcs {
        if ctx.world.npcs.get(npc).is_some() {
            events.emit_npc(ctx.world, npc, NpcEvent::PlayerEnter { room: to, player: player_id });
        }
    }

    events.emit_room(ctx.world, to, RoomEvent::PlayerEnter { player: player_id });

    if let Some(name) = ctx.world.players.get(player_id).map(|p| p.name().to_string()) {
        let entered = format!("{name} enters.");
        ctx.world
            .players
            .each_if(|p| p.id() != player_id && p.location() == to, |p| p.say(entered.as_str()));
    }

    MoveOutcome::Moved { first_visit }
}

/// Tells the actor the door is locked and everyone else in the room that
/// they tried it, each with the destination title in their own locale.
fn report_locked(
    world: &World,
    catalog: &MessageCatalog,
    from: LocationId,
    exit: &Exit,
    player_id: PlayerId,
) {
    let Some(actor) = world.players.get(player_id) else {
        return;
    };
    let fallback = catalog.default_locale();
    let title = |p: &Player| match world.rooms.get(exit.location) {
        Some(room) => room.title(p.locale(), fallback).to_string(),
        None => exit.direction.clone(),
    };

    tracing::debug!(%player_id, %from, direction = %exit.direction, "locked door, no key");
    actor.say_l10n(catalog, "LOCKED", &[&title(actor)]);
    for id in world.players.ids_where(|p| p.id() != player_id && p.location() == from) {
        if let Some(other) = world.players.get(id) {
            other.say_l10n(catalog, "OTHER_LOCKED", &[actor.name(), &title(other)]);
        }
    }
}

fn report_unlocked(
    world: &World,
    catalog: &MessageCatalog,
    from: LocationId,
    key: &str,
    player_id: PlayerId,
) {
    let Some(actor) = world.players.get(player_id) else {
        return;
    };
    tracing::debug!(%player_id, %from, key, "door unlocked");
    to_room(from, player_id, Party::Nobody, &world.players, catalog).send(
        RoomMessage::new()
            .first(Message::key("UNLOCKED", &[key]))
            .third(Message::key("OTHER_UNLOCKED", &[actor.name(), key])),
    );
}

/// Tells everyone else in the old room that the player left, using the
/// exit's custom text in each bystander's locale when there is one.
fn announce_leave(
    world: &mut World,
    catalog: &MessageCatalog,
    from: LocationId,
    exit: &Exit,
    player_id: PlayerId,
) {
    let Some(name) = world.players.get(player_id).map(|p| p.name().to_string()) else {
        return;
    };

    world.players.each_if(
        |p| p.id() != player_id && p.location() == from,
        |p| {
            let custom = exit
                .leave_message
                .as_ref()
                .and_then(|messages| messages.get(p.locale()));
            match custom.map(|suffix| format_template(suffix, &[])) {
                Some(Ok(suffix)) => p.say(format!("{name}{suffix}")),
                Some(Err(e)) => {
                    tracing::warn!(
                        player_id = %p.id(),
                        direction = %exit.direction,
                        error = %e,
                        "leave message failed to render"
                    );
                    p.say_l10n(catalog, "LEAVE", &[&name]);
                }
                None => p.say(format!("{name} leaves.")),
            }
            p.prompt();
        },
    );
}
