//! Typed events per entity kind.
//!
//! Rooms, NPCs and players don't carry their own emitters. Listeners are
//! registered on an [`EventBus`] that lives next to the [`World`], and
//! every emit hands the listener the whole world so scripts can react
//! (greet, attack, escort) with full access to the registries.
//!
//! Listeners run synchronously, in registration order, before `emit_*`
//! returns.

use std::collections::HashMap;

use crate::{ItemId, LocationId, NpcId, PlayerId, World};

/// Events fired on a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// A player is about to leave the room. Fired before any movement
    /// check, so it also fires for attempts that end up blocked.
    PlayerLeave { player: PlayerId },
    /// A player has arrived in the room.
    PlayerEnter { player: PlayerId },
}

/// Events delivered to an NPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NpcEvent {
    /// A player walked into the room the NPC is in.
    PlayerEnter { room: LocationId, player: PlayerId },
}

/// Events fired on a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A move failed for lack of energy.
    NoEnergy { cost: u32 },
    Meditate,
    Remove { item: ItemId },
    /// A room was visited for the first time.
    Explored { location: LocationId },
}

pub type RoomListener = Box<dyn Fn(&mut World, LocationId, &RoomEvent) + Send + Sync>;
pub type NpcListener = Box<dyn Fn(&mut World, NpcId, &NpcEvent) + Send + Sync>;
pub type PlayerListener = Box<dyn Fn(&mut World, PlayerId, &PlayerEvent) + Send + Sync>;

#[derive(Default)]
pub struct EventBus {
    rooms: HashMap<LocationId, Vec<RoomListener>>,
    any_room: Vec<RoomListener>,
    npcs: HashMap<NpcId, Vec<NpcListener>>,
    players: Vec<PlayerListener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listens to events on one room.
    pub fn on_room<F>(&mut self, location: LocationId, listener: F)
    where
        F: Fn(&mut World, LocationId, &RoomEvent) + Send + Sync + 'static,
    {
        self.rooms
            .entry(location)
            .or_default()
            .push(Box::new(listener));
    }

    /// Listens to events on every room.
    pub fn on_any_room<F>(&mut self, listener: F)
    where
        F: Fn(&mut World, LocationId, &RoomEvent) + Send + Sync + 'static,
    {
        self.any_room.push(Box::new(listener));
    }

    /// Attaches a script to one NPC.
    pub fn on_npc<F>(&mut self, npc: NpcId, listener: F)
    where
        F: Fn(&mut World, NpcId, &NpcEvent) + Send + Sync + 'static,
    {
        self.npcs.entry(npc).or_default().push(Box::new(listener));
    }

    pub fn on_player<F>(&mut self, listener: F)
    where
        F: Fn(&mut World, PlayerId, &PlayerEvent) + Send + Sync + 'static,
    {
        self.players.push(Box::new(listener));
    }

    /// Room-specific listeners run before the global ones.
    pub fn emit_room(&self, world: &mut World, location: LocationId, event: RoomEvent) {
        tracing::trace!(%location, ?event, "room event");
        let specific = self.rooms.get(&location).into_iter().flatten();
        for listener in specific.chain(self.any_room.iter()) {
            listener(world, location, &event);
        }
    }

    pub fn emit_npc(&self, world: &mut World, npc: NpcId, event: NpcEvent) {
        tracing::trace!(%npc, ?event, "npc event");
        if let Some(listeners) = self.npcs.get(&npc) {
            for listener in listeners {
                listener(world, npc, &event);
            }
        }
    }

    pub fn emit_player(&self, world: &mut World, player: PlayerId, event: PlayerEvent) {
        tracing::trace!(%player, ?event, "player event");
        for listener in &self.players {
            listener(world, player, &event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("room_listeners", &self.rooms.values().map(Vec::len).sum::<usize>())
            .field("any_room_listeners", &self.any_room.len())
            .field("npc_listeners", &self.npcs.values().map(Vec::len).sum::<usize>())
            .field("player_listeners", &self.players.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::Player;

    #[test]
    fn test_room_listeners_run_specific_then_global() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();

        let o = Arc::clone(&order);
        bus.on_any_room(move |_, _, _| o.lock().unwrap().push("global"));
        let o = Arc::clone(&order);
        bus.on_room(LocationId(1), move |_, _, _| o.lock().unwrap().push("room"));

        let mut world = World::new();
        bus.emit_room(&mut world, LocationId(1), RoomEvent::PlayerEnter { player: PlayerId(1) });
        bus.emit_room(&mut world, LocationId(2), RoomEvent::PlayerEnter { player: PlayerId(1) });

        assert_eq!(*order.lock().unwrap(), vec!["room", "global", "global"]);
    }

    #[test]
    fn test_npc_listener_can_mutate_world() {
        let mut bus = EventBus::new();
        bus.on_npc(NpcId(7), |world, _, event| {
            let NpcEvent::PlayerEnter { player, .. } = event;
            if let Some(p) = world.players.get_mut(*player) {
                p.set_in_combat(true);
            }
        });

        let mut world = World::new();
        world
            .players
            .insert(Player::new(PlayerId(1), "ann", "Ann", LocationId(1)));
        bus.emit_npc(
            &mut world,
            NpcId(7),
            NpcEvent::PlayerEnter { room: LocationId(1), player: PlayerId(1) },
        );

        assert!(world.players.get(PlayerId(1)).unwrap().is_in_combat());
    }
}
