//! Registries for rooms, players, NPCs and items, plus the [`World`] that
//! owns them.
//!
//! Iteration helpers that hand out `&mut Player` take a snapshot of the
//! matching ids first and then visit each id that is still registered.
//! A callback that moves or removes a player can't invalidate the loop;
//! the predicate is evaluated once, at snapshot time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AreaId, ItemId, Localized, LocationId, NpcId, Player, PlayerId, Room, WorldError};

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Rooms {
    rooms: BTreeMap<LocationId, Room>,
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room, returning the one it replaced.
    pub fn insert(&mut self, room: Room) -> Option<Room> {
        self.rooms.insert(room.location, room)
    }

    pub fn get(&self, location: LocationId) -> Option<&Room> {
        self.rooms.get(&location)
    }

    pub fn get_mut(&mut self, location: LocationId) -> Option<&mut Room> {
        self.rooms.get_mut(&location)
    }

    pub fn contains(&self, location: LocationId) -> bool {
        self.rooms.contains_key(&location)
    }

    pub fn area_of(&self, location: LocationId) -> Option<&AreaId> {
        self.rooms.get(&location).map(|r| &r.area)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Players {
    players: BTreeMap<PlayerId, Player>,
}

impl Players {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: Player) -> Option<Player> {
        self.players.insert(player.id(), player)
    }

    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Snapshot of the ids of every player matching `pred`, in id order.
    pub fn ids_where(&self, mut pred: impl FnMut(&Player) -> bool) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| pred(p))
            .map(Player::id)
            .collect()
    }

    /// Ids of the players standing in `location`.
    pub fn in_room(&self, location: LocationId) -> Vec<PlayerId> {
        self.ids_where(|p| p.location() == location)
    }

    /// Calls `f` for every player matching `pred`.
    pub fn each_if(
        &mut self,
        pred: impl FnMut(&Player) -> bool,
        mut f: impl FnMut(&mut Player),
    ) {
        for id in self.ids_where(pred) {
            if let Some(player) = self.players.get_mut(&id) {
                f(player);
            }
        }
    }

    /// Calls `f` for every player except `except`.
    pub fn each_except(&mut self, except: PlayerId, f: impl FnMut(&mut Player)) {
        self.each_if(|p| p.id() != except, f);
    }
}

// ---------------------------------------------------------------------------
// NPCs and items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    pub id: NpcId,
    pub name: Localized,
    pub location: LocationId,
}

#[derive(Debug, Default)]
pub struct Npcs {
    npcs: BTreeMap<NpcId, Npc>,
}

impl Npcs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, npc: Npc) -> Option<Npc> {
        self.npcs.insert(npc.id, npc)
    }

    pub fn get(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(&id)
    }

    pub fn get_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        self.npcs.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Npc> {
        self.npcs.values()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: Localized,
}

#[derive(Debug, Default)]
pub struct Items {
    items: BTreeMap<ItemId, Item>,
}

impl Items {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.id.clone(), item)
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Static world content as stored in a world file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldDefinition {
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub npcs: Vec<Npc>,
}

/// Every registry the core operates on. Constructed once and passed
/// explicitly; there is no global world.
#[derive(Debug, Default)]
pub struct World {
    pub rooms: Rooms,
    pub items: Items,
    pub players: Players,
    pub npcs: Npcs,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a world from a definition, rejecting duplicate ids.
    pub fn from_definition(definition: WorldDefinition) -> Result<Self, WorldError> {
        let mut world = Self::new();

        for room in definition.rooms {
            let location = room.location;
            if world.rooms.insert(room).is_some() {
                return Err(WorldError::DuplicateRoom(location));
            }
        }
        for item in definition.items {
            let id = item.id.clone();
            if world.items.insert(item).is_some() {
                return Err(WorldError::DuplicateItem(id));
            }
        }
        for npc in definition.npcs {
            let id = npc.id;
            if world.npcs.insert(npc).is_some() {
                return Err(WorldError::DuplicateNpc(id));
            }
        }

        tracing::info!(rooms = world.rooms.len(), "world loaded");
        Ok(world)
    }

    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        Self::from_definition(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, WorldError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
