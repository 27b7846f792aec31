//! Rooms, exits and doors.
//!
//! Topology is fixed once the world is loaded. The only thing that changes
//! on a room afterwards is the state of the doors on its exits; who is
//! standing in a room is tracked by the player and NPC registries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AreaId, ItemId, Locale, LocationId, NpcId};

// ---------------------------------------------------------------------------
// Localized text
// ---------------------------------------------------------------------------

/// A piece of text keyed by locale, e.g. `{ "en": "Town Square", "es": "Plaza" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized(BTreeMap<Locale, String>);

impl Localized {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert, handy for tests and fixtures.
    pub fn with(mut self, locale: &str, text: impl Into<String>) -> Self {
        self.0.insert(Locale::new(locale), text.into());
        self
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, locale: &Locale) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Looks up `locale`, then `fallback`, then any translation at all.
    pub fn resolve(&self, locale: &Locale, fallback: &Locale) -> &str {
        self.get(locale)
            .or_else(|| self.get(fallback))
            .or_else(|| self.0.values().next().map(String::as_str))
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies every translation of `other` over this one.
    pub fn overlay(&mut self, other: Localized) {
        self.0.extend(other.0);
    }
}

// ---------------------------------------------------------------------------
// Doors
// ---------------------------------------------------------------------------

/// The state of a door. An exit without a door behaves like `Open`.
///
/// ```text
/// Open ⇄ Closed ⇄ Locked
/// ```
///
/// There is no edge between `Open` and `Locked`: a locked door is always
/// closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorState {
    Open,
    Closed,
    Locked,
}

impl DoorState {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }

    /// Returns `true` if a single step can take the door to `target`.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Closed)
                | (Self::Closed, Self::Open)
                | (Self::Closed, Self::Locked)
                | (Self::Locked, Self::Closed)
        )
    }
}

impl std::fmt::Display for DoorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Locked => write!(f, "locked"),
        }
    }
}

/// A door on an exit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub state: DoorState,
    /// Item that unlocks this door. A locked door with no key can never be
    /// unlocked by a player.
    #[serde(default)]
    pub key: Option<ItemId>,
}

impl Door {
    pub fn new(state: DoorState, key: Option<ItemId>) -> Self {
        Self { state, key }
    }
}

// ---------------------------------------------------------------------------
// Exits
// ---------------------------------------------------------------------------

/// A one-way connection from a room to a destination location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    /// Direction name the player types a prefix of, e.g. `"north"`.
    pub direction: String,
    /// Destination vnum. May point at a room that does not exist (limbo).
    pub location: LocationId,
    #[serde(default)]
    pub door: Option<Door>,
    /// Per-locale text appended to the mover's name for bystanders,
    /// e.g. `" heads up the stairs."`.
    #[serde(default)]
    pub leave_message: Option<Localized>,
    /// Energy cost. `None` means the configured default.
    #[serde(default)]
    pub cost: Option<u32>,
}

impl Exit {
    pub fn new(direction: impl Into<String>, location: LocationId) -> Self {
        Self {
            direction: direction.into(),
            location,
            door: None,
            leave_message: None,
            cost: None,
        }
    }

    pub fn with_door(mut self, door: Door) -> Self {
        self.door = Some(door);
        self
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_leave_message(mut self, message: Localized) -> Self {
        self.leave_message = Some(message);
        self
    }
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub location: LocationId,
    pub area: AreaId,
    pub title: Localized,
    #[serde(default)]
    pub description: Localized,
    /// Ordered: exit order is the order the resolver reports matches in.
    #[serde(default)]
    pub exits: Vec<Exit>,
    #[serde(default)]
    pub npcs: Vec<NpcId>,
}

impl Room {
    pub fn new(location: LocationId, area: AreaId, title: Localized) -> Self {
        Self {
            location,
            area,
            title,
            description: Localized::new(),
            exits: Vec::new(),
            npcs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: Localized) -> Self {
        self.description = description;
        self
    }

    pub fn with_exit(mut self, exit: Exit) -> Self {
        self.exits.push(exit);
        self
    }

    pub fn with_npc(mut self, npc: NpcId) -> Self {
        self.npcs.push(npc);
        self
    }

    pub fn title(&self, locale: &Locale, fallback: &Locale) -> &str {
        self.title.resolve(locale, fallback)
    }

    pub fn exit(&self, index: usize) -> Option<&Exit> {
        self.exits.get(index)
    }

    pub fn exit_mut(&mut self, index: usize) -> Option<&mut Exit> {
        self.exits.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_resolve_falls_back() {
        let text = Localized::new().with("en", "Square").with("es", "Plaza");
        let en = Locale::new("en");
        assert_eq!(text.resolve(&Locale::new("es"), &en), "Plaza");
        assert_eq!(text.resolve(&Locale::new("fr"), &en), "Square");
        assert_eq!(Localized::new().resolve(&en, &en), "");
    }

    #[test]
    fn test_door_state_transitions_never_skip_closed() {
        assert!(DoorState::Open.can_transition_to(DoorState::Closed));
        assert!(DoorState::Locked.can_transition_to(DoorState::Closed));
        assert!(!DoorState::Open.can_transition_to(DoorState::Locked));
        assert!(!DoorState::Locked.can_transition_to(DoorState::Open));
    }

    #[test]
    fn test_exit_deserializes_with_defaults() {
        let exit: Exit =
            serde_json::from_str(r#"{ "direction": "north", "location": 2 }"#).unwrap();
        assert_eq!(exit.direction, "north");
        assert_eq!(exit.location, LocationId(2));
        assert!(exit.door.is_none());
        assert!(exit.cost.is_none());
    }

    #[test]
    fn test_door_deserializes_snake_case_state() {
        let door: Door =
            serde_json::from_str(r#"{ "state": "locked", "key": "brass-key" }"#).unwrap();
        assert_eq!(door.state, DoorState::Locked);
        assert_eq!(door.key, Some(ItemId::new("brass-key")));
    }
}
