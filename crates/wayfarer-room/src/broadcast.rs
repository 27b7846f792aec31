//! Differentiated messages for an actor, a target and bystanders.
//!
//! Two scopes:
//!
//! - [`to_room`]: the actor (first party), an optional target (second
//!   party) and everyone else standing in one room (third parties).
//! - [`to_area`]: everyone in the actor's area *except* the actor's own
//!   room, for ambient effects heard from a distance.
//!
//! Messages are [`Message`]s, rendered in each recipient's own locale.

use wayfarer_world::{
    ItemId, LocationId, Message, MessageCatalog, NpcId, PlayerId, Players, Rooms,
};

/// Someone (or something) involved in an action.
///
/// Only `Player` parties receive messages; the other variants exist so
/// callers can name an NPC or item as a party without special-casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Party {
    Player(PlayerId),
    Npc(NpcId),
    Item(ItemId),
    Nobody,
}

impl From<PlayerId> for Party {
    fn from(id: PlayerId) -> Self {
        Self::Player(id)
    }
}

/// Up to three messages, one per audience. Missing ones are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomMessage {
    pub first_party: Option<Message>,
    pub second_party: Option<Message>,
    pub third_party: Option<Message>,
}

impl RoomMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(mut self, message: Message) -> Self {
        self.first_party = Some(message);
        self
    }

    pub fn second(mut self, message: Message) -> Self {
        self.second_party = Some(message);
        self
    }

    pub fn third(mut self, message: Message) -> Self {
        self.third_party = Some(message);
        self
    }
}

// ---------------------------------------------------------------------------
// Room scope
// ---------------------------------------------------------------------------

/// Sender returned by [`to_room`].
pub struct RoomBroadcast<'a> {
    room: LocationId,
    first: Party,
    second: Party,
    players: &'a Players,
    catalog: &'a MessageCatalog,
}

/// Prepares a room-local broadcast. Nothing is sent until
/// [`RoomBroadcast::send`].
pub fn to_room<'a>(
    room: LocationId,
    first: impl Into<Party>,
    second: impl Into<Party>,
    players: &'a Players,
    catalog: &'a MessageCatalog,
) -> RoomBroadcast<'a> {
    RoomBroadcast {
        room,
        first: first.into(),
        second: second.into(),
        players,
        catalog,
    }
}

impl RoomBroadcast<'_> {
    /// Delivers each present message to its audience.
    pub fn send(&self, message: RoomMessage) {
        if let Some(msg) = &message.first_party {
            self.deliver_to_party(&self.first, msg);
        }
        if let Some(msg) = &message.second_party {
            self.deliver_to_party(&self.second, msg);
        }
        if let Some(msg) = &message.third_party {
            for id in self.third_parties() {
                if let Some(player) = self.players.get(id) {
                    player.send(self.catalog, msg);
                }
            }
        }
    }

    /// Players in the room whose account differs from both parties'
    /// accounts. Every session of a party's account is excluded.
    pub fn third_parties(&self) -> Vec<PlayerId> {
        let first = self.account_of(&self.first);
        let second = self.account_of(&self.second);
        self.players.ids_where(|p| {
            p.location() == self.room
                && Some(p.account()) != first
                && Some(p.account()) != second
        })
    }

    fn account_of(&self, party: &Party) -> Option<&str> {
        match party {
            Party::Player(id) => self.players.get(*id).map(|p| p.account()),
            _ => None,
        }
    }

    fn deliver_to_party(&self, party: &Party, message: &Message) {
        if let Party::Player(id) = party {
            if let Some(player) = self.players.get(*id) {
                player.send(self.catalog, message);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Area scope
// ---------------------------------------------------------------------------

/// Sender returned by [`to_area`].
pub struct AreaBroadcast<'a> {
    actor: PlayerId,
    rooms: &'a Rooms,
    players: &'a Players,
    catalog: &'a MessageCatalog,
}

/// Prepares an area-wide broadcast around `actor`.
pub fn to_area<'a>(
    actor: PlayerId,
    rooms: &'a Rooms,
    players: &'a Players,
    catalog: &'a MessageCatalog,
) -> AreaBroadcast<'a> {
    AreaBroadcast {
        actor,
        rooms,
        players,
        catalog,
    }
}

impl AreaBroadcast<'_> {
    pub fn send(&self, message: Message) {
        for id in self.recipients() {
            if let Some(player) = self.players.get(id) {
                player.send(self.catalog, &message);
                player.prompt();
            }
        }
    }

    /// Other players in the same area but not the same room. Empty when
    /// the actor is missing or stands in a room that doesn't exist.
    pub fn recipients(&self) -> Vec<PlayerId> {
        let Some(actor) = self.players.get(self.actor) else {
            return Vec::new();
        };
        let here = actor.location();
        let Some(area) = self.rooms.area_of(here) else {
            return Vec::new();
        };

        self.players.ids_where(|p| {
            p.id() != self.actor
                && p.location() != here
                && self.rooms.area_of(p.location()) == Some(area)
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use wayfarer_world::{AreaId, Localized, Outbound, Player, Room};

    use super::*;

    type Rx = mpsc::UnboundedReceiver<Outbound>;

    fn lines(rx: &mut Rx) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let Outbound::Line(text) = msg {
                out.push(text);
            }
        }
        out
    }

    fn add(players: &mut Players, id: u64, account: &str, location: u64) -> Rx {
        let (tx, rx) = mpsc::unbounded_channel();
        players.insert(
            Player::new(PlayerId(id), account, account, LocationId(location)).with_sender(tx),
        );
        rx
    }

    fn rooms() -> Rooms {
        let mut rooms = Rooms::new();
        for (loc, area) in [(1, "town"), (2, "town"), (3, "forest")] {
            rooms.insert(Room::new(
                LocationId(loc),
                AreaId::new(area),
                Localized::new().with("en", "room"),
            ));
        }
        rooms
    }

    #[test]
    fn test_to_room_delivers_three_audiences() {
        let catalog = MessageCatalog::english_defaults();
        let mut players = Players::new();
        let mut actor = add(&mut players, 1, "ann", 1);
        let mut target = add(&mut players, 2, "bob", 1);
        let mut bystander = add(&mut players, 3, "cat", 1);
        let mut elsewhere = add(&mut players, 4, "dan", 2);

        to_room(LocationId(1), PlayerId(1), PlayerId(2), &players, &catalog).send(
            RoomMessage::new()
                .first(Message::raw("you wave"))
                .second(Message::raw("ann waves at you"))
                .third(Message::raw("ann waves at bob")),
        );

        assert_eq!(lines(&mut actor), vec!["you wave"]);
        assert_eq!(lines(&mut target), vec!["ann waves at you"]);
        assert_eq!(lines(&mut bystander), vec!["ann waves at bob"]);
        assert!(lines(&mut elsewhere).is_empty());
    }

    #[test]
    fn test_to_room_excludes_every_session_of_party_accounts() {
        let catalog = MessageCatalog::english_defaults();
        let mut players = Players::new();
        let _actor = add(&mut players, 1, "ann", 1);
        let mut second_session = add(&mut players, 2, "ann", 1);
        let mut bystander = add(&mut players, 3, "cat", 1);

        let broadcast = to_room(LocationId(1), PlayerId(1), Party::Nobody, &players, &catalog);
        assert_eq!(broadcast.third_parties(), vec![PlayerId(3)]);

        broadcast.send(RoomMessage::new().third(Message::raw("ann sneezes")));
        assert!(lines(&mut second_session).is_empty());
        assert_eq!(lines(&mut bystander), vec!["ann sneezes"]);
    }

    #[test]
    fn test_to_room_non_player_parties_are_noops() {
        let catalog = MessageCatalog::english_defaults();
        let mut players = Players::new();
        let mut bystander = add(&mut players, 3, "cat", 1);

        to_room(
            LocationId(1),
            Party::Npc(NpcId(9)),
            Party::Item(ItemId::new("rock")),
            &players,
            &catalog,
        )
        .send(
            RoomMessage::new()
                .first(Message::raw("to npc"))
                .second(Message::raw("to item"))
                .third(Message::raw("the goblin kicks a rock")),
        );

        assert_eq!(lines(&mut bystander), vec!["the goblin kicks a rock"]);
    }

    #[test]
    fn test_to_room_renders_per_locale() {
        let catalog = MessageCatalog::english_defaults().with("LEAVE", "es", "%s se va.");
        let mut players = Players::new();
        let _actor = add(&mut players, 1, "ann", 1);
        let (tx, mut rx) = mpsc::unbounded_channel();
        players.insert(
            Player::new(PlayerId(2), "eva", "Eva", LocationId(1))
                .with_locale(wayfarer_world::Locale::new("es"))
                .with_sender(tx),
        );

        to_room(LocationId(1), PlayerId(1), Party::Nobody, &players, &catalog)
            .send(RoomMessage::new().third(Message::key("LEAVE", &["Ann"])));
        assert_eq!(lines(&mut rx), vec!["Ann se va."]);
    }

    #[test]
    fn test_to_area_skips_actor_and_actor_room() {
        let catalog = MessageCatalog::english_defaults();
        let rooms = rooms();
        let mut players = Players::new();
        let mut actor = add(&mut players, 1, "ann", 1);
        let mut same_room = add(&mut players, 2, "bob", 1);
        let mut same_area = add(&mut players, 3, "cat", 2);
        let mut other_area = add(&mut players, 4, "dan", 3);

        let broadcast = to_area(PlayerId(1), &rooms, &players, &catalog);
        assert_eq!(broadcast.recipients(), vec![PlayerId(3)]);
        broadcast.send(Message::raw("A bell tolls in the distance."));

        assert!(lines(&mut actor).is_empty());
        assert!(lines(&mut same_room).is_empty());
        assert_eq!(lines(&mut same_area), vec!["A bell tolls in the distance."]);
        assert!(lines(&mut other_area).is_empty());
    }

    #[test]
    fn test_to_area_same_account_elsewhere_still_hears() {
        let catalog = MessageCatalog::english_defaults();
        let rooms = rooms();
        let mut players = Players::new();
        let _actor = add(&mut players, 1, "ann", 1);
        let _alt = add(&mut players, 2, "ann", 2);
        assert_eq!(
            to_area(PlayerId(1), &rooms, &players, &catalog).recipients(),
            vec![PlayerId(2)]
        );
    }
}
