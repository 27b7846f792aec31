//! Player state and output.

use std::collections::{BTreeMap, HashMap, HashSet};

use tokio::sync::mpsc;

use crate::{ItemId, Locale, LocationId, Message, MessageCatalog, PlayerId};

/// An outbound message from the world to a player's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// One line of text.
    Line(String),
    /// Ask the client to redraw its prompt.
    Prompt,
}

/// Channel sender for delivering output to a player.
pub type PlayerSender = mpsc::UnboundedSender<Outbound>;

/// A player session in the world.
///
/// Output goes through the attached [`PlayerSender`]. A player without a
/// sender (not connected yet, or in tests that don't care) silently drops
/// everything it is told.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    account: String,
    name: String,
    location: LocationId,
    locale: Locale,
    energy: u32,
    explored: HashSet<LocationId>,
    inventory: Vec<ItemId>,
    /// Wear slot → item.
    equipment: BTreeMap<String, ItemId>,
    preferences: HashMap<String, String>,
    in_combat: bool,
    admin: bool,
    sender: Option<PlayerSender>,
}

impl Player {
    pub fn new(
        id: PlayerId,
        account: impl Into<String>,
        name: impl Into<String>,
        location: LocationId,
    ) -> Self {
        Self {
            id,
            account: account.into(),
            name: name.into(),
            location,
            locale: Locale::default(),
            energy: 0,
            explored: HashSet::new(),
            inventory: Vec::new(),
            equipment: BTreeMap::new(),
            preferences: HashMap::new(),
            in_combat: false,
            admin: false,
            sender: None,
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_energy(mut self, energy: u32) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_item(mut self, item: ItemId) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn with_sender(mut self, sender: PlayerSender) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    // -- identity --

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this player may run admin commands.
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn set_admin(&mut self, admin: bool) {
        self.admin = admin;
    }

    // -- location --

    pub fn location(&self) -> LocationId {
        self.location
    }

    pub fn set_location(&mut self, location: LocationId) {
        self.location = location;
    }

    /// Marks `location` as explored. Returns `true` on the first visit.
    pub fn explore(&mut self, location: LocationId) -> bool {
        self.explored.insert(location)
    }

    pub fn has_explored(&self, location: LocationId) -> bool {
        self.explored.contains(&location)
    }

    // -- locale and preferences --

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn preference(&self, key: &str) -> Option<&str> {
        self.preferences.get(key).map(String::as_str)
    }

    pub fn set_preference(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.preferences.insert(key.into(), value.into());
    }

    // -- combat and energy --

    pub fn is_in_combat(&self) -> bool {
        self.in_combat
    }

    pub fn set_in_combat(&mut self, in_combat: bool) {
        self.in_combat = in_combat;
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn set_energy(&mut self, energy: u32) {
        self.energy = energy;
    }

    pub fn has_energy(&self, cost: u32) -> bool {
        self.energy >= cost
    }

    /// Deducts `cost` if the player can afford it. Returns `false` and
    /// leaves energy untouched otherwise.
    pub fn spend_energy(&mut self, cost: u32) -> bool {
        if !self.has_energy(cost) {
            return false;
        }
        self.energy -= cost;
        true
    }

    // -- items --

    pub fn inventory(&self) -> &[ItemId] {
        &self.inventory
    }

    pub fn add_item(&mut self, item: ItemId) {
        self.inventory.push(item);
    }

    pub fn has_in_inventory(&self, item: &ItemId) -> bool {
        self.inventory.contains(item)
    }

    pub fn equipped(&self) -> &BTreeMap<String, ItemId> {
        &self.equipment
    }

    /// Moves an inventory item into a wear slot.
    pub fn equip(&mut self, slot: impl Into<String>, item: ItemId) {
        self.inventory.retain(|held| held != &item);
        self.equipment.insert(slot.into(), item);
    }

    /// Moves an equipped item back to the inventory. Returns `false` if it
    /// was not equipped.
    pub fn unequip(&mut self, item: &ItemId) -> bool {
        let slot = self
            .equipment
            .iter()
            .find(|(_, worn)| *worn == item)
            .map(|(slot, _)| slot.clone());
        match slot {
            Some(slot) => {
                self.equipment.remove(&slot);
                self.inventory.push(item.clone());
                true
            }
            None => false,
        }
    }

    // -- output --

    pub fn connect(&mut self, sender: PlayerSender) {
        self.sender = Some(sender);
    }

    pub fn disconnect(&mut self) {
        self.sender = None;
    }

    pub fn is_connected(&self) -> bool {
        self.sender.as_ref().is_some_and(|s| !s.is_closed())
    }

    /// Sends raw text. Drops it if the receiver is gone.
    pub fn say(&self, text: impl Into<String>) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(Outbound::Line(text.into()));
        }
    }

    pub fn prompt(&self) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(Outbound::Prompt);
        }
    }

    /// Sends a catalog message in this player's locale.
    ///
    /// A missing key or a template/argument mismatch is logged and the bare
    /// key is delivered instead; it never reaches the caller.
    pub fn say_l10n(&self, catalog: &MessageCatalog, key: &str, args: &[&str]) {
        match catalog.translate(&self.locale, key, args) {
            Ok(text) => self.say(text),
            Err(e) => {
                tracing::warn!(player_id = %self.id, key, error = %e, "message failed to render");
                self.say(key);
            }
        }
    }

    /// Sends a [`Message`], rendering it in this player's locale.
    pub fn send(&self, catalog: &MessageCatalog, message: &Message) {
        match message {
            Message::Raw(text) => self.say(text.clone()),
            Message::Key { key, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.say_l10n(catalog, key, &args);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(PlayerId(1), "ann", "Ann", LocationId(1))
    }

    #[test]
    fn test_explore_reports_first_visit_once() {
        let mut p = player();
        assert!(p.explore(LocationId(2)));
        assert!(!p.explore(LocationId(2)));
        assert!(p.has_explored(LocationId(2)));
    }

    #[test]
    fn test_spend_energy_is_all_or_nothing() {
        let mut p = player().with_energy(2);
        assert!(!p.spend_energy(3));
        assert_eq!(p.energy(), 2);
        assert!(p.spend_energy(2));
        assert_eq!(p.energy(), 0);
    }

    #[test]
    fn test_equip_and_unequip_move_items() {
        let key = ItemId::new("brass-key");
        let mut p = player().with_item(key.clone());
        p.equip("held", key.clone());
        assert!(!p.has_in_inventory(&key));
        assert!(p.unequip(&key));
        assert!(p.has_in_inventory(&key));
        assert!(!p.unequip(&key));
    }

    #[test]
    fn test_say_delivers_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let p = player().with_sender(tx);
        p.say("hello");
        p.prompt();
        assert_eq!(rx.try_recv().unwrap(), Outbound::Line("hello".into()));
        assert_eq!(rx.try_recv().unwrap(), Outbound::Prompt);
    }

    #[test]
    fn test_say_l10n_falls_back_to_key() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let p = player().with_sender(tx);
        p.say_l10n(&MessageCatalog::english_defaults(), "LOCKED", &[]);
        assert_eq!(rx.try_recv().unwrap(), Outbound::Line("LOCKED".into()));
    }

    #[test]
    fn test_admin_flag() {
        let mut p = player();
        assert!(!p.is_admin());
        p.set_admin(true);
        assert!(p.is_admin());
        assert!(player().with_admin(true).is_admin());
    }

    #[test]
    fn test_disconnected_player_drops_output() {
        let p = player();
        assert!(!p.is_connected());
        p.say("nobody hears this");
    }
}
