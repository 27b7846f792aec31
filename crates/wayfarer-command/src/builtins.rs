//! Commands every world gets: `look`, `open`, `close` and admin `teleport`.

use std::sync::Arc;

use wayfarer_room::door::{self, DoorAction};
use wayfarer_world::{LocationId, PlayerId};

use crate::{CommandArgs, CommandContext, CommandTable};

pub(crate) fn install(table: &mut CommandTable) {
    table.push_command("look", Arc::new(look));
    table.push_command("open", Arc::new(open));
    table.push_command("close", Arc::new(close));
    table.push_alias("l", "look");
    table.push_admin("teleport", Arc::new(teleport));
}

/// Renders the player's room: title, description, exits, then whoever is
/// here.
///
/// The description is skipped for rooms the player has seen before when
/// their `brief` preference is `on`.
pub fn look(ctx: &mut CommandContext<'_>, args: CommandArgs<'_>, player_id: PlayerId) {
    let world = &*ctx.world;
    let catalog = ctx.catalog;
    let Some(player) = world.players.get(player_id) else {
        return;
    };
    let Some(room) = world.rooms.get(player.location()) else {
        player.say_l10n(catalog, "LOOK_NOWHERE", &[]);
        return;
    };
    let locale = player.locale();
    let fallback = catalog.default_locale();

    player.say(room.title(locale, fallback));

    let brief = player.preference("brief") == Some("on");
    if (args.first_visit || !brief) && !room.description.is_empty() {
        player.say(room.description.resolve(locale, fallback));
    }

    if room.exits.is_empty() {
        player.say_l10n(catalog, "LOOK_NO_EXITS", &[]);
    } else {
        let directions: Vec<&str> = room.exits.iter().map(|e| e.direction.as_str()).collect();
        player.say_l10n(catalog, "LOOK_EXITS", &[&directions.join(", ")]);
    }

    for id in world.players.ids_where(|p| p.id() != player_id && p.location() == room.location) {
        if let Some(other) = world.players.get(id) {
            player.say_l10n(catalog, "LOOK_HERE", &[other.name()]);
        }
    }
    for npc in room.npcs.iter().filter_map(|id| world.npcs.get(*id)) {
        player.say_l10n(catalog, "LOOK_HERE", &[npc.name.resolve(locale, fallback)]);
    }
}

pub fn open(ctx: &mut CommandContext<'_>, args: CommandArgs<'_>, player_id: PlayerId) {
    door::open_or_close(ctx.world, ctx.catalog, DoorAction::Open, args.text, player_id);
}

pub fn close(ctx: &mut CommandContext<'_>, args: CommandArgs<'_>, player_id: PlayerId) {
    door::open_or_close(ctx.world, ctx.catalog, DoorAction::Close, args.text, player_id);
}

/// `teleport <vnum>`
pub fn teleport(ctx: &mut CommandContext<'_>, player_id: PlayerId, args: &str) {
    let vnum = match args.trim().parse::<u64>() {
        Ok(vnum) => LocationId(vnum),
        Err(_) => {
            if let Some(player) = ctx.world.players.get(player_id) {
                player.say("ADMIN: Invalid vnum.");
            }
            return;
        }
    };

    if !ctx.world.rooms.contains(vnum) {
        if let Some(player) = ctx.world.players.get(player_id) {
            player.say("ADMIN: 404: Room not found.");
        }
        return;
    }

    let Some(player) = ctx.world.players.get_mut(player_id) else {
        return;
    };
    player.set_location(vnum);
    player.say("ADMIN: You have teleported.");
    tracing::info!(%player_id, to = %vnum, "admin teleport");

    let commands = ctx.commands;
    commands.dispatch(ctx, "look", "", player_id);
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use wayfarer_world::{
        AreaId, EventBus, Exit, Localized, MessageCatalog, Npc, NpcId, Outbound, Player, Room,
        World,
    };

    use super::*;
    use crate::{CommandRegistry, CommandSettings};

    fn world() -> (World, mpsc::UnboundedReceiver<Outbound>) {
        let mut world = World::new();
        world.rooms.insert(
            Room::new(LocationId(1), AreaId::new("town"), Localized::new().with("en", "Square"))
                .with_description(Localized::new().with("en", "A cobbled square."))
                .with_exit(Exit::new("north", LocationId(2)))
                .with_exit(Exit::new("east", LocationId(3)))
                .with_npc(NpcId(7)),
        );
        world.rooms.insert(Room::new(
            LocationId(2),
            AreaId::new("town"),
            Localized::new().with("en", "Gate"),
        ));
        world.npcs.insert(Npc {
            id: NpcId(7),
            name: Localized::new().with("en", "A pigeon"),
            location: LocationId(1),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        world
            .players
            .insert(Player::new(PlayerId(1), "ann", "Ann", LocationId(1)).with_sender(tx));
        world
            .players
            .insert(Player::new(PlayerId(2), "bob", "Bob", LocationId(1)));
        (world, rx)
    }

    fn registry() -> CommandRegistry {
        CommandTable::with_builtins().build(8).unwrap()
    }

    fn lines(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let Outbound::Line(text) = msg {
                out.push(text);
            }
        }
        out
    }

    #[test]
    fn test_look_renders_room() {
        let (mut world, mut rx) = world();
        let registry = registry();
        let events = EventBus::new();
        let catalog = MessageCatalog::english_defaults();
        let settings = CommandSettings::default();
        let mut ctx = CommandContext::new(&mut world, &registry, &events, &catalog, &settings);

        assert!(registry.dispatch(&mut ctx, "l", "", PlayerId(1)));
        assert_eq!(
            lines(&mut rx),
            vec![
                "Square",
                "A cobbled square.",
                "[Exits: north, east]",
                "Bob is here.",
                "A pigeon is here.",
            ]
        );
    }

    #[test]
    fn test_brief_hides_description_unless_first_visit() {
        let (mut world, mut rx) = world();
        world
            .players
            .get_mut(PlayerId(1))
            .unwrap()
            .set_preference("brief", "on");
        let registry = registry();
        let events = EventBus::new();
        let catalog = MessageCatalog::english_defaults();
        let settings = CommandSettings::default();
        let mut ctx = CommandContext::new(&mut world, &registry, &events, &catalog, &settings);

        registry.dispatch(&mut ctx, "look", "", PlayerId(1));
        assert!(!lines(&mut rx).contains(&"A cobbled square.".to_string()));

        registry.dispatch(
            &mut ctx,
            "look",
            CommandArgs::new("").with_first_visit(true),
            PlayerId(1),
        );
        assert!(lines(&mut rx).contains(&"A cobbled square.".to_string()));
    }

    #[test]
    fn test_teleport_messages() {
        let (mut world, mut rx) = world();
        let registry = registry();
        let events = EventBus::new();
        let catalog = MessageCatalog::english_defaults();
        let settings = CommandSettings::default();
        let mut ctx = CommandContext::new(&mut world, &registry, &events, &catalog, &settings);

        registry.dispatch_admin(&mut ctx, "teleport", PlayerId(1), "nowhere");
        registry.dispatch_admin(&mut ctx, "teleport", PlayerId(1), "99");
        assert_eq!(
            lines(&mut rx),
            vec!["ADMIN: Invalid vnum.", "ADMIN: 404: Room not found."]
        );
        assert_eq!(ctx.world.players.get(PlayerId(1)).unwrap().location(), LocationId(1));

        registry.dispatch_admin(&mut ctx, "teleport", PlayerId(1), " 2 ");
        assert_eq!(ctx.world.players.get(PlayerId(1)).unwrap().location(), LocationId(2));
        let out = lines(&mut rx);
        assert_eq!(out[0], "ADMIN: You have teleported.");
        assert_eq!(out[1], "Gate");
        assert_eq!(out[2], "[Exits: none]");
    }
}
