//! A five-room hamlet driven from stdin.
//!
//! ```text
//! cargo run -p hamlet
//! RUST_LOG=wayfarer_command=debug cargo run -p hamlet
//! ```
//!
//! Try `n`, `open storeroom`, `e`, `search`, `me waves`, `@teleport 4`.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use wayfarer::prelude::*;
use wayfarer::room::{to_room, Party, RoomMessage};

const WORLD: &str = include_str!("../world.json");
const HERO: PlayerId = PlayerId(1);

// ---------------------------------------------------------------------------
// Leaf commands
// ---------------------------------------------------------------------------

fn emote(ctx: &mut CommandContext<'_>, args: CommandArgs<'_>, player_id: PlayerId) {
    let Some(player) = ctx.world.players.get(player_id) else {
        return;
    };
    let text = format!("{} {}", player.name(), args.text.trim());
    to_room(player.location(), player_id, Party::Nobody, &ctx.world.players, ctx.catalog).send(
        RoomMessage::new()
            .first(Message::raw(text.clone()))
            .third(Message::raw(text)),
    );
}

fn search(ctx: &mut CommandContext<'_>, _args: CommandArgs<'_>, player_id: PlayerId) {
    let key = ItemId::new("iron-key");
    let Some(player) = ctx.world.players.get_mut(player_id) else {
        return;
    };
    if player.location() == LocationId(3) && !player.has_in_inventory(&key) {
        player.add_item(key);
        player.say("You pocket the iron key.");
    } else {
        player.say("You find nothing of interest.");
    }
}

// ---------------------------------------------------------------------------
// NPC scripts
// ---------------------------------------------------------------------------

fn scripts() -> EventBus {
    let mut events = EventBus::new();
    events.on_npc(NpcId(7), |world, _, event| {
        let NpcEvent::PlayerEnter { player, .. } = event;
        if let Some(player) = world.players.get(*player) {
            player.say(format!(
                "Old Maud looks up from her anvil. \"Mind the soot, {}.\"",
                player.name()
            ));
        }
    });
    events.on_player(|_, player, event| {
        if let PlayerEvent::Explored { location } = event {
            tracing::info!(%player, %location, "new room explored");
        }
    });
    events
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,hamlet=info".into()),
        )
        .with_target(false)
        .init();

    let config = WorldConfig::default();
    let catalog = MessageCatalog::from_json(&serde_json::json!({
        "messages": {
            "UNKNOWN_COMMAND": { "en": "Huh? (try a direction, look, open, close, search or me)" }
        }
    }).to_string())?;

    let handle = WorldServer::builder()
        .config(config.clone())
        .world(World::from_json(WORLD)?)
        .catalog(catalog)
        .events(scripts())
        .commands(
            CommandTable::with_builtins()
                .command("emote", emote)
                .command("search", search)
                .alias("me", "emote"),
        )
        .build()?
        .spawn();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let hero = config
        .new_player(HERO, "guest", "Wanderer", LocationId(1))
        .with_admin(true);

    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(out) = rx.recv().await {
            let text = match out {
                Outbound::Line(line) => format!("{line}\n"),
                Outbound::Prompt => "> ".to_string(),
            };
            if stdout.write_all(text.as_bytes()).await.is_err() {
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    handle.connect(hero, tx).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "quit" {
            break;
        }
        handle.input(HERO, line).await?;
    }

    let hero = handle.disconnect(HERO).await?;
    handle.shutdown().await?;
    printer.await?;
    println!("\nFarewell, {}. Energy left: {}.", hero.name(), hero.energy());
    Ok(())
}
