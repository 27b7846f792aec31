//! `WorldServer` builder and the world actor.
//!
//! All world state lives inside one Tokio task. Everything else talks to
//! it through a cloneable [`WorldHandle`], so commands run strictly one at
//! a time and no registry is ever locked.
//!
//! ```text
//! WorldHandle ──mpsc──→ WorldActor ──→ handle_input ──→ Player channels
//!     ↑                     │
//!     └──────oneshot────────┘
//! ```

use tokio::sync::{mpsc, oneshot};
use wayfarer_command::{
    handle_admin_input, handle_input, CommandContext, CommandRegistry, CommandSettings,
    CommandTable, Dispatch,
};
use wayfarer_world::{
    EventBus, LocationId, MessageCatalog, Player, PlayerId, PlayerSender, World,
};

use crate::{ServerError, WayfarerError, WorldConfig};

/// Admin input starts with this character: `@teleport 3001`.
pub const ADMIN_PREFIX: char = '@';

/// Requests sent to the world actor.
enum WorldCommand {
    Connect {
        player: Box<Player>,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), ServerError>>,
    },
    Disconnect {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<Player, ServerError>>,
    },
    Input {
        player_id: PlayerId,
        line: String,
        reply: oneshot::Sender<Result<Dispatch, ServerError>>,
    },
    Locate {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<LocationId, ServerError>>,
    },
    Shutdown {
        reply: oneshot::Sender<World>,
    },
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects everything a world needs before it can accept input.
///
/// ```rust,ignore
/// let handle = WorldServer::builder()
///     .config(config)
///     .world(World::from_file("world.json")?)
///     .commands(CommandTable::with_builtins())
///     .build()?
///     .spawn();
/// ```
pub struct WorldServerBuilder {
    config: WorldConfig,
    world: World,
    catalog: MessageCatalog,
    commands: CommandTable,
    events: EventBus,
}

impl WorldServerBuilder {
    pub fn new() -> Self {
        Self {
            config: WorldConfig::default(),
            world: World::new(),
            catalog: MessageCatalog::english_defaults(),
            commands: CommandTable::with_builtins(),
            events: EventBus::new(),
        }
    }

    pub fn config(mut self, config: WorldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn world(mut self, world: World) -> Self {
        self.world = world;
        self
    }

    /// Overlays `catalog` on the built-in English messages.
    pub fn catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog.merge(catalog);
        self
    }

    pub fn commands(mut self, commands: CommandTable) -> Self {
        self.commands = commands;
        self
    }

    /// Room, NPC and player listeners.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Validates the command table. This is the startup step: a server
    /// only exists once every command and alias has checked out.
    pub fn build(self) -> Result<WorldServer, WayfarerError> {
        let registry = self.commands.build(self.config.max_alias_depth)?;
        let mut catalog = self.catalog;
        catalog.set_default_locale(self.config.default_locale.clone());

        Ok(WorldServer {
            settings: self.config.command_settings(),
            config: self.config,
            world: self.world,
            registry,
            events: self.events,
            catalog,
        })
    }
}

impl Default for WorldServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A validated world, ready to [`spawn`](Self::spawn).
pub struct WorldServer {
    config: WorldConfig,
    settings: CommandSettings,
    world: World,
    registry: CommandRegistry,
    events: EventBus,
    catalog: MessageCatalog,
}

impl WorldServer {
    pub fn builder() -> WorldServerBuilder {
        WorldServerBuilder::new()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Starts the world actor. Must be called inside a Tokio runtime.
    pub fn spawn(self) -> WorldHandle {
        let (tx, rx) = mpsc::channel(self.config.input_channel_size.max(1));
        let actor = WorldActor {
            server: self,
            receiver: rx,
        };
        tokio::spawn(actor.run());
        WorldHandle { sender: tx }
    }
}

/// Handle to a running world. Cheap to clone.
#[derive(Clone)]
pub struct WorldHandle {
    sender: mpsc::Sender<WorldCommand>,
}

impl WorldHandle {
    /// Places `player` in the world with `sender` as their output.
    pub async fn connect(&self, player: Player, sender: PlayerSender) -> Result<(), ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(WorldCommand::Connect {
            player: Box::new(player),
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| ServerError::Closed)?
    }

    /// Removes a player and hands back their final state.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<Player, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(WorldCommand::Disconnect {
            player_id,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| ServerError::Closed)?
    }

    /// Runs one line of input. Resolves once the command has finished.
    pub async fn input(
        &self,
        player_id: PlayerId,
        line: impl Into<String>,
    ) -> Result<Dispatch, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(WorldCommand::Input {
            player_id,
            line: line.into(),
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| ServerError::Closed)?
    }

    /// Where a player currently stands.
    pub async fn location(&self, player_id: PlayerId) -> Result<LocationId, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(WorldCommand::Locate {
            player_id,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| ServerError::Closed)?
    }

    /// Stops the actor and returns the world as it was left.
    pub async fn shutdown(&self) -> Result<World, ServerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.request(WorldCommand::Shutdown { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| ServerError::Closed)
    }

    async fn request(&self, command: WorldCommand) -> Result<(), ServerError> {
        self.sender.send(command).await.map_err(|_| ServerError::Closed)
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct WorldActor {
    server: WorldServer,
    receiver: mpsc::Receiver<WorldCommand>,
}

impl WorldActor {
    async fn run(mut self) {
        tracing::info!(
            rooms = self.server.world.rooms.len(),
            commands = self.server.registry.command_names().len(),
            "world server started"
        );

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                WorldCommand::Connect {
                    player,
                    sender,
                    reply,
                } => {
                    let _ = reply.send(self.handle_connect(*player, sender));
                }
                WorldCommand::Disconnect { player_id, reply } => {
                    let _ = reply.send(self.handle_disconnect(player_id));
                }
                WorldCommand::Input {
                    player_id,
                    line,
                    reply,
                } => {
                    let _ = reply.send(self.handle_input(player_id, &line));
                }
                WorldCommand::Locate { player_id, reply } => {
                    let location = self
                        .server
                        .world
                        .players
                        .get(player_id)
                        .map(Player::location)
                        .ok_or(ServerError::UnknownPlayer(player_id));
                    let _ = reply.send(location);
                }
                WorldCommand::Shutdown { reply } => {
                    tracing::info!("world server shutting down");
                    let world = std::mem::take(&mut self.server.world);
                    let _ = reply.send(world);
                    break;
                }
            }
        }

        tracing::info!("world server stopped");
    }

    fn handle_connect(&mut self, mut player: Player, sender: PlayerSender) -> Result<(), ServerError> {
        let player_id = player.id();
        if self.server.world.players.contains(player_id) {
            return Err(ServerError::AlreadyConnected(player_id));
        }
        player.connect(sender);
        tracing::info!(%player_id, location = %player.location(), "player connected");
        self.server.world.players.insert(player);

        let mut ctx = self.context();
        let commands = ctx.commands;
        if !commands.dispatch(&mut ctx, "look", "", player_id) {
            tracing::warn!(%player_id, "no look command registered");
        }
        self.prompt(player_id);
        Ok(())
    }

    fn handle_disconnect(&mut self, player_id: PlayerId) -> Result<Player, ServerError> {
        let mut player = self
            .server
            .world
            .players
            .remove(player_id)
            .ok_or(ServerError::UnknownPlayer(player_id))?;
        player.disconnect();
        tracing::info!(%player_id, "player disconnected");
        Ok(player)
    }

    fn handle_input(&mut self, player_id: PlayerId, line: &str) -> Result<Dispatch, ServerError> {
        let is_admin = match self.server.world.players.get(player_id) {
            Some(player) => player.is_admin(),
            None => return Err(ServerError::UnknownPlayer(player_id)),
        };

        let mut ctx = self.context();
        let result = match line.trim_start().strip_prefix(ADMIN_PREFIX) {
            Some(admin_line) if is_admin => handle_admin_input(&mut ctx, admin_line, player_id),
            _ => handle_input(&mut ctx, line, player_id),
        };

        if !result.is_handled() {
            if let Some(player) = self.server.world.players.get(player_id) {
                player.say_l10n(&self.server.catalog, "UNKNOWN_COMMAND", &[]);
            }
        }
        self.prompt(player_id);
        Ok(result)
    }

    fn prompt(&self, player_id: PlayerId) {
        if let Some(player) = self.server.world.players.get(player_id) {
            player.prompt();
        }
    }

    fn context(&mut self) -> CommandContext<'_> {
        let server = &mut self.server;
        CommandContext::new(
            &mut server.world,
            &server.registry,
            &server.events,
            &server.catalog,
            &server.settings,
        )
    }
}
