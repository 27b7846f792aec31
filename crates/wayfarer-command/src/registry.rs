//! Command registry and the startup registration table.
//!
//! Player and admin commands live in separate namespaces. Aliases are
//! stored as the *name* of their target and resolved on every call, so
//! re-registering a command also changes every alias that points at it.
//!
//! ```text
//! CommandTable ──build()──→ CommandRegistry ──dispatch()──→ handler
//!     │                          │
//!     └─ StartupError            └─ register()/alias() at runtime
//!        (all failures)
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use wayfarer_world::PlayerId;

use crate::builtins;
use crate::{CommandArgs, CommandContext, RegistrationError, Scope, StartupError};

/// A player command: `(context, args, player)`.
pub type PlayerHandler =
    Arc<dyn Fn(&mut CommandContext<'_>, CommandArgs<'_>, PlayerId) + Send + Sync>;

/// An admin command: `(context, player, args)`.
///
/// The player comes before the arguments, unlike player commands. Existing
/// admin tooling is written against that order.
pub type AdminHandler = Arc<dyn Fn(&mut CommandContext<'_>, PlayerId, &str) + Send + Sync>;

#[derive(Clone)]
enum Entry {
    Handler(PlayerHandler),
    Alias(String),
}

// ---------------------------------------------------------------------------
// CommandRegistry
// ---------------------------------------------------------------------------

pub struct CommandRegistry {
    player: HashMap<String, Entry>,
    admin: HashMap<String, AdminHandler>,
    max_alias_depth: usize,
}

impl CommandRegistry {
    /// An empty registry. Prefer [`CommandTable::build`], which validates.
    pub fn new(max_alias_depth: usize) -> Self {
        Self {
            player: HashMap::new(),
            admin: HashMap::new(),
            max_alias_depth,
        }
    }

    /// Registers (or replaces) a player command. Returns `true` if
    /// something was already registered under `name`.
    pub fn register<F>(&mut self, name: &str, handler: F) -> bool
    where
        F: Fn(&mut CommandContext<'_>, CommandArgs<'_>, PlayerId) + Send + Sync + 'static,
    {
        self.register_handler(name, Arc::new(handler))
    }

    pub fn register_handler(&mut self, name: &str, handler: PlayerHandler) -> bool {
        tracing::debug!(command = name, "player command registered");
        self.player
            .insert(name.to_string(), Entry::Handler(handler))
            .is_some()
    }

    pub fn register_admin<F>(&mut self, name: &str, handler: F) -> bool
    where
        F: Fn(&mut CommandContext<'_>, PlayerId, &str) + Send + Sync + 'static,
    {
        self.register_admin_handler(name, Arc::new(handler))
    }

    pub fn register_admin_handler(&mut self, name: &str, handler: AdminHandler) -> bool {
        tracing::debug!(command = name, "admin command registered");
        self.admin.insert(name.to_string(), handler).is_some()
    }

    /// Makes `name` forward to whatever is registered as `target` at the
    /// moment `name` is invoked.
    pub fn alias(&mut self, name: &str, target: &str) -> bool {
        self.player
            .insert(name.to_string(), Entry::Alias(target.to_string()))
            .is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.player.contains_key(name)
    }

    pub fn contains_admin(&self, name: &str) -> bool {
        self.admin.contains_key(name)
    }

    /// The target name if `name` is an alias.
    pub fn alias_target(&self, name: &str) -> Option<&str> {
        match self.player.get(name) {
            Some(Entry::Alias(target)) => Some(target),
            _ => None,
        }
    }

    /// Sorted player command and alias names.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.player.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn admin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.admin.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Runs the player command `name`. Returns `false` if nothing is
    /// registered under that name, or an alias chain dead-ends.
    pub fn dispatch<'t>(
        &self,
        ctx: &mut CommandContext<'_>,
        name: &str,
        args: impl Into<CommandArgs<'t>>,
        player: PlayerId,
    ) -> bool {
        let args = args.into();
        let mut current = name;

        for _ in 0..=self.max_alias_depth {
            match self.player.get(current) {
                None => {
                    if current != name {
                        tracing::warn!(alias = name, target = current, "alias target missing");
                    }
                    return false;
                }
                Some(Entry::Handler(handler)) => {
                    tracing::trace!(command = current, %player, "dispatch");
                    handler(ctx, args, player);
                    return true;
                }
                Some(Entry::Alias(target)) => current = target,
            }
        }

        tracing::warn!(
            alias = name,
            max_depth = self.max_alias_depth,
            "alias chain too deep"
        );
        false
    }

    /// Runs the admin command `name`.
    pub fn dispatch_admin(
        &self,
        ctx: &mut CommandContext<'_>,
        name: &str,
        player: PlayerId,
        args: &str,
    ) -> bool {
        match self.admin.get(name) {
            Some(handler) => {
                tracing::info!(command = name, %player, args, "admin command");
                handler(ctx, player, args);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("player", &self.command_names())
            .field("admin", &self.admin_names())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// CommandTable
// ---------------------------------------------------------------------------

/// Everything to register before the world accepts input.
///
/// Registration order doesn't matter: aliases may be declared before
/// their targets. [`build`](Self::build) checks the whole table at once
/// and reports every problem it finds, not just the first.
#[derive(Default)]
pub struct CommandTable {
    player: Vec<(String, PlayerHandler)>,
    admin: Vec<(String, AdminHandler)>,
    aliases: Vec<(String, String)>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table seeded with `look`, `open`, `close`, the `l` alias and the
    /// `teleport` admin command.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        builtins::install(&mut table);
        table
    }

    /// Adds the classic aliases (`exp`, `take`, `consider`, `me`). Their
    /// targets must be registered by the host, or `build` will fail.
    pub fn with_default_aliases(mut self) -> Self {
        for (name, target) in DEFAULT_ALIASES {
            self = self.alias(name, target);
        }
        self
    }

    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, CommandArgs<'_>, PlayerId) + Send + Sync + 'static,
    {
        self.player.push((name.to_string(), Arc::new(handler)));
        self
    }

    pub fn admin<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&mut CommandContext<'_>, PlayerId, &str) + Send + Sync + 'static,
    {
        self.admin.push((name.to_string(), Arc::new(handler)));
        self
    }

    pub fn alias(mut self, name: &str, target: &str) -> Self {
        self.aliases.push((name.to_string(), target.to_string()));
        self
    }

    pub(crate) fn push_command(&mut self, name: &str, handler: PlayerHandler) {
        self.player.push((name.to_string(), handler));
    }

    pub(crate) fn push_admin(&mut self, name: &str, handler: AdminHandler) {
        self.admin.push((name.to_string(), handler));
    }

    pub(crate) fn push_alias(&mut self, name: &str, target: &str) {
        self.aliases.push((name.to_string(), target.to_string()));
    }

    /// Validates the table and produces a registry.
    pub fn build(self, max_alias_depth: usize) -> Result<CommandRegistry, StartupError> {
        let mut failures = Vec::new();
        let mut registry = CommandRegistry::new(max_alias_depth);

        for (name, handler) in self.player {
            if let Some(err) = check_name(&name, Scope::Player) {
                failures.push(err);
            } else if registry.register_handler(&name, handler) {
                failures.push(RegistrationError::Duplicate { name, scope: Scope::Player });
            }
        }
        for (name, handler) in self.admin {
            if let Some(err) = check_name(&name, Scope::Admin) {
                failures.push(err);
            } else if registry.register_admin_handler(&name, handler) {
                failures.push(RegistrationError::Duplicate { name, scope: Scope::Admin });
            }
        }

        let mut alias_names = HashSet::new();
        for (name, target) in &self.aliases {
            if let Some(err) = check_name(name, Scope::Player) {
                failures.push(err);
            } else if registry.contains(name) && registry.alias_target(name).is_none() {
                failures.push(RegistrationError::AliasShadowsCommand(name.clone()));
            } else if !alias_names.insert(name.clone()) {
                failures.push(RegistrationError::Duplicate {
                    name: name.clone(),
                    scope: Scope::Player,
                });
            } else {
                registry.alias(name, target);
            }
        }

        for name in &alias_names {
            if let Some(err) = check_alias_chain(&registry, name) {
                failures.push(err);
            }
        }

        if failures.is_empty() {
            tracing::info!(
                commands = registry.player.len(),
                admin = registry.admin.len(),
                "command registry ready"
            );
            Ok(registry)
        } else {
            Err(StartupError { failures })
        }
    }
}

const DEFAULT_ALIASES: [(&str, &str); 4] = [
    ("exp", "tnl"),
    ("take", "get"),
    ("consider", "appraise"),
    ("me", "emote"),
];

fn check_name(name: &str, scope: Scope) -> Option<RegistrationError> {
    if name.is_empty() {
        return Some(RegistrationError::EmptyName { scope });
    }
    if name.chars().any(char::is_whitespace) {
        return Some(RegistrationError::InvalidName {
            name: name.to_string(),
            scope,
        });
    }
    None
}

/// Follows an alias to a real command, flagging cycles and dead ends.
fn check_alias_chain(registry: &CommandRegistry, alias: &str) -> Option<RegistrationError> {
    let mut seen = HashSet::new();
    let mut current = alias;
    while let Some(target) = registry.alias_target(current) {
        if !seen.insert(current) {
            return Some(RegistrationError::AliasCycle(alias.to_string()));
        }
        if !registry.contains(target) {
            return Some(RegistrationError::UnknownAliasTarget {
                alias: alias.to_string(),
                target: target.to_string(),
            });
        }
        current = target;
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use wayfarer_world::{EventBus, MessageCatalog, World};

    use super::*;
    use crate::CommandSettings;

    fn noop(_: &mut CommandContext<'_>, _: CommandArgs<'_>, _: PlayerId) {}

    fn run(registry: &CommandRegistry, name: &str) -> bool {
        let mut world = World::new();
        let events = EventBus::new();
        let catalog = MessageCatalog::english_defaults();
        let settings = CommandSettings::default();
        let mut ctx = CommandContext::new(&mut world, registry, &events, &catalog, &settings);
        registry.dispatch(&mut ctx, name, "", PlayerId(1))
    }

    #[test]
    fn test_build_accepts_valid_table() {
        let registry = CommandTable::new()
            .command("emote", noop)
            .alias("me", "emote")
            .build(8)
            .unwrap();
        assert!(registry.contains("emote"));
        assert_eq!(registry.alias_target("me"), Some("emote"));
        assert_eq!(registry.command_names(), vec!["emote", "me"]);
    }

    #[test]
    fn test_build_reports_every_failure() {
        let err = CommandTable::new()
            .command("", noop)
            .command("say", noop)
            .command("say", noop)
            .command("two words", noop)
            .alias("say", "emote")
            .alias("me", "emote")
            .alias("a", "b")
            .alias("b", "a")
            .build(8)
            .unwrap_err();

        let failures = &err.failures;
        assert!(failures.contains(&RegistrationError::EmptyName { scope: Scope::Player }));
        assert!(failures.contains(&RegistrationError::Duplicate {
            name: "say".into(),
            scope: Scope::Player
        }));
        assert!(failures.contains(&RegistrationError::InvalidName {
            name: "two words".into(),
            scope: Scope::Player
        }));
        assert!(failures.contains(&RegistrationError::AliasShadowsCommand("say".into())));
        assert!(failures.contains(&RegistrationError::UnknownAliasTarget {
            alias: "me".into(),
            target: "emote".into()
        }));
        assert!(failures.contains(&RegistrationError::AliasCycle("a".into())));
        assert!(failures.contains(&RegistrationError::AliasCycle("b".into())));
    }

    #[test]
    fn test_default_aliases_need_their_targets() {
        let err = CommandTable::new().with_default_aliases().build(8).unwrap_err();
        assert_eq!(err.failures.len(), 4);

        let ok = CommandTable::new()
            .command("tnl", noop)
            .command("get", noop)
            .command("appraise", noop)
            .command("emote", noop)
            .with_default_aliases()
            .build(8);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_dispatch_unknown_name_is_not_handled() {
        let registry = CommandTable::new().build(8).unwrap();
        assert!(!run(&registry, "dance"));
    }

    #[test]
    fn test_alias_chain_resolves_through_several_hops() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let registry = CommandTable::new()
            .command("emote", move |_, _, _| {
                h.fetch_add(1, Ordering::SeqCst);
            })
            .alias("me", "emote")
            .alias("m", "me")
            .build(8)
            .unwrap();

        assert!(run(&registry, "m"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_runtime_alias_cycle_stops_at_depth_limit() {
        let mut registry = CommandTable::new().build(4).unwrap();
        registry.alias("a", "b");
        registry.alias("b", "a");
        assert!(!run(&registry, "a"));
    }

    #[test]
    fn test_admin_namespace_is_separate() {
        let registry = CommandTable::new()
            .admin("teleport", |_, _, _| {})
            .build(8)
            .unwrap();
        assert!(registry.contains_admin("teleport"));
        assert!(!registry.contains("teleport"));
        assert!(!run(&registry, "teleport"));
    }
}
