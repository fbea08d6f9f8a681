//! Command registry: stores and looks up [`Command`] implementations.
//!
//! Commands are registered by their primary name and all aliases; extra
//! aliases can be attached afterwards with [`CommandRegistry::alias`].
//! Lookups are case-insensitive. Registration order is preserved and is the
//! tie-break the router uses between equal-length candidate names.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use super::handler::Command;

/// Registry of command definitions, keyed by name and aliases.
///
/// Internally, every name (primary + aliases) maps to the same
/// `Arc<dyn Command>`. Built once at startup and immutable afterwards.
pub struct CommandRegistry {
    /// Map from lowercase name/alias to command.
    commands: HashMap<String, Arc<dyn Command>>,
    /// Every registered name (lowercase), in registration order.
    names: Vec<String>,
    /// Primary names (lowercase), in registration order, for `list()`.
    primary_names: Vec<String>,
}

impl CommandRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            names: Vec::new(),
            primary_names: Vec::new(),
        }
    }

    /// Register a command under its primary name and all declared aliases.
    ///
    /// Overwrites any previous registration for the same names.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let arc: Arc<dyn Command> = Arc::from(cmd);
        let primary = arc.name().to_lowercase();

        self.insert(primary.clone(), Arc::clone(&arc));
        if !self.primary_names.contains(&primary) {
            self.primary_names.push(primary);
        }

        for alias in arc.aliases() {
            self.insert(alias.to_lowercase(), Arc::clone(&arc));
        }
    }

    /// Attach an extra alias to an already-registered command.
    ///
    /// No-op with a warning if `canonical` has not been registered: an
    /// orphan alias is a configuration bug, not a reason to stop startup.
    /// Registering the same alias twice is idempotent.
    pub fn alias(&mut self, alias: &str, canonical: &str) {
        let cmd = match self.commands.get(&canonical.to_lowercase()) {
            Some(cmd) => Arc::clone(cmd),
            None => {
                warn!(alias, canonical, "alias target is not registered; alias ignored");
                return;
            }
        };
        self.insert(alias.to_lowercase(), cmd);
    }

    fn insert(&mut self, name: String, cmd: Arc<dyn Command>) {
        if !self.names.contains(&name) {
            self.names.push(name.clone());
        }
        self.commands.insert(name, cmd);
    }

    /// Look up a command by name or alias (case-insensitive).
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(&name.to_lowercase()).cloned()
    }

    /// All registered names (primary + aliases), in registration order.
    ///
    /// The router sorts these by descending length; the stable order here is
    /// what breaks ties between equal-length names.
    pub fn all_names(&self) -> &[String] {
        &self.names
    }

    /// All unique commands, in registration order of their primary names.
    pub fn list(&self) -> Vec<Arc<dyn Command>> {
        self.primary_names
            .iter()
            .filter_map(|name| self.commands.get(name).cloned())
            .collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
