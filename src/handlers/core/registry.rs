//! Command registry.
//!
//! The `Registry` owns the authoritative command set and per-command usage
//! counters. The set lives behind an `Arc` that is swapped as a whole: every
//! mutation builds a new catalog and publishes it in one step, so readers
//! never observe a partially cleared registry.

use super::discovery::CommandSource;
use super::traits::CommandDescriptor;
use crate::config::RegistryConfig;
use crate::error::RegistrationError;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Immutable snapshot of registered commands.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    /// Registration order.
    commands: Vec<Arc<CommandDescriptor>>,
    by_name: HashMap<String, Arc<CommandDescriptor>>,
}

impl Catalog {
    /// Name lookup first, then an alias scan.
    pub fn find(&self, name: &str) -> Option<Arc<CommandDescriptor>> {
        let name = name.to_lowercase();
        if let Some(cmd) = self.by_name.get(&name) {
            return Some(cmd.clone());
        }
        self.commands
            .iter()
            .find(|cmd| cmd.answers_to(&name))
            .cloned()
    }

    pub fn commands(&self) -> &[Arc<CommandDescriptor>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn insert(
        &mut self,
        mut descriptor: CommandDescriptor,
        reserved: &[String],
    ) -> Result<(), RegistrationError> {
        // Fields are public, so builder normalisation cannot be relied on.
        descriptor.name = descriptor.name.to_lowercase();
        for alias in &mut descriptor.aliases {
            *alias = alias.to_lowercase();
        }
        descriptor.category = descriptor.category.to_lowercase();

        let name = &descriptor.name;
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(RegistrationError::InvalidName(name.clone()));
        }

        if reserved.iter().any(|c| *c == descriptor.category) && !descriptor.owner_only {
            return Err(RegistrationError::NotOwnerOnly {
                name: name.clone(),
                category: descriptor.category.clone(),
            });
        }

        descriptor
            .args
            .validate()
            .map_err(|source| RegistrationError::InvalidArguments {
                command: name.clone(),
                source,
            })?;

        let mut own = Vec::new();
        for candidate in descriptor.names() {
            if let Some(existing) = self.find(candidate) {
                return Err(RegistrationError::Duplicate {
                    name: candidate.to_string(),
                    existing: existing.name.clone(),
                });
            }
            if own.contains(&candidate) {
                return Err(RegistrationError::Duplicate {
                    name: candidate.to_string(),
                    existing: name.clone(),
                });
            }
            own.push(candidate);
        }

        let descriptor = Arc::new(descriptor);
        self.by_name
            .insert(descriptor.name.clone(), descriptor.clone());
        self.commands.push(descriptor);
        Ok(())
    }
}

/// Registry of commands.
pub struct Registry {
    catalog: RwLock<Arc<Catalog>>,
    source: Option<Arc<dyn CommandSource>>,
    reserved_categories: Vec<String>,
    /// Command usage counters for the `stats` command.
    command_counts: DashMap<String, AtomicU64>,
}

impl Registry {
    /// Empty registry without a discovery source.
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(Catalog::default())),
            source: None,
            reserved_categories: config.reserved_categories.clone(),
            command_counts: DashMap::new(),
        }
    }

    /// Empty registry that discovers commands from `source`.
    pub fn with_source(config: &RegistryConfig, source: Arc<dyn CommandSource>) -> Self {
        Self {
            source: Some(source),
            ..Self::new(config)
        }
    }

    /// Current snapshot. In-flight readers keep theirs across reloads.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.catalog.read().clone()
    }

    /// Register one command.
    ///
    /// Fails if the name or any alias is already taken, if a reserved-category
    /// command is not owner-only, or if its arguments are malformed.
    pub fn register(&self, descriptor: CommandDescriptor) -> Result<(), RegistrationError> {
        let mut guard = self.catalog.write();
        let mut next = Catalog::clone(&guard);
        let name = descriptor.name.clone();
        next.insert(descriptor, &self.reserved_categories)?;
        *guard = Arc::new(next);
        debug!(command = %name, "Command registered");
        Ok(())
    }

    /// Discover and register every command from the source. Nothing becomes
    /// visible unless all of them register.
    pub fn register_all(&self) -> Result<usize, RegistrationError> {
        let discovered = self.discover()?;
        let mut guard = self.catalog.write();
        let mut next = Catalog::clone(&guard);
        let count = discovered.len();
        for descriptor in discovered {
            next.insert(descriptor, &self.reserved_categories)?;
        }
        *guard = Arc::new(next);
        info!(count, total = guard.len(), "Commands registered");
        Ok(count)
    }

    /// Replace the whole command set with a fresh discovery pass.
    ///
    /// On failure the previous catalog stays published and the error is
    /// returned to the caller.
    ///
    /// Discovery runs under the write lock. A [`Registry::register`] racing
    /// with it waits for the swap and lands on the new catalog.
    pub fn reload(&self) -> Result<usize, RegistrationError> {
        let mut guard = self.catalog.write();
        let staged = match self.stage() {
            Ok(staged) => staged,
            Err(e) => {
                warn!(error = %e, "Reload failed, keeping previous commands");
                return Err(e);
            }
        };
        let count = staged.len();
        *guard = Arc::new(staged);
        info!(count, "Commands reloaded");
        Ok(count)
    }

    fn discover(&self) -> Result<Vec<CommandDescriptor>, RegistrationError> {
        self.source
            .as_ref()
            .ok_or(RegistrationError::NoSource)?
            .discover()
    }

    fn stage(&self) -> Result<Catalog, RegistrationError> {
        let mut staged = Catalog::default();
        for descriptor in self.discover()? {
            staged.insert(descriptor, &self.reserved_categories)?;
        }
        Ok(staged)
    }

    /// Case-insensitive lookup by name, then alias.
    pub fn find(&self, name: &str) -> Option<Arc<CommandDescriptor>> {
        self.catalog.read().find(name)
    }

    /// Commands whose name or any alias contains `needle`.
    pub fn search(&self, needle: &str) -> Vec<Arc<CommandDescriptor>> {
        let needle = needle.to_lowercase();
        self.snapshot()
            .commands
            .iter()
            .filter(|cmd| cmd.names().any(|n| n.contains(&needle)))
            .cloned()
            .collect()
    }

    /// All commands in registration order.
    pub fn commands(&self) -> Vec<Arc<CommandDescriptor>> {
        self.snapshot().commands.clone()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for cmd in self.snapshot().commands.iter() {
            if !seen.contains(&cmd.category) {
                seen.push(cmd.category.clone());
            }
        }
        seen
    }

    pub fn len(&self) -> usize {
        self.catalog.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count one invocation of `name`.
    pub fn record_use(&self, name: &str) {
        self.command_counts
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get command usage statistics, most used first.
    pub fn command_stats(&self) -> Vec<(String, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }
}
