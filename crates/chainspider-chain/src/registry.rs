//! Process-wide chain registry
//!
//! Maps chain names to their [`Blockchain`] implementations so that a
//! crawler front end can look up a chain by name without static knowledge
//! of every chain. Populated by explicit [`ChainRegistry::register`] calls
//! at process start-up.

use crate::chain::Blockchain;
use crate::error::{ChainError, ChainResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Registry of chain implementations keyed by name.
#[derive(Default)]
pub struct ChainRegistry {
    chains: RwLock<HashMap<String, Arc<dyn Blockchain>>>,
}

impl ChainRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a chain under its own name.
    ///
    /// Names must be non-empty and unique: a second registration under an
    /// existing name fails with [`ChainError::DuplicateChain`] and leaves
    /// the registry unchanged.
    pub fn register(&self, chain: Arc<dyn Blockchain>) -> ChainResult<()> {
        let name = chain.name();
        if name.is_empty() {
            return Err(ChainError::EmptyName);
        }
        let mut chains = self.chains.write();
        if chains.contains_key(name) {
            return Err(ChainError::DuplicateChain(name.into()));
        }
        debug!(chain = name, "registered chain");
        chains.insert(name.into(), chain);
        Ok(())
    }

    /// Looks up a chain implementation by name.
    pub fn lookup(&self, name: &str) -> ChainResult<Arc<dyn Blockchain>> {
        self.chains
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ChainError::UnknownChain(name.into()))
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.chains.read().contains_key(name)
    }

    /// Registered chain names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.chains.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered chains.
    pub fn len(&self) -> usize {
        self.chains.read().len()
    }

    /// True if no chain is registered.
    pub fn is_empty(&self) -> bool {
        self.chains.read().is_empty()
    }
}

/// The process-wide registry instance.
pub fn registry() -> &'static ChainRegistry {
    static REGISTRY: OnceLock<ChainRegistry> = OnceLock::new();
    REGISTRY.get_or_init(ChainRegistry::new)
}
