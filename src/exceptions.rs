use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::error::{TokenizerError, TokenizerResult};
use crate::token::{join_surface, SubToken};

/// Exact-match dictionary from a literal string to its predetermined
/// segmentation. Exceptions take precedence over affix and infix rules at
/// every level of the stripping algorithm.
///
/// Every successful mutation bumps a generation counter; the segmentation
/// cache compares generations on lookup, so a stale cached segmentation can
/// never be served after the table changed (see [`crate::cache`]).
pub struct ExceptionTable {
    entries: DashMap<String, Vec<SubToken>>,
    generation: AtomicU64,
}

impl ExceptionTable {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Builds a table from the rule-loading collaborator's mapping. Fails on
    /// the first entry whose sub-tokens do not concatenate to its key.
    pub fn from_rules(rules: &HashMap<String, Vec<SubToken>>) -> TokenizerResult<Self> {
        let table = Self::new();
        for (key, subtokens) in rules {
            table.insert(key.clone(), subtokens.clone())?;
        }
        Ok(table)
    }

    pub fn lookup(&self, key: &str) -> Option<Vec<SubToken>> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    /// Registers a special case. The concatenated surface forms of
    /// `subtokens` must equal `key` exactly; otherwise the insertion is
    /// rejected with [`TokenizerError::Configuration`] and the table is left
    /// unchanged. On success any prior entry for `key` is overwritten and
    /// the generation counter advances.
    pub fn insert(&self, key: String, subtokens: Vec<SubToken>) -> TokenizerResult<()> {
        let joined = join_surface(&subtokens);
        if joined != key {
            return Err(TokenizerError::Configuration { key, joined });
        }
        debug!(key = %key, parts = subtokens.len(), "registering special case");
        self.entries.insert(key, subtokens);
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Monotonic counter identifying the current table state.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ExceptionTable {
    fn default() -> Self {
        Self::new()
    }
}
