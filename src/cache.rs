use dashmap::DashMap;

use crate::token::SubToken;

struct CacheEntry {
    generation: u64,
    subtokens: Vec<SubToken>,
}

/// Memoizes, per unique whitespace-delimited chunk, the computed sub-token
/// list. Entries are tagged with the exception-table generation that was
/// current when their computation started; a tag mismatch on lookup is a
/// miss, which lazily invalidates everything cached before a table mutation.
///
/// Unbounded by design: realistic corpora have bounded vocabulary, so the
/// cache size tracks vocabulary size rather than input size.
///
/// Safe to share across pipe workers: the engine is a pure function of its
/// inputs, so duplicate concurrent computation of the same key produces
/// equal values and last-write-wins is harmless.
pub struct SegmentationCache {
    entries: DashMap<String, CacheEntry>,
}

impl SegmentationCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, chunk: &str, generation: u64) -> Option<Vec<SubToken>> {
        self.entries
            .get(chunk)
            .filter(|e| e.generation == generation)
            .map(|e| e.subtokens.clone())
    }

    pub fn put(&self, chunk: &str, generation: u64, subtokens: Vec<SubToken>) {
        self.entries.insert(
            chunk.to_string(),
            CacheEntry {
                generation,
                subtokens,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SegmentationCache {
    fn default() -> Self {
        Self::new()
    }
}
