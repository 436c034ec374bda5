//! # Tokenizer
//!
//! Orchestration of the segmentation pipeline: whitespace splitting of raw
//! text, per-chunk cache lookup, affix-stripping on misses, and stitching
//! the per-chunk results back into a [`Document`] with trailing-whitespace
//! flags.
//!
//! ## Data flow
//!
//! ```text
//! raw text → whitespace split → cache lookup → (miss) affix-stripping
//!          → cache write → chunk results concatenated → Document
//! ```
//!
//! A `Tokenizer` is cheap to clone: matchers, exception table, cache and
//! lexical store are all behind `Arc`, so clones share state. The batch
//! interface ([`Tokenizer::pipe`]) relies on this to fan work out across
//! workers while every worker warms the same cache.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;

use crate::cache::SegmentationCache;
use crate::config::TokenizerConfig;
use crate::engine;
use crate::error::TokenizerResult;
use crate::exceptions::ExceptionTable;
use crate::matcher::{
    InfixMatcher, PrefixMatcher, RegexInfixMatcher, RegexPrefixMatcher, RegexSuffixMatcher, Span,
    SuffixMatcher,
};
use crate::rules::{default_rules, RuleSet};
use crate::token::{Document, SubToken, Token};
use crate::vocab::{Lexeme, LexicalStore, Vocab};

#[derive(Clone)]
pub struct Tokenizer {
    prefix_matcher: Arc<dyn PrefixMatcher>,
    suffix_matcher: Arc<dyn SuffixMatcher>,
    infix_matcher: Arc<dyn InfixMatcher>,
    exceptions: Arc<ExceptionTable>,
    cache: Arc<SegmentationCache>,
    store: Arc<dyn LexicalStore>,
    pub(crate) config: TokenizerConfig,
}

impl Tokenizer {
    pub fn builder() -> TokenizerBuilder {
        TokenizerBuilder::new()
    }

    /// Tokenizes one text into a [`Document`].
    ///
    /// The text is split on whitespace runs; each resulting chunk is served
    /// from the segmentation cache or segmented by the affix-stripping
    /// engine and cached. Within a chunk only the last sub-token can carry
    /// the trailing-whitespace flag, since chunks contain no whitespace.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn tokenize(&self, text: &str) -> TokenizerResult<Document> {
        let generation = self.exceptions.generation();
        let mut tokens: Vec<Token> = Vec::new();
        // the lexical store is consulted once per distinct surface form;
        // repeated occurrences reuse the record already fetched
        let mut interned: HashMap<String, Arc<Lexeme>> = HashMap::new();

        for (chunk, trailing_ws) in split_whitespace_runs(text) {
            let subtokens = match self.cache.get(chunk, generation) {
                Some(cached) => cached,
                None => {
                    // each affix loop spends one invocation on its
                    // terminating probe, so the slack is floored at two to
                    // keep well-behaved matchers within budget at any
                    // configured value
                    let computed = engine::segment(
                        chunk,
                        self.prefix_matcher.as_ref(),
                        self.suffix_matcher.as_ref(),
                        self.infix_matcher.as_ref(),
                        &self.exceptions,
                        self.config.max_affix_iterations.max(2),
                    )?;
                    self.cache.put(chunk, generation, computed.clone());
                    computed
                }
            };

            let last = subtokens.len().saturating_sub(1);
            for (i, sub) in subtokens.iter().enumerate() {
                let lex = interned
                    .entry(sub.text.clone())
                    .or_insert_with(|| self.store.intern(&sub.text))
                    .clone();
                tokens.push(Token {
                    text: sub.text.clone(),
                    norm: sub.norm().to_string(),
                    whitespace: trailing_ws && i == last,
                    lex,
                });
            }
        }

        Ok(Document::new(text.to_string(), tokens))
    }

    /// Registers a special-case segmentation, overriding affix and infix
    /// rules for the exact string `key`. Previously cached segmentations
    /// become stale through the table's generation counter.
    #[instrument(skip(self, subtokens), fields(key = %key))]
    pub fn add_special_case(&self, key: &str, subtokens: Vec<SubToken>) -> TokenizerResult<()> {
        self.exceptions.insert(key.to_string(), subtokens)
    }

    /// Pass-through to the configured prefix matcher, for introspection.
    pub fn find_prefix(&self, chunk: &str) -> Option<usize> {
        self.prefix_matcher.find_prefix(chunk)
    }

    /// Pass-through to the configured suffix matcher, for introspection.
    pub fn find_suffix(&self, chunk: &str) -> Option<usize> {
        self.suffix_matcher.find_suffix(chunk)
    }

    /// Pass-through to the configured infix matcher, for introspection.
    pub fn find_infixes(&self, chunk: &str) -> Vec<Span> {
        self.infix_matcher.find_infixes(chunk)
    }

    /// Number of distinct chunks currently memoized.
    pub fn cached_chunks(&self) -> usize {
        self.cache.len()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        // the built-in rule set always compiles
        TokenizerBuilder::new()
            .rules(default_rules().clone())
            .build()
            .expect("built-in default rules must compile")
    }
}

/// Assembles a [`Tokenizer`] from a rule set, with optional custom matchers
/// and lexical store overriding the regex-compiled defaults.
pub struct TokenizerBuilder {
    rules: RuleSet,
    prefix_matcher: Option<Arc<dyn PrefixMatcher>>,
    suffix_matcher: Option<Arc<dyn SuffixMatcher>>,
    infix_matcher: Option<Arc<dyn InfixMatcher>>,
    store: Option<Arc<dyn LexicalStore>>,
    config: TokenizerConfig,
}

impl TokenizerBuilder {
    pub fn new() -> Self {
        Self {
            rules: RuleSet::default(),
            prefix_matcher: None,
            suffix_matcher: None,
            infix_matcher: None,
            store: None,
            config: TokenizerConfig::default(),
        }
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn prefix_matcher(mut self, matcher: Arc<dyn PrefixMatcher>) -> Self {
        self.prefix_matcher = Some(matcher);
        self
    }

    pub fn suffix_matcher(mut self, matcher: Arc<dyn SuffixMatcher>) -> Self {
        self.suffix_matcher = Some(matcher);
        self
    }

    pub fn infix_matcher(mut self, matcher: Arc<dyn InfixMatcher>) -> Self {
        self.infix_matcher = Some(matcher);
        self
    }

    pub fn store(mut self, store: Arc<dyn LexicalStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: TokenizerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TokenizerResult<Tokenizer> {
        let prefix_matcher = match self.prefix_matcher {
            Some(m) => m,
            None => Arc::new(RegexPrefixMatcher::new(&self.rules.prefixes)?),
        };
        let suffix_matcher = match self.suffix_matcher {
            Some(m) => m,
            None => Arc::new(RegexSuffixMatcher::new(&self.rules.suffixes)?),
        };
        let infix_matcher = match self.infix_matcher {
            Some(m) => m,
            None => Arc::new(RegexInfixMatcher::new(&self.rules.infixes)?),
        };
        let exceptions = Arc::new(ExceptionTable::from_rules(&self.rules.special_cases)?);
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(Vocab::new()) as Arc<dyn LexicalStore>);

        Ok(Tokenizer {
            prefix_matcher,
            suffix_matcher,
            infix_matcher,
            exceptions,
            cache: Arc::new(SegmentationCache::new()),
            store,
            config: self.config,
        })
    }
}

impl Default for TokenizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `text` on whitespace runs, yielding each chunk together with a
/// flag marking whether at least one whitespace character followed it.
fn split_whitespace_runs(text: &str) -> Vec<(&str, bool)> {
    let mut chunks = Vec::new();
    let mut chunk_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = chunk_start.take() {
                chunks.push((&text[start..i], true));
            }
        } else if chunk_start.is_none() {
            chunk_start = Some(i);
        }
    }
    if let Some(start) = chunk_start {
        chunks.push((&text[start..], false));
    }
    chunks
}
