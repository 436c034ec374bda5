//! # Matcher Interfaces
//!
//! Pluggable rule capabilities consumed by the affix-stripping engine:
//!
//! * [`PrefixMatcher`]: longest prefix to strip, searched from the start.
//! * [`SuffixMatcher`]: longest suffix to strip, searched from the end.
//! * [`InfixMatcher`]: zero or more internal split boundaries.
//!
//! Plain closures implement the traits directly, so ad-hoc rules can be
//! supplied without a wrapper type. The regex-backed variants below cover the
//! common case of pattern-list rule sets; trie- or automaton-based matchers
//! can be substituted without touching the engine.
//!
//! All lengths and spans are byte offsets into the probed string and must
//! land on UTF-8 character boundaries; the engine rejects anything else as a
//! protocol violation.

use regex::Regex;

use crate::error::{TokenizerError, TokenizerResult};

/// A half-open byte range `[start, end)` inside a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Reports the byte length of a prefix to strip from the start of `chunk`,
/// or `None` when no prefix rule applies.
pub trait PrefixMatcher: Send + Sync {
    fn find_prefix(&self, chunk: &str) -> Option<usize>;
}

/// Reports the byte length of a suffix to strip from the end of `chunk`,
/// or `None` when no suffix rule applies.
pub trait SuffixMatcher: Send + Sync {
    fn find_suffix(&self, chunk: &str) -> Option<usize>;
}

/// Reports internal boundary spans, non-overlapping and sorted by start.
pub trait InfixMatcher: Send + Sync {
    fn find_infixes(&self, chunk: &str) -> Vec<Span>;
}

impl<F> PrefixMatcher for F
where
    F: Fn(&str) -> Option<usize> + Send + Sync,
{
    fn find_prefix(&self, chunk: &str) -> Option<usize> {
        self(chunk)
    }
}

impl<F> SuffixMatcher for F
where
    F: Fn(&str) -> Option<usize> + Send + Sync,
{
    fn find_suffix(&self, chunk: &str) -> Option<usize> {
        self(chunk)
    }
}

impl<F> InfixMatcher for F
where
    F: Fn(&str) -> Vec<Span> + Send + Sync,
{
    fn find_infixes(&self, chunk: &str) -> Vec<Span> {
        self(chunk)
    }
}

fn compile_patterns<I, S>(patterns: I) -> TokenizerResult<Vec<Regex>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|e| {
                TokenizerError::protocol(format!("invalid rule pattern '{}': {}", p.as_ref(), e))
            })
        })
        .collect()
}

/// Prefix rules compiled from a pattern list. The longest match anchored at
/// the start of the chunk wins across all patterns.
pub struct RegexPrefixMatcher {
    patterns: Vec<Regex>,
}

impl RegexPrefixMatcher {
    pub fn new<I, S>(patterns: I) -> TokenizerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: compile_patterns(patterns)?,
        })
    }
}

impl PrefixMatcher for RegexPrefixMatcher {
    fn find_prefix(&self, chunk: &str) -> Option<usize> {
        let mut best: Option<usize> = None;
        for re in &self.patterns {
            if let Some(m) = re.find(chunk) {
                if m.start() == 0 && m.end() > 0 && best.map_or(true, |b| m.end() > b) {
                    best = Some(m.end());
                }
            }
        }
        best
    }
}

/// Suffix rules compiled from a pattern list. The longest match ending at
/// the final byte of the chunk wins across all patterns.
pub struct RegexSuffixMatcher {
    patterns: Vec<Regex>,
}

impl RegexSuffixMatcher {
    pub fn new<I, S>(patterns: I) -> TokenizerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: compile_patterns(patterns)?,
        })
    }
}

impl SuffixMatcher for RegexSuffixMatcher {
    fn find_suffix(&self, chunk: &str) -> Option<usize> {
        let mut best: Option<usize> = None;
        for re in &self.patterns {
            for m in re.find_iter(chunk) {
                if m.end() == chunk.len() && m.start() < m.end() {
                    let len = chunk.len() - m.start();
                    if best.map_or(true, |b| len > b) {
                        best = Some(len);
                    }
                }
            }
        }
        best
    }
}

/// Infix rules compiled from a pattern list. Matches from all patterns are
/// merged, preferring the longest match at each starting point; overlapping
/// later matches are dropped.
pub struct RegexInfixMatcher {
    patterns: Vec<Regex>,
}

impl RegexInfixMatcher {
    pub fn new<I, S>(patterns: I) -> TokenizerResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            patterns: compile_patterns(patterns)?,
        })
    }
}

impl InfixMatcher for RegexInfixMatcher {
    fn find_infixes(&self, chunk: &str) -> Vec<Span> {
        let mut found: Vec<Span> = Vec::new();
        for re in &self.patterns {
            for m in re.find_iter(chunk) {
                if m.start() < m.end() {
                    found.push(Span::new(m.start(), m.end()));
                }
            }
        }
        found.sort_by_key(|s| (s.start, std::cmp::Reverse(s.len())));

        let mut spans: Vec<Span> = Vec::new();
        let mut covered = 0;
        for span in found {
            if span.start >= covered {
                covered = span.end;
                spans.push(span);
            }
        }
        spans
    }
}
