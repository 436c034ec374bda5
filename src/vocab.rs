use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

/// Shared per-string attribute record from the lexical store. The tokenizer
/// attaches one of these to every produced token but does not own the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// The interned surface form.
    pub orth: String,
    /// First-seen order of this surface form in the store.
    pub rank: u64,
    /// Orthographic shape: letters become `x`/`X`, digits `d`, anything else
    /// is kept, with character runs capped at four.
    pub shape: String,
    /// Whether a vector is available for this surface form.
    pub has_vector: bool,
}

/// Interface to the external lexical-attribute store: interns a unique
/// surface form and returns its shared attribute record. Invoked once per
/// distinct surface form.
pub trait LexicalStore: Send + Sync {
    fn intern(&self, orth: &str) -> Arc<Lexeme>;
}

/// Default in-process store. Every distinct surface form is interned once;
/// repeated tokens share the same `Arc<Lexeme>`.
pub struct Vocab {
    lexemes: DashMap<String, Arc<Lexeme>>,
    next_rank: AtomicU64,
}

impl Vocab {
    pub fn new() -> Self {
        Self {
            lexemes: DashMap::new(),
            next_rank: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.lexemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexemes.is_empty()
    }
}

impl Default for Vocab {
    fn default() -> Self {
        Self::new()
    }
}

impl LexicalStore for Vocab {
    fn intern(&self, orth: &str) -> Arc<Lexeme> {
        if let Some(existing) = self.lexemes.get(orth) {
            return existing.value().clone();
        }
        self.lexemes
            .entry(orth.to_string())
            .or_insert_with(|| {
                Arc::new(Lexeme {
                    orth: orth.to_string(),
                    rank: self.next_rank.fetch_add(1, Ordering::SeqCst),
                    shape: word_shape(orth),
                    has_vector: false,
                })
            })
            .value()
            .clone()
    }
}

/// Orthographic shape transform: `Apple` -> `Xxxxx` -> run-capped `Xxxx`,
/// `1984` -> `dddd`, `don't` -> `xxx'x`.
pub fn word_shape(orth: &str) -> String {
    let mut shape = String::new();
    let mut last: Option<char> = None;
    let mut run = 0usize;

    for c in orth.chars() {
        let mapped = if c.is_alphabetic() {
            if c.is_uppercase() {
                'X'
            } else {
                'x'
            }
        } else if c.is_numeric() {
            'd'
        } else {
            c
        };

        if last == Some(mapped) {
            run += 1;
        } else {
            run = 1;
            last = Some(mapped);
        }
        if run <= 4 {
            shape.push(mapped);
        }
    }
    shape
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_word_shape() {
        assert_eq!(word_shape("Apple"), "Xxxxx");
        assert_eq!(word_shape("internationalization"), "xxxx");
        assert_eq!(word_shape("1984"), "dddd");
        assert_eq!(word_shape("don't"), "xxx'x");
        assert_eq!(word_shape("C3PO"), "XdXX");
    }

    #[test]
    fn test_intern_is_shared_and_ranked() {
        let vocab = Vocab::new();
        let first = vocab.intern("hello");
        let second = vocab.intern("world");
        let again = vocab.intern("hello");

        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(first.rank, 0);
        assert_eq!(second.rank, 1);
        assert_eq!(vocab.len(), 2);
    }
}
