//! # kotoba: Rule-Based Text Tokenizer
//!
//! kotoba segments raw text into token sequences using ordered
//! affix-stripping, infix splitting, and an exception table of special-case
//! segmentations, with a memoizing cache for repeated chunks.
//!
//! ## Processing Pipeline
//!
//! ```text
//! raw text → whitespace split → segmentation cache → affix-stripping engine
//!          → exception table / matchers → Document
//! ```
//!
//! ### Components
//!
//! * [`matcher`]: pluggable prefix/suffix/infix rule capabilities, with
//!   regex-backed implementations and closure support
//! * [`exceptions`]: the mutable special-case table with its generation
//!   counter
//! * [`cache`]: the generation-tagged segmentation cache
//! * [`engine`]: the affix-stripping algorithm and its termination guard
//! * [`tokenizer`]: orchestration, the builder, and the single-text API
//! * [`pipe`]: the order-preserving concurrent batch interface
//! * [`vocab`]: the lexical-attribute store boundary
//! * [`rules`]: the rule-set construction interface and built-in defaults
//!
//! ## Contracts
//!
//! * Concatenating the surface text of a document's tokens, with the removed
//!   whitespace runs reinserted, reproduces the input exactly.
//! * An exception-table entry always wins over affix and infix rules for its
//!   exact string, before and after stripping.
//! * [`Tokenizer::pipe`] yields documents in strict input order for any
//!   concurrency hint.
//!
//! ## Usage Example
//!
//! ```rust
//! use kotoba::{SubToken, Tokenizer};
//!
//! fn tokenize_example() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokenizer = Tokenizer::default();
//!     tokenizer.add_special_case(
//!         "can't",
//!         vec![SubToken::new("ca"), SubToken::with_norm("n't", "not")],
//!     )?;
//!
//!     let doc = tokenizer.tokenize("I can't stop")?;
//!     let texts: Vec<_> = doc.iter().map(|t| t.text.as_str()).collect();
//!     assert_eq!(texts, ["I", "ca", "n't", "stop"]);
//!     Ok(())
//! }
//! # tokenize_example().unwrap();
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod exceptions;
pub mod matcher;
pub mod pipe;
pub mod rules;
pub mod token;
pub mod tokenizer;
pub mod vocab;

// Re-exports
pub use error::*;
pub use matcher::{InfixMatcher, PrefixMatcher, Span, SuffixMatcher};
pub use pipe::DocumentStream;
pub use token::{Document, SubToken, Token};
pub use tokenizer::{Tokenizer, TokenizerBuilder};
pub use vocab::{Lexeme, LexicalStore, Vocab};
