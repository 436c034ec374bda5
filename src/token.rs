use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::vocab::Lexeme;

/// One segment of a whitespace-delimited chunk: the surface text plus an
/// optional canonical-form override. Produced only by the exception table or
/// as the final, unsplittable remainder of affix stripping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubToken {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norm: Option<String>,
}

impl SubToken {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            norm: None,
        }
    }

    pub fn with_norm(text: impl Into<String>, norm: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            norm: Some(norm.into()),
        }
    }

    /// Canonical form, falling back to the surface text.
    pub fn norm(&self) -> &str {
        self.norm.as_deref().unwrap_or(&self.text)
    }
}

/// Joins the surface forms of a sub-token list with no separators.
pub(crate) fn join_surface(subtokens: &[SubToken]) -> String {
    subtokens.iter().map(|s| s.text.as_str()).collect()
}

/// An output token owned by a [`Document`].
#[derive(Debug, Clone)]
pub struct Token {
    /// Surface text, exactly as it appeared in the source.
    pub text: String,
    /// Canonical orthographic form (surface text unless overridden).
    pub norm: String,
    /// True if at least one whitespace character followed this token in the
    /// source text.
    pub whitespace: bool,
    /// Shared attribute record from the lexical store.
    pub lex: Arc<Lexeme>,
}

/// The result of tokenizing one input text: the ordered token sequence plus
/// the original source text.
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
    tokens: Vec<Token>,
}

impl Document {
    pub fn new(text: String, tokens: Vec<Token>) -> Self {
        Self { text, tokens }
    }

    /// The original source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl Index<usize> for Document {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtoken_norm_fallback() {
        let plain = SubToken::new("don");
        assert_eq!(plain.norm(), "don");

        let overridden = SubToken::with_norm("'t", "not");
        assert_eq!(overridden.norm(), "not");
        assert_eq!(overridden.text, "'t");
    }

    #[test]
    fn test_join_surface() {
        let subs = vec![SubToken::new("ca"), SubToken::new("n't")];
        assert_eq!(join_surface(&subs), "can't");
        assert_eq!(join_surface(&[]), "");
    }

    #[test]
    fn test_subtoken_json_shape() {
        let sub: SubToken = serde_json::from_str(r#"{"text": "'t", "norm": "not"}"#).unwrap();
        assert_eq!(sub, SubToken::with_norm("'t", "not"));

        // norm is optional in rule files
        let sub: SubToken = serde_json::from_str(r#"{"text": "do"}"#).unwrap();
        assert_eq!(sub, SubToken::new("do"));
    }
}
