//! Rule-set construction interface: the mapping the external rule-loading
//! collaborator hands to the tokenizer — regex pattern lists for the three
//! matcher roles plus the initial special-case table — and a compact
//! built-in punctuation rule set for out-of-the-box use.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::InternalResult;
use crate::token::SubToken;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuleSet {
    #[serde(default)]
    pub prefixes: Vec<String>,
    #[serde(default)]
    pub suffixes: Vec<String>,
    #[serde(default)]
    pub infixes: Vec<String>,
    #[serde(default)]
    pub special_cases: HashMap<String, Vec<SubToken>>,
}

impl RuleSet {
    pub fn from_file(path: &str) -> InternalResult<Self> {
        config::from_file(path)
    }

    pub fn from_str(s: &str) -> InternalResult<Self> {
        config::from_str(s)
    }
}

lazy_static! {
    static ref DEFAULT_RULES: RuleSet = RuleSet {
        prefixes: vec![
            r#"[(\[{<]"#.to_string(),
            r#"["'«‘“]"#.to_string(),
            r#"[$£€]"#.to_string(),
        ],
        suffixes: vec![
            r#"[)\]}>]"#.to_string(),
            r#"["'»’”]"#.to_string(),
            r#"\.\.\."#.to_string(),
            r#"[.,;:!?%]"#.to_string(),
        ],
        infixes: vec![
            r#"--+"#.to_string(),
            r#"[-–—/,]"#.to_string(),
            r#"\.\.\."#.to_string(),
        ],
        special_cases: HashMap::new(),
    };
}

/// The built-in punctuation rule set used by `Tokenizer::default()`. Not a
/// linguistically complete rule set for any language; language-specific
/// rules come in through [`RuleSet`] files.
pub fn default_rules() -> &'static RuleSet {
    &DEFAULT_RULES
}
