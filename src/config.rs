use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::error::{Error, InternalResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Input buffer size for `pipe` when the caller passes zero.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Worker count for `pipe` when the caller passes zero. Advisory.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Extra matcher invocations the affix loops may spend beyond one per
    /// byte of the chunk before the engine declares a protocol violation.
    #[serde(default = "default_affix_iteration_slack")]
    pub max_affix_iterations: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            concurrency: default_concurrency(),
            max_affix_iterations: default_affix_iteration_slack(),
        }
    }
}

impl TokenizerConfig {
    pub fn from_file(path: &str) -> InternalResult<Self> {
        from_file(path)
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)
        .map_err(|e| Error::Internal(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Internal(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Internal(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

// デフォルト値の定義
fn default_batch_size() -> usize {
    64
}
fn default_concurrency() -> usize {
    1
}
fn default_affix_iteration_slack() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = TokenizerConfig::default();
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.max_affix_iterations, 64);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: TokenizerConfig = from_str(r#"{"concurrency": 8}"#).unwrap();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.batch_size, 64);
    }
}
