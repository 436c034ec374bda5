use thiserror::Error;

/// Errors produced by the tokenizer core.
///
/// All failures here are deterministic functions of configuration and input;
/// none are retried, since retrying without changing the rule set would
/// reproduce the same failure.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// A special case's sub-token surface forms do not concatenate back to
    /// the literal string being registered. The exception table is left
    /// unchanged.
    #[error("special case '{key}' rejected: sub-tokens join to '{joined}'")]
    Configuration { key: String, joined: String },

    /// A matcher reported a length or span that is out of range, off a UTF-8
    /// character boundary, or caused the affix loop to exhaust its iteration
    /// budget. Indicates a misconfigured rule set; fatal for the current
    /// call.
    #[error("matcher protocol violation: {context}")]
    MatcherProtocol { context: String },
}

pub type TokenizerResult<T> = Result<T, TokenizerError>;

impl TokenizerError {
    pub(crate) fn protocol<S: Into<String>>(context: S) -> Self {
        TokenizerError::MatcherProtocol {
            context: context.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
