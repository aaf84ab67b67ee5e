use thiserror::Error;

use crate::parser::ParseError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    // config files
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("Source pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
