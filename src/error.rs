// Error types for gisty.
// Separates input validation failures from transport, decoding and cache errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GistError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("token cannot be empty")]
    EmptyToken,

    #[error("bad username: must not contain spaces")]
    BadUsername,

    #[error("pagination: per_page must be positive and page must not be negative")]
    Pagination,

    #[error("id cannot be empty")]
    EmptyId,

    #[error("gist not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decoding response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("cache error at {}: {source}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("encoding cache entry {}: {source}", .path.display())]
    CacheEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing GITHUB_TOKEN environment variable")]
    MissingToken,
}

impl GistError {
    /// Whether this error was raised while checking inputs, before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GistError::EmptyUsername
                | GistError::EmptyToken
                | GistError::BadUsername
                | GistError::Pagination
                | GistError::EmptyId
        )
    }

    pub(crate) fn cache(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GistError::Cache {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GistError>;
