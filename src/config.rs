// Service configuration.
// Built once by the caller, then handed to the service by value and never mutated.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;

use crate::error::{GistError, Result};
use crate::logger::{Logger, TracingLogger};

/// Production API host used when no base is configured.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Credentials, endpoints and collaborators for a [`GistService`](crate::GistService).
#[derive(Clone)]
pub struct ServiceConfig {
    pub username: String,
    pub token: String,
    /// Empty means [`DEFAULT_API_BASE`].
    pub api_base: String,
    /// When unset, documents are always fetched remotely and never persisted.
    pub cache_dir: Option<PathBuf>,
    /// Transport-level deadline for each request.
    pub timeout: Option<Duration>,
    pub logger: Arc<dyn Logger>,
}

impl ServiceConfig {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            api_base: String::new(),
            cache_dir: None,
            timeout: None,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Build a configuration from `GITHUB_USER`, `GITHUB_TOKEN`, and the
    /// optional `GISTY_API` / `GISTY_CACHE_DIR` overrides.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").map_err(|_| GistError::MissingToken)?;
        let username = std::env::var("GITHUB_USER").unwrap_or_default();

        let mut config = Self::new(username, token);
        if let Ok(api) = std::env::var("GISTY_API") {
            config = config.with_api_base(api);
        }
        if let Some(dir) = std::env::var_os("GISTY_CACHE_DIR") {
            config = config.with_cache_dir(dir);
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// The API base with the default applied and trailing slashes removed.
    pub fn resolved_api_base(&self) -> String {
        let base = self.api_base.trim().trim_end_matches('/');
        if base.is_empty() {
            DEFAULT_API_BASE.to_string()
        } else {
            base.to_string()
        }
    }
}

// The token stays out of debug output.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("cache_dir", &self.cache_dir)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Per-user gist cache directory (~/.cache/gisty/gists on Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gisty").map(|dirs| dirs.cache_dir().join("gists"))
}
