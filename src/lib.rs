// gisty: paged gist listing and cache-aside gist retrieval.
// The UI layer builds a `ServiceConfig`, then calls list, iter and get on a `GistService`.

pub mod cache;
pub mod config;
pub mod error;
pub mod gist;
pub mod logger;

pub use cache::DocumentCache;
pub use config::{DEFAULT_API_BASE, ServiceConfig, default_cache_dir};
pub use error::{GistError, Result};
pub use gist::{
    FileContent, Fetched, GistDocument, GistService, GistStream, GistSummary, PageAdvance,
    PagePolicy, Source, Summaries,
};
pub use logger::{Logger, TracingLogger};
