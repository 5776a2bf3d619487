// Gist API module.
// Validation, URL construction, HTTP access, paging and the cache-aside service.

pub mod client;
pub mod endpoints;
mod flight;
pub mod pager;
pub mod service;
pub mod types;
pub mod validate;

pub use client::GistClient;
pub use pager::{DEFAULT_PER_PAGE, GistStream, PageAdvance, PagePolicy, Summaries};
pub use service::{Fetched, GistService, Source};
pub use types::*;
