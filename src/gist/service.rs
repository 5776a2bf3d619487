// Gist service: paged listing and cache-aside document retrieval.
// Cheap to clone; clones share the HTTP client, cache and in-flight locks.

use std::sync::Arc;

use crate::cache::DocumentCache;
use crate::config::ServiceConfig;
use crate::error::{GistError, Result};
use crate::logger::Logger;

use super::client::GistClient;
use super::endpoints;
use super::flight::KeyedLocks;
use super::types::{GistDocument, GistSummary};
use super::validate::{validate_id, validate_list};

/// Where a fetched document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Remote,
}

/// Outcome of [`GistService::fetch`].
#[derive(Debug)]
pub struct Fetched {
    pub document: GistDocument,
    pub source: Source,
    /// Set when the document was fetched but could not be persisted.
    pub cache_error: Option<GistError>,
}

#[derive(Clone, Debug)]
pub struct GistService {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: ServiceConfig,
    api_base: String,
    client: GistClient,
    cache: Option<DocumentCache>,
    in_flight: KeyedLocks,
}

impl GistService {
    /// Build a service from a finished configuration.
    ///
    /// The API base default is resolved here, once. Opening the cache
    /// directory may log a warning but never fails construction.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = GistClient::new(config.timeout)?;
        let api_base = config.resolved_api_base();
        let cache = config
            .cache_dir
            .as_ref()
            .map(|dir| DocumentCache::open(dir, Arc::clone(&config.logger)));

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                api_base,
                client,
                cache,
                in_flight: KeyedLocks::default(),
            }),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    pub fn api_base(&self) -> &str {
        &self.inner.api_base
    }

    pub fn cache(&self) -> Option<&DocumentCache> {
        self.inner.cache.as_ref()
    }

    pub(crate) fn logger(&self) -> &dyn Logger {
        self.inner.config.logger.as_ref()
    }

    /// Fetch one page of the user's gists, in the order the API returns them.
    pub async fn list(&self, per_page: i64, page: i64) -> Result<Vec<GistSummary>> {
        let config = &self.inner.config;
        validate_list(&config.username, &config.token, per_page, page)?;

        let url = endpoints::list_url(
            &self.inner.api_base,
            &config.username,
            &config.token,
            page,
            per_page,
        )?;
        let summaries: Vec<GistSummary> = self.inner.client.get_list(url).await?;
        tracing::debug!(
            "listed {} gists for {} (page {}, per_page {})",
            summaries.len(),
            config.username,
            page,
            per_page
        );
        Ok(summaries)
    }

    /// Get a gist by ID, reporting a failed cache write to the logger.
    pub async fn get(&self, id: &str) -> Result<GistDocument> {
        let fetched = self.fetch(id).await?;
        if let Some(e) = &fetched.cache_error {
            self.logger().warning(&format!("caching gist {}: {}", id, e));
        }
        Ok(fetched.document)
    }

    /// Get a gist by ID, consulting the cache first.
    ///
    /// A cache hit is trusted unconditionally and makes no request. On a
    /// miss the document is fetched once and then stored; a failed store
    /// is returned in [`Fetched::cache_error`] next to the fresh document.
    /// Concurrent calls for the same ID are coalesced so only one of them
    /// reaches the network.
    pub async fn fetch(&self, id: &str) -> Result<Fetched> {
        validate_id(id)?;
        let gist_url = endpoints::gist_url(&self.inner.api_base, id)?.to_string();

        if let Some(fetched) = self.from_cache(id, &gist_url) {
            return Ok(fetched);
        }

        let _guard = self.inner.in_flight.lock(id).await;
        // Another caller may have filled the cache while we waited.
        if let Some(fetched) = self.from_cache(id, &gist_url) {
            return Ok(fetched);
        }

        let url = endpoints::document_url(&self.inner.api_base, id, &self.inner.config.token)?;
        let mut document: GistDocument = self.inner.client.get_item(url).await?;

        let cache_error = match &self.inner.cache {
            Some(cache) => cache.store(id, &document).err(),
            None => None,
        };
        document.url = gist_url;

        Ok(Fetched {
            document,
            source: Source::Remote,
            cache_error,
        })
    }

    /// Drop the cached copy of a gist so the next get goes to the network.
    pub fn invalidate(&self, id: &str) -> Result<()> {
        validate_id(id)?;
        match &self.inner.cache {
            Some(cache) => cache.invalidate(id),
            None => Ok(()),
        }
    }

    fn from_cache(&self, id: &str, gist_url: &str) -> Option<Fetched> {
        let mut document = self.inner.cache.as_ref()?.lookup(id)?;
        document.url = gist_url.to_string();
        Some(Fetched {
            document,
            source: Source::Cache,
            cache_error: None,
        })
    }
}
