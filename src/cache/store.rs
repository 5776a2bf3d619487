// On-disk gist document cache.
// One JSON file per gist ID; entries never expire and are only removed on request.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{GistError, Result};
use crate::gist::GistDocument;
use crate::logger::Logger;

use super::paths::{entry_path, is_entry};

/// Unbounded key/value store of gist documents rooted at a directory.
#[derive(Debug, Clone)]
pub struct DocumentCache {
    dir: PathBuf,
    logger: Arc<dyn Logger>,
    // False when the directory could not be created; lookups then miss quietly.
    readable: bool,
}

impl DocumentCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    ///
    /// A directory that cannot be created is reported to the logger once;
    /// the cache then misses on every lookup and fails every store.
    pub fn open(dir: impl Into<PathBuf>, logger: Arc<dyn Logger>) -> Self {
        let dir = dir.into();
        let readable = match fs::create_dir_all(&dir) {
            Ok(()) => true,
            Err(e) => {
                logger.warning(&format!(
                    "creating cache directory {}: {}",
                    dir.display(),
                    e
                ));
                false
            }
        };
        Self {
            dir,
            logger,
            readable,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached document for `id`, or `None` on a miss.
    ///
    /// Unreadable or undecodable entries count as misses and are reported
    /// to the logger.
    pub fn lookup(&self, id: &str) -> Option<GistDocument> {
        if !self.readable {
            return None;
        }
        let path = entry_path(&self.dir, id);
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("cache miss for gist {}", id);
                return None;
            }
            Err(e) => {
                self.logger
                    .warning(&format!("reading from cache {}: {}", path.display(), e));
                return None;
            }
        };

        match serde_json::from_slice(&contents) {
            Ok(document) => {
                tracing::debug!("cache hit for gist {}", id);
                Some(document)
            }
            Err(e) => {
                self.logger
                    .warning(&format!("decoding cache entry {}: {}", path.display(), e));
                None
            }
        }
    }

    /// Write `document` under `id`, replacing any previous entry.
    pub fn store(&self, id: &str, document: &GistDocument) -> Result<()> {
        self.write_entry(id, document)
    }

    fn write_entry<T: Serialize>(&self, id: &str, value: &T) -> Result<()> {
        let path = entry_path(&self.dir, id);
        let json = serde_json::to_vec(value).map_err(|source| GistError::CacheEncode {
            path: path.clone(),
            source,
        })?;

        // Each write gets its own temp file, so concurrent writers never share one.
        let mut file =
            NamedTempFile::new_in(&self.dir).map_err(|e| GistError::cache(&self.dir, e))?;
        file.write_all(&json)
            .map_err(|e| GistError::cache(file.path(), e))?;
        file.as_file()
            .sync_all()
            .map_err(|e| GistError::cache(file.path(), e))?;
        let _ = file
            .persist(&path)
            .map_err(|e| GistError::cache(&path, e.error))?;

        tracing::debug!("cached gist {} at {}", id, path.display());
        Ok(())
    }

    /// Remove the entry for `id`. A missing entry is not an error.
    pub fn invalidate(&self, id: &str) -> Result<()> {
        let path = entry_path(&self.dir, id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GistError::cache(path, e)),
        }
    }

    /// Remove every entry, leaving the directory and foreign files in place.
    pub fn clear(&self) -> Result<()> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(GistError::cache(&self.dir, e)),
        };

        for entry in entries {
            let path = entry.map_err(|e| GistError::cache(&self.dir, e))?.path();
            if is_entry(&path) {
                fs::remove_file(&path).map_err(|e| GistError::cache(&path, e))?;
            }
        }
        Ok(())
    }
}
