//! Seed dataset download and local file cache.
//!
//! The seed import reads the public product-transaction dataset. It is
//! downloaded once into the cache directory and read from disk afterwards;
//! offline mode never touches the network.

use crate::config;
use crate::error::{InsightsError, Result};
use crate::models::TransactionRecord;
use reqwest::blocking::Client;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Downloads and caches the seed dataset.
pub struct CacheManager {
    /// Directory where cached files are stored.
    pub cache_dir: PathBuf,
    /// If true, never download (use cached files only).
    pub offline: bool,
    seed_url: String,
    timeout: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool, timeout: Duration) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            seed_url: config::SEED_URL.to_string(),
            timeout,
            client: None,
        })
    }

    /// Download the seed dataset from `url` instead of the public default.
    pub fn with_seed_url(mut self, url: impl Into<String>) -> Self {
        self.seed_url = url.into();
        self
    }

    /// Where the cached seed dataset lives.
    pub fn seed_path(&self) -> PathBuf {
        self.cache_dir.join(config::SEED_FILE)
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> Result<&Client> {
        if self.client.is_none() {
            self.client = Some(
                Client::builder()
                    .timeout(self.timeout)
                    .redirect(reqwest::redirect::Policy::limited(10))
                    .build()?,
            );
        }
        self.client
            .as_ref()
            .ok_or_else(|| InsightsError::Internal("HTTP client unavailable".into()))
    }

    /// Download `url` to `dest`.
    ///
    /// Writes to a temp file in the cache directory and renames on success, so
    /// an interrupted download never leaves a partial file at `dest`.
    fn download_file(&mut self, url: &str, dest: &Path) -> Result<()> {
        tracing::info!(url, dest = %dest.display(), "downloading seed dataset");

        let parent = dest.parent().unwrap_or(&self.cache_dir).to_path_buf();
        fs::create_dir_all(&parent)?;

        let client = self.client()?.clone();
        let bytes = client.get(url).send()?.error_for_status()?.bytes()?;

        // Dropping an unpersisted temp file deletes it
        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&bytes)?;
        tmp.flush()?;
        tmp.persist(dest).map_err(|e| e.error)?;
        Ok(())
    }

    /// Ensure the seed dataset is cached locally, downloading if needed.
    ///
    /// # Returns
    ///
    /// Local filesystem path to the cached JSON file.
    pub fn ensure_seed(&mut self) -> Result<PathBuf> {
        let local_path = self.seed_path();
        if local_path.exists() {
            return Ok(local_path);
        }
        if self.offline {
            return Err(InsightsError::NotFound(format!(
                "Seed file {} not cached and offline mode is enabled",
                config::SEED_FILE
            )));
        }
        let url = self.seed_url.clone();
        self.download_file(&url, &local_path)?;
        Ok(local_path)
    }

    /// Load and parse the seed dataset.
    ///
    /// If the cached file is corrupt (truncated download, disk error), it is
    /// deleted so the next call re-downloads a fresh copy.
    pub fn load_seed(&mut self) -> Result<Vec<TransactionRecord>> {
        let path = self.ensure_seed()?;
        let contents = fs::read_to_string(&path)?;

        match serde_json::from_str::<Vec<TransactionRecord>>(&contents) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt seed cache file, removing");
                let _ = fs::remove_file(&path);
                Err(InsightsError::NotFound(format!(
                    "Cache file '{}' was corrupt and has been removed. \
                     Retry to re-download. Original error: {}",
                    config::SEED_FILE,
                    e
                )))
            }
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}
