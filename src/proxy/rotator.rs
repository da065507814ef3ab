use crate::ProxyError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

/// Proxy entries plus the position of the next one to hand out
#[derive(Debug, Default)]
struct ProxyList {
    entries: Vec<String>,
    cursor: usize,
}

/// Thread-safe round-robin proxy selector
///
/// A single rotator is usually shared through an `Arc` by every client that
/// should rotate over the same pool.
#[derive(Debug, Default)]
pub struct ProxyRotator {
    list: Mutex<ProxyList>,
}

impl ProxyRotator {
    /// Creates an empty rotator; requests go out directly until proxies are loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rotator from in-memory entries
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            list: Mutex::new(ProxyList {
                entries: entries.into_iter().map(Into::into).collect(),
                cursor: 0,
            }),
        }
    }

    /// Appends every line of a proxy file to the rotation
    ///
    /// Lines are trimmed but otherwise kept verbatim, so a blank line becomes
    /// an empty entry that fails to parse when it is selected.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of entries appended
    /// * `Err(ProxyError::Io)` - The file could not be opened or read
    pub fn load(&self, path: &Path) -> Result<usize, ProxyError> {
        let io_err = |source| ProxyError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let mut loaded = Vec::new();
        for line in BufReader::new(file).lines() {
            loaded.push(line.map_err(io_err)?.trim().to_string());
        }

        let count = loaded.len();
        self.lock().entries.extend(loaded);
        tracing::info!("Loaded {} proxies from {}", count, path.display());
        Ok(count)
    }

    /// Selects the next proxy in round-robin order
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Url))` - The proxy to use for the next request
    /// * `Ok(None)` - No proxies configured; connect directly
    /// * `Err(ProxyError::InvalidUrl)` - The selected entry is not a valid URL
    pub fn next_proxy(&self) -> Result<Option<Url>, ProxyError> {
        let entry = {
            let mut list = self.lock();
            if list.entries.is_empty() {
                return Ok(None);
            }
            let entry = list.entries[list.cursor].clone();
            list.cursor = (list.cursor + 1) % list.entries.len();
            entry
        };

        Url::parse(&entry)
            .map(Some)
            .map_err(|source| ProxyError::InvalidUrl { entry, source })
    }

    /// Number of proxies in the rotation
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The list never holds a half-applied update, so a poisoned lock is safe to reuse
    fn lock(&self) -> MutexGuard<'_, ProxyList> {
        self.list.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
