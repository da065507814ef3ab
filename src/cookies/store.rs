use crate::cookies::loader::read_cookie_dir;
use crate::cookies::Cookie;
use crate::url::domain_of;
use crate::CookieError;
use reqwest::header::HeaderValue;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use url::Url;

/// Shared domain → cookies map
///
/// Reads happen on every outgoing request and writes only on responses that
/// set cookies, hence the `RwLock`.
#[derive(Debug, Default)]
pub struct CookieStore {
    data: RwLock<HashMap<String, Vec<Cookie>>>,
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store from a cookie directory tree
    ///
    /// The whole tree is parsed before anything is stored: on error the
    /// store is left exactly as it was. Loaded cookies are appended to any
    /// cookies already held for the same domain.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of cookies loaded
    /// * `Err(CookieError)` - The tree could not be read or a file is malformed
    pub fn load_dir(&self, dir: &Path) -> Result<usize, CookieError> {
        let staged = read_cookie_dir(dir)?;
        let count = staged.values().map(Vec::len).sum();

        let mut data = self.write();
        for (domain, cookies) in staged {
            data.entry(domain).or_default().extend(cookies);
        }
        drop(data);

        tracing::info!("Loaded {} cookies from {}", count, dir.display());
        Ok(count)
    }

    /// Returns the cookies stored for the URL's domain
    pub fn cookies_for(&self, url: &Url) -> Vec<Cookie> {
        self.read()
            .get(&domain_of(url))
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the cookies stored for the URL's domain
    pub fn set_cookies_for(&self, url: &Url, cookies: Vec<Cookie>) {
        self.write().insert(domain_of(url), cookies);
    }

    /// Domains that currently hold cookies
    pub fn domains(&self) -> Vec<String> {
        let mut domains: Vec<String> = self.read().keys().cloned().collect();
        domains.sort();
        domains
    }

    /// Number of domains in the store
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<Cookie>>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<Cookie>>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl reqwest::cookie::CookieStore for CookieStore {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let cookies: Vec<Cookie> = cookie_headers
            .filter_map(|header| {
                let raw = header.to_str().ok()?;
                match cookie::Cookie::parse(raw) {
                    Ok(parsed) => Some(Cookie::new(parsed.name(), parsed.value())),
                    Err(e) => {
                        tracing::warn!("Ignoring malformed Set-Cookie from {}: {}", url, e);
                        None
                    }
                }
            })
            .collect();
        // A response with no usable cookies leaves the domain's cookies alone
        if cookies.is_empty() {
            return;
        }
        self.set_cookies_for(url, cookies);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        let cookies = self.cookies_for(url);
        if cookies.is_empty() {
            return None;
        }

        let header = cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        match HeaderValue::from_str(&header) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Dropping unencodable cookies for {}: {}", url, e);
                None
            }
        }
    }
}
