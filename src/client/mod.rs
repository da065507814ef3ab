//! Fetch client
//!
//! This module composes reqwest with the shared [`ProxyRotator`] and
//! [`CookieStore`]:
//! - one reqwest client per upstream proxy, all sharing the cookie store
//! - User-Agent and Referer headers set on every request
//! - redirects followed by the transport's own policy
//!
//! [`ProxyRotator`]: crate::proxy::ProxyRotator
//! [`CookieStore`]: crate::cookies::CookieStore

mod fetcher;

pub use fetcher::{FetchClient, DEFAULT_USER_AGENT};
