//! Upstream proxy selection
//!
//! Proxies are read from a plain-text file, one URL per line, and handed out
//! in round-robin order to every request issued through a
//! [`FetchClient`](crate::client::FetchClient).

mod rotator;

pub use rotator::ProxyRotator;
