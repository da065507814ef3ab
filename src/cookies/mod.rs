//! Domain-scoped cookie storage
//!
//! This module provides a deliberately small replacement for a full cookie
//! jar. Cookies are keyed by the domain heuristic in [`crate::url`] and carry
//! only a name and a value:
//!
//! - [`CookieStore`] is the shared map, plugged into reqwest as its cookie provider
//! - directory loading seeds the store from `<dir>/<domain>/<file>` trees

mod loader;
mod store;

pub use store::CookieStore;

/// A single name/value cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
