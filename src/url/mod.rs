//! URL handling module for Sumi-Fetch
//!
//! This module provides the domain heuristic used to scope cookies.

mod domain;

pub use domain::{domain_of, extract_domain};
