//! Configuration module for Sumi-Fetch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_fetch::config::load_options;
//! use std::path::Path;
//!
//! let options = load_options(Path::new("fetch.toml")).unwrap();
//! println!("Proxy file: {:?}", options.proxy_file);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Options, TransportOptions};

// Re-export parser functions
pub use parser::{load_options, parse_options};
pub use validation::validate;
