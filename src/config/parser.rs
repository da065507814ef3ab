use crate::config::types::Options;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Loads and parses a configuration file from the given path
///
/// Relative `proxy-file` and `cookie-dir` entries are resolved against the
/// directory containing the configuration file.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Options)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_options(path: &Path) -> Result<Options, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut options = parse_options(&content)?;

    if let Some(base) = path.parent() {
        options.proxy_file = options.proxy_file.map(|p| resolve(base, p));
        options.cookie_dir = options.cookie_dir.map(|p| resolve(base, p));
    }

    Ok(options)
}

/// Parses and validates configuration from a TOML string
pub fn parse_options(content: &str) -> Result<Options, ConfigError> {
    let options: Options = toml::from_str(content)?;
    validate(&options)?;
    Ok(options)
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
