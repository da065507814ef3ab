//! Cookie directory loading
//!
//! Layout: every file below the root contributes `name = value` lines to the
//! domain named after the file's parent directory.

use crate::cookies::Cookie;
use crate::CookieError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Cookies parsed from a directory tree, grouped by domain
pub(crate) type StagedCookies = HashMap<String, Vec<Cookie>>;

/// Parses every cookie file below `dir`
///
/// Nothing is returned unless the whole tree parses, so callers can commit
/// the result atomically.
pub(crate) fn read_cookie_dir(dir: &Path) -> Result<StagedCookies, CookieError> {
    let mut staged = StagedCookies::new();
    walk(dir, &mut staged)?;
    Ok(staged)
}

fn walk(dir: &Path, staged: &mut StagedCookies) -> Result<(), CookieError> {
    let io_err = |source| CookieError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    // Stable order keeps per-domain cookie order reproducible
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| CookieError::Io {
            path: path.clone(),
            source,
        })?;

        if file_type.is_dir() {
            walk(&path, staged)?;
        } else if file_type.is_file() {
            let domain = dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let cookies = parse_cookie_file(&path)?;
            staged.entry(domain).or_default().extend(cookies);
        }
    }

    Ok(())
}

/// Parses one cookie file
///
/// Blank lines are skipped. Any other line must look like `name = value`
/// with both sides non-empty after trimming.
fn parse_cookie_file(path: &Path) -> Result<Vec<Cookie>, CookieError> {
    let content = fs::read_to_string(path).map_err(|source| CookieError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut cookies = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let format_err = || CookieError::Format {
            path: path.to_path_buf(),
            line: index + 1,
        };

        let (name, value) = line.split_once('=').ok_or_else(format_err)?;
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            return Err(format_err());
        }
        cookies.push(Cookie::new(name, value));
    }

    Ok(cookies)
}
