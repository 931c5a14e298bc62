use std::io;
use std::path::{Path, PathBuf};

use crate::security::absolutize;

/// Environment variable holding the comma-separated allow-list.
pub const ALLOWED_PATHS_ENV: &str = "FLOW_ALLOWED_PATHS";

/// Directory the harness binary validates, fixed at build time.
pub const CONNECTIVITY_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/spec/connectivity");

/// Reads [`ALLOWED_PATHS_ENV`] and returns the allowed bases in the order given.
///
/// The variable is read on every call. Unset, empty and non-Unicode values
/// all yield an empty set, which makes every guarded access fail with
/// `NotConfigured`.
pub fn get_allowed_paths() -> io::Result<Vec<PathBuf>> {
    match std::env::var(ALLOWED_PATHS_ENV) {
        Ok(raw) => parse_allowed_paths(&raw),
        Err(_) => Ok(Vec::new()),
    }
}

/// Splits a raw allow-list on commas, trims each entry, drops empty ones and
/// resolves the rest to absolute normalized paths.
pub fn parse_allowed_paths(raw: &str) -> io::Result<Vec<PathBuf>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| absolutize(Path::new(entry)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub root: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self { root: PathBuf::from(CONNECTIVITY_ROOT) }
    }
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join("schemas")
    }

    pub fn fixtures_dir(&self) -> PathBuf {
        self.root.join("fixtures")
    }
}
