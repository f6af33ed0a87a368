//! Key material source: one hex private key per line.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::blockchain::types::AccountKey;

#[derive(Debug, Error)]
pub enum KeySourceError {
    #[error("failed to read key file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Split newline-delimited keys, preserving order and dropping blank lines.
pub fn parse_keys(content: &str) -> Vec<AccountKey> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(AccountKey::new)
        .collect()
}

/// Read the key file once.
pub fn load_keys(path: &Path) -> Result<Vec<AccountKey>, KeySourceError> {
    let content = fs::read_to_string(path).map_err(|source| KeySourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_keys(&content))
}
