//! Word list loading
//!
//! Reads banned words for [`BlacklistConfig`](crate::BlacklistConfig) from a
//! plain text file, one word per line.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the word list path.
pub const WORDLIST_PATH_VAR: &str = "PWD_BLACKLIST_PATH";

#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("Word list file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read word list file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Word list file is empty")]
    EmptyFile,
}

/// Returns the word list path.
///
/// Priority:
/// 1. Environment variable `PWD_BLACKLIST_PATH`
/// 2. Default path `./assets/blacklist.txt`
pub fn get_wordlist_path() -> PathBuf {
    std::env::var(WORDLIST_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/blacklist.txt"))
}

/// Loads the word list from [`get_wordlist_path`].
///
/// # Errors
///
/// Returns error if:
/// - File does not exist
/// - File cannot be read
/// - File has no words
pub fn load_wordlist() -> Result<Vec<String>, WordlistError> {
    load_wordlist_from_path(get_wordlist_path())
}

/// Loads the word list from a specific file path.
///
/// Lines are trimmed and blank lines skipped. Duplicates are dropped,
/// keeping the first occurrence so the file order is preserved.
///
/// # Example
///
/// ```rust,no_run
/// use pwd_pipeline::{BlacklistConfig, load_wordlist_from_path};
///
/// let words = load_wordlist_from_path("/etc/myapp/blacklist.txt")?;
/// let config = BlacklistConfig::new().with_words(words);
/// # Ok::<(), pwd_pipeline::WordlistError>(())
/// ```
pub fn load_wordlist_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<String>, WordlistError> {
    let path = path.as_ref();

    if !path.exists() {
        #[cfg(feature = "tracing")]
        tracing::error!("Word list loading FAILED: FileNotFound {:?}", path);
        return Err(WordlistError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;

    let mut seen = HashSet::new();
    let words: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(l.to_string()))
        .map(str::to_string)
        .collect();

    if words.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::error!("Word list loading FAILED: Empty file {:?}", path);
        return Err(WordlistError::EmptyFile);
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Word list loaded: {} words from {:?}", words.len(), path);

    Ok(words)
}
