//! Email token derivation for the blacklist.
//!
//! An address such as `john-doe@company.example.com` is split into the words
//! a user is likely to reuse in a password (`john`, `doe`, `company`,
//! `example`). The top-level domain is never a token on its own. With a
//! sliding window, every fixed-size substring of the tokens and of the raw
//! address parts is added too, so `johnd` or `pany.` are caught as well.

use std::collections::BTreeSet;

use super::blacklist::BlacklistError;

/// Inputs for [`email_tokens`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTokenConfig {
    pub email: String,
    /// Window size in characters; `0` disables windowing.
    pub sliding_window: usize,
    /// Tokens shorter than this many characters are dropped.
    pub min_token_length: usize,
}

impl EmailTokenConfig {
    pub fn new(email: impl Into<String>, sliding_window: usize, min_token_length: usize) -> Self {
        Self {
            email: email.into(),
            sliding_window,
            min_token_length,
        }
    }
}

fn is_delimiter(c: char) -> bool {
    matches!(
        c,
        '!' | '#'
            | '$'
            | '%'
            | '&'
            | '\''
            | '*'
            | '+'
            | ','
            | '-'
            | '.'
            | '/'
            | '='
            | '?'
            | '^'
            | '_'
            | '`'
            | '{'
            | '|'
            | '@'
    )
}

fn split_tokens(part: &str) -> Vec<&str> {
    part.split(is_delimiter).filter(|t| !t.is_empty()).collect()
}

fn add_windows(source: &str, size: usize, words: &mut BTreeSet<String>) {
    let chars: Vec<char> = source.chars().collect();
    for window in chars.windows(size) {
        words.insert(window.iter().collect());
    }
}

/// Derives the blacklist tokens of `email`.
///
/// The result is deduplicated and only holds tokens with at least
/// `min_token_length` characters.
pub fn email_tokens(
    email: &str,
    sliding_window: usize,
    min_token_length: usize,
) -> Result<Vec<String>, BlacklistError> {
    let (local, domain) = email
        .rsplit_once('@')
        .filter(|(local, domain)| !local.is_empty() && !domain.is_empty())
        .ok_or_else(|| BlacklistError::InvalidEmail(email.to_string()))?;

    let local_tokens = split_tokens(local);
    let mut domain_tokens = split_tokens(domain);
    domain_tokens.pop();

    let mut words: BTreeSet<String> = local_tokens
        .iter()
        .chain(domain_tokens.iter())
        .map(|t| t.to_string())
        .collect();

    if sliding_window > 0 {
        for token in local_tokens.iter().chain(domain_tokens.iter()) {
            add_windows(token, sliding_window, &mut words);
        }
        add_windows(&local_tokens.concat(), sliding_window, &mut words);
        add_windows(&domain_tokens.concat(), sliding_window, &mut words);

        add_windows(local, sliding_window, &mut words);
        // Raw domain without the top-level domain and its delimiter.
        let without_tld = domain
            .trim_end_matches(is_delimiter)
            .rsplit_once(is_delimiter)
            .map(|(head, _)| head.trim_end_matches(is_delimiter))
            .unwrap_or("");
        add_windows(without_tld, sliding_window, &mut words);
    }

    Ok(words
        .into_iter()
        .filter(|w| w.chars().count() >= min_token_length)
        .collect())
}
