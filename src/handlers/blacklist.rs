//! Blacklist handler - rejects passwords containing banned words, matching
//! banned patterns or reusing parts of the user's email address.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use super::email::{EmailTokenConfig, email_tokens};
use crate::error::HandlerError;
use crate::handler::{Named, SyncHandler};
use crate::result::{Failure, HandlerResult, pass_through};

#[derive(Error, Debug)]
pub enum BlacklistError {
    #[error("Invalid blacklist pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("Invalid email address for blacklist: {0}")]
    InvalidEmail(String),
}

/// What [`BlacklistHandler`] bans.
#[derive(Debug, Clone, Default)]
pub struct BlacklistConfig {
    /// Compared as upper-case substrings of the upper-cased password.
    pub case_insensitive_words: Vec<String>,
    /// Matched against the password as typed.
    pub patterns: Vec<Regex>,
    /// When set, a word only counts if `word / password` (in characters)
    /// reaches this ratio, so a short word alone does not ban a long
    /// passphrase.
    pub ratio_threshold: Option<f64>,
}

impl BlacklistConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.case_insensitive_words
            .extend(words.into_iter().map(Into::into));
        self
    }

    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = Regex>) -> Self {
        self.patterns.extend(patterns);
        self
    }

    /// Compiles and adds `patterns`.
    pub fn try_with_patterns(self, patterns: &[&str]) -> Result<Self, BlacklistError> {
        let compiled = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_patterns(compiled))
    }

    pub fn with_ratio_threshold(mut self, ratio: f64) -> Self {
        self.ratio_threshold = Some(ratio);
        self
    }
}

#[derive(Debug, Clone)]
struct Word {
    folded: String,
    chars: usize,
}

impl Word {
    fn new(word: &str) -> Option<Self> {
        if word.is_empty() {
            return None;
        }
        Some(Self {
            folded: word.to_uppercase(),
            chars: word.chars().count(),
        })
    }
}

/// NIST 800-63B recommends comparing chosen passwords against a list of
/// unacceptable values: dictionary words, service-specific words and words
/// derived from the account itself.
///
/// The handler reports up to three failures per call, in this order:
/// `caseInsensitiveWords`, `regExps`, `emailTokens`.
#[derive(Debug, Clone)]
pub struct BlacklistHandler {
    name: &'static str,
    words: Vec<Word>,
    patterns: Vec<Regex>,
    ratio_threshold: Option<f64>,
    email_tokens: Vec<Word>,
}

impl BlacklistHandler {
    pub fn new(config: BlacklistConfig) -> Self {
        Self {
            name: "BlacklistHandler",
            words: config
                .case_insensitive_words
                .iter()
                .filter_map(|w| Word::new(w))
                .collect(),
            patterns: config.patterns,
            ratio_threshold: config.ratio_threshold,
            email_tokens: Vec::new(),
        }
    }

    /// Handler that only bans tokens derived from one email address.
    pub fn from_email(config: &EmailTokenConfig) -> Result<Self, BlacklistError> {
        let mut handler = Self::new(BlacklistConfig::default());
        handler.name = "EmailBlacklistHandler";
        handler.add_email_information(
            &config.email,
            config.sliding_window,
            config.min_token_length,
        )?;
        Ok(handler)
    }

    /// Bans the tokens derived from `email`.
    ///
    /// Calls only ever add tokens; a token that is already banned is not
    /// stored twice.
    pub fn add_email_information(
        &mut self,
        email: &str,
        sliding_window: usize,
        min_token_length: usize,
    ) -> Result<(), BlacklistError> {
        let tokens = email_tokens(email, sliding_window, min_token_length)?;
        #[cfg(feature = "tracing")]
        let before = self.email_tokens.len();
        for word in tokens.iter().filter_map(|t| Word::new(t)) {
            if !self.email_tokens.iter().any(|w| w.folded == word.folded) {
                self.email_tokens.push(word);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "{}: added {} email tokens",
            self.name,
            self.email_tokens.len() - before
        );

        Ok(())
    }

    pub fn email_token_count(&self) -> usize {
        self.email_tokens.len()
    }

    fn contains_any(&self, words: &[Word], folded: &str, password_chars: usize) -> bool {
        words.iter().any(|word| {
            let long_enough = self.ratio_threshold.is_none_or(|ratio| {
                password_chars > 0 && word.chars as f64 / password_chars as f64 >= ratio
            });
            long_enough && folded.contains(&word.folded)
        })
    }
}

impl Named for BlacklistHandler {
    fn name(&self) -> &str {
        self.name
    }
}

impl SyncHandler for BlacklistHandler {
    fn handle_sync(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
        let pwd = password.expose_secret();
        let folded = pwd.to_uppercase();
        let password_chars = pwd.chars().count();
        let mut failures = Vec::new();

        if self.contains_any(&self.words, &folded, password_chars) {
            failures.push(Failure::matched(self.name, "caseInsensitiveWords"));
        }
        if matches_any(&self.patterns, pwd) {
            failures.push(Failure::matched(self.name, "regExps"));
        }
        if self.contains_any(&self.email_tokens, &folded, password_chars) {
            failures.push(Failure::matched(self.name, "emailTokens"));
        }

        if failures.is_empty() {
            return Ok(HandlerResult::ok(pass_through(password)));
        }
        Ok(HandlerResult::fail(failures))
    }
}

pub(crate) fn matches_any(patterns: &[Regex], password: &str) -> bool {
    patterns.iter().any(|p| p.is_match(password))
}
