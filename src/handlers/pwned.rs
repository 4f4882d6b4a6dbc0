//! Breach corpus handler - checks the password against Pwned Passwords.
//!
//! Uses the k-anonymity range search: only the first five hex characters of
//! the password's SHA-1 leave the process, and the returned suffixes are
//! compared locally. Transport is left to a [`RangeClient`].

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};

use crate::error::HandlerError;
use crate::handler::{Handler, Named};
use crate::result::{Failure, HandlerResult, pass_through};

/// Number of hex characters sent to the range endpoint.
pub const PREFIX_LENGTH: usize = 5;

/// One line of a range response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry {
    /// Remaining 35 hex characters of the SHA-1.
    pub suffix: String,
    /// Times the password appeared in breaches. Padding entries carry 0.
    pub count: u64,
}

impl RangeEntry {
    pub fn new(suffix: impl Into<String>, count: u64) -> Self {
        Self {
            suffix: suffix.into(),
            count,
        }
    }
}

/// Fetches every breached hash suffix sharing `prefix`.
#[async_trait]
pub trait RangeClient: Send + Sync {
    async fn lookup(&self, prefix: &str) -> Result<Vec<RangeEntry>, HandlerError>;
}

/// Parses a `SUFFIX:COUNT` response body. Malformed lines are skipped.
pub fn parse_range_response(body: &str) -> Vec<RangeEntry> {
    body.lines()
        .filter_map(|line| {
            let (suffix, count) = line.trim().split_once(':')?;
            let count = count.trim().parse().ok()?;
            Some(RangeEntry::new(suffix.trim(), count))
        })
        .collect()
}

pub struct PwnedHandler<C> {
    client: C,
}

impl<C: RangeClient> PwnedHandler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C> Named for PwnedHandler<C> {
    fn name(&self) -> &str {
        "PwnedHandler"
    }
}

#[async_trait]
impl<C: RangeClient> Handler for PwnedHandler<C> {
    async fn handle(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
        let hashed = hex::encode_upper(Sha1::digest(password.expose_secret().as_bytes()));
        let (prefix, suffix) = hashed.split_at(PREFIX_LENGTH);

        let entries = self.client.lookup(prefix).await?;
        let pwned = entries
            .iter()
            .any(|entry| entry.count > 0 && entry.suffix.eq_ignore_ascii_case(suffix));

        if pwned {
            #[cfg(feature = "tracing")]
            tracing::debug!("{}: password found in range {}", self.name(), prefix);
            return Ok(HandlerResult::fail(Failure::matched(self.name(), "pwned")));
        }
        Ok(HandlerResult::ok(pass_through(password)))
    }
}
