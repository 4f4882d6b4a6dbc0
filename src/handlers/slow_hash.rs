//! bcrypt handler - salted slow hash as the final pipeline stage.

use async_trait::async_trait;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};
use bcrypt::Version;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::error::HandlerError;
use crate::handler::{Handler, Named};
use crate::result::HandlerResult;

const SALT_CHARS: usize = 22;

// bcrypt's base64 variant; the last salt character carries 4 unused bits.
const BCRYPT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::BCRYPT,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Error, Debug)]
pub enum BcryptError {
    #[error("Invalid bcrypt salt: {0}")]
    InvalidSalt(String),
    #[error("bcrypt hash failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BcryptConfig {
    /// Full salt string, e.g. `$2a$12$RNbCt.Je2GAP4ub8FyX5le`.
    pub salt: String,
}

impl BcryptConfig {
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Revision {
    A,
    B,
    X,
    Y,
}

impl Revision {
    fn version(self) -> Version {
        match self {
            Revision::A => Version::TwoA,
            Revision::B => Version::TwoB,
            Revision::X => Version::TwoX,
            Revision::Y => Version::TwoY,
        }
    }
}

/// Hashes the password with a fixed salt, so the output is deterministic and
/// can be sent to a server instead of the plain password.
#[derive(Debug, Clone)]
pub struct BcryptHandler {
    revision: Revision,
    cost: u32,
    salt: [u8; 16],
}

impl BcryptHandler {
    pub fn new(config: &BcryptConfig) -> Result<Self, BcryptError> {
        let invalid = || BcryptError::InvalidSalt(config.salt.clone());

        let mut parts = config.salt.split('$');
        if parts.next() != Some("") {
            return Err(invalid());
        }
        let revision = match parts.next() {
            Some("2a") => Revision::A,
            Some("2b") => Revision::B,
            Some("2x") => Revision::X,
            Some("2y") => Revision::Y,
            _ => return Err(invalid()),
        };
        let cost: u32 = parts
            .next()
            .and_then(|c| c.parse().ok())
            .filter(|c| (4..=31).contains(c))
            .ok_or_else(invalid)?;
        let encoded = parts
            .next()
            .filter(|s| s.len() == SALT_CHARS)
            .ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        let salt: [u8; 16] = BCRYPT_BASE64
            .decode(encoded)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(invalid)?;

        Ok(Self {
            revision,
            cost,
            salt,
        })
    }

    fn hash(&self, password: &SecretString) -> Result<String, BcryptError> {
        let parts = bcrypt::hash_with_salt(password.expose_secret(), self.cost, self.salt)?;
        Ok(parts.format_for_version(self.revision.version()))
    }
}

impl Named for BcryptHandler {
    fn name(&self) -> &str {
        "BcryptHandler"
    }
}

#[async_trait]
impl Handler for BcryptHandler {
    async fn handle(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
        #[cfg(feature = "async")]
        let hashed = {
            let handler = self.clone();
            let password = crate::result::pass_through(password);
            tokio::task::spawn_blocking(move || handler.hash(&password))
                .await
                .map_err(|e| HandlerError::Join(e.to_string()))??
        };

        #[cfg(not(feature = "async"))]
        let hashed = self.hash(password)?;

        Ok(HandlerResult::ok(SecretString::new(hashed.into())))
    }
}
