//! SHA-512 pre-hash handler.

use base64::{Engine, engine::general_purpose::STANDARD};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};

use crate::error::HandlerError;
use crate::handler::{Named, SyncHandler};
use crate::result::HandlerResult;

/// Length of the emitted digest, matching bcrypt's 72-byte input limit.
pub const PREHASH_LENGTH: usize = 72;

/// Replaces the password with the first 72 base64 characters of its
/// SHA-512 digest (SHA-512/432 per NIST SP 800-107 truncation), so
/// arbitrarily long passwords fit a bcrypt stage without silent truncation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha512Handler;

impl Sha512Handler {
    pub fn new() -> Self {
        Self
    }
}

impl Named for Sha512Handler {
    fn name(&self) -> &str {
        "Sha512Handler"
    }
}

impl SyncHandler for Sha512Handler {
    fn handle_sync(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
        let digest = Sha512::digest(password.expose_secret().as_bytes());
        let mut encoded = STANDARD.encode(digest);
        encoded.truncate(PREHASH_LENGTH);
        Ok(HandlerResult::ok(SecretString::new(encoded.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha512_prehash() {
        let pwd = SecretString::new("correct-horse-battery-staple".to_string().into());
        let result = Sha512Handler.handle_sync(&pwd).unwrap();
        assert_eq!(
            result.password().unwrap().expose_secret(),
            "xA5y03NelhX8FOxHRRJRdBvEQVuvqL2UAa2VwG+Or5P/CU4sKtPu+zspQLq4hxox2jRiPtus"
        );
    }

    #[test]
    fn test_sha512_prehash_length() {
        let long = "x".repeat(500);
        let pwd = SecretString::new(long.into());
        let result = Sha512Handler.handle_sync(&pwd).unwrap();
        assert_eq!(result.password().unwrap().expose_secret().len(), PREHASH_LENGTH);
    }
}
