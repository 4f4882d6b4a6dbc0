//! Length handler - checks character count and UTF-8 byte size.

use secrecy::{ExposeSecret, SecretString};

use crate::error::HandlerError;
use crate::handler::{Named, SyncHandler};
use crate::result::{Failure, HandlerResult, pass_through};

/// Bounds enforced by [`LengthHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthConfig {
    /// Minimum number of UTF-16 code units.
    pub min_length: usize,
    /// Maximum size in bytes once encoded as UTF-8. 72 matches bcrypt's
    /// input limit; raise it when a pre-hash stage runs before bcrypt.
    pub max_byte_size: usize,
}

impl Default for LengthConfig {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_byte_size: 72,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LengthHandler {
    config: LengthConfig,
}

impl LengthHandler {
    pub fn new(config: LengthConfig) -> Self {
        Self { config }
    }
}

impl Named for LengthHandler {
    fn name(&self) -> &str {
        "LengthHandler"
    }
}

impl SyncHandler for LengthHandler {
    /// Reports at most one failure: the minimum length is checked first.
    fn handle_sync(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
        let pwd = password.expose_secret();

        let length = pwd.encode_utf16().count();
        if length < self.config.min_length {
            return Ok(HandlerResult::fail(Failure::new(
                self.name(),
                "minLength",
                to_i64(self.config.min_length),
                to_i64(length),
            )));
        }

        let size = utf8_length(pwd);
        if size > self.config.max_byte_size {
            return Ok(HandlerResult::fail(Failure::new(
                self.name(),
                "maxByteSize",
                to_i64(self.config.max_byte_size),
                to_i64(size),
            )));
        }

        Ok(HandlerResult::ok(pass_through(password)))
    }
}

/// Byte length of `value` encoded as UTF-8, counted over its UTF-16 code
/// units. A high surrogate followed by a low surrogate is one 4-byte
/// scalar.
pub fn utf8_length(value: &str) -> usize {
    let mut len = 0;
    let mut units = value.encode_utf16().peekable();
    while let Some(unit) = units.next() {
        len += match unit {
            0..=0x7f => 1,
            0x80..=0x7ff => 2,
            _ if unit & 0xfc00 == 0xd800
                && units.peek().is_some_and(|next| next & 0xfc00 == 0xdc00) =>
            {
                units.next();
                4
            }
            _ => 3,
        };
    }
    len
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three wise monkeys: two UTF-16 units and four UTF-8 bytes each.
    const MONKEYS: &str = "\u{1F648}\u{1F649}\u{1F64A}";

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_string().into())
    }

    #[test]
    fn test_length_handler_valid_unicode() {
        // Registered sign is 2 bytes, ethiopic phwa 3 bytes and rocket 4 bytes.
        let pwd = "UnicodeWelcome: \u{00AE}\u{135A}\u{1F680}";
        let result = LengthHandler::default().handle_sync(&secret(pwd)).unwrap();
        assert_eq!(result.password().unwrap().expose_secret(), pwd);
    }

    #[test]
    fn test_length_handler_too_short() {
        let handler = LengthHandler::new(LengthConfig {
            min_length: 8,
            max_byte_size: 10,
        });
        let result = handler.handle_sync(&secret(MONKEYS)).unwrap();
        assert_eq!(
            result.failures().unwrap(),
            &[Failure::new("LengthHandler", "minLength", 8, 6)]
        );
    }

    #[test]
    fn test_length_handler_too_large() {
        let handler = LengthHandler::new(LengthConfig {
            min_length: 3,
            max_byte_size: 10,
        });
        let result = handler.handle_sync(&secret(MONKEYS)).unwrap();
        assert_eq!(
            result.failures().unwrap(),
            &[Failure::new("LengthHandler", "maxByteSize", 10, 12)]
        );
    }

    #[test]
    fn test_length_handler_exact_bounds() {
        let handler = LengthHandler::new(LengthConfig {
            min_length: 6,
            max_byte_size: 12,
        });
        let result = handler.handle_sync(&secret(MONKEYS)).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_length_handler_default_min_length() {
        let result = LengthHandler::default()
            .handle_sync(&secret("123456789"))
            .unwrap();
        assert_eq!(
            result.failures().unwrap(),
            &[Failure::new("LengthHandler", "minLength", 10, 9)]
        );
    }

    #[test]
    fn test_utf8_length() {
        assert_eq!(utf8_length(""), 0);
        assert_eq!(utf8_length("abc"), 3);
        assert_eq!(utf8_length("\u{00AE}"), 2);
        assert_eq!(utf8_length("\u{135A}"), 3);
        assert_eq!(utf8_length(MONKEYS), 12);
        let mixed = "UnicodeWelcome: \u{00AE}\u{135A}\u{1F680}";
        assert_eq!(utf8_length(mixed), mixed.len());
    }
}
