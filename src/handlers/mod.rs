//! Built-in pipeline stages
//!
//! Checks (length, blacklist, patterns, breach corpus) pass the password
//! through unchanged; hash stages replace it.

mod blacklist;
mod digest;
mod email;
mod length;
mod pattern;
mod pwned;
#[cfg(feature = "bcrypt")]
mod slow_hash;

pub use blacklist::{BlacklistConfig, BlacklistError, BlacklistHandler};
pub use digest::{PREHASH_LENGTH, Sha512Handler};
pub use email::{EmailTokenConfig, email_tokens};
pub use length::{LengthConfig, LengthHandler, utf8_length};
pub use pattern::{RegexConfig, RegexHandler};
pub use pwned::{PREFIX_LENGTH, PwnedHandler, RangeClient, RangeEntry, parse_range_response};
#[cfg(feature = "bcrypt")]
pub use slow_hash::{BcryptConfig, BcryptError, BcryptHandler};
