//! Password validation and pre-hashing pipeline
//!
//! A password passes through an ordered chain of handlers. Each handler
//! either rejects it with structured [`Failure`]s or hands a (possibly
//! transformed) password to the next one. Checks follow NIST 800-63B:
//! length bounds, blacklisted words and patterns, tokens of the user's
//! email address and breach corpus lookups. Hash stages pre-hash the
//! password before it leaves the client.
//!
//! # Features
//!
//! - `async` (default): runs slow hash stages on tokio's blocking pool
//! - `bcrypt` (default): enables [`BcryptHandler`]
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_BLACKLIST_PATH`: path used by [`load_wordlist`]
//!   (default: `./assets/blacklist.txt`)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_pipeline::{BlacklistConfig, EmailTokenConfig, LengthConfig, Pipeline};
//! use secrecy::SecretString;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new()
//!     .use_length(LengthConfig::default(), true)
//!     .use_blacklist(BlacklistConfig::new().with_words(["sqnfa", "password"]), true)
//!     .use_email_blacklist(&EmailTokenConfig::new("john-doe@example.com", 0, 3), false)?
//!     .use_sha512(false);
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let report = pipeline.run(&password).await?;
//!
//! println!("Accepted: {}", report.result.is_success());
//! println!("Took: {:?} ms", report.statistics.get(Pipeline::DEFAULT_NAME));
//! # Ok(())
//! # }
//! ```

// Internal modules
mod error;
mod handler;
mod handlers;
mod pipeline;
mod result;
mod wordlist;

// Public API
pub use error::HandlerError;
pub use handler::{Handler, Named, SyncHandler};
pub use handlers::*;
pub use pipeline::{Pipeline, PipelineReport, Statistics};
pub use result::{Failure, HandlerResult, InvalidOperation};
pub use wordlist::{
    WORDLIST_PATH_VAR, WordlistError, get_wordlist_path, load_wordlist, load_wordlist_from_path,
};

// Re-exported so handler implementations need no direct dependency.
pub use async_trait::async_trait;
