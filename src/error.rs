//! Errors that abort a pipeline run.
//!
//! Rejected passwords are never errors: they are reported as
//! [`Failure`](crate::Failure) values. A [`HandlerError`] means a stage
//! could not do its job at all (bad configuration, unreachable lookup
//! service, a panicked blocking task) and it propagates out of
//! [`Pipeline::run`](crate::Pipeline::run) unrecovered.

use thiserror::Error;

#[cfg(feature = "bcrypt")]
use crate::handlers::BcryptError;
use crate::handlers::BlacklistError;
use crate::result::InvalidOperation;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Blacklist(#[from] BlacklistError),
    #[cfg(feature = "bcrypt")]
    #[error(transparent)]
    Bcrypt(#[from] BcryptError),
    #[error("Breach lookup failed: {0}")]
    Lookup(String),
    #[error("Blocking hash task failed: {0}")]
    Join(String),
    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperation),
    #[error("{0}")]
    Custom(String),
}

impl HandlerError {
    pub fn lookup(msg: impl Into<String>) -> Self {
        HandlerError::Lookup(msg.into())
    }

    pub fn custom(msg: impl Into<String>) -> Self {
        HandlerError::Custom(msg.into())
    }
}
