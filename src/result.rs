//! Handler result envelope.
//!
//! Every stage returns a [`HandlerResult`]: either the (possibly transformed)
//! password or a non-empty list of [`Failure`] records.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;

/// One rejected rule of one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Name of the handler that produced the failure.
    pub handler: String,
    /// Sub-check that failed, e.g. `minLength`.
    pub rule: String,
    /// Value the rule expected (booleans are encoded as 0/1).
    pub expected: i64,
    /// Value that was measured.
    pub actual: i64,
}

impl Failure {
    pub fn new(
        handler: impl Into<String>,
        rule: impl Into<String>,
        expected: i64,
        actual: i64,
    ) -> Self {
        Self {
            handler: handler.into(),
            rule: rule.into(),
            expected,
            actual,
        }
    }

    /// Failure for a boolean rule that should not have matched.
    pub fn matched(handler: impl Into<String>, rule: impl Into<String>) -> Self {
        Self::new(handler, rule, 0, 1)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: rule {} failed (expected {}, actual {})",
            self.handler, self.rule, self.expected, self.actual
        )
    }
}

impl From<Failure> for Vec<Failure> {
    fn from(failure: Failure) -> Self {
        vec![failure]
    }
}

/// Misuse of a [`HandlerResult`] accessor.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidOperation {
    #[error("Invalid operation: cannot retrieve the password from a failed result")]
    PasswordOfFailure,
    #[error("Invalid operation: cannot retrieve failures from a successful result")]
    FailuresOfSuccess,
}

/// Outcome of a single handler invocation.
///
/// Build it with [`HandlerResult::ok`] or [`HandlerResult::fail`]. A failed
/// result always carries at least one [`Failure`]:
///
/// ```compile_fail
/// use pwd_pipeline::HandlerResult;
///
/// let empty = HandlerResult::Failure { failures: Vec::new() };
/// ```
#[derive(Debug)]
pub struct HandlerResult(Outcome);

#[derive(Debug)]
enum Outcome {
    Success(SecretString),
    Failure(Vec<Failure>),
}

impl HandlerResult {
    pub fn ok(password: SecretString) -> Self {
        HandlerResult(Outcome::Success(password))
    }

    /// Creates a failed result.
    ///
    /// # Panics
    ///
    /// Panics if `failures` is empty.
    pub fn fail(failures: impl Into<Vec<Failure>>) -> Self {
        let failures = failures.into();
        assert!(
            !failures.is_empty(),
            "a failed result needs at least one failure"
        );
        HandlerResult(Outcome::Failure(failures))
    }

    pub fn is_success(&self) -> bool {
        matches!(self.0, Outcome::Success(_))
    }

    /// Returns the password carried by a successful result.
    pub fn password(&self) -> Result<&SecretString, InvalidOperation> {
        match &self.0 {
            Outcome::Success(password) => Ok(password),
            Outcome::Failure(_) => Err(InvalidOperation::PasswordOfFailure),
        }
    }

    /// Returns the failures of a failed result, in insertion order.
    pub fn failures(&self) -> Result<&[Failure], InvalidOperation> {
        match &self.0 {
            Outcome::Failure(failures) => Ok(failures),
            Outcome::Success(_) => Err(InvalidOperation::FailuresOfSuccess),
        }
    }

    pub fn into_password(self) -> Result<SecretString, InvalidOperation> {
        self.into_outcome().map_err(|_| InvalidOperation::PasswordOfFailure)
    }

    pub fn into_failures(self) -> Result<Vec<Failure>, InvalidOperation> {
        match self.into_outcome() {
            Ok(_) => Err(InvalidOperation::FailuresOfSuccess),
            Err(failures) => Ok(failures),
        }
    }

    /// Splits the result into the password or its (non-empty) failures.
    pub(crate) fn into_outcome(self) -> Result<SecretString, Vec<Failure>> {
        match self.0 {
            Outcome::Success(password) => Ok(password),
            Outcome::Failure(failures) => Err(failures),
        }
    }
}

impl PartialEq for HandlerResult {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Outcome::Success(a), Outcome::Success(b)) => a.expose_secret() == b.expose_secret(),
            (Outcome::Failure(a), Outcome::Failure(b)) => a == b,
            _ => false,
        }
    }
}

/// Copies a password into a new secret, for stages that pass it through.
pub(crate) fn pass_through(password: &SecretString) -> SecretString {
    SecretString::new(password.expose_secret().to_owned().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_string().into())
    }

    #[test]
    fn test_ok_exposes_password() {
        let result = HandlerResult::ok(secret("MyPassword"));
        assert!(result.is_success());
        assert_eq!(result.password().unwrap().expose_secret(), "MyPassword");
    }

    #[test]
    fn test_ok_rejects_failures_access() {
        let result = HandlerResult::ok(secret("MyPassword"));
        assert_eq!(result.failures(), Err(InvalidOperation::FailuresOfSuccess));
    }

    #[test]
    fn test_fail_rejects_password_access() {
        let result = HandlerResult::fail(Failure::matched("Test", "rule"));
        assert!(!result.is_success());
        assert!(matches!(
            result.password(),
            Err(InvalidOperation::PasswordOfFailure)
        ));
        assert!(matches!(
            result.into_password(),
            Err(InvalidOperation::PasswordOfFailure)
        ));
    }

    #[test]
    fn test_fail_normalizes_single_failure() {
        let result = HandlerResult::fail(Failure::new("LengthHandler", "minLength", 8, 6));
        assert_eq!(
            result.failures().unwrap(),
            &[Failure::new("LengthHandler", "minLength", 8, 6)]
        );
    }

    #[test]
    fn test_fail_keeps_insertion_order() {
        let result = HandlerResult::fail(vec![
            Failure::matched("BlacklistHandler", "caseInsensitiveWords"),
            Failure::matched("BlacklistHandler", "regExps"),
        ]);
        let rules: Vec<_> = result
            .failures()
            .unwrap()
            .iter()
            .map(|f| f.rule.as_str())
            .collect();
        assert_eq!(rules, ["caseInsensitiveWords", "regExps"]);
    }

    #[test]
    fn test_into_failures() {
        let result = HandlerResult::fail(Failure::matched("Test", "rule"));
        assert_eq!(
            result.into_failures().unwrap(),
            vec![Failure::matched("Test", "rule")]
        );
        assert_eq!(
            HandlerResult::ok(secret("a")).into_failures(),
            Err(InvalidOperation::FailuresOfSuccess)
        );
    }

    #[test]
    fn test_into_outcome_never_yields_empty_failures() {
        let outcome = HandlerResult::fail(vec![Failure::matched("Test", "rule")]).into_outcome();
        assert!(matches!(outcome, Err(failures) if !failures.is_empty()));
    }

    #[test]
    #[should_panic(expected = "at least one failure")]
    fn test_fail_with_no_failures_panics() {
        let _ = HandlerResult::fail(Vec::new());
    }

    #[test]
    fn test_equality() {
        assert_eq!(HandlerResult::ok(secret("a")), HandlerResult::ok(secret("a")));
        assert_ne!(HandlerResult::ok(secret("a")), HandlerResult::ok(secret("b")));
        assert_ne!(
            HandlerResult::ok(secret("a")),
            HandlerResult::fail(Failure::matched("Test", "rule"))
        );
        assert_eq!(
            HandlerResult::fail(Failure::matched("Test", "rule")),
            HandlerResult::fail(Failure::matched("Test", "rule"))
        );
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure::new("LengthHandler", "maxByteSize", 10, 12);
        assert_eq!(
            failure.to_string(),
            "LengthHandler: rule maxByteSize failed (expected 10, actual 12)"
        );
    }
}
