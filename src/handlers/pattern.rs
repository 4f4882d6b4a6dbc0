//! Pattern handler - rejects passwords matching banned regular expressions.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use super::blacklist::{BlacklistError, matches_any};
use crate::error::HandlerError;
use crate::handler::{Named, SyncHandler};
use crate::result::{Failure, HandlerResult, pass_through};

#[derive(Debug, Clone, Default)]
pub struct RegexConfig {
    pub patterns: Vec<Regex>,
}

impl RegexConfig {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    pub fn parse(patterns: &[&str]) -> Result<Self, BlacklistError> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

/// Pattern-only blacklist, for service-specific words that need more than
/// a case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct RegexHandler {
    config: RegexConfig,
}

impl RegexHandler {
    pub fn new(config: RegexConfig) -> Self {
        Self { config }
    }
}

impl Named for RegexHandler {
    fn name(&self) -> &str {
        "RegexHandler"
    }
}

impl SyncHandler for RegexHandler {
    fn handle_sync(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
        if matches_any(&self.config.patterns, password.expose_secret()) {
            return Ok(HandlerResult::fail(Failure::matched(self.name(), "regExps")));
        }
        Ok(HandlerResult::ok(pass_through(password)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_string().into())
    }

    #[test]
    fn test_regex_allows_valid_password() {
        let config = RegexConfig::parse(&["(?i)tr[o0]ub[a4]dor[u&][r3]"]).unwrap();
        let handler = RegexHandler::new(config);
        let result = handler.handle_sync(&secret("MyPassword")).unwrap();
        assert_eq!(result.password().unwrap().expose_secret(), "MyPassword");
    }

    #[test]
    fn test_regex_without_patterns() {
        let result = RegexHandler::default()
            .handle_sync(&secret("MyPassword"))
            .unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn test_regex_rejects_pattern() {
        let config = RegexConfig::parse(&["(?i)tr[o0]ub[a4]dor[u&][r3]"]).unwrap();
        let handler = RegexHandler::new(config);
        let result = handler.handle_sync(&secret("TR0UB4DOR&3")).unwrap();
        assert_eq!(
            result.failures().unwrap(),
            &[Failure::new("RegexHandler", "regExps", 0, 1)]
        );
    }
}
