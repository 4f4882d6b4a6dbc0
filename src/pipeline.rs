//! Pipeline engine - runs handlers in registration order.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::HandlerError;
use crate::handler::{Handler, Named};
#[cfg(feature = "bcrypt")]
use crate::handlers::{BcryptConfig, BcryptError, BcryptHandler};
use crate::handlers::{
    BlacklistConfig, BlacklistError, BlacklistHandler, EmailTokenConfig, LengthConfig,
    LengthHandler, PwnedHandler, RangeClient, RegexConfig, RegexHandler, Sha512Handler,
};
use crate::result::{HandlerResult, pass_through};

struct Stage {
    handler: Box<dyn Handler>,
    stop_on_failure: bool,
}

/// Elapsed whole milliseconds per handler name, plus the pipeline's own total.
///
/// Timings of a nested pipeline's stages land in the same map as the outer
/// stages; on a name clash the later entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    elapsed: HashMap<String, u64>,
}

impl Statistics {
    fn record(&mut self, name: &str, elapsed: Duration) {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.elapsed.insert(name.to_string(), millis);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.elapsed.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.elapsed.iter().map(|(name, ms)| (name.as_str(), *ms))
    }

    pub fn len(&self) -> usize {
        self.elapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elapsed.is_empty()
    }
}

/// Result of one [`Pipeline::run`].
#[derive(Debug)]
pub struct PipelineReport {
    pub result: HandlerResult,
    pub statistics: Statistics,
}

/// An ordered chain of handlers.
///
/// Each stage sees the password returned by the last successful stage.
/// Failures accumulate across stages; a stage registered with
/// `stop_on_failure` ends the run once any failure has been recorded up to
/// and including that stage.
///
/// # Example
///
/// ```rust,no_run
/// use pwd_pipeline::{BlacklistConfig, LengthConfig, Pipeline};
/// use secrecy::SecretString;
///
/// # async fn run() -> Result<(), pwd_pipeline::HandlerError> {
/// let pipeline = Pipeline::new()
///     .use_length(LengthConfig::default(), true)
///     .use_blacklist(BlacklistConfig::new().with_words(["password"]), false)
///     .use_sha512(false);
///
/// let password = SecretString::new("correct-horse-battery-staple".to_string().into());
/// let report = pipeline.run(&password).await?;
/// match report.result.failures() {
///     Ok(failures) => failures.iter().for_each(|failure| println!("{failure}")),
///     Err(_) => println!("accepted"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    name: String,
    stages: Vec<Stage>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub const DEFAULT_NAME: &'static str = "Pipeline";

    pub fn new() -> Self {
        Self::with_name(Self::DEFAULT_NAME)
    }

    /// Named pipelines report their total time under `name`, which matters
    /// when pipelines are nested.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Appends any handler, synchronous or not.
    pub fn use_handler<H: Handler + 'static>(mut self, handler: H, stop_on_failure: bool) -> Self {
        self.stages.push(Stage {
            handler: Box::new(handler),
            stop_on_failure,
        });
        self
    }

    pub fn use_length(self, config: LengthConfig, stop_on_failure: bool) -> Self {
        self.use_handler(LengthHandler::new(config), stop_on_failure)
    }

    pub fn use_blacklist(self, config: BlacklistConfig, stop_on_failure: bool) -> Self {
        self.use_handler(BlacklistHandler::new(config), stop_on_failure)
    }

    pub fn use_email_blacklist(
        self,
        config: &EmailTokenConfig,
        stop_on_failure: bool,
    ) -> Result<Self, BlacklistError> {
        Ok(self.use_handler(BlacklistHandler::from_email(config)?, stop_on_failure))
    }

    pub fn use_regex(self, config: RegexConfig, stop_on_failure: bool) -> Self {
        self.use_handler(RegexHandler::new(config), stop_on_failure)
    }

    pub fn use_pwned<C: RangeClient + 'static>(self, client: C, stop_on_failure: bool) -> Self {
        self.use_handler(PwnedHandler::new(client), stop_on_failure)
    }

    pub fn use_sha512(self, stop_on_failure: bool) -> Self {
        self.use_handler(Sha512Handler::new(), stop_on_failure)
    }

    #[cfg(feature = "bcrypt")]
    pub fn use_bcrypt(
        self,
        config: &BcryptConfig,
        stop_on_failure: bool,
    ) -> Result<Self, BcryptError> {
        Ok(self.use_handler(BcryptHandler::new(config)?, stop_on_failure))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage in order and returns the outcome with its timings.
    ///
    /// # Errors
    ///
    /// A [`HandlerError`] from any stage aborts the run.
    pub async fn run(&self, password: &SecretString) -> Result<PipelineReport, HandlerError> {
        let mut statistics = Statistics::default();
        let result = self.run_recorded(password, &mut statistics).await?;
        Ok(PipelineReport { result, statistics })
    }

    async fn run_recorded(
        &self,
        password: &SecretString,
        statistics: &mut Statistics,
    ) -> Result<HandlerResult, HandlerError> {
        let started = Instant::now();
        let mut failures = Vec::new();
        let mut current: Option<SecretString> = None;

        for stage in &self.stages {
            let name = stage.handler.name();
            let input = current.as_ref().unwrap_or(password);

            let stage_started = Instant::now();
            let result = match stage.handler.handle_recorded(input, statistics).await {
                Ok(result) => result,
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!("{}: stage {} aborted the run: {}", self.name, name, e);
                    return Err(e);
                }
            };
            statistics.record(name, stage_started.elapsed());

            match result.into_outcome() {
                Ok(password) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("{}: stage {} passed", self.name, name);
                    current = Some(password);
                }
                Err(stage_failures) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "{}: stage {} reported {} failures",
                        self.name,
                        name,
                        stage_failures.len()
                    );
                    failures.extend(stage_failures);
                }
            }

            if stage.stop_on_failure && !failures.is_empty() {
                #[cfg(feature = "tracing")]
                tracing::warn!("{}: stopping after stage {}", self.name, name);
                break;
            }
        }

        statistics.record(&self.name, started.elapsed());

        #[cfg(feature = "tracing")]
        tracing::info!(
            "{}: finished in {} ms with {} failures",
            self.name,
            statistics.get(&self.name).unwrap_or_default(),
            failures.len()
        );

        if failures.is_empty() {
            Ok(HandlerResult::ok(
                current.unwrap_or_else(|| pass_through(password)),
            ))
        } else {
            Ok(HandlerResult::fail(failures))
        }
    }
}

impl Named for Pipeline {
    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Handler for Pipeline {
    async fn handle(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
        Ok(self.run(password).await?.result)
    }

    async fn handle_recorded(
        &self,
        password: &SecretString,
        statistics: &mut Statistics,
    ) -> Result<HandlerResult, HandlerError> {
        self.run_recorded(password, statistics).await
    }
}
