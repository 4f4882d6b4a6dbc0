//! Handler contract shared by every pipeline stage.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::HandlerError;
use crate::pipeline::Statistics;
use crate::result::HandlerResult;

/// Stage identifier, used in failures and timing statistics.
pub trait Named {
    fn name(&self) -> &str;
}

/// A pipeline stage.
///
/// Given the current password, a handler either rejects it or returns the
/// password the next stage should see. Handlers must not keep state between
/// calls beyond their own configuration.
///
/// Synchronous checks should implement [`SyncHandler`] instead and get this
/// trait for free.
#[async_trait]
pub trait Handler: Named + Send + Sync {
    async fn handle(&self, password: &SecretString) -> Result<HandlerResult, HandlerError>;

    /// Runs [`handle`](Handler::handle), adding any timings the stage
    /// measures internally to `statistics`. Only composite stages such as a
    /// nested [`Pipeline`](crate::Pipeline) record anything.
    async fn handle_recorded(
        &self,
        password: &SecretString,
        _statistics: &mut Statistics,
    ) -> Result<HandlerResult, HandlerError> {
        self.handle(password).await
    }
}

/// A stage that completes without suspending.
pub trait SyncHandler: Named + Send + Sync {
    fn handle_sync(&self, password: &SecretString) -> Result<HandlerResult, HandlerError>;
}

#[async_trait]
impl<T: SyncHandler> Handler for T {
    async fn handle(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
        self.handle_sync(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::pass_through;
    use secrecy::ExposeSecret;

    struct Reverse;

    impl Named for Reverse {
        fn name(&self) -> &str {
            "Reverse"
        }
    }

    impl SyncHandler for Reverse {
        fn handle_sync(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
            let reversed: String = password.expose_secret().chars().rev().collect();
            Ok(HandlerResult::ok(SecretString::new(reversed.into())))
        }
    }

    struct Echo;

    impl Named for Echo {
        fn name(&self) -> &str {
            "Echo"
        }
    }

    #[async_trait]
    impl Handler for Echo {
        async fn handle(&self, password: &SecretString) -> Result<HandlerResult, HandlerError> {
            tokio::task::yield_now().await;
            Ok(HandlerResult::ok(pass_through(password)))
        }
    }

    #[tokio::test]
    async fn test_sync_handler_is_a_handler() {
        let handler: Box<dyn Handler> = Box::new(Reverse);
        let pwd = SecretString::new("abc".to_string().into());
        let result = handler.handle(&pwd).await.unwrap();
        assert_eq!(result.password().unwrap().expose_secret(), "cba");
        assert_eq!(handler.name(), "Reverse");
    }

    #[tokio::test]
    async fn test_async_handler() {
        let pwd = SecretString::new("abc".to_string().into());
        let result = Echo.handle(&pwd).await.unwrap();
        assert_eq!(result.password().unwrap().expose_secret(), "abc");
    }
}
