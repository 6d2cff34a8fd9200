//! Error types used by weak events.
//!
//! - [`EventError`]: everything `subscribe`, `unsubscribe` and `publish` can fail with.
//! - [`HandlerError`]: the boxed error a subscribed handler returns.
//!
//! Like the other runtime errors, [`EventError`] provides `as_label`/`as_message`
//! helpers for logs and metrics.

use thiserror::Error;

/// Error returned by a subscribed handler.
///
/// The dispatcher never inspects or rewraps it: the same box comes back out of
/// `publish` inside [`EventError::Handler`].
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by a weak event.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EventError {
    /// A required argument was absent (e.g. `subscribe(None)`).
    ///
    /// Only raised by `subscribe` and `unsubscribe`, never by `publish`.
    #[error("invalid argument: `{param}` must not be absent")]
    InvalidArgument {
        /// Name of the offending parameter.
        param: &'static str,
    },

    /// The cancellation token passed to `publish` was observed as cancelled.
    ///
    /// Handlers already invoked in the same pass are not rolled back.
    #[error("publish cancelled")]
    Cancelled,

    /// A handler failed; the pass stopped at that handler.
    #[error("handler failed: {0}")]
    Handler(#[source] HandlerError),
}

impl EventError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use weakevent::EventError;
    ///
    /// assert_eq!(EventError::Cancelled.as_label(), "event_cancelled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EventError::InvalidArgument { .. } => "event_invalid_argument",
            EventError::Cancelled => "event_cancelled",
            EventError::Handler(_) => "event_handler_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EventError::InvalidArgument { param } => format!("absent argument: {param}"),
            EventError::Cancelled => "publish cancelled".to_string(),
            EventError::Handler(error) => format!("handler error: {error}"),
        }
    }

    /// Indicates whether the publish pass stopped because of cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EventError::Cancelled)
    }

    /// Returns the handler's own error, if this is [`EventError::Handler`].
    ///
    /// # Example
    /// ```
    /// use weakevent::{EventError, HandlerError};
    ///
    /// let original: HandlerError = "disk full".into();
    /// let err = EventError::Handler(original);
    /// assert_eq!(err.into_handler_error().unwrap().to_string(), "disk full");
    /// ```
    pub fn into_handler_error(self) -> Option<HandlerError> {
        match self {
            EventError::Handler(error) => Some(error),
            _ => None,
        }
    }
}
