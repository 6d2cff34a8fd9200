//! # Handler return values.
//!
//! A handler may return `()` (it cannot fail) or `Result<(), E>` for any error
//! convertible into [`HandlerError`]. Async handlers follow the same rule for
//! their future's output.

use crate::error::HandlerError;

/// Converts a handler's return value into the dispatcher's result type.
pub trait HandlerOutput {
    /// Returns `Ok(())` or the handler's error, unchanged apart from boxing.
    fn into_result(self) -> Result<(), HandlerError>;
}

impl HandlerOutput for () {
    #[inline]
    fn into_result(self) -> Result<(), HandlerError> {
        Ok(())
    }
}

impl<E> HandlerOutput for Result<(), E>
where
    E: Into<HandlerError>,
{
    #[inline]
    fn into_result(self) -> Result<(), HandlerError> {
        self.map_err(Into::into)
    }
}
