//! # Object-style subscriber trait.
//!
//! Provides [`Subscribe`], an extension point for plugging whole objects into a
//! weak event instead of individual methods.
//!
//! The event holds the object through a `Weak`:
//! ```text
//! Arc<S> (owned by the application)
//!    ▲ upgrade per invocation
//!    │
//! WeakEvent ──► HandlerRecord { owner: Weak<S>, method: OnEvent<S> } ──► S::on_event(arg, cancel)
//! ```
//!
//! ## Rules
//! - Dropping the last `Arc<S>` unsubscribes the object on the next publish pass.
//! - `on_event` is awaited to completion before the next subscriber runs.
//! - Returning `Err` stops the publish pass; the error reaches the publisher unchanged.
//! - `Handler::subscriber(&s)` always matches an earlier `Handler::subscriber(&s)`
//!   for the same allocation, so `unsubscribe` needs no extra bookkeeping.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use weakevent::{Handler, HandlerError, Subscribe, WeakEvent};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe<String> for Audit {
//!     async fn on_event(&self, line: String, _cancel: CancellationToken) -> Result<(), HandlerError> {
//!         if line.is_empty() {
//!             return Err("empty audit line".into());
//!         }
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//! }
//!
//! let audit = Arc::new(Audit);
//! let lines: WeakEvent<String> = WeakEvent::new();
//! lines.subscribe(Handler::subscriber(&audit)).unwrap();
//! assert_eq!(lines.subscriber_count(), 1);
//! ```

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;

/// Event subscriber bound weakly to a `WeakEvent<A>`.
///
/// ### Implementation requirements
/// - Observe `cancel` in long-running work; the publisher may be waiting on you.
/// - Do not hold locks that `subscribe`/`unsubscribe` callers need across `.await`.
#[async_trait]
pub trait Subscribe<A: Send + 'static>: Send + Sync + 'static {
    /// Processes one published payload.
    ///
    /// `cancel` is the token passed to `publish_with_cancel` (never cancelled for plain `publish`).
    async fn on_event(&self, event: A, cancel: CancellationToken) -> Result<(), HandlerError>;

    /// Returns the subscriber name used in log records.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
