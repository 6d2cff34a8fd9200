//! # Weak event facade.
//!
//! [`WeakEvent<A>`] is the publisher-side object: it owns the subscriber
//! registry and exposes `subscribe` / `unsubscribe` / `publish` /
//! `subscriber_count`. [`WeakSignal`] is the zero-payload flavor.
//!
//! ## Rules
//! - `subscribe`, `unsubscribe` and `subscriber_count` are synchronous and never wait on a publish pass.
//! - `publish` runs one sequential pass (see the dispatcher diagram in `core`).
//! - Concurrent `publish` calls on the same event are not ordered with respect to each other.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use weakevent::{Handler, WeakEvent};
//!
//! struct Ledger(AtomicI64);
//!
//! impl Ledger {
//!     fn on_amount(&self, amount: i64) {
//!         self.0.fetch_add(amount, Ordering::SeqCst);
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), weakevent::EventError> {
//!     let amounts = WeakEvent::<i64>::new();
//!     let ledger = Arc::new(Ledger(AtomicI64::new(0)));
//!
//!     amounts.subscribe(Handler::method(&ledger, Ledger::on_amount))?;
//!     amounts.publish(40).await?;
//!     assert_eq!(ledger.0.load(Ordering::SeqCst), 40);
//!
//!     assert!(amounts.unsubscribe(Handler::method(&ledger, Ledger::on_amount))?);
//!     assert_eq!(amounts.subscriber_count(), 0);
//!     Ok(())
//! }
//! ```

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::{Dispatcher, EventConfig, SubscriberRegistry};
use crate::error::EventError;
use crate::handlers::MaybeHandler;
use crate::handlers::record::HandlerRecord;

/// Event with a single payload argument whose subscribers are held weakly.
pub struct WeakEvent<A> {
    registry: SubscriberRegistry<A>,
    config: EventConfig,
}

/// Event without a payload.
pub type WeakSignal = WeakEvent<()>;

impl<A: Clone + Send + 'static> WeakEvent<A> {
    /// Creates an event with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EventConfig::default())
    }

    /// Creates an event with the given configuration.
    #[must_use]
    pub fn with_config(config: EventConfig) -> Self {
        Self {
            registry: SubscriberRegistry::new(config.capacity_hint()),
            config,
        }
    }

    /// Returns the configuration this event was created with.
    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    /// Appends `handler` to the subscriber list.
    ///
    /// The same handler may be subscribed several times; it is then invoked once per registration.
    ///
    /// ### Errors
    /// [`EventError::InvalidArgument`] if `handler` is `None`; the list is left untouched.
    pub fn subscribe(&self, handler: impl MaybeHandler<A>) -> Result<(), EventError> {
        let handler = handler
            .into_handler()
            .ok_or(EventError::InvalidArgument { param: "handler" })?;

        trace!(event = %self.config.label, handler = handler.label, "subscribed");
        self.registry.add(HandlerRecord::new(handler));
        Ok(())
    }

    /// Removes every registration whose owner and method match `handler`.
    ///
    /// Returns `Ok(false)` if nothing matched, including handlers that were
    /// never subscribed or whose owner is already gone and pruned.
    ///
    /// ### Errors
    /// [`EventError::InvalidArgument`] if `handler` is `None`; the list is left untouched.
    pub fn unsubscribe(&self, handler: impl MaybeHandler<A>) -> Result<bool, EventError> {
        let handler = handler
            .into_handler()
            .ok_or(EventError::InvalidArgument { param: "handler" })?;

        let removed = self.registry.remove_all_matching(&handler);
        debug!(event = %self.config.label, handler = handler.label, removed, "unsubscribed");
        Ok(removed > 0)
    }

    /// Publishes `arg` to all live subscribers, one at a time, in subscription order.
    ///
    /// ### Errors
    /// The first handler error, as [`EventError::Handler`]; later handlers are skipped.
    pub async fn publish(&self, arg: A) -> Result<(), EventError> {
        self.publish_with_cancel(arg, &CancellationToken::new()).await
    }

    /// Like [`publish`](Self::publish), honoring `cancel` before the pass and before each handler.
    ///
    /// Handlers declaring a cancellation parameter receive a clone of `cancel`.
    ///
    /// ### Errors
    /// - [`EventError::Cancelled`] once `cancel` is observed set;
    /// - [`EventError::Handler`] with the first handler error.
    pub async fn publish_with_cancel(
        &self,
        arg: A,
        cancel: &CancellationToken,
    ) -> Result<(), EventError> {
        Dispatcher::new(&self.registry, &self.config.label)
            .publish(arg, cancel)
            .await
    }

    /// Number of subscribers whose owner is still alive.
    ///
    /// Advisory only: an owner may be dropped right after the count is taken.
    /// Prunes dead records as well when [`EventConfig::prune_on_count`] is set.
    pub fn subscriber_count(&self) -> usize {
        if self.config.prune_on_count {
            self.registry.prune_dead();
        }
        self.registry.count()
    }
}

impl WeakSignal {
    /// Publishes the signal; see [`publish`](WeakEvent::publish).
    pub async fn notify(&self) -> Result<(), EventError> {
        self.publish(()).await
    }

    /// Publishes the signal; see [`publish_with_cancel`](WeakEvent::publish_with_cancel).
    pub async fn notify_with_cancel(&self, cancel: &CancellationToken) -> Result<(), EventError> {
        self.publish_with_cancel((), cancel).await
    }
}

impl<A: Clone + Send + 'static> Default for WeakEvent<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for WeakEvent<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEvent")
            .field("label", &self.config.label)
            .field("records", &self.registry.len())
            .finish()
    }
}
