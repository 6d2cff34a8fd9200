//! # Dispatcher - one publish pass.
//!
//! ```text
//! publish(arg, cancel)
//!   ├─► cancel set?           ─► Err(Cancelled), registry untouched
//!   ├─► registry.prune_dead()    (brief write guard, only if something died)
//!   ├─► registry.snapshot()      (read guard, released before any handler runs)
//!   └─► for record in snapshot:
//!         ├─► cancel set?     ─► Err(Cancelled), remaining records skipped
//!         ├─► record.invoke(arg.clone(), cancel).await
//!         └─► Err(e)          ─► Err(Handler(e)), remaining records skipped
//! ```
//!
//! ## Rules
//! - Handlers run one at a time, in subscription order.
//! - Subscriptions added during the pass are not part of its snapshot.
//! - Records removed during the pass are still invoked from the snapshot.
//! - A failing handler stays subscribed; only dead owners are removed.

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::registry::SubscriberRegistry;
use crate::error::EventError;

/// Runs publish passes over a registry.
pub(crate) struct Dispatcher<'a, A> {
    registry: &'a SubscriberRegistry<A>,
    label: &'a str,
}

impl<'a, A: Clone + Send + 'static> Dispatcher<'a, A> {
    pub(crate) fn new(registry: &'a SubscriberRegistry<A>, label: &'a str) -> Self {
        Self { registry, label }
    }

    /// Invokes every live subscriber with a clone of `arg`.
    pub(crate) async fn publish(&self, arg: A, cancel: &CancellationToken) -> Result<(), EventError> {
        if cancel.is_cancelled() {
            debug!(event = self.label, "publish cancelled before start");
            return Err(EventError::Cancelled);
        }

        let pruned = self.registry.prune_dead();
        if pruned > 0 {
            debug!(event = self.label, pruned, "pruned dead subscribers");
        }

        let snapshot = self.registry.snapshot();
        trace!(event = self.label, subscribers = snapshot.len(), "publish pass started");

        for (position, record) in snapshot.into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(event = self.label, invoked = position, "publish cancelled mid-pass");
                return Err(EventError::Cancelled);
            }

            trace!(
                event = self.label,
                handler = record.label(),
                takes_cancellation = record.has_cancellation_parameter(),
                "invoking handler"
            );
            if let Err(error) = record.invoke(arg.clone(), cancel).await {
                debug!(
                    event = self.label,
                    handler = record.label(),
                    %error,
                    "handler failed; publish pass aborted"
                );
                return Err(EventError::Handler(error));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::handlers::Handler;
    use crate::handlers::record::HandlerRecord;

    type Log = Arc<Mutex<Vec<&'static str>>>;

    fn push(log: &Log, entry: &'static str) {
        log.lock().unwrap().push(entry);
    }

    fn registry_with(handlers: Vec<Handler<u8>>) -> SubscriberRegistry<u8> {
        let registry = SubscriberRegistry::new(None);
        for handler in handlers {
            registry.add(HandlerRecord::new(handler));
        }
        registry
    }

    #[tokio::test]
    async fn test_mixed_sync_and_async_handlers_run_in_order() {
        let log: Log = Arc::default();
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());

        let registry = registry_with(vec![
            Handler::async_function(move |_| {
                let log = l1.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    push(&log, "h1");
                }
            }),
            Handler::function(move |_| push(&l2, "h2")),
            Handler::async_function_with_cancel(move |_, _cancel| {
                let log = l3.clone();
                async move {
                    tokio::task::yield_now().await;
                    push(&log, "h3");
                }
            }),
        ]);

        Dispatcher::new(&registry, "test")
            .publish(0, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["h1", "h2", "h3"]);
    }

    #[tokio::test]
    async fn test_precancelled_publish_touches_nothing() {
        struct Owner;
        impl Owner {
            fn on_event(&self, _: u8) {}
        }

        let log: Log = Arc::default();
        let l1 = log.clone();
        let owner = Arc::new(Owner);
        let registry = registry_with(vec![
            Handler::function(move |_| push(&l1, "h1")),
            Handler::method(&owner, Owner::on_event),
        ]);
        drop(owner);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = Dispatcher::new(&registry, "test")
            .publish(1, &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(registry.len(), 2, "no pruning on a cancelled pass");
    }

    #[tokio::test]
    async fn test_cancellation_between_handlers_stops_the_pass() {
        let log: Log = Arc::default();
        let (l1, l2) = (log.clone(), log.clone());
        let registry = registry_with(vec![
            Handler::async_function_with_cancel(move |_, cancel: CancellationToken| {
                let log = l1.clone();
                async move {
                    push(&log, "h1");
                    cancel.cancel();
                }
            }),
            Handler::function(move |_| push(&l2, "h2")),
        ]);

        let err = Dispatcher::new(&registry, "test")
            .publish(1, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, EventError::Cancelled));
        assert_eq!(*log.lock().unwrap(), vec!["h1"]);
    }

    #[tokio::test]
    async fn test_handler_failure_aborts_pass_and_keeps_registry() {
        let log: Log = Arc::default();
        let (l1, l3) = (log.clone(), log.clone());
        let registry = registry_with(vec![
            Handler::function(move |_| push(&l1, "h1")),
            Handler::function(|x: u8| -> Result<(), String> { Err(format!("boom {x}")) }),
            Handler::function(move |_| push(&l3, "h3")),
        ]);

        let err = Dispatcher::new(&registry, "test")
            .publish(7, &CancellationToken::new())
            .await
            .unwrap_err();

        let original = err.into_handler_error().expect("handler error");
        assert_eq!(original.to_string(), "boom 7");
        assert_eq!(*log.lock().unwrap(), vec!["h1"]);
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_dead_records_are_pruned_before_the_pass() {
        struct Owner(Log);
        impl Owner {
            fn on_event(&self, _: u8) {
                push(&self.0, "owner");
            }
        }

        let log: Log = Arc::default();
        let owner = Arc::new(Owner(log.clone()));
        let registry = registry_with(vec![Handler::method(&owner, Owner::on_event)]);

        let dispatcher = Dispatcher::new(&registry, "test");
        dispatcher.publish(1, &CancellationToken::new()).await.unwrap();
        drop(owner);
        dispatcher.publish(2, &CancellationToken::new()).await.unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["owner"]);
        assert_eq!(registry.len(), 0);
    }
}
