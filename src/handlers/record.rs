//! # Subscriber record.
//!
//! [`HandlerRecord`] is what the registry stores for one subscription: the weak
//! owner, the method identity and the type-erased invoker.
//!
//! ## Invocation
//! ```text
//! invoke(arg, cancel)
//!   ├─► owner present? ── pin (Weak::upgrade)
//!   │                        ├─ failed  ─► completed Ok(()), nothing called
//!   │                        └─ pinned  ─► owner lives until the future completes
//!   ├─► Plain      ─► call(owner, arg)
//!   └─► WithCancel ─► call(owner, arg, cancel.clone())
//! ```

use tokio_util::sync::CancellationToken;

use crate::handlers::handler::{Handler, HandlerFuture, Invoker, completed};
use crate::handlers::identity::{MethodId, OwnerRef};

/// One subscription held by the registry.
pub(crate) struct HandlerRecord<A> {
    owner: Option<OwnerRef>,
    method: MethodId,
    invoker: Invoker<A>,
    label: &'static str,
}

impl<A> Clone for HandlerRecord<A> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner.clone(),
            method: self.method,
            invoker: self.invoker.clone(),
            label: self.label,
        }
    }
}

impl<A> HandlerRecord<A> {
    pub(crate) fn new(handler: Handler<A>) -> Self {
        Self {
            owner: handler.owner,
            method: handler.method,
            invoker: handler.invoker,
            label: handler.label,
        }
    }

    /// Free functions are always alive.
    pub(crate) fn is_alive(&self) -> bool {
        self.owner.as_ref().is_none_or(OwnerRef::is_alive)
    }

    pub(crate) fn has_cancellation_parameter(&self) -> bool {
        matches!(self.invoker, Invoker::WithCancel(_))
    }

    pub(crate) fn label(&self) -> &'static str {
        self.label
    }

    /// Pins the owner, then calls the method with it.
    pub(crate) fn invoke(&self, arg: A, cancel: &CancellationToken) -> HandlerFuture {
        let pinned = match &self.owner {
            Some(owner) => match owner.pin() {
                Some(pinned) => Some(pinned),
                None => return completed(),
            },
            None => None,
        };

        match &self.invoker {
            Invoker::Plain(call) => call(pinned, arg),
            Invoker::WithCancel(call) => call(pinned, arg, cancel.clone()),
        }
    }

    /// Owner identity and method identity must both match.
    pub(crate) fn matches(&self, candidate: &Handler<A>) -> bool {
        let same_owner = match (&self.owner, &candidate.owner) {
            (None, None) => true,
            (Some(ours), Some(theirs)) => ours.same_owner(theirs),
            _ => false,
        };
        same_owner && self.method == candidate.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::error::HandlerError;

    #[derive(Default)]
    struct Subscriber {
        last_received: Mutex<String>,
        throw_if_invoked: bool,
    }

    impl Subscriber {
        fn instance_handler(&self, data: String) -> Result<(), HandlerError> {
            if self.throw_if_invoked {
                return Err("this should not happen".into());
            }
            *self.last_received.lock().unwrap() = data;
            Ok(())
        }

        fn other_handler(&self, _data: String) {}

        async fn async_handler(self: Arc<Self>, data: String) -> Result<(), HandlerError> {
            tokio::task::yield_now().await;
            self.instance_handler(data)
        }

        fn last(&self) -> String {
            self.last_received.lock().unwrap().clone()
        }
    }

    static STATIC_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn static_handler(data: String) {
        assert_eq!(data, "static");
        STATIC_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    fn never() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn test_static_handler_is_always_alive_and_invoked() {
        let record = HandlerRecord::new(Handler::function(static_handler));
        assert!(record.is_alive());

        record.invoke("static".to_string(), &never()).await.unwrap();
        assert_eq!(STATIC_CALLS.load(Ordering::SeqCst), 1);
        assert!(record.is_alive());
    }

    #[tokio::test]
    async fn test_instance_handler_sync() {
        let subscriber = Arc::new(Subscriber::default());
        let record = HandlerRecord::new(Handler::method(&subscriber, Subscriber::instance_handler));

        record.invoke("instance".to_string(), &never()).await.unwrap();
        assert_eq!(subscriber.last(), "instance");
        assert!(record.is_alive());
    }

    #[tokio::test]
    async fn test_instance_handler_async() {
        let subscriber = Arc::new(Subscriber::default());
        let record =
            HandlerRecord::new(Handler::async_method(&subscriber, Subscriber::async_handler));

        record.invoke("async".to_string(), &never()).await.unwrap();
        assert_eq!(subscriber.last(), "async");
        assert_eq!(Arc::strong_count(&subscriber), 1);
    }

    #[tokio::test]
    async fn test_dead_instance_is_not_invoked() {
        let record = {
            let subscriber = Arc::new(Subscriber {
                throw_if_invoked: true,
                ..Subscriber::default()
            });
            HandlerRecord::new(Handler::method(&subscriber, Subscriber::instance_handler))
        };

        assert!(!record.is_alive());
        record
            .invoke("should not be received".to_string(), &never())
            .await
            .expect("invoking a dead record is a no-op");
    }

    #[tokio::test]
    async fn test_handler_error_is_returned_unchanged() {
        let subscriber = Arc::new(Subscriber {
            throw_if_invoked: true,
            ..Subscriber::default()
        });
        let record = HandlerRecord::new(Handler::method(&subscriber, Subscriber::instance_handler));

        let err = record.invoke("x".to_string(), &never()).await.unwrap_err();
        assert_eq!(err.to_string(), "this should not happen");
    }

    #[test]
    fn test_matches_same_owner_and_method() {
        let subscriber = Arc::new(Subscriber::default());
        let record = HandlerRecord::new(Handler::method(&subscriber, Subscriber::instance_handler));

        assert!(record.matches(&Handler::method(&subscriber, Subscriber::instance_handler)));
        assert!(!record.matches(&Handler::method(&subscriber, Subscriber::other_handler)));
        assert!(!record.matches(&Handler::function(static_handler)));
    }

    #[test]
    fn test_matches_rejects_other_owner() {
        let first = Arc::new(Subscriber::default());
        let second = Arc::new(Subscriber::default());
        let record = HandlerRecord::new(Handler::method(&first, Subscriber::instance_handler));

        assert!(!record.matches(&Handler::method(&second, Subscriber::instance_handler)));
    }

    #[test]
    fn test_matches_free_functions() {
        let record = HandlerRecord::new(Handler::function(static_handler));
        assert!(record.matches(&Handler::function(static_handler)));

        let subscriber = Arc::new(Subscriber::default());
        assert!(!record.matches(&Handler::method(&subscriber, Subscriber::other_handler)));
    }

    #[tokio::test]
    async fn test_cancellation_parameter_is_passed_only_when_declared() {
        let seen = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        token.cancel();

        let seen_by_handler = seen.clone();
        let with_cancel = HandlerRecord::new(Handler::async_function_with_cancel(
            move |_: u8, cancel: CancellationToken| {
                let seen = seen_by_handler.clone();
                async move {
                    if cancel.is_cancelled() {
                        seen.fetch_add(1, Ordering::SeqCst);
                    }
                }
            },
        ));
        let plain = HandlerRecord::new(Handler::async_function(|_: u8| async {}));

        assert!(with_cancel.has_cancellation_parameter());
        assert!(!plain.has_cancellation_parameter());

        with_cancel.invoke(1, &token).await.unwrap();
        plain.invoke(1, &token).await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
