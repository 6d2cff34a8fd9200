//! # Subscribable callables (`Handler`)
//!
//! [`Handler<A>`] wraps a callable that receives the event payload `A`. It is
//! built from one of three shapes:
//!
//! | Shape                 | Owner                 | Constructors                                                |
//! |-----------------------|-----------------------|-------------------------------------------------------------|
//! | free function/closure | none (always alive)   | `function`, `async_function`, `async_function_with_cancel`  |
//! | method on `Arc<T>`    | `Weak<T>`             | `method`, `async_method`, `async_method_with_cancel`        |
//! | [`Subscribe`] object  | `Weak<S>`             | `subscriber`                                                |
//!
//! A `Handler` never holds its owner strongly: building one from `&Arc<T>`
//! leaves the strong count untouched. The owner is upgraded only while a single
//! invocation runs.
//!
//! ## Identity
//! `unsubscribe` removes records whose owner allocation and [`MethodId`] both
//! match. Pass the same function item (`Worker::on_tick`) or a clone of the
//! same closure value to remove a subscription; a freshly written closure never
//! matches an older one.
//!
//! Function pointers and boxed or `Arc`ed `dyn Fn` values have one type per
//! signature, so they all share a [`MethodId`] and unsubscribing one removes
//! the others bound to the same owner. Tag them with
//! [`Handler::with_method_id`] and a [`MethodId::keyed`] identity instead.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use weakevent::Handler;
//!
//! struct Worker;
//!
//! impl Worker {
//!     fn on_tick(&self, _n: u64) {}
//! }
//!
//! let worker = Arc::new(Worker);
//! let handler: Handler<u64> = Handler::method(&worker, Worker::on_tick);
//! assert!(handler.is_bound());
//! assert!(!handler.takes_cancellation());
//! assert_eq!(Arc::strong_count(&worker), 1);
//! ```

use std::fmt;
use std::future::{Future, ready};
use std::marker::PhantomData;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::handlers::identity::{MethodId, OwnerRef, PinnedOwner, downcast_owner};
use crate::handlers::output::HandlerOutput;
use crate::handlers::subscribe::Subscribe;

/// Future produced by one handler invocation.
pub type HandlerFuture = BoxFuture<'static, Result<(), HandlerError>>;

type PlainCall<A> = dyn Fn(Option<PinnedOwner>, A) -> HandlerFuture + Send + Sync;
type CancelCall<A> = dyn Fn(Option<PinnedOwner>, A, CancellationToken) -> HandlerFuture + Send + Sync;

/// Type-erased invocation, bound at subscribe time.
///
/// The variant records whether the callable declares a trailing cancellation parameter.
pub(crate) enum Invoker<A> {
    Plain(Arc<PlainCall<A>>),
    WithCancel(Arc<CancelCall<A>>),
}

impl<A> Clone for Invoker<A> {
    fn clone(&self) -> Self {
        match self {
            Invoker::Plain(call) => Invoker::Plain(Arc::clone(call)),
            Invoker::WithCancel(call) => Invoker::WithCancel(Arc::clone(call)),
        }
    }
}

impl<A> Invoker<A> {
    fn plain<G>(call: G) -> Self
    where
        G: Fn(Option<PinnedOwner>, A) -> HandlerFuture + Send + Sync + 'static,
    {
        Invoker::Plain(Arc::new(call))
    }

    fn with_cancel<G>(call: G) -> Self
    where
        G: Fn(Option<PinnedOwner>, A, CancellationToken) -> HandlerFuture + Send + Sync + 'static,
    {
        Invoker::WithCancel(Arc::new(call))
    }
}

pub(crate) fn completed() -> HandlerFuture {
    ready(Ok(())).boxed()
}

/// Marker type giving every `Subscribe` implementor its own method identity.
#[allow(dead_code)]
struct OnEvent<S>(PhantomData<fn(&S)>);

/// A callable that can be subscribed to a `WeakEvent<A>`.
pub struct Handler<A> {
    pub(crate) owner: Option<OwnerRef>,
    pub(crate) method: MethodId,
    pub(crate) invoker: Invoker<A>,
    pub(crate) label: &'static str,
}

impl<A> Handler<A> {
    /// Overrides the label used for this handler in log records.
    #[must_use]
    pub fn named(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Replaces the type-derived method identity, e.g. with [`MethodId::keyed`].
    ///
    /// Subscribe and unsubscribe with the same identity for them to match.
    #[must_use]
    pub fn with_method_id(mut self, method: MethodId) -> Self {
        self.method = method;
        self
    }

    /// Identity of the invoked function.
    pub fn method_id(&self) -> MethodId {
        self.method
    }

    /// Whether the callable receives the publish call's `CancellationToken`.
    pub fn takes_cancellation(&self) -> bool {
        matches!(self.invoker, Invoker::WithCancel(_))
    }

    /// Whether the handler is bound to an owner (`false` for free functions).
    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }

    fn unbound(method: MethodId, invoker: Invoker<A>) -> Self {
        Self {
            owner: None,
            method,
            invoker,
            label: method.name(),
        }
    }

    fn bound(owner: OwnerRef, method: MethodId, invoker: Invoker<A>) -> Self {
        Self {
            owner: Some(owner),
            method,
            invoker,
            label: method.name(),
        }
    }
}

impl<A: Send + 'static> Handler<A> {
    /// Free synchronous function or closure.
    pub fn function<F, R>(f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::sync_fn(MethodId::of::<F>(), f)
    }

    /// Free asynchronous function or closure.
    pub fn async_function<F, Fut>(f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self::async_fn(MethodId::of::<F>(), f)
    }

    /// Free asynchronous function whose last parameter is the publish call's token.
    pub fn async_function_with_cancel<F, Fut>(f: F) -> Self
    where
        F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self::async_fn_with_cancel(MethodId::of::<F>(), f)
    }

    /// Synchronous method on a weakly held owner.
    pub fn method<T, F, R>(owner: &Arc<T>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T, A) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::sync_method(owner, MethodId::of::<F>(), f)
    }

    /// Asynchronous method on a weakly held owner.
    ///
    /// The callable receives the pinned `Arc<T>`, which keeps the owner alive
    /// until the returned future completes.
    pub fn async_method<T, F, Fut>(owner: &Arc<T>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, A) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self::async_method_impl(owner, MethodId::of::<F>(), f)
    }

    /// Asynchronous method whose last parameter is the publish call's token.
    pub fn async_method_with_cancel<T, F, Fut>(owner: &Arc<T>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self::async_method_with_cancel_impl(owner, MethodId::of::<F>(), f)
    }

    /// Binds [`Subscribe::on_event`] of a weakly held subscriber object.
    pub fn subscriber<S>(owner: &Arc<S>) -> Self
    where
        S: Subscribe<A>,
    {
        let label = owner.name();
        let invoker = Invoker::with_cancel(|pinned, arg, cancel| {
            match downcast_owner::<S>(pinned) {
                Some(owner) => async move { owner.on_event(arg, cancel).await }.boxed(),
                None => completed(),
            }
        });
        Self::bound(OwnerRef::new(owner), MethodId::of::<OnEvent<S>>(), invoker).named(label)
    }

    pub(crate) fn sync_fn<F, R>(method: MethodId, f: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        let invoker = Invoker::plain(move |_, arg| ready(f(arg).into_result()).boxed());
        Self::unbound(method, invoker)
    }

    pub(crate) fn async_fn<F, Fut>(method: MethodId, f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        let invoker = Invoker::plain(move |_, arg| {
            let fut = f(arg);
            async move { fut.await.into_result() }.boxed()
        });
        Self::unbound(method, invoker)
    }

    pub(crate) fn async_fn_with_cancel<F, Fut>(method: MethodId, f: F) -> Self
    where
        F: Fn(A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        let invoker = Invoker::with_cancel(move |_, arg, cancel| {
            let fut = f(arg, cancel);
            async move { fut.await.into_result() }.boxed()
        });
        Self::unbound(method, invoker)
    }

    pub(crate) fn sync_method<T, F, R>(owner: &Arc<T>, method: MethodId, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T, A) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        let invoker = Invoker::plain(move |pinned, arg| match downcast_owner::<T>(pinned) {
            Some(owner) => ready(f(&*owner, arg).into_result()).boxed(),
            None => completed(),
        });
        Self::bound(OwnerRef::new(owner), method, invoker)
    }

    pub(crate) fn async_method_impl<T, F, Fut>(owner: &Arc<T>, method: MethodId, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, A) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        let invoker = Invoker::plain(move |pinned, arg| match downcast_owner::<T>(pinned) {
            Some(owner) => {
                let fut = f(owner, arg);
                async move { fut.await.into_result() }.boxed()
            }
            None => completed(),
        });
        Self::bound(OwnerRef::new(owner), method, invoker)
    }

    pub(crate) fn async_method_with_cancel_impl<T, F, Fut>(
        owner: &Arc<T>,
        method: MethodId,
        f: F,
    ) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, A, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        let invoker =
            Invoker::with_cancel(move |pinned, arg, cancel| match downcast_owner::<T>(pinned) {
                Some(owner) => {
                    let fut = f(owner, arg, cancel);
                    async move { fut.await.into_result() }.boxed()
                }
                None => completed(),
            });
        Self::bound(OwnerRef::new(owner), method, invoker)
    }
}

impl<A> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("label", &self.label)
            .field("method", &self.method)
            .field("bound", &self.is_bound())
            .field("takes_cancellation", &self.takes_cancellation())
            .finish()
    }
}

/// A handler argument that may be absent.
///
/// Implemented for [`Handler<A>`] and `Option<Handler<A>>`, so both
/// `event.subscribe(handler)` and `event.subscribe(None)` type-check; the latter
/// is rejected with `EventError::InvalidArgument`.
pub trait MaybeHandler<A> {
    /// Returns the handler, or `None` if absent.
    fn into_handler(self) -> Option<Handler<A>>;
}

impl<A> MaybeHandler<A> for Handler<A> {
    #[inline]
    fn into_handler(self) -> Option<Handler<A>> {
        Some(self)
    }
}

impl<A> MaybeHandler<A> for Option<Handler<A>> {
    #[inline]
    fn into_handler(self) -> Option<Handler<A>> {
        self
    }
}
