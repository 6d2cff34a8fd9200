//! Zero-argument constructors for `Handler<()>`, used with `WeakSignal`.
//!
//! Identity is taken from the caller's callable, not from the adapter closure,
//! so `Handler::action(f)` matches another `Handler::action(f)` for the same `f`.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::handlers::handler::Handler;
use crate::handlers::identity::MethodId;
use crate::handlers::output::HandlerOutput;

impl Handler<()> {
    /// Free synchronous function taking no payload.
    pub fn action<F, R>(f: F) -> Self
    where
        F: Fn() -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::sync_fn(MethodId::of::<F>(), move |()| f())
    }

    /// Free asynchronous function taking no payload.
    pub fn async_action<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self::async_fn(MethodId::of::<F>(), move |()| f())
    }

    /// Free asynchronous function taking only the publish call's token.
    pub fn async_action_with_cancel<F, Fut>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self::async_fn_with_cancel(MethodId::of::<F>(), move |(), cancel| f(cancel))
    }

    /// Synchronous method taking no payload.
    pub fn method_action<T, F, R>(owner: &Arc<T>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: HandlerOutput,
    {
        Self::sync_method(owner, MethodId::of::<F>(), move |owner: &T, ()| f(owner))
    }

    /// Asynchronous method taking no payload.
    pub fn async_method_action<T, F, Fut>(owner: &Arc<T>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self::async_method_impl(owner, MethodId::of::<F>(), move |owner, ()| f(owner))
    }

    /// Asynchronous method taking only the publish call's token.
    pub fn async_method_action_with_cancel<T, F, Fut>(owner: &Arc<T>, f: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(Arc<T>, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerOutput,
    {
        Self::async_method_with_cancel_impl(owner, MethodId::of::<F>(), move |owner, (), cancel| {
            f(owner, cancel)
        })
    }
}
