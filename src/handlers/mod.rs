//! # Handlers: what gets subscribed.
//!
//! This module provides the handler-related types:
//! - [`Handler`] - a callable bound to an optional weakly held owner
//! - [`MaybeHandler`] - a handler argument that may be absent
//! - [`Subscribe`] - trait for object-style subscribers
//! - [`HandlerOutput`] - accepted handler return values
//! - [`MethodId`] - identity of the invoked function
//!
//! Internally, `record` turns a `Handler` into the registry's `HandlerRecord`.

mod handler;
mod identity;
mod output;
pub(crate) mod record;
mod subscribe;
mod unit;

pub use handler::{Handler, HandlerFuture, MaybeHandler};
pub use identity::MethodId;
pub use output::HandlerOutput;
pub use subscribe::Subscribe;
