//! Event core: subscriber storage and publish passes.
//!
//! The only public API from this module is [`EventConfig`]; the rest is used by
//! the `WeakEvent` facade.
//!
//! Internal modules:
//! - [`registry`]: ordered, lock-protected list of subscriber records;
//! - [`dispatcher`]: prune, snapshot and sequential invocation for one publish call;
//! - [`config`]: per-event settings.
//!
//! ```text
//! subscribe/unsubscribe ──► SubscriberRegistry ◄── prune/snapshot ── Dispatcher ◄── publish
//!                                 │                                      │
//!                                 └── Vec<HandlerRecord> ── snapshot ──► invoke (one at a time)
//! ```

mod config;
mod dispatcher;
mod registry;

pub use config::EventConfig;
pub(crate) use dispatcher::Dispatcher;
pub(crate) use registry::SubscriberRegistry;
