//! # weakevent
//!
//! **weakevent** is an in-process publish/subscribe primitive whose subscriber
//! list holds its handlers **weakly**.
//!
//! A handler bound to an `Arc`-owned object is dropped from the list once the
//! last `Arc` goes away, with no explicit unsubscribe. A long-lived publisher
//! therefore never keeps short-lived subscribers alive.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Handler::method(&arc, T::on_x)   Handler::function(f)   Handler::subscriber(&arc)
//!              │                            │                         │
//!              └────────────── subscribe ───┴─────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  WeakEvent<A>                                                     │
//! │  - SubscriberRegistry (RwLock<Vec<HandlerRecord>>, ordered)       │
//! │  - EventConfig (label, capacity, prune_on_count)                  │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼ publish(arg, cancel)
//!                       ┌────────────────────────┐
//!                       │       Dispatcher       │
//!                       │ prune → snapshot → run │
//!                       └───┬────────┬───────┬───┘
//!                           ▼        ▼       ▼
//!                        record1  record2  recordN   (sequential, awaited)
//!                           │
//!                           └─► pin Weak → call → unpin
//! ```
//!
//! ### Publish pass
//! ```text
//! publish(arg, cancel)
//!   ├─► cancelled?         ─► Err(Cancelled)
//!   ├─► prune dead records (brief write guard)
//!   ├─► snapshot live records (read guard, released)
//!   └─► for each record:
//!         ├─► cancelled?   ─► Err(Cancelled)
//!         ├─► owner gone?  ─► skip (no-op)
//!         ├─► invoke(arg.clone()).await
//!         └─► Err(e)       ─► Err(Handler(e))
//! ```
//!
//! ## Features
//! | Area            | Description                                                  | Key types / traits                    |
//! |-----------------|--------------------------------------------------------------|---------------------------------------|
//! | **Events**      | Publish to weakly held subscribers, with or without payload. | [`WeakEvent`], [`WeakSignal`]         |
//! | **Handlers**    | Sync, async and cancellation-aware callables and methods.    | [`Handler`], [`HandlerOutput`]        |
//! | **Subscribers** | Object-style subscribers bound through a `Weak`.             | [`Subscribe`]                         |
//! | **Errors**      | Typed errors; handler errors come back unchanged.            | [`EventError`], [`HandlerError`]      |
//! | **Configuration** | Per-event settings.                                        | [`EventConfig`]                       |
//!
//! ## Logging
//! The crate emits [`tracing`] records (`event`, `handler`, `pruned`, ... fields)
//! and never installs a subscriber; that is up to the application.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tokio_util::sync::CancellationToken;
//! use weakevent::{Handler, WeakEvent};
//!
//! struct Counter(AtomicUsize);
//!
//! impl Counter {
//!     fn on_tick(&self, n: usize) {
//!         self.0.fetch_add(n, Ordering::SeqCst);
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), weakevent::EventError> {
//!     let ticks = WeakEvent::<usize>::new();
//!     let counter = Arc::new(Counter(AtomicUsize::new(0)));
//!
//!     ticks.subscribe(Handler::method(&counter, Counter::on_tick))?;
//!     ticks.subscribe(Handler::async_function_with_cancel(
//!         |n: usize, cancel: CancellationToken| async move {
//!             if cancel.is_cancelled() || n > 100 {
//!                 return Err("tick out of range");
//!             }
//!             Ok(())
//!         },
//!     ))?;
//!
//!     ticks.publish(2).await?;
//!     assert_eq!(counter.0.load(Ordering::SeqCst), 2);
//!
//!     // Dropping the subscriber is enough: the next pass prunes it.
//!     drop(counter);
//!     ticks.publish(3).await?;
//!     assert_eq!(ticks.subscriber_count(), 1);
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use crate::core::EventConfig;
pub use error::{EventError, HandlerError};
pub use events::{WeakEvent, WeakSignal};
pub use handlers::{Handler, HandlerFuture, HandlerOutput, MaybeHandler, MethodId, Subscribe};
