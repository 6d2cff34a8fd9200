//! Weak event facades.
//!
//! ## Contents
//! - [`WeakEvent`] event carrying one payload argument
//! - [`WeakSignal`] event without a payload (`WeakEvent<()>`)

mod event;

pub use event::{WeakEvent, WeakSignal};
