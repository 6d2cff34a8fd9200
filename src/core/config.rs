//! # Event configuration.
//!
//! Provides [`EventConfig`], the per-event settings used by `WeakEvent::with_config`.
//!
//! ## Sentinel values
//! - `initial_capacity = 0` → no preallocation
//! - `prune_on_count = false` → `subscriber_count` is a read-only query

use std::borrow::Cow;

/// Configuration for a single weak event.
///
/// ## Field semantics
/// - `label`: value of the `event` field in log records
/// - `initial_capacity`: subscriber slots reserved up front (`0` = none)
/// - `prune_on_count`: let `subscriber_count` drop dead records as a side effect
///
/// ## Notes
/// All fields are public; prefer the helper accessors over checking sentinels inline.
#[derive(Clone, Debug)]
pub struct EventConfig {
    /// Name of the event in log records.
    pub label: Cow<'static, str>,

    /// Number of subscriber slots to reserve when the registry is created.
    ///
    /// - `0` = start empty, grow on demand
    pub initial_capacity: usize,

    /// Whether `subscriber_count` also prunes dead subscribers.
    ///
    /// - `false` = count is read-only; dead records are removed by the next publish
    /// - `true`  = count takes the write guard briefly when dead records exist
    pub prune_on_count: bool,
}

impl EventConfig {
    /// Creates the default configuration with a custom log label.
    #[must_use]
    pub fn labeled(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Returns the preallocation as an `Option`.
    ///
    /// - `None` → no preallocation
    /// - `Some(n)` → reserve `n` slots
    #[inline]
    pub fn capacity_hint(&self) -> Option<usize> {
        if self.initial_capacity == 0 {
            None
        } else {
            Some(self.initial_capacity)
        }
    }
}

impl Default for EventConfig {
    /// Default configuration:
    ///
    /// - `label = "weak_event"`
    /// - `initial_capacity = 0` (no preallocation)
    /// - `prune_on_count = false` (read-only count)
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("weak_event"),
            initial_capacity: 0,
            prune_on_count: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EventConfig::default();
        assert_eq!(cfg.label, "weak_event");
        assert_eq!(cfg.capacity_hint(), None);
        assert!(!cfg.prune_on_count);
    }

    #[test]
    fn test_labeled_keeps_other_defaults() {
        let cfg = EventConfig::labeled(format!("orders-{}", 7));
        assert_eq!(cfg.label, "orders-7");
        assert_eq!(cfg.initial_capacity, 0);
    }

    #[test]
    fn test_capacity_hint() {
        let cfg = EventConfig {
            initial_capacity: 16,
            ..EventConfig::default()
        };
        assert_eq!(cfg.capacity_hint(), Some(16));
    }
}
