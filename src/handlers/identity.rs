//! # Owner and method identity.
//!
//! A subscribed callable is identified by two things:
//! - **Owner**: the `Arc` allocation the callable is bound to (absent for free functions).
//!   It is held through [`OwnerRef`], a type-erased `Weak` that never keeps the owner alive.
//! - **Method**: [`MethodId`], the Rust type of the function item or closure.
//!
//! ## Rules
//! - Every function item and every closure definition has its own type, so
//!   `MethodId::of::<F>()` distinguishes `Foo::a` from `Foo::b`.
//! - Clones of one closure value share a type and therefore match each other.
//! - Two closures written separately never match, even if they capture equal state.
//! - Type-erased callables collapse to one identity per signature: every
//!   `fn(&Foo, u32)` pointer, every `fn(u32)` pointer and every
//!   `Box<dyn Fn(u32)>` / `Arc<dyn Fn(u32)>` share a `TypeId`. Give such
//!   handlers an explicit [`MethodId::keyed`] identity through
//!   `Handler::with_method_id`.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// Strong, type-erased handle to an owner, held only for one invocation.
pub(crate) type PinnedOwner = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum MethodKey {
    Type(TypeId),
    Keyed(&'static str),
}

/// Identity of the function a handler invokes.
#[derive(Clone, Copy)]
pub struct MethodId {
    key: MethodKey,
    name: &'static str,
}

impl MethodId {
    /// Returns the identity of the callable type `F`.
    #[must_use]
    pub fn of<F: 'static>() -> Self {
        Self {
            key: MethodKey::Type(TypeId::of::<F>()),
            name: type_name::<F>(),
        }
    }

    /// Caller-chosen identity; equal keys match, whatever the callable's type.
    ///
    /// A keyed identity never equals a type-derived one.
    #[must_use]
    pub const fn keyed(key: &'static str) -> Self {
        Self {
            key: MethodKey::Keyed(key),
            name: key,
        }
    }

    /// Type name of the callable, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for MethodId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for MethodId {}

impl Hash for MethodId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MethodId").field(&self.name).finish()
    }
}

/// Non-owning reference to the object a handler is bound to.
#[derive(Clone)]
pub(crate) struct OwnerRef(Weak<dyn Any + Send + Sync>);

impl OwnerRef {
    pub(crate) fn new<T: Any + Send + Sync>(owner: &Arc<T>) -> Self {
        let weak: Weak<T> = Arc::downgrade(owner);
        Self(weak)
    }

    /// O(1), no side effects.
    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Upgrades to a strong handle; `None` once the owner is gone.
    pub(crate) fn pin(&self) -> Option<PinnedOwner> {
        self.0.upgrade()
    }

    /// Same allocation, regardless of liveness.
    pub(crate) fn same_owner(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

/// Recovers the concrete owner type from a pinned handle.
pub(crate) fn downcast_owner<T: Any + Send + Sync>(pinned: Option<PinnedOwner>) -> Option<Arc<T>> {
    pinned.and_then(|owner| owner.downcast::<T>().ok())
}
