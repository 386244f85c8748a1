//! Identity-compared tokens for warning payloads and origins.
//!
//! The warning core never looks inside a payload or an origin. Both are held
//! as `Opaque` tokens: a shared, type-erased object whose equality and hash
//! follow the allocation, not the contents. Two tokens built from equal
//! strings are different tokens; a cloned token is the same one.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An object that can live behind an [`Opaque`] token.
///
/// Implemented for every `Display + Debug + Send + Sync + 'static` type, so
/// callers never implement it by hand.
pub trait OpaqueObject: fmt::Display + fmt::Debug + Send + Sync + 'static {
    /// Upcast used by [`Opaque::downcast_ref`].
    fn as_any(&self) -> &dyn Any;
}

impl<T> OpaqueObject for T
where
    T: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shared, immutable, identity-compared handle to an arbitrary object.
#[derive(Clone)]
pub struct Opaque(Arc<dyn OpaqueObject>);

impl Opaque {
    /// Allocate a new token. Every call produces a distinct identity.
    pub fn new<T: OpaqueObject>(object: T) -> Self {
        Opaque(Arc::new(object))
    }

    /// Borrow the wrapped object as `T`, if that is its concrete type.
    pub fn downcast_ref<T: OpaqueObject>(&self) -> Option<&T> {
        // Deref first: `Arc<dyn OpaqueObject>` is itself an `OpaqueObject`.
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// Whether both tokens refer to the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }

    /// Borrow the wrapped object.
    pub fn object(&self) -> &dyn OpaqueObject {
        &*self.0
    }

    #[inline]
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Opaque {}

impl Hash for Opaque {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.addr(), state);
    }
}

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests;
