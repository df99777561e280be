//! Reference-counted mutable cell for container values.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A shared, mutable container handle.
///
/// Lists, dictionaries, and blobs have reference semantics: assigning one to
/// a second variable aliases the same storage, and `add()` through either
/// name is visible through both. `Shared<T>` has a crate-private constructor,
/// so all shared allocations go through the factory methods on `Value`.
///
/// Evaluation is single-threaded, so `Rc<RefCell<T>>` suffices; no locking.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    /// Immutable access to the contents.
    ///
    /// # Panics
    ///
    /// Panics if the contents are already mutably borrowed. The evaluator
    /// never holds a mutable borrow across a nested evaluation, so this does
    /// not happen in practice.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutable access to the contents.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether two handles alias the same storage. This is the meaning of
    /// the `is` operator for containers.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for Shared<T> {
    /// Clones the handle, not the contents. Both clones alias one storage.
    #[inline]
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    /// Content equality, with an aliasing fast path.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || *self.0.borrow() == *other.0.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_aliases_storage() {
        let a = Shared::new(vec![1, 2, 3]);
        let b = a.clone();
        b.borrow_mut().push(4);
        assert_eq!(*a.borrow(), vec![1, 2, 3, 4]);
        assert!(Shared::ptr_eq(&a, &b));
    }

    #[test]
    fn separate_allocations_compare_by_content() {
        let a = Shared::new(String::from("hello"));
        let b = Shared::new(String::from("hello"));
        assert!(!Shared::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }
}
