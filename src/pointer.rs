//! Pointer-width handles stored by `PtrArray` and used as `PtrDict` keys.
//!
//! Identity is the address of the pointee. Whether a container owns the
//! pointee is decided by the handle type: references and raw pointers
//! borrow, `Box` and `Rc` own.

use core::ptr::NonNull;
use std::rc::Rc;

pub trait Pointer {
    type Target;

    fn as_ptr(&self) -> *const Self::Target;

    #[inline]
    fn addr(&self) -> usize {
        self.as_ptr() as usize
    }
}

impl<'a, T> Pointer for &'a T {
    type Target = T;
    #[inline]
    fn as_ptr(&self) -> *const T {
        *self
    }
}

impl<'a, T> Pointer for &'a mut T {
    type Target = T;
    #[inline]
    fn as_ptr(&self) -> *const T {
        &**self
    }
}

impl<T> Pointer for *const T {
    type Target = T;
    #[inline]
    fn as_ptr(&self) -> *const T {
        *self
    }
}

impl<T> Pointer for *mut T {
    type Target = T;
    #[inline]
    fn as_ptr(&self) -> *const T {
        self.cast_const()
    }
}

impl<T> Pointer for NonNull<T> {
    type Target = T;
    #[inline]
    fn as_ptr(&self) -> *const T {
        NonNull::as_ptr(*self).cast_const()
    }
}

/// A `Box` of a zero-sized type does not allocate, so every such box
/// reports the same dangling address and they all share one identity.
impl<T> Pointer for Box<T> {
    type Target = T;
    #[inline]
    fn as_ptr(&self) -> *const T {
        &**self
    }
}

impl<T> Pointer for Rc<T> {
    type Target = T;
    #[inline]
    fn as_ptr(&self) -> *const T {
        Rc::as_ptr(self)
    }
}
