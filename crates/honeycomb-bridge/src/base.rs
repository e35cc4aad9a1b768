use std::ops::Deref;
use std::ptr::NonNull;

/// Reference-count operations shared by everything that can be held in a
/// [`RefPtr`]. The `ctocpp` wrappers implement this by forwarding to the
/// underlying C struct's function-pointer table; native library objects get
/// it from `Arc` on the other side of the boundary instead and never
/// implement this trait directly.
pub trait BaseRefCounted {
    fn add_ref(&self);
    /// Drops one reference. Returns true if the object was destroyed.
    fn release(&self) -> bool;
    fn has_one_ref(&self) -> bool;
    fn has_at_least_one_ref(&self) -> bool;
}

/// Owning smart pointer over a [`BaseRefCounted`] object. Holds exactly one
/// reference, added on construction or adopted, and released on drop.
pub struct RefPtr<T: ?Sized + BaseRefCounted> {
    ptr: NonNull<T>,
}

impl<T: ?Sized + BaseRefCounted> RefPtr<T> {
    /// Takes a new reference on `object`.
    pub fn new(object: &T) -> Self {
        object.add_ref();
        Self {
            ptr: NonNull::from(object),
        }
    }

    /// Adopts a reference the caller already holds.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object and the caller must transfer
    /// ownership of exactly one reference to it.
    pub unsafe fn from_existing(ptr: NonNull<T>) -> Self {
        Self { ptr }
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }
}

impl<T: ?Sized + BaseRefCounted> Deref for RefPtr<T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { self.ptr.as_ref() }
    }
}

impl<T: ?Sized + BaseRefCounted> Clone for RefPtr<T> {
    fn clone(&self) -> Self {
        self.deref().add_ref();
        Self { ptr: self.ptr }
    }
}

impl<T: ?Sized + BaseRefCounted> Drop for RefPtr<T> {
    fn drop(&mut self) {
        unsafe { self.ptr.as_ref() }.release();
    }
}
