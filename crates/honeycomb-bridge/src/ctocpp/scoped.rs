use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr;

use honeycomb_capi::{honey_base_scoped_t, ScopedStruct};

use crate::shutdown_checker;
use crate::wrapper_types::WrapperType;

/// Per-interface description of a scoped ctocpp wrapper class. Implementors
/// are field-less forwarder types, same as the ref-counted family.
pub trait CToCppScopedClass: Sized + 'static {
    type Interface: ?Sized + 'static;
    type CStruct: ScopedStruct + 'static;

    const WRAPPER_TYPE: WrapperType;

    /// Creates the forwarder embedded in a freshly built wrapper record.
    ///
    /// # Safety
    ///
    /// The returned value is only valid as the final field of a
    /// [`CToCppScoped`] record; forwarder methods recover the record from
    /// their own address. Only the wrapper family calls this.
    unsafe fn new_forwarder() -> Self;
}

/// Owning adapter around a foreign scoped struct.
///
/// Holds the struct pointer until dropped; the drop calls the struct's `del`
/// if the other side set one (meaning ownership of the underlying object
/// traveled with the struct). Dereferences to the forwarder, whose trait
/// impl calls through the struct's function-pointer table.
#[repr(C)]
pub struct CToCppScoped<C: CToCppScopedClass> {
    class: WrapperType,
    // Null once ownership was passed back through unwrap_own.
    struct_: *mut C::CStruct,
    wrapper: C,
}

impl<C: CToCppScopedClass> CToCppScoped<C> {
    /// Wraps a struct received from the other side. Whether the underlying
    /// object is owned or merely borrowed is encoded in the struct's `del`
    /// member and honored on drop.
    ///
    /// # Safety
    ///
    /// `s` must be null or a live struct that stays valid for the wrapper's
    /// lifetime.
    pub unsafe fn wrap(s: *mut C::CStruct) -> Option<Box<Self>> {
        if s.is_null() {
            return None;
        }
        shutdown_checker::assert_not_shutdown();
        Some(Box::new(Self {
            class: C::WRAPPER_TYPE,
            struct_: s,
            wrapper: C::new_forwarder(),
        }))
    }

    /// Sends ownership back across the boundary: detaches and returns the
    /// struct, destroying the wrapper without invoking `del`.
    pub fn unwrap_own(mut wrapper: Box<Self>) -> *mut C::CStruct {
        debug_assert_eq!(wrapper.class, C::WRAPPER_TYPE);
        let s = wrapper.struct_;
        #[cfg(debug_assertions)]
        if !s.is_null() {
            // Ownership can only travel back if it traveled here.
            let base = s.cast::<honey_base_scoped_t>();
            debug_assert!(unsafe { (*base).del }.is_some(), "unwrap_own on a borrowed struct");
        }
        wrapper.struct_ = ptr::null_mut();
        s
    }

    /// The wrapped struct, without any ownership transfer. For passing the
    /// object back as a borrowed argument.
    pub fn unwrap_raw(wrapper: &Self) -> *mut C::CStruct {
        wrapper.struct_
    }

    /// The wrapped struct, for forwarder method bodies.
    pub fn get_struct(forwarder: &C) -> *mut C::CStruct {
        unsafe {
            let wrapper = Self::wrapper_from_forwarder(forwarder);
            debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
            (*wrapper).struct_
        }
    }

    unsafe fn wrapper_from_forwarder(forwarder: &C) -> *mut Self {
        let offset = mem::size_of::<Self>() - mem::size_of::<C>();
        debug_assert_eq!(offset, mem::offset_of!(Self, wrapper));
        (forwarder as *const C as *const u8).sub(offset) as *mut Self
    }
}

impl<C: CToCppScopedClass> Deref for CToCppScoped<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.wrapper
    }
}

impl<C: CToCppScopedClass> DerefMut for CToCppScoped<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.wrapper
    }
}

impl<C: CToCppScopedClass> Drop for CToCppScoped<C> {
    fn drop(&mut self) {
        shutdown_checker::assert_not_shutdown();
        if self.struct_.is_null() {
            return;
        }
        let base = self.struct_.cast::<honey_base_scoped_t>();
        // del is only set when ownership traveled with the struct.
        unsafe {
            if let Some(del) = (*base).del {
                del(base);
            }
        }
    }
}
