use std::mem;
use std::ptr;
use std::ptr::NonNull;

use honeycomb_capi::{honey_base_ref_counted_t, RefCountedStruct};

use crate::base::{BaseRefCounted, RefPtr};
use crate::ref_count::RefCount;
use crate::wrapper_types::WrapperType;
use crate::{registry, shutdown_checker};

/// Per-interface description of a ref-counted ctocpp wrapper class.
///
/// Implementors are field-less forwarder types: the wrapper record embeds an
/// instance as its final field, and a reference to it doubles as the trait
/// object handed to Rust callers. The forwarder's trait impl translates each
/// method into a call through the wrapped struct's function-pointer table.
pub trait CToCppRefCountedClass: Sized + 'static {
    type Interface: ?Sized + 'static;
    type CStruct: RefCountedStruct + 'static;

    const WRAPPER_TYPE: WrapperType;

    /// Creates the forwarder embedded in a freshly built wrapper record.
    ///
    /// # Safety
    ///
    /// The returned value is only valid as the final field of a
    /// [`CToCppRefCounted`] record; forwarder methods recover the record
    /// from their own address. Only the wrapper family calls this.
    unsafe fn new_forwarder() -> Self;

    /// Re-dispatches an unwrap whose wrapper tag names a class derived from
    /// this one. Classes with no children keep the default, which treats a
    /// mismatched tag as a caller bug.
    ///
    /// # Safety
    ///
    /// `_object` must be a forwarder embedded in a live wrapper record.
    unsafe fn unwrap_derived(class: WrapperType, _object: &Self::Interface) -> *mut Self::CStruct {
        unreachable!("unexpected class type {class:?}");
    }
}

/// Heap record adapting a foreign ref-counted struct to a Rust trait.
///
/// The forwarder instance is the final field, so its address recovers the
/// record by subtraction. The record pins one underlying reference per local
/// reference: every `add_ref`/`release` on this side is mirrored through the
/// struct's own table, and the record is freed when the local count hits
/// zero.
#[repr(C)]
pub struct CToCppRefCounted<C: CToCppRefCountedClass> {
    class: WrapperType,
    struct_: *mut C::CStruct,
    ref_count: RefCount,
    wrapper: C,
}

impl<C: CToCppRefCountedClass> CToCppRefCounted<C> {
    /// Wraps a struct received from the other side, adopting the reference
    /// that traveled with it. Wrapping the same struct again while a wrapper
    /// is live returns a pointer to the same forwarder.
    ///
    /// # Safety
    ///
    /// `s` must be null or a live struct carrying one transferred reference.
    pub unsafe fn wrap(s: *mut C::CStruct) -> Option<RefPtr<C>> {
        if s.is_null() {
            return None;
        }
        shutdown_checker::assert_not_shutdown();

        let key = (C::WRAPPER_TYPE, s as usize);
        let mut map = registry::lock();
        if let Some(&existing) = map.get(&key) {
            let wrapper = existing as *mut Self;
            debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
            // Fails only when the last reference is already gone and the
            // wrapper is waiting on this lock to drop its entry; fall
            // through and build its replacement.
            if (*wrapper).ref_count.try_add_ref() {
                // The reference that traveled with `s` becomes the mirrored
                // underlying reference for the returned holder.
                return Some(RefPtr::from_existing(NonNull::from(&(*wrapper).wrapper)));
            }
        }

        let wrapper = Box::into_raw(Box::new(Self {
            class: C::WRAPPER_TYPE,
            struct_: s,
            ref_count: RefCount::new(),
            wrapper: C::new_forwarder(),
        }));
        (*wrapper).ref_count.add_ref();
        map.insert(key, wrapper as usize);
        Some(RefPtr::from_existing(NonNull::from(&(*wrapper).wrapper)))
    }

    /// Produces a struct pointer for sending `object` back across the
    /// boundary, attaching one transferred reference. An object whose
    /// wrapper tag names a derived class is routed through
    /// [`CToCppRefCountedClass::unwrap_derived`].
    ///
    /// # Safety
    ///
    /// `object` must be `None` or a forwarder reference obtained from a
    /// [`RefPtr`] handed out by [`wrap`]; the method recovers the wrapper
    /// record from the reference's address.
    ///
    /// [`wrap`]: Self::wrap
    pub unsafe fn unwrap(object: Option<&C::Interface>) -> *mut C::CStruct {
        let Some(object) = object else {
            return ptr::null_mut();
        };
        // The data pointer of the trait object is the embedded forwarder.
        let forwarder = (object as *const C::Interface).cast::<C>();
        let wrapper = Self::wrapper_from_forwarder(&*forwarder);
        if (*wrapper).class != C::WRAPPER_TYPE {
            return C::unwrap_derived((*wrapper).class, object);
        }
        // The reference that travels with the returned struct.
        Self::underlying_add_ref((*wrapper).struct_);
        (*wrapper).struct_
    }

    /// The wrapped struct, for forwarder method bodies.
    pub fn get_struct(forwarder: &C) -> *mut C::CStruct {
        unsafe {
            let wrapper = Self::wrapper_from_forwarder(forwarder);
            debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
            (*wrapper).struct_
        }
    }

    /// Recovers the wrapper record from its embedded forwarder.
    ///
    /// All forwarder types are field-less, so every record in a derivation
    /// chain places its tag at the same offset and the tag read below is
    /// valid even when the record was built for a derived class.
    unsafe fn wrapper_from_forwarder(forwarder: &C) -> *mut Self {
        let offset = mem::size_of::<Self>() - mem::size_of::<C>();
        debug_assert_eq!(offset, mem::offset_of!(Self, wrapper));
        (forwarder as *const C as *const u8).sub(offset) as *mut Self
    }

    unsafe fn underlying_add_ref(s: *mut C::CStruct) {
        let base = s.cast::<honey_base_ref_counted_t>();
        if let Some(add_ref) = (*base).add_ref {
            add_ref(base);
        }
    }

    unsafe fn underlying_release(s: *mut C::CStruct) -> bool {
        let base = s.cast::<honey_base_ref_counted_t>();
        match (*base).release {
            Some(release) => release(base) != 0,
            None => false,
        }
    }

    unsafe fn underlying_has_one_ref(s: *mut C::CStruct) -> bool {
        let base = s.cast::<honey_base_ref_counted_t>();
        match (*base).has_one_ref {
            Some(has_one_ref) => has_one_ref(base) != 0,
            None => false,
        }
    }

    unsafe fn underlying_has_at_least_one_ref(s: *mut C::CStruct) -> bool {
        let base = s.cast::<honey_base_ref_counted_t>();
        match (*base).has_at_least_one_ref {
            Some(has_at_least_one_ref) => has_at_least_one_ref(base) != 0,
            None => false,
        }
    }
}

// Reference-count plumbing for the forwarder handed to Rust callers. Local
// references are mirrored onto the underlying struct one for one, so the
// other side observes this side's holds. Sound because a `&C` can only come
// from inside a live wrapper record: forwarder types are unconstructible
// outside their adapter module.
impl<C: CToCppRefCountedClass> BaseRefCounted for C {
    fn add_ref(&self) {
        unsafe {
            let wrapper = CToCppRefCounted::<C>::wrapper_from_forwarder(self);
            CToCppRefCounted::<C>::underlying_add_ref((*wrapper).struct_);
            (*wrapper).ref_count.add_ref();
        }
    }

    fn release(&self) -> bool {
        unsafe {
            let wrapper = CToCppRefCounted::<C>::wrapper_from_forwarder(self);
            CToCppRefCounted::<C>::underlying_release((*wrapper).struct_);
            if (*wrapper).ref_count.release() {
                drop(Box::from_raw(wrapper));
                true
            } else {
                false
            }
        }
    }

    fn has_one_ref(&self) -> bool {
        unsafe {
            let wrapper = CToCppRefCounted::<C>::wrapper_from_forwarder(self);
            CToCppRefCounted::<C>::underlying_has_one_ref((*wrapper).struct_)
        }
    }

    fn has_at_least_one_ref(&self) -> bool {
        unsafe {
            let wrapper = CToCppRefCounted::<C>::wrapper_from_forwarder(self);
            CToCppRefCounted::<C>::underlying_has_at_least_one_ref((*wrapper).struct_)
        }
    }
}

impl<C: CToCppRefCountedClass> Drop for CToCppRefCounted<C> {
    fn drop(&mut self) {
        shutdown_checker::assert_not_shutdown();
        let key = (C::WRAPPER_TYPE, self.struct_ as usize);
        registry::remove(key, self as *mut Self as usize);
    }
}
