use std::ffi::c_int;
use std::mem;
use std::ptr;
use std::sync::Arc;

use honeycomb_capi::{honey_base_ref_counted_t, RefCountedStruct};

use crate::ref_count::RefCount;
use crate::wrapper_types::WrapperType;
use crate::{registry, shutdown_checker};

/// Per-interface description of a ref-counted cpptoc wrapper class.
///
/// Adapter modules implement this once per concrete interface: the trait
/// object crossing the boundary, the C struct exposed for it, the class tag,
/// and the interface function pointers to install.
pub trait CppToCRefCountedClass: Sized + 'static {
    type Interface: ?Sized + 'static;
    type CStruct: RefCountedStruct + 'static;

    const WRAPPER_TYPE: WrapperType;

    /// Fills in the struct's interface function pointers. The base members
    /// are already populated when this is called.
    fn init_struct(s: &mut Self::CStruct);

    /// Re-dispatches an unwrap whose wrapper tag names a class derived from
    /// this one. Classes with no children keep the default, which treats a
    /// mismatched tag as a caller bug.
    fn unwrap_derived(class: WrapperType, _s: *mut Self::CStruct) -> Option<Arc<Self::Interface>> {
        unreachable!("unexpected class type {class:?}");
    }
}

/// Heap record exposing an `Arc<Interface>` as a C struct.
///
/// The struct is the final field so its address recovers the record by
/// subtracting a compile-time constant. The record holds one `Arc` reference
/// for its whole lifetime plus a local count of references handed out
/// through the C side; when the local count hits zero the record is freed
/// and the `Arc` reference goes with it.
#[repr(C)]
pub struct CppToCRefCounted<C: CppToCRefCountedClass> {
    class: WrapperType,
    object: Arc<C::Interface>,
    ref_count: RefCount,
    struct_: C::CStruct,
}

impl<C: CppToCRefCountedClass> CppToCRefCounted<C> {
    /// Wraps `object` for travel across the boundary, transferring one
    /// reference with the returned struct. Wrapping the same object again
    /// while a wrapper is live returns the same struct.
    pub fn wrap(object: Option<Arc<C::Interface>>) -> *mut C::CStruct {
        let Some(object) = object else {
            return ptr::null_mut();
        };
        shutdown_checker::assert_not_shutdown();

        let key = (C::WRAPPER_TYPE, Arc::as_ptr(&object).cast::<()>() as usize);
        let mut map = registry::lock();
        if let Some(&existing) = map.get(&key) {
            let wrapper = existing as *mut Self;
            unsafe {
                debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
                // Fails only when the last reference is already gone and the
                // wrapper is waiting on this lock to drop its entry; fall
                // through and build its replacement.
                if (*wrapper).ref_count.try_add_ref() {
                    return &mut (*wrapper).struct_;
                }
            }
        }

        let mut wrapper = Box::new(Self {
            class: C::WRAPPER_TYPE,
            object,
            ref_count: RefCount::new(),
            // Zero is a valid value per the RefCountedStruct contract.
            struct_: unsafe { mem::zeroed() },
        });
        {
            let base =
                unsafe { &mut *(&mut wrapper.struct_ as *mut C::CStruct).cast::<honey_base_ref_counted_t>() };
            base.size = mem::size_of::<C::CStruct>();
            base.add_ref = Some(Self::struct_add_ref);
            base.release = Some(Self::struct_release);
            base.has_one_ref = Some(Self::struct_has_one_ref);
            base.has_at_least_one_ref = Some(Self::struct_has_at_least_one_ref);
        }
        C::init_struct(&mut wrapper.struct_);

        let wrapper = Box::into_raw(wrapper);
        unsafe {
            // The reference that travels with the returned struct.
            (*wrapper).ref_count.add_ref();
            map.insert(key, wrapper as usize);
            &mut (*wrapper).struct_
        }
    }

    /// Takes back the object behind a struct previously produced by [`wrap`],
    /// consuming the reference that traveled with it. A struct whose wrapper
    /// tag names a derived class is routed through
    /// [`CppToCRefCountedClass::unwrap_derived`].
    ///
    /// [`wrap`]: Self::wrap
    ///
    /// # Safety
    ///
    /// `s` must be null or a live struct created by this wrapper family.
    pub unsafe fn unwrap(s: *mut C::CStruct) -> Option<Arc<C::Interface>> {
        if s.is_null() {
            return None;
        }
        let wrapper = Self::wrapper_from_struct(s);
        if (*wrapper).class != C::WRAPPER_TYPE {
            return C::unwrap_derived((*wrapper).class, s);
        }
        let object = Arc::clone(&(*wrapper).object);
        // Drop the reference that traveled with the struct.
        Self::release_wrapper(wrapper);
        Some(object)
    }

    /// Borrow-style lookup for the mandatory `self_` parameter of a C API
    /// call: returns the object without consuming any reference.
    ///
    /// # Safety
    ///
    /// `s` must be a live struct created by `wrap` for exactly this class.
    pub unsafe fn get(s: *mut C::CStruct) -> Arc<C::Interface> {
        debug_assert!(!s.is_null());
        let wrapper = Self::wrapper_from_struct(s);
        debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
        Arc::clone(&(*wrapper).object)
    }

    /// Recovers the same-side wrapper record without touching ownership.
    ///
    /// # Safety
    ///
    /// `s` must be a live struct created by `wrap` for exactly this class,
    /// and the reference must not outlive the wrapper.
    pub unsafe fn get_wrapper<'a>(s: *mut C::CStruct) -> &'a Self {
        let wrapper = Self::wrapper_from_struct(s);
        debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
        &*wrapper
    }

    /// The address handed across the boundary for this wrapper.
    pub fn get_struct(&self) -> *const C::CStruct {
        &self.struct_
    }

    /// Recovers the wrapper record from a pointer to its final field.
    ///
    /// Computed from the full record size rather than summed field sizes so
    /// the arithmetic holds under any interior padding.
    unsafe fn wrapper_from_struct(s: *mut C::CStruct) -> *mut Self {
        let offset = mem::size_of::<Self>() - mem::size_of::<C::CStruct>();
        debug_assert_eq!(offset, mem::offset_of!(Self, struct_));
        s.cast::<u8>().sub(offset).cast::<Self>()
    }

    /// Drops one local reference; frees the record on the last one. Returns
    /// true if the record was freed.
    unsafe fn release_wrapper(wrapper: *mut Self) -> bool {
        if (*wrapper).ref_count.release() {
            drop(Box::from_raw(wrapper));
            true
        } else {
            false
        }
    }

    unsafe extern "C" fn struct_add_ref(base: *mut honey_base_ref_counted_t) {
        debug_assert!(!base.is_null());
        if base.is_null() {
            return;
        }
        let wrapper = Self::wrapper_from_struct(base.cast::<C::CStruct>());
        debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
        (*wrapper).ref_count.add_ref();
    }

    unsafe extern "C" fn struct_release(base: *mut honey_base_ref_counted_t) -> c_int {
        debug_assert!(!base.is_null());
        if base.is_null() {
            return 0;
        }
        let wrapper = Self::wrapper_from_struct(base.cast::<C::CStruct>());
        debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
        Self::release_wrapper(wrapper) as c_int
    }

    unsafe extern "C" fn struct_has_one_ref(base: *mut honey_base_ref_counted_t) -> c_int {
        debug_assert!(!base.is_null());
        if base.is_null() {
            return 0;
        }
        let wrapper = Self::wrapper_from_struct(base.cast::<C::CStruct>());
        // One local reference and no other Arc holders anywhere.
        ((*wrapper).ref_count.has_one_ref() && Arc::strong_count(&(*wrapper).object) == 1) as c_int
    }

    unsafe extern "C" fn struct_has_at_least_one_ref(base: *mut honey_base_ref_counted_t) -> c_int {
        debug_assert!(!base.is_null());
        if base.is_null() {
            return 0;
        }
        let wrapper = Self::wrapper_from_struct(base.cast::<C::CStruct>());
        (*wrapper).ref_count.has_at_least_one_ref() as c_int
    }
}

impl<C: CppToCRefCountedClass> Drop for CppToCRefCounted<C> {
    fn drop(&mut self) {
        shutdown_checker::assert_not_shutdown();
        let key = (C::WRAPPER_TYPE, Arc::as_ptr(&self.object).cast::<()>() as usize);
        registry::remove(key, self as *mut Self as usize);
    }
}
