use std::marker::PhantomData;
use std::mem;
use std::ptr;
use std::ptr::NonNull;

use honeycomb_capi::{honey_base_scoped_t, ScopedStruct};

use crate::shutdown_checker;
use crate::wrapper_types::WrapperType;

/// Per-interface description of a scoped cpptoc wrapper class.
pub trait CppToCScopedClass: Sized + 'static {
    type Interface: ?Sized + 'static;
    type CStruct: ScopedStruct + 'static;

    const WRAPPER_TYPE: WrapperType;

    fn init_struct(s: &mut Self::CStruct);

    /// Derived re-dispatch for [`CppToCScoped::unwrap_own`]. Classes with no
    /// children keep the default.
    fn unwrap_derived_own(class: WrapperType, _s: *mut Self::CStruct) -> Option<Box<Self::Interface>> {
        unreachable!("unexpected class type {class:?}");
    }

    /// Derived re-dispatch for [`CppToCScoped::unwrap_raw`].
    fn unwrap_derived_raw(class: WrapperType, _s: *mut Self::CStruct) -> Option<NonNull<Self::Interface>> {
        unreachable!("unexpected class type {class:?}");
    }
}

/// Heap record exposing a single-owner object as a C struct.
///
/// Same layout rule as the ref-counted family: the struct is the final field
/// and recovers the record by subtraction. There is no reference count;
/// lifetime is governed by `owned`. An owning wrapper (from [`wrap_own`])
/// carries the object with it and installs `del` so the other side can
/// destroy both; a borrowing wrapper (from [`wrap_raw`]) leaves `del` null
/// and dies with the borrow.
///
/// [`wrap_own`]: Self::wrap_own
/// [`wrap_raw`]: Self::wrap_raw
#[repr(C)]
pub struct CppToCScoped<C: CppToCScopedClass> {
    class: WrapperType,
    object: Option<NonNull<C::Interface>>,
    owned: bool,
    struct_: C::CStruct,
}

/// Borrow-scoped wrapper handle returned by [`CppToCScoped::wrap_raw`]. The
/// exposed struct is only valid while this handle lives, and the handle
/// cannot outlive the borrow it wraps.
pub struct RawWrapper<'a, C: CppToCScopedClass> {
    wrapper: Box<CppToCScoped<C>>,
    _borrow: PhantomData<&'a mut C::Interface>,
}

impl<'a, C: CppToCScopedClass> RawWrapper<'a, C> {
    pub fn get_struct(&mut self) -> *mut C::CStruct {
        &mut self.wrapper.struct_
    }
}

impl<C: CppToCScopedClass> CppToCScoped<C> {
    /// Wraps an owned object, transferring ownership with the returned
    /// struct. The receiver destroys both through `del`, or passes ownership
    /// back through [`unwrap_own`].
    ///
    /// [`unwrap_own`]: Self::unwrap_own
    pub fn wrap_own(object: Option<Box<C::Interface>>) -> *mut C::CStruct {
        let Some(object) = object else {
            return ptr::null_mut();
        };
        let wrapper = Self::new_wrapper(NonNull::from(Box::leak(object)), true);
        unsafe {
            let base = (&mut (*wrapper).struct_ as *mut C::CStruct).cast::<honey_base_scoped_t>();
            (*base).del = Some(Self::struct_del);
            &mut (*wrapper).struct_
        }
    }

    /// Wraps a borrowed object. The struct's `del` stays null, so the other
    /// side cannot destroy it; the wrapper itself dies with the returned
    /// handle.
    pub fn wrap_raw(object: Option<&mut C::Interface>) -> Option<RawWrapper<'_, C>> {
        let object = object?;
        let wrapper = Self::new_wrapper(NonNull::from(object), false);
        Some(RawWrapper {
            wrapper: unsafe { Box::from_raw(wrapper) },
            _borrow: PhantomData,
        })
    }

    fn new_wrapper(object: NonNull<C::Interface>, owned: bool) -> *mut Self {
        shutdown_checker::assert_not_shutdown();
        let mut wrapper = Box::new(Self {
            class: C::WRAPPER_TYPE,
            object: Some(object),
            owned,
            struct_: unsafe { mem::zeroed() },
        });
        {
            let base =
                unsafe { &mut *(&mut wrapper.struct_ as *mut C::CStruct).cast::<honey_base_scoped_t>() };
            base.size = mem::size_of::<C::CStruct>();
        }
        C::init_struct(&mut wrapper.struct_);
        Box::into_raw(wrapper)
    }

    /// Takes ownership back from a struct produced by [`wrap_own`],
    /// destroying the wrapper but not the object. Calling this on a
    /// borrowing wrapper is a caller bug.
    ///
    /// [`wrap_own`]: Self::wrap_own
    ///
    /// # Safety
    ///
    /// `s` must be null or a live struct created by this wrapper family.
    pub unsafe fn unwrap_own(s: *mut C::CStruct) -> Option<Box<C::Interface>> {
        if s.is_null() {
            return None;
        }
        let wrapper = Self::wrapper_from_struct(s);
        if (*wrapper).class != C::WRAPPER_TYPE {
            return C::unwrap_derived_own((*wrapper).class, s);
        }
        debug_assert!((*wrapper).owned, "unwrap_own on a borrowing wrapper");
        if !(*wrapper).owned {
            return None;
        }
        let object = (*wrapper).object.take()?;
        // The wrapper drop sees no object and leaves it alone.
        drop(Box::from_raw(wrapper));
        Some(Box::from_raw(object.as_ptr()))
    }

    /// Borrows the object behind a struct without touching ownership. The
    /// wrapper stays live.
    ///
    /// # Safety
    ///
    /// `s` must be null or a live struct created by this wrapper family, and
    /// the returned pointer must not outlive the wrapper.
    pub unsafe fn unwrap_raw(s: *mut C::CStruct) -> Option<NonNull<C::Interface>> {
        if s.is_null() {
            return None;
        }
        let wrapper = Self::wrapper_from_struct(s);
        if (*wrapper).class != C::WRAPPER_TYPE {
            return C::unwrap_derived_raw((*wrapper).class, s);
        }
        (*wrapper).object
    }

    /// Lookup for the mandatory `self_` parameter of a C API call.
    ///
    /// # Safety
    ///
    /// `s` must be a live struct created by `wrap_own`/`wrap_raw` for
    /// exactly this class.
    pub unsafe fn get(s: *mut C::CStruct) -> NonNull<C::Interface> {
        debug_assert!(!s.is_null());
        let wrapper = Self::wrapper_from_struct(s);
        debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
        match (*wrapper).object {
            Some(object) => object,
            None => unreachable!("scoped wrapper no longer holds an object"),
        }
    }

    /// Recovers the same-side wrapper record without touching ownership.
    ///
    /// # Safety
    ///
    /// `s` must be a live struct created by this family for exactly this
    /// class, and the reference must not outlive the wrapper.
    pub unsafe fn get_wrapper<'a>(s: *mut C::CStruct) -> &'a Self {
        let wrapper = Self::wrapper_from_struct(s);
        debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
        &*wrapper
    }

    /// The address handed across the boundary for this wrapper.
    pub fn get_struct(&self) -> *const C::CStruct {
        &self.struct_
    }

    unsafe fn wrapper_from_struct(s: *mut C::CStruct) -> *mut Self {
        let offset = mem::size_of::<Self>() - mem::size_of::<C::CStruct>();
        debug_assert_eq!(offset, mem::offset_of!(Self, struct_));
        s.cast::<u8>().sub(offset).cast::<Self>()
    }

    unsafe extern "C" fn struct_del(base: *mut honey_base_scoped_t) {
        debug_assert!(!base.is_null());
        if base.is_null() {
            return;
        }
        let wrapper = Self::wrapper_from_struct(base.cast::<C::CStruct>());
        debug_assert_eq!((*wrapper).class, C::WRAPPER_TYPE);
        debug_assert!((*wrapper).owned);
        drop(Box::from_raw(wrapper));
    }
}

impl<C: CppToCScopedClass> Drop for CppToCScoped<C> {
    fn drop(&mut self) {
        shutdown_checker::assert_not_shutdown();
        if self.owned {
            if let Some(object) = self.object.take() {
                drop(unsafe { Box::from_raw(object.as_ptr()) });
            }
        }
    }
}
