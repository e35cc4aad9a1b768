//! Calls into a library-provided `honey_view_t` behind the [`View`] trait.

use honeycomb_api::View;
use honeycomb_capi::{honey_view_t, member_missing};

use crate::base::RefPtr;
use crate::ctocpp::panel::PanelCToCpp;
use crate::ctocpp::ref_counted::{CToCppRefCounted, CToCppRefCountedClass};
use crate::ctocpp::window::WindowCToCpp;
use crate::wrapper_types::WrapperType;

// The private field keeps forwarders unconstructible outside this module; a
// standalone instance would have no wrapper record behind it.
pub struct ViewCToCpp(());

impl CToCppRefCountedClass for ViewCToCpp {
    type Interface = dyn View;
    type CStruct = honey_view_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::View;

    unsafe fn new_forwarder() -> Self {
        Self(())
    }

    unsafe fn unwrap_derived(
        class: WrapperType,
        object: &(dyn View + 'static),
    ) -> *mut honey_view_t {
        // The tag names the forwarder's concrete class; re-type the trait
        // object's data pointer accordingly and unwrap at that level. The
        // derived struct pointer is also this base struct pointer.
        match class {
            WrapperType::Panel => {
                let panel = &*(object as *const dyn View).cast::<PanelCToCpp>();
                CToCppRefCounted::<PanelCToCpp>::unwrap(Some(panel)).cast::<honey_view_t>()
            }
            WrapperType::Window => {
                let window = &*(object as *const dyn View).cast::<WindowCToCpp>();
                CToCppRefCounted::<WindowCToCpp>::unwrap(Some(window)).cast::<honey_view_t>()
            }
            _ => unreachable!("unexpected class type {class:?}"),
        }
    }
}

impl ViewCToCpp {
    /// # Safety
    ///
    /// `s` must be null or a live `honey_view_t` carrying one transferred
    /// reference.
    pub unsafe fn wrap(s: *mut honey_view_t) -> Option<RefPtr<ViewCToCpp>> {
        CToCppRefCounted::<Self>::wrap(s)
    }

    /// # Safety
    ///
    /// `object` must be `None` or a reference obtained from a [`RefPtr`]
    /// handed out by [`wrap`] (for this class or a derived one).
    ///
    /// [`wrap`]: Self::wrap
    pub unsafe fn unwrap(object: Option<&(dyn View + 'static)>) -> *mut honey_view_t {
        CToCppRefCounted::<Self>::unwrap(object)
    }
}

impl View for ViewCToCpp {
    fn is_valid(&self) -> bool {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, is_valid) {
            return false;
        }
        unsafe {
            match (*s).is_valid {
                Some(f) => f(s) != 0,
                None => false,
            }
        }
    }

    fn get_id(&self) -> i32 {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, get_id) {
            return 0;
        }
        unsafe {
            match (*s).get_id {
                Some(f) => f(s),
                None => 0,
            }
        }
    }
}
