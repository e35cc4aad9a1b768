//! Exposes a library [`View`] as a `honey_view_t`.

use std::ffi::c_int;
use std::sync::Arc;

use honeycomb_api::View;
use honeycomb_capi::{honey_panel_t, honey_view_t, honey_window_t};

use crate::cpptoc::panel::PanelCppToC;
use crate::cpptoc::ref_counted::{CppToCRefCounted, CppToCRefCountedClass};
use crate::cpptoc::window::WindowCppToC;
use crate::wrapper_types::WrapperType;

pub struct ViewCppToC;

impl CppToCRefCountedClass for ViewCppToC {
    type Interface = dyn View;
    type CStruct = honey_view_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::View;

    fn init_struct(s: &mut honey_view_t) {
        s.is_valid = Some(view_is_valid);
        s.get_id = Some(view_get_id);
    }

    fn unwrap_derived(class: WrapperType, s: *mut honey_view_t) -> Option<Arc<dyn View>> {
        // A derived struct pointer is also a pointer to this base struct,
        // so the cast back is layout-guaranteed.
        match class {
            WrapperType::Panel => {
                unsafe { CppToCRefCounted::<PanelCppToC>::unwrap(s.cast::<honey_panel_t>()) }
                    .map(|panel| {
                        let view: Arc<dyn View> = panel;
                        view
                    })
            }
            WrapperType::Window => {
                unsafe { CppToCRefCounted::<WindowCppToC>::unwrap(s.cast::<honey_window_t>()) }
                    .map(|window| {
                        let view: Arc<dyn View> = window;
                        view
                    })
            }
            _ => unreachable!("unexpected class type {class:?}"),
        }
    }
}

impl ViewCppToC {
    pub fn wrap(object: Option<Arc<dyn View>>) -> *mut honey_view_t {
        CppToCRefCounted::<Self>::wrap(object)
    }

    /// # Safety
    ///
    /// `s` must be null or a view struct produced by this family, including
    /// the base struct of a wrapped panel or window.
    pub unsafe fn unwrap(s: *mut honey_view_t) -> Option<Arc<dyn View>> {
        CppToCRefCounted::<Self>::unwrap(s)
    }
}

unsafe extern "C" fn view_is_valid(self_: *mut honey_view_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<ViewCppToC>::get(self_).is_valid() as c_int
}

unsafe extern "C" fn view_get_id(self_: *mut honey_view_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<ViewCppToC>::get(self_).get_id()
}
