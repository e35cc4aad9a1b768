//! Exposes a library [`Window`] as a `honey_window_t`.

use std::ffi::c_int;
use std::sync::Arc;

use honeycomb_api::Window;
use honeycomb_capi::{honey_panel_t, honey_view_t, honey_window_t};

use crate::cpptoc::ref_counted::{CppToCRefCounted, CppToCRefCountedClass};
use crate::wrapper_types::WrapperType;

pub struct WindowCppToC;

impl CppToCRefCountedClass for WindowCppToC {
    type Interface = dyn Window;
    type CStruct = honey_window_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::Window;

    fn init_struct(s: &mut honey_window_t) {
        s.base.base.is_valid = Some(window_is_valid);
        s.base.base.get_id = Some(window_get_id);
        s.base.get_child_count = Some(window_get_child_count);
        s.show = Some(window_show);
        s.is_shown = Some(window_is_shown);
    }
}

impl WindowCppToC {
    pub fn wrap(object: Option<Arc<dyn Window>>) -> *mut honey_window_t {
        CppToCRefCounted::<Self>::wrap(object)
    }

    /// # Safety
    ///
    /// `s` must be null or a struct produced by [`WindowCppToC::wrap`].
    pub unsafe fn unwrap(s: *mut honey_window_t) -> Option<Arc<dyn Window>> {
        CppToCRefCounted::<Self>::unwrap(s)
    }
}

unsafe extern "C" fn window_is_valid(self_: *mut honey_view_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<WindowCppToC>::get(self_.cast::<honey_window_t>()).is_valid() as c_int
}

unsafe extern "C" fn window_get_id(self_: *mut honey_view_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<WindowCppToC>::get(self_.cast::<honey_window_t>()).get_id()
}

unsafe extern "C" fn window_get_child_count(self_: *mut honey_panel_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<WindowCppToC>::get(self_.cast::<honey_window_t>()).get_child_count()
}

unsafe extern "C" fn window_show(self_: *mut honey_window_t) {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return;
    }
    CppToCRefCounted::<WindowCppToC>::get(self_).show();
}

unsafe extern "C" fn window_is_shown(self_: *mut honey_window_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<WindowCppToC>::get(self_).is_shown() as c_int
}
