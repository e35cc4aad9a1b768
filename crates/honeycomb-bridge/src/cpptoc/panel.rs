//! Exposes a library [`Panel`] as a `honey_panel_t`.
//!
//! The wrapper installs forwarders for the inherited view members too; each
//! forwarder recovers this class's wrapper from the base struct pointer it
//! receives, which is also the derived struct pointer.

use std::ffi::c_int;
use std::sync::Arc;

use honeycomb_api::Panel;
use honeycomb_capi::{honey_panel_t, honey_view_t, honey_window_t};

use crate::cpptoc::ref_counted::{CppToCRefCounted, CppToCRefCountedClass};
use crate::cpptoc::window::WindowCppToC;
use crate::wrapper_types::WrapperType;

pub struct PanelCppToC;

impl CppToCRefCountedClass for PanelCppToC {
    type Interface = dyn Panel;
    type CStruct = honey_panel_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::Panel;

    fn init_struct(s: &mut honey_panel_t) {
        s.base.is_valid = Some(panel_is_valid);
        s.base.get_id = Some(panel_get_id);
        s.get_child_count = Some(panel_get_child_count);
    }

    fn unwrap_derived(class: WrapperType, s: *mut honey_panel_t) -> Option<Arc<dyn Panel>> {
        match class {
            WrapperType::Window => {
                unsafe { CppToCRefCounted::<WindowCppToC>::unwrap(s.cast::<honey_window_t>()) }
                    .map(|window| {
                        let panel: Arc<dyn Panel> = window;
                        panel
                    })
            }
            _ => unreachable!("unexpected class type {class:?}"),
        }
    }
}

impl PanelCppToC {
    pub fn wrap(object: Option<Arc<dyn Panel>>) -> *mut honey_panel_t {
        CppToCRefCounted::<Self>::wrap(object)
    }

    /// # Safety
    ///
    /// `s` must be null or a panel struct produced by this family, including
    /// the base struct of a wrapped window.
    pub unsafe fn unwrap(s: *mut honey_panel_t) -> Option<Arc<dyn Panel>> {
        CppToCRefCounted::<Self>::unwrap(s)
    }
}

unsafe extern "C" fn panel_is_valid(self_: *mut honey_view_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<PanelCppToC>::get(self_.cast::<honey_panel_t>()).is_valid() as c_int
}

unsafe extern "C" fn panel_get_id(self_: *mut honey_view_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<PanelCppToC>::get(self_.cast::<honey_panel_t>()).get_id()
}

unsafe extern "C" fn panel_get_child_count(self_: *mut honey_panel_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<PanelCppToC>::get(self_).get_child_count()
}
