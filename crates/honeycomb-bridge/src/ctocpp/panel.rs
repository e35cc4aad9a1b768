//! Calls into a library-provided `honey_panel_t` behind the [`Panel`] trait.
//! Inherited view members are forwarded through the embedded base struct.

use honeycomb_api::{Panel, View};
use honeycomb_capi::{honey_panel_t, honey_view_t, member_missing};

use crate::base::RefPtr;
use crate::ctocpp::ref_counted::{CToCppRefCounted, CToCppRefCountedClass};
use crate::ctocpp::window::WindowCToCpp;
use crate::wrapper_types::WrapperType;

// The private field keeps forwarders unconstructible outside this module; a
// standalone instance would have no wrapper record behind it.
pub struct PanelCToCpp(());

impl CToCppRefCountedClass for PanelCToCpp {
    type Interface = dyn Panel;
    type CStruct = honey_panel_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::Panel;

    unsafe fn new_forwarder() -> Self {
        Self(())
    }

    unsafe fn unwrap_derived(
        class: WrapperType,
        object: &(dyn Panel + 'static),
    ) -> *mut honey_panel_t {
        match class {
            WrapperType::Window => {
                let window = &*(object as *const dyn Panel).cast::<WindowCToCpp>();
                CToCppRefCounted::<WindowCToCpp>::unwrap(Some(window)).cast::<honey_panel_t>()
            }
            _ => unreachable!("unexpected class type {class:?}"),
        }
    }
}

impl PanelCToCpp {
    /// # Safety
    ///
    /// `s` must be null or a live `honey_panel_t` carrying one transferred
    /// reference.
    pub unsafe fn wrap(s: *mut honey_panel_t) -> Option<RefPtr<PanelCToCpp>> {
        CToCppRefCounted::<Self>::wrap(s)
    }

    /// # Safety
    ///
    /// `object` must be `None` or a reference obtained from a [`RefPtr`]
    /// handed out by [`wrap`] (for this class or a derived one).
    ///
    /// [`wrap`]: Self::wrap
    pub unsafe fn unwrap(object: Option<&(dyn Panel + 'static)>) -> *mut honey_panel_t {
        CToCppRefCounted::<Self>::unwrap(object)
    }
}

impl View for PanelCToCpp {
    fn is_valid(&self) -> bool {
        let v = CToCppRefCounted::<Self>::get_struct(self).cast::<honey_view_t>();
        if member_missing!(v, is_valid) {
            return false;
        }
        unsafe {
            match (*v).is_valid {
                Some(f) => f(v) != 0,
                None => false,
            }
        }
    }

    fn get_id(&self) -> i32 {
        let v = CToCppRefCounted::<Self>::get_struct(self).cast::<honey_view_t>();
        if member_missing!(v, get_id) {
            return 0;
        }
        unsafe {
            match (*v).get_id {
                Some(f) => f(v),
                None => 0,
            }
        }
    }
}

impl Panel for PanelCToCpp {
    fn get_child_count(&self) -> i32 {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, get_child_count) {
            return 0;
        }
        unsafe {
            match (*s).get_child_count {
                Some(f) => f(s),
                None => 0,
            }
        }
    }
}
