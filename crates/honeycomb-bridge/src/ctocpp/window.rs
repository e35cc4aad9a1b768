//! Calls into a library-provided `honey_window_t` behind the [`Window`]
//! trait.

use honeycomb_api::{Panel, View, Window};
use honeycomb_capi::{honey_panel_t, honey_view_t, honey_window_t, member_missing};

use crate::base::RefPtr;
use crate::ctocpp::ref_counted::{CToCppRefCounted, CToCppRefCountedClass};
use crate::wrapper_types::WrapperType;

// The private field keeps forwarders unconstructible outside this module; a
// standalone instance would have no wrapper record behind it.
pub struct WindowCToCpp(());

impl CToCppRefCountedClass for WindowCToCpp {
    type Interface = dyn Window;
    type CStruct = honey_window_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::Window;

    unsafe fn new_forwarder() -> Self {
        Self(())
    }
}

impl WindowCToCpp {
    /// # Safety
    ///
    /// `s` must be null or a live `honey_window_t` carrying one transferred
    /// reference.
    pub unsafe fn wrap(s: *mut honey_window_t) -> Option<RefPtr<WindowCToCpp>> {
        CToCppRefCounted::<Self>::wrap(s)
    }

    /// # Safety
    ///
    /// `object` must be `None` or a reference obtained from a [`RefPtr`]
    /// handed out by [`wrap`].
    ///
    /// [`wrap`]: Self::wrap
    pub unsafe fn unwrap(object: Option<&(dyn Window + 'static)>) -> *mut honey_window_t {
        CToCppRefCounted::<Self>::unwrap(object)
    }
}

impl View for WindowCToCpp {
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

impl Panel for WindowCToCpp {
    fn get_child_count(&self) -> i32 {
        let p = CToCppRefCounted::<Self>::get_struct(self).cast::<honey_panel_t>();
        if member_missing!(p, get_child_count) {
            return 0;
        }
        unsafe {
            match (*p).get_child_count {
                Some(f) => f(p),
                None => 0,
            }
        }
    }
}

impl Window for WindowCToCpp {
    fn show(&self) {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, show) {
            return;
        }
        unsafe {
            if let Some(f) = (*s).show {
                f(s);
            }
        }
    }

    fn is_shown(&self) -> bool {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, is_shown) {
            return false;
        }
        unsafe {
            match (*s).is_shown {
                Some(f) => f(s) != 0,
                None => false,
            }
        }
    }
}
