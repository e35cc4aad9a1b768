//! Calls into an embedder-provided `honey_app_t` behind the [`App`] trait.

use honeycomb_api::{App, SchemeRegistrar};
use honeycomb_capi::{honey_app_t, member_missing};

use crate::base::RefPtr;
use crate::cpptoc::scheme_registrar::SchemeRegistrarCppToC;
use crate::cpptoc::scoped::CppToCScoped;
use crate::ctocpp::ref_counted::{CToCppRefCounted, CToCppRefCountedClass};
use crate::wrapper_types::WrapperType;

// The private field keeps forwarders unconstructible outside this module; a
// standalone instance would have no wrapper record behind it.
pub struct AppCToCpp(());

impl CToCppRefCountedClass for AppCToCpp {
    type Interface = dyn App;
    type CStruct = honey_app_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::App;

    unsafe fn new_forwarder() -> Self {
        Self(())
    }
}

impl AppCToCpp {
    /// # Safety
    ///
    /// `s` must be null or a live `honey_app_t` carrying one transferred
    /// reference.
    pub unsafe fn wrap(s: *mut honey_app_t) -> Option<RefPtr<AppCToCpp>> {
        CToCppRefCounted::<Self>::wrap(s)
    }

    /// # Safety
    ///
    /// `object` must be `None` or a reference obtained from a [`RefPtr`]
    /// handed out by [`wrap`].
    ///
    /// [`wrap`]: Self::wrap
    pub unsafe fn unwrap(object: Option<&(dyn App + 'static)>) -> *mut honey_app_t {
        CToCppRefCounted::<Self>::unwrap(object)
    }
}

impl App for AppCToCpp {
    fn on_register_custom_schemes(&self, registrar: &mut (dyn SchemeRegistrar + 'static)) {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, on_register_custom_schemes) {
            return;
        }
        // Lend the registrar across the boundary for this call only; the
        // borrow scope of the handle bounds the struct's validity.
        let Some(mut registrar) = CppToCScoped::<SchemeRegistrarCppToC>::wrap_raw(Some(registrar))
        else {
            return;
        };
        unsafe {
            if let Some(f) = (*s).on_register_custom_schemes {
                f(s, registrar.get_struct());
            }
        }
    }

    fn on_context_initialized(&self) {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, on_context_initialized) {
            return;
        }
        unsafe {
            if let Some(f) = (*s).on_context_initialized {
                f(s);
            }
        }
    }
}
