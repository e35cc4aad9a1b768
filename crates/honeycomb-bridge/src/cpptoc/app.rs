//! Exposes an embedder [`App`] implementation as a `honey_app_t`.

use std::sync::Arc;

use honeycomb_api::App;
use honeycomb_capi::{honey_app_t, honey_scheme_registrar_t};

use crate::cpptoc::ref_counted::{CppToCRefCounted, CppToCRefCountedClass};
use crate::ctocpp::scheme_registrar::SchemeRegistrarCToCpp;
use crate::ctocpp::scoped::CToCppScoped;
use crate::wrapper_types::WrapperType;

pub struct AppCppToC;

impl CppToCRefCountedClass for AppCppToC {
    type Interface = dyn App;
    type CStruct = honey_app_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::App;

    fn init_struct(s: &mut honey_app_t) {
        s.on_register_custom_schemes = Some(app_on_register_custom_schemes);
        s.on_context_initialized = Some(app_on_context_initialized);
    }
}

impl AppCppToC {
    pub fn wrap(object: Option<Arc<dyn App>>) -> *mut honey_app_t {
        CppToCRefCounted::<Self>::wrap(object)
    }

    /// # Safety
    ///
    /// `s` must be null or a struct produced by [`AppCppToC::wrap`].
    pub unsafe fn unwrap(s: *mut honey_app_t) -> Option<Arc<dyn App>> {
        CppToCRefCounted::<Self>::unwrap(s)
    }
}

unsafe extern "C" fn app_on_register_custom_schemes(
    self_: *mut honey_app_t,
    registrar: *mut honey_scheme_registrar_t,
) {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return;
    }
    let object = CppToCRefCounted::<AppCppToC>::get(self_);
    // The registrar is borrowed for the duration of this call only.
    let Some(mut registrar) = CToCppScoped::<SchemeRegistrarCToCpp>::wrap(registrar) else {
        return;
    };
    object.on_register_custom_schemes(&mut **registrar);
}

unsafe extern "C" fn app_on_context_initialized(self_: *mut honey_app_t) {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return;
    }
    CppToCRefCounted::<AppCppToC>::get(self_).on_context_initialized();
}
