//! Exposes a library [`SchemeRegistrar`] as a `honey_scheme_registrar_t`.
//! Registrars are only ever lent across the boundary, so callers use
//! [`CppToCScoped::wrap_raw`] and the borrow scope of the returned handle
//! bounds the struct's validity.

use std::ffi::c_int;

use honeycomb_api::{SchemeOptions, SchemeRegistrar};
use honeycomb_capi::honey_scheme_registrar_t;

use crate::cpptoc::scoped::{CppToCScoped, CppToCScopedClass, RawWrapper};
use crate::wrapper_types::WrapperType;

pub struct SchemeRegistrarCppToC;

impl CppToCScopedClass for SchemeRegistrarCppToC {
    type Interface = dyn SchemeRegistrar;
    type CStruct = honey_scheme_registrar_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::SchemeRegistrar;

    fn init_struct(s: &mut honey_scheme_registrar_t) {
        s.add_custom_scheme = Some(scheme_registrar_add_custom_scheme);
    }
}

impl SchemeRegistrarCppToC {
    pub fn wrap_raw<'a>(
        object: Option<&'a mut (dyn SchemeRegistrar + 'static)>,
    ) -> Option<RawWrapper<'a, Self>> {
        CppToCScoped::<Self>::wrap_raw(object)
    }
}

unsafe extern "C" fn scheme_registrar_add_custom_scheme(
    self_: *mut honey_scheme_registrar_t,
    scheme_id: c_int,
    options: u32,
) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    let mut object = CppToCScoped::<SchemeRegistrarCppToC>::get(self_);
    // Unknown future option bits from a newer module are dropped.
    let options = SchemeOptions::from_bits_truncate(options);
    object.as_mut().add_custom_scheme(scheme_id, options) as c_int
}
