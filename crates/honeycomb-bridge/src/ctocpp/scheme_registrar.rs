//! Calls into a library-provided `honey_scheme_registrar_t` behind the
//! [`SchemeRegistrar`] trait.

use honeycomb_api::{SchemeOptions, SchemeRegistrar};
use honeycomb_capi::{honey_scheme_registrar_t, member_missing};

use crate::ctocpp::scoped::{CToCppScoped, CToCppScopedClass};
use crate::wrapper_types::WrapperType;

// The private field keeps forwarders unconstructible outside this module; a
// standalone instance would have no wrapper record behind it.
pub struct SchemeRegistrarCToCpp(());

impl CToCppScopedClass for SchemeRegistrarCToCpp {
    type Interface = dyn SchemeRegistrar;
    type CStruct = honey_scheme_registrar_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::SchemeRegistrar;

    unsafe fn new_forwarder() -> Self {
        Self(())
    }
}

impl SchemeRegistrar for SchemeRegistrarCToCpp {
    fn add_custom_scheme(&mut self, scheme_id: i32, options: SchemeOptions) -> bool {
        let s = CToCppScoped::<Self>::get_struct(self);
        if member_missing!(s, add_custom_scheme) {
            return false;
        }
        unsafe {
            match (*s).add_custom_scheme {
                Some(f) => f(s, scheme_id, options.bits()) != 0,
                None => false,
            }
        }
    }
}
