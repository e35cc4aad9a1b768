//! Exposes a library [`V8StackFrame`] as a `honey_v8_stack_frame_t`.

use std::ffi::c_int;
use std::sync::Arc;

use honeycomb_api::V8StackFrame;
use honeycomb_capi::honey_v8_stack_frame_t;

use crate::cpptoc::ref_counted::{CppToCRefCounted, CppToCRefCountedClass};
use crate::wrapper_types::WrapperType;

pub struct V8StackFrameCppToC;

impl CppToCRefCountedClass for V8StackFrameCppToC {
    type Interface = dyn V8StackFrame;
    type CStruct = honey_v8_stack_frame_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::V8StackFrame;

    fn init_struct(s: &mut honey_v8_stack_frame_t) {
        s.is_valid = Some(v8_stack_frame_is_valid);
        s.get_line_number = Some(v8_stack_frame_get_line_number);
        s.get_column = Some(v8_stack_frame_get_column);
        s.is_eval = Some(v8_stack_frame_is_eval);
    }
}

impl V8StackFrameCppToC {
    pub fn wrap(object: Option<Arc<dyn V8StackFrame>>) -> *mut honey_v8_stack_frame_t {
        CppToCRefCounted::<Self>::wrap(object)
    }

    /// # Safety
    ///
    /// `s` must be null or a struct produced by [`V8StackFrameCppToC::wrap`].
    pub unsafe fn unwrap(s: *mut honey_v8_stack_frame_t) -> Option<Arc<dyn V8StackFrame>> {
        CppToCRefCounted::<Self>::unwrap(s)
    }
}

unsafe extern "C" fn v8_stack_frame_is_valid(self_: *mut honey_v8_stack_frame_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<V8StackFrameCppToC>::get(self_).is_valid() as c_int
}

unsafe extern "C" fn v8_stack_frame_get_line_number(self_: *mut honey_v8_stack_frame_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<V8StackFrameCppToC>::get(self_).get_line_number()
}

unsafe extern "C" fn v8_stack_frame_get_column(self_: *mut honey_v8_stack_frame_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<V8StackFrameCppToC>::get(self_).get_column()
}

unsafe extern "C" fn v8_stack_frame_is_eval(self_: *mut honey_v8_stack_frame_t) -> c_int {
    debug_assert!(!self_.is_null());
    if self_.is_null() {
        return 0;
    }
    CppToCRefCounted::<V8StackFrameCppToC>::get(self_).is_eval() as c_int
}
