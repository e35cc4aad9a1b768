//! Calls into a library-provided `honey_v8_stack_frame_t` behind the
//! [`V8StackFrame`] trait.

use honeycomb_api::V8StackFrame;
use honeycomb_capi::{honey_v8_stack_frame_t, member_missing};

use crate::base::RefPtr;
use crate::ctocpp::ref_counted::{CToCppRefCounted, CToCppRefCountedClass};
use crate::wrapper_types::WrapperType;

// The private field keeps forwarders unconstructible outside this module; a
// standalone instance would have no wrapper record behind it.
pub struct V8StackFrameCToCpp(());

impl CToCppRefCountedClass for V8StackFrameCToCpp {
    type Interface = dyn V8StackFrame;
    type CStruct = honey_v8_stack_frame_t;
    const WRAPPER_TYPE: WrapperType = WrapperType::V8StackFrame;

    unsafe fn new_forwarder() -> Self {
        Self(())
    }
}

impl V8StackFrameCToCpp {
    /// # Safety
    ///
    /// `s` must be null or a live `honey_v8_stack_frame_t` carrying one
    /// transferred reference.
    pub unsafe fn wrap(s: *mut honey_v8_stack_frame_t) -> Option<RefPtr<V8StackFrameCToCpp>> {
        CToCppRefCounted::<Self>::wrap(s)
    }

    /// # Safety
    ///
    /// `object` must be `None` or a reference obtained from a [`RefPtr`]
    /// handed out by [`wrap`].
    ///
    /// [`wrap`]: Self::wrap
    pub unsafe fn unwrap(
        object: Option<&(dyn V8StackFrame + 'static)>,
    ) -> *mut honey_v8_stack_frame_t {
        CToCppRefCounted::<Self>::unwrap(object)
    }
}

impl V8StackFrame for V8StackFrameCToCpp {
    fn is_valid(&self) -> bool {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, is_valid) {
            return false;
        }
        unsafe {
            match (*s).is_valid {
                Some(f) => f(s) != 0,
                None => false,
            }
        }
    }

    fn get_line_number(&self) -> i32 {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, get_line_number) {
            return 0;
        }
        unsafe {
            match (*s).get_line_number {
                Some(f) => f(s),
                None => 0,
            }
        }
    }

    fn get_column(&self) -> i32 {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, get_column) {
            return 0;
        }
        unsafe {
            match (*s).get_column {
                Some(f) => f(s),
                None => 0,
            }
        }
    }

    fn is_eval(&self) -> bool {
        let s = CToCppRefCounted::<Self>::get_struct(self);
        if member_missing!(s, is_eval) {
            return false;
        }
        unsafe {
            match (*s).is_eval {
                Some(f) => f(s) != 0,
                None => false,
            }
        }
    }
}
