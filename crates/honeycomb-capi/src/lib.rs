#![allow(non_camel_case_types)]
//! C ABI surface for the Honeycomb bridge.
//!
//! Everything in this crate is plain `#[repr(C)]` data: the two base structs
//! (ref-counted and scoped), the interface function-pointer tables built on
//! top of them, and the `size`-based member-presence helpers used to detect
//! version skew between the two sides of the boundary. No logic lives here;
//! the ownership and identity rules are implemented in `honeycomb-bridge`.
//!
//! Layout convention: every interface struct's first member is its base
//! struct (recursively reaching `honey_base_ref_counted_t` or
//! `honey_base_scoped_t`), so a derived struct pointer is also a valid
//! pointer to any of its bases, and the first word of any exposed struct is
//! the `size` recorded at creation time.

use core::ffi::c_int;

// ----- Base structs ----------------------------------------------------------

/// All ref-counted interface structs begin with this structure.
#[repr(C)]
pub struct honey_base_ref_counted_t {
    /// Size of the full exposed struct, recorded by the side that created it.
    pub size: usize,
    pub add_ref: Option<unsafe extern "C" fn(self_: *mut honey_base_ref_counted_t)>,
    /// Returns 1 if the underlying object was destroyed.
    pub release: Option<unsafe extern "C" fn(self_: *mut honey_base_ref_counted_t) -> c_int>,
    pub has_one_ref: Option<unsafe extern "C" fn(self_: *mut honey_base_ref_counted_t) -> c_int>,
    pub has_at_least_one_ref:
        Option<unsafe extern "C" fn(self_: *mut honey_base_ref_counted_t) -> c_int>,
}

/// All scoped (single-owner) interface structs begin with this structure.
#[repr(C)]
pub struct honey_base_scoped_t {
    pub size: usize,
    /// Deletes the wrapper and, if owned, the underlying object. Only set
    /// when ownership of the object travels with the struct.
    pub del: Option<unsafe extern "C" fn(self_: *mut honey_base_scoped_t)>,
}

/// Marker for structs whose first member is `honey_base_ref_counted_t`
/// (directly or through a chain of embedded parent structs).
///
/// # Safety
///
/// Implementors guarantee the base-first layout above and that the all-zero
/// bit pattern is a valid value of the struct (all function pointers are
/// `Option` and `size` is an integer).
pub unsafe trait RefCountedStruct {}

/// Marker for structs whose first member is `honey_base_scoped_t`.
///
/// # Safety
///
/// Same contract as [`RefCountedStruct`], with the scoped base.
pub unsafe trait ScopedStruct {}

// ----- Interface tables ------------------------------------------------------

/// Embedder-provided application hooks.
#[repr(C)]
pub struct honey_app_t {
    pub base: honey_base_ref_counted_t,
    pub on_register_custom_schemes: Option<
        unsafe extern "C" fn(self_: *mut honey_app_t, registrar: *mut honey_scheme_registrar_t),
    >,
    pub on_context_initialized: Option<unsafe extern "C" fn(self_: *mut honey_app_t)>,
}

unsafe impl RefCountedStruct for honey_app_t {}

/// Scheme registration, passed to the app for the duration of one callback.
#[repr(C)]
pub struct honey_scheme_registrar_t {
    pub base: honey_base_scoped_t,
    pub add_custom_scheme: Option<
        unsafe extern "C" fn(
            self_: *mut honey_scheme_registrar_t,
            scheme_id: c_int,
            options: u32,
        ) -> c_int,
    >,
}

unsafe impl ScopedStruct for honey_scheme_registrar_t {}

/// One frame of a captured script stack trace.
#[repr(C)]
pub struct honey_v8_stack_frame_t {
    pub base: honey_base_ref_counted_t,
    pub is_valid: Option<unsafe extern "C" fn(self_: *mut honey_v8_stack_frame_t) -> c_int>,
    pub get_line_number: Option<unsafe extern "C" fn(self_: *mut honey_v8_stack_frame_t) -> c_int>,
    pub get_column: Option<unsafe extern "C" fn(self_: *mut honey_v8_stack_frame_t) -> c_int>,
    pub is_eval: Option<unsafe extern "C" fn(self_: *mut honey_v8_stack_frame_t) -> c_int>,
}

unsafe impl RefCountedStruct for honey_v8_stack_frame_t {}

// Views hierarchy. Derived structs embed their parent as the first member so
// that a `honey_window_t*` is also a valid `honey_panel_t*` and
// `honey_view_t*`.

#[repr(C)]
pub struct honey_view_t {
    pub base: honey_base_ref_counted_t,
    pub is_valid: Option<unsafe extern "C" fn(self_: *mut honey_view_t) -> c_int>,
    pub get_id: Option<unsafe extern "C" fn(self_: *mut honey_view_t) -> c_int>,
}

unsafe impl RefCountedStruct for honey_view_t {}

#[repr(C)]
pub struct honey_panel_t {
    pub base: honey_view_t,
    pub get_child_count: Option<unsafe extern "C" fn(self_: *mut honey_panel_t) -> c_int>,
}

unsafe impl RefCountedStruct for honey_panel_t {}

#[repr(C)]
pub struct honey_window_t {
    pub base: honey_panel_t,
    pub show: Option<unsafe extern "C" fn(self_: *mut honey_window_t)>,
    pub is_shown: Option<unsafe extern "C" fn(self_: *mut honey_window_t) -> c_int>,
}

unsafe impl RefCountedStruct for honey_window_t {}

// ----- Module entry points ---------------------------------------------------

/// Version of the C API described by this crate. Bumped whenever a struct
/// gains a member; older modules keep working because callers gate every
/// optional member on [`member_missing!`].
pub const API_VERSION: c_int = 1;

/// `honey_api_version` export: reports the API version the module was built
/// against.
pub type honey_api_version_t = unsafe extern "C" fn() -> c_int;

/// `honey_create_app` export: returns the module's app instance with one
/// reference that the caller adopts.
pub type honey_create_app_t = unsafe extern "C" fn() -> *mut honey_app_t;

// ----- Version-skew helpers --------------------------------------------------

/// True if `member` (a pointer to a field of `*s`) lies within the struct
/// size recorded by the side that created `s`.
///
/// # Safety
///
/// `s` must point to a live struct whose first word is the recorded size,
/// and `member` must point into that struct.
#[doc(hidden)]
pub unsafe fn member_in_recorded_size<S, M>(s: *const S, member: *const M) -> bool {
    let recorded = unsafe { *(s as *const usize) };
    let offset = member as usize - s as usize;
    offset + core::mem::size_of::<M>() <= recorded
}

/// True if the other side's struct is large enough to declare `$member`.
///
/// Member presence is determined purely by comparing the member's offset and
/// size against the struct's recorded `size`; there is no capability query.
#[macro_export]
macro_rules! member_exists {
    ($s:expr, $member:ident) => {{
        let s = $s;
        unsafe { $crate::member_in_recorded_size(s, core::ptr::addr_of!((*s).$member)) }
    }};
}

/// True if `$member` is absent (older struct) or declared but null. Callers
/// must check this before invoking any optional function pointer.
#[macro_export]
macro_rules! member_missing {
    ($s:expr, $member:ident) => {{
        let s = $s;
        !$crate::member_exists!(s, $member) || unsafe { (*s).$member.is_none() }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" fn noop_is_valid(_self: *mut honey_v8_stack_frame_t) -> c_int {
        1
    }

    fn zeroed_frame() -> honey_v8_stack_frame_t {
        // All members are Option function pointers or integers; zero is valid.
        unsafe { core::mem::zeroed() }
    }

    #[test]
    fn member_exists_respects_recorded_size() {
        let mut frame = zeroed_frame();
        frame.base.size = core::mem::size_of::<honey_v8_stack_frame_t>();
        frame.is_valid = Some(noop_is_valid);

        let p = &frame as *const honey_v8_stack_frame_t;
        assert!(member_exists!(p, is_valid));
        assert!(member_exists!(p, is_eval));
        assert!(!member_missing!(p, is_valid));
        // Declared in the struct but never filled in.
        assert!(member_missing!(p, get_column));
    }

    #[test]
    fn older_struct_reports_trailing_members_missing() {
        let mut frame = zeroed_frame();
        // Pretend the struct was created by an older module that only knew
        // the base plus the first member.
        frame.base.size = core::mem::size_of::<honey_base_ref_counted_t>()
            + core::mem::size_of::<Option<unsafe extern "C" fn()>>();
        frame.is_valid = Some(noop_is_valid);

        let p = &frame as *const honey_v8_stack_frame_t;
        assert!(member_exists!(p, is_valid));
        assert!(!member_exists!(p, get_line_number));
        assert!(member_missing!(p, get_line_number));
        assert!(member_missing!(p, is_eval));
    }

    #[test]
    fn derived_struct_pointer_is_a_base_struct_pointer() {
        let mut window: honey_window_t = unsafe { core::mem::zeroed() };
        window.base.base.base.size = core::mem::size_of::<honey_window_t>();

        let w = &window as *const honey_window_t;
        let v = w as *const honey_view_t;
        assert_eq!(unsafe { (*v).base.size }, core::mem::size_of::<honey_window_t>());
        assert!(member_exists!(w, show));
    }
}
