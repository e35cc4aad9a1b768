//! Rust-side interfaces carried across the Honeycomb bridge.
//!
//! These traits are what embedders implement (callback interfaces such as
//! [`App`]) or consume (library-implemented interfaces such as
//! [`V8StackFrame`]). They are deliberately free of bridge machinery: the
//! same trait is seen on both sides of the boundary, whether backed by a
//! native implementation or by a wrapper forwarding through a C struct's
//! function-pointer table.
//!
//! All traits are object-safe; objects cross the boundary as `Arc<dyn Trait>`
//! (shared ownership), `Box<dyn Trait>` (single owner), or plain references
//! (borrowed for the duration of one call).

use bitflags::bitflags;

bitflags! {
    /// Behavior flags for a custom scheme, carried across the boundary as a
    /// raw `u32`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SchemeOptions: u32 {
        const STANDARD = 1 << 0;
        const LOCAL = 1 << 1;
        const SECURE = 1 << 2;
        const CORS_ENABLED = 1 << 3;
    }
}

/// Application-level callbacks, implemented by the embedder. All hooks are
/// optional; an older module that never declared one simply isn't called.
pub trait App {
    /// Called once early in startup with a registrar that is only valid for
    /// the duration of this call. The registrar type itself carries no
    /// borrows (`+ 'static`); the reference is what is short-lived.
    fn on_register_custom_schemes(&self, _registrar: &mut (dyn SchemeRegistrar + 'static)) {}

    /// Called when the library context has finished initializing.
    fn on_context_initialized(&self) {}
}

/// Collects custom scheme registrations. Implemented by the library and
/// borrowed by [`App::on_register_custom_schemes`]; the underlying object
/// outlives the callback, never the other way around.
pub trait SchemeRegistrar {
    /// Returns false if the scheme was already registered.
    fn add_custom_scheme(&mut self, scheme_id: i32, options: SchemeOptions) -> bool;
}

/// One frame of a captured script stack trace. Implemented by the library.
pub trait V8StackFrame {
    fn is_valid(&self) -> bool;
    fn get_line_number(&self) -> i32;
    fn get_column(&self) -> i32;
    fn is_eval(&self) -> bool;
}

/// Base class for the views hierarchy. The supertrait chains below mirror
/// the C struct embedding chains, so a `&dyn Window` upcasts to `&dyn Panel`
/// and `&dyn View` on this side exactly as a `honey_window_t*` casts to its
/// base struct pointers on the other.
pub trait View {
    fn is_valid(&self) -> bool;
    fn get_id(&self) -> i32;
}

pub trait Panel: View {
    fn get_child_count(&self) -> i32;
}

pub trait Window: Panel {
    fn show(&self);
    fn is_shown(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_options_round_trip_raw_bits() {
        let opts = SchemeOptions::STANDARD | SchemeOptions::SECURE;
        let raw = opts.bits();
        assert_eq!(SchemeOptions::from_bits_truncate(raw), opts);
        // Unknown future bits from a newer module are dropped, not an error.
        assert_eq!(SchemeOptions::from_bits_truncate(raw | 1 << 31), opts);
    }
}
