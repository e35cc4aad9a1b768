//! Wrappers that expose native Rust objects as C structs.

pub mod ref_counted;
pub mod scoped;

pub mod app;
pub mod panel;
pub mod scheme_registrar;
pub mod v8_stack_frame;
pub mod view;
pub mod window;

pub use ref_counted::{CppToCRefCounted, CppToCRefCountedClass};
pub use scoped::{CppToCScoped, CppToCScopedClass, RawWrapper};
