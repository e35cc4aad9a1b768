//! Wrappers that consume C structs from the other side behind Rust traits.

pub mod ref_counted;
pub mod scoped;

pub mod app;
pub mod panel;
pub mod scheme_registrar;
pub mod v8_stack_frame;
pub mod view;
pub mod window;

pub use ref_counted::{CToCppRefCounted, CToCppRefCountedClass};
pub use scoped::{CToCppScoped, CToCppScopedClass};
