//! Object bridge between the Rust interfaces in `honeycomb-api` and the C
//! ABI structs in `honeycomb-capi`.
//!
//! Objects cross the boundary in two directions, each with its own wrapper
//! family:
//!
//! * [`cpptoc`] exposes a native Rust object as a C struct, installing
//!   function pointers that forward back into the object.
//! * [`ctocpp`] consumes a C struct from the other side behind a Rust trait,
//!   forwarding every call through the struct's function-pointer table.
//!
//! Crossed with the two ownership disciplines (shared ref-counted, scoped
//! single-owner) this gives four generic wrapper types. Per-interface adapter
//! modules instantiate them for the concrete interfaces.
//!
//! Wrapper records are laid out with the exposed C struct as the final field,
//! so a struct pointer recovers its wrapper with one subtraction and no
//! per-call allocation or table lookup. Every wrapper carries a type tag
//! identifying the concrete class it was created for; tag mismatches route
//! through per-class derived-resolution hooks.

pub mod base;
pub mod cpptoc;
pub mod ctocpp;
pub mod loader;
pub mod ref_count;
mod registry;
pub mod shutdown_checker;
pub mod wrapper_types;

pub use base::{BaseRefCounted, RefPtr};
pub use loader::{LoadError, Module};
pub use wrapper_types::WrapperType;
