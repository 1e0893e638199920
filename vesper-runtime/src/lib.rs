//!
//! This is the object runtime core for the Vesper scripting language.
//!

/// The C surface consumed by compiled Vesper code.
pub mod abi;
/// Creation functions for every value kind.
pub mod factory;
/// The dynamic library cache and the foreign-call bridge.
pub mod ffi;
/// The list container operations.
pub mod list;
/// Facilities for manipulating objects.
pub mod object;
/// Fast-path and polymorphic operator dispatch.
pub mod ops;
/// Static per-kind type descriptors.
pub mod typeinfo;

/// An owning, reference-counted handle to a runtime object.
pub type Value = vesper_arc::Ref<object::Object>;

/// Writes a human-readable live-object report to the standard output stream.
pub fn dump_live_objects() {
    vesper_arc::Registry::global().dump_stdout();
}
