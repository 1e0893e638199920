/// Gives the allocator registry a name to report for a tracked value.
pub trait Inspect {
    /// The value's type name, as shown in live-object dumps.
    fn type_name(&self) -> &'static str;
}
