//! Capability interface for opaque host-environment objects.

/// An opaque object supplied by the embedding environment.
///
/// JSON values cannot carry constructors, DOM handles or other live host
/// objects, so anything that needs class-based validation enters through
/// this trait rather than an ambient `instanceof`-style lookup. The class
/// name reported here is matched against a schema's `_meta.inst` marker.
pub trait HostObject {
    /// The class this object reports itself as, eg `"Element"`.
    fn class_name(&self) -> &str;
}
