//! Component identity as seen by the diagnostics layer.
//!
//! The renderer owns its components. This layer only borrows a
//! [`ComponentIdentity`] for the duration of one lifecycle call and reads
//! the id and the runtime type descriptor from it.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a live component instance within one renderer.
///
/// # Example
///
/// ```
/// use trellis_core::ComponentId;
///
/// let id = ComponentId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Create a component id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ComponentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Descriptor of a component's (or event payload's) concrete kind.
///
/// Usually the path-qualified Rust type name, but a renderer may register an
/// explicit name instead.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeDescriptor(Cow<'static, str>);

impl TypeDescriptor {
    /// Create a descriptor from an explicit name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Descriptor for the type `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    /// The full, path-qualified name.
    pub fn full_name(&self) -> &str {
        &self.0
    }

    /// The name without its module path; generic arguments are kept.
    ///
    /// ```
    /// use trellis_core::TypeDescriptor;
    ///
    /// let ty = TypeDescriptor::new("app::widgets::Counter");
    /// assert_eq!(ty.short_name(), "Counter");
    /// ```
    pub fn short_name(&self) -> &str {
        &self.0[short_name_start(&self.0)..]
    }

    /// Consume the descriptor, keeping only the short name.
    ///
    /// Borrowed descriptors stay borrowed.
    pub fn into_short_name(self) -> Cow<'static, str> {
        let start = short_name_start(&self.0);
        match self.0 {
            Cow::Borrowed(name) => Cow::Borrowed(&name[start..]),
            Cow::Owned(mut name) => {
                name.drain(..start);
                Cow::Owned(name)
            }
        }
    }
}

// Tuples, arrays, slices and references keep their full name.
fn short_name_start(name: &str) -> usize {
    if !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return 0;
    }
    let path = match name.find('<') {
        Some(generic) => &name[..generic],
        None => name,
    };
    path.rfind("::").map_or(0, |sep| sep + 2)
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeDescriptor {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeDescriptor {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Identity of a component instance, borrowed from the renderer.
///
/// `component_type` may be costly (reflection, registry lookup, string
/// building); callers only invoke it once a diagnostic is known to be wanted.
pub trait ComponentIdentity {
    /// The component's id.
    fn component_id(&self) -> ComponentId;

    /// The component's runtime type descriptor.
    fn component_type(&self) -> TypeDescriptor;
}

impl<C: ComponentIdentity + ?Sized> ComponentIdentity for &C {
    fn component_id(&self) -> ComponentId {
        (**self).component_id()
    }

    fn component_type(&self) -> TypeDescriptor {
        (**self).component_type()
    }
}

/// A plain id + type pair, for renderers that register names explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    id: ComponentId,
    ty: TypeDescriptor,
}

impl ComponentRef {
    /// Create a component reference.
    pub fn new(id: impl Into<ComponentId>, ty: impl Into<TypeDescriptor>) -> Self {
        Self {
            id: id.into(),
            ty: ty.into(),
        }
    }
}

impl ComponentIdentity for ComponentRef {
    fn component_id(&self) -> ComponentId {
        self.id
    }

    fn component_type(&self) -> TypeDescriptor {
        self.ty.clone()
    }
}

/// The payload of an inbound event, described by its runtime type.
///
/// Implemented for every sized type; pass payloads as `&dyn EventPayload`
/// so the concrete type is resolved through the vtable.
pub trait EventPayload {
    /// The payload's runtime type descriptor.
    fn payload_type(&self) -> TypeDescriptor;
}

impl<T> EventPayload for T {
    fn payload_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClickArgs;

    mod widgets {
        pub struct Grid<T>(pub T);
    }

    #[test]
    fn test_short_name_strips_path() {
        let ty = TypeDescriptor::of::<ClickArgs>();
        assert!(ty.full_name().ends_with("::ClickArgs"));
        assert_eq!(ty.short_name(), "ClickArgs");
    }

    #[test]
    fn test_short_name_keeps_generics() {
        let ty = TypeDescriptor::of::<widgets::Grid<ClickArgs>>();
        assert!(ty.short_name().starts_with("Grid<"));
        assert!(ty.short_name().ends_with("ClickArgs>"));
    }

    #[test]
    fn test_short_name_without_path() {
        let ty = TypeDescriptor::new("Counter");
        assert_eq!(ty.short_name(), "Counter");
        assert_eq!(ty.into_short_name(), "Counter");
    }

    #[test]
    fn test_short_name_keeps_compound_types() {
        let pair = TypeDescriptor::new("(app::A, app::B)");
        assert_eq!(pair.short_name(), "(app::A, app::B)");

        let slice = TypeDescriptor::of::<&[ClickArgs]>();
        assert_eq!(slice.short_name(), slice.full_name());

        let array = TypeDescriptor::new("[app::Row; 4]");
        assert_eq!(array.into_short_name(), "[app::Row; 4]");
    }

    #[test]
    fn test_into_short_name_owned() {
        let ty = TypeDescriptor::new(String::from("app::pages::Index"));
        assert_eq!(ty.into_short_name(), "Index");
    }

    #[test]
    fn test_payload_type_through_dyn() {
        let payload: &dyn EventPayload = &ClickArgs;
        assert_eq!(payload.payload_type().short_name(), "ClickArgs");
    }

    #[test]
    fn test_component_ref() {
        let component = ComponentRef::new(3u32, "app::Counter");
        assert_eq!(component.component_id(), ComponentId::new(3));
        assert_eq!(component.component_type().full_name(), "app::Counter");
    }
}
