pub mod catalog;
pub mod description;
pub mod error;
pub mod introspect;
pub mod name;
pub mod naming;
pub mod shape;

// Re-export commonly used types
pub use catalog::{FieldShape, InMemoryCatalog, MethodShape, TypeCatalog, TypeKind, TypeShape, Visibility};
pub use description::{ClassDescription, PropertyDescription, PropertyOrigin, PropertySet};
pub use error::CoreError;
pub use introspect::{extract_description, FnPolicy, GetterConventionOnly, InclusionPolicy, Introspector, MarkerPolicy};
pub use name::{TypeName, TypeRef};
pub use shape::PropertyShape;
