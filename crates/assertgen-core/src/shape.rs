//! Semantic classification of property types.
//!
//! Every property gets exactly one [`PropertyShape`], which later decides
//! the template used to render its assertion. Classification order:
//!
//! 1. arrays
//! 2. enumerable types (minus the catalog's deny-list)
//! 3. booleans named like predicates (fields: every boolean)
//! 4. floating, integral and character numbers
//! 5. everything else
//!
//! Element types of enumerables fall back to `java.lang.Object` whenever
//! generic information is missing, erased or not concrete.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{TypeCatalog, TypeKind, TypeShape};
use crate::name::{TypeName, TypeRef};
use crate::naming;

/// Semantic category of a property's declared type.
///
/// `boxed` distinguishes wrapper types (which may be null) from primitives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PropertyShape {
    Plain,
    Predicate { boxed: bool },
    RealNumber { boxed: bool },
    WholeNumber { boxed: bool },
    Char { boxed: bool },
    Array { element: TypeRef },
    Enumerable { element: TypeRef },
}

/// Which kind of member a type was declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Accessor,
    Field,
}

impl PropertyShape {
    /// Element type of an array or enumerable.
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            PropertyShape::Array { element } | PropertyShape::Enumerable { element } => {
                Some(element)
            }
            _ => None,
        }
    }

    pub fn is_predicate(&self) -> bool {
        matches!(self, PropertyShape::Predicate { .. })
    }

    /// Whether the value is a primitive wrapper.
    pub fn is_boxed(&self) -> bool {
        match self {
            PropertyShape::Predicate { boxed }
            | PropertyShape::RealNumber { boxed }
            | PropertyShape::WholeNumber { boxed }
            | PropertyShape::Char { boxed } => *boxed,
            _ => false,
        }
    }

    /// Whether the value is a primitive (numbers, chars and predicates
    /// that are not boxed).
    pub fn is_primitive(&self) -> bool {
        match self {
            PropertyShape::Predicate { boxed }
            | PropertyShape::RealNumber { boxed }
            | PropertyShape::WholeNumber { boxed }
            | PropertyShape::Char { boxed } => !*boxed,
            _ => false,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            PropertyShape::Plain => "plain",
            PropertyShape::Predicate { .. } => "predicate",
            PropertyShape::RealNumber { .. } => "real_number",
            PropertyShape::WholeNumber { .. } => "whole_number",
            PropertyShape::Char { .. } => "char",
            PropertyShape::Array { .. } => "array",
            PropertyShape::Enumerable { .. } => "enumerable",
        }
    }
}

impl fmt::Display for PropertyShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element() {
            Some(element) => write!(f, "{}<{}>", self.tag(), element),
            None if self.is_boxed() => write!(f, "boxed {}", self.tag()),
            None => f.write_str(self.tag()),
        }
    }
}

/// Classifies the declared type of a member.
///
/// `member_name` is the accessor or field name as declared (`isRookie`,
/// `rookie`).
pub fn classify<C: TypeCatalog + ?Sized>(
    catalog: &C,
    member_name: &str,
    kind: MemberKind,
    declared: &TypeRef,
) -> PropertyShape {
    let name = match declared {
        TypeRef::Array(component) => {
            return PropertyShape::Array {
                element: resolve_element(component),
            };
        }
        TypeRef::Named { name, .. } => name,
        // A bare type variable or wildcard tells nothing beyond Object.
        TypeRef::Variable(_) | TypeRef::Wildcard(_) => return PropertyShape::Plain,
    };

    if catalog.is_enumerable(name) {
        return PropertyShape::Enumerable {
            element: enumerable_element(catalog, declared),
        };
    }

    let Some(keyword) = name.primitive_keyword() else {
        return PropertyShape::Plain;
    };
    let boxed = name.is_boxed();
    match keyword {
        "boolean" => {
            let named_as_predicate = match kind {
                MemberKind::Field => true,
                MemberKind::Accessor => naming::is_getter_name(member_name, true),
            };
            if named_as_predicate {
                PropertyShape::Predicate { boxed }
            } else {
                PropertyShape::Plain
            }
        }
        "float" | "double" => PropertyShape::RealNumber { boxed },
        "byte" | "short" | "int" | "long" => PropertyShape::WholeNumber { boxed },
        "char" => PropertyShape::Char { boxed },
        _ => PropertyShape::Plain,
    }
}

/// Shape of a subject type itself. Enumeration types enumerate their own
/// constants.
pub fn classify_subject<C: TypeCatalog + ?Sized>(catalog: &C, shape: &TypeShape) -> PropertyShape {
    if shape.kind == TypeKind::Enumeration {
        return PropertyShape::Enumerable {
            element: TypeRef::named(shape.name.clone()),
        };
    }
    let usage = TypeRef::named(shape.name.clone());
    if catalog.is_enumerable(&shape.name) {
        PropertyShape::Enumerable {
            element: enumerable_element(catalog, &usage),
        }
    } else {
        PropertyShape::Plain
    }
}

/// Element type of an enumerable usage: whatever the usage binds
/// `Iterable`'s parameter to, else the top type.
fn enumerable_element<C: TypeCatalog + ?Sized>(catalog: &C, declared: &TypeRef) -> TypeRef {
    match catalog.iterable_argument(declared) {
        Some(arg) => resolve_element(&arg),
        None => {
            tracing::debug!(
                declared = %declared,
                "no generic element information, falling back to Object"
            );
            TypeRef::object()
        }
    }
}

/// Reduces a generic argument to a concrete element type.
fn resolve_element(arg: &TypeRef) -> TypeRef {
    match arg {
        TypeRef::Named { name, args } => {
            if args.iter().all(TypeRef::is_concrete) {
                arg.clone()
            } else {
                TypeRef::named(name.clone())
            }
        }
        TypeRef::Array(component) => TypeRef::array_of(resolve_element(component)),
        TypeRef::Wildcard(Some(bound)) => resolve_element(bound),
        TypeRef::Wildcard(None) | TypeRef::Variable(_) => TypeRef::object(),
    }
}

/// Whether `declared` is `boolean` or `java.lang.Boolean`.
pub fn is_boolean(declared: &TypeRef) -> bool {
    declared
        .name()
        .and_then(TypeName::primitive_keyword)
        .is_some_and(|k| k == "boolean")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    fn ty(sig: &str) -> TypeRef {
        TypeRef::parse(sig).unwrap()
    }

    fn accessor(catalog: &InMemoryCatalog, member: &str, sig: &str) -> PropertyShape {
        classify(catalog, member, MemberKind::Accessor, &ty(sig))
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with(
                TypeShape::class(TypeName::new("com.acme", "Roster"))
                    .implementing(ty("java.lang.Iterable<com.acme.Player>")),
            )
            .with(
                TypeShape::class(TypeName::new("com.acme", "Keyed"))
                    .with_type_parameters(["K", "V"])
                    .implementing(ty("java.lang.Iterable<V>")),
            )
            .with(
                TypeShape::class(TypeName::new("com.acme", "Squad"))
                    .with_type_parameters(["T"])
                    .extending(ty("com.acme.Keyed<java.lang.String, T>")),
            )
            .with(
                TypeShape::class(TypeName::new("com.acme", "Bench"))
                    .extending(ty("java.util.ArrayList<com.acme.Player>")),
            )
            .with(
                TypeShape::class(TypeName::new("java.lang", "Throwable"))
                    .implementing(ty("java.lang.Iterable")),
            )
    }

    #[test]
    fn arrays_carry_component_type() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "getScores", "int[]"),
            PropertyShape::Array { element: ty("int") }
        );
        assert_eq!(
            accessor(&c, "getGrid", "int[][]"),
            PropertyShape::Array { element: ty("int[]") }
        );
        assert_eq!(
            accessor(&c, "getItems", "T[]"),
            PropertyShape::Array { element: TypeRef::object() }
        );
    }

    #[test]
    fn enumerable_with_generic_argument() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "getTeamMates", "java.util.List<com.acme.Player>"),
            PropertyShape::Enumerable { element: ty("com.acme.Player") }
        );
    }

    #[test]
    fn enumerable_of_arrays_keeps_array_element() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "getPoints", "java.util.List<int[]>"),
            PropertyShape::Enumerable { element: ty("int[]") }
        );
    }

    #[test]
    fn raw_or_variable_elements_fall_back_to_object() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "getThings", "java.util.List"),
            PropertyShape::Enumerable { element: TypeRef::object() }
        );
        assert_eq!(
            accessor(&c, "getThings", "java.util.Set<T>"),
            PropertyShape::Enumerable { element: TypeRef::object() }
        );
        assert_eq!(
            accessor(&c, "getThings", "java.util.Set<?>"),
            PropertyShape::Enumerable { element: TypeRef::object() }
        );
        assert_eq!(
            accessor(&c, "getThings", "java.util.Set<? extends java.lang.Number>"),
            PropertyShape::Enumerable { element: ty("java.lang.Number") }
        );
    }

    #[test]
    fn unparameterized_enumerable_type_yields_object_element() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "getExceptionChain", "java.lang.Throwable"),
            PropertyShape::Enumerable { element: TypeRef::object() }
        );
    }

    #[test]
    fn element_from_implemented_iterable() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "getRoster", "com.acme.Roster"),
            PropertyShape::Enumerable { element: ty("com.acme.Player") }
        );
    }

    #[test]
    fn element_comes_from_the_iterable_binding_not_the_first_argument() {
        let c = catalog();
        // Roster binds Iterable<Player> itself; its own argument is unrelated.
        assert_eq!(
            accessor(&c, "getRoster", "com.acme.Roster<java.lang.String>"),
            PropertyShape::Enumerable { element: ty("com.acme.Player") }
        );
        assert_eq!(
            accessor(&c, "getLineup", "com.acme.Keyed<java.lang.String, com.acme.Player>"),
            PropertyShape::Enumerable { element: ty("com.acme.Player") }
        );
    }

    #[test]
    fn element_is_mapped_through_intermediate_supertypes() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "getSquad", "com.acme.Squad<com.acme.Player>"),
            PropertyShape::Enumerable { element: ty("com.acme.Player") }
        );
        assert_eq!(
            accessor(&c, "getBench", "com.acme.Bench"),
            PropertyShape::Enumerable { element: ty("com.acme.Player") }
        );
        // Raw usage leaves the parameter unbound.
        assert_eq!(
            accessor(&c, "getLineup", "com.acme.Keyed"),
            PropertyShape::Enumerable { element: TypeRef::object() }
        );
    }

    #[test]
    fn deny_listed_path_is_plain() {
        let c = catalog();
        assert_eq!(accessor(&c, "getHome", "java.nio.file.Path"), PropertyShape::Plain);
    }

    #[test]
    fn predicates_need_predicate_names_on_accessors() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "isRookie", "boolean"),
            PropertyShape::Predicate { boxed: false }
        );
        assert_eq!(
            accessor(&c, "getActive", "java.lang.Boolean"),
            PropertyShape::Predicate { boxed: true }
        );
        assert_eq!(accessor(&c, "valid", "boolean"), PropertyShape::Plain);
        assert_eq!(
            classify(&c, "rookie", MemberKind::Field, &ty("boolean")),
            PropertyShape::Predicate { boxed: false }
        );
    }

    #[test]
    fn numbers_and_chars() {
        let c = catalog();
        assert_eq!(
            accessor(&c, "getHeight", "double"),
            PropertyShape::RealNumber { boxed: false }
        );
        assert_eq!(
            accessor(&c, "getWeight", "java.lang.Float"),
            PropertyShape::RealNumber { boxed: true }
        );
        assert_eq!(
            accessor(&c, "getAge", "long"),
            PropertyShape::WholeNumber { boxed: false }
        );
        assert_eq!(
            accessor(&c, "getNumber", "java.lang.Integer"),
            PropertyShape::WholeNumber { boxed: true }
        );
        assert_eq!(accessor(&c, "getGrade", "char"), PropertyShape::Char { boxed: false });
        assert_eq!(
            accessor(&c, "getInitial", "java.lang.Character"),
            PropertyShape::Char { boxed: true }
        );
        assert_eq!(accessor(&c, "getName", "java.lang.String"), PropertyShape::Plain);
    }

    #[test]
    fn enumeration_subject_enumerates_itself() {
        let c = catalog();
        let color = TypeShape::new(TypeName::new("com.acme", "Color"), TypeKind::Enumeration);
        assert_eq!(
            classify_subject(&c, &color),
            PropertyShape::Enumerable { element: ty("com.acme.Color") }
        );
        let player = TypeShape::class(TypeName::new("com.acme", "Player"));
        assert_eq!(classify_subject(&c, &player), PropertyShape::Plain);
    }

    #[test]
    fn shape_flags() {
        assert!(PropertyShape::Char { boxed: true }.is_boxed());
        assert!(PropertyShape::Char { boxed: false }.is_primitive());
        assert!(!PropertyShape::Plain.is_primitive());
        assert_eq!(
            PropertyShape::Enumerable { element: ty("com.acme.Player") }.to_string(),
            "enumerable<com.acme.Player>"
        );
    }
}
