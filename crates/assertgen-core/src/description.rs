//! Immutable descriptions of a type's generateable surface.
//!
//! A [`ClassDescription`] is built once per type by the
//! [`Introspector`](crate::introspect::Introspector) and then consumed
//! read-only by code synthesis. Property sets are keyed and ordered by the
//! normalized property name, so each property appears at most once.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{TypeKind, Visibility};
use crate::name::{TypeName, TypeRef};
use crate::naming;
use crate::shape::PropertyShape;

/// Where a property's value comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum PropertyOrigin {
    /// A zero-argument accessor, with the checked failures it declares.
    Accessor { failures: Vec<TypeName> },
    /// An instance field.
    Field { visibility: Visibility },
}

/// One property of a described type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescription {
    /// Normalized name (`isActive` → `active`).
    pub name: String,
    /// Declared accessor or field name, used to rebuild the access expression.
    pub member: String,
    /// Declared value type.
    pub value_type: TypeRef,
    pub shape: PropertyShape,
    pub origin: PropertyOrigin,
}

impl PropertyDescription {
    pub fn is_accessor(&self) -> bool {
        matches!(self.origin, PropertyOrigin::Accessor { .. })
    }

    pub fn is_field(&self) -> bool {
        matches!(self.origin, PropertyOrigin::Field { .. })
    }

    /// Declared checked failures; always empty for fields.
    pub fn failures(&self) -> &[TypeName] {
        match &self.origin {
            PropertyOrigin::Accessor { failures } => failures,
            PropertyOrigin::Field { .. } => &[],
        }
    }

    /// Whether a field must be read through the non-public extraction helper.
    pub fn is_non_public_field(&self) -> bool {
        matches!(self.origin, PropertyOrigin::Field { visibility } if !visibility.is_public())
    }

    /// Predicate method name used in generated assertions (`isRookie`).
    pub fn predicate(&self) -> String {
        naming::predicate_for(&self.member)
    }

    /// Negated predicate method name (`isNotRookie`).
    pub fn negative_predicate(&self) -> String {
        naming::negative_predicate_for(&self.predicate())
    }
}

/// Properties keyed by normalized name.
pub type PropertySet = BTreeMap<String, PropertyDescription>;

/// The introspected model of one type.
///
/// Equality and ordering consider the subject type only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDescription {
    pub subject: TypeName,
    pub kind: TypeKind,
    /// Shape of the subject itself (enumerations enumerate their constants).
    pub subject_shape: PropertyShape,
    /// Immediate superclass, when it is a nameable type other than `Object`.
    pub supertype: Option<TypeName>,
    pub implements_comparable: bool,
    /// Accessors visible on the subject, inherited ones included.
    pub accessors: PropertySet,
    /// Public fields visible on the subject, inherited ones included.
    pub fields: PropertySet,
    /// Accessors declared directly on the subject.
    pub declared_accessors: PropertySet,
    /// Fields declared directly on the subject.
    pub declared_fields: PropertySet,
}

impl ClassDescription {
    /// Package of the subject.
    pub fn package(&self) -> &str {
        self.subject.package()
    }

    /// `PlayerAssert`.
    pub fn assert_class_name(&self) -> String {
        naming::assert_class_name(&self.subject)
    }

    /// `AbstractPlayerAssert`.
    pub fn abstract_assert_class_name(&self) -> String {
        naming::abstract_assert_class_name(&self.subject)
    }

    pub fn assert_class_file_name(&self) -> String {
        format!("{}{}", self.assert_class_name(), naming::SOURCE_FILE_EXTENSION)
    }

    pub fn abstract_assert_class_file_name(&self) -> String {
        format!(
            "{}{}",
            self.abstract_assert_class_name(),
            naming::SOURCE_FILE_EXTENSION
        )
    }

    /// `com.acme.PlayerAssert`, placed in `package` or the subject's package.
    pub fn fully_qualified_assert_class_name(&self, package: Option<&str>) -> String {
        naming::qualify(package.unwrap_or(self.package()), &self.assert_class_name())
    }

    pub fn has_accessor_named(&self, property: &str) -> bool {
        self.accessors.contains_key(property)
    }

    pub fn has_declared_accessor_named(&self, property: &str) -> bool {
        self.declared_accessors.contains_key(property)
    }

    /// Whether any visible accessor is declared under `member` exactly.
    pub fn has_accessor_member(&self, member: &str) -> bool {
        self.accessors.values().any(|p| p.member == member)
    }

    /// Declared-only properties: accessors first, then fields not already
    /// exposed by an accessor of the same name.
    pub fn declared_properties(&self) -> impl Iterator<Item = &PropertyDescription> {
        self.declared_accessors.values().chain(
            self.declared_fields
                .values()
                .filter(|f| !self.has_accessor_named(&f.name)),
        )
    }

    /// All properties in the same accessor-then-field order.
    pub fn all_properties(&self) -> impl Iterator<Item = &PropertyDescription> {
        self.accessors.values().chain(
            self.fields
                .values()
                .filter(|f| !self.has_accessor_named(&f.name)),
        )
    }
}

impl PartialEq for ClassDescription {
    fn eq(&self, other: &Self) -> bool {
        self.subject == other.subject
    }
}

impl Eq for ClassDescription {}

impl PartialOrd for ClassDescription {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassDescription {
    fn cmp(&self, other: &Self) -> Ordering {
        self.subject.cmp(&other.subject)
    }
}
