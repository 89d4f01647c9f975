//! Builds [`ClassDescription`]s from catalogued type shapes.
//!
//! The introspector walks a subject type and its supertypes, keeping:
//!
//! - **accessors**: public, non-static, zero-argument, non-void methods that
//!   follow the getter convention, or that the [`InclusionPolicy`] admits;
//! - **fields**: public, non-static fields (plus declared non-public ones
//!   when enabled), minus fields already exposed through an accessor.
//!
//! Overridden accessors are seen on every level of the hierarchy; the most
//! derived declaration wins, so each property name appears exactly once.

use tracing::debug;

use crate::catalog::{FieldShape, MethodShape, TypeCatalog, TypeKind, TypeShape};
use crate::description::{
    ClassDescription, PropertyDescription, PropertyOrigin, PropertySet,
};
use crate::error::CoreError;
use crate::name::TypeName;
use crate::naming;
use crate::shape::{self, MemberKind};

/// Synthetic accessor every enumeration inherits; never a property.
const ENUM_DECLARING_TYPE_ACCESSOR: &str = "getDeclaringClass";

/// Decides which members are eligible beyond the getter naming convention.
///
/// The default implementations admit nothing extra.
pub trait InclusionPolicy {
    /// Admit every zero-argument member declared on `owner`.
    fn include_type(&self, _owner: &TypeShape) -> bool {
        false
    }

    /// Admit this particular zero-argument member.
    fn include_member(&self, _owner: &TypeShape, _method: &MethodShape) -> bool {
        false
    }
}

/// Only members following the getter convention are eligible.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetterConventionOnly;

impl InclusionPolicy for GetterConventionOnly {}

/// Members (or whole types) carrying a metadata marker are eligible.
#[derive(Debug, Clone)]
pub struct MarkerPolicy {
    marker: String,
}

impl MarkerPolicy {
    pub fn new(marker: impl Into<String>) -> Self {
        MarkerPolicy {
            marker: marker.into(),
        }
    }
}

impl InclusionPolicy for MarkerPolicy {
    fn include_type(&self, owner: &TypeShape) -> bool {
        owner.has_marker(&self.marker)
    }

    fn include_member(&self, _owner: &TypeShape, method: &MethodShape) -> bool {
        method.has_marker(&self.marker)
    }
}

/// A caller-supplied member predicate.
pub struct FnPolicy<F>(pub F);

impl<F> InclusionPolicy for FnPolicy<F>
where
    F: Fn(&TypeShape, &MethodShape) -> bool,
{
    fn include_member(&self, owner: &TypeShape, method: &MethodShape) -> bool {
        (self.0)(owner, method)
    }
}

/// Produces [`ClassDescription`]s from a [`TypeCatalog`].
pub struct Introspector<'a, C: TypeCatalog + ?Sized> {
    catalog: &'a C,
    inclusion: Box<dyn InclusionPolicy + 'a>,
    include_non_public_fields: bool,
}

impl<'a, C: TypeCatalog + ?Sized> Introspector<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Introspector {
            catalog,
            inclusion: Box::new(GetterConventionOnly),
            include_non_public_fields: false,
        }
    }

    /// Replaces the member eligibility policy.
    pub fn with_inclusion(mut self, policy: impl InclusionPolicy + 'a) -> Self {
        self.inclusion = Box::new(policy);
        self
    }

    /// Also describe non-public instance fields declared on the subject.
    pub fn include_non_public_fields(mut self, enabled: bool) -> Self {
        self.include_non_public_fields = enabled;
        self
    }

    /// Describes the type registered under `name`.
    ///
    /// Fails with [`CoreError::ClassNotFound`] for unknown types and
    /// [`CoreError::InvalidArgument`] for anonymous or local types.
    pub fn extract_description(&self, name: &TypeName) -> Result<ClassDescription, CoreError> {
        let subject = self
            .catalog
            .shape(name)
            .ok_or_else(|| CoreError::ClassNotFound {
                name: name.qualified(),
            })?;
        match subject.kind {
            TypeKind::Anonymous => return Err(CoreError::unnameable(name, "anonymous")),
            TypeKind::Local => return Err(CoreError::unnameable(name, "local")),
            _ => {}
        }

        // 1. Accessors declared here, then inherited ones not overridden.
        let declared_accessors = self.accessors_of(subject, subject);
        let mut accessors = declared_accessors.clone();
        for sup in self.catalog.supertypes(name) {
            let Some(owner) = sup.name().and_then(|n| self.catalog.shape(n)) else {
                continue;
            };
            for (property, description) in self.accessors_of(subject, owner) {
                accessors.entry(property).or_insert(description);
            }
        }

        // 2. Fields, skipping those an accessor already exposes.
        let mut declared_fields = PropertySet::new();
        for field in &subject.fields {
            let admitted = field.visibility.is_public() || self.include_non_public_fields;
            if field.is_static || !admitted {
                continue;
            }
            if let Some(description) = self.field_property(field, &accessors) {
                declared_fields.insert(description.name.clone(), description);
            }
        }
        let mut fields = declared_fields.clone();
        for ancestor in self.catalog.superclass_chain(name) {
            let Some(owner) = self.catalog.shape(&ancestor) else {
                continue;
            };
            for field in owner
                .fields
                .iter()
                .filter(|f| f.visibility.is_public() && !f.is_static)
            {
                if fields.contains_key(&field.name) {
                    continue;
                }
                if let Some(description) = self.field_property(field, &accessors) {
                    fields.insert(description.name.clone(), description);
                }
            }
        }

        let supertype = subject
            .supertype
            .as_ref()
            .and_then(|sup| sup.name())
            .filter(|sup| **sup != TypeName::object())
            .cloned();

        debug!(
            subject = %name,
            accessors = accessors.len(),
            fields = fields.len(),
            "described type"
        );

        Ok(ClassDescription {
            subject: subject.name.clone(),
            kind: subject.kind,
            subject_shape: shape::classify_subject(self.catalog, subject),
            supertype,
            implements_comparable: self.catalog.implements_comparable(name),
            accessors,
            fields,
            declared_accessors,
            declared_fields,
        })
    }

    /// Eligible accessors declared on `owner`, as seen from `subject`.
    fn accessors_of(&self, subject: &TypeShape, owner: &TypeShape) -> PropertySet {
        let include_all = self.inclusion.include_type(owner);
        let mut out = PropertySet::new();

        for method in &owner.methods {
            let Some(return_type) = method.return_type.as_ref() else {
                continue;
            };
            if method.is_static || !method.parameters.is_empty() || !method.visibility.is_public() {
                continue;
            }
            if subject.kind == TypeKind::Enumeration && method.name == ENUM_DECLARING_TYPE_ACCESSOR {
                continue;
            }
            let by_convention = naming::is_getter_name(&method.name, shape::is_boolean(return_type));
            if !by_convention && !include_all && !self.inclusion.include_member(owner, method) {
                continue;
            }

            let property = naming::property_name_of(&method.name);
            if out.contains_key(&property) {
                debug!(owner = %owner.name, member = %method.name, "duplicate accessor ignored");
                continue;
            }
            let description = PropertyDescription {
                name: property.clone(),
                member: method.name.clone(),
                value_type: return_type.clone(),
                shape: shape::classify(self.catalog, &method.name, MemberKind::Accessor, return_type),
                origin: PropertyOrigin::Accessor {
                    failures: method.throws.clone(),
                },
            };
            out.insert(property, description);
        }
        out
    }

    /// Describes a field unless an accessor already covers it.
    fn field_property(
        &self,
        field: &FieldShape,
        accessors: &PropertySet,
    ) -> Option<PropertyDescription> {
        if let Some(covering) = covering_accessor(field, accessors) {
            debug!(
                field = %field.name,
                accessor = %covering.member,
                "field already exposed by accessor"
            );
            return None;
        }
        Some(PropertyDescription {
            name: field.name.clone(),
            member: field.name.clone(),
            value_type: field.field_type.clone(),
            shape: shape::classify(self.catalog, &field.name, MemberKind::Field, &field.field_type),
            origin: PropertyOrigin::Field {
                visibility: field.visibility,
            },
        })
    }
}

/// Describes `name` with the default getter-convention policy.
pub fn extract_description<C: TypeCatalog + ?Sized>(
    catalog: &C,
    name: &TypeName,
) -> Result<ClassDescription, CoreError> {
    Introspector::new(catalog).extract_description(name)
}

/// The accessor exposing the same data as `field`: same value type, and
/// either the conventional getter name or, for booleans, any predicate
/// form of the field name.
fn covering_accessor<'p>(
    field: &FieldShape,
    accessors: &'p PropertySet,
) -> Option<&'p PropertyDescription> {
    let getter = naming::getter_name_for(&field.name);
    let predicates = if shape::is_boolean(&field.field_type) {
        naming::predicate_closure(&field.name)
    } else {
        Vec::new()
    };
    accessors.values().find(|accessor| {
        accessor.value_type == field.field_type
            && (accessor.member == getter || predicates.contains(&accessor.member))
    })
}
