//! Source synthesis: property bodies and whole assertion classes.
//!
//! Assembly follows the same steps in every mode:
//!
//! 1. take the class skeleton for the mode,
//! 2. append one rendered body per property (property-level placeholders
//!    resolved per body),
//! 3. close the class,
//! 4. resolve class-level placeholders once over the whole buffer,
//! 5. collect imports from the result and fill `${imports}` last.

use std::collections::BTreeSet;

use assertgen_core::{naming, ClassDescription, PropertyDescription, PropertyShape, TypeName};
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::imports::ImportSet;
use crate::placeholder::{without_package_declaration, Placeholder, Substitutions};
use crate::template::{TemplateRegistry, TemplateRole};

/// Parent of a generated class with no generated parent of its own.
pub const OBJECT_ASSERT: &str = "AbstractObjectAssert";
/// [`OBJECT_ASSERT`] variant for subjects with a natural ordering.
pub const COMPARABLE_ASSERT: &str = "AbstractComparableAssert";

const CLASS_TERMINATOR: &str = "}\n";

/// Abstract and concrete units produced in hierarchical mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchicalSource {
    pub abstract_source: String,
    pub concrete_source: String,
}

/// Picks the template a property body is rendered from.
///
/// A predicate whose negated form is itself a visible predicate on the
/// subject (`isValid` next to `isNotValid`) gets the variant without a
/// negated method.
pub fn select_role(property: &PropertyDescription, description: &ClassDescription) -> TemplateRole {
    match &property.shape {
        PropertyShape::Predicate { boxed } => {
            let negation_exists = has_negated_peer(property, description);
            match (*boxed, negation_exists) {
                (false, false) => TemplateRole::Is,
                (false, true) => TemplateRole::IsWithoutNegation,
                (true, false) => TemplateRole::IsWrapper,
                (true, true) => TemplateRole::IsWrapperWithoutNegation,
            }
        }
        PropertyShape::RealNumber { boxed: false } => TemplateRole::HasForRealNumber,
        PropertyShape::RealNumber { boxed: true } => TemplateRole::HasForRealNumberWrapper,
        PropertyShape::WholeNumber { boxed: false } => TemplateRole::HasForWholeNumber,
        PropertyShape::WholeNumber { boxed: true } => TemplateRole::HasForWholeNumberWrapper,
        PropertyShape::Char { boxed: false } => TemplateRole::HasForChar,
        PropertyShape::Char { boxed: true } => TemplateRole::HasForCharacter,
        PropertyShape::Array { .. } => TemplateRole::HasForArray,
        PropertyShape::Enumerable { .. } => TemplateRole::HasForIterable,
        PropertyShape::Plain => TemplateRole::Has,
    }
}

fn has_negated_peer(property: &PropertyDescription, description: &ClassDescription) -> bool {
    let negated = property.negative_predicate();
    description
        .all_properties()
        .filter(|p| p.shape.is_predicate() && p.member != property.member)
        .any(|p| p.member == negated || p.predicate() == negated)
}

/// Expression reading `property` from `actual` in code placed in `package`.
pub fn access_expression(property: &PropertyDescription, package: &str) -> String {
    if property.is_accessor() {
        return format!("actual.{}()", property.member);
    }
    if property.is_non_public_field() {
        let literal = match property.value_type.name() {
            Some(name) if name.is_primitive() => name.boxed().reference_from(package),
            _ => property.value_type.render_raw(package),
        };
        return format!(
            "FieldSupport.EXTRACTION.fieldValue(\"{}\", {}.class, actual)",
            property.member, literal
        );
    }
    format!("actual.{}", property.member)
}

/// Property-level placeholder values for `property` in code placed in `package`.
pub fn property_substitutions(property: &PropertyDescription, package: &str) -> Substitutions {
    let mut subs = Substitutions::new();
    let simple_type = property.value_type.simple_name();
    subs.set(Placeholder::PropertyUpper, naming::capitalize(&property.name))
        .set(Placeholder::PropertySafe, naming::safe_name(&property.name))
        .set(Placeholder::PropertyType, property.value_type.render(package))
        .set(Placeholder::PropertyAssertType, naming::assert_type_name(&simple_type))
        .set(Placeholder::PropertySimpleType, simple_type)
        .set(Placeholder::Getter, access_expression(property, package))
        .set(Placeholder::Throws, throws_clause(property.failures(), package))
        .set(
            Placeholder::ThrowsJavadoc,
            throws_javadoc(property, package),
        );

    if let Some(element) = property.shape.element() {
        subs.set(Placeholder::ElementType, element.render(package)).set(
            Placeholder::ElementAssertType,
            naming::assert_type_name(&element.simple_name()),
        );
    }

    if property.shape.is_predicate() {
        let predicate = property.predicate();
        let negated = property.negative_predicate();
        subs.set(
            Placeholder::PredicateForJavadoc,
            naming::predicate_for_javadoc(&predicate),
        )
        .set(
            Placeholder::NegPredicateForJavadoc,
            naming::predicate_for_javadoc(&negated),
        )
        .set(
            Placeholder::PredicateForErrorMessage,
            naming::predicate_for_error_message(&predicate),
        )
        .set(
            Placeholder::NegPredicateForErrorMessage,
            naming::predicate_for_error_message(&negated),
        )
        .set(Placeholder::Predicate, predicate)
        .set(Placeholder::NegPredicate, negated);
    }

    subs.set(Placeholder::Property, property.name.clone());
    subs
}

fn throws_clause(failures: &[TypeName], package: &str) -> String {
    if failures.is_empty() {
        return String::new();
    }
    let names: Vec<String> = failures.iter().map(|f| f.reference_from(package)).collect();
    format!(" throws {}", names.join(", "))
}

fn throws_javadoc(property: &PropertyDescription, package: &str) -> String {
    let getter = access_expression(property, package);
    property
        .failures()
        .iter()
        .map(|f| {
            format!(
                "\n   * @throws {} if {} throws one.",
                f.reference_from(package),
                getter
            )
        })
        .collect()
}

/// Renders assertion classes from a [`TemplateRegistry`].
#[derive(Debug, Clone)]
pub struct Synthesizer<'r> {
    registry: &'r TemplateRegistry,
    package: Option<String>,
}

impl<'r> Synthesizer<'r> {
    pub fn new(registry: &'r TemplateRegistry) -> Self {
        Synthesizer {
            registry,
            package: None,
        }
    }

    /// Places every generated class in `package` instead of its subject's package.
    pub fn with_package(mut self, package: Option<String>) -> Self {
        self.package = package;
        self
    }

    /// Package the assertion class for `description` lives in.
    pub fn output_package<'d>(&'d self, description: &'d ClassDescription) -> &'d str {
        self.package.as_deref().unwrap_or(description.package())
    }

    fn template(&self, role: TemplateRole) -> Result<&'r str, GenError> {
        self.registry
            .get(role)
            .map(|t| t.content())
            .ok_or(GenError::MissingTemplate { role })
    }

    /// Renders the body of one property.
    pub fn render_property(
        &self,
        property: &PropertyDescription,
        description: &ClassDescription,
    ) -> Result<String, GenError> {
        let role = select_role(property, description);
        let template = self.template(role)?;
        let package = self.output_package(description);
        Ok(property_substitutions(property, package).apply(template))
    }

    /// One self-contained assertion class covering every visible property.
    pub fn synthesize_flat(&self, description: &ClassDescription) -> Result<String, GenError> {
        let assert_class = description.assert_class_name();
        tracing::debug!(subject = %description.subject, class = %assert_class, "synthesizing flat assertion class");

        let mut buffer = self.skeleton(TemplateRole::AssertClass, description)?;
        for property in description.all_properties() {
            buffer.push_str(&self.render_property(property, description)?);
        }
        buffer.push_str(CLASS_TERMINATOR);

        let subs = self
            .class_substitutions(description)
            .with(Placeholder::CustomAssertionClass, assert_class.clone())
            .with(Placeholder::SelfType, assert_class)
            .with(Placeholder::Myself, "this");
        Ok(self.finish(buffer, subs, description, None))
    }

    /// An abstract unit with the declared properties and a concrete unit extending it.
    ///
    /// The abstract unit extends the parent's abstract assertion class only
    /// when the parent is part of `batch`.
    pub fn synthesize_hierarchical(
        &self,
        description: &ClassDescription,
        batch: &BTreeSet<TypeName>,
    ) -> Result<HierarchicalSource, GenError> {
        tracing::debug!(subject = %description.subject, "synthesizing hierarchical assertion classes");

        // Abstract unit
        let generated_parent = description
            .supertype
            .as_ref()
            .filter(|parent| batch.contains(*parent));
        let (super_class, parent_import) = match generated_parent {
            Some(parent) => {
                let parent_package = self.package.as_deref().unwrap_or(parent.package());
                let name = naming::abstract_assert_class_name(parent);
                let qualified = naming::qualify(parent_package, &name);
                (name, Some(qualified))
            }
            None if description.implements_comparable => (COMPARABLE_ASSERT.to_string(), None),
            None => (OBJECT_ASSERT.to_string(), None),
        };

        let mut buffer = self.skeleton(TemplateRole::AbstractAssertClass, description)?;
        for property in description.declared_properties() {
            buffer.push_str(&self.render_property(property, description)?);
        }
        buffer.push_str(CLASS_TERMINATOR);

        let subs = self
            .class_substitutions(description)
            .with(
                Placeholder::CustomAssertionClass,
                description.abstract_assert_class_name(),
            )
            .with(Placeholder::SuperAssertionClass, super_class)
            .with(Placeholder::SelfType, "S")
            .with(Placeholder::Myself, "myself");
        let abstract_source = self.finish(buffer, subs, description, parent_import.as_deref());

        // Concrete unit
        let assert_class = description.assert_class_name();
        let mut buffer = self.skeleton(TemplateRole::HierarchicalAssertClass, description)?;
        buffer.push_str(CLASS_TERMINATOR);
        let subs = self
            .class_substitutions(description)
            .with(Placeholder::CustomAssertionClass, assert_class.clone())
            .with(Placeholder::SelfType, assert_class)
            .with(Placeholder::Myself, "this");
        let concrete_source = self.finish(buffer, subs, description, None);

        Ok(HierarchicalSource {
            abstract_source,
            concrete_source,
        })
    }

    fn skeleton(
        &self,
        role: TemplateRole,
        description: &ClassDescription,
    ) -> Result<String, GenError> {
        let mut skeleton = self.template(role)?.to_string();
        if description.implements_comparable {
            skeleton = skeleton.replace(OBJECT_ASSERT, COMPARABLE_ASSERT);
        }
        if self.output_package(description).is_empty() {
            skeleton = without_package_declaration(&skeleton);
        }
        Ok(skeleton)
    }

    fn class_substitutions(&self, description: &ClassDescription) -> Substitutions {
        Substitutions::new()
            .with(Placeholder::Package, self.output_package(description))
            .with(
                Placeholder::ClassToAssert,
                description.subject.outer_qualified(),
            )
    }

    fn finish(
        &self,
        buffer: String,
        subs: Substitutions,
        description: &ClassDescription,
        extra_import: Option<&str>,
    ) -> String {
        let rendered = subs.apply(&buffer);

        let mut imports = ImportSet::new(self.output_package(description));
        imports.add_type(&description.subject);
        imports.add_helpers_in(&rendered);
        if let Some(qualified) = extra_import {
            imports.add_qualified(qualified);
        }
        Substitutions::new()
            .with(Placeholder::Imports, imports.render())
            .apply(&rendered)
    }
}
