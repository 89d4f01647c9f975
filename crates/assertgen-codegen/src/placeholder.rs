//! The closed vocabulary of template placeholders.
//!
//! Templates mark holes with `${name}` tokens. Every hole a built-in
//! template uses is one [`Placeholder`] variant, and [`Substitutions`]
//! fills them by plain textual replacement.

use std::fmt;

use indexmap::IndexMap;

/// One named hole in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Property,
    PropertyUpper,
    PropertySafe,
    PropertyType,
    PropertySimpleType,
    PropertyAssertType,
    ElementType,
    ElementAssertType,
    Getter,
    Throws,
    ThrowsJavadoc,
    Predicate,
    NegPredicate,
    PredicateForJavadoc,
    NegPredicateForJavadoc,
    PredicateForErrorMessage,
    NegPredicateForErrorMessage,
    Package,
    ClassToAssert,
    CustomAssertionClass,
    SuperAssertionClass,
    SelfType,
    Myself,
    Imports,
    AllAssertionsEntryPoints,
}

impl Placeholder {
    /// The literal token as it appears in template text.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Property => "${property}",
            Placeholder::PropertyUpper => "${Property}",
            Placeholder::PropertySafe => "${property_safe}",
            Placeholder::PropertyType => "${propertyType}",
            Placeholder::PropertySimpleType => "${propertySimpleType}",
            Placeholder::PropertyAssertType => "${propertyAssertType}",
            Placeholder::ElementType => "${elementType}",
            Placeholder::ElementAssertType => "${elementAssertType}",
            Placeholder::Getter => "${getter}",
            Placeholder::Throws => "${throws}",
            Placeholder::ThrowsJavadoc => "${throws_javadoc}",
            Placeholder::Predicate => "${predicate}",
            Placeholder::NegPredicate => "${neg_predicate}",
            Placeholder::PredicateForJavadoc => "${predicate_for_javadoc}",
            Placeholder::NegPredicateForJavadoc => "${neg_predicate_for_javadoc}",
            Placeholder::PredicateForErrorMessage => "${predicate_for_error_message}",
            Placeholder::NegPredicateForErrorMessage => "${neg_predicate_for_error_message}",
            Placeholder::Package => "${package}",
            Placeholder::ClassToAssert => "${class_to_assert}",
            Placeholder::CustomAssertionClass => "${custom_assertion_class}",
            Placeholder::SuperAssertionClass => "${super_assertion_class}",
            Placeholder::SelfType => "${self_type}",
            Placeholder::Myself => "${myself}",
            Placeholder::Imports => "${imports}",
            Placeholder::AllAssertionsEntryPoints => "${all_assertions_entry_points}",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Values for a set of placeholders, applied in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    values: IndexMap<Placeholder, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or replaces) the value of `placeholder`.
    pub fn set(&mut self, placeholder: Placeholder, value: impl Into<String>) -> &mut Self {
        self.values.insert(placeholder, value.into());
        self
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.set(placeholder, value);
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    /// Replaces every occurrence of every known token in `text`.
    ///
    /// Tokens without a value are left untouched.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (placeholder, value) in &self.values {
            if out.contains(placeholder.token()) {
                out = out.replace(placeholder.token(), value);
            }
        }
        out
    }
}

/// Every `${...}` token still present in `text`, in order of appearance.
pub fn unresolved_tokens(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let after = &rest[start..];
        match after.find('}') {
            Some(end) => {
                found.push(after[..=end].to_string());
                rest = &after[end + 1..];
            }
            None => {
                found.push(after.to_string());
                break;
            }
        }
    }
    found
}

/// The package line class templates open with.
pub const PACKAGE_DECLARATION: &str = "package ${package};";

/// `template` without its package line (and the blank line after it),
/// for sources placed in the default package.
pub fn without_package_declaration(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    let mut lines = template.split_inclusive('\n').peekable();
    while let Some(line) = lines.next() {
        if line.trim() == PACKAGE_DECLARATION {
            if lines.peek().is_some_and(|next| next.trim().is_empty()) {
                lines.next();
            }
            continue;
        }
        out.push_str(line);
    }
    out
}
