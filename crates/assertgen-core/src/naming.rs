//! Naming conventions: getters, predicates, reserved words and companion
//! class names.

use crate::name::TypeName;

pub const GETTER_PREFIX: &str = "get";
pub const IS_PREFIX: &str = "is";
pub const ASSERT_CLASS_SUFFIX: &str = "Assert";
pub const ABSTRACT_ASSERT_CLASS_PREFIX: &str = "Abstract";
pub const SOURCE_FILE_EXTENSION: &str = ".java";

/// One predicate prefix and the phrasing used around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateForm {
    /// Prefix as it appears in a method name (`is`, `doesNotHave`).
    pub prefix: &'static str,
    /// The opposite prefix (`isNot`, `has`).
    pub negation: &'static str,
    /// Words used in javadoc (`is`, `does not have`).
    pub javadoc: &'static str,
    /// Words used in failure messages (`to be`, `not to have`).
    pub error_message: &'static str,
}

const fn form(
    prefix: &'static str,
    negation: &'static str,
    javadoc: &'static str,
    error_message: &'static str,
) -> PredicateForm {
    PredicateForm {
        prefix,
        negation,
        javadoc,
        error_message,
    }
}

/// Every recognised predicate form. A prefix always precedes the shorter
/// prefixes it extends, so `cannotBe` wins over `cannot` and `can`.
const PREDICATE_FORMS: [PredicateForm; 18] = [
    form("doesNotHave", "has", "does not have", "not to have"),
    form("shouldNotBe", "shouldBe", "should not be", "not to be"),
    form("cannotBe", "canBe", "cannot be", "not to be able to be"),
    form("willNotBe", "willBe", "will not be", "not to be"),
    form("shouldBe", "shouldNotBe", "should be", "to be"),
    form("shouldNot", "should", "should not", "not to"),
    form("willNot", "will", "will not", "not to"),
    form("wasNot", "was", "was not", "not to have been"),
    form("willBe", "willNotBe", "will be", "to be"),
    form("cannot", "can", "cannot", "not to be able to"),
    form("should", "shouldNot", "should", "to"),
    form("canBe", "cannotBe", "can be", "to be able to be"),
    form("isNot", "is", "is not", "not to be"),
    form("will", "willNot", "will", "to"),
    form("has", "doesNotHave", "has", "to have"),
    form("was", "wasNot", "was", "to have been"),
    form("can", "cannot", "can", "to be able to"),
    form("is", "isNot", "is", "to be"),
];

/// Positive predicate prefixes a boolean accessor may start with.
pub const PREDICATE_PREFIXES: [&str; 9] = [
    "is", "has", "was", "can", "canBe", "should", "shouldBe", "will", "willBe",
];

/// Reserved words of the output language.
const RESERVED_WORDS: [&str; 53] = [
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "null", "package", "private", "protected", "public", "return",
    "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// Upper-cases the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character.
pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `name` is `prefix` followed by an upper-case character.
fn has_camel_prefix(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_uppercase())
}

/// The predicate form `name` starts with, if any.
pub fn predicate_form_of(name: &str) -> Option<&'static PredicateForm> {
    PREDICATE_FORMS
        .iter()
        .find(|form| has_camel_prefix(name, form.prefix))
}

/// Whether `name` starts with a positive or negative predicate prefix.
pub fn is_predicate_name(name: &str) -> bool {
    predicate_form_of(name).is_some()
}

/// Whether a zero-argument member named `name` follows the getter
/// convention for a value of the given boolean-ness.
pub fn is_getter_name(name: &str, returns_boolean: bool) -> bool {
    if has_camel_prefix(name, GETTER_PREFIX) {
        return true;
    }
    returns_boolean && is_predicate_name(name)
}

/// Normalized property name of an accessor: `getName` → `name`,
/// `isRookie` → `rookie`. Other predicate prefixes are kept
/// (`hasPower` → `hasPower`). Names that follow no convention are returned
/// unchanged.
pub fn property_name_of(member: &str) -> String {
    for prefix in [GETTER_PREFIX, IS_PREFIX] {
        if has_camel_prefix(member, prefix) {
            return uncapitalize(&member[prefix.len()..]);
        }
    }
    member.to_string()
}

/// Conventional getter name for a field.
pub fn getter_name_for(field: &str) -> String {
    format!("{}{}", GETTER_PREFIX, capitalize(field))
}

/// Every predicate accessor name that could expose a boolean field.
///
/// Includes the field name itself when it already carries a predicate
/// prefix (`hasPower`).
pub fn predicate_closure(field: &str) -> Vec<String> {
    let mut names: Vec<String> = PREDICATE_PREFIXES
        .iter()
        .map(|prefix| format!("{}{}", prefix, capitalize(field)))
        .collect();
    names.push(getter_name_for(field));
    if is_predicate_name(field) {
        names.push(field.to_string());
    }
    names
}

/// The positive or negative predicate method name for a boolean member.
///
/// Members named `getX` or following no predicate convention read as `isX`.
pub fn predicate_for(member: &str) -> String {
    if is_predicate_name(member) {
        return member.to_string();
    }
    let base = if has_camel_prefix(member, GETTER_PREFIX) {
        &member[GETTER_PREFIX.len()..]
    } else {
        member
    };
    format!("{}{}", IS_PREFIX, capitalize(base))
}

/// Opposite of a predicate name: `isValid` ↔ `isNotValid`,
/// `hasPower` ↔ `doesNotHavePower`.
pub fn negative_predicate_for(predicate: &str) -> String {
    match predicate_form_of(predicate) {
        Some(form) => format!("{}{}", form.negation, &predicate[form.prefix.len()..]),
        None => format!("isNot{}", capitalize(predicate)),
    }
}

/// Human phrasing of a predicate for javadoc: `isRookie` → `is rookie`.
pub fn predicate_for_javadoc(predicate: &str) -> String {
    match predicate_form_of(predicate) {
        Some(form) => format!(
            "{} {}",
            form.javadoc,
            uncapitalize(&predicate[form.prefix.len()..])
        ),
        None => predicate.to_string(),
    }
}

/// Phrasing inside a failure message: `isRookie` → `to be rookie`.
pub fn predicate_for_error_message(predicate: &str) -> String {
    match predicate_form_of(predicate) {
        Some(form) => format!(
            "{} {}",
            form.error_message,
            uncapitalize(&predicate[form.prefix.len()..])
        ),
        None => predicate.to_string(),
    }
}

pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// A parameter name that cannot collide with a reserved word.
pub fn safe_name(name: &str) -> String {
    if is_reserved_word(name) {
        format!("expected{}", capitalize(name))
    } else {
        name.to_string()
    }
}

/// `simple` placed in `package`; the default package adds no prefix.
pub fn qualify(package: &str, simple: &str) -> String {
    if package.is_empty() {
        simple.to_string()
    } else {
        format!("{}.{}", package, simple)
    }
}

/// `Player` → `PlayerAssert`; nested `Team.Coach` → `TeamCoachAssert`.
pub fn assert_class_name(subject: &TypeName) -> String {
    format!("{}{}", subject.simple_without_dots(), ASSERT_CLASS_SUFFIX)
}

/// `Player` → `AbstractPlayerAssert`.
pub fn abstract_assert_class_name(subject: &TypeName) -> String {
    format!("{}{}", ABSTRACT_ASSERT_CLASS_PREFIX, assert_class_name(subject))
}

/// Companion class name of a property or element type
/// (`com.acme.Player` → `PlayerAssert`, `int[]` → `IntArrayAssert`).
pub fn assert_type_name(simple_type: &str) -> String {
    let mut base = String::new();
    let mut rest = simple_type;
    let mut dims = 0;
    while let Some(stripped) = rest.strip_suffix("[]") {
        rest = stripped;
        dims += 1;
    }
    let rest = rest.split('<').next().unwrap_or(rest);
    for part in rest.split('.') {
        base.push_str(&capitalize(part));
    }
    for _ in 0..dims {
        base.push_str("Array");
    }
    format!("{}{}", base, ASSERT_CLASS_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getter_convention() {
        assert!(is_getter_name("getName", false));
        assert!(is_getter_name("isRookie", true));
        assert!(is_getter_name("hasPower", true));
        assert!(!is_getter_name("hasPower", false));
        assert!(!is_getter_name("get", false));
        assert!(!is_getter_name("getaway", false));
        assert!(!is_getter_name("island", true));
        assert!(!is_getter_name("size", false));
    }

    #[test]
    fn property_names() {
        assert_eq!(property_name_of("getName"), "name");
        assert_eq!(property_name_of("isActive"), "active");
        assert_eq!(property_name_of("hasPower"), "hasPower");
        assert_eq!(property_name_of("getURL"), "uRL");
        assert_eq!(property_name_of("size"), "size");
    }

    #[test]
    fn predicates_and_negations() {
        assert_eq!(predicate_for("isRookie"), "isRookie");
        assert_eq!(predicate_for("getActive"), "isActive");
        assert_eq!(predicate_for("rookie"), "isRookie");
        assert_eq!(predicate_for("hasPower"), "hasPower");

        assert_eq!(negative_predicate_for("isValid"), "isNotValid");
        assert_eq!(negative_predicate_for("isNotValid"), "isValid");
        assert_eq!(negative_predicate_for("hasPower"), "doesNotHavePower");
        assert_eq!(negative_predicate_for("doesNotHavePower"), "hasPower");
        assert_eq!(negative_predicate_for("canBeSold"), "cannotBeSold");
        assert_eq!(negative_predicate_for("cannotBeSold"), "canBeSold");
        assert_eq!(negative_predicate_for("canFly"), "cannotFly");
        assert_eq!(negative_predicate_for("shouldBeUpdated"), "shouldNotBeUpdated");
        assert_eq!(negative_predicate_for("willRetire"), "willNotRetire");
        assert_eq!(negative_predicate_for("wasInjured"), "wasNotInjured");
    }

    #[test]
    fn predicate_phrasing() {
        assert_eq!(predicate_for_javadoc("isRookie"), "is rookie");
        assert_eq!(predicate_for_javadoc("doesNotHavePower"), "does not have power");
        assert_eq!(predicate_for_error_message("isRookie"), "to be rookie");
        assert_eq!(predicate_for_error_message("isNotRookie"), "not to be rookie");
    }

    #[test]
    fn predicate_closure_covers_all_prefixes() {
        let closure = predicate_closure("rookie");
        assert!(closure.contains(&"isRookie".to_string()));
        assert!(closure.contains(&"willBeRookie".to_string()));
        assert!(closure.contains(&"getRookie".to_string()));
        assert!(!closure.contains(&"rookie".to_string()));

        let prefixed = predicate_closure("hasPower");
        assert!(prefixed.contains(&"hasPower".to_string()));
    }

    #[test]
    fn reserved_words_get_safe_names() {
        assert_eq!(safe_name("default"), "expectedDefault");
        assert_eq!(safe_name("name"), "name");
    }

    #[test]
    fn companion_class_names() {
        let nested = TypeName::nested("com.acme", ["Team"], "Coach");
        assert_eq!(assert_class_name(&nested), "TeamCoachAssert");
        assert_eq!(abstract_assert_class_name(&nested), "AbstractTeamCoachAssert");
        assert_eq!(assert_type_name("Player"), "PlayerAssert");
        assert_eq!(assert_type_name("int[]"), "IntArrayAssert");
        assert_eq!(assert_type_name("java.util.List<Player>"), "JavaUtilListAssert");
    }
}
