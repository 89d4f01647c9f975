//! Template roles, the role → template registry, and the template file loader.
//!
//! Every piece of generated text comes from a [`Template`] looked up by its
//! [`TemplateRole`]. A [`TemplateRegistry`] starts from the bodies embedded
//! in the binary and can be overridden role by role, either
//! programmatically or from a directory of template files.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// What a template is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateRole {
    // Class skeletons
    AssertClass,
    HierarchicalAssertClass,
    AbstractAssertClass,

    // Property bodies
    Has,
    HasForArray,
    HasForIterable,
    HasForRealNumber,
    HasForRealNumberWrapper,
    HasForWholeNumber,
    HasForWholeNumberWrapper,
    HasForChar,
    HasForCharacter,
    Is,
    IsWrapper,
    IsWithoutNegation,
    IsWrapperWithoutNegation,

    // Entry-point classes
    AssertionsEntryPointClass,
    BddAssertionsEntryPointClass,
    SoftAssertionsEntryPointClass,
    JUnitSoftAssertionsEntryPointClass,
    AutoCloseableSoftAssertionsEntryPointClass,
    BddSoftAssertionsEntryPointClass,
    JUnitBddSoftAssertionsEntryPointClass,
    AutoCloseableBddSoftAssertionsEntryPointClass,

    // Entry-point methods
    AssertionEntryPoint,
    BddEntryPoint,
    SoftEntryPoint,
    BddSoftEntryPoint,
}

struct RoleInfo {
    role: TemplateRole,
    name: &'static str,
    file_name: &'static str,
    body: &'static str,
}

macro_rules! role {
    ($role:ident, $name:literal, $file:literal) => {
        RoleInfo {
            role: TemplateRole::$role,
            name: $name,
            file_name: $file,
            body: include_str!(concat!("../templates/", $file)),
        }
    };
}

const ROLES: [RoleInfo; 28] = [
    role!(AssertClass, "ASSERT_CLASS", "custom_assertion_class_template.txt"),
    role!(HierarchicalAssertClass, "HIERARCHICAL_ASSERT_CLASS", "custom_hierarchical_assertion_class_template.txt"),
    role!(AbstractAssertClass, "ABSTRACT_ASSERT_CLASS", "custom_abstract_assertion_class_template.txt"),
    role!(Has, "HAS", "has_assertion_template.txt"),
    role!(HasForArray, "HAS_FOR_ARRAY", "has_elements_assertion_template_for_array.txt"),
    role!(HasForIterable, "HAS_FOR_ITERABLE", "has_elements_assertion_template_for_iterable.txt"),
    role!(HasForRealNumber, "HAS_FOR_REAL_NUMBER", "has_assertion_template_for_real_number.txt"),
    role!(HasForRealNumberWrapper, "HAS_FOR_REAL_NUMBER_WRAPPER", "has_assertion_template_for_real_number_wrapper.txt"),
    role!(HasForWholeNumber, "HAS_FOR_WHOLE_NUMBER", "has_assertion_template_for_whole_number.txt"),
    role!(HasForWholeNumberWrapper, "HAS_FOR_WHOLE_NUMBER_WRAPPER", "has_assertion_template_for_whole_number_wrapper.txt"),
    role!(HasForChar, "HAS_FOR_CHAR", "has_assertion_template_for_char.txt"),
    role!(HasForCharacter, "HAS_FOR_CHARACTER", "has_assertion_template_for_character.txt"),
    role!(Is, "IS", "is_assertion_template.txt"),
    role!(IsWrapper, "IS_WRAPPER", "is_wrapper_assertion_template.txt"),
    role!(IsWithoutNegation, "IS_WITHOUT_NEGATION", "is_without_negation_assertion_template.txt"),
    role!(IsWrapperWithoutNegation, "IS_WRAPPER_WITHOUT_NEGATION", "is_wrapper_without_negation_assertion_template.txt"),
    role!(AssertionsEntryPointClass, "ASSERTIONS_ENTRY_POINT_CLASS", "standard_assertions_entry_point_class_template.txt"),
    role!(BddAssertionsEntryPointClass, "BDD_ASSERTIONS_ENTRY_POINT_CLASS", "bdd_assertions_entry_point_class_template.txt"),
    role!(SoftAssertionsEntryPointClass, "SOFT_ASSERTIONS_ENTRY_POINT_CLASS", "soft_assertions_entry_point_class_template.txt"),
    role!(JUnitSoftAssertionsEntryPointClass, "JUNIT_SOFT_ASSERTIONS_ENTRY_POINT_CLASS", "junit_soft_assertions_entry_point_class_template.txt"),
    role!(AutoCloseableSoftAssertionsEntryPointClass, "AUTO_CLOSEABLE_SOFT_ASSERTIONS_ENTRY_POINT_CLASS", "auto_closeable_soft_assertions_entry_point_class_template.txt"),
    role!(BddSoftAssertionsEntryPointClass, "BDD_SOFT_ASSERTIONS_ENTRY_POINT_CLASS", "bdd_soft_assertions_entry_point_class_template.txt"),
    role!(JUnitBddSoftAssertionsEntryPointClass, "JUNIT_BDD_SOFT_ASSERTIONS_ENTRY_POINT_CLASS", "junit_bdd_soft_assertions_entry_point_class_template.txt"),
    role!(AutoCloseableBddSoftAssertionsEntryPointClass, "AUTO_CLOSEABLE_BDD_SOFT_ASSERTIONS_ENTRY_POINT_CLASS", "auto_closeable_bdd_soft_assertions_entry_point_class_template.txt"),
    role!(AssertionEntryPoint, "ASSERTION_ENTRY_POINT", "standard_assertion_entry_point_method_template.txt"),
    role!(BddEntryPoint, "BDD_ENTRY_POINT", "bdd_assertion_entry_point_method_template.txt"),
    role!(SoftEntryPoint, "SOFT_ENTRY_POINT", "soft_assertion_entry_point_method_template.txt"),
    role!(BddSoftEntryPoint, "BDD_SOFT_ENTRY_POINT", "bdd_soft_assertion_entry_point_method_template.txt"),
];

impl TemplateRole {
    /// Every role, in declaration order.
    pub fn all() -> impl Iterator<Item = TemplateRole> {
        ROLES.iter().map(|info| info.role)
    }

    fn info(self) -> &'static RoleInfo {
        // ROLES is laid out in declaration order
        &ROLES[self as usize]
    }

    /// Stable `SCREAMING_SNAKE` name.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// File name looked up by [`TemplateRegistry::override_from_dir`].
    pub fn default_file_name(self) -> &'static str {
        self.info().file_name
    }

    /// Body shipped with the generator.
    pub fn default_body(self) -> &'static str {
        self.info().body
    }
}

impl fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateRole {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ROLES
            .iter()
            .find(|info| !wanted.is_empty() && info.name.eq_ignore_ascii_case(wanted))
            .map(|info| info.role)
            .ok_or_else(|| TemplateError::InvalidRole {
                name: s.to_string(),
            })
    }
}

/// A template body bound to its role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    role: TemplateRole,
    content: String,
}

impl Template {
    pub fn new(role: TemplateRole, content: impl Into<String>) -> Self {
        Template {
            role,
            content: content.into(),
        }
    }

    pub fn role(&self) -> TemplateRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Role → template mapping used for one generation run.
///
/// Built once, then shared read-only with every synthesizer.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: IndexMap<TemplateRole, Template>,
}

impl TemplateRegistry {
    /// A registry with no templates at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding the built-in body of every role.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for role in TemplateRole::all() {
            registry.register(Template::new(role, role.default_body()));
        }
        registry
    }

    /// Registers `template`, replacing and returning any previous one for its role.
    pub fn register(&mut self, template: Template) -> Option<Template> {
        tracing::debug!(role = %template.role, "registering template");
        self.templates.insert(template.role, template)
    }

    /// Registers `content` under the role named `role_name`.
    pub fn register_by_name(
        &mut self,
        role_name: &str,
        content: impl Into<String>,
    ) -> Result<Option<Template>, TemplateError> {
        let role: TemplateRole = role_name.parse()?;
        Ok(self.register(Template::new(role, content)))
    }

    pub fn get(&self, role: TemplateRole) -> Option<&Template> {
        self.templates.get(&role)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Replaces every role whose default file exists in `dir`.
    ///
    /// Returns the roles that were overridden.
    pub fn override_from_dir(&mut self, dir: &Path) -> Result<Vec<TemplateRole>, TemplateError> {
        if !dir.exists() {
            return Err(TemplateError::NotFound {
                path: dir.to_path_buf(),
            });
        }
        let mut overridden = Vec::new();
        for role in TemplateRole::all() {
            let path = dir.join(role.default_file_name());
            if path.is_file() {
                self.register(load_template_file(role, &path)?);
                overridden.push(role);
            }
        }
        tracing::info!(dir = %dir.display(), count = overridden.len(), "loaded template overrides");
        Ok(overridden)
    }
}

/// Reads one template file for `role`.
pub fn load_template_file(role: TemplateRole, path: &Path) -> Result<Template, TemplateError> {
    if path.is_dir() {
        return Err(TemplateError::IsDirectory {
            path: path.to_path_buf(),
        });
    }
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Template::new(role, content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(TemplateError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(TemplateError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_table_matches_declaration_order() {
        for (index, info) in ROLES.iter().enumerate() {
            assert_eq!(info.role as usize, index, "{} is out of place", info.name);
        }
    }

    #[test]
    fn every_role_has_a_default_body() {
        let registry = TemplateRegistry::with_defaults();
        assert_eq!(registry.len(), 28);
        for role in TemplateRole::all() {
            let template = registry.get(role).unwrap();
            assert!(!template.content().is_empty(), "{} is empty", role);
        }
    }

    #[test]
    fn role_names_round_trip() {
        for role in TemplateRole::all() {
            assert_eq!(role.name().parse::<TemplateRole>().unwrap(), role);
        }
        assert_eq!("has_for_array".parse::<TemplateRole>().unwrap(), TemplateRole::HasForArray);
    }

    #[test]
    fn register_is_last_write_wins() {
        let mut registry = TemplateRegistry::with_defaults();
        let first = registry.register(Template::new(TemplateRole::Has, "one"));
        assert!(first.is_some());
        let second = registry.register(Template::new(TemplateRole::Has, "two"));
        assert_eq!(second.unwrap().content(), "one");
        assert_eq!(registry.get(TemplateRole::Has).unwrap().content(), "two");
    }

    #[test]
    fn register_by_name_rejects_blank_and_unknown_roles() {
        let mut registry = TemplateRegistry::empty();
        assert!(matches!(
            registry.register_by_name("", "x"),
            Err(TemplateError::InvalidRole { .. })
        ));
        assert!(matches!(
            registry.register_by_name("   ", "x"),
            Err(TemplateError::InvalidRole { .. })
        ));
        assert!(matches!(
            registry.register_by_name("NOT_A_ROLE", "x"),
            Err(TemplateError::InvalidRole { .. })
        ));
        assert!(registry.is_empty());

        registry.register_by_name("IS", "body").unwrap();
        assert_eq!(registry.get(TemplateRole::Is).unwrap().content(), "body");
    }

    #[test]
    fn loader_distinguishes_directory_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_template_file(TemplateRole::Has, dir.path()),
            Err(TemplateError::IsDirectory { .. })
        ));
        assert!(matches!(
            load_template_file(TemplateRole::Has, &dir.path().join("missing.txt")),
            Err(TemplateError::NotFound { .. })
        ));

        let file = dir.path().join("has.txt");
        std::fs::write(&file, "custom").unwrap();
        let template = load_template_file(TemplateRole::Has, &file).unwrap();
        assert_eq!(template.role(), TemplateRole::Has);
        assert_eq!(template.content(), "custom");
    }

    #[test]
    fn overrides_only_roles_present_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TemplateRole::Is.default_file_name()), "custom is").unwrap();

        let mut registry = TemplateRegistry::with_defaults();
        let overridden = registry.override_from_dir(dir.path()).unwrap();
        assert_eq!(overridden, vec![TemplateRole::Is]);
        assert_eq!(registry.get(TemplateRole::Is).unwrap().content(), "custom is");
        assert_eq!(
            registry.get(TemplateRole::Has).unwrap().content(),
            TemplateRole::Has.default_body()
        );

        assert!(matches!(
            registry.override_from_dir(&dir.path().join("nope")),
            Err(TemplateError::NotFound { .. })
        ));
    }
}
