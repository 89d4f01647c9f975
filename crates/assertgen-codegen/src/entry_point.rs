//! Entry-point classes aggregating one factory method per generated assertion class.

use std::fmt;
use std::str::FromStr;

use assertgen_core::{naming, ClassDescription};
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::placeholder::{without_package_declaration, Placeholder, Substitutions};
use crate::template::{TemplateRegistry, TemplateRole};

/// Flavour of entry-point class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryPointMode {
    Standard,
    Bdd,
    Soft,
    #[serde(rename = "junit-soft")]
    JUnitSoft,
    AutoCloseableSoft,
    BddSoft,
    #[serde(rename = "junit-bdd-soft")]
    JUnitBddSoft,
    AutoCloseableBddSoft,
}

impl EntryPointMode {
    pub const ALL: [EntryPointMode; 8] = [
        EntryPointMode::Standard,
        EntryPointMode::Bdd,
        EntryPointMode::Soft,
        EntryPointMode::JUnitSoft,
        EntryPointMode::AutoCloseableSoft,
        EntryPointMode::BddSoft,
        EntryPointMode::JUnitBddSoft,
        EntryPointMode::AutoCloseableBddSoft,
    ];

    /// Command-line name (`junit-bdd-soft`).
    pub fn name(self) -> &'static str {
        match self {
            EntryPointMode::Standard => "standard",
            EntryPointMode::Bdd => "bdd",
            EntryPointMode::Soft => "soft",
            EntryPointMode::JUnitSoft => "junit-soft",
            EntryPointMode::AutoCloseableSoft => "auto-closeable-soft",
            EntryPointMode::BddSoft => "bdd-soft",
            EntryPointMode::JUnitBddSoft => "junit-bdd-soft",
            EntryPointMode::AutoCloseableBddSoft => "auto-closeable-bdd-soft",
        }
    }

    pub fn class_role(self) -> TemplateRole {
        match self {
            EntryPointMode::Standard => TemplateRole::AssertionsEntryPointClass,
            EntryPointMode::Bdd => TemplateRole::BddAssertionsEntryPointClass,
            EntryPointMode::Soft => TemplateRole::SoftAssertionsEntryPointClass,
            EntryPointMode::JUnitSoft => TemplateRole::JUnitSoftAssertionsEntryPointClass,
            EntryPointMode::AutoCloseableSoft => {
                TemplateRole::AutoCloseableSoftAssertionsEntryPointClass
            }
            EntryPointMode::BddSoft => TemplateRole::BddSoftAssertionsEntryPointClass,
            EntryPointMode::JUnitBddSoft => TemplateRole::JUnitBddSoftAssertionsEntryPointClass,
            EntryPointMode::AutoCloseableBddSoft => {
                TemplateRole::AutoCloseableBddSoftAssertionsEntryPointClass
            }
        }
    }

    /// Soft variants share one method template, as do the BDD soft variants.
    pub fn method_role(self) -> TemplateRole {
        match self {
            EntryPointMode::Standard => TemplateRole::AssertionEntryPoint,
            EntryPointMode::Bdd => TemplateRole::BddEntryPoint,
            EntryPointMode::Soft | EntryPointMode::JUnitSoft | EntryPointMode::AutoCloseableSoft => {
                TemplateRole::SoftEntryPoint
            }
            EntryPointMode::BddSoft
            | EntryPointMode::JUnitBddSoft
            | EntryPointMode::AutoCloseableBddSoft => TemplateRole::BddSoftEntryPoint,
        }
    }

    /// File name used when the rendered class declares no recognisable name.
    pub fn default_file_name(self) -> &'static str {
        match self {
            EntryPointMode::Standard => "Assertions.java",
            EntryPointMode::Bdd => "BddAssertions.java",
            EntryPointMode::Soft => "SoftAssertions.java",
            EntryPointMode::JUnitSoft => "JUnitSoftAssertions.java",
            EntryPointMode::AutoCloseableSoft => "AutoCloseableSoftAssertions.java",
            EntryPointMode::BddSoft => "BddSoftAssertions.java",
            EntryPointMode::JUnitBddSoft => "JUnitBddSoftAssertions.java",
            EntryPointMode::AutoCloseableBddSoft => "AutoCloseableBddSoftAssertions.java",
        }
    }
}

impl fmt::Display for EntryPointMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntryPointMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        EntryPointMode::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = EntryPointMode::ALL.iter().map(|m| m.name()).collect();
                format!(
                    "unknown entry point mode '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                )
            })
    }
}

/// Package chosen for an entry point when none is given: the shortest
/// package among the inputs, ties broken lexicographically.
///
/// This is not a common-prefix computation: `com.b` wins over `com.aa.x`
/// even though neither contains the other.
pub fn common_package(descriptions: &[ClassDescription]) -> String {
    descriptions
        .iter()
        .map(ClassDescription::package)
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .unwrap_or_default()
        .to_string()
}

/// Renders the entry-point class of `mode` for `descriptions`.
///
/// Methods appear in increasing order of the subjects' qualified names.
/// Absent or empty input yields an empty string. When `package` is given
/// it is both the entry point's package and the package the assertion
/// classes were generated in.
pub fn synthesize_entry_point(
    registry: &TemplateRegistry,
    descriptions: Option<&[ClassDescription]>,
    mode: EntryPointMode,
    package: Option<&str>,
) -> Result<String, GenError> {
    let descriptions = match descriptions {
        Some(d) if !d.is_empty() => d,
        _ => return Ok(String::new()),
    };

    let class_template = registry
        .get(mode.class_role())
        .ok_or(GenError::MissingTemplate {
            role: mode.class_role(),
        })?;
    let method_template = registry
        .get(mode.method_role())
        .ok_or(GenError::MissingTemplate {
            role: mode.method_role(),
        })?;

    let mut sorted: Vec<&ClassDescription> = descriptions.iter().collect();
    sorted.sort_by_key(|d| d.subject.qualified());
    sorted.dedup_by(|a, b| a.subject == b.subject);

    let mut methods = String::new();
    for description in &sorted {
        let line = Substitutions::new()
            .with(
                Placeholder::CustomAssertionClass,
                description.fully_qualified_assert_class_name(package),
            )
            .with(Placeholder::ClassToAssert, description.subject.qualified())
            .apply(method_template.content());
        methods.push_str(&line);
    }

    let entry_package = match package {
        Some(p) => p.to_string(),
        None => common_package(descriptions),
    };
    tracing::debug!(mode = %mode, package = %entry_package, count = sorted.len(), "synthesizing entry point");

    let skeleton = if entry_package.is_empty() {
        without_package_declaration(class_template.content())
    } else {
        class_template.content().to_string()
    };
    Ok(Substitutions::new()
        .with(Placeholder::Package, entry_package)
        .with(Placeholder::AllAssertionsEntryPoints, methods)
        .apply(&skeleton))
}

/// File name for rendered entry-point `content`: the first
/// `public class <Name>` declaration, else the mode's default.
pub fn entry_point_file_name(content: &str, mode: EntryPointMode) -> String {
    content
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("public class "))
        .filter_map(|rest| {
            let name: String = rest
                .trim_start()
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
                .collect();
            (!name.is_empty()).then_some(name)
        })
        .next()
        .map(|name| format!("{}{}", name, naming::SOURCE_FILE_EXTENSION))
        .unwrap_or_else(|| mode.default_file_name().to_string())
}
