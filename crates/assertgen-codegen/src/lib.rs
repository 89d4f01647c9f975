//! Assertion class generation from type descriptions.
//!
//! This crate turns [`ClassDescription`](assertgen_core::ClassDescription)s
//! into assertion-class sources by filling placeholder templates.
//!
//! # Modules
//!
//! - [`error`] -- Error types for template loading and generation
//! - [`template`] -- Template roles, the registry and the file loader
//! - [`placeholder`] -- The closed placeholder vocabulary
//! - [`synth`] -- Property bodies and flat/hierarchical class assembly
//! - [`imports`] -- Import collection for generated units
//! - [`entry_point`] -- Aggregated entry-point classes
//! - [`sink`] -- Writing sources to package directories
//! - [`generator`] -- File-producing facade and the end-to-end pipeline

pub mod entry_point;
pub mod error;
pub mod generator;
pub mod imports;
pub mod placeholder;
pub mod sink;
pub mod synth;
pub mod template;

pub use entry_point::{synthesize_entry_point, EntryPointMode};
pub use error::{GenError, TemplateError};
pub use generator::{generate, AssertionGenerator};
pub use synth::{HierarchicalSource, Synthesizer};
pub use template::{Template, TemplateRegistry, TemplateRole};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options controlling one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Qualified type or package names to generate for.
    /// Empty means every public type in the catalog.
    pub types: Vec<String>,

    /// Root directory of the generated sources.
    pub output_dir: PathBuf,

    /// Package for every generated class.
    /// `None` places each class next to its subject.
    pub package: Option<String>,

    /// Generate abstract/concrete pairs instead of flat classes.
    pub hierarchical: bool,

    /// Entry-point classes to generate after the assertion classes.
    pub entry_points: Vec<EntryPointMode>,

    /// Directory of template files overriding the built-in ones.
    pub templates_dir: Option<PathBuf>,

    /// Marker that opts members (or whole types) into generation
    /// regardless of their name.
    pub marker: Option<String>,

    /// Also generate assertions for non-public fields.
    pub include_non_public_fields: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            types: Vec::new(),
            output_dir: PathBuf::from("./generated-assertions/"),
            package: None,
            hierarchical: false,
            entry_points: vec![EntryPointMode::Standard],
            templates_dir: None,
            marker: None,
            include_non_public_fields: false,
        }
    }
}

/// Result of a successful generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Number of types assertion classes were generated for.
    pub types: usize,

    /// Every file written, in generation order.
    pub files: Vec<PathBuf>,

    /// Time taken for the run in milliseconds.
    pub generation_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generation_options() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.output_dir, PathBuf::from("./generated-assertions/"));
        assert!(opts.types.is_empty());
        assert!(opts.package.is_none());
        assert!(!opts.hierarchical);
        assert_eq!(opts.entry_points, vec![EntryPointMode::Standard]);
        assert!(!opts.include_non_public_fields);
    }

    #[test]
    fn generation_options_serde_roundtrip() {
        let opts = GenerationOptions {
            types: vec!["com.acme".to_string()],
            package: Some("org.tests".to_string()),
            hierarchical: true,
            entry_points: vec![EntryPointMode::JUnitBddSoft],
            marker: Some("GenerateAssertion".to_string()),
            ..GenerationOptions::default()
        };
        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains("\"junit-bdd-soft\""));
        let back: GenerationOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back.types, opts.types);
        assert_eq!(back.package, opts.package);
        assert_eq!(back.entry_points, opts.entry_points);
        assert_eq!(back.marker, opts.marker);
    }
}
