//! File-producing generator and the end-to-end generation pipeline.
//!
//! [`AssertionGenerator`] binds a [`TemplateRegistry`] to an output
//! directory and writes one file per synthesized unit. [`generate`] runs
//! the whole flow for a catalog: select types, describe them, write their
//! assertion classes, then the requested entry points.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use assertgen_core::{ClassDescription, InMemoryCatalog, Introspector, MarkerPolicy, TypeName};

use crate::entry_point::{
    common_package, entry_point_file_name, synthesize_entry_point, EntryPointMode,
};
use crate::error::GenError;
use crate::sink::{package_dir, write_source};
use crate::synth::Synthesizer;
use crate::template::TemplateRegistry;
use crate::{GenerationOptions, GenerationReport};

/// Writes synthesized sources under `base_dir`, one directory per package.
#[derive(Debug, Clone)]
pub struct AssertionGenerator {
    registry: TemplateRegistry,
    base_dir: PathBuf,
    package: Option<String>,
}

impl AssertionGenerator {
    pub fn new(registry: TemplateRegistry, base_dir: impl Into<PathBuf>) -> Self {
        AssertionGenerator {
            registry,
            base_dir: base_dir.into(),
            package: None,
        }
    }

    /// Generates every class into `package` rather than its subject's package.
    pub fn with_package(mut self, package: Option<String>) -> Self {
        self.package = package;
        self
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn synthesizer(&self) -> Synthesizer<'_> {
        Synthesizer::new(&self.registry).with_package(self.package.clone())
    }

    fn target_dir(&self, description: &ClassDescription) -> PathBuf {
        let package = self.package.as_deref().unwrap_or(description.package());
        package_dir(&self.base_dir, package)
    }

    /// Writes the flat assertion class of `description`.
    pub fn generate_flat(&self, description: &ClassDescription) -> Result<PathBuf, GenError> {
        let content = self.synthesizer().synthesize_flat(description)?;
        write_source(
            &self.target_dir(description),
            &description.assert_class_file_name(),
            &content,
        )
    }

    /// Writes the abstract and concrete assertion classes, in that order.
    pub fn generate_hierarchical(
        &self,
        description: &ClassDescription,
        batch: &BTreeSet<TypeName>,
    ) -> Result<[PathBuf; 2], GenError> {
        let source = self
            .synthesizer()
            .synthesize_hierarchical(description, batch)?;
        let dir = self.target_dir(description);
        let abstract_path = write_source(
            &dir,
            &description.abstract_assert_class_file_name(),
            &source.abstract_source,
        )?;
        let concrete_path = write_source(
            &dir,
            &description.assert_class_file_name(),
            &source.concrete_source,
        )?;
        Ok([abstract_path, concrete_path])
    }

    /// Writes the entry point of `mode`; nothing is written for an empty batch.
    pub fn generate_entry_point(
        &self,
        descriptions: &[ClassDescription],
        mode: EntryPointMode,
    ) -> Result<Option<PathBuf>, GenError> {
        let content = synthesize_entry_point(
            &self.registry,
            Some(descriptions),
            mode,
            self.package.as_deref(),
        )?;
        if content.is_empty() {
            tracing::info!(mode = %mode, "no types to aggregate, skipping entry point");
            return Ok(None);
        }
        let package = match &self.package {
            Some(p) => p.clone(),
            None => common_package(descriptions),
        };
        let path = write_source(
            &package_dir(&self.base_dir, &package),
            &entry_point_file_name(&content, mode),
            &content,
        )?;
        Ok(Some(path))
    }
}

/// Generates assertion classes and entry points for types of `catalog`.
///
/// Orchestrates the full pipeline:
/// 1. Build the template registry (defaults plus directory overrides)
/// 2. Select the requested types (every public type when none are named)
/// 3. Describe each selected type
/// 4. Write one flat class, or an abstract/concrete pair, per type
/// 5. Write each requested entry point
pub fn generate(
    catalog: &InMemoryCatalog,
    options: &GenerationOptions,
) -> Result<GenerationReport, GenError> {
    let start = Instant::now();

    // 1. Templates
    let mut registry = TemplateRegistry::with_defaults();
    if let Some(dir) = &options.templates_dir {
        registry.override_from_dir(dir)?;
    }

    // 2. Selection
    let shapes = if options.types.is_empty() {
        catalog.select_all()
    } else {
        catalog.select(options.types.as_slice())?
    };

    // 3. Introspection
    let mut introspector =
        Introspector::new(catalog).include_non_public_fields(options.include_non_public_fields);
    if let Some(marker) = &options.marker {
        introspector = introspector.with_inclusion(MarkerPolicy::new(marker.clone()));
    }
    let descriptions = shapes
        .iter()
        .map(|shape| introspector.extract_description(&shape.name))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(count = descriptions.len(), "described types");

    // 4. Assertion classes
    let generator = AssertionGenerator::new(registry, &options.output_dir)
        .with_package(options.package.clone());
    let batch: BTreeSet<TypeName> = descriptions.iter().map(|d| d.subject.clone()).collect();
    let mut files = Vec::new();
    for description in &descriptions {
        if options.hierarchical {
            files.extend(generator.generate_hierarchical(description, &batch)?);
        } else {
            files.push(generator.generate_flat(description)?);
        }
    }

    // 5. Entry points
    for mode in &options.entry_points {
        if let Some(path) = generator.generate_entry_point(&descriptions, *mode)? {
            files.push(path);
        }
    }

    Ok(GenerationReport {
        types: descriptions.len(),
        files,
        generation_time_ms: start.elapsed().as_millis() as u64,
    })
}
